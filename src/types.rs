//! Type definitions and enums.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ffi;

/// Video codecs with a software decoder in the native engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    /// VP8 (libvpx).
    Vp8,
    /// VP9 (libvpx).
    Vp9,
    /// AV1 (dav1d).
    Av1,
}

impl VideoCodec {
    /// SDP codec name.
    pub fn name(&self) -> &'static str {
        match self {
            VideoCodec::Vp8 => "VP8",
            VideoCodec::Vp9 => "VP9",
            VideoCodec::Av1 => "AV1",
        }
    }
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VideoCodec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vp8" => Ok(VideoCodec::Vp8),
            "vp9" => Ok(VideoCodec::Vp9),
            "av1" => Ok(VideoCodec::Av1),
            other => Err(Error::Unsupported(format!("video codec {}", other))),
        }
    }
}

impl From<VideoCodec> for i32 {
    fn from(codec: VideoCodec) -> i32 {
        match codec {
            VideoCodec::Vp8 => ffi::RTC_CODEC_VP8,
            VideoCodec::Vp9 => ffi::RTC_CODEC_VP9,
            VideoCodec::Av1 => ffi::RTC_CODEC_AV1,
        }
    }
}

/// Connection type reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// Type could not be determined.
    #[default]
    Unknown,
    /// Wired ethernet.
    Ethernet,
    /// Wi-Fi.
    Wifi,
    /// 5G cellular.
    Cellular5g,
    /// 4G cellular.
    Cellular4g,
    /// 3G cellular.
    Cellular3g,
    /// 2G cellular.
    Cellular2g,
    /// Cellular of unknown generation.
    UnknownCellular,
    /// Bluetooth tethering.
    Bluetooth,
    /// VPN.
    Vpn,
    /// No connectivity.
    None,
}

impl ConnectionType {
    /// Whether this is any cellular generation.
    pub fn is_cellular(&self) -> bool {
        matches!(
            self,
            ConnectionType::Cellular5g
                | ConnectionType::Cellular4g
                | ConnectionType::Cellular3g
                | ConnectionType::Cellular2g
                | ConnectionType::UnknownCellular
        )
    }
}

impl From<ConnectionType> for i32 {
    fn from(kind: ConnectionType) -> i32 {
        match kind {
            ConnectionType::Unknown => 0,
            ConnectionType::Ethernet => 1,
            ConnectionType::Wifi => 2,
            ConnectionType::Cellular5g => 3,
            ConnectionType::Cellular4g => 4,
            ConnectionType::Cellular3g => 5,
            ConnectionType::Cellular2g => 6,
            ConnectionType::UnknownCellular => 7,
            ConnectionType::Bluetooth => 8,
            ConnectionType::Vpn => 9,
            ConnectionType::None => 10,
        }
    }
}

/// Preference the platform expresses for a set of connection types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkPreference {
    /// No preference either way.
    #[default]
    Neutral,
    /// Avoid these types when another is available.
    NotPreferred,
}

impl From<NetworkPreference> for i32 {
    fn from(preference: NetworkPreference) -> i32 {
        match preference {
            NetworkPreference::Neutral => 0,
            NetworkPreference::NotPreferred => -1,
        }
    }
}

/// Platform network identifier (Android `Network#getNetworkHandle`).
pub type NetworkId = i64;

/// A network interface as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInformation {
    /// Interface name (e.g., "wlan0").
    pub name: String,
    /// Platform network identifier.
    pub id: NetworkId,
    /// Connection type of this network.
    pub connection_type: ConnectionType,
    /// For VPNs, the type of the network the VPN runs over.
    pub underlying_type_for_vpn: ConnectionType,
    /// Addresses assigned to the interface.
    pub ip_addresses: Vec<IpAddr>,
}

impl NetworkInformation {
    /// Describe a non-VPN network.
    pub fn new(name: impl Into<String>, id: NetworkId, connection_type: ConnectionType) -> Self {
        Self {
            name: name.into(),
            id,
            connection_type,
            underlying_type_for_vpn: ConnectionType::None,
            ip_addresses: Vec::new(),
        }
    }

    /// Add an address.
    pub fn with_address(mut self, addr: IpAddr) -> Self {
        self.ip_addresses.push(addr);
        self
    }
}
