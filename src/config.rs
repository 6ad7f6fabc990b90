//! Bridge configuration.
//!
//! Chooses which component implementations the engine is offered. Every
//! section is optional; missing values take their defaults.
//!
//! ```toml
//! [video]
//! decoder_preference = ["vp9", "vp8", "av1"]
//!
//! [audio]
//! neteq = "builtin"      # or "disabled"
//!
//! [network]
//! detector = "platform"  # or "disabled"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::VideoCodec;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Video decoder selection.
    pub video: VideoConfig,
    /// Audio pipeline components.
    pub audio: AudioConfig,
    /// Network change detection.
    pub network: NetworkConfig,
}

impl BridgeConfig {
    /// Parse TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// Video decoder selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    /// Decoders to offer, most preferred first.
    pub decoder_preference: Vec<VideoCodec>,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            decoder_preference: vec![VideoCodec::Vp9, VideoCodec::Vp8, VideoCodec::Av1],
        }
    }
}

/// Audio pipeline components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    /// NetEq factory source.
    pub neteq: NetEqSelection,
}

/// Which NetEq factory factory the engine is offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetEqSelection {
    /// The engine's built-in NetEq.
    #[default]
    Builtin,
    /// None; the engine falls back to its internal default.
    Disabled,
}

/// Network change detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// Detector source.
    pub detector: DetectorSelection,
}

/// Which network change detector factory the engine is offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorSelection {
    /// Detectors driven by the platform connectivity source.
    #[default]
    Platform,
    /// No detection; the engine sees no network changes.
    Disabled,
}
