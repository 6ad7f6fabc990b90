//! Raw C bindings for the native media engine.
//!
//! This module contains the direct FFI declarations. Users should prefer the
//! safe Rust wrappers in the parent modules.

use std::os::raw::{c_char, c_int, c_void};

#[cfg(feature = "native")]
use super::handles::*;

/// Status code returned by destroy functions.
pub type RtcStatus = c_int;

// Status codes
pub const RTC_OK: RtcStatus = 0;
pub const RTC_ERR_INVALID_HANDLE: RtcStatus = 1;
pub const RTC_ERR_ALREADY_RELEASED: RtcStatus = 2;
pub const RTC_ERR_UNKNOWN: RtcStatus = 99;

// Codec ids, matching `From<VideoCodec> for i32`
pub const RTC_CODEC_VP8: c_int = 1;
pub const RTC_CODEC_VP9: c_int = 2;
pub const RTC_CODEC_AV1: c_int = 3;

/// Stats completion callback.
///
/// `report_json` is the engine's JSON rendering of the report, or null when
/// there is no data. It is only valid for the duration of the call.
pub type RtcStatsDeliveredCallback = Option<
    unsafe extern "C" fn(user_data: *mut c_void, timestamp_us: i64, report_json: *const c_char),
>;

/// Network description passed to native observer callbacks.
///
/// All pointers are only valid for the duration of the call.
#[repr(C)]
pub struct RtcNetworkInformation {
    pub name: *const c_char,
    pub id: i64,
    pub connection_type: c_int,
    pub underlying_type_for_vpn: c_int,
    pub ip_addresses: *const *const c_char,
    pub ip_address_count: usize,
}

/// Network observer implemented by the engine-facing glue.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RtcNetworkObserverCallbacks {
    /// Passed back as the first argument of every callback.
    pub context: *mut c_void,
    pub on_connection_type_changed:
        Option<extern "C" fn(context: *mut c_void, connection_type: c_int)>,
    pub on_network_connect:
        Option<extern "C" fn(context: *mut c_void, network: *const RtcNetworkInformation)>,
    pub on_network_disconnect: Option<extern "C" fn(context: *mut c_void, network_id: i64)>,
    pub on_network_preference: Option<
        extern "C" fn(context: *mut c_void, types: *const c_int, type_count: usize, preference: c_int),
    >,
}

impl Default for RtcNetworkObserverCallbacks {
    fn default() -> Self {
        Self {
            context: std::ptr::null_mut(),
            on_connection_type_changed: None,
            on_network_connect: None,
            on_network_disconnect: None,
            on_network_preference: None,
        }
    }
}

// External C functions of the engine library
#[cfg(feature = "native")]
extern "C" {
    // Video decoders
    pub fn rtc_video_decoder_is_supported(codec: c_int) -> bool;
    pub fn rtc_video_decoder_create(codec: c_int, env: EnvironmentHandle) -> VideoDecoderHandle;
    pub fn rtc_video_decoder_free(decoder: VideoDecoderHandle) -> RtcStatus;

    // NetEq
    pub fn rtc_neteq_factory_create() -> NetEqFactoryHandle;
    pub fn rtc_neteq_factory_free(factory: NetEqFactoryHandle) -> RtcStatus;

    // Network monitor
    pub fn rtc_network_monitor_create() -> NetworkMonitorHandle;
    pub fn rtc_network_monitor_free(monitor: NetworkMonitorHandle) -> RtcStatus;

    // Stats
    pub fn rtc_peer_connection_get_stats(
        pc: PeerConnectionHandle,
        callback: RtcStatsDeliveredCallback,
        user_data: *mut c_void,
    );
}
