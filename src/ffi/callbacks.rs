//! C entry points the native engine calls back into.
//!
//! Rust objects cross the boundary as boxed `Arc<dyn Trait>` pointers created
//! by the `into_native_raw` functions of the component modules, and come back
//! here as `*const c_void`. Each boxed object has exactly one matching `_free`
//! (or, for detectors, `_stop`) entry point.
//!
//! Panics never unwind into native frames: each entry point catches them,
//! logs, and returns the absent value.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_void};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::Arc;

use log::{error, warn};

use super::handles::{EnvironmentHandle, NetEqFactoryHandle, VideoDecoderHandle};
use super::raw::{RtcNetworkInformation, RtcNetworkObserverCallbacks};
use crate::audio::NetEqFactoryFactory;
use crate::network::{
    NetworkChangeDetector, NetworkChangeDetectorFactory, NetworkChangeObserver, PlatformContext,
};
use crate::stats::{RtcStatsReport, StatsRequest};
use crate::types::{ConnectionType, NetworkId, NetworkInformation, NetworkPreference};
use crate::video::WrappedNativeVideoDecoder;

fn guarded<T>(what: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error!("panic in {}; returning absent value to native", what);
            fallback
        }
    }
}

// ---------------------------------------------------------------------------
// Stats

/// Complete a stats request started with `StatsRequest::into_raw`.
///
/// `report_json` may be null (no data). Must be called exactly once per
/// request.
///
/// # Safety
///
/// `user_data` must come from `StatsRequest::into_raw` and not have been
/// passed here before. `report_json`, if non-null, must be a valid C string.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_stats_delivered(
    user_data: *mut c_void,
    timestamp_us: i64,
    report_json: *const c_char,
) {
    if user_data.is_null() {
        warn!("stats delivered with null request");
        return;
    }
    let request = StatsRequest::from_raw(user_data);

    let report = if report_json.is_null() {
        RtcStatsReport::from_json(timestamp_us, "")
    } else {
        match CStr::from_ptr(report_json).to_str() {
            Ok(json) => RtcStatsReport::from_json(timestamp_us, json),
            Err(e) => Err(crate::Error::Unknown(format!("stats report is not UTF-8: {}", e))),
        }
    };
    let report = report.unwrap_or_else(|e| {
        warn!("stats request {}: {}; delivering empty report", request.id(), e);
        RtcStatsReport::default()
    });

    guarded("stats callback", (), move || request.deliver(report));
}

// ---------------------------------------------------------------------------
// Video decoders

/// # Safety
///
/// `decoder` must come from `video::into_native_raw` and not be freed.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_video_decoder_is_supported(decoder: *const c_void) -> bool {
    if decoder.is_null() {
        return false;
    }
    let decoder = &*(decoder as *const Arc<dyn WrappedNativeVideoDecoder>);
    guarded("is_supported", false, || decoder.is_supported())
}

/// Create a native decoder; the caller owns the result. Zero when absent.
///
/// # Safety
///
/// `decoder` must come from `video::into_native_raw` and not be freed.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_video_decoder_create_native(
    decoder: *const c_void,
    env: EnvironmentHandle,
) -> VideoDecoderHandle {
    if decoder.is_null() {
        return VideoDecoderHandle::invalid();
    }
    let decoder = &*(decoder as *const Arc<dyn WrappedNativeVideoDecoder>);
    guarded("create_native", VideoDecoderHandle::invalid(), || {
        decoder
            .create_native(env)
            .map(|owned| owned.into_raw())
            .unwrap_or_default()
    })
}

/// # Safety
///
/// `decoder` must come from `video::into_native_raw`; it is invalid after
/// this call.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_video_decoder_free(decoder: *mut c_void) {
    if !decoder.is_null() {
        drop(Box::from_raw(decoder as *mut Arc<dyn WrappedNativeVideoDecoder>));
    }
}

// ---------------------------------------------------------------------------
// NetEq

/// Create a NetEq factory; the caller owns the result. Zero when absent.
///
/// # Safety
///
/// `factory` must come from `audio::into_native_raw` and not be freed.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_neteq_factory_factory_create_native(
    factory: *const c_void,
) -> NetEqFactoryHandle {
    if factory.is_null() {
        return NetEqFactoryHandle::invalid();
    }
    let factory = &*(factory as *const Arc<dyn NetEqFactoryFactory>);
    guarded("create_native_neteq_factory", NetEqFactoryHandle::invalid(), || {
        factory
            .create_native_neteq_factory()
            .map(|owned| owned.into_raw())
            .unwrap_or_default()
    })
}

/// # Safety
///
/// `factory` must come from `audio::into_native_raw`; it is invalid after
/// this call.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_neteq_factory_factory_free(factory: *mut c_void) {
    if !factory.is_null() {
        drop(Box::from_raw(factory as *mut Arc<dyn NetEqFactoryFactory>));
    }
}

// ---------------------------------------------------------------------------
// Network change detection

/// A detector factory together with the platform context it watches.
pub(crate) type NativeDetectorFactory = (Arc<dyn NetworkChangeDetectorFactory>, PlatformContext);

/// A detector handed to native code, with the glue observer it reports to.
struct NativeDetector {
    detector: Box<dyn NetworkChangeDetector>,
    _observer: Arc<dyn NetworkChangeObserver>,
}

/// Observer that forwards into C callbacks.
pub struct CallbackObserver {
    callbacks: RtcNetworkObserverCallbacks,
}

// Safety: the glue promises its callbacks may be invoked from any thread.
unsafe impl Send for CallbackObserver {}
unsafe impl Sync for CallbackObserver {}

impl CallbackObserver {
    /// Wrap the glue's callback table.
    pub fn new(callbacks: RtcNetworkObserverCallbacks) -> Self {
        Self { callbacks }
    }
}

impl NetworkChangeObserver for CallbackObserver {
    fn on_connection_type_changed(&self, connection_type: ConnectionType) {
        if let Some(cb) = self.callbacks.on_connection_type_changed {
            cb(self.callbacks.context, connection_type.into());
        }
    }

    fn on_network_connect(&self, network: NetworkInformation) {
        let Some(cb) = self.callbacks.on_network_connect else {
            return;
        };
        let name = match CString::new(network.name) {
            Ok(name) => name,
            Err(_) => {
                warn!("network {} name contains NUL; sending empty name", network.id);
                CString::default()
            }
        };
        let addrs: Vec<CString> = network
            .ip_addresses
            .iter()
            .filter_map(|a| CString::new(a.to_string()).ok())
            .collect();
        let addr_ptrs: Vec<*const c_char> = addrs.iter().map(|a| a.as_ptr()).collect();
        let info = RtcNetworkInformation {
            name: name.as_ptr(),
            id: network.id,
            connection_type: network.connection_type.into(),
            underlying_type_for_vpn: network.underlying_type_for_vpn.into(),
            ip_addresses: if addr_ptrs.is_empty() {
                ptr::null()
            } else {
                addr_ptrs.as_ptr()
            },
            ip_address_count: addr_ptrs.len(),
        };
        cb(self.callbacks.context, &info);
    }

    fn on_network_disconnect(&self, network_id: NetworkId) {
        if let Some(cb) = self.callbacks.on_network_disconnect {
            cb(self.callbacks.context, network_id);
        }
    }

    fn on_network_preference(&self, types: Vec<ConnectionType>, preference: NetworkPreference) {
        if let Some(cb) = self.callbacks.on_network_preference {
            let types: Vec<c_int> = types.into_iter().map(c_int::from).collect();
            cb(
                self.callbacks.context,
                types.as_ptr(),
                types.len(),
                preference.into(),
            );
        }
    }
}

/// Create a detector reporting into `callbacks`. Null when unavailable.
///
/// The result must be passed to `rtc_bridge_network_detector_stop` exactly
/// once.
///
/// # Safety
///
/// `factory` must come from `network::into_native_raw` and not be freed.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_network_detector_factory_create(
    factory: *const c_void,
    callbacks: RtcNetworkObserverCallbacks,
) -> *mut c_void {
    if factory.is_null() {
        return ptr::null_mut();
    }
    let (factory, context) = &*(factory as *const NativeDetectorFactory);
    guarded("network detector create", ptr::null_mut(), || {
        let observer: Arc<dyn NetworkChangeObserver> = Arc::new(CallbackObserver::new(callbacks));
        match factory.create(observer.clone(), context) {
            Some(detector) => Box::into_raw(Box::new(NativeDetector {
                detector,
                _observer: observer,
            })) as *mut c_void,
            None => ptr::null_mut(),
        }
    })
}

/// Current connection type as seen by a detector.
///
/// # Safety
///
/// `detector` must come from `rtc_bridge_network_detector_factory_create`
/// and not be stopped.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_network_detector_current_connection_type(
    detector: *const c_void,
) -> c_int {
    if detector.is_null() {
        return ConnectionType::Unknown.into();
    }
    let detector = &*(detector as *const NativeDetector);
    guarded("current_connection_type", ConnectionType::Unknown, || {
        detector.detector.current_connection_type()
    })
    .into()
}

/// Stop a detector and free it. No callbacks run after this returns.
///
/// # Safety
///
/// `detector` must come from `rtc_bridge_network_detector_factory_create`;
/// it is invalid after this call.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_network_detector_stop(detector: *mut c_void) {
    if detector.is_null() {
        return;
    }
    let detector = Box::from_raw(detector as *mut NativeDetector);
    guarded("network detector stop", (), move || {
        detector.detector.stop();
        drop(detector);
    });
}

/// # Safety
///
/// `factory` must come from `network::into_native_raw`; it is invalid after
/// this call.
#[no_mangle]
pub unsafe extern "C" fn rtc_bridge_network_detector_factory_free(factory: *mut c_void) {
    if !factory.is_null() {
        drop(Box::from_raw(factory as *mut NativeDetectorFactory));
    }
}
