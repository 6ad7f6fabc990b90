//! In-process engine and platform.
//!
//! [`LoopbackEngine`] implements [`NativeEngine`] without a native library. It
//! hands out pointer-like handles, keeps a table of the live ones, and runs
//! each destroy path through the same status codes the linked engine returns,
//! so a double release is rejected exactly as it would be natively. Stats are
//! completed on a separate thread through the `rtc_bridge_stats_delivered`
//! entry point, as the native engine would.
//!
//! [`SimulatedConnectivity`] is a [`ConnectivitySource`] driven by hand.

use std::collections::{HashMap, HashSet};
use std::ffi::CString;
use std::fmt;
use std::ptr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::engine::NativeEngine;
use crate::error::Result;
use crate::ffi::{self, RtcStatus};
use crate::handle::{
    EnvironmentHandle, HandleKind, NetEqFactoryHandle, NetworkMonitorHandle, PeerConnectionHandle,
    VideoDecoderHandle,
};
use crate::network::{ConnectivitySource, NetworkEvent, NetworkEventSink, SubscriptionId};
use crate::stats::{RtcStatsReport, StatsRequest};
use crate::types::{ConnectionType, NetworkInformation, VideoCodec};

const FIRST_HANDLE: u64 = 0x7f00_0000_1000;
const HANDLE_STRIDE: u64 = 0x40;

type StatsSource = Box<dyn Fn(PeerConnectionHandle) -> Option<RtcStatsReport> + Send + Sync>;

#[derive(Default)]
struct HandleTable {
    live: HashMap<u64, HandleKind>,
    /// Every value ever released. Values are never reused, so this grows
    /// for the engine's lifetime and a late second release is always
    /// reported as such. Fine for tests and demos, not for a long-running
    /// process.
    released: HashSet<u64>,
}

/// Engine that runs entirely in this process.
pub struct LoopbackEngine {
    video_codecs: Vec<VideoCodec>,
    neteq: bool,
    network_monitor: bool,
    stats: Option<StatsSource>,
    next_handle: AtomicU64,
    handles: Mutex<HandleTable>,
}

impl LoopbackEngine {
    /// Engine with VP8 and VP9 decoders, NetEq and network monitoring, and no
    /// stats data.
    pub fn new() -> Self {
        Self {
            video_codecs: vec![VideoCodec::Vp8, VideoCodec::Vp9],
            neteq: true,
            network_monitor: true,
            stats: None,
            next_handle: AtomicU64::new(FIRST_HANDLE),
            handles: Mutex::new(HandleTable::default()),
        }
    }

    /// Compile in exactly these decoders.
    pub fn with_video_codecs(mut self, codecs: &[VideoCodec]) -> Self {
        self.video_codecs = codecs.to_vec();
        self
    }

    /// Fail every NetEq factory creation.
    pub fn without_neteq(mut self) -> Self {
        self.neteq = false;
        self
    }

    /// Fail every network monitor creation.
    pub fn without_network_monitor(mut self) -> Self {
        self.network_monitor = false;
        self
    }

    /// Answer stats requests from `source`. `None` means no data.
    pub fn with_stats<F>(mut self, source: F) -> Self
    where
        F: Fn(PeerConnectionHandle) -> Option<RtcStatsReport> + Send + Sync + 'static,
    {
        self.stats = Some(Box::new(source));
        self
    }

    /// Number of handles created and not yet released.
    pub fn live_handles(&self) -> usize {
        self.handles.lock().live.len()
    }

    /// Number of handles released so far.
    pub fn released_count(&self) -> usize {
        self.handles.lock().released.len()
    }

    /// Whether `raw` is a live handle.
    pub fn is_live(&self, raw: u64) -> bool {
        self.handles.lock().live.contains_key(&raw)
    }

    fn allocate(&self, kind: HandleKind) -> u64 {
        let raw = self.next_handle.fetch_add(HANDLE_STRIDE, Ordering::Relaxed);
        self.handles.lock().live.insert(raw, kind);
        trace!("loopback: created {} {:#x}", kind, raw);
        raw
    }

    fn free(&self, kind: HandleKind, raw: u64) -> RtcStatus {
        if raw == 0 {
            return ffi::RTC_ERR_INVALID_HANDLE;
        }
        let mut table = self.handles.lock();
        if table.released.contains(&raw) {
            return ffi::RTC_ERR_ALREADY_RELEASED;
        }
        match table.live.get(&raw) {
            Some(&live_kind) if live_kind == kind => {
                table.live.remove(&raw);
                table.released.insert(raw);
                trace!("loopback: freed {} {:#x}", kind, raw);
                ffi::RTC_OK
            }
            Some(&live_kind) => {
                warn!(
                    "loopback: {:#x} is a {}, not a {}",
                    raw, live_kind, kind
                );
                ffi::RTC_ERR_INVALID_HANDLE
            }
            None => ffi::RTC_ERR_INVALID_HANDLE,
        }
    }
}

impl Default for LoopbackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoopbackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoopbackEngine")
            .field("video_codecs", &self.video_codecs)
            .field("neteq", &self.neteq)
            .field("network_monitor", &self.network_monitor)
            .field("live_handles", &self.live_handles())
            .finish()
    }
}

impl NativeEngine for LoopbackEngine {
    fn is_video_decoder_supported(&self, codec: VideoCodec) -> bool {
        self.video_codecs.contains(&codec)
    }

    fn create_video_decoder(
        &self,
        codec: VideoCodec,
        env: EnvironmentHandle,
    ) -> VideoDecoderHandle {
        if !env.is_valid() || !self.is_video_decoder_supported(codec) {
            return VideoDecoderHandle::invalid();
        }
        VideoDecoderHandle::from_raw(self.allocate(HandleKind::VideoDecoder))
    }

    fn create_neteq_factory(&self) -> NetEqFactoryHandle {
        if !self.neteq {
            return NetEqFactoryHandle::invalid();
        }
        NetEqFactoryHandle::from_raw(self.allocate(HandleKind::NetEqFactory))
    }

    fn create_network_monitor(&self) -> NetworkMonitorHandle {
        if !self.network_monitor {
            return NetworkMonitorHandle::invalid();
        }
        NetworkMonitorHandle::from_raw(self.allocate(HandleKind::NetworkMonitor))
    }

    fn collect_stats(&self, peer: PeerConnectionHandle, request: StatsRequest) {
        let report = if peer.is_valid() {
            self.stats.as_ref().and_then(|source| source(peer))
        } else {
            None
        };
        let timestamp_us = report
            .as_ref()
            .map(|r| r.timestamp_us())
            .unwrap_or_else(now_us);
        let json = report.and_then(|r| CString::new(r.to_json()).ok());

        debug!(
            "loopback: completing stats request {} ({})",
            request.id(),
            if json.is_some() { "with data" } else { "no data" }
        );
        thread::spawn(move || {
            let report_json = json.as_ref().map_or(ptr::null(), |s| s.as_ptr());
            unsafe {
                ffi::rtc_bridge_stats_delivered(request.into_raw(), timestamp_us, report_json);
            }
        });
    }

    fn release(&self, kind: HandleKind, raw: u64) -> Result<()> {
        ffi::check_status(self.free(kind, raw), kind, raw)
    }
}

fn now_us() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or_default()
}

struct ConnectivityState {
    connection_type: ConnectionType,
    networks: Vec<NetworkInformation>,
    next_subscription: SubscriptionId,
    sinks: Vec<(SubscriptionId, NetworkEventSink)>,
}

/// Connectivity source driven by [`SimulatedConnectivity::emit`].
pub struct SimulatedConnectivity {
    state: Mutex<ConnectivityState>,
}

impl SimulatedConnectivity {
    /// Start out on `connection_type` with no networks up.
    pub fn new(connection_type: ConnectionType) -> Self {
        Self {
            state: Mutex::new(ConnectivityState {
                connection_type,
                networks: Vec::new(),
                next_subscription: 1,
                sinks: Vec::new(),
            }),
        }
    }

    /// Apply `event` and push it to every registered sink, in registration
    /// order. Returns how many sinks accepted it.
    ///
    /// Sinks that refuse the event are dropped.
    pub fn emit(&self, event: NetworkEvent) -> usize {
        let sinks = {
            let mut state = self.state.lock();
            match &event {
                NetworkEvent::ConnectionTypeChanged(kind) => state.connection_type = *kind,
                NetworkEvent::Connect(network) => {
                    state.networks.retain(|n| n.id != network.id);
                    state.networks.push(network.clone());
                }
                NetworkEvent::Disconnect(id) => state.networks.retain(|n| n.id != *id),
                NetworkEvent::Preference { .. } => {}
            }
            state.sinks.clone()
        };

        // Deliver unlocked: observers may stop their detector, which
        // unregisters here.
        let mut refused = Vec::new();
        let mut accepted = 0;
        for (id, sink) in sinks {
            if sink.deliver(event.clone()) {
                accepted += 1;
            } else {
                refused.push(id);
            }
        }
        if !refused.is_empty() {
            self.state
                .lock()
                .sinks
                .retain(|(id, _)| !refused.contains(id));
        }
        accepted
    }

    /// Number of registered sinks.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().sinks.len()
    }
}

impl Default for SimulatedConnectivity {
    fn default() -> Self {
        Self::new(ConnectionType::Unknown)
    }
}

impl ConnectivitySource for SimulatedConnectivity {
    fn current_connection_type(&self) -> ConnectionType {
        self.state.lock().connection_type
    }

    fn active_networks(&self) -> Vec<NetworkInformation> {
        self.state.lock().networks.clone()
    }

    fn supports_network_callback(&self) -> bool {
        true
    }

    fn register(&self, sink: NetworkEventSink) -> SubscriptionId {
        let mut state = self.state.lock();
        let id = state.next_subscription;
        state.next_subscription += 1;
        state.sinks.push((id, sink));
        id
    }

    fn unregister(&self, id: SubscriptionId) {
        self.state.lock().sinks.retain(|(sub, _)| *sub != id);
    }
}
