//! The native engine seam.
//!
//! Everything this crate asks of the native media engine goes through
//! [`NativeEngine`]. [`LinkedEngine`] (feature `native`) forwards to the C
//! functions of the linked engine library; [`LoopbackEngine`](crate::LoopbackEngine)
//! runs in-process for tests and demos.

use crate::error::Result;
use crate::handle::{
    EnvironmentHandle, HandleKind, NetEqFactoryHandle, NetworkMonitorHandle,
    PeerConnectionHandle, VideoDecoderHandle,
};
use crate::stats::StatsRequest;
use crate::types::VideoCodec;

/// Operations the native engine provides to the bridge.
///
/// Creation calls return the absent handle on failure. Every present handle
/// must later be passed to [`NativeEngine::release`] exactly once; a second
/// release of the same value must be rejected with
/// [`Error::AlreadyReleased`](crate::Error::AlreadyReleased).
///
/// Implementations are called from arbitrary threads.
pub trait NativeEngine: Send + Sync {
    /// Whether a software decoder for `codec` is compiled into the engine.
    fn is_video_decoder_supported(&self, codec: VideoCodec) -> bool;

    /// Create a decoder bound to `env`.
    fn create_video_decoder(&self, codec: VideoCodec, env: EnvironmentHandle)
        -> VideoDecoderHandle;

    /// Create the engine's default NetEq factory.
    fn create_neteq_factory(&self) -> NetEqFactoryHandle;

    /// Create the native monitor a network change detector reports into.
    fn create_network_monitor(&self) -> NetworkMonitorHandle;

    /// Start collecting stats; complete `request` when the report is ready.
    ///
    /// Completion may happen on any thread, before or after this returns.
    fn collect_stats(&self, peer: PeerConnectionHandle, request: StatsRequest);

    /// Run the destroy path for a handle of `kind`.
    fn release(&self, kind: HandleKind, raw: u64) -> Result<()>;
}

#[cfg(feature = "native")]
pub use linked::LinkedEngine;

#[cfg(feature = "native")]
mod linked {
    use super::*;
    use crate::ffi;

    /// Engine backed by the linked native library.
    #[derive(Debug, Default)]
    pub struct LinkedEngine {
        _private: (),
    }

    impl LinkedEngine {
        /// Bind to the linked engine library.
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl NativeEngine for LinkedEngine {
        fn is_video_decoder_supported(&self, codec: VideoCodec) -> bool {
            unsafe { ffi::rtc_video_decoder_is_supported(codec.into()) }
        }

        fn create_video_decoder(
            &self,
            codec: VideoCodec,
            env: EnvironmentHandle,
        ) -> VideoDecoderHandle {
            unsafe { ffi::rtc_video_decoder_create(codec.into(), env) }
        }

        fn create_neteq_factory(&self) -> NetEqFactoryHandle {
            unsafe { ffi::rtc_neteq_factory_create() }
        }

        fn create_network_monitor(&self) -> NetworkMonitorHandle {
            unsafe { ffi::rtc_network_monitor_create() }
        }

        fn collect_stats(&self, peer: PeerConnectionHandle, request: StatsRequest) {
            let user_data = request.into_raw();
            unsafe {
                ffi::rtc_peer_connection_get_stats(
                    peer,
                    Some(ffi::rtc_bridge_stats_delivered),
                    user_data,
                );
            }
        }

        fn release(&self, kind: HandleKind, raw: u64) -> Result<()> {
            let code = unsafe {
                match kind {
                    HandleKind::VideoDecoder => {
                        ffi::rtc_video_decoder_free(VideoDecoderHandle::from_raw(raw))
                    }
                    HandleKind::NetEqFactory => {
                        ffi::rtc_neteq_factory_free(NetEqFactoryHandle::from_raw(raw))
                    }
                    HandleKind::NetworkMonitor => {
                        ffi::rtc_network_monitor_free(NetworkMonitorHandle::from_raw(raw))
                    }
                }
            };
            ffi::check_status(code, kind, raw)
        }
    }
}
