//! Rust components for a native WebRTC media engine.
//!
//! The engine builds its media pipelines natively but asks the application
//! for a few pieces along the way: software video decoders, a NetEq factory
//! for audio jitter buffering, a network change detector, and a place to send
//! stats reports. This crate supplies those pieces and keeps native handle
//! ownership straight on the Rust side: every native object is released
//! through its destroy path exactly once, or handed to the engine, never both.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rtcbridge::{
//!     Bridge, BridgeConfig, ComponentRequest, EnvironmentHandle, LoopbackEngine,
//!     PeerConnectionHandle,
//! };
//!
//! fn main() -> rtcbridge::Result<()> {
//!     let config = BridgeConfig::from_toml_str(
//!         r#"
//!         [video]
//!         decoder_preference = ["av1", "vp9", "vp8"]
//!         "#,
//!     )?;
//!     let bridge = Bridge::new(Arc::new(LoopbackEngine::new()), config);
//!
//!     // Decoders: first supported codec wins.
//!     let env = EnvironmentHandle::from_raw(1);
//!     if let Some((codec, decoder)) = bridge.video_decoder_factory().create_preferred(env) {
//!         println!("decoding {} with {:?}", codec, decoder);
//!     }
//!
//!     // NetEq: ownership goes to the engine.
//!     if let Some(component) = bridge.create_component(ComponentRequest::NetEqFactory) {
//!         if let Ok(handle) = component.into_native_raw() {
//!             println!("NetEq factory handle: {:#x}", handle.as_raw());
//!         }
//!     }
//!
//!     // Stats
//!     let report = bridge
//!         .stats_collector(PeerConnectionHandle::from_raw(1))
//!         .get_stats_channel()
//!         .recv();
//!     println!("{:?}", report);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Native engine
//!
//! With the `native` feature the crate links the engine library and
//! [`LinkedEngine`] forwards to it. Without it, [`LoopbackEngine`] stands in
//! for the engine in-process. Either way the C entry points the engine calls
//! back into live in [`ffi`].

pub mod audio;
pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod handle;
pub mod loopback;
pub mod network;
pub mod stats;
pub mod types;
pub mod video;

// Re-export main types at the crate root
pub use audio::{BuiltinNetEqFactoryFactory, NetEqFactoryFactory};
pub use bridge::{Bridge, Component, ComponentRequest};
pub use config::{
    AudioConfig, BridgeConfig, DetectorSelection, NetEqSelection, NetworkConfig, VideoConfig,
};
#[cfg(feature = "native")]
pub use engine::LinkedEngine;
pub use engine::NativeEngine;
pub use error::{Error, Result};
pub use handle::{
    EnvironmentHandle, HandleKind, NativeObject, NetEqFactoryHandle, NetworkMonitorHandle, Owned,
    PeerConnectionHandle, VideoDecoderHandle,
};
pub use loopback::{LoopbackEngine, SimulatedConnectivity};
pub use network::{
    ConnectivitySource, DefaultNetworkChangeDetectorFactory, MonitoringDetector,
    NetworkChangeDetector, NetworkChangeDetectorFactory, NetworkChangeObserver, NetworkEvent,
    NetworkEventSink, PlatformContext,
};
pub use stats::{RtcStats, RtcStatsCollectorCallback, RtcStatsReport, StatsCollector, StatsRequest};
pub use types::{ConnectionType, NetworkId, NetworkInformation, NetworkPreference, VideoCodec};
pub use video::{
    Dav1dDecoder, LibvpxVp8Decoder, LibvpxVp9Decoder, VideoDecoderFactory,
    WrappedNativeVideoDecoder,
};

/// API version constants.
pub mod version {
    /// API major version.
    pub const MAJOR: i32 = 0;
    /// API minor version.
    pub const MINOR: i32 = 1;
    /// API patch version.
    pub const PATCH: i32 = 0;
}

/// Get the API version string (e.g., "0.1.0").
pub fn api_version() -> String {
    format!("{}.{}.{}", version::MAJOR, version::MINOR, version::PATCH)
}

/// Check if this crate is compatible with glue compiled against the given
/// version.
///
/// Same major version, and a minor version no newer than ours.
pub fn api_version_compatible(major: i32, minor: i32) -> bool {
    major == version::MAJOR && minor <= version::MINOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_version() {
        assert_eq!(api_version(), "0.1.0");
        assert_eq!(api_version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_api_version_compatible() {
        assert!(api_version_compatible(0, 1));
        assert!(api_version_compatible(0, 0));
        assert!(!api_version_compatible(1, 0));
        assert!(!api_version_compatible(0, 99));
    }
}
