//! Network change detection.
//!
//! The native engine asks a [`NetworkChangeDetectorFactory`] for a detector,
//! passing an observer it wants notified. The detector watches the platform
//! through the [`PlatformContext`] and forwards each change to the observer
//! until [`NetworkChangeDetector::stop`].

mod detector;
mod dispatch;
mod observer;
mod platform;

pub use detector::{
    into_native_raw, DefaultNetworkChangeDetectorFactory, MonitoringDetector, NetworkChangeDetector,
    NetworkChangeDetectorFactory,
};
pub use dispatch::NetworkEventSink;
pub use observer::{NetworkChangeObserver, NetworkEvent};
pub use platform::{ConnectivitySource, PlatformContext, SubscriptionId};
