//! Platform connectivity, supplied by the application.

use std::fmt;
use std::sync::Arc;

use super::dispatch::NetworkEventSink;
use crate::types::{ConnectionType, NetworkInformation};

/// Identifies one registration with a [`ConnectivitySource`].
pub type SubscriptionId = u64;

/// The platform's connectivity API (Android `ConnectivityManager`, netlink,
/// `SCNetworkReachability`, ...), as seen by a detector.
pub trait ConnectivitySource: Send + Sync {
    /// Current default connection type.
    fn current_connection_type(&self) -> ConnectionType;

    /// Networks currently up.
    fn active_networks(&self) -> Vec<NetworkInformation>;

    /// Whether per-network callbacks are available, as opposed to only
    /// default-route changes.
    fn supports_network_callback(&self) -> bool {
        false
    }

    /// Start pushing events into `sink`.
    fn register(&self, sink: NetworkEventSink) -> SubscriptionId;

    /// Stop pushing events for a registration. Unknown ids are ignored.
    fn unregister(&self, id: SubscriptionId);
}

/// Platform context handed to a
/// [`NetworkChangeDetectorFactory`](super::NetworkChangeDetectorFactory).
#[derive(Clone)]
pub struct PlatformContext {
    connectivity: Arc<dyn ConnectivitySource>,
}

impl PlatformContext {
    /// Wrap the platform's connectivity source.
    pub fn new(connectivity: Arc<dyn ConnectivitySource>) -> Self {
        Self { connectivity }
    }

    /// The connectivity source.
    pub fn connectivity(&self) -> &Arc<dyn ConnectivitySource> {
        &self.connectivity
    }
}

impl fmt::Debug for PlatformContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformContext").finish_non_exhaustive()
    }
}
