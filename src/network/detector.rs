//! Network change detectors.

use std::ffi::c_void;
use std::sync::Arc;

use log::{debug, error, info, warn};
use parking_lot::Mutex;

use super::dispatch::NetworkEventSink;
use super::observer::NetworkChangeObserver;
use super::platform::{PlatformContext, SubscriptionId};
use crate::engine::NativeEngine;
use crate::handle::{NetworkMonitorHandle, Owned};
use crate::types::{ConnectionType, NetworkInformation};

/// Watches the platform and reports changes to an observer.
pub trait NetworkChangeDetector: Send + Sync {
    /// Current default connection type.
    fn current_connection_type(&self) -> ConnectionType;

    /// Whether the platform reports individual networks.
    fn supports_network_callback(&self) -> bool;

    /// Networks currently up.
    fn active_network_list(&self) -> Vec<NetworkInformation>;

    /// Stop watching. Idempotent.
    ///
    /// After this returns no further events reach the observer, and any
    /// native state the detector owns has been released.
    fn stop(&self);

    /// Whether the detector still delivers events.
    fn is_active(&self) -> bool;
}

/// Creates network change detectors on behalf of the native engine.
pub trait NetworkChangeDetectorFactory: Send + Sync {
    /// Create a detector that reports to `observer`.
    ///
    /// The detector holds only a weak reference to `observer`; whoever wants
    /// the events keeps it alive. Returns `None` if the detector could not be
    /// set up.
    fn create(
        &self,
        observer: Arc<dyn NetworkChangeObserver>,
        context: &PlatformContext,
    ) -> Option<Box<dyn NetworkChangeDetector>>;
}

/// Detector that forwards a [`ConnectivitySource`](super::ConnectivitySource)
/// to an observer, backed by a native network monitor.
pub struct MonitoringDetector {
    sink: NetworkEventSink,
    context: PlatformContext,
    subscription: SubscriptionId,
    monitor: Mutex<Option<Owned<NetworkMonitorHandle>>>,
}

impl MonitoringDetector {
    /// Create the native monitor and register with the platform.
    ///
    /// Returns `None` when the engine cannot create a monitor.
    pub fn start(
        engine: Arc<dyn NativeEngine>,
        observer: &Arc<dyn NetworkChangeObserver>,
        context: PlatformContext,
    ) -> Option<Self> {
        let monitor = match Owned::adopt(engine.create_network_monitor(), engine) {
            Some(monitor) => monitor,
            None => {
                warn!("native network monitor unavailable");
                return None;
            }
        };
        let sink = NetworkEventSink::new(Arc::downgrade(observer));
        let subscription = context.connectivity().register(sink.clone());
        info!(
            "network change detector started (monitor {:#x}, subscription {})",
            monitor.handle().as_raw(),
            subscription
        );
        Some(Self {
            sink,
            context,
            subscription,
            monitor: Mutex::new(Some(monitor)),
        })
    }

    /// The native monitor, while the detector is running.
    pub fn monitor_handle(&self) -> Option<NetworkMonitorHandle> {
        self.monitor.lock().as_ref().map(|m| m.handle())
    }

    /// Events delivered to the observer so far.
    pub fn delivered_events(&self) -> u64 {
        self.sink.delivered()
    }
}

impl NetworkChangeDetector for MonitoringDetector {
    fn current_connection_type(&self) -> ConnectionType {
        self.context.connectivity().current_connection_type()
    }

    fn supports_network_callback(&self) -> bool {
        self.context.connectivity().supports_network_callback()
    }

    fn active_network_list(&self) -> Vec<NetworkInformation> {
        self.context.connectivity().active_networks()
    }

    fn stop(&self) {
        // Waits for an in-flight event; nothing is delivered after this.
        self.sink.deactivate();

        let monitor = self.monitor.lock().take();
        if let Some(monitor) = monitor {
            self.context.connectivity().unregister(self.subscription);
            let raw = monitor.handle().as_raw();
            match monitor.release() {
                Ok(()) => info!("network change detector stopped (monitor {:#x})", raw),
                Err(e) => error!("failed to release network monitor {:#x}: {}", raw, e),
            }
        } else {
            debug!("network change detector already stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.sink.is_active()
    }
}

impl Drop for MonitoringDetector {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Factory for [`MonitoringDetector`]s.
pub struct DefaultNetworkChangeDetectorFactory {
    engine: Arc<dyn NativeEngine>,
}

impl DefaultNetworkChangeDetectorFactory {
    /// Detectors will create their monitors through `engine`.
    pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
        Self { engine }
    }
}

impl NetworkChangeDetectorFactory for DefaultNetworkChangeDetectorFactory {
    fn create(
        &self,
        observer: Arc<dyn NetworkChangeObserver>,
        context: &PlatformContext,
    ) -> Option<Box<dyn NetworkChangeDetector>> {
        MonitoringDetector::start(self.engine.clone(), &observer, context.clone())
            .map(|d| Box::new(d) as Box<dyn NetworkChangeDetector>)
    }
}

/// Box a detector factory, with the platform context its detectors watch, for
/// the native engine.
///
/// The engine creates detectors through
/// `rtc_bridge_network_detector_factory_create` and frees the factory with
/// `rtc_bridge_network_detector_factory_free`.
pub fn into_native_raw(
    factory: Arc<dyn NetworkChangeDetectorFactory>,
    context: PlatformContext,
) -> *mut c_void {
    let boxed: Box<crate::ffi::callbacks::NativeDetectorFactory> = Box::new((factory, context));
    Box::into_raw(boxed) as *mut c_void
}
