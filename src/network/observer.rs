use crate::types::{ConnectionType, NetworkId, NetworkInformation, NetworkPreference};

/// Receives network changes from a
/// [`NetworkChangeDetector`](super::NetworkChangeDetector).
///
/// Methods are called on whichever thread the platform reports on, one at a
/// time per detector, in the order the platform reported them. They must
/// return promptly. Calling [`stop`](super::NetworkChangeDetector::stop) on the
/// detector from inside a callback is allowed.
pub trait NetworkChangeObserver: Send + Sync {
    /// The default connection type changed.
    fn on_connection_type_changed(&self, connection_type: ConnectionType);

    /// A network became available.
    fn on_network_connect(&self, network: NetworkInformation);

    /// A network went away.
    fn on_network_disconnect(&self, network_id: NetworkId);

    /// The platform changed its preference for some connection types.
    fn on_network_preference(&self, types: Vec<ConnectionType>, preference: NetworkPreference);
}

/// One platform network change, as queued for an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// See [`NetworkChangeObserver::on_connection_type_changed`].
    ConnectionTypeChanged(ConnectionType),
    /// See [`NetworkChangeObserver::on_network_connect`].
    Connect(NetworkInformation),
    /// See [`NetworkChangeObserver::on_network_disconnect`].
    Disconnect(NetworkId),
    /// See [`NetworkChangeObserver::on_network_preference`].
    Preference {
        /// Affected connection types.
        types: Vec<ConnectionType>,
        /// New preference.
        preference: NetworkPreference,
    },
}

impl NetworkEvent {
    /// Invoke the matching observer method.
    pub fn dispatch(self, observer: &dyn NetworkChangeObserver) {
        match self {
            NetworkEvent::ConnectionTypeChanged(kind) => observer.on_connection_type_changed(kind),
            NetworkEvent::Connect(network) => observer.on_network_connect(network),
            NetworkEvent::Disconnect(id) => observer.on_network_disconnect(id),
            NetworkEvent::Preference { types, preference } => {
                observer.on_network_preference(types, preference)
            }
        }
    }
}
