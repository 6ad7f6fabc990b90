//! Network change detector tests.

use std::sync::{Arc, Mutex};
use std::thread;

use rtcbridge::{
    ConnectionType, DefaultNetworkChangeDetectorFactory, LoopbackEngine, MonitoringDetector,
    NetworkChangeDetector, NetworkChangeDetectorFactory, NetworkChangeObserver, NetworkEvent,
    NetworkId, NetworkInformation, NetworkPreference, PlatformContext, SimulatedConnectivity,
};

/// Records every callback as the event that caused it.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<NetworkEvent>>,
}

impl Recorder {
    fn events(&self) -> Vec<NetworkEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl NetworkChangeObserver for Recorder {
    fn on_connection_type_changed(&self, connection_type: ConnectionType) {
        self.events
            .lock()
            .unwrap()
            .push(NetworkEvent::ConnectionTypeChanged(connection_type));
    }

    fn on_network_connect(&self, network: NetworkInformation) {
        self.events.lock().unwrap().push(NetworkEvent::Connect(network));
    }

    fn on_network_disconnect(&self, network_id: NetworkId) {
        self.events.lock().unwrap().push(NetworkEvent::Disconnect(network_id));
    }

    fn on_network_preference(&self, types: Vec<ConnectionType>, preference: NetworkPreference) {
        self.events
            .lock()
            .unwrap()
            .push(NetworkEvent::Preference { types, preference });
    }
}

fn setup() -> (Arc<LoopbackEngine>, Arc<SimulatedConnectivity>, PlatformContext) {
    let engine = Arc::new(LoopbackEngine::new());
    let connectivity = Arc::new(SimulatedConnectivity::new(ConnectionType::Ethernet));
    let context = PlatformContext::new(connectivity.clone());
    (engine, connectivity, context)
}

#[test]
fn test_events_stop_after_stop() {
    let (engine, connectivity, context) = setup();
    let factory = DefaultNetworkChangeDetectorFactory::new(engine.clone());
    let recorder = Arc::new(Recorder::default());

    let detector = factory
        .create(recorder.clone(), &context)
        .expect("detector should be created");
    assert!(detector.is_active());
    assert_eq!(engine.live_handles(), 1, "detector should own a monitor");

    let wifi = NetworkInformation::new("wlan0", 7, ConnectionType::Wifi)
        .with_address("10.0.0.2".parse().unwrap());
    assert_eq!(connectivity.emit(NetworkEvent::Connect(wifi.clone())), 1);
    assert_eq!(
        connectivity.emit(NetworkEvent::ConnectionTypeChanged(ConnectionType::Wifi)),
        1
    );

    detector.stop();
    assert!(!detector.is_active());
    assert_eq!(engine.live_handles(), 0, "stop should release the monitor");
    assert_eq!(connectivity.subscriber_count(), 0);

    assert_eq!(connectivity.emit(NetworkEvent::Disconnect(7)), 0);
    assert_eq!(
        connectivity.emit(NetworkEvent::ConnectionTypeChanged(ConnectionType::None)),
        0
    );

    assert_eq!(
        recorder.events(),
        vec![
            NetworkEvent::Connect(wifi),
            NetworkEvent::ConnectionTypeChanged(ConnectionType::Wifi),
        ]
    );

    // Idempotent, and drop after stop releases nothing further.
    detector.stop();
    drop(detector);
    assert_eq!(engine.released_count(), 1);
}

#[test]
fn test_events_arrive_in_order() {
    let (engine, connectivity, context) = setup();
    let recorder = Arc::new(Recorder::default());
    let _detector = DefaultNetworkChangeDetectorFactory::new(engine)
        .create(recorder.clone(), &context)
        .unwrap();

    let sent = vec![
        NetworkEvent::ConnectionTypeChanged(ConnectionType::Cellular4g),
        NetworkEvent::Preference {
            types: vec![ConnectionType::Cellular4g, ConnectionType::Cellular3g],
            preference: NetworkPreference::NotPreferred,
        },
        NetworkEvent::Connect(NetworkInformation::new("rmnet0", 3, ConnectionType::Cellular4g)),
        NetworkEvent::Disconnect(3),
        NetworkEvent::ConnectionTypeChanged(ConnectionType::Wifi),
    ];
    for event in &sent {
        connectivity.emit(event.clone());
    }

    assert_eq!(recorder.events(), sent);
}

#[test]
fn test_detector_reports_platform_state() {
    let (engine, connectivity, context) = setup();
    let recorder = Arc::new(Recorder::default());
    let detector = DefaultNetworkChangeDetectorFactory::new(engine)
        .create(recorder.clone(), &context)
        .unwrap();

    assert_eq!(detector.current_connection_type(), ConnectionType::Ethernet);
    assert!(detector.supports_network_callback());
    assert!(detector.active_network_list().is_empty());

    connectivity.emit(NetworkEvent::Connect(NetworkInformation::new(
        "eth0",
        1,
        ConnectionType::Ethernet,
    )));
    let networks = detector.active_network_list();
    assert_eq!(networks.len(), 1);
    assert_eq!(networks[0].name, "eth0");
}

/// Observer that stops its own detector on the first event.
struct StopOnFirstEvent {
    detector: Mutex<Option<Arc<MonitoringDetector>>>,
    seen: Mutex<Vec<ConnectionType>>,
}

impl NetworkChangeObserver for StopOnFirstEvent {
    fn on_connection_type_changed(&self, connection_type: ConnectionType) {
        self.seen.lock().unwrap().push(connection_type);
        let detector = self.detector.lock().unwrap().clone();
        if let Some(detector) = detector {
            detector.stop();
        }
    }

    fn on_network_connect(&self, _network: NetworkInformation) {}

    fn on_network_disconnect(&self, _network_id: NetworkId) {}

    fn on_network_preference(&self, _types: Vec<ConnectionType>, _preference: NetworkPreference) {}
}

#[test]
fn test_stop_from_inside_callback() {
    let (engine, connectivity, context) = setup();
    let observer = Arc::new(StopOnFirstEvent {
        detector: Mutex::new(None),
        seen: Mutex::new(Vec::new()),
    });
    let as_observer: Arc<dyn NetworkChangeObserver> = observer.clone();

    let detector = Arc::new(
        MonitoringDetector::start(engine.clone(), &as_observer, context)
            .expect("detector should start"),
    );
    *observer.detector.lock().unwrap() = Some(detector.clone());

    connectivity.emit(NetworkEvent::ConnectionTypeChanged(ConnectionType::Wifi));
    connectivity.emit(NetworkEvent::ConnectionTypeChanged(ConnectionType::Ethernet));

    assert_eq!(*observer.seen.lock().unwrap(), vec![ConnectionType::Wifi]);
    assert!(!detector.is_active());
    assert!(detector.monitor_handle().is_none());
    assert_eq!(engine.live_handles(), 0);
    assert_eq!(connectivity.subscriber_count(), 0);

    // Break the observer -> detector cycle.
    observer.detector.lock().unwrap().take();
}

#[test]
fn test_dropped_observer_is_not_called() {
    let (engine, connectivity, context) = setup();
    let recorder: Arc<dyn NetworkChangeObserver> = Arc::new(Recorder::default());
    let detector = DefaultNetworkChangeDetectorFactory::new(engine.clone())
        .create(recorder.clone(), &context)
        .unwrap();

    drop(recorder);
    assert_eq!(
        connectivity.emit(NetworkEvent::ConnectionTypeChanged(ConnectionType::Wifi)),
        0
    );
    assert!(!detector.is_active());
    assert_eq!(connectivity.subscriber_count(), 0, "refusing sink should be pruned");

    // The native monitor is still owned until the detector goes away.
    assert_eq!(engine.live_handles(), 1);
    drop(detector);
    assert_eq!(engine.live_handles(), 0);
}

#[test]
fn test_no_monitor_means_no_detector() {
    let engine = Arc::new(LoopbackEngine::new().without_network_monitor());
    let connectivity = Arc::new(SimulatedConnectivity::default());
    let context = PlatformContext::new(connectivity.clone());
    let recorder = Arc::new(Recorder::default());

    let detector = DefaultNetworkChangeDetectorFactory::new(engine).create(recorder, &context);
    assert!(detector.is_none());
    assert_eq!(connectivity.subscriber_count(), 0);
}

#[test]
fn test_nothing_delivered_once_stop_returns() {
    let (engine, connectivity, context) = setup();
    let recorder = Arc::new(Recorder::default());
    let as_observer: Arc<dyn NetworkChangeObserver> = recorder.clone();
    let detector = Arc::new(MonitoringDetector::start(engine, &as_observer, context).unwrap());

    let emitter = {
        let connectivity = connectivity.clone();
        thread::spawn(move || {
            for i in 0..2000 {
                connectivity.emit(NetworkEvent::Disconnect(i));
            }
        })
    };

    while detector.delivered_events() < 10 {
        thread::yield_now();
    }
    detector.stop();
    let at_stop = recorder.events().len();

    emitter.join().unwrap();
    assert_eq!(recorder.events().len(), at_stop);
    assert_eq!(detector.delivered_events() as usize, at_stop);

    // Whatever got through did so in order.
    let ids: Vec<NetworkId> = recorder
        .events()
        .into_iter()
        .map(|e| match e {
            NetworkEvent::Disconnect(id) => id,
            other => panic!("unexpected event {:?}", other),
        })
        .collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_two_detectors_are_independent() {
    let (engine, connectivity, context) = setup();
    let factory = DefaultNetworkChangeDetectorFactory::new(engine.clone());
    let first = Arc::new(Recorder::default());
    let second = Arc::new(Recorder::default());

    let a = factory.create(first.clone(), &context).unwrap();
    let _b = factory.create(second.clone(), &context).unwrap();
    assert_eq!(connectivity.subscriber_count(), 2);

    connectivity.emit(NetworkEvent::ConnectionTypeChanged(ConnectionType::Wifi));
    a.stop();
    connectivity.emit(NetworkEvent::ConnectionTypeChanged(ConnectionType::Vpn));

    assert_eq!(first.events().len(), 1);
    assert_eq!(second.events().len(), 2);
    assert_eq!(engine.live_handles(), 1);
}
