//! Basic example wiring the bridge to the in-process loopback engine.
//!
//! Run with: RUST_LOG=debug cargo run --example basic [config.toml]

use std::sync::Arc;
use std::time::Duration;

use rtcbridge::{
    Bridge, BridgeConfig, ComponentRequest, ConnectionType, EnvironmentHandle, LoopbackEngine,
    NativeEngine, NetworkChangeObserver, NetworkEvent, NetworkId, NetworkInformation,
    NetworkPreference, PeerConnectionHandle, PlatformContext, RtcStatsReport,
    SimulatedConnectivity, VideoCodec,
};

struct PrintingObserver;

impl NetworkChangeObserver for PrintingObserver {
    fn on_connection_type_changed(&self, connection_type: ConnectionType) {
        println!("  connection type -> {:?}", connection_type);
    }

    fn on_network_connect(&self, network: NetworkInformation) {
        println!(
            "  network up: {} (id {}, {:?}, {:?})",
            network.name, network.id, network.connection_type, network.ip_addresses
        );
    }

    fn on_network_disconnect(&self, network_id: NetworkId) {
        println!("  network down: {}", network_id);
    }

    fn on_network_preference(&self, types: Vec<ConnectionType>, preference: NetworkPreference) {
        println!("  preference {:?} for {:?}", preference, types);
    }
}

fn main() -> rtcbridge::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };

    println!("API Version: {}", rtcbridge::api_version());

    // No AV1 in this engine build, and some stats for peer connection 1.
    let engine = Arc::new(
        LoopbackEngine::new()
            .with_video_codecs(&[VideoCodec::Vp8, VideoCodec::Vp9])
            .with_stats(|peer| {
                if peer.as_raw() != 1 {
                    return None;
                }
                RtcStatsReport::from_json(
                    1_700_000_000_000_000,
                    r#"[
                        {"id": "IT01V", "type": "inbound-rtp", "timestamp": 1.7e15,
                         "kind": "video", "packetsReceived": 1200, "packetsLost": 3},
                        {"id": "T01", "type": "transport", "timestamp": 1.7e15,
                         "bytesSent": 48213, "bytesReceived": 913377}
                    ]"#,
                )
                .ok()
            }),
    );
    let bridge = Bridge::new(engine.clone(), config);

    println!("\n--- Video decoders ---");
    let decoders = bridge.video_decoder_factory();
    for codec in [VideoCodec::Vp8, VideoCodec::Vp9, VideoCodec::Av1] {
        let supported = decoders
            .decoder(codec)
            .map(|d| d.is_supported())
            .unwrap_or(false);
        println!("{}: {}", codec, if supported { "supported" } else { "not available" });
    }
    let env = EnvironmentHandle::from_raw(1);
    match decoders.create_preferred(env) {
        Some((codec, decoder)) => {
            println!("Selected {} decoder {:#x}", codec, decoder.handle().as_raw());
            decoder.release()?;
        }
        None => println!("No software decoder available"),
    }

    println!("\n--- NetEq ---");
    match bridge.create_component(ComponentRequest::NetEqFactory) {
        Some(component) => match component.into_native_raw() {
            Ok(handle) => {
                println!("Handed NetEq factory {:#x} to the engine", handle.as_raw());
                // The engine owns it now and destroys it itself.
                bridge
                    .engine()
                    .release(rtcbridge::HandleKind::NetEqFactory, handle.as_raw())?;
            }
            Err(other) => println!("Unexpected component: {:?}", other),
        },
        None => println!("NetEq factory disabled"),
    }

    println!("\n--- Network change detection ---");
    let connectivity = Arc::new(SimulatedConnectivity::new(ConnectionType::Wifi));
    let request = ComponentRequest::NetworkChangeDetector {
        observer: Arc::new(PrintingObserver),
        context: PlatformContext::new(connectivity.clone()),
    };
    if let Some(component) = bridge.create_component(request) {
        if let Some(detector) = component.as_detector() {
            println!(
                "Current connection: {:?}",
                detector.current_connection_type()
            );
            connectivity.emit(NetworkEvent::Connect(
                NetworkInformation::new("wlan0", 101, ConnectionType::Wifi)
                    .with_address("192.168.1.20".parse().expect("valid address")),
            ));
            connectivity.emit(NetworkEvent::ConnectionTypeChanged(ConnectionType::Cellular4g));
            connectivity.emit(NetworkEvent::Preference {
                types: vec![ConnectionType::Cellular4g],
                preference: NetworkPreference::NotPreferred,
            });
            detector.stop();
            let delivered = connectivity.emit(NetworkEvent::Disconnect(101));
            println!("After stop, event reached {} observers", delivered);
        }
    } else {
        println!("Network change detection disabled");
    }

    println!("\n--- Stats ---");
    for peer in [1, 2] {
        let rx = bridge
            .stats_collector(PeerConnectionHandle::from_raw(peer))
            .get_stats_channel();
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(report) if report.is_empty() => println!("peer {}: no stats", peer),
            Ok(report) => {
                println!("peer {}: {} objects", peer, report.len());
                for stats in report.iter() {
                    println!("  {} ({})", stats.id, stats.kind);
                }
            }
            Err(e) => println!("peer {}: {}", peer, e),
        }
    }

    println!("\nLive native handles: {}", engine.live_handles());
    Ok(())
}
