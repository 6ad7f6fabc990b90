//! Stats collection tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use rtcbridge::{
    LoopbackEngine, PeerConnectionHandle, RtcStatsCollectorCallback, RtcStatsReport,
    StatsCollector,
};

const TIMEOUT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(200);

const REPORT_JSON: &str = r#"[
    {"id": "IT01A", "type": "inbound-rtp", "timestamp": 1000.0,
     "kind": "audio", "packetsReceived": 480, "jitter": 0.004},
    {"id": "CP01", "type": "candidate-pair", "timestamp": 1000.0,
     "state": "succeeded", "nominated": true}
]"#;

fn engine_with_stats() -> Arc<LoopbackEngine> {
    Arc::new(LoopbackEngine::new().with_stats(|peer| {
        if peer.as_raw() == 1 {
            RtcStatsReport::from_json(1000, REPORT_JSON).ok()
        } else {
            None
        }
    }))
}

#[test]
fn test_report_is_delivered() {
    let collector = StatsCollector::new(engine_with_stats(), PeerConnectionHandle::from_raw(1));

    let report = collector
        .get_stats_channel()
        .recv_timeout(TIMEOUT)
        .expect("report should arrive");

    assert_eq!(report.len(), 2);
    assert_eq!(report.timestamp_us(), 1000);
    let inbound: Vec<_> = report.stats_of_type("inbound-rtp").collect();
    assert_eq!(inbound.len(), 1);
    assert_eq!(inbound[0].id, "IT01A");
    assert_eq!(
        inbound[0].member("packetsReceived").and_then(|v| v.as_u64()),
        Some(480)
    );
    let pair = report.get("CP01").expect("candidate pair should be present");
    assert_eq!(pair.member("state").and_then(|v| v.as_str()), Some("succeeded"));
}

#[test]
fn test_no_data_delivers_empty_report_once() {
    let collector = StatsCollector::new(engine_with_stats(), PeerConnectionHandle::from_raw(2));
    let (tx, rx) = mpsc::sync_channel(4);
    collector.get_stats(move |report: RtcStatsReport| {
        tx.send(report).unwrap();
    });

    let report = rx.recv_timeout(TIMEOUT).expect("empty report should arrive");
    assert!(report.is_empty());
    assert!(
        rx.recv_timeout(QUIET).is_err(),
        "callback must run exactly once"
    );
}

#[test]
fn test_invalid_peer_delivers_empty_report() {
    let collector =
        StatsCollector::new(engine_with_stats(), PeerConnectionHandle::invalid());
    let report = collector.get_stats_channel().recv_timeout(TIMEOUT).unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_engine_without_stats_source() {
    let collector = StatsCollector::new(
        Arc::new(LoopbackEngine::new()),
        PeerConnectionHandle::from_raw(1),
    );
    let report = collector.get_stats_channel().recv_timeout(TIMEOUT).unwrap();
    assert!(report.is_empty());
}

#[test]
fn test_concurrent_requests_each_complete_once() {
    let collector = StatsCollector::new(engine_with_stats(), PeerConnectionHandle::from_raw(1));
    let (tx, rx) = mpsc::sync_channel(8);

    let requesters: Vec<_> = (0..2)
        .map(|tag| {
            let collector = collector.clone();
            let tx = tx.clone();
            thread::spawn(move || {
                collector.get_stats(move |report: RtcStatsReport| {
                    tx.send((tag, report.len())).unwrap();
                });
            })
        })
        .collect();
    for requester in requesters {
        requester.join().expect("requesting thread should not panic");
    }
    drop(tx);

    let mut tags = Vec::new();
    for _ in 0..2 {
        let (tag, len) = rx.recv_timeout(TIMEOUT).expect("both reports should arrive");
        assert_eq!(len, 2);
        tags.push(tag);
    }
    tags.sort();
    assert_eq!(tags, vec![0, 1]);

    // All senders gone once both callbacks ran and were dropped.
    assert!(rx.recv_timeout(TIMEOUT).is_err());
}

struct CountingCallback {
    calls: Arc<AtomicUsize>,
    done: mpsc::SyncSender<()>,
}

impl RtcStatsCollectorCallback for CountingCallback {
    fn on_stats_delivered(&self, _report: RtcStatsReport) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.done.send(());
    }
}

#[test]
fn test_callback_object() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (done, rx) = mpsc::sync_channel(4);
    let collector = StatsCollector::new(engine_with_stats(), PeerConnectionHandle::from_raw(1));

    collector.get_stats(CountingCallback {
        calls: calls.clone(),
        done,
    });

    rx.recv_timeout(TIMEOUT).unwrap();
    assert!(rx.recv_timeout(QUIET).is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
