//! Stats collection against a peer connection.

use std::sync::mpsc;
use std::sync::Arc;

use log::debug;

use super::callback::RtcStatsCollectorCallback;
use super::report::RtcStatsReport;
use super::request::StatsRequest;
use crate::engine::NativeEngine;
use crate::handle::PeerConnectionHandle;

/// Issues stats requests for one peer connection.
///
/// Each call produces one independent request; concurrent requests complete
/// in no particular order.
///
/// # Example
///
/// ```no_run
/// # use rtcbridge::{PeerConnectionHandle, StatsCollector};
/// # fn example(collector: &StatsCollector) {
/// collector.get_stats(|report: rtcbridge::RtcStatsReport| {
///     for stats in report.stats_of_type("inbound-rtp") {
///         println!("{}: {:?}", stats.id, stats.member("packetsLost"));
///     }
/// });
/// # }
/// ```
#[derive(Clone)]
pub struct StatsCollector {
    engine: Arc<dyn NativeEngine>,
    peer: PeerConnectionHandle,
}

impl StatsCollector {
    /// Collect from `peer`. The peer connection stays owned by the engine.
    pub fn new(engine: Arc<dyn NativeEngine>, peer: PeerConnectionHandle) -> Self {
        Self { engine, peer }
    }

    /// Peer connection this collector targets.
    pub fn peer(&self) -> PeerConnectionHandle {
        self.peer
    }

    /// Request a report; `callback` runs once on an engine thread.
    pub fn get_stats<C>(&self, callback: C)
    where
        C: RtcStatsCollectorCallback + 'static,
    {
        let request = StatsRequest::new(Box::new(callback));
        debug!(
            "requesting stats {} from peer connection {:#x}",
            request.id(),
            self.peer.as_raw()
        );
        self.engine.collect_stats(self.peer, request);
    }

    /// Request a report and receive it on a channel.
    pub fn get_stats_channel(&self) -> mpsc::Receiver<RtcStatsReport> {
        let (tx, rx) = mpsc::sync_channel(1);
        self.get_stats(move |report: RtcStatsReport| {
            let _ = tx.send(report);
        });
        rx
    }
}
