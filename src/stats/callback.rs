use super::report::RtcStatsReport;

/// Receives stats reports (see `webrtc::RTCStatsCollectorCallback`).
///
/// Called exactly once per request, on a native engine thread. The report is
/// already fully converted. Implementations must return promptly; hand heavy
/// work off to another thread.
pub trait RtcStatsCollectorCallback: Send + Sync {
    /// Called when the stats report is ready.
    fn on_stats_delivered(&self, report: RtcStatsReport);
}

impl<F> RtcStatsCollectorCallback for F
where
    F: Fn(RtcStatsReport) + Send + Sync,
{
    fn on_stats_delivered(&self, report: RtcStatsReport) {
        self(report)
    }
}
