//! In-flight stats requests.

use std::ffi::c_void;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

use super::callback::RtcStatsCollectorCallback;
use super::report::RtcStatsReport;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// One outstanding stats request.
///
/// Completing it consumes it, so a request can only be delivered once. A
/// request that is dropped without being delivered completes with an empty
/// report instead, so the callback never goes silent.
pub struct StatsRequest {
    id: u64,
    callback: Option<Box<dyn RtcStatsCollectorCallback>>,
}

impl StatsRequest {
    /// Create a request that will complete into `callback`.
    pub fn new(callback: Box<dyn RtcStatsCollectorCallback>) -> Self {
        Self {
            id: NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed),
            callback: Some(callback),
        }
    }

    /// Request id, unique within the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Complete the request.
    pub fn deliver(mut self, report: RtcStatsReport) {
        self.complete(report);
    }

    /// Hand the request to native code as a `user_data` pointer.
    ///
    /// The pointer must come back exactly once through
    /// [`StatsRequest::from_raw`] (the `rtc_bridge_stats_delivered`
    /// trampoline does this); otherwise the callback is never invoked.
    pub fn into_raw(self) -> *mut c_void {
        debug!("stats request {} handed to native", self.id);
        Box::into_raw(Box::new(self)) as *mut c_void
    }

    /// Reclaim a request from a `user_data` pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`StatsRequest::into_raw`] and must not have been
    /// reclaimed before.
    pub unsafe fn from_raw(ptr: *mut c_void) -> StatsRequest {
        *Box::from_raw(ptr as *mut StatsRequest)
    }

    fn complete(&mut self, report: RtcStatsReport) {
        if let Some(callback) = self.callback.take() {
            debug!(
                "stats request {} delivered ({} objects)",
                self.id,
                report.len()
            );
            callback.on_stats_delivered(report);
        }
    }
}

impl Drop for StatsRequest {
    fn drop(&mut self) {
        if self.callback.is_some() {
            warn!("stats request {} dropped without data, delivering empty report", self.id);
            self.complete(RtcStatsReport::default());
        }
    }
}

impl fmt::Debug for StatsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsRequest")
            .field("id", &self.id)
            .field("pending", &self.callback.is_some())
            .finish()
    }
}
