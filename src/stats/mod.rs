//! Stats collection and delivery.
//!
//! The engine produces a report on one of its own threads and completes the
//! matching [`StatsRequest`]. The callback always receives exactly one
//! [`RtcStatsReport`] per request; "no data" is an empty report.

mod callback;
mod collector;
mod report;
mod request;

pub use callback::RtcStatsCollectorCallback;
pub use collector::StatsCollector;
pub use report::{RtcStats, RtcStatsReport};
pub use request::StatsRequest;
