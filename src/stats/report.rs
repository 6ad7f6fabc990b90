//! Stats report values handed to [`RtcStatsCollectorCallback`](super::RtcStatsCollectorCallback).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// One stats object (`webrtc::RTCStats`).
///
/// Members other than `id`, `type` and `timestamp` are kept as JSON values,
/// exactly as the engine reported them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtcStats {
    /// Unique id within the report.
    pub id: String,
    /// Stats type (e.g., "inbound-rtp", "candidate-pair").
    #[serde(rename = "type")]
    pub kind: String,
    /// Time the object was sampled, in microseconds.
    #[serde(rename = "timestamp")]
    pub timestamp_us: f64,
    /// Remaining members.
    #[serde(flatten)]
    pub members: BTreeMap<String, Value>,
}

impl RtcStats {
    /// Look up a member.
    pub fn member(&self, name: &str) -> Option<&Value> {
        self.members.get(name)
    }
}

/// A complete stats report (`webrtc::RTCStatsReport`).
///
/// Always fully owned: nothing in it points back into native memory. An
/// empty report (see [`RtcStatsReport::is_empty`]) means the engine had no
/// data for the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RtcStatsReport {
    timestamp_us: i64,
    stats: BTreeMap<String, RtcStats>,
}

impl RtcStatsReport {
    /// Build a report from stats objects, keyed by their ids.
    pub fn new(timestamp_us: i64, stats: impl IntoIterator<Item = RtcStats>) -> Self {
        Self {
            timestamp_us,
            stats: stats.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    /// Parse the engine's JSON rendering: an array of stats objects.
    ///
    /// Empty input yields an empty report.
    pub fn from_json(timestamp_us: i64, json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self {
                timestamp_us,
                ..Default::default()
            });
        }
        let stats: Vec<RtcStats> = serde_json::from_str(json)
            .map_err(|e| Error::Unknown(format!("malformed stats JSON: {}", e)))?;
        Ok(Self::new(timestamp_us, stats))
    }

    /// Render as the engine's JSON format.
    pub fn to_json(&self) -> String {
        let stats: Vec<&RtcStats> = self.stats.values().collect();
        serde_json::to_string(&stats).unwrap_or_else(|_| "[]".to_string())
    }

    /// Report timestamp in microseconds.
    pub fn timestamp_us(&self) -> i64 {
        self.timestamp_us
    }

    /// Map from stats id to stats object.
    pub fn stats_map(&self) -> &BTreeMap<String, RtcStats> {
        &self.stats
    }

    /// Look up a stats object by id.
    pub fn get(&self, id: &str) -> Option<&RtcStats> {
        self.stats.get(id)
    }

    /// Iterate over stats objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &RtcStats> {
        self.stats.values()
    }

    /// All stats objects of one type.
    pub fn stats_of_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a RtcStats> + 'a {
        self.stats.values().filter(move |s| s.kind == kind)
    }

    /// Number of stats objects.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// True when the engine had no data.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl fmt::Display for RtcStatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ timestampUs: {}, stats: {} }}",
            self.timestamp_us,
            self.to_json()
        )
    }
}
