//! Snapshot comparison
//!
//! Computes the delta between two already-loaded snapshots: diagnostic and
//! score deltas, a trend direction, and hotspot churn.
//!
//! Global invariants enforced:
//! - Pure function over its inputs, no I/O
//! - Hotspot membership compared by exact file-path string equality
//! - Churn lists follow the owning snapshot's hotspot ranking
//! - `compare(a, b).new_hotspots == compare(b, a).resolved_hotspots`

use crate::snapshot::Snapshot;
use serde::Serialize;
use std::collections::HashSet;

/// Score-delta magnitude beyond which the trend leaves Stable
pub const TREND_SCORE_THRESHOLD: i64 = 10;

/// Direction of risk movement between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Worsening,
    Stable,
}

impl TrendDirection {
    /// Improving if delta < -10, Worsening if delta > 10, else Stable
    pub fn from_score_delta(score_delta: i64) -> Self {
        if score_delta < -TREND_SCORE_THRESHOLD {
            TrendDirection::Improving
        } else if score_delta > TREND_SCORE_THRESHOLD {
            TrendDirection::Worsening
        } else {
            TrendDirection::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Worsening => "worsening",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Derived, ephemeral delta between a baseline and a current snapshot
///
/// Never persisted; always recomputed from the two snapshots.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Comparison {
    pub baseline: Snapshot,
    pub current: Snapshot,
    pub diagnostic_delta: i64,
    pub score_delta: i64,
    pub trend: TrendDirection,
    pub new_hotspots: Vec<String>,
    pub resolved_hotspots: Vec<String>,
}

/// Compare two snapshots of the same repository
pub fn compare(baseline: &Snapshot, current: &Snapshot) -> Comparison {
    let diagnostic_delta = current.summary.total_diagnostics as i64
        - baseline.summary.total_diagnostics as i64;
    let score_delta =
        i64::from(current.risk_score.score) - i64::from(baseline.risk_score.score);

    let baseline_files: HashSet<&str> =
        baseline.hotspots.iter().map(|h| h.file.as_str()).collect();
    let current_files: HashSet<&str> =
        current.hotspots.iter().map(|h| h.file.as_str()).collect();

    let new_hotspots = current
        .hotspots
        .iter()
        .filter(|h| !baseline_files.contains(h.file.as_str()))
        .map(|h| h.file.clone())
        .collect();
    let resolved_hotspots = baseline
        .hotspots
        .iter()
        .filter(|h| !current_files.contains(h.file.as_str()))
        .map(|h| h.file.clone())
        .collect();

    Comparison {
        baseline: baseline.clone(),
        current: current.clone(),
        diagnostic_delta,
        score_delta,
        trend: TrendDirection::from_score_delta(score_delta),
        new_hotspots,
        resolved_hotspots,
    }
}
