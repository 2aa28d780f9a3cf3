//! Covwatch core library - longitudinal quality-risk tracking from external
//! analyzer reports

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Scoring and insight derivation are pure and deterministic
// - Only snapshot creation introduces clock and identifier state
// - Snapshots are immutable once persisted; newer ones supersede
// - Identical report input yields identical hotspots, score, and insights

pub mod analyzer;
pub mod delta;
pub mod error;
pub mod git;
pub mod hotspot;
pub mod insight;
pub mod render;
pub mod report;
pub mod risk;
pub mod snapshot;

pub use analyzer::{run_analyzer, AnalyzerOptions};
pub use delta::{compare, Comparison, TrendDirection};
pub use error::CoreError;
pub use hotspot::{compute_hotspots, Hotspot, HotspotTier};
pub use insight::{
    action_items, dashboard_metrics, headline_insight, trend_insight, ActionItem,
    ActionPriority, DashboardMetrics, Insight, InsightSeverity, TrendSummary,
};
pub use report::{parse_report, try_parse_report, AnalysisStatus, AnalyzerReport, Severity};
pub use risk::{compute_risk_score, RiskLevel, RiskScore};
pub use snapshot::{repository_key, Snapshot, SnapshotStore};

use serde::Serialize;
use std::path::Path;

/// Everything one assess cycle produces, ready for presentation
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Assessment {
    pub snapshot: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Comparison>,
    pub headline: Insight,
    pub metrics: DashboardMetrics,
    pub action_items: Vec<ActionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Insight>,
}

/// Run one full assess-and-snapshot cycle for a repository
///
/// Pipeline: latest prior snapshot -> analyzer subprocess -> parse ->
/// persist a fresh snapshot -> compare against the prior snapshot ->
/// derive insights. Strictly sequential; an analyzer or parse failure
/// aborts before anything is written.
pub fn assess(
    repo_path: &Path,
    store: &SnapshotStore,
    options: &AnalyzerOptions,
) -> Result<Assessment, CoreError> {
    let previous = store.latest_snapshot(repo_path)?;

    let raw = analyzer::run_analyzer(repo_path, options)?;
    let report = report::parse_report(&raw)?;

    let snapshot = store.create_snapshot(repo_path, &report)?;
    let comparison = previous
        .as_ref()
        .map(|baseline| delta::compare(baseline, &snapshot));

    Ok(build_assessment(snapshot, comparison))
}

/// Derive the full set of presentation objects for an existing snapshot
pub fn build_assessment(snapshot: Snapshot, comparison: Option<Comparison>) -> Assessment {
    let headline = insight::headline_insight(&snapshot);
    let metrics = insight::dashboard_metrics(&snapshot, comparison.as_ref());
    let action_items = insight::action_items(&snapshot, insight::DEFAULT_MAX_ACTION_ITEMS);
    let trend = comparison.as_ref().and_then(insight::trend_insight);

    Assessment {
        snapshot,
        comparison,
        headline,
        metrics,
        action_items,
        trend,
    }
}
