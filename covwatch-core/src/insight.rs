//! Insight engine - presentation-ready values derived from snapshots
//!
//! Turns numeric snapshots (and optional comparisons) into a headline
//! insight, dashboard metrics, prioritized action items, and a trend
//! narrative.
//!
//! Global invariants enforced:
//! - Every function is pure over its inputs; no I/O, no hidden state
//! - Narratives come from fixed policy tables, not open-ended generation
//! - Output objects are freshly constructed, never persisted or mutated

use crate::delta::{Comparison, TrendDirection};
use crate::hotspot::HotspotTier;
use crate::snapshot::Snapshot;
use serde::Serialize;
use std::collections::HashSet;

/// Default number of action items derived per snapshot
pub const DEFAULT_MAX_ACTION_ITEMS: usize = 5;

/// Severity attached to an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Info,
    Warning,
    Critical,
}

/// Templated human-readable explanation of a snapshot or comparison
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Insight {
    pub severity: InsightSeverity,
    pub headline: String,
    pub subtext: String,
    pub rationale: String,
}

/// Priority of a remediation item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    Medium,
    High,
    Critical,
}

/// Prioritized, file-scoped remediation recommendation
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ActionItem {
    pub file: String,
    pub priority: ActionPriority,
    pub impact_score: usize,
    pub problem: String,
    pub recommendation: String,
    pub rationale: String,
}

/// Movement since the previous snapshot, for dashboard display
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TrendSummary {
    pub score_delta: i64,
    pub new_hotspot_count: usize,
    pub resolved_hotspot_count: usize,
    pub focus_file: String,
}

/// Headline numbers for dashboard display
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct DashboardMetrics {
    pub duplication_percent: f64,
    pub hotspot_count: usize,
    pub affected_files: usize,
    pub affected_lines: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendSummary>,
}

/// File basename for display (path separators treated as opaque)
fn base_name(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .to_string()
}

fn severe_count(snapshot: &Snapshot) -> usize {
    snapshot
        .hotspots
        .iter()
        .filter(|h| h.tier == HotspotTier::Severe)
        .count()
}

/// Headline insight for a snapshot: a four-way policy branch on risk level
///
/// Severity mapping: Critical level -> Critical, High/Medium -> Warning,
/// Low -> Info.
pub fn headline_insight(snapshot: &Snapshot) -> Insight {
    let total = snapshot.summary.total_diagnostics;
    let files = snapshot.summary.total_files_analyzed;
    let severe = severe_count(snapshot);
    let score = snapshot.risk_score.score;

    match snapshot.risk_score.level {
        crate::risk::RiskLevel::Critical => Insight {
            severity: InsightSeverity::Critical,
            headline: "Critical quality risk".to_string(),
            subtext: format!("{total} diagnostics across {files} analyzed files need immediate attention"),
            rationale: format!(
                "Risk score {score} with {severe} severe hotspot(s); findings at this level compound quickly if left unaddressed"
            ),
        },
        crate::risk::RiskLevel::High => Insight {
            severity: InsightSeverity::Warning,
            headline: "High quality risk".to_string(),
            subtext: format!("{total} diagnostics across {files} analyzed files warrant a remediation plan"),
            rationale: format!(
                "Risk score {score} with {severe} severe hotspot(s); prioritize the top hotspots before they spread"
            ),
        },
        crate::risk::RiskLevel::Medium => Insight {
            severity: InsightSeverity::Warning,
            headline: "Moderate quality risk".to_string(),
            subtext: format!("{total} diagnostics across {files} analyzed files are worth scheduling"),
            rationale: format!(
                "Risk score {score} with {severe} severe hotspot(s); manageable now, costly later"
            ),
        },
        crate::risk::RiskLevel::Low => Insight {
            severity: InsightSeverity::Info,
            headline: "Quality risk is low".to_string(),
            subtext: format!("{total} diagnostics across {files} analyzed files"),
            rationale: format!("Risk score {score}; keep the current practices in place"),
        },
    }
}

/// Dashboard metrics for a snapshot, with trend data when a comparison is given
///
/// Duplication percent estimates diagnostics per file against a 10-per-file
/// ceiling, clamped to 100 and rounded to one decimal; zero when no files
/// were analyzed.
pub fn dashboard_metrics(snapshot: &Snapshot, comparison: Option<&Comparison>) -> DashboardMetrics {
    let total = snapshot.summary.total_diagnostics;
    let files = snapshot.summary.total_files_analyzed;

    let duplication_percent = if files == 0 {
        0.0
    } else {
        let percent = (total as f64 / (files as f64 * 10.0) * 100.0).min(100.0);
        (percent * 10.0).round() / 10.0
    };

    let hotspot_count = snapshot
        .hotspots
        .iter()
        .filter(|h| h.tier != HotspotTier::Minor)
        .count();

    let affected_files = snapshot
        .diagnostics
        .iter()
        .filter_map(|d| d.file.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let affected_lines: u64 = snapshot
        .diagnostics
        .iter()
        .filter_map(|d| {
            d.line.map(|line| {
                let end = u64::from(d.end_line.unwrap_or(line));
                end.saturating_sub(u64::from(line)) + 1
            })
        })
        .sum();

    let trend = comparison.map(|cmp| {
        let focus_file = cmp
            .new_hotspots
            .first()
            .cloned()
            .or_else(|| cmp.current.hotspots.first().map(|h| h.file.clone()))
            .map(|f| base_name(&f))
            .unwrap_or_else(|| "N/A".to_string());

        TrendSummary {
            score_delta: cmp.score_delta,
            new_hotspot_count: cmp.new_hotspots.len(),
            resolved_hotspot_count: cmp.resolved_hotspots.len(),
            focus_file,
        }
    });

    DashboardMetrics {
        duplication_percent,
        hotspot_count,
        affected_files,
        affected_lines,
        trend,
    }
}

/// Derive prioritized action items from a snapshot's hotspots
///
/// Selection takes the top `max_items` hotspots in input (risk-ranked)
/// order; the final list is then re-sorted descending by impact score,
/// which can reorder relative to selection.
///
/// Narrative precedence per hotspot:
/// 1. coverage gap: uncovered lines strictly outnumber other diagnostics
///    AND exceed 5
/// 2. concentration: more than 10 diagnostics in the file
/// 3. critical hotspot: Severe tier
/// 4. generic review
pub fn action_items(snapshot: &Snapshot, max_items: usize) -> Vec<ActionItem> {
    let mut items: Vec<ActionItem> = snapshot
        .hotspots
        .iter()
        .take(max_items)
        .map(|hotspot| {
            let priority = match hotspot.tier {
                HotspotTier::Severe => ActionPriority::Critical,
                HotspotTier::Moderate => ActionPriority::High,
                HotspotTier::Minor => ActionPriority::Medium,
            };
            let impact_score = hotspot.diagnostic_count * 10 + hotspot.uncovered_lines;
            let name = base_name(&hotspot.file);
            let other = hotspot
                .diagnostic_count
                .saturating_sub(hotspot.uncovered_lines);

            // Strict > on the coverage comparison: a tie falls through to
            // the concentration branch
            let (problem, recommendation, rationale) = if hotspot.uncovered_lines > other
                && hotspot.uncovered_lines > 5
            {
                (
                    format!(
                        "{name} has a coverage gap: {} uncovered lines dominate its findings",
                        hotspot.uncovered_lines
                    ),
                    format!("Add tests exercising the uncovered lines in {}", hotspot.file),
                    "Coverage gaps account for most of this file's diagnostics; tests close them directly".to_string(),
                )
            } else if hotspot.diagnostic_count > 10 {
                (
                    format!(
                        "{name} concentrates {} diagnostics",
                        hotspot.diagnostic_count
                    ),
                    format!("Break up or refactor {} to disperse the findings", hotspot.file),
                    "Heavy concentration in one file usually signals a structural problem rather than isolated misses".to_string(),
                )
            } else if hotspot.tier == HotspotTier::Severe {
                (
                    format!("{name} is a critical hotspot"),
                    format!("Review {} before the next change lands there", hotspot.file),
                    "Severe hotspots attract further defects; early review is the cheapest intervention".to_string(),
                )
            } else {
                (
                    format!(
                        "{name} has {} diagnostics worth reviewing",
                        hotspot.diagnostic_count
                    ),
                    format!("Schedule a review of {}", hotspot.file),
                    "Low-grade findings accumulate; periodic review keeps them from tipping into a hotspot".to_string(),
                )
            };

            ActionItem {
                file: hotspot.file.clone(),
                priority,
                impact_score,
                problem,
                recommendation,
                rationale,
            }
        })
        .collect();

    items.sort_by(|a, b| b.impact_score.cmp(&a.impact_score));
    items
}

/// Trend narrative for a comparison, when there is anything to say
///
/// Returns None for a Stable trend with no hotspot churn. A Stable trend
/// with nonzero churn also yields None today; tests pin that behavior.
pub fn trend_insight(comparison: &Comparison) -> Option<Insight> {
    if comparison.trend == TrendDirection::Stable
        && comparison.new_hotspots.is_empty()
        && comparison.resolved_hotspots.is_empty()
    {
        return None;
    }

    match comparison.trend {
        TrendDirection::Worsening => {
            let culprit = comparison
                .new_hotspots
                .first()
                .map(|f| base_name(f))
                .unwrap_or_else(|| "recent changes".to_string());
            Some(Insight {
                severity: InsightSeverity::Warning,
                headline: "Quality risk is worsening".to_string(),
                subtext: format!(
                    "Risk score rose by {} since the previous snapshot",
                    comparison.score_delta
                ),
                rationale: format!("Largely driven by {culprit}"),
            })
        }
        TrendDirection::Improving => Some(Insight {
            severity: InsightSeverity::Info,
            headline: "Quality risk is improving".to_string(),
            subtext: format!(
                "Risk score fell by {} since the previous snapshot",
                -comparison.score_delta
            ),
            rationale: format!(
                "{} hotspot(s) resolved",
                comparison.resolved_hotspots.len()
            ),
        }),
        // Stable with hotspot churn falls through with no insight
        TrendDirection::Stable => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotspot::{compute_hotspots, Hotspot};
    use crate::report::{
        AnalysisStatus, AnalyzerReport, Diagnostic, ReportSummary, Severity, CODE_LINE_UNCOVERED,
    };
    use crate::risk::{compute_risk_score, RiskLevel, RiskScore};
    use crate::snapshot::SNAPSHOT_SCHEMA_VERSION;

    fn diagnostic(code: &str, file: Option<&str>, line: Option<u32>, end_line: Option<u32>) -> Diagnostic {
        Diagnostic {
            code: code.to_string(),
            severity: Severity::Warning,
            message: "test".to_string(),
            file: file.map(|f| f.to_string()),
            line,
            column: None,
            end_line,
            end_column: None,
            evidence: vec![],
            suggestions: vec![],
        }
    }

    fn report(status: AnalysisStatus, files: usize, diagnostics: Vec<Diagnostic>) -> AnalyzerReport {
        AnalyzerReport {
            schema_version: "1.0".to_string(),
            status,
            repo_root: "/work/demo".to_string(),
            summary: ReportSummary {
                total_diagnostics: diagnostics.len(),
                total_files_analyzed: files,
                by_code: None,
                truncation: None,
            },
            diagnostics,
            timestamp: None,
        }
    }

    fn snapshot_from(report: &AnalyzerReport) -> Snapshot {
        let hotspots = compute_hotspots(report);
        let risk_score = compute_risk_score(report, &hotspots);
        Snapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            id: "abc123def456".to_string(),
            repo_path: "/work/demo".to_string(),
            timestamp: time::macros::datetime!(2026-01-15 09:30:00 UTC),
            git_commit: None,
            git_branch: None,
            risk_score,
            summary: report.summary.clone(),
            hotspots,
            diagnostics: report.diagnostics.clone(),
        }
    }

    fn snapshot_with(score: u32, hotspots: Vec<Hotspot>) -> Snapshot {
        Snapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            id: "abc123def456".to_string(),
            repo_path: "/work/demo".to_string(),
            timestamp: time::macros::datetime!(2026-01-15 09:30:00 UTC),
            git_commit: None,
            git_branch: None,
            risk_score: RiskScore {
                score,
                level: RiskLevel::from_score(score),
                factors: vec![],
            },
            summary: ReportSummary {
                total_diagnostics: 0,
                total_files_analyzed: 10,
                by_code: None,
                truncation: None,
            },
            hotspots,
            diagnostics: vec![],
        }
    }

    fn hotspot(file: &str, count: usize, uncovered: usize) -> Hotspot {
        Hotspot {
            file: file.to_string(),
            diagnostic_count: count,
            uncovered_lines: uncovered,
            tier: HotspotTier::from_count(count),
        }
    }

    #[test]
    fn test_headline_severity_mapping() {
        assert_eq!(
            headline_insight(&snapshot_with(80, vec![])).severity,
            InsightSeverity::Critical
        );
        assert_eq!(
            headline_insight(&snapshot_with(60, vec![])).severity,
            InsightSeverity::Warning
        );
        assert_eq!(
            headline_insight(&snapshot_with(30, vec![])).severity,
            InsightSeverity::Warning
        );
        assert_eq!(
            headline_insight(&snapshot_with(10, vec![])).severity,
            InsightSeverity::Info
        );
    }

    #[test]
    fn test_clean_report_metrics() {
        // total_diagnostics=0, files=10, no diagnostics, status OK
        let report = report(AnalysisStatus::Ok, 10, vec![]);
        let snapshot = snapshot_from(&report);

        assert_eq!(snapshot.risk_score.score, 0);
        assert_eq!(snapshot.risk_score.level, RiskLevel::Low);
        assert!(snapshot.hotspots.is_empty());

        let metrics = dashboard_metrics(&snapshot, None);
        assert_eq!(metrics.duplication_percent, 0.0);
        assert_eq!(metrics.hotspot_count, 0);
        assert_eq!(metrics.affected_files, 0);
        assert_eq!(metrics.affected_lines, 0);
        assert!(metrics.trend.is_none());
    }

    #[test]
    fn test_duplication_percent_zero_when_no_files_analyzed() {
        // Guards the division: diagnostics present but zero files analyzed
        let diagnostics = vec![diagnostic(CODE_LINE_UNCOVERED, Some("src/a.py"), None, None)];
        let snapshot = snapshot_from(&report(AnalysisStatus::Partial, 0, diagnostics));

        let metrics = dashboard_metrics(&snapshot, None);

        assert_eq!(metrics.duplication_percent, 0.0);
    }

    #[test]
    fn test_duplication_percent_rounding_and_clamp() {
        // 17 diagnostics over 5 files: 17 / 50 * 100 = 34.0
        let diagnostics: Vec<Diagnostic> = (0..17)
            .map(|_| diagnostic(CODE_LINE_UNCOVERED, Some("src/a.py"), None, None))
            .collect();
        let snapshot = snapshot_from(&report(AnalysisStatus::Ok, 5, diagnostics));
        assert_eq!(dashboard_metrics(&snapshot, None).duplication_percent, 34.0);

        // 400 diagnostics over 2 files clamps to 100
        let diagnostics: Vec<Diagnostic> = (0..400)
            .map(|_| diagnostic(CODE_LINE_UNCOVERED, Some("src/a.py"), None, None))
            .collect();
        let snapshot = snapshot_from(&report(AnalysisStatus::Ok, 2, diagnostics));
        assert_eq!(dashboard_metrics(&snapshot, None).duplication_percent, 100.0);
    }

    #[test]
    fn test_affected_files_and_lines() {
        let snapshot = snapshot_from(&report(
            AnalysisStatus::Ok,
            10,
            vec![
                diagnostic(CODE_LINE_UNCOVERED, Some("src/a.py"), Some(10), Some(14)),
                diagnostic(CODE_LINE_UNCOVERED, Some("src/a.py"), Some(20), None),
                diagnostic("BRANCH_UNCOVERED", Some("src/b.py"), Some(3), Some(3)),
                diagnostic("COVERAGE_DATA_MISSING", None, None, None),
            ],
        ));

        let metrics = dashboard_metrics(&snapshot, None);

        assert_eq!(metrics.affected_files, 2);
        // (14-10+1) + 1 + (3-3+1) = 5 + 1 + 1
        assert_eq!(metrics.affected_lines, 7);
    }

    #[test]
    fn test_trend_summary_focus_file_fallbacks() {
        let baseline = snapshot_with(20, vec![]);

        // First new hotspot wins
        let current = snapshot_with(25, vec![hotspot("src/new.py", 6, 1)]);
        let cmp = crate::delta::compare(&baseline, &current);
        let metrics = dashboard_metrics(&current, Some(&cmp));
        assert_eq!(metrics.trend.as_ref().map(|t| t.focus_file.as_str()), Some("new.py"));

        // No new hotspots: first current hotspot
        let shared = vec![hotspot("src/old.py", 6, 1)];
        let baseline = snapshot_with(20, shared.clone());
        let current = snapshot_with(22, shared);
        let cmp = crate::delta::compare(&baseline, &current);
        let metrics = dashboard_metrics(&current, Some(&cmp));
        assert_eq!(metrics.trend.as_ref().map(|t| t.focus_file.as_str()), Some("old.py"));

        // No hotspots at all: literal N/A
        let baseline = snapshot_with(20, vec![]);
        let current = snapshot_with(22, vec![]);
        let cmp = crate::delta::compare(&baseline, &current);
        let metrics = dashboard_metrics(&current, Some(&cmp));
        assert_eq!(metrics.trend.as_ref().map(|t| t.focus_file.as_str()), Some("N/A"));
    }

    #[test]
    fn test_concentration_wins_coverage_tie() {
        // 12 diagnostics, 6 uncovered: uncovered(6) is not strictly greater
        // than the other 6, so the concentration branch applies
        let mut diagnostics = Vec::new();
        for _ in 0..6 {
            diagnostics.push(diagnostic(CODE_LINE_UNCOVERED, Some("src/a.py"), None, None));
        }
        for _ in 0..6 {
            diagnostics.push(diagnostic("BRANCH_UNCOVERED", Some("src/a.py"), None, None));
        }
        let snapshot = snapshot_from(&report(AnalysisStatus::Ok, 10, diagnostics));

        assert_eq!(snapshot.hotspots[0].tier, HotspotTier::Severe);

        let items = action_items(&snapshot, DEFAULT_MAX_ACTION_ITEMS);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].priority, ActionPriority::Critical);
        assert_eq!(items[0].impact_score, 126);
        assert!(items[0].problem.contains("concentrates"));
    }

    #[test]
    fn test_coverage_gap_branch() {
        // 9 diagnostics, 7 uncovered: 7 > 2 and 7 > 5
        let snapshot = snapshot_with(30, vec![hotspot("src/gap.py", 9, 7)]);

        let items = action_items(&snapshot, DEFAULT_MAX_ACTION_ITEMS);

        assert_eq!(items[0].priority, ActionPriority::High);
        assert_eq!(items[0].impact_score, 97);
        assert!(items[0].problem.contains("coverage gap"));
    }

    #[test]
    fn test_critical_hotspot_branch() {
        // Exactly 10 diagnostics: Severe tier but not > 10, few uncovered
        let snapshot = snapshot_with(40, vec![hotspot("src/hot.py", 10, 2)]);

        let items = action_items(&snapshot, DEFAULT_MAX_ACTION_ITEMS);

        assert_eq!(items[0].priority, ActionPriority::Critical);
        assert!(items[0].problem.contains("critical hotspot"));
    }

    #[test]
    fn test_generic_branch() {
        let snapshot = snapshot_with(10, vec![hotspot("src/meh.py", 3, 0)]);

        let items = action_items(&snapshot, DEFAULT_MAX_ACTION_ITEMS);

        assert_eq!(items[0].priority, ActionPriority::Medium);
        assert!(items[0].problem.contains("worth reviewing"));
    }

    #[test]
    fn test_action_items_capped_and_resorted_by_impact() {
        let snapshot = snapshot_with(
            40,
            vec![
                hotspot("a.py", 5, 0), // impact 50
                hotspot("b.py", 5, 3), // impact 53
                hotspot("c.py", 4, 0),
                hotspot("d.py", 3, 0),
                hotspot("e.py", 2, 0),
                hotspot("f.py", 1, 0), // beyond max_items
            ],
        );

        let items = action_items(&snapshot, DEFAULT_MAX_ACTION_ITEMS);

        assert_eq!(items.len(), 5);
        // b.py outranks a.py on impact even though a.py ranked first by count
        assert_eq!(items[0].file, "b.py");
        assert_eq!(items[1].file, "a.py");
        assert!(!items.iter().any(|i| i.file == "f.py"));
    }

    #[test]
    fn test_trend_insight_improving() {
        let baseline = snapshot_with(50, vec![hotspot("src/was.py", 6, 1)]);
        let current = snapshot_with(35, vec![]);
        let cmp = crate::delta::compare(&baseline, &current);

        let insight = trend_insight(&cmp).expect("improving trend yields insight");

        assert_eq!(insight.severity, InsightSeverity::Info);
        assert!(insight.subtext.contains("fell by 15"));
        assert!(insight.rationale.contains("1 hotspot(s) resolved"));
    }

    #[test]
    fn test_trend_insight_worsening_names_new_hotspot() {
        let baseline = snapshot_with(20, vec![]);
        let current = snapshot_with(40, vec![hotspot("src/culprit.py", 8, 2)]);
        let cmp = crate::delta::compare(&baseline, &current);

        let insight = trend_insight(&cmp).expect("worsening trend yields insight");

        assert_eq!(insight.severity, InsightSeverity::Warning);
        assert!(insight.subtext.contains("rose by 20"));
        assert!(insight.rationale.contains("culprit.py"));
    }

    #[test]
    fn test_trend_insight_worsening_fallback_wording() {
        // Worsening with no new hotspot file to blame
        let shared = vec![hotspot("src/same.py", 6, 1)];
        let baseline = snapshot_with(20, shared.clone());
        let current = snapshot_with(40, shared);
        let cmp = crate::delta::compare(&baseline, &current);

        let insight = trend_insight(&cmp).expect("worsening trend yields insight");
        assert!(insight.rationale.contains("recent changes"));
    }

    #[test]
    fn test_trend_insight_none_when_stable_and_quiet() {
        let baseline = snapshot_with(30, vec![]);
        let current = snapshot_with(35, vec![]);
        let cmp = crate::delta::compare(&baseline, &current);

        assert!(trend_insight(&cmp).is_none());
    }

    #[test]
    fn test_trend_insight_none_for_stable_with_churn() {
        // One resolved and one new hotspot cancel out while the score stays
        // stable; the policy still yields no insight. Pinned deliberately:
        // change this only with an explicit product decision.
        let baseline = snapshot_with(30, vec![hotspot("src/old.py", 6, 1)]);
        let current = snapshot_with(32, vec![hotspot("src/new.py", 6, 1)]);
        let cmp = crate::delta::compare(&baseline, &current);

        assert_eq!(cmp.trend, TrendDirection::Stable);
        assert_eq!(cmp.new_hotspots.len(), 1);
        assert_eq!(cmp.resolved_hotspots.len(), 1);
        assert!(trend_insight(&cmp).is_none());
    }
}
