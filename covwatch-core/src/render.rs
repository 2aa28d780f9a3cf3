//! Text and JSON rendering for CLI output
//!
//! Global invariants enforced:
//! - Deterministic output ordering
//! - Identical input yields byte-for-byte identical output

use crate::delta::Comparison;
use crate::snapshot::Snapshot;
use crate::Assessment;

/// Render an assessment as fixed-width text
pub fn render_assessment_text(assessment: &Assessment) -> String {
    let mut output = String::new();
    let snapshot = &assessment.snapshot;

    output.push_str(&format!(
        "Snapshot {} ({})\n",
        snapshot.id,
        snapshot
            .git_commit
            .as_deref()
            .unwrap_or("no commit metadata")
    ));
    output.push_str(&format!(
        "Risk: {} ({})\n",
        snapshot.risk_score.score,
        snapshot.risk_score.level.as_str()
    ));
    output.push_str(&format!(
        "{} | {}\n\n",
        assessment.headline.headline, assessment.headline.subtext
    ));

    if !snapshot.hotspots.is_empty() {
        output.push_str(&format!(
            "{:<10} {:<40} {:<6} {}\n",
            "TIER", "FILE", "DIAGS", "UNCOVERED"
        ));
        for hotspot in &snapshot.hotspots {
            output.push_str(&format!(
                "{:<10} {:<40} {:<6} {}\n",
                hotspot.tier.as_str(),
                truncate_or_pad(&hotspot.file, 40),
                hotspot.diagnostic_count,
                hotspot.uncovered_lines,
            ));
        }
        output.push('\n');
    }

    if !assessment.action_items.is_empty() {
        output.push_str("Action items:\n");
        for item in &assessment.action_items {
            output.push_str(&format!(
                "  [{:>8}] ({:>4}) {}\n",
                format!("{:?}", item.priority).to_lowercase(),
                item.impact_score,
                item.problem
            ));
            output.push_str(&format!("             {}\n", item.recommendation));
        }
        output.push('\n');
    }

    if let Some(trend) = &assessment.trend {
        output.push_str(&format!("{} | {}\n", trend.headline, trend.subtext));
    }

    output
}

/// Render an assessment as JSON
pub fn render_assessment_json(assessment: &Assessment) -> String {
    serde_json::to_string_pretty(assessment).unwrap_or_else(|_| "{}".to_string())
}

/// Render a comparison as fixed-width text
pub fn render_comparison_text(comparison: &Comparison) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Baseline {} -> current {}\n",
        comparison.baseline.id, comparison.current.id
    ));
    output.push_str(&format!(
        "Trend: {} (score {:+}, diagnostics {:+})\n",
        comparison.trend.as_str(),
        comparison.score_delta,
        comparison.diagnostic_delta
    ));

    if !comparison.new_hotspots.is_empty() {
        output.push_str("New hotspots:\n");
        for file in &comparison.new_hotspots {
            output.push_str(&format!("  + {file}\n"));
        }
    }
    if !comparison.resolved_hotspots.is_empty() {
        output.push_str("Resolved hotspots:\n");
        for file in &comparison.resolved_hotspots {
            output.push_str(&format!("  - {file}\n"));
        }
    }

    output
}

/// Render a comparison as JSON
pub fn render_comparison_json(comparison: &Comparison) -> String {
    serde_json::to_string_pretty(comparison).unwrap_or_else(|_| "{}".to_string())
}

/// Render a snapshot listing as fixed-width text, newest first
pub fn render_snapshot_list_text(snapshots: &[Snapshot]) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<14} {:<22} {:<6} {:<10} {}\n",
        "ID", "TIMESTAMP", "SCORE", "LEVEL", "COMMIT"
    ));
    for snapshot in snapshots {
        let stamp = snapshot
            .timestamp
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| snapshot.timestamp.unix_timestamp().to_string());
        output.push_str(&format!(
            "{:<14} {:<22} {:<6} {:<10} {}\n",
            snapshot.id,
            truncate_or_pad(&stamp, 22),
            snapshot.risk_score.score,
            snapshot.risk_score.level.as_str(),
            snapshot.git_commit.as_deref().unwrap_or("-"),
        ));
    }

    output
}

/// Render a snapshot listing as JSON
pub fn render_snapshot_list_json(snapshots: &[Snapshot]) -> String {
    serde_json::to_string_pretty(snapshots).unwrap_or_else(|_| "[]".to_string())
}

/// Truncate or pad string to fixed width
///
/// The cut lands on a char boundary so multi-byte paths never split.
fn truncate_or_pad(s: &str, width: usize) -> String {
    if s.len() > width {
        let mut cut = width.saturating_sub(3);
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &s[..cut])
    } else {
        format!("{:<width$}", s, width = width)
    }
}
