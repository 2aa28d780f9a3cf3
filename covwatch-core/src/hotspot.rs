//! Hotspot derivation - files with concentrated diagnostics
//!
//! Global invariants enforced:
//! - Hotspots are recomputed fresh from a report, never mutated in place
//! - Ranking is descending by diagnostic count, capped to the top 10
//! - Ties keep first-seen grouping order (stable sort)
//! - Deterministic and side-effect-free

use crate::report::{AnalyzerReport, CODE_LINE_UNCOVERED};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum number of hotspots retained per report
pub const MAX_HOTSPOTS: usize = 10;

/// Severity tier assigned by diagnostic count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotTier {
    Minor,
    Moderate,
    Severe,
}

impl HotspotTier {
    /// Tier thresholds: Minor < 5, Moderate 5-9, Severe >= 10
    pub fn from_count(count: usize) -> Self {
        if count >= 10 {
            HotspotTier::Severe
        } else if count >= 5 {
            HotspotTier::Moderate
        } else {
            HotspotTier::Minor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HotspotTier::Minor => "minor",
            HotspotTier::Moderate => "moderate",
            HotspotTier::Severe => "severe",
        }
    }
}

/// A file with concentrated diagnostics, ranked and tiered
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Hotspot {
    pub file: String,
    pub diagnostic_count: usize,
    pub uncovered_lines: usize,
    pub tier: HotspotTier,
}

/// Compute ranked hotspots from a parsed report
///
/// Groups diagnostics with a non-null file by path, counts total and
/// `LINE_UNCOVERED` diagnostics per file, assigns tiers, then sorts
/// descending by diagnostic count and truncates to `MAX_HOTSPOTS`.
pub fn compute_hotspots(report: &AnalyzerReport) -> Vec<Hotspot> {
    // Group by file, recording first-seen order for stable tie-breaks
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, (usize, usize)> = HashMap::new();

    for diagnostic in &report.diagnostics {
        let Some(file) = diagnostic.file.as_deref() else {
            continue;
        };
        let entry = groups.entry(file).or_insert_with(|| {
            order.push(file);
            (0, 0)
        });
        entry.0 += 1;
        if diagnostic.code == CODE_LINE_UNCOVERED {
            entry.1 += 1;
        }
    }

    let mut hotspots: Vec<Hotspot> = order
        .into_iter()
        .map(|file| {
            let (diagnostic_count, uncovered_lines) = groups[file];
            Hotspot {
                file: file.to_string(),
                diagnostic_count,
                uncovered_lines,
                tier: HotspotTier::from_count(diagnostic_count),
            }
        })
        .collect();

    // Stable sort keeps first-seen order on equal counts
    hotspots.sort_by(|a, b| b.diagnostic_count.cmp(&a.diagnostic_count));
    hotspots.truncate(MAX_HOTSPOTS);

    hotspots
}
