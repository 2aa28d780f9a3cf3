//! Weighted risk scoring
//!
//! Turns a parsed report and its hotspots into a 0-100 risk score with
//! explainable factors.
//!
//! Global invariants enforced:
//! - Exactly three factors, always in the same order (volume,
//!   concentration, coverage); consumers may rely on this until a
//!   version change
//! - score = floor(sum(weight * value) / sum(weight))
//! - Pure: identical inputs yield an identical score
//! - Total over well-formed input; an empty report scores 0 / Low

use crate::hotspot::{Hotspot, HotspotTier};
use crate::report::{AnalysisStatus, AnalyzerReport};
use serde::{Deserialize, Serialize};

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,      // < 25
    Medium,   // 25-49
    High,     // 50-74
    Critical, // >= 75
}

impl RiskLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 75 {
            RiskLevel::Critical
        } else if score >= 50 {
            RiskLevel::High
        } else if score >= 25 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// One named contribution to the weighted score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RiskFactor {
    pub name: String,
    pub weight: u32,
    pub value: u32,
    pub description: String,
}

/// Weighted 0-100 risk summary with its contributing factors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct RiskScore {
    pub score: u32,
    pub level: RiskLevel,
    pub factors: Vec<RiskFactor>,
}

/// Compute the weighted risk score from a report and its hotspots
///
/// Factors, in fixed order:
/// - Diagnostic Volume, weight 30, value = min(total_diagnostics * 2, 100)
/// - Hotspot Concentration, weight 40, value = min(severe_count * 25, 100)
/// - Analysis Coverage, weight 30, value = FAIL: 100, PARTIAL: 50, OK: 0
pub fn compute_risk_score(report: &AnalyzerReport, hotspots: &[Hotspot]) -> RiskScore {
    let total = report.summary.total_diagnostics;
    let severe = hotspots
        .iter()
        .filter(|h| h.tier == HotspotTier::Severe)
        .count();

    let volume_value = total.saturating_mul(2).min(100) as u32;
    let concentration_value = severe.saturating_mul(25).min(100) as u32;
    let coverage_value = match report.status {
        AnalysisStatus::Fail => 100,
        AnalysisStatus::Partial => 50,
        AnalysisStatus::Ok => 0,
    };

    let factors = vec![
        RiskFactor {
            name: "Diagnostic Volume".to_string(),
            weight: 30,
            value: volume_value,
            description: format!("{total} diagnostics reported across the repository"),
        },
        RiskFactor {
            name: "Hotspot Concentration".to_string(),
            weight: 40,
            value: concentration_value,
            description: format!("{severe} severe hotspot(s) concentrate the findings"),
        },
        RiskFactor {
            name: "Analysis Coverage".to_string(),
            weight: 30,
            value: coverage_value,
            description: format!("analyzer finished with status {}", report.status.as_str()),
        },
    ];

    let weight_sum: u32 = factors.iter().map(|f| f.weight).sum();
    let weighted_sum: u32 = factors.iter().map(|f| f.weight * f.value).sum();
    // Integer floor division; weights sum to 100 so the result is 0-100
    let score = weighted_sum / weight_sum;

    RiskScore {
        score,
        level: RiskLevel::from_score(score),
        factors,
    }
}
