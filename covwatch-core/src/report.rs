//! Analyzer report model and parser
//!
//! Typed representation of the external analyzer's JSON report.
//!
//! Global invariants enforced:
//! - Parsing operates purely on text (no file or network access)
//! - Unknown wire fields are ignored for forward compatibility
//! - Reports are immutable once parsed
//! - Enum wire values are canonical on write, case-tolerant on read

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Diagnostic code for a single uncovered line.
pub const CODE_LINE_UNCOVERED: &str = "LINE_UNCOVERED";
/// Diagnostic code for a module with no test coverage at all.
pub const CODE_UNTESTED_MODULE: &str = "UNTESTED_MODULE";
/// Diagnostic code for missing coverage data.
pub const CODE_COVERAGE_DATA_MISSING: &str = "COVERAGE_DATA_MISSING";
/// Diagnostic code for an uncovered branch.
pub const CODE_BRANCH_UNCOVERED: &str = "BRANCH_UNCOVERED";
/// Diagnostic code for a source file the analyzer could not parse.
pub const CODE_PARSE_ERROR: &str = "PARSE_ERROR";

/// Overall analyzer run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisStatus {
    #[serde(rename = "OK", alias = "ok", alias = "Ok")]
    Ok,
    #[serde(rename = "PARTIAL", alias = "partial", alias = "Partial")]
    Partial,
    #[serde(rename = "FAIL", alias = "fail", alias = "Fail")]
    Fail,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Ok => "OK",
            AnalysisStatus::Partial => "PARTIAL",
            AnalysisStatus::Fail => "FAIL",
        }
    }
}

/// Severity of a single diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "ERROR", alias = "Error")]
    Error,
    #[serde(alias = "WARNING", alias = "Warning")]
    Warning,
    #[serde(alias = "INFO", alias = "Info")]
    Info,
}

/// Truncation metadata when the analyzer capped its output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TruncationInfo {
    pub was_truncated: bool,
    pub max_total: usize,
    pub max_per_file: usize,
}

/// Aggregate counts for one analyzer run
///
/// `total_diagnostics` may exceed the diagnostic list length when output
/// was truncated; consumers must not assume exact equality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ReportSummary {
    pub total_diagnostics: usize,
    pub total_files_analyzed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_code: Option<BTreeMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<TruncationInfo>,
}

/// One finding inside a report
///
/// `file` is a repository-relative path treated as an opaque string key;
/// diagnostics without a file are excluded from per-file aggregation.
/// Line/column positions are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub evidence: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggestions: Vec<String>,
}

/// Parsed output of one analyzer run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AnalyzerReport {
    pub schema_version: String,
    pub status: AnalysisStatus,
    pub repo_root: String,
    pub summary: ReportSummary,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Parse raw analyzer JSON into a typed report
///
/// # Errors
///
/// Returns `CoreError::MalformedReport` when the text is empty/whitespace,
/// not valid JSON, or missing required fields.
pub fn parse_report(text: &str) -> Result<AnalyzerReport, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::MalformedReport(
            "report text is empty".to_string(),
        ));
    }

    serde_json::from_str(text)
        .map_err(|e| CoreError::MalformedReport(format!("invalid report JSON: {e}")))
}

/// Non-propagating parse variant for call sites that cannot carry `CoreError`
///
/// Returns a descriptive, non-localized error string on failure.
pub fn try_parse_report(text: &str) -> Result<AnalyzerReport, String> {
    parse_report(text).map_err(|e| e.to_string())
}
