//! Snapshot container and persistence
//!
//! Wraps one assessed report in an immutable, point-in-time snapshot and
//! persists it under a content-derived repository key.
//!
//! Global invariants enforced:
//! - Snapshots are immutable after creation; newer snapshots supersede,
//!   never overwrite
//! - Write-through persistence: `create_snapshot` returns only after the
//!   record is durably on disk (temp file + rename)
//! - One file per snapshot; filenames encode timestamp + id so directory
//!   listings are naturally chronological
//! - A corrupt record is skipped on listing, never escalated

use crate::delta::Comparison;
use crate::error::CoreError;
use crate::hotspot::{compute_hotspots, Hotspot};
use crate::report::{AnalyzerReport, Diagnostic, ReportSummary};
use crate::risk::{compute_risk_score, RiskScore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

/// Schema version for persisted snapshot records
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Hex length of the derived repository key
const REPO_KEY_LEN: usize = 16;

/// Hex length of generated snapshot identifiers
const SNAPSHOT_ID_LEN: usize = 12;

/// Compact UTC stamp used in snapshot filenames
const FILE_STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second]Z");

/// Persisted, immutable point-in-time assessment of one repository
///
/// Carries the report summary, the full diagnostic list (kept for later
/// line-level lookups), the derived hotspots and risk score, and
/// best-effort VCS metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Snapshot {
    pub schema_version: u32,
    pub id: String,
    pub repo_path: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    pub risk_score: RiskScore,
    pub summary: ReportSummary,
    pub hotspots: Vec<Hotspot>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Snapshot {
    /// Serialize to JSON (deterministic field ordering)
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(self).map_err(CoreError::Serialize)
    }

    /// Deserialize from JSON, validating the schema version
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidSnapshot(e.to_string()))?;

        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(CoreError::InvalidSnapshot(format!(
                "schema version mismatch: expected {}, got {}",
                SNAPSHOT_SCHEMA_VERSION, snapshot.schema_version
            )));
        }

        Ok(snapshot)
    }
}

/// Derive the stable storage key for a repository path
///
/// Normalizes separators to `/`, lowercases, trims a trailing separator,
/// and takes a SHA-256 hex prefix. Case and slash-style variants of the
/// same path deliberately share one key (and therefore one snapshot
/// history); genuinely distinct paths collide only with negligible
/// probability.
pub fn repository_key(repo_path: &str) -> String {
    let mut normalized = repo_path.replace('\\', "/").to_lowercase();
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    let digest = Sha256::digest(normalized.as_bytes());
    hex::encode(digest)[..REPO_KEY_LEN].to_string()
}

/// Fresh globally-unique snapshot identifier (12 hex characters)
fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()[..SNAPSHOT_ID_LEN].to_string()
}

/// Filename for a snapshot record: `<utc-stamp>_<id>.json`
fn snapshot_file_name(snapshot: &Snapshot) -> String {
    let stamp = snapshot
        .timestamp
        .format(FILE_STAMP)
        .unwrap_or_else(|_| snapshot.timestamp.unix_timestamp().to_string());
    format!("{}_{}.json", stamp, snapshot.id)
}

/// Write data to a file atomically using temp file + rename
fn atomic_write(path: &Path, contents: &str) -> Result<(), CoreError> {
    let storage = |source: std::io::Error| CoreError::Storage {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(storage)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path).map_err(storage)?;
    file.write_all(contents.as_bytes()).map_err(storage)?;
    file.sync_all().map_err(storage)?;
    drop(file);

    fs::rename(&temp_path, path).map_err(storage)?;

    Ok(())
}

/// On-disk snapshot store rooted at an explicit directory
///
/// The root is always passed in rather than discovered implicitly, so
/// tests can redirect it to an ephemeral directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SnapshotStore { root: root.into() }
    }

    /// Conventional per-user storage root
    pub fn default_root() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("covwatch")
            .join("snapshots")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repo_dir(&self, repo_path: &str) -> PathBuf {
        self.root.join(repository_key(repo_path))
    }

    /// Assess a report into a snapshot and persist it write-through
    ///
    /// VCS metadata is fetched best-effort (failures become None fields);
    /// hotspots and risk score are derived fresh. The record is durably on
    /// disk before this returns.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Storage` / `CoreError::Serialize` if the write
    /// fails; a failed write would break trend continuity, so it is never
    /// swallowed.
    pub fn create_snapshot(
        &self,
        repo_path: &Path,
        report: &AnalyzerReport,
    ) -> Result<Snapshot, CoreError> {
        let vcs = crate::git::vcs_info(repo_path);
        let hotspots = compute_hotspots(report);
        let risk_score = compute_risk_score(report, &hotspots);

        let snapshot = Snapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            id: generate_id(),
            repo_path: repo_path.to_string_lossy().into_owned(),
            timestamp: OffsetDateTime::now_utc(),
            git_commit: vcs.commit,
            git_branch: vcs.branch,
            risk_score,
            summary: report.summary.clone(),
            hotspots,
            diagnostics: report.diagnostics.clone(),
        };

        let path = self
            .repo_dir(&snapshot.repo_path)
            .join(snapshot_file_name(&snapshot));
        atomic_write(&path, &snapshot.to_json()?)?;

        Ok(snapshot)
    }

    /// All persisted snapshots for a repository, newest first
    ///
    /// Records that fail to read or deserialize are skipped with a warning
    /// so one corrupt file cannot take down the whole history.
    pub fn list_snapshots(&self, repo_path: &Path) -> Result<Vec<Snapshot>, CoreError> {
        let dir = self.repo_dir(&repo_path.to_string_lossy());
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let storage = |source: std::io::Error| CoreError::Storage {
            path: dir.clone(),
            source,
        };

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&dir).map_err(storage)? {
            let entry = entry.map_err(storage)?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable snapshot record");
                    continue;
                }
            };

            match Snapshot::from_json(&json) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping corrupt snapshot record");
                }
            }
        }

        // Newest first; id tie-break keeps the order total when timestamps collide
        snapshots.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(snapshots)
    }

    /// Most recent snapshot for a repository, or None when there is none
    pub fn latest_snapshot(&self, repo_path: &Path) -> Result<Option<Snapshot>, CoreError> {
        Ok(self.list_snapshots(repo_path)?.into_iter().next())
    }

    /// Compare two already-loaded snapshots (pure, no I/O)
    pub fn compare(&self, baseline: &Snapshot, current: &Snapshot) -> Comparison {
        crate::delta::compare(baseline, current)
    }
}
