//! VCS metadata collaborator
//!
//! Best-effort retrieval of (commit, branch) for a repository path.
//!
//! Global invariants enforced:
//! - Lookups never fail the caller: every failure collapses to None
//! - Commit and branch are two independent lookups
//! - Uses the git CLI directly (no libgit2) for portability

use std::path::Path;
use std::process::Command;

/// Optional commit/branch metadata attached to snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsInfo {
    pub commit: Option<String>,
    pub branch: Option<String>,
}

/// Execute a git command in a directory; None on any failure or empty output
fn git_at(repo_path: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!stdout.is_empty()).then_some(stdout)
}

/// Fetch commit short-hash and branch name for a repository, best-effort
///
/// Detached HEAD yields `branch: None`; a non-repository path yields both
/// fields as None. No failure is ever surfaced.
pub fn vcs_info(repo_path: &Path) -> VcsInfo {
    let commit = git_at(repo_path, &["rev-parse", "--short=12", "HEAD"]);
    let branch = git_at(repo_path, &["symbolic-ref", "--short", "HEAD"]);

    if commit.is_none() {
        tracing::debug!(path = %repo_path.display(), "no git commit metadata available");
    }

    VcsInfo { commit, branch }
}
