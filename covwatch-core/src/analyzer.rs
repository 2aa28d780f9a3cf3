//! External analyzer invocation
//!
//! Runs the external static-analysis binary for a repository and returns
//! its raw JSON output. The core never parses source text itself.
//!
//! Global invariants enforced:
//! - Invocation is bounded by a fixed timeout
//! - A timed-out child is killed and reaped; no orphaned process lingers
//! - Timeout or unusable output fails the whole assessment; there is no
//!   partial result

use crate::error::CoreError;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Default analyzer binary name, resolved via PATH
pub const DEFAULT_ANALYZER_BIN: &str = "covlint";

/// Default invocation timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// How the analyzer subprocess is launched
#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub binary: PathBuf,
    pub timeout: Duration,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            binary: PathBuf::from(DEFAULT_ANALYZER_BIN),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Run the analyzer for a repository and return its raw JSON text
///
/// A non-zero exit that still produced stdout is accepted: analyzers
/// commonly exit non-zero when diagnostics were found. Non-zero exit with
/// empty stdout, a missing binary, and a timeout all map to
/// `CoreError::ExternalTool`.
pub fn run_analyzer(repo_path: &Path, options: &AnalyzerOptions) -> Result<String, CoreError> {
    let mut child = Command::new(&options.binary)
        .arg("analyze")
        .arg(repo_path)
        .arg("--format")
        .arg("json")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            CoreError::ExternalTool(format!(
                "failed to launch analyzer '{}': {}",
                options.binary.display(),
                e
            ))
        })?;

    // Drain stdout on a separate thread so a large report cannot fill the
    // pipe and deadlock the wait loop
    let stdout = child.stdout.take();
    let reader = std::thread::spawn(move || {
        let mut buffer = String::new();
        if let Some(mut out) = stdout {
            let _ = out.read_to_string(&mut buffer);
        }
        buffer
    });

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= options.timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(CoreError::ExternalTool(format!(
                        "analyzer timed out after {}s",
                        options.timeout.as_secs()
                    )));
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(e) => {
                return Err(CoreError::ExternalTool(format!(
                    "failed to wait for analyzer: {e}"
                )));
            }
        }
    };

    let raw = reader.join().unwrap_or_default();

    if !status.success() && raw.trim().is_empty() {
        return Err(CoreError::ExternalTool(format!(
            "analyzer exited with {status} and produced no output"
        )));
    }

    Ok(raw)
}
