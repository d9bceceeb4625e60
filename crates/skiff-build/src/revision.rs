use std::path::Path;
use std::process::Command;

/// Short identifier of the current source state, via
/// `git rev-parse --short HEAD`.
pub fn short_revision(project_dir: &Path) -> Result<String, RevisionError> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .current_dir(project_dir)
        .output()
        .map_err(|e| RevisionError::GitCommand {
            detail: "failed to execute git rev-parse".to_owned(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RevisionError::GitFailed {
            detail: format!(
                "git rev-parse exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        });
    }

    let revision = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if revision.is_empty() {
        return Err(RevisionError::GitFailed {
            detail: "git rev-parse produced no revision".to_owned(),
        });
    }

    Ok(revision)
}

/// Checks whether the git working tree has uncommitted changes.
pub fn is_dirty(project_dir: &Path) -> Result<bool, RevisionError> {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(project_dir)
        .output()
        .map_err(|e| RevisionError::GitCommand {
            detail: "failed to execute git status".to_owned(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(RevisionError::GitFailed {
            detail: format!(
                "git status exited with {}: {}",
                output.status,
                stderr.trim()
            ),
        });
    }

    Ok(!output.stdout.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum RevisionError {
    #[error("git command failed: {detail}")]
    GitCommand {
        detail: String,
        source: std::io::Error,
    },
    #[error("git failed: {detail}")]
    GitFailed { detail: String },
}
