//! Error taxonomy shared by the three command flows.
//!
//! Errors are raised as [`DvkError`] and travel inside [`anyhow::Error`], so
//! command code can keep using `?` and `.context(..)` while tests (and the
//! scaffolder's cancel handling) can still `downcast_ref` to a concrete kind.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DvkError {
    #[error("Source file '{}' does not exist", .0.display())]
    SourceMissing(PathBuf),

    #[error("Target directory '{}' does not exist", .0.display())]
    TargetDirMissing(PathBuf),

    #[error("No write permission to '{}'. Try running with sudo.", .0.display())]
    TargetDirNotWritable(PathBuf),

    #[error("Could not find a suitable bin directory")]
    NoSuitableDirectory,

    #[error("Installation failed - {reason}: {}", .path.display())]
    VerificationFailed { path: PathBuf, reason: &'static str },

    #[error("Invalid suffix '{0}': it must not contain path separators")]
    InvalidSuffix(String),

    #[error("Cannot backup root directory")]
    RootDirectory,

    #[error("Cannot write to parent directory '{}'", .0.display())]
    ParentNotWritable(PathBuf),

    #[error("{tool} exited with status {code}")]
    ToolFailed { tool: String, code: i32 },

    #[error("Verification failed: backup '{}' not found", .0.display())]
    BackupMissing(PathBuf),

    #[error("Cancelled")]
    Cancelled,
}

/// Returns true when `err` (or anything in its chain) is a user cancellation.
pub fn is_cancelled(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|e| matches!(e.downcast_ref::<DvkError>(), Some(DvkError::Cancelled)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_is_cancelled_through_context() {
        let err = Err::<(), _>(DvkError::Cancelled)
            .context("Workspace selection")
            .unwrap_err();
        assert!(is_cancelled(&err));
    }

    #[test]
    fn test_other_errors_are_not_cancellation() {
        let err = anyhow::Error::from(DvkError::NoSuitableDirectory);
        assert!(!is_cancelled(&err));
        assert_eq!(err.to_string(), "Could not find a suitable bin directory");
    }
}
