//! Filesystem utility functions
//!
//! This module provides common filesystem operations used across the codebase.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Execute bits for user, group and other
const EXEC_BITS: u32 = 0o111;

/// Check whether `dir` accepts new files by creating and immediately
/// removing a probe file inside it.
pub fn probe_writable(dir: &Path) -> bool {
    let probe = dir.join(format!(".dvk_writetest.{}", std::process::id()));
    match OpenOptions::new().write(true).create_new(true).open(&probe) {
        Ok(file) => {
            drop(file);
            let _ = fs::remove_file(&probe);
            true
        }
        Err(_) => false,
    }
}

/// Whether the owner execute bit is set on `path` (symlinks are followed)
pub fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o100 != 0)
        .unwrap_or(false)
}

/// Add execute bits for user, group and other if the owner bit is missing.
///
/// Returns `true` when the permissions were changed.
pub fn make_executable(path: &Path) -> Result<bool> {
    let meta = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;
    let mode = meta.permissions().mode();
    if mode & 0o100 != 0 {
        return Ok(false);
    }

    let mut perms = meta.permissions();
    perms.set_mode(mode | EXEC_BITS);
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to make {} executable", path.display()))?;
    Ok(true)
}

/// Remove whatever lives at `path`: file, symlink (dangling included) or directory tree.
///
/// Returns `false` when there was nothing to remove.
pub fn remove_path(path: &Path) -> Result<bool> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(_) => return Ok(false),
    };

    if meta.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory {}", path.display()))?;
    } else {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(true)
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
