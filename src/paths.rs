use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "DVK_CONFIG";

/// Directory names under $HOME offered as workspaces by `dvk create`
const WORKSPACE_DIRS: [&str; 4] = ["workspace", "projects", "code", "dev"];

/// All computed paths used by dvk
#[derive(Debug, Clone)]
pub struct Paths {
    /// ~
    pub home_dir: PathBuf,
    /// ~/.config/dvk/config.json (or $DVK_CONFIG)
    pub config_file: PathBuf,
}

impl Paths {
    pub fn new() -> Result<Self> {
        let base_dirs = BaseDirs::new().context("Failed to determine home directory")?;
        let home_dir = base_dirs.home_dir().to_path_buf();

        let config_file = match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => ProjectDirs::from("", "", "dvk")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| home_dir.join(".config").join("dvk"))
                .join("config.json"),
        };

        Ok(Self {
            home_dir,
            config_file,
        })
    }

    /// Expand a leading `~` (alone or followed by a separator) to the home directory.
    ///
    /// `~user` forms are left untouched.
    pub fn expand_user(&self, input: &str) -> PathBuf {
        if input == "~" {
            return self.home_dir.clone();
        }
        match input.strip_prefix("~/") {
            Some(rest) => self.home_dir.join(rest),
            None => PathBuf::from(input),
        }
    }

    /// Conventional workspace locations, extra configured ones, then `cwd`.
    ///
    /// Nothing is filtered here; see [`existing_unique_dirs`].
    pub fn workspace_candidates(&self, extra: &[String], cwd: &Path) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = WORKSPACE_DIRS
            .iter()
            .map(|dir| self.home_dir.join(dir))
            .collect();
        candidates.extend(extra.iter().map(|dir| self.expand_user(dir)));
        candidates.push(cwd.to_path_buf());
        candidates
    }
}

/// Keep existing directories only, dropping any that resolve to an
/// already-kept directory. Order is preserved.
pub fn existing_unique_dirs(candidates: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen: Vec<PathBuf> = Vec::new();
    let mut kept = Vec::new();

    for candidate in candidates {
        if !candidate.is_dir() {
            continue;
        }
        let resolved = std::fs::canonicalize(&candidate).unwrap_or_else(|_| candidate.clone());
        if seen.contains(&resolved) {
            continue;
        }
        seen.push(resolved);
        kept.push(candidate);
    }

    kept
}
