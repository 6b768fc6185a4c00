//! Clean snapshots of a project directory (`dvk clone`).
//!
//! The snapshot lands next to the source as `<dir>_<suffix>` (a directory
//! copied with `rsync`) or `<dir>_<suffix>.tar.gz` (an archive written by
//! `tar`). Build output, VCS metadata and editor droppings are excluded.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DvkError, is_cancelled};
use crate::exec::{CommandRunner, display_command};
use crate::fs_utils::{format_bytes, probe_writable, remove_path};
use crate::prompt::Prompter;
use crate::ui::Ui;

/// Patterns never copied into a snapshot
pub const EXCLUDE_PATTERNS: [&str; 35] = [
    "build", "Build", "cmake-build-*", "out", "bin", "obj", "node_modules",
    "__pycache__", ".pytest_cache", "target", "dist", ".git", ".svn", ".hg",
    ".vscode", ".idea", "*.swp", "*.swo", "*~", "*.o", "*.obj", "*.exe",
    "*.dll", "*.so", "*.dylib", "*.class", "*.pyc", "*.pyo", ".tmp", "*.tmp",
    "*.temp", ".DS_Store", "Thumbs.db", "*.log", "logs",
];

const ARCHIVE_EXT: &str = ".tar.gz";

/// Suffix used when none is given: `clean_YYYYMMDD_HHMMSS`
pub fn default_suffix(now: &NaiveDateTime) -> String {
    now.format("clean_%Y%m%d_%H%M%S").to_string()
}

pub fn backup_name(dir_name: &str, suffix: &str, compress: bool) -> String {
    let mut name = format!("{}_{}", dir_name, suffix);
    if compress {
        name.push_str(ARCHIVE_EXT);
    }
    name
}

#[derive(Debug, Clone, Default)]
pub struct CloneRequest {
    /// Directory to snapshot (the current directory from the CLI)
    pub source: PathBuf,
    /// Explicit suffix; a timestamp is used when `None`
    pub suffix: Option<String>,
    pub compress: bool,
    /// Patterns excluded on top of [`EXCLUDE_PATTERNS`]
    pub extra_excludes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneReport {
    pub destination: PathBuf,
    /// Archive size; directory copies are not measured
    pub size: Option<u64>,
}

#[derive(Debug)]
pub enum CloneOutcome {
    Created(CloneReport),
    Cancelled,
}

/// Resolved locations for one snapshot
#[derive(Debug, Clone)]
struct ClonePlan {
    source: PathBuf,
    parent: PathBuf,
    dir_name: String,
    destination: PathBuf,
    compress: bool,
    excludes: Vec<String>,
}

pub struct Cloner<'a> {
    runner: &'a dyn CommandRunner,
    prompter: &'a mut dyn Prompter,
    ui: &'a Ui,
}

impl<'a> Cloner<'a> {
    pub fn new(runner: &'a dyn CommandRunner, prompter: &'a mut dyn Prompter, ui: &'a Ui) -> Self {
        Self {
            runner,
            prompter,
            ui,
        }
    }

    pub fn run(&mut self, request: &CloneRequest) -> Result<CloneOutcome> {
        let plan = plan(request)?;
        preflight(&plan)?;

        if !self.prepare_destination(&plan)? {
            return Ok(CloneOutcome::Cancelled);
        }

        self.ui.info(format!(
            "Creating clean backup: {}",
            file_name_of(&plan.destination)
        ));
        self.ui.info(format!("Source: {}", plan.source.display()));
        self.ui.info(format!("Target: {}", plan.destination.display()));

        if plan.compress {
            self.execute("tar", tar_args(&plan))?;
        } else {
            self.execute("rsync", rsync_args(&plan))?;
        }

        let report = self.summarize(&plan)?;
        Ok(CloneOutcome::Created(report))
    }

    /// Returns false when the user keeps an existing backup.
    fn prepare_destination(&mut self, plan: &ClonePlan) -> Result<bool> {
        if fs::symlink_metadata(&plan.destination).is_err() {
            return Ok(true);
        }

        self.ui.warn(format!(
            "Backup '{}' already exists",
            file_name_of(&plan.destination)
        ));
        let overwrite = match self.prompter.confirm("Overwrite?", false) {
            Ok(answer) => answer,
            Err(err) if is_cancelled(&err) => false,
            Err(err) => return Err(err),
        };
        if !overwrite {
            return Ok(false);
        }

        self.ui.info("Removing existing backup...");
        remove_path(&plan.destination).context("Failed to remove existing backup")?;
        Ok(true)
    }

    fn execute(&self, tool: &str, args: Vec<String>) -> Result<()> {
        self.ui.debug(display_command(tool, &args));

        let spinner = self.ui.spinner(format!("Running {}...", tool));
        let result = self.runner.run(tool, &args);
        spinner.finish_and_clear();

        let output = result.with_context(|| format!("Could not run {}. Is it installed?", tool))?;
        for line in output.stdout.lines() {
            self.ui.debug(line);
        }
        if !output.success() {
            return Err(DvkError::ToolFailed {
                tool: tool.to_string(),
                code: output.code,
            }
            .into());
        }
        Ok(())
    }

    fn summarize(&self, plan: &ClonePlan) -> Result<CloneReport> {
        let meta = fs::metadata(&plan.destination)
            .map_err(|_| DvkError::BackupMissing(plan.destination.clone()))?;

        let size = if plan.compress { Some(meta.len()) } else { None };
        match size {
            Some(bytes) if bytes > 0 => self.ui.success(format!(
                "Clean backup created successfully ({})",
                format_bytes(bytes)
            )),
            _ => self.ui.success("Clean backup created successfully"),
        }
        self.ui.info("  Excluded: build dirs, compiled files, IDE configs, etc.");
        let relative = Path::new("..").join(file_name_of(&plan.destination));
        self.ui.info(format!("  Location: {}", relative.display()));

        Ok(CloneReport {
            destination: plan.destination.clone(),
            size,
        })
    }
}

fn plan(request: &CloneRequest) -> Result<ClonePlan> {
    let source = std::path::absolute(&request.source)
        .with_context(|| format!("Failed to resolve '{}'", request.source.display()))?;

    let (Some(parent), Some(dir_name)) = (source.parent(), source.file_name()) else {
        return Err(DvkError::RootDirectory.into());
    };

    let suffix = match &request.suffix {
        Some(suffix) if suffix.contains(std::path::MAIN_SEPARATOR) || suffix.is_empty() => {
            return Err(DvkError::InvalidSuffix(suffix.clone()).into());
        }
        Some(suffix) => suffix.clone(),
        None => default_suffix(&chrono::Local::now().naive_local()),
    };

    let dir_name = dir_name.to_string_lossy().to_string();
    let destination = parent.join(backup_name(&dir_name, &suffix, request.compress));

    let mut excludes: Vec<String> = EXCLUDE_PATTERNS.iter().map(|p| p.to_string()).collect();
    excludes.extend(request.extra_excludes.iter().cloned());

    Ok(ClonePlan {
        parent: parent.to_path_buf(),
        source,
        dir_name,
        destination,
        compress: request.compress,
        excludes,
    })
}

fn preflight(plan: &ClonePlan) -> Result<()> {
    if !plan.source.is_dir() {
        anyhow::bail!("Source '{}' is not a directory", plan.source.display());
    }
    if !probe_writable(&plan.parent) {
        return Err(DvkError::ParentNotWritable(plan.parent.clone()).into());
    }
    Ok(())
}

fn exclude_flags(plan: &ClonePlan) -> impl Iterator<Item = String> + '_ {
    plan.excludes.iter().map(|p| format!("--exclude={}", p))
}

fn rsync_args(plan: &ClonePlan) -> Vec<String> {
    let mut args = vec!["-av".to_string()];
    args.extend(exclude_flags(plan));
    args.push(format!("{}/", plan.source.display()));
    args.push(format!("{}/", plan.destination.display()));
    args
}

fn tar_args(plan: &ClonePlan) -> Vec<String> {
    let mut args = vec![
        "-czvf".to_string(),
        plan.destination.display().to_string(),
    ];
    args.extend(exclude_flags(plan));
    args.push("-C".to_string());
    args.push(plan.parent.display().to_string());
    args.push(plan.dir_name.clone());
    args
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
