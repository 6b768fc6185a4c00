//! Executable installation.
//!
//! `dvk install` places a file into a bin directory by copy or symlink,
//! optionally picking the directory itself. The pipeline is:
//!
//! 1. validate the source (exists, regular file)
//! 2. resolve the target directory (explicit, auto-detected or default)
//! 3. check the directory exists and is writable (or we are root)
//! 4. make the source executable, replace any existing entry, place the file
//! 5. verify the result is present and executable
//!
//! Nothing is mutated before step 4. A failed verification is reported but
//! the placed file is left in place.

use anyhow::{Context, Result};
use nix::unistd::{AccessFlags, access, geteuid};
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use crate::error::DvkError;
use crate::exec::CommandRunner;
use crate::fs_utils::{is_executable, make_executable, remove_path};
use crate::ui::Ui;

/// Where files go when neither `--target-dir` nor config says otherwise
pub const DEFAULT_TARGET_DIR: &str = "/usr/local/bin";

/// Commands whose location hints at the system bin directory
const PROBE_COMMANDS: [&str; 5] = ["ls", "cat", "echo", "sh", "which"];

/// Conventional bin directories tried after the probe commands
const FALLBACK_DIRS: [&str; 3] = ["/usr/local/bin", "/usr/bin", "/bin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Duplicate the file's bytes
    #[default]
    Copy,
    /// Record a symbolic link to the absolute source path
    Link,
    /// Copy into an auto-detected bin directory
    Auto,
}

#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub source: PathBuf,
    pub mode: InstallMode,
    /// Explicit directory; overrides auto-detection and the default
    pub target_dir: Option<PathBuf>,
}

impl InstallRequest {
    pub fn new(source: impl Into<PathBuf>, mode: InstallMode) -> Self {
        Self {
            source: source.into(),
            mode,
            target_dir: None,
        }
    }

    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(dir.into());
        self
    }
}

/// Permission checks used to decide whether a directory may receive files.
pub trait Privileges {
    fn can_write(&self, dir: &Path) -> bool;
    fn is_elevated(&self) -> bool;
}

/// `access(2)` and the effective uid of this process
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPrivileges;

impl Privileges for SystemPrivileges {
    fn can_write(&self, dir: &Path) -> bool {
        access(dir, AccessFlags::W_OK).is_ok()
    }

    fn is_elevated(&self) -> bool {
        geteuid().is_root()
    }
}

pub struct Installer<'a> {
    runner: &'a dyn CommandRunner,
    privileges: &'a dyn Privileges,
    ui: &'a Ui,
    default_dir: PathBuf,
    fallback_dirs: Vec<PathBuf>,
}

impl<'a> Installer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, privileges: &'a dyn Privileges, ui: &'a Ui) -> Self {
        Self {
            runner,
            privileges,
            ui,
            default_dir: PathBuf::from(DEFAULT_TARGET_DIR),
            fallback_dirs: FALLBACK_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the `/usr/local/bin` default used by copy and link modes
    pub fn with_default_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_dir = dir.into();
        self
    }

    pub fn with_fallback_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.fallback_dirs = dirs;
        self
    }

    fn permitted(&self, dir: &Path) -> bool {
        self.privileges.can_write(dir) || self.privileges.is_elevated()
    }

    /// Find a bin directory we may write to.
    ///
    /// Looks at the directories holding a few ubiquitous commands first, then
    /// at the conventional fallbacks. Touches nothing on disk.
    pub fn auto_detect_dir(&self) -> Result<PathBuf> {
        for cmd in PROBE_COMMANDS {
            let output = match self.runner.run("which", &[cmd.to_string()]) {
                Ok(output) if output.success() => output,
                _ => continue,
            };
            let Some(line) = output.stdout.lines().next().map(str::trim) else {
                continue;
            };
            if line.is_empty() {
                continue;
            }

            let cmd_path = Path::new(line);
            if !cmd_path.is_file() {
                continue;
            }
            if let Some(bin_dir) = cmd_path.parent()
                && self.permitted(bin_dir)
            {
                self.ui.debug(format!("'{}' found in {}", cmd, bin_dir.display()));
                return Ok(bin_dir.to_path_buf());
            }
        }

        for dir in &self.fallback_dirs {
            if dir.is_dir() && self.permitted(dir) {
                return Ok(dir.clone());
            }
        }

        Err(DvkError::NoSuitableDirectory.into())
    }

    fn resolve_target_dir(&self, request: &InstallRequest) -> Result<PathBuf> {
        match (&request.target_dir, request.mode) {
            (Some(dir), _) => Ok(dir.clone()),
            (None, InstallMode::Auto) => {
                let dir = self.auto_detect_dir()?;
                self.ui.info(format!("Auto-detected bin directory: {}", dir.display()));
                Ok(dir)
            }
            (None, _) => Ok(self.default_dir.clone()),
        }
    }

    fn check_target_dir(&self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            return Err(DvkError::TargetDirMissing(dir.to_path_buf()).into());
        }
        if !self.permitted(dir) {
            return Err(DvkError::TargetDirNotWritable(dir.to_path_buf()).into());
        }
        Ok(())
    }

    /// Run the full install pipeline, returning the installed path.
    pub fn install(&self, request: &InstallRequest) -> Result<PathBuf> {
        let source = &request.source;
        if !source.is_file() {
            return Err(DvkError::SourceMissing(source.clone()).into());
        }
        let file_name = source
            .file_name()
            .with_context(|| format!("Source '{}' has no file name", source.display()))?;
        let source_abs = std::path::absolute(source)
            .with_context(|| format!("Failed to resolve '{}'", source.display()))?;

        let target_dir = self.resolve_target_dir(request)?;
        self.check_target_dir(&target_dir)?;
        let target = target_dir.join(file_name);

        if make_executable(&source_abs)? {
            self.ui.info(format!("Made '{}' executable", source_abs.display()));
        }

        if is_source_itself(&source_abs, &target) {
            self.ui.warn(format!(
                "'{}' is already the installed file, nothing to place",
                target.display()
            ));
        } else {
            self.place(&source_abs, &target, request.mode)?;
            self.ui.success(format!(
                "Successfully installed '{}' to '{}'",
                file_name.to_string_lossy(),
                target_dir.display()
            ));
        }

        self.verify(&target)?;
        self.ui.success(format!(
            "Installation verified: '{}' is executable",
            file_name.to_string_lossy()
        ));
        Ok(target)
    }

    fn place(&self, source: &Path, target: &Path, mode: InstallMode) -> Result<()> {
        if remove_path(target)? {
            self.ui.info(format!("Removed existing '{}'", target.display()));
        }

        match mode {
            InstallMode::Copy | InstallMode::Auto => {
                self.ui.info(format!(
                    "Copying '{}' to '{}'...",
                    source.display(),
                    target.display()
                ));
                fs::copy(source, target).with_context(|| {
                    format!(
                        "Failed to copy {} -> {}",
                        source.display(),
                        target.display()
                    )
                })?;
                make_executable(target)?;
            }
            InstallMode::Link => {
                self.ui.info(format!(
                    "Creating symbolic link '{}' -> '{}'...",
                    target.display(),
                    source.display()
                ));
                symlink(source, target).with_context(|| {
                    format!(
                        "Failed to create symbolic link {} -> {}",
                        target.display(),
                        source.display()
                    )
                })?;
            }
        }
        Ok(())
    }

    /// Check the installed entry exists and is executable.
    pub fn verify(&self, target: &Path) -> Result<()> {
        if !target.exists() {
            return Err(DvkError::VerificationFailed {
                path: target.to_path_buf(),
                reason: "target does not exist",
            }
            .into());
        }
        if !is_executable(target) {
            return Err(DvkError::VerificationFailed {
                path: target.to_path_buf(),
                reason: "target is not executable",
            }
            .into());
        }
        Ok(())
    }
}

/// True when `target` is the source file itself rather than a link to it.
///
/// A symlink at `target` is never the source, so it always gets replaced.
fn is_source_itself(source: &Path, target: &Path) -> bool {
    match fs::symlink_metadata(target) {
        Ok(meta) if !meta.file_type().is_symlink() => {}
        _ => return false,
    }
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
