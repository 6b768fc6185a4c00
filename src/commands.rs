//! High-level command orchestration for the CLI.
//!
//! One handler per verb in `main.rs`. Handlers wire the real collaborators
//! (process runner, privilege checks, terminal prompter) into the flow
//! modules:
//! - `crate::installer` for `install` and `bootstrap`
//! - `crate::scaffold` for `create`
//! - `crate::cloner` for `clone`
//!
//! A user cancellation is reported as a warning and is not an error.

use anyhow::{Context, Result};
use clap::Command;
use clap_complete::Shell;
use std::path::{Path, PathBuf};

use crate::cloner::{CloneOutcome, CloneRequest, Cloner};
use crate::config::Config;
use crate::exec::ProcessRunner;
use crate::installer::{DEFAULT_TARGET_DIR, InstallMode, InstallRequest, Installer, SystemPrivileges};
use crate::paths::{Paths, existing_unique_dirs};
use crate::prompt::TerminalPrompter;
use crate::scaffold::{Wizard, WizardOutcome, create_project};
use crate::ui::Ui;

/// Verbs shown by the overview, in display order
const OVERVIEW: [(&str, &str); 6] = [
    ("create", "Create a new C/C++/Assembly project interactively"),
    ("install <file>", "Install an executable into a bin directory"),
    ("clone [suffix]", "Make a clean copy of the current directory"),
    ("bootstrap", "Install dvk itself"),
    ("completions <shell>", "Print a shell completion script"),
    ("help", "Show usage for dvk or a command"),
];

fn load_config(paths: &Paths, ui: &Ui) -> Result<Config> {
    let config = Config::read(&paths.config_file)?;
    ui.debug(format!("Config: {}", paths.config_file.display()));
    Ok(config)
}

fn default_install_dir(config: &Config) -> PathBuf {
    config
        .install_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET_DIR))
}

/// Run the project wizard and write the project
pub fn create(paths: &Paths, ui: &Ui) -> Result<()> {
    let config = load_config(paths, ui)?;
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let workspaces = existing_unique_dirs(paths.workspace_candidates(&config.workspaces, &cwd));

    ui.section("New project");

    let mut prompter = TerminalPrompter;
    let outcome = Wizard::new(&mut prompter, ui, paths, workspaces).run()?;
    let spec = match outcome {
        WizardOutcome::Confirmed(spec) => spec,
        WizardOutcome::Cancelled => {
            ui.warn("Cancelled.");
            return Ok(());
        }
    };

    let project_path = create_project(&spec, ui)?;

    ui.newline();
    ui.success(format!("Project '{}' created", spec.name));
    ui.println(format!("  cd {}", project_path.display()));
    Ok(())
}

/// Install `file` into a bin directory
pub fn install(
    paths: &Paths,
    ui: &Ui,
    file: &Path,
    mode: InstallMode,
    target_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(paths, ui)?;

    let mut request = InstallRequest::new(file, mode);
    if let Some(dir) = target_dir {
        request = request.with_target_dir(dir);
    }

    let runner = ProcessRunner;
    let privileges = SystemPrivileges;
    let target = Installer::new(&runner, &privileges, ui)
        .with_default_dir(default_install_dir(&config))
        .install(&request)?;

    ui.success(format!("Installed {}", target.display()));
    Ok(())
}

/// Snapshot the current directory next to itself
pub fn clone(paths: &Paths, ui: &Ui, suffix: Option<String>, compress: bool) -> Result<()> {
    let config = load_config(paths, ui)?;
    let source = std::env::current_dir().context("Failed to determine current directory")?;

    let request = CloneRequest {
        source,
        suffix,
        compress,
        extra_excludes: config.exclude_patterns,
    };

    let runner = ProcessRunner;
    let mut prompter = TerminalPrompter;
    match Cloner::new(&runner, &mut prompter, ui).run(&request)? {
        CloneOutcome::Created(_) => {}
        CloneOutcome::Cancelled => ui.warn("Backup cancelled."),
    }
    Ok(())
}

/// Install the running dvk binary
pub fn bootstrap(paths: &Paths, ui: &Ui) -> Result<()> {
    let config = load_config(paths, ui)?;
    let exe = std::env::current_exe().context("Failed to locate the running dvk executable")?;

    ui.info("Installing dvk...");
    ui.warn("You might need to use sudo.");

    let runner = ProcessRunner;
    let privileges = SystemPrivileges;
    let request = InstallRequest::new(exe, InstallMode::Copy);
    let target = Installer::new(&runner, &privileges, ui)
        .with_default_dir(default_install_dir(&config))
        .install(&request)?;

    ui.success(format!("dvk installed to {}", target.display()));
    Ok(())
}

/// Command overview printed when dvk runs without a verb
pub fn overview(ui: &Ui) {
    let mut table = ui.table();
    table.set_header(vec![ui.header_cell("Command"), ui.header_cell("Description")]);
    for (usage, about) in OVERVIEW {
        table.add_row(vec![ui.cell(format!("dvk {}", usage)), ui.cell(about)]);
    }

    ui.section("dvk - developer workflow toolkit");
    ui.println(table.to_string());
    ui.newline();
    ui.println(format!("Run {} for details.", ui.bold("dvk help <command>")));
}

/// Write a completion script for `shell` to stdout
pub fn completions(cmd: &mut Command, shell: Shell) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, &mut std::io::stdout());
}
