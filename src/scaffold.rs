//! Interactive project wizard behind `dvk create`.
//!
//! The wizard walks four steps (name and type, workspace, build system,
//! confirmation). Each step loops until it gets valid input; there is no
//! retry limit. Cancelling any prompt or declining the confirmation ends in
//! [`WizardOutcome::Cancelled`] and nothing is written.
//!
//! Project creation afterwards is not transactional: a failed write leaves
//! whatever was already written in place.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::is_cancelled;
use crate::paths::Paths;
use crate::prompt::Prompter;
use crate::templates::{BuildSystem, ProjectType, project_files};
use crate::ui::Ui;

/// Everything collected by the wizard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    pub name: String,
    pub project_type: ProjectType,
    pub build_system: BuildSystem,
    pub workspace: PathBuf,
}

impl ProjectSpec {
    pub fn project_path(&self) -> PathBuf {
        self.workspace.join(&self.name)
    }
}

#[derive(Debug)]
pub enum WizardOutcome {
    Confirmed(ProjectSpec),
    Cancelled,
}

/// Non-empty, ASCII letters/digits, `_` and `-` only
pub fn is_valid_project_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub struct Wizard<'a> {
    prompter: &'a mut dyn Prompter,
    ui: &'a Ui,
    paths: &'a Paths,
    /// Existing, deduplicated workspace directories to offer
    workspaces: Vec<PathBuf>,
}

impl<'a> Wizard<'a> {
    pub fn new(
        prompter: &'a mut dyn Prompter,
        ui: &'a Ui,
        paths: &'a Paths,
        workspaces: Vec<PathBuf>,
    ) -> Self {
        Self {
            prompter,
            ui,
            paths,
            workspaces,
        }
    }

    pub fn run(&mut self) -> Result<WizardOutcome> {
        match self.collect() {
            Ok(Some(spec)) => Ok(WizardOutcome::Confirmed(spec)),
            Ok(None) => Ok(WizardOutcome::Cancelled),
            Err(err) if is_cancelled(&err) => Ok(WizardOutcome::Cancelled),
            Err(err) => Err(err),
        }
    }

    fn collect(&mut self) -> Result<Option<ProjectSpec>> {
        self.ui.section("Project Information");
        let name = self.ask_name()?;
        let project_type = self.ask_project_type()?;

        self.ui.section("Workspace Selection");
        let workspace = self.ask_workspace()?;

        self.ui.section("Build System");
        let build_system = self.ask_build_system()?;

        let spec = ProjectSpec {
            name,
            project_type,
            build_system,
            workspace,
        };

        if self.confirm(&spec)? {
            Ok(Some(spec))
        } else {
            Ok(None)
        }
    }

    fn ask_name(&mut self) -> Result<String> {
        loop {
            let name = self.prompter.text("Project name:")?;
            if is_valid_project_name(&name) {
                return Ok(name);
            }
            self.ui.err("Invalid name. Use letters, numbers, hyphens, and underscores only.");
        }
    }

    fn ask_project_type(&mut self) -> Result<ProjectType> {
        let types = ProjectType::all();
        let options: Vec<String> = types.iter().map(|t| t.description().to_string()).collect();
        let index = self.prompter.select("Project type:", &options)?;
        Ok(types[index])
    }

    fn ask_workspace(&mut self) -> Result<PathBuf> {
        if self.workspaces.is_empty() {
            return self.ask_custom_path();
        }

        let mut options: Vec<String> = self
            .workspaces
            .iter()
            .map(|ws| ws.display().to_string())
            .collect();
        options.push("Enter custom path".to_string());

        let index = self.prompter.select("Select workspace:", &options)?;
        match self.workspaces.get(index) {
            Some(ws) => Ok(ws.clone()),
            None => self.ask_custom_path(),
        }
    }

    fn ask_custom_path(&mut self) -> Result<PathBuf> {
        loop {
            let input = self.prompter.text("Enter workspace path:")?;
            if input.is_empty() {
                continue;
            }
            let path = self.paths.expand_user(&input);
            if path.is_dir() {
                return Ok(path);
            }
            self.ui.err(format!("Directory doesn't exist: {}", path.display()));
        }
    }

    fn ask_build_system(&mut self) -> Result<BuildSystem> {
        let systems = BuildSystem::all();
        let options: Vec<String> = systems
            .iter()
            .map(|s| s.description().to_string())
            .collect();
        let index = self.prompter.select("Build system:", &options)?;
        Ok(systems[index])
    }

    fn confirm(&mut self, spec: &ProjectSpec) -> Result<bool> {
        let ui = self.ui;
        let mut table = ui.simple_table();
        table.add_row(vec![ui.cell("Name:"), ui.header_cell(&spec.name)]);
        table.add_row(vec![ui.cell("Type:"), ui.cell(spec.project_type.to_string())]);
        table.add_row(vec![
            ui.cell("Build system:"),
            ui.cell(spec.build_system.to_string()),
        ]);
        table.add_row(vec![
            ui.cell("Location:"),
            ui.cell(spec.project_path().display().to_string()),
        ]);

        ui.newline();
        ui.println(table.to_string());
        self.prompter.confirm("Create this project?", true)
    }
}

/// Write the project tree for `spec`, returning the project directory.
pub fn create_project(spec: &ProjectSpec, ui: &Ui) -> Result<PathBuf> {
    let project_path = spec.project_path();
    if project_path.exists() {
        ui.warn(format!(
            "Directory {} exists, files will be overwritten.",
            project_path.display()
        ));
    }
    ui.info(format!("Creating project at: {}", project_path.display()));

    let src_dir = project_path.join("src");
    fs::create_dir_all(&src_dir)
        .with_context(|| format!("Failed to create directory: {}", src_dir.display()))?;

    for file in project_files(&spec.name, spec.project_type, spec.build_system) {
        write_file(&project_path.join(&file.path), &file.contents)?;
        ui.success(format!("Created {}", file.path));
    }

    Ok(project_path)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
