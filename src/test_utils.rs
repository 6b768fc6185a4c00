//! Test utilities shared across test modules
//!
//! Fakes for the three seams that touch the outside world: the command
//! runner, the permission checks and the interactive prompter.

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::error::DvkError;
use crate::exec::{CommandOutput, CommandRunner};
use crate::installer::Privileges;
use crate::paths::Paths;
use crate::prompt::Prompter;
use crate::ui::{ColorMode, Ui};

/// Create a Paths struct rooted in a temporary directory
pub fn setup_test_paths(temp_dir: &TempDir) -> Paths {
    Paths {
        home_dir: temp_dir.path().join("home"),
        config_file: temp_dir.path().join("home/.config/dvk/config.json"),
    }
}

/// Colorless, non-verbose UI
pub fn quiet_ui() -> Ui {
    Ui::new(ColorMode::Never, true)
}

type Handler = Box<dyn Fn(&str, &[String]) -> CommandOutput>;

/// Records every invocation; answers from canned stdout or a handler.
///
/// Unknown commands exit with status 1 and no output.
#[derive(Default)]
pub struct FakeRunner {
    canned: HashMap<String, String>,
    handler: Option<Handler>,
    invocations: RefCell<Vec<(String, Vec<String>)>>,
}

impl FakeRunner {
    /// Answer `line` ("program arg arg") with exit 0 and `stdout`
    pub fn with_stdout(mut self, line: &str, stdout: String) -> Self {
        self.canned.insert(line.to_string(), stdout);
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str, &[String]) -> CommandOutput + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Invocations rendered as "program arg arg"
    pub fn calls(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(|(program, args)| line_of(program, args))
            .collect()
    }

    pub fn invocations(&self) -> Vec<(String, Vec<String>)> {
        self.invocations.borrow().clone()
    }
}

fn line_of(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.invocations
            .borrow_mut()
            .push((program.to_string(), args.to_vec()));

        if let Some(stdout) = self.canned.get(&line_of(program, args)) {
            return Ok(CommandOutput {
                code: 0,
                stdout: stdout.clone(),
            });
        }
        if let Some(handler) = &self.handler {
            return Ok(handler(program, args));
        }
        Ok(CommandOutput {
            code: 1,
            stdout: String::new(),
        })
    }
}

/// Nothing is writable, not elevated
pub struct DenyAll;

impl Privileges for DenyAll {
    fn can_write(&self, _dir: &Path) -> bool {
        false
    }

    fn is_elevated(&self) -> bool {
        false
    }
}

/// Only the listed directories are writable
pub struct WritableOnly(pub Vec<PathBuf>);

impl Privileges for WritableOnly {
    fn can_write(&self, dir: &Path) -> bool {
        self.0.iter().any(|allowed| allowed == dir)
    }

    fn is_elevated(&self) -> bool {
        false
    }
}

/// Running as root
pub struct Elevated;

impl Privileges for Elevated {
    fn can_write(&self, _dir: &Path) -> bool {
        false
    }

    fn is_elevated(&self) -> bool {
        true
    }
}

/// One scripted answer per prompt call
#[derive(Debug, Clone)]
pub enum Answer {
    Text(&'static str),
    Select(usize),
    Confirm(bool),
    Cancel,
}

/// Replays answers in order and remembers every prompt message.
///
/// Running out of answers fails the prompt, which keeps a looping test from
/// hanging.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub messages: Vec<String>,
    pub options_seen: Vec<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            messages: Vec::new(),
            options_seen: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> Result<Answer> {
        self.messages.push(message.to_string());
        match self.answers.pop_front() {
            Some(Answer::Cancel) => Err(DvkError::Cancelled.into()),
            Some(answer) => Ok(answer),
            None => bail!("No scripted answer left for prompt '{}'", message),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, message: &str) -> Result<String> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text.trim().to_string()),
            other => bail!("Expected text answer for '{}', got {:?}", message, other),
        }
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<usize> {
        self.options_seen.push(options.to_vec());
        match self.next(message)? {
            Answer::Select(index) if index < options.len() => Ok(index),
            other => bail!("Bad select answer for '{}': {:?}", message, other),
        }
    }

    fn confirm(&mut self, message: &str, _default: bool) -> Result<bool> {
        match self.next(message)? {
            Answer::Confirm(yes) => Ok(yes),
            other => bail!("Expected confirm answer for '{}', got {:?}", message, other),
        }
    }
}
