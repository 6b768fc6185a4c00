//! Console output for dvk: leveled messages, tables and spinners.
//!
//! Color is decided once, in priority order: `--no-color`, `NO_COLOR`,
//! `TERM=dumb`, then `--color` (where `auto` means "stdout is a TTY").
//! Every line is written under [`OUTPUT_LOCK`].

use anstream::{eprintln, println};
use anstyle::{AnsiColor, Color, Style};
use clap::ValueEnum;
use comfy_table::{Attribute, Cell, ContentArrangement, Table, presets};
use indicatif::{ProgressBar, ProgressStyle};
use std::borrow::Cow;
use std::io::IsTerminal;
use std::sync::Mutex;
use std::time::Duration;

/// Process-wide console lock
static OUTPUT_LOCK: Mutex<()> = Mutex::new(());

const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Always,
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Never,
}

/// Message severity; decides label, color and stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Ok,
    Warn,
    Error,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    fn color(self) -> AnsiColor {
        match self {
            Level::Debug => AnsiColor::BrightBlack,
            Level::Info => AnsiColor::Cyan,
            Level::Ok => AnsiColor::Green,
            Level::Warn => AnsiColor::Yellow,
            Level::Error => AnsiColor::Red,
        }
    }
}

/// Whether output should carry ANSI colors
fn wants_color(
    mode: ColorMode,
    force_no_color: bool,
    env: impl Fn(&str) -> Option<String>,
    stdout_is_tty: bool,
) -> bool {
    if force_no_color || env("NO_COLOR").is_some() {
        return false;
    }
    if env("TERM").as_deref() == Some("dumb") {
        return false;
    }
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stdout_is_tty,
    }
}

#[derive(Debug, Clone)]
pub struct Ui {
    pub color_enabled: bool,
    /// Spinners need both color and a TTY
    pub spinner_enabled: bool,
    /// Print [`Level::Debug`] lines
    pub verbose: bool,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(ColorMode::Auto, false)
    }
}

impl Ui {
    pub fn new(mode: ColorMode, force_no_color: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let color_enabled = wants_color(mode, force_no_color, |k| std::env::var(k).ok(), is_tty);
        if !color_enabled {
            anstream::ColorChoice::write_global(anstream::ColorChoice::Never);
        }

        Self {
            color_enabled,
            spinner_enabled: color_enabled && is_tty,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.color_enabled {
            format!("{style}{text}{style:#}")
        } else {
            text.to_string()
        }
    }

    /// Print `msg` behind a level label. Errors go to stderr.
    pub fn emit(&self, level: Level, msg: &str) {
        if level == Level::Debug && !self.verbose {
            return;
        }

        let label_style = Style::new().fg_color(Some(Color::Ansi(level.color()))).bold();
        let label = self.paint(label_style, level.label());
        let body = if level == Level::Debug {
            self.dim(msg)
        } else {
            msg.to_string()
        };

        let _guard = OUTPUT_LOCK.lock();
        if level == Level::Error {
            eprintln!("{label} {body}");
        } else {
            println!("{label} {body}");
        }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.emit(Level::Ok, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.emit(Level::Warn, msg.as_ref());
    }

    pub fn err(&self, msg: impl AsRef<str>) {
        self.emit(Level::Error, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.emit(Level::Info, msg.as_ref());
    }

    /// Only shown with `--verbose`
    pub fn debug(&self, msg: impl AsRef<str>) {
        self.emit(Level::Debug, msg.as_ref());
    }

    pub fn dim(&self, s: impl AsRef<str>) -> String {
        let style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack)));
        self.paint(style, s.as_ref())
    }

    pub fn bold(&self, s: impl AsRef<str>) -> String {
        self.paint(Style::new().bold(), s.as_ref())
    }

    /// Borderless key/value table, used for summaries
    pub fn simple_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    /// Bordered table; plain ASCII when colors are off
    pub fn table(&self) -> Table {
        let preset = if self.color_enabled {
            presets::UTF8_FULL_CONDENSED
        } else {
            presets::ASCII_MARKDOWN
        };
        let mut table = Table::new();
        table
            .load_preset(preset)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    pub fn cell(&self, content: impl Into<String>) -> Cell {
        Cell::new(content.into())
    }

    pub fn header_cell(&self, content: impl Into<String>) -> Cell {
        let cell = self.cell(content);
        if self.color_enabled {
            cell.add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }

    /// Spinner shown while an external tool runs; hidden unless enabled.
    pub fn spinner(&self, message: impl Into<Cow<'static, str>>) -> ProgressBar {
        let pb = if self.spinner_enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message);

        if self.spinner_enabled {
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_chars(SPINNER_TICKS)
                .template("{spinner:.cyan} {msg}")
            {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(80));
        }
        pb
    }

    pub fn println(&self, msg: impl AsRef<str>) {
        let _guard = OUTPUT_LOCK.lock();
        println!("{}", msg.as_ref());
    }

    pub fn newline(&self) {
        self.println("");
    }

    /// Bold heading line
    pub fn section(&self, title: impl AsRef<str>) {
        self.println(self.bold(title));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_color_mode_values() {
        assert_eq!(ColorMode::from_str("always", true).unwrap(), ColorMode::Always);
        assert_eq!(ColorMode::from_str("AUTO", true).unwrap(), ColorMode::Auto);
        assert_eq!(ColorMode::from_str("never", true).unwrap(), ColorMode::Never);
        assert!(ColorMode::from_str("sometimes", true).is_err());
    }

    #[test]
    fn test_color_priority() {
        let none = env_of(&[]);
        assert!(!wants_color(ColorMode::Always, true, &none, true));
        assert!(!wants_color(ColorMode::Always, false, env_of(&[("NO_COLOR", "")]), true));
        assert!(!wants_color(ColorMode::Always, false, env_of(&[("TERM", "dumb")]), true));
        assert!(wants_color(ColorMode::Always, false, env_of(&[("TERM", "xterm")]), false));
        assert!(wants_color(ColorMode::Auto, false, &none, true));
        assert!(!wants_color(ColorMode::Auto, false, &none, false));
        assert!(!wants_color(ColorMode::Never, false, &none, true));
    }

    #[test]
    fn test_force_no_color_disables_spinner() {
        let ui = Ui::new(ColorMode::Always, true);
        assert!(!ui.color_enabled);
        assert!(!ui.spinner_enabled);
    }

    #[test]
    fn test_plain_styling_without_color() {
        let ui = Ui::new(ColorMode::Never, false);
        assert_eq!(ui.dim("test"), "test");
        assert_eq!(ui.bold("test"), "test");
    }

    #[test]
    fn test_verbose_defaults_off() {
        let ui = Ui::new(ColorMode::Never, false);
        assert!(!ui.verbose);
        assert!(ui.with_verbose(true).verbose);
    }

    #[test]
    fn test_level_labels() {
        assert_eq!(Level::Ok.label(), "OK");
        assert_eq!(Level::Error.label(), "ERROR");
        assert_eq!(Level::Debug.color(), AnsiColor::BrightBlack);
    }

    #[test]
    fn test_spinner_disabled_is_hidden() {
        let ui = Ui::new(ColorMode::Never, false);
        let pb = ui.spinner("working");
        assert!(pb.is_hidden());
        pb.finish_and_clear();
    }
}
