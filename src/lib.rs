pub mod cloner;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fs_utils;
pub mod installer;
pub mod paths;
pub mod prompt;
pub mod scaffold;
pub mod templates;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
