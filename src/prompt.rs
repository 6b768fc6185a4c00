//! Interactive input.
//!
//! The wizard and the cloner's overwrite question only talk to [`Prompter`].
//! [`TerminalPrompter`] is the `inquire`-backed implementation used by the CLI;
//! a cancelled prompt (Esc / Ctrl-C) surfaces as [`DvkError::Cancelled`].

use anyhow::Result;
use inquire::{Confirm, InquireError, Select, Text};

use crate::error::DvkError;

pub trait Prompter {
    /// Free-form line of text, trimmed of surrounding whitespace
    fn text(&mut self, message: &str) -> Result<String>;

    /// Pick one of `options`, returning its index
    fn select(&mut self, message: &str, options: &[String]) -> Result<usize>;

    /// Yes/no question with a default answer
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn text(&mut self, message: &str) -> Result<String> {
        let answer = Text::new(message).prompt().map_err(map_inquire)?;
        Ok(answer.trim().to_string())
    }

    fn select(&mut self, message: &str, options: &[String]) -> Result<usize> {
        let choice = Select::new(message, options.to_vec())
            .raw_prompt()
            .map_err(map_inquire)?;
        Ok(choice.index)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        Confirm::new(message)
            .with_default(default)
            .prompt()
            .map_err(map_inquire)
    }
}

fn map_inquire(err: InquireError) -> anyhow::Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            DvkError::Cancelled.into()
        }
        other => anyhow::Error::new(other).context("Failed to read input"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::is_cancelled;

    #[test]
    fn test_cancel_maps_to_cancelled() {
        assert!(is_cancelled(&map_inquire(InquireError::OperationCanceled)));
        assert!(is_cancelled(&map_inquire(InquireError::OperationInterrupted)));
    }

    #[test]
    fn test_other_inquire_errors_are_failures() {
        let err = map_inquire(InquireError::NotTTY);
        assert!(!is_cancelled(&err));
        assert!(err.to_string().contains("Failed to read input"));
    }
}
