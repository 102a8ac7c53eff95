//! Terminal prompts: numbered menus and free-text input.

use dialoguer::Input;
use indicatif::ProgressBar;

use strapsync_core::{Chooser, CoreError, InvalidSelection, parse_choice};

use crate::error::CliError;
use crate::output::{bold, dim};

/// Numbered-menu chooser. Invalid answers are reported and asked again.
pub struct TerminalChooser {
    color: bool,
    spinner: Option<ProgressBar>,
}

impl TerminalChooser {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            spinner: None,
        }
    }

    /// Pause `spinner` while a menu is on screen.
    pub fn with_spinner(mut self, spinner: ProgressBar) -> Self {
        self.spinner = Some(spinner);
        self
    }

    fn ask(&self, prompt: &str, options: &[String]) -> Result<usize, CoreError> {
        if options.is_empty() {
            return Err(InvalidSelection::NoOptions.into());
        }
        eprintln!();
        eprintln!("{}", bold(prompt, self.color));
        for (i, option) in options.iter().enumerate() {
            eprintln!("  {} {option}", dim(&format!("{:>2}.", i + 1), self.color));
        }

        loop {
            let answer: String = Input::new()
                .with_prompt(format!("Choice [1-{}]", options.len()))
                .interact_text()
                .map_err(|e| CoreError::Io(std::io::Error::other(e)))?;
            match parse_choice(&answer, options.len()) {
                Ok(index) => return Ok(index),
                Err(e) => eprintln!("Invalid choice: {e}"),
            }
        }
    }
}

impl Chooser for TerminalChooser {
    fn choose(&mut self, prompt: &str, options: &[String]) -> Result<usize, CoreError> {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| self.ask(prompt, options)),
            None => self.ask(prompt, options),
        }
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Prompt for a non-empty line of text.
pub fn text(prompt: &str) -> Result<String, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.trim().is_empty() {
                Err("value cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(prompt_err)?;
    Ok(value.trim().to_string())
}

/// Prompt for a password without echo.
pub fn password(prompt: &str) -> Result<String, CliError> {
    let value = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if value.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(value)
}
