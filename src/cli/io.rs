//! Terminal interaction for the finance shell: labelled figures coloured by how healthy
//! they are, plus yes/no confirmations.

use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::error::CommandError;
use crate::cli::output;
use crate::core::services::{LimitLevel, SpendStatus};

pub use crate::cli::output::{
    error as print_error, hint as print_hint, info as print_info, success as print_success,
    warning as print_warning,
};

/// Colour applied to a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Good,
    Caution,
    Alert,
}

impl From<LimitLevel> for Tone {
    fn from(level: LimitLevel) -> Self {
        match level {
            LimitLevel::Safe => Tone::Neutral,
            LimitLevel::Caution => Tone::Caution,
            LimitLevel::Exceeded => Tone::Alert,
        }
    }
}

impl From<SpendStatus> for Tone {
    fn from(status: SpendStatus) -> Self {
        match status {
            SpendStatus::Good => Tone::Good,
            SpendStatus::Warning => Tone::Caution,
            SpendStatus::Danger => Tone::Alert,
        }
    }
}

pub fn print_toned(tone: Tone, message: impl fmt::Display) {
    match tone {
        Tone::Neutral => output::info(message),
        Tone::Good => output::success(message),
        Tone::Caution => output::warning(message),
        Tone::Alert => output::error(message),
    }
}

/// A block of `label : value` lines whose labels share one column width.
#[derive(Debug, Clone, Copy)]
pub struct Figures {
    width: usize,
}

impl Figures {
    pub const fn new(width: usize) -> Self {
        Self { width }
    }

    pub fn line(&self, label: &str, value: impl fmt::Display) -> String {
        format!("{label:<width$} : {value}", width = self.width)
    }

    pub fn show(&self, label: &str, value: impl fmt::Display) {
        output::info(self.line(label, value));
    }

    pub fn show_toned(&self, tone: Tone, label: &str, value: impl fmt::Display) {
        print_toned(tone, self.line(label, value));
    }
}

pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}
