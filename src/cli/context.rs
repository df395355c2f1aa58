use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tracing::warn;

use crate::{
    ai::{FallbackChain, InsightAssistant, InsightCache},
    config::{Config, ConfigManager},
    core::{FinanceTracker, SystemClock},
    storage::JsonFileStore,
    utils::paths,
};

use super::commands;
use super::error::{CliError, CommandError};
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub tracker: FinanceTracker<JsonFileStore>,
    pub assistant: InsightAssistant<FallbackChain>,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub app_dir: PathBuf,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, &paths::app_data_dir())
    }

    /// Builds a shell whose config and data live under `app_dir`.
    pub fn with_base_dir(mode: CliMode, app_dir: &Path) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(app_dir)?;
        let config = config_manager.load_or_default();
        apply_output_preferences(&config);

        let store = JsonFileStore::open(&config.resolve_data_dir(app_dir))?;
        let tracker =
            FinanceTracker::open_with(store, Arc::new(SystemClock), config.default_spending_limit)?;
        for warning in tracker.load_warnings() {
            cli_io::print_warning(warning);
        }

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            tracker,
            assistant: build_assistant(&config),
            config_manager,
            config,
            theme: ColorfulTheme::default(),
            app_dir: app_dir.to_path_buf(),
        })
    }

    pub fn prompt(&self) -> String {
        format!("expense [{}]> ", self.money(self.tracker.current_balance()))
    }

    pub fn money(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn insight_cache(&self) -> InsightCache<'_, JsonFileStore> {
        InsightCache::new(self.tracker.store(), self.config.insight_cache_ttl_secs)
    }

    /// Saves the active configuration and re-applies the settings that other parts read.
    pub(crate) fn persist_config(&mut self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        apply_output_preferences(&self.config);
        self.assistant = build_assistant(&self.config);
        Ok(())
    }

    /// Script mode never blocks on a prompt and treats every question as confirmed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|entry| entry.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        crate::cli::shell::handle_line(self, line)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &input.to_lowercase()), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Ai(err) => {
                warn!(error = %err, "insight narration failed");
                cli_io::print_error(err);
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }
}

fn apply_output_preferences(config: &Config) {
    output::set_preferences(OutputPreferences {
        color_enabled: config.ui_color_enabled,
        quiet_mode: false,
    });
}

fn build_assistant(config: &Config) -> InsightAssistant<FallbackChain> {
    InsightAssistant::new(
        FallbackChain::new().ordered_by(&config.ai.providers),
        config.ai.clone(),
        &config.currency_symbol,
    )
}
