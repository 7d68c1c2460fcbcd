//! Shell construction, dispatch, and error reporting.

use std::{env, io, path::PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;

use crate::api::HttpTransport;
use crate::config::{Config, ConfigManager};
use crate::controllers::{AppContext, DetailViewer, ListController, WizardController};
use crate::errors::BookingError;
use crate::forms::{BookingFlow, RoomFlow};

use super::commands::{self, CommandRegistry};
use super::notify::CliNotifier;
use super::output;
pub use super::shell_context::{CliMode, ShellContext};

/// When set, the shell reads commands from stdin without prompting.
pub const SCRIPT_ENV: &str = "BOOKING_CORE_CLI_SCRIPT";
/// When set in script mode, confirmations are answered with yes.
pub const ASSUME_YES_ENV: &str = "BOOKING_CORE_ASSUME_YES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failures that stop the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BookingError),
    #[error("{0}")]
    Input(String),
    #[error("{0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl ShellContext {
    /// Loads configuration and builds the HTTP-backed context.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        output::apply_config(&config);

        let transport = HttpTransport::new(&config).map_err(BookingError::from)?;
        let notifier = CliNotifier::new(mode, env::var_os(ASSUME_YES_ENV).is_some());
        let app = AppContext::with_system_clock(transport, notifier);

        Ok(Self::with_app(
            mode,
            config,
            Some(config_manager.path().to_path_buf()),
            app,
        ))
    }

    /// Builds a shell around an existing context.
    pub fn with_app(
        mode: CliMode,
        config: Config,
        config_path: Option<PathBuf>,
        app: AppContext,
    ) -> Self {
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            app,
            config,
            config_path,
            rooms: ListController::new(),
            bookings: ListController::new(),
            room_wizard: WizardController::new(RoomFlow::new()),
            booking_wizard: WizardController::new(BookingFlow::new()),
            detail: DetailViewer::new(),
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn prompt(&self) -> String {
        "booking> ".to_string()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.registry.get(command) {
            let handler = definition.handler;
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

    /// Tokenizes and dispatches one line of input.
    pub fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());
        let control = self.dispatch(&command, raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest_match(input, self.registry.names()) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Exit shell?")
            .default(true)
            .interact()
            .map_err(|err| CliError::Input(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}

/// Closest command name within an edit distance of 3.
pub(crate) fn closest_match<'a>(
    input: &str,
    names: impl Iterator<Item = &'a str>,
) -> Option<&'a str> {
    let needle = input.to_lowercase();
    names
        .map(|name| (levenshtein(name, &needle), name))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_nearby_command_names() {
        let names = ["room", "booking", "help", "exit"];
        assert_eq!(closest_match("bookng", names.iter().copied()), Some("booking"));
        assert_eq!(closest_match("ROM", names.iter().copied()), Some("room"));
        assert_eq!(closest_match("zzzzzzzz", names.iter().copied()), None);
    }
}
