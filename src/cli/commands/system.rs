use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
        CommandDefinition::new("version", "Show version information", "version", cmd_version),
        CommandDefinition::new("config", "Show the effective configuration", "config", cmd_config),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
        CommandDefinition::new("quit", "Exit the shell", "quit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("Booking Core {}", env!("CARGO_PKG_VERSION")));
    output::info(format!("  Package : {}", env!("CARGO_PKG_NAME")));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("  API base URL : {}", config.api_base_url));
    output::info(format!("  Timeout      : {}s", config.request_timeout_secs));
    output::info(format!(
        "  Plain output : {}",
        if config.plain_output { "on" } else { "off" }
    ));
    if let Some(path) = &context.config_path {
        output::info(format!("  Config file  : {}", path.display()));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.registry.get(&name.to_lowercase()) {
            Some(definition) => help::print_command(definition),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
