use std::collections::{BTreeMap, HashMap};

pub mod booking;
pub mod room;
pub mod system;

use crate::api::Resource;
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::forms::{FormEngine, FormResult, ScriptInteraction, WizardInteraction};
use crate::cli::output;
use crate::cli::ui::table_renderer::Table;
use crate::controllers::{
    list::ListRow, AppContext, DeleteOutcome, ListController, ListState, WizardController,
};
use crate::forms::{FormDescriptor, FormFlow};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(room::definitions());
    commands.extend(booking::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Splits `action rest...`; no action means `list`.
pub(crate) fn split_action<'a, 'b>(args: &'a [&'b str]) -> (String, &'a [&'b str]) {
    match args.split_first() {
        Some((action, rest)) => (action.to_ascii_lowercase(), rest),
        None => ("list".to_string(), &[]),
    }
}

/// Parses the leading id argument, returning it and the remaining args.
pub(crate) fn take_id<'a, 'b>(args: &'a [&'b str], usage: &str) -> Result<(u32, &'a [&'b str]), CommandError> {
    let (raw, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    let id = raw
        .trim_start_matches('#')
        .parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!("`{}` is not a valid id", raw))
        })?;
    Ok((id, rest))
}

pub(crate) fn no_extra_args(args: &[&str], usage: &str) -> CommandResult {
    if args.is_empty() {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!("usage: {}", usage)))
    }
}

/// Parses `key=value` arguments against the form's field keys.
pub(crate) fn parse_assignments(
    args: &[&str],
    descriptor: &FormDescriptor,
    editing: bool,
) -> Result<BTreeMap<String, String>, CommandError> {
    let mut answers = BTreeMap::new();
    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!("expected key=value, got `{}`", arg))
        })?;
        let key = key.trim().to_ascii_lowercase();
        let field = descriptor.field(&key).ok_or_else(|| {
            let known: Vec<&str> = descriptor.fields().map(|field| field.key).collect();
            CommandError::InvalidArguments(format!(
                "unknown field `{}` (expected one of: {})",
                key,
                known.join(", ")
            ))
        })?;
        if editing && field.locked_on_edit {
            return Err(CommandError::InvalidArguments(format!(
                "{} cannot be changed while editing",
                field.label
            )));
        }
        answers.insert(key, value.to_string());
    }
    Ok(answers)
}

/// Script mode has no prompts, so values must come from arguments.
pub(crate) fn ensure_answers(mode: CliMode, answers: &BTreeMap<String, String>) -> CommandResult {
    if mode == CliMode::Script && answers.is_empty() {
        return Err(CommandError::InvalidArguments(
            "key=value pairs are required in script mode".into(),
        ));
    }
    Ok(())
}

/// Runs an already opened wizard to completion and closes it.
pub(crate) fn run_wizard<F: FormFlow>(
    wizard: &mut WizardController<F>,
    app: &AppContext,
    answers: BTreeMap<String, String>,
) -> FormResult {
    let result = {
        let mut engine = FormEngine::new(wizard, app);
        if answers.is_empty() {
            engine.run(&mut WizardInteraction::new())
        } else {
            engine.run(&mut ScriptInteraction::new(answers))
        }
    };
    wizard.close();
    if result == FormResult::Cancelled {
        output::info("Cancelled; nothing was saved.");
    }
    result
}

pub(crate) fn show_list<E: Resource + ListRow>(title: &str, list: &ListController<E>) {
    output::section(title);
    match list.state() {
        ListState::Loaded(_) => output::block(Table::for_listing(list.headers(), list.rows()).render()),
        ListState::Failed => output::error(list.state().message().unwrap_or_default()),
        state => output::info(state.message().unwrap_or_default()),
    }
}

/// Shows the refreshed list after a delete, or notes that nothing happened.
pub(crate) fn report_delete<E: Resource + ListRow>(
    title: &str,
    list: &ListController<E>,
    outcome: DeleteOutcome,
) {
    match outcome {
        DeleteOutcome::Declined => output::info("Deletion cancelled."),
        _ => show_list(title, list),
    }
}
