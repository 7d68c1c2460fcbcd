//! Terminal front-end for the step wizards.
//!
//! [`FormEngine`] walks a [`WizardController`] step by step, asking a
//! [`FormInteraction`] for each field. Completing a step's fields calls
//! `advance`; a failing step prints its field warnings and is asked again.
//! After the last step the entries are reviewed and submitted.

use std::collections::{BTreeMap, HashMap};

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::output;
use crate::controllers::{AppContext, SubmitOutcome, WizardController};
use crate::forms::{FieldDescriptor, FieldKind, FormFlow, ValidationError};

/// Lifecycle result of one wizard run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormResult {
    Submitted(SubmitOutcome),
    Cancelled,
}

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value.
    Value(String),
    /// Keep the current value.
    Keep,
    /// Abort the wizard.
    Cancel,
    /// Go back to the previous field (or step).
    Back,
    /// Show the field's help text.
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirm,
    Back,
    Cancel,
}

/// Everything an interaction needs to render one prompt.
pub struct PromptContext<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub current: Option<String>,
    pub step_title: &'a str,
    pub step_index: usize,
    pub step_count: usize,
    pub error: Option<&'a ValidationError>,
}

pub trait FormInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    fn confirm(&mut self, lines: &[String]) -> ConfirmationResponse;
}

/// Drives a [`WizardController`] with a [`FormInteraction`].
pub struct FormEngine<'a, F: FormFlow> {
    wizard: &'a mut WizardController<F>,
    ctx: &'a AppContext,
}

impl<'a, F: FormFlow> FormEngine<'a, F> {
    pub fn new(wizard: &'a mut WizardController<F>, ctx: &'a AppContext) -> Self {
        Self { wizard, ctx }
    }

    pub fn run<I: FormInteraction>(&mut self, interaction: &mut I) -> FormResult {
        loop {
            if self.wizard.session().is_reviewing() {
                let lines = self.summary_lines();
                match interaction.confirm(&lines) {
                    ConfirmationResponse::Confirm => match self.wizard.submit(self.ctx) {
                        SubmitOutcome::Saved => return FormResult::Submitted(SubmitOutcome::Saved),
                        SubmitOutcome::Invalid => {
                            self.print_errors();
                            continue;
                        }
                        SubmitOutcome::Rejected | SubmitOutcome::Unreachable => {
                            // Wizard stays open; the user may retry or cancel.
                            continue;
                        }
                        other => return FormResult::Submitted(other),
                    },
                    ConfirmationResponse::Back => {
                        self.wizard.retreat();
                        continue;
                    }
                    ConfirmationResponse::Cancel => return FormResult::Cancelled,
                }
            }

            match self.prompt_step(interaction) {
                StepFlow::Completed => {
                    if !self.wizard.advance(self.ctx) {
                        self.print_errors();
                    }
                }
                StepFlow::Back => self.wizard.retreat(),
                StepFlow::Cancelled => return FormResult::Cancelled,
            }
        }
    }

    fn prompt_step<I: FormInteraction>(&mut self, interaction: &mut I) -> StepFlow {
        let session = self.wizard.session();
        let step_index = session.step_index();
        let step_count = session.step_count();
        let Some(step) = session.current_step().cloned() else {
            return StepFlow::Completed;
        };

        let mut idx = 0;
        let mut visited: Vec<usize> = Vec::new();
        while idx < step.fields.len() {
            let field = &step.fields[idx];
            let session = self.wizard.session();
            if session.is_locked(field) || !session.is_enabled(field.key) {
                idx += 1;
                continue;
            }

            let response = {
                let context = PromptContext {
                    descriptor: field,
                    current: session.value(field.key).filter(|value| !value.is_empty()),
                    step_title: step.title,
                    step_index,
                    step_count,
                    error: session.errors().get(field.key),
                };
                interaction.prompt_field(&context)
            };

            match response {
                PromptResponse::Value(raw) => match self.wizard.set_field(field.key, &raw) {
                    Ok(()) => {
                        visited.push(idx);
                        idx += 1;
                    }
                    Err(err) => output::warning(format!("{}: {}", field.label, err)),
                },
                PromptResponse::Keep => {
                    visited.push(idx);
                    idx += 1;
                }
                PromptResponse::Help => {
                    output::info(field.help.unwrap_or("No additional help for this field."));
                }
                PromptResponse::Back => match visited.pop() {
                    Some(previous) => idx = previous,
                    None if step_index > 0 => return StepFlow::Back,
                    None => output::hint("Already at the first field."),
                },
                PromptResponse::Cancel => return StepFlow::Cancelled,
            }
        }
        StepFlow::Completed
    }

    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec!["Review your entries:".to_string()];
        lines.extend(
            self.wizard
                .session()
                .summary()
                .into_iter()
                .map(|(label, value)| format!("  {}: {}", label, value)),
        );
        lines
    }

    fn print_errors(&self) {
        let session = self.wizard.session();
        for (key, err) in session.errors().iter() {
            let label = session
                .descriptor()
                .field(key)
                .map(|field| field.label)
                .unwrap_or(key);
            output::warning(format!("{}: {}", label, err));
        }
    }
}

enum StepFlow {
    Completed,
    Back,
    Cancelled,
}

/// Interactive prompts built on dialoguer.
///
/// Text fields accept `:back`, `:help`, `:cancel` and `:clear`; an empty
/// answer keeps the current value.
pub struct WizardInteraction {
    theme: ColorfulTheme,
}

impl Default for WizardInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardInteraction {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn print_context(&self, context: &PromptContext<'_>) {
        output::section(format!(
            "Step {} of {}: {}",
            context.step_index + 1,
            context.step_count,
            context.step_title
        ));
        if let Some(err) = context.error {
            output::warning(err);
        }
    }

    fn prompt_text(&self, context: &PromptContext<'_>) -> PromptResponse {
        let prompt = match &context.current {
            Some(current) => format!("{} [{}]", context.descriptor.label, current),
            None => context.descriptor.label.to_string(),
        };
        let answer = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        match answer {
            Ok(value) => parse_text_answer(&value),
            Err(_) => PromptResponse::Cancel,
        }
    }

    fn prompt_select(&self, context: &PromptContext<'_>, options: &[String]) -> PromptResponse {
        if options.is_empty() {
            output::hint("No options loaded; type the value instead.");
            return self.prompt_text(context);
        }

        let mut items = options.to_vec();
        items.push("<- Back".to_string());
        let default = context
            .current
            .as_ref()
            .and_then(|current| options.iter().position(|option| option == current))
            .unwrap_or(0);

        let choice = Select::with_theme(&self.theme)
            .with_prompt(context.descriptor.label)
            .items(&items)
            .default(default)
            .interact_opt();
        match choice {
            Ok(Some(index)) if index == options.len() => PromptResponse::Back,
            Ok(Some(index)) => {
                let picked = &options[index];
                if context.current.as_deref() == Some(picked.as_str()) {
                    PromptResponse::Keep
                } else {
                    PromptResponse::Value(picked.clone())
                }
            }
            Ok(None) | Err(_) => PromptResponse::Cancel,
        }
    }
}

impl FormInteraction for WizardInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        self.print_context(context);
        match &context.descriptor.kind {
            FieldKind::Choice(options) => self.prompt_select(context, options),
            FieldKind::Boolean => {
                let options = vec!["Yes".to_string(), "No".to_string()];
                self.prompt_select(context, &options)
            }
            _ => self.prompt_text(context),
        }
    }

    fn confirm(&mut self, lines: &[String]) -> ConfirmationResponse {
        output::section("Review");
        for line in lines {
            output::info(line);
        }
        let choice = Select::with_theme(&self.theme)
            .with_prompt("Save?")
            .items(&["Save", "Back", "Cancel"])
            .default(0)
            .interact_opt();
        match choice {
            Ok(Some(0)) => ConfirmationResponse::Confirm,
            Ok(Some(1)) => ConfirmationResponse::Back,
            _ => ConfirmationResponse::Cancel,
        }
    }
}

fn parse_text_answer(value: &str) -> PromptResponse {
    match value.trim() {
        "" => PromptResponse::Keep,
        ":back" => PromptResponse::Back,
        ":help" => PromptResponse::Help,
        ":cancel" => PromptResponse::Cancel,
        ":clear" => PromptResponse::Value(String::new()),
        _ => PromptResponse::Value(value.to_string()),
    }
}

/// Answers prompts from `key=value` pairs. Fields without a pair keep
/// their value. A field asked for a second time means the first answer was
/// rejected, so the run is cancelled instead of looping.
pub struct ScriptInteraction {
    answers: BTreeMap<String, String>,
    asked: HashMap<&'static str, usize>,
    confirmations: usize,
}

impl ScriptInteraction {
    pub fn new(answers: BTreeMap<String, String>) -> Self {
        Self {
            answers,
            asked: HashMap::new(),
            confirmations: 0,
        }
    }
}

impl FormInteraction for ScriptInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        let count = self.asked.entry(context.descriptor.key).or_insert(0);
        *count += 1;
        if *count > 1 {
            return PromptResponse::Cancel;
        }
        match self.answers.get(context.descriptor.key) {
            Some(value) => PromptResponse::Value(value.clone()),
            None => PromptResponse::Keep,
        }
    }

    fn confirm(&mut self, _lines: &[String]) -> ConfirmationResponse {
        self.confirmations += 1;
        if self.confirmations > 1 {
            ConfirmationResponse::Cancel
        } else {
            ConfirmationResponse::Confirm
        }
    }
}
