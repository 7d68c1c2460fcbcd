//! Step-gated form framework behind the create/edit wizards.
//!
//! A [`FormFlow`] describes one entity form: ordered steps of fields, how
//! raw input lands in the draft, and the rules each field must satisfy at a
//! given instant. [`FormSession`] owns the in-progress draft and drives the
//! step machine (`advance` validates the current step, `retreat` does not).
//! Rendering and prompting live in the CLI layer.

pub mod booking;
pub mod room;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::NaiveDateTime;

use crate::api::Resource;
use crate::controllers::AppContext;

pub use booking::{BookingDraft, BookingFlow};
pub use room::{RoomDraft, RoomFlow};

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: BTreeMap<&'static str, ValidationError>,
}

impl FieldErrors {
    pub fn get(&self, key: &str) -> Option<&ValidationError> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ValidationError)> {
        self.entries.iter().map(|(key, err)| (*key, err))
    }

    fn insert(&mut self, key: &'static str, error: ValidationError) {
        self.entries.insert(key, error);
    }

    fn clear_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            self.entries.remove(key);
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Supported data kinds for form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Date,
    Time,
    Boolean,
    Choice(Vec<String>),
}

/// Typed value handed to a flow after kind-level coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(u32),
    Flag(bool),
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<&'static str>,
    /// Field is read-only once the entity exists.
    pub locked_on_edit: bool,
}

impl FieldDescriptor {
    pub fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            locked_on_edit: false,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    pub fn locked_on_edit(mut self) -> Self {
        self.locked_on_edit = true;
        self
    }
}

/// One page of the wizard.
#[derive(Debug, Clone)]
pub struct StepDescriptor {
    pub title: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl StepDescriptor {
    pub fn new(title: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { title, fields }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.key)
    }
}

/// Metadata describing a full wizard, including step order.
#[derive(Debug, Clone)]
pub struct FormDescriptor {
    pub name: &'static str,
    pub steps: Vec<StepDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, steps: Vec<StepDescriptor>) -> Self {
        Self { name, steps }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields().find(|field| field.key == key)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }

    /// Index of the step that owns `key`.
    pub fn step_of(&self, key: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.fields.iter().any(|field| field.key == key))
    }
}

/// Entity-specific form contract.
///
/// Implementations describe their steps, assign coerced values to the
/// draft, validate individual fields against the current instant, and
/// convert between the server entity, the draft and the write payload.
pub trait FormFlow {
    type Entity: Resource;
    type Draft: Clone + Default + fmt::Debug;

    fn descriptor(&self) -> &FormDescriptor;

    /// Text shown as the field's current value.
    fn value(&self, draft: &Self::Draft, key: &str) -> Option<String>;

    /// Stores a coerced value. Errors here are input-shape problems;
    /// business rules belong in [`FormFlow::validate`].
    fn apply(
        &self,
        draft: &mut Self::Draft,
        key: &str,
        value: FieldValue,
    ) -> Result<(), ValidationError>;

    fn validate(
        &self,
        draft: &Self::Draft,
        key: &str,
        now: NaiveDateTime,
    ) -> Result<(), ValidationError>;

    /// Whether the field currently accepts input (e.g. depends on a flag).
    fn is_enabled(&self, _draft: &Self::Draft, _key: &str) -> bool {
        true
    }

    fn draft_from(&self, entity: &Self::Entity) -> Self::Draft;

    fn to_input(
        &self,
        draft: &Self::Draft,
    ) -> Result<<Self::Entity as Resource>::Input, ValidationError>;

    /// Loads auxiliary data (choice lists) when the form opens.
    fn prepare(&mut self, _ctx: &AppContext) {}
}

/// In-progress form state: draft, current step and field errors.
pub struct FormSession<F: FormFlow> {
    flow: F,
    draft: F::Draft,
    step_index: usize,
    errors: FieldErrors,
    editing: bool,
}

impl<F: FormFlow> FormSession<F> {
    pub fn new(flow: F) -> Self {
        Self {
            flow,
            draft: F::Draft::default(),
            step_index: 0,
            errors: FieldErrors::default(),
            editing: false,
        }
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut F {
        &mut self.flow
    }

    pub fn descriptor(&self) -> &FormDescriptor {
        self.flow.descriptor()
    }

    pub fn draft(&self) -> &F::Draft {
        &self.draft
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step_count(&self) -> usize {
        self.descriptor().steps.len()
    }

    pub fn current_step(&self) -> Option<&StepDescriptor> {
        self.descriptor().steps.get(self.step_index)
    }

    /// All steps passed; only review and submission remain.
    pub fn is_reviewing(&self) -> bool {
        self.step_index >= self.step_count()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// Fresh draft with defaults, back on the first step.
    pub fn load_for_create(&mut self) {
        self.draft = F::Draft::default();
        self.step_index = 0;
        self.errors.clear();
        self.editing = false;
    }

    /// Draft mapped from a server entity, back on the first step.
    pub fn load_entity(&mut self, entity: &F::Entity) {
        self.draft = self.flow.draft_from(entity);
        self.step_index = 0;
        self.errors.clear();
        self.editing = true;
    }

    /// Empty draft that still belongs to an edit session (failed fetch).
    pub fn load_empty_edit(&mut self) {
        self.load_for_create();
        self.editing = true;
    }

    pub fn is_locked(&self, field: &FieldDescriptor) -> bool {
        self.editing && field.locked_on_edit
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.flow.is_enabled(&self.draft, key)
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.flow.value(&self.draft, key)
    }

    /// Coerces raw text by field kind and hands it to the flow.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), ValidationError> {
        let field = self
            .descriptor()
            .field(key)
            .cloned()
            .ok_or_else(|| ValidationError::new(format!("Unknown field `{}`", key)))?;

        if self.is_locked(&field) {
            return Err(ValidationError::new(format!(
                "{} cannot be changed while editing",
                field.label
            )));
        }
        if !self.is_enabled(field.key) {
            return Err(ValidationError::new(format!(
                "{} is not available right now",
                field.label
            )));
        }

        let value = coerce(&field, raw)?;
        self.flow.apply(&mut self.draft, field.key, value)
    }

    /// Validates only the fields of `step`. Records failures; returns
    /// whether the step passed. A step index out of range fails.
    pub fn validate_step(&mut self, step: usize, now: NaiveDateTime) -> bool {
        let Some(keys) = self
            .descriptor()
            .steps
            .get(step)
            .map(|step| step.keys().collect::<Vec<_>>())
        else {
            return false;
        };
        self.validate_keys(&keys, now)
    }

    /// Validates the current step and moves forward by one on success.
    pub fn advance(&mut self, now: NaiveDateTime) -> bool {
        if !self.validate_step(self.step_index, now) {
            tracing::debug!(step = self.step_index, "step validation failed");
            return false;
        }
        self.step_index += 1;
        tracing::debug!(step = self.step_index, "advanced");
        true
    }

    /// Moves back one step without validating.
    pub fn retreat(&mut self) {
        self.step_index = self.step_index.saturating_sub(1);
    }

    /// Full-entity validation: the union of every step's rules.
    pub fn validate_all(&mut self, now: NaiveDateTime) -> bool {
        let keys: Vec<&'static str> = self.descriptor().fields().map(|field| field.key).collect();
        self.validate_keys(&keys, now)
    }

    /// First step holding a recorded error.
    pub fn first_invalid_step(&self) -> Option<usize> {
        self.errors
            .iter()
            .filter_map(|(key, _)| self.descriptor().step_of(key))
            .min()
    }

    pub fn jump_to(&mut self, step: usize) {
        self.step_index = step.min(self.step_count());
    }

    pub fn to_input(&self) -> Result<<F::Entity as Resource>::Input, ValidationError> {
        self.flow.to_input(&self.draft)
    }

    /// Label/value pairs for the review screen.
    pub fn summary(&self) -> Vec<(String, String)> {
        self.descriptor()
            .fields()
            .filter(|field| self.is_enabled(field.key))
            .map(|field| {
                let value = self
                    .value(field.key)
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| "[unfilled]".to_string());
                (field.label.to_string(), value)
            })
            .collect()
    }

    fn validate_keys(&mut self, keys: &[&'static str], now: NaiveDateTime) -> bool {
        self.errors.clear_keys(keys.iter().copied());
        let mut passed = true;
        for key in keys {
            if let Err(err) = self.flow.validate(&self.draft, key, now) {
                self.errors.insert(key, err);
                passed = false;
            }
        }
        passed
    }
}

fn coerce(field: &FieldDescriptor, raw: &str) -> Result<FieldValue, ValidationError> {
    let trimmed = raw.trim();
    match &field.kind {
        FieldKind::Integer => {
            if trimmed.is_empty() {
                return Ok(FieldValue::Integer(0));
            }
            trimmed
                .parse::<u32>()
                .map(FieldValue::Integer)
                .map_err(|_| ValidationError::new("Enter a whole number (e.g., 42)"))
        }
        FieldKind::Boolean => parse_flag(trimmed).map(FieldValue::Flag).ok_or_else(|| {
            ValidationError::new("Enter yes/no, true/false, or 1/0 to indicate boolean values")
        }),
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Date | FieldKind::Time | FieldKind::Choice(_) => {
            Ok(FieldValue::Text(trimmed.to_string()))
        }
    }
}

fn parse_flag(input: &str) -> Option<bool> {
    match input.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "sim" | "s" => Some(true),
        "n" | "no" | "false" | "0" | "nao" | "não" | "" => Some(false),
        _ => None,
    }
}

/// Utility to present menu-style choices while allowing the user to enter
/// either the display label or one of its aliases.
#[derive(Debug, Clone)]
pub(crate) struct ChoiceMapper<T: Clone + PartialEq> {
    display: Vec<String>,
    values: Vec<T>,
    alias_to_index: HashMap<String, usize>,
}

impl<T: Clone + PartialEq> Default for ChoiceMapper<T> {
    fn default() -> Self {
        Self {
            display: Vec::new(),
            values: Vec::new(),
            alias_to_index: HashMap::new(),
        }
    }
}

impl<T: Clone + PartialEq> ChoiceMapper<T> {
    /// Builds a mapper from `(alias, label, value)` triples. The display
    /// text is `[alias] label`.
    pub(crate) fn from_entries(entries: Vec<(String, String, T)>) -> Self {
        let mut mapper = Self::default();
        for (idx, (alias, label, value)) in entries.into_iter().enumerate() {
            let display_label = format!("[{}] {}", alias, label);
            mapper.alias_to_index.insert(alias.to_ascii_lowercase(), idx);
            mapper.alias_to_index.insert(label.to_ascii_lowercase(), idx);
            mapper
                .alias_to_index
                .insert(display_label.to_ascii_lowercase(), idx);
            mapper.display.push(display_label);
            mapper.values.push(value);
        }
        mapper
    }

    pub(crate) fn options(&self) -> Vec<String> {
        self.display.clone()
    }

    pub(crate) fn resolve(&self, input: &str) -> Option<&T> {
        let key = input.trim().to_ascii_lowercase();
        self.alias_to_index
            .get(&key)
            .and_then(|index| self.values.get(*index))
    }

    pub(crate) fn display_for_value(&self, value: &T) -> Option<String> {
        self.values
            .iter()
            .position(|candidate| candidate == value)
            .map(|index| self.display[index].clone())
    }
}
