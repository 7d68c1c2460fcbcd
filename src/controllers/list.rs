use crate::api::Resource;
use crate::domain::{format_code, yes_no, Booking, Room};
use crate::notify::{Notification, UNREACHABLE_MESSAGE};

use super::AppContext;

/// Shown when the server returns no rows.
pub const EMPTY_MESSAGE: &str = "No records found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState<E> {
    Loading,
    Loaded(Vec<E>),
    Empty,
    Failed,
}

impl<E> ListState<E> {
    /// Text shown in place of the table, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ListState::Loading => Some("Loading..."),
            ListState::Loaded(_) => None,
            ListState::Empty => Some(EMPTY_MESSAGE),
            ListState::Failed => Some(UNREACHABLE_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// User declined the confirmation; nothing was sent.
    Declined,
    Deleted,
    Rejected,
    Unreachable,
}

/// Table projection of a listed entity.
pub trait ListRow {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

impl ListRow for Room {
    fn headers() -> &'static [&'static str] {
        &["Cod", "Room", "Location", "Status", "Created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            format_code(self.id),
            self.name.clone(),
            self.location.clone(),
            self.status_label().to_string(),
            self.created_at.clone(),
        ]
    }
}

impl ListRow for Booking {
    fn headers() -> &'static [&'static str] {
        &["Cod", "Room", "Date", "Time", "Responsible", "Coffee"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            format_code(self.id),
            self.room_name.clone(),
            self.date.clone(),
            self.time_range(),
            self.responsible.clone(),
            yes_no(self.coffee).to_string(),
        ]
    }
}

/// Cached collection for one resource plus its delete workflow.
pub struct ListController<E: Resource> {
    state: ListState<E>,
}

impl<E: Resource> Default for ListController<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Resource> ListController<E> {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState<E> {
        &self.state
    }

    pub fn items(&self) -> &[E] {
        match &self.state {
            ListState::Loaded(items) => items,
            _ => &[],
        }
    }

    /// Refetches the collection.
    pub fn refresh(&mut self, ctx: &AppContext) -> &ListState<E> {
        self.state = ListState::Loading;
        self.state = match ctx.api.list::<E>() {
            Ok(envelope) => match envelope.into_data() {
                Some(items) if !items.is_empty() => ListState::Loaded(items),
                _ => ListState::Empty,
            },
            Err(err) => {
                tracing::error!(resource = E::NAME, error = %err, "list fetch failed");
                ListState::Failed
            }
        };
        &self.state
    }

    /// Deletes `id` after the user confirms, then refreshes the list.
    pub fn delete(&mut self, ctx: &AppContext, id: u32) -> DeleteOutcome {
        let question = format!("Are you sure you want to delete this {}?", E::NAME);
        if !ctx.notifier.confirm("Confirm", &question) {
            tracing::debug!(resource = E::NAME, id, "delete declined");
            return DeleteOutcome::Declined;
        }

        let outcome = match ctx.api.delete::<E>(id) {
            Ok(envelope) => {
                let fallback = if envelope.status {
                    format!("The {} was deleted.", E::NAME)
                } else {
                    format!("Could not delete the {}.", E::NAME)
                };
                ctx.notifier.notify(Notification::from_outcome(
                    envelope.status,
                    &envelope.message,
                    &fallback,
                ));
                if envelope.status {
                    DeleteOutcome::Deleted
                } else {
                    DeleteOutcome::Rejected
                }
            }
            Err(err) => {
                tracing::error!(resource = E::NAME, id, error = %err, "delete failed");
                ctx.notifier.notify(Notification::unreachable());
                DeleteOutcome::Unreachable
            }
        };

        self.refresh(ctx);
        outcome
    }
}

impl<E: Resource + ListRow> ListController<E> {
    pub fn headers(&self) -> &'static [&'static str] {
        E::headers()
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.items().iter().map(ListRow::row).collect()
    }
}
