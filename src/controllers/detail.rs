use crate::api::{ApiError, Envelope};
use crate::domain::{format_code, yes_no, Booking, Displayable};
use crate::notify::Notification;

use super::{AppContext, RequestGuard, RequestTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Closed,
    Loading,
    Loaded(Booking),
    /// Fetch failed; the default entity is shown.
    Failed(Booking),
}

/// Read-only booking view.
pub struct DetailViewer {
    state: DetailState,
    guard: RequestGuard,
}

impl Default for DetailViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailViewer {
    pub fn new() -> Self {
        Self {
            state: DetailState::Closed,
            guard: RequestGuard::new(),
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading)
    }

    /// Booking currently shown, if the viewer is past loading.
    pub fn booking(&self) -> Option<&Booking> {
        match &self.state {
            DetailState::Loaded(booking) | DetailState::Failed(booking) => Some(booking),
            DetailState::Closed | DetailState::Loading => None,
        }
    }

    pub fn begin_open(&mut self, id: u32) -> RequestTicket {
        self.guard.rebind(Some(id));
        self.state = DetailState::Loading;
        self.guard.issue()
    }

    /// Applies a fetch result; stale tickets are ignored.
    pub fn finish_open(
        &mut self,
        ctx: &AppContext,
        ticket: RequestTicket,
        result: Result<Envelope<Booking>, ApiError>,
    ) -> bool {
        if !self.guard.accepts(&ticket) {
            return false;
        }

        self.state = match result {
            Ok(Envelope {
                status: true,
                data: Some(booking),
                ..
            }) => {
                tracing::debug!(booking = %booking.display_label(), "booking loaded");
                DetailState::Loaded(booking)
            }
            Ok(envelope) => {
                ctx.notifier.notify(Notification::from_outcome(
                    false,
                    &envelope.message,
                    "The booking was not found.",
                ));
                DetailState::Failed(Booking::default())
            }
            Err(err) => {
                tracing::error!(error = %err, "detail fetch failed");
                ctx.notifier.notify(Notification::unreachable());
                DetailState::Failed(Booking::default())
            }
        };
        true
    }

    /// Fetches and shows booking `id`.
    pub fn open(&mut self, ctx: &AppContext, id: u32) -> &DetailState {
        let ticket = self.begin_open(id);
        let result = ctx.api.get::<Booking>(id);
        self.finish_open(ctx, ticket, result);
        &self.state
    }

    pub fn close(&mut self) {
        self.guard.reset();
        self.state = DetailState::Closed;
    }

    /// Labelled values in display order. Coffee quantity and description
    /// appear only when coffee is served.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let Some(booking) = self.booking() else {
            return Vec::new();
        };

        let mut fields = vec![
            ("Cod", format_code(booking.id)),
            ("Room", booking.room_name.clone()),
            ("Date", booking.date.clone()),
            ("Start", booking.start_time.clone()),
            ("End", booking.end_time.clone()),
            ("Responsible", booking.responsible.clone()),
            ("Coffee", yes_no(booking.coffee).to_string()),
        ];
        if booking.coffee {
            fields.push(("Coffee quantity", booking.coffee_quantity.to_string()));
            fields.push(("Description", booking.coffee_description.clone()));
        }
        fields.push(("Created", booking.created_at.clone()));
        fields.push(("Location", booking.location.clone()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer_with(booking: Booking) -> DetailViewer {
        DetailViewer {
            state: DetailState::Loaded(booking),
            guard: RequestGuard::new(),
        }
    }

    #[test]
    fn coffee_details_hidden_without_coffee() {
        let viewer = viewer_with(Booking {
            id: 3,
            coffee: false,
            coffee_quantity: 5,
            ..Booking::default()
        });
        let labels: Vec<&str> = viewer.fields().iter().map(|(label, _)| *label).collect();
        assert!(!labels.contains(&"Coffee quantity"));
        assert!(!labels.contains(&"Description"));
        assert_eq!(labels.first(), Some(&"Cod"));
        assert_eq!(labels.last(), Some(&"Location"));
    }

    #[test]
    fn coffee_details_shown_with_coffee() {
        let viewer = viewer_with(Booking {
            id: 3,
            coffee: true,
            coffee_quantity: 5,
            coffee_description: "Descafeinado".into(),
            ..Booking::default()
        });
        let fields = viewer.fields();
        assert!(fields.contains(&("Coffee", "Yes".to_string())));
        assert!(fields.contains(&("Coffee quantity", "5".to_string())));
        assert!(fields.contains(&("Description", "Descafeinado".to_string())));
    }

    #[test]
    fn closed_viewer_has_nothing_to_show() {
        let mut viewer = DetailViewer::new();
        let _ticket = viewer.begin_open(2);
        assert!(viewer.is_loading());
        assert!(viewer.fields().is_empty());
        viewer.close();
        assert_eq!(viewer.state(), &DetailState::Closed);
    }
}
