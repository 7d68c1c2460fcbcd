use crate::api::{ApiError, Envelope, Resource};
use crate::domain::Identifiable;
use crate::forms::{FormFlow, FormSession, ValidationError};
use crate::notify::Notification;

use super::{AppContext, RequestGuard, RequestTicket};

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Server accepted the write; the wizard closed.
    Saved,
    /// Client-side validation failed; nothing was sent.
    Invalid,
    /// Server answered `status: false`.
    Rejected,
    /// Transport failure.
    Unreachable,
    /// A submit is already in flight.
    Busy,
    /// The wizard was closed or reopened before the response arrived.
    Stale,
}

/// Write prepared by [`WizardController::begin_submit`].
#[derive(Debug, Clone)]
pub struct PendingSubmit<I> {
    pub ticket: RequestTicket,
    /// `Some` for updates.
    pub id: Option<u32>,
    pub input: I,
}

type Input<F> = <<F as FormFlow>::Entity as Resource>::Input;

/// Create/edit wizard around a [`FormSession`].
pub struct WizardController<F: FormFlow> {
    session: FormSession<F>,
    guard: RequestGuard,
    open: bool,
    loading: bool,
    pending_edit: Option<RequestTicket>,
    in_flight: Option<RequestTicket>,
}

impl<F: FormFlow> WizardController<F> {
    pub fn new(flow: F) -> Self {
        Self {
            session: FormSession::new(flow),
            guard: RequestGuard::new(),
            open: false,
            loading: false,
            pending_edit: None,
            in_flight: None,
        }
    }

    pub fn session(&self) -> &FormSession<F> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FormSession<F> {
        &mut self.session
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Edit fetch outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Identifier bound in edit mode.
    pub fn editing_id(&self) -> Option<u32> {
        self.guard.target()
    }

    /// Opens the wizard with a fresh draft.
    pub fn open_create(&mut self, ctx: &AppContext) {
        self.guard.rebind(None);
        self.session.load_for_create();
        self.session.flow_mut().prepare(ctx);
        self.open = true;
        self.loading = false;
        self.pending_edit = None;
        self.in_flight = None;
    }

    /// Opens the wizard bound to `id` and returns the ticket for its fetch.
    pub fn begin_edit(&mut self, ctx: &AppContext, id: u32) -> RequestTicket {
        self.guard.rebind(Some(id));
        self.session.load_empty_edit();
        self.session.flow_mut().prepare(ctx);
        self.open = true;
        self.loading = true;
        self.in_flight = None;
        let ticket = self.guard.issue();
        self.pending_edit = Some(ticket);
        ticket
    }

    /// Applies the fetch result if it still belongs to this instance and no
    /// submit has started since. Returns whether the draft was populated.
    pub fn finish_edit(
        &mut self,
        ctx: &AppContext,
        ticket: RequestTicket,
        result: Result<Envelope<F::Entity>, ApiError>,
    ) -> bool {
        if self.pending_edit != Some(ticket) || !self.guard.accepts(&ticket) {
            tracing::debug!("edit fetch result dropped");
            return false;
        }
        self.pending_edit = None;
        self.loading = false;

        match result {
            Ok(envelope) if envelope.status => match envelope.data {
                Some(entity) => {
                    tracing::debug!(resource = F::Entity::NAME, id = entity.id(), "loaded for edit");
                    self.session.load_entity(&entity);
                    true
                }
                None => {
                    ctx.notifier.notify(Notification::from_outcome(
                        false,
                        &envelope.message,
                        &format!("The {} was not found.", F::Entity::NAME),
                    ));
                    false
                }
            },
            Ok(envelope) => {
                ctx.notifier.notify(Notification::from_outcome(
                    false,
                    &envelope.message,
                    &format!("Could not load the {}.", F::Entity::NAME),
                ));
                false
            }
            Err(err) => {
                tracing::error!(error = %err, "edit fetch failed");
                ctx.notifier.notify(Notification::unreachable());
                false
            }
        }
    }

    /// Opens the wizard on an existing entity, fetching it by id.
    pub fn load_for_edit(&mut self, ctx: &AppContext, id: u32) -> bool {
        let ticket = self.begin_edit(ctx, id);
        let result = ctx.api.get::<F::Entity>(id);
        self.finish_edit(ctx, ticket, result)
    }

    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), ValidationError> {
        self.session.set_field(key, raw)
    }

    pub fn advance(&mut self, ctx: &AppContext) -> bool {
        self.session.advance(ctx.clock.now())
    }

    pub fn retreat(&mut self) {
        self.session.retreat();
    }

    /// Validates the whole draft and prepares the write. Fails with
    /// [`SubmitOutcome::Busy`] while another submit is pending and with
    /// [`SubmitOutcome::Invalid`] after moving to the first invalid step.
    pub fn begin_submit(
        &mut self,
        ctx: &AppContext,
    ) -> Result<PendingSubmit<Input<F>>, SubmitOutcome> {
        if self.in_flight.is_some() {
            tracing::debug!("submit ignored, one already pending");
            return Err(SubmitOutcome::Busy);
        }

        if !self.session.validate_all(ctx.clock.now()) {
            if let Some(step) = self.session.first_invalid_step() {
                self.session.jump_to(step);
            }
            return Err(SubmitOutcome::Invalid);
        }

        let input = self.session.to_input().map_err(|err| {
            tracing::warn!(error = %err, "draft could not be converted");
            SubmitOutcome::Invalid
        })?;

        // A late edit fetch must not overwrite what is being submitted.
        self.pending_edit = None;
        self.loading = false;

        let ticket = self.guard.issue();
        self.in_flight = Some(ticket);
        Ok(PendingSubmit {
            ticket,
            id: self.guard.target(),
            input,
        })
    }

    /// Sends a prepared write: update when an id is bound, create otherwise.
    pub fn dispatch(
        ctx: &AppContext,
        pending: &PendingSubmit<Input<F>>,
    ) -> Result<Envelope<F::Entity>, ApiError> {
        match pending.id {
            Some(id) => ctx.api.update::<F::Entity>(id, &pending.input),
            None => ctx.api.create::<F::Entity>(&pending.input),
        }
    }

    pub fn finish_submit(
        &mut self,
        ctx: &AppContext,
        ticket: RequestTicket,
        result: Result<Envelope<F::Entity>, ApiError>,
    ) -> SubmitOutcome {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        let current = self.guard.accepts(&ticket);

        let outcome = match result {
            Ok(envelope) if envelope.status => {
                ctx.notifier.notify(Notification::from_outcome(
                    true,
                    &envelope.message,
                    &format!("{} saved.", capitalize(F::Entity::NAME)),
                ));
                SubmitOutcome::Saved
            }
            Ok(envelope) => {
                ctx.notifier.notify(Notification::from_outcome(
                    false,
                    &envelope.message,
                    &format!("Could not save the {}.", F::Entity::NAME),
                ));
                SubmitOutcome::Rejected
            }
            Err(err) => {
                tracing::error!(error = %err, "submit failed");
                ctx.notifier.notify(Notification::unreachable());
                SubmitOutcome::Unreachable
            }
        };

        if !current {
            return SubmitOutcome::Stale;
        }
        if outcome == SubmitOutcome::Saved {
            self.close();
        }
        outcome
    }

    /// Validates, sends and applies the result in one go.
    pub fn submit(&mut self, ctx: &AppContext) -> SubmitOutcome {
        let pending = match self.begin_submit(ctx) {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = Self::dispatch(ctx, &pending);
        self.finish_submit(ctx, pending.ticket, result)
    }

    /// Closes the wizard, dropping the draft and any pending response.
    pub fn close(&mut self) {
        self.guard.reset();
        self.session.load_for_create();
        self.open = false;
        self.loading = false;
        self.pending_edit = None;
        self.in_flight = None;
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
