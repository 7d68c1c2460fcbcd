//! UI-agnostic controllers: list views, wizards and the booking detail
//! viewer. Each owns its own state; collaborators arrive through
//! [`AppContext`].

pub mod detail;
pub mod guard;
pub mod list;
pub mod wizard;

use crate::api::{ApiClient, Transport};
use crate::clock::{Clock, SystemClock};
use crate::notify::Notifier;

pub use detail::{DetailState, DetailViewer};
pub use guard::{RequestGuard, RequestTicket};
pub use list::{DeleteOutcome, ListController, ListState};
pub use wizard::{SubmitOutcome, WizardController};

/// External collaborators shared by every controller operation.
pub struct AppContext {
    pub api: ApiClient,
    pub notifier: Box<dyn Notifier>,
    pub clock: Box<dyn Clock>,
}

impl AppContext {
    pub fn new(
        transport: impl Transport + 'static,
        notifier: impl Notifier + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            api: ApiClient::new(transport),
            notifier: Box::new(notifier),
            clock: Box::new(clock),
        }
    }

    /// Context using the wall clock.
    pub fn with_system_clock(
        transport: impl Transport + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self::new(transport, notifier, SystemClock)
    }
}
