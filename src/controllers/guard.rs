//! Generation-tagged request tickets.
//!
//! Every remote call made on behalf of a dialog is split into a `begin`
//! phase that hands out a [`RequestTicket`] and a `finish` phase that
//! consumes it. Opening, reopening or closing the dialog bumps the
//! generation, so a response that arrives for an earlier instance no longer
//! matches and is dropped.

/// Handle for one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    target: Option<u32>,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Identifier the request was issued for, if any.
    pub fn target(&self) -> Option<u32> {
        self.target
    }
}

#[derive(Debug, Default)]
pub struct RequestGuard {
    generation: u64,
    target: Option<u32>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new dialog instance bound to `target` and invalidates every
    /// outstanding ticket.
    pub fn rebind(&mut self, target: Option<u32>) {
        self.generation = self.generation.wrapping_add(1);
        self.target = target;
    }

    /// Invalidates outstanding tickets and forgets the bound id.
    pub fn reset(&mut self) {
        self.rebind(None);
    }

    pub fn target(&self) -> Option<u32> {
        self.target
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticket for a request made by the current instance.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket {
            generation: self.generation,
            target: self.target,
        }
    }

    /// Whether a response carrying `ticket` still belongs to this instance.
    pub fn accepts(&self, ticket: &RequestTicket) -> bool {
        let current = ticket.generation == self.generation && ticket.target == self.target;
        if !current {
            tracing::debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                ticket_target = ?ticket.target,
                target = ?self.target,
                "discarding stale response"
            );
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_ticket_is_accepted() {
        let mut guard = RequestGuard::new();
        guard.rebind(Some(5));
        let ticket = guard.issue();
        assert_eq!(ticket.target(), Some(5));
        assert!(guard.accepts(&ticket));
    }

    #[test]
    fn rebinding_invalidates_earlier_tickets() {
        let mut guard = RequestGuard::new();
        guard.rebind(Some(5));
        let stale = guard.issue();
        guard.rebind(Some(6));
        assert!(!guard.accepts(&stale));

        // Same id again is still a new instance.
        guard.rebind(Some(5));
        assert!(!guard.accepts(&stale));
        assert!(guard.accepts(&guard.issue()));
    }

    #[test]
    fn reset_drops_target_and_tickets() {
        let mut guard = RequestGuard::new();
        guard.rebind(Some(1));
        let ticket = guard.issue();
        guard.reset();
        assert_eq!(guard.target(), None);
        assert!(!guard.accepts(&ticket));
    }
}
