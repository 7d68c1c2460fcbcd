#![doc(test(attr(deny(warnings))))]

//! Booking Core is a client for a room-booking REST backend: typed access to
//! rooms and bookings, step-gated create/edit wizards with client-side
//! validation, list and detail controllers, and an interactive shell.

pub mod api;
pub mod cli;
pub mod clock;
pub mod config;
pub mod controllers;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod notify;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Booking Core tracing initialized.");
    });
}
