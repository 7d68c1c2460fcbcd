//! Interactive shell over the booking controllers.

pub mod commands;
pub mod core;
pub mod forms;
pub mod help;
pub mod notify;
pub mod output;
mod shell;
pub mod shell_context;
pub mod ui;

pub use shell::run_cli;
