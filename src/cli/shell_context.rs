use std::path::PathBuf;

use crate::config::Config;
use crate::controllers::{AppContext, DetailViewer, ListController, WizardController};
use crate::domain::{Booking, Room};
use crate::forms::{BookingFlow, RoomFlow};

use super::commands::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub app: AppContext,
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub rooms: ListController<Room>,
    pub bookings: ListController<Booking>,
    pub room_wizard: WizardController<RoomFlow>,
    pub booking_wizard: WizardController<BookingFlow>,
    pub detail: DetailViewer,
    pub last_command: Option<String>,
    pub running: bool,
}
