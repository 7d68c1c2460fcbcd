//! Entities exchanged with the booking backend and the helpers that move
//! their dates between wire and editing formats.

pub mod booking;
pub mod common;
pub mod dates;
pub mod room;

pub use booking::{Booking, BookingInput};
pub use common::{format_code, yes_no, Displayable, Identifiable};
pub use room::{Room, RoomInput};
