use chrono::{NaiveDateTime, NaiveTime};

use super::{
    ChoiceMapper, FieldDescriptor, FieldKind, FieldValue, FormDescriptor, FormFlow,
    StepDescriptor, ValidationError,
};
use crate::controllers::AppContext;
use crate::domain::{
    dates::{self, TIME_FORMAT},
    Booking, BookingInput, Displayable, Room,
};
use crate::notify::Notification;

pub const ROOM: &str = "room";
pub const DATE: &str = "date";
pub const START: &str = "start";
pub const END: &str = "end";
pub const RESPONSIBLE: &str = "responsible";
pub const COFFEE: &str = "coffee";
pub const QUANTITY: &str = "quantity";
pub const DESCRIPTION: &str = "description";

/// Editable booking state. Dates use `YYYY-MM-DD`, times `HH:MM`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    /// `0` means no room selected.
    pub room_id: u32,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub responsible: String,
    pub coffee: bool,
    pub coffee_quantity: u32,
    pub coffee_description: String,
}

impl BookingDraft {
    /// Sets the coffee flag; clearing it zeroes the quantity.
    pub fn set_coffee(&mut self, coffee: bool) {
        self.coffee = coffee;
        if !coffee {
            self.coffee_quantity = 0;
        }
    }
}

pub struct BookingFlow {
    descriptor: FormDescriptor,
    rooms: ChoiceMapper<u32>,
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingFlow {
    pub fn new() -> Self {
        let rooms = ChoiceMapper::default();
        Self {
            descriptor: build_descriptor(rooms.options()),
            rooms,
        }
    }

    /// Replaces the room choices offered by the room field.
    pub fn set_rooms(&mut self, rooms: &[Room]) {
        let entries = rooms
            .iter()
            .map(|room| (room.id.to_string(), room.display_label(), room.id))
            .collect();
        self.rooms = ChoiceMapper::from_entries(entries);
        self.descriptor = build_descriptor(self.rooms.options());
    }

    pub fn room_options(&self) -> Vec<String> {
        self.rooms.options()
    }

    fn room_label(&self, room_id: u32) -> String {
        self.rooms
            .display_for_value(&room_id)
            .unwrap_or_else(|| room_id.to_string())
    }
}

fn build_descriptor(room_options: Vec<String>) -> FormDescriptor {
    FormDescriptor::new(
        "booking",
        vec![
            StepDescriptor::new(
                "Booking details",
                vec![
                    FieldDescriptor::new(ROOM, "Room", FieldKind::Choice(room_options))
                        .with_help("Pick a room from the list or type its id.")
                        .locked_on_edit(),
                    FieldDescriptor::new(DATE, "Date", FieldKind::Date)
                        .with_help("Format: YYYY-MM-DD. Today or later."),
                    FieldDescriptor::new(START, "Start time", FieldKind::Time)
                        .with_help("24-hour HH:MM."),
                    FieldDescriptor::new(END, "End time", FieldKind::Time)
                        .with_help("24-hour HH:MM."),
                ],
            ),
            StepDescriptor::new(
                "Responsible",
                vec![FieldDescriptor::new(
                    RESPONSIBLE,
                    "Responsible",
                    FieldKind::Text,
                )],
            ),
            StepDescriptor::new(
                "Coffee service",
                vec![
                    FieldDescriptor::new(COFFEE, "Coffee", FieldKind::Boolean).with_optional(),
                    FieldDescriptor::new(QUANTITY, "Coffee quantity", FieldKind::Integer)
                        .with_optional()
                        .with_help("Number of servings. Required when coffee is served."),
                    FieldDescriptor::new(DESCRIPTION, "Description", FieldKind::Text)
                        .with_optional(),
                ],
            ),
        ],
    )
}

impl FormFlow for BookingFlow {
    type Entity = Booking;
    type Draft = BookingDraft;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn value(&self, draft: &BookingDraft, key: &str) -> Option<String> {
        let value = match key {
            ROOM if draft.room_id == 0 => String::new(),
            ROOM => self.room_label(draft.room_id),
            DATE => draft.date.clone(),
            START => draft.start_time.clone(),
            END => draft.end_time.clone(),
            RESPONSIBLE => draft.responsible.clone(),
            COFFEE => crate::domain::yes_no(draft.coffee).to_string(),
            QUANTITY => draft.coffee_quantity.to_string(),
            DESCRIPTION => draft.coffee_description.clone(),
            _ => return None,
        };
        Some(value)
    }

    fn apply(
        &self,
        draft: &mut BookingDraft,
        key: &str,
        value: FieldValue,
    ) -> Result<(), ValidationError> {
        match (key, value) {
            (ROOM, FieldValue::Text(raw)) => {
                draft.room_id = match raw.parse::<u32>() {
                    Ok(id) => id,
                    Err(_) if raw.is_empty() => 0,
                    Err(_) => *self
                        .rooms
                        .resolve(&raw)
                        .ok_or_else(|| ValidationError::new("Select a room"))?,
                };
            }
            (DATE, FieldValue::Text(raw)) => draft.date = raw,
            (START, FieldValue::Text(raw)) => draft.start_time = raw,
            (END, FieldValue::Text(raw)) => draft.end_time = raw,
            (RESPONSIBLE, FieldValue::Text(raw)) => draft.responsible = raw,
            (COFFEE, FieldValue::Flag(flag)) => draft.set_coffee(flag),
            (QUANTITY, FieldValue::Integer(quantity)) => draft.coffee_quantity = quantity,
            (DESCRIPTION, FieldValue::Text(raw)) => draft.coffee_description = raw,
            (other, value) => {
                return Err(ValidationError::new(format!(
                    "Unexpected value {:?} for `{}`",
                    value, other
                )))
            }
        }
        Ok(())
    }

    fn validate(
        &self,
        draft: &BookingDraft,
        key: &str,
        now: NaiveDateTime,
    ) -> Result<(), ValidationError> {
        match key {
            ROOM => validate_room(draft),
            DATE => validate_date(draft, now),
            START => validate_start(draft, now),
            END => validate_end(draft),
            RESPONSIBLE => validate_responsible(draft),
            QUANTITY => validate_quantity(draft),
            _ => Ok(()),
        }
    }

    fn is_enabled(&self, draft: &BookingDraft, key: &str) -> bool {
        match key {
            QUANTITY => draft.coffee,
            _ => true,
        }
    }

    fn draft_from(&self, booking: &Booking) -> BookingDraft {
        BookingDraft {
            room_id: booking.room_id,
            date: dates::normalize_for_edit(&booking.date),
            start_time: dates::normalize_time_for_edit(&booking.start_time),
            end_time: dates::normalize_time_for_edit(&booking.end_time),
            responsible: booking.responsible.clone(),
            coffee: booking.coffee,
            coffee_quantity: if booking.coffee {
                booking.coffee_quantity
            } else {
                0
            },
            coffee_description: booking.coffee_description.clone(),
        }
    }

    fn to_input(&self, draft: &BookingDraft) -> Result<BookingInput, ValidationError> {
        let date = dates::to_wire(&draft.date)
            .ok_or_else(|| ValidationError::new("Use YYYY-MM-DD format"))?;
        Ok(BookingInput {
            room_id: draft.room_id,
            date,
            start_time: dates::normalize_time_for_edit(&draft.start_time),
            end_time: dates::normalize_time_for_edit(&draft.end_time),
            responsible: draft.responsible.trim().to_string(),
            coffee: draft.coffee,
            coffee_quantity: if draft.coffee {
                draft.coffee_quantity
            } else {
                0
            },
            coffee_description: draft.coffee_description.trim().to_string(),
        })
    }

    fn prepare(&mut self, ctx: &AppContext) {
        match ctx.api.list::<Room>() {
            Ok(envelope) if envelope.status => {
                let rooms = envelope.data.unwrap_or_default();
                self.set_rooms(&rooms);
            }
            Ok(envelope) => {
                self.set_rooms(&[]);
                ctx.notifier.notify(Notification::from_outcome(
                    false,
                    &envelope.message,
                    "Could not load rooms.",
                ));
            }
            Err(_) => {
                self.set_rooms(&[]);
                ctx.notifier.notify(Notification::unreachable());
            }
        }
    }
}

fn validate_room(draft: &BookingDraft) -> Result<(), ValidationError> {
    if draft.room_id == 0 {
        return Err(ValidationError::new("Select a room"));
    }
    Ok(())
}

fn validate_date(draft: &BookingDraft, now: NaiveDateTime) -> Result<(), ValidationError> {
    if draft.date.trim().is_empty() {
        return Err(ValidationError::new("Booking date is required"));
    }
    let date = dates::parse_edit_date(&draft.date)
        .ok_or_else(|| ValidationError::new("Use YYYY-MM-DD format"))?;
    if date < now.date() {
        return Err(ValidationError::new("Date cannot be earlier than today"));
    }
    Ok(())
}

fn validate_start(draft: &BookingDraft, now: NaiveDateTime) -> Result<(), ValidationError> {
    let start = required_time(&draft.start_time, "Start time is required")?;
    let date = dates::parse_edit_date(&draft.date)
        .ok_or_else(|| ValidationError::new("Select a date before setting the start time"))?;
    if date == now.date() && date.and_time(start) < now {
        return Err(ValidationError::new(
            "Start time cannot be earlier than the current time",
        ));
    }
    Ok(())
}

fn validate_end(draft: &BookingDraft) -> Result<(), ValidationError> {
    let end = required_time(&draft.end_time, "End time is required")?;
    if let Some(start) = dates::parse_time(&draft.start_time) {
        if end <= start {
            tracing::warn!(
                start = %start.format(TIME_FORMAT),
                end = %end.format(TIME_FORMAT),
                "booking ends at or before its start time"
            );
        }
    }
    Ok(())
}

fn validate_responsible(draft: &BookingDraft) -> Result<(), ValidationError> {
    if draft.responsible.trim().is_empty() {
        return Err(ValidationError::new("Responsible person is required"));
    }
    Ok(())
}

fn validate_quantity(draft: &BookingDraft) -> Result<(), ValidationError> {
    if draft.coffee && draft.coffee_quantity == 0 {
        return Err(ValidationError::new("Enter the coffee quantity"));
    }
    Ok(())
}

fn required_time(raw: &str, missing: &str) -> Result<NaiveTime, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::new(missing));
    }
    dates::parse_time(raw).ok_or_else(|| ValidationError::new("Use 24-hour HH:MM format"))
}
