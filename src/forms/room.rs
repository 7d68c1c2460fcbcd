use chrono::NaiveDateTime;

use super::{
    FieldDescriptor, FieldKind, FieldValue, FormDescriptor, FormFlow, StepDescriptor,
    ValidationError,
};
use crate::domain::{yes_no, Room, RoomInput};

pub const NAME: &str = "name";
pub const LOCATION: &str = "location";
pub const ACTIVE: &str = "active";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDraft {
    pub name: String,
    pub location: String,
    pub active: bool,
}

pub struct RoomFlow {
    descriptor: FormDescriptor,
}

impl Default for RoomFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomFlow {
    pub fn new() -> Self {
        Self {
            descriptor: FormDescriptor::new(
                "room",
                vec![StepDescriptor::new(
                    "Room details",
                    vec![
                        FieldDescriptor::new(NAME, "Name", FieldKind::Text),
                        FieldDescriptor::new(LOCATION, "Location", FieldKind::Text),
                        FieldDescriptor::new(ACTIVE, "Active", FieldKind::Boolean)
                            .with_optional(),
                    ],
                )],
            ),
        }
    }
}

impl FormFlow for RoomFlow {
    type Entity = Room;
    type Draft = RoomDraft;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn value(&self, draft: &RoomDraft, key: &str) -> Option<String> {
        match key {
            NAME => Some(draft.name.clone()),
            LOCATION => Some(draft.location.clone()),
            ACTIVE => Some(yes_no(draft.active).to_string()),
            _ => None,
        }
    }

    fn apply(
        &self,
        draft: &mut RoomDraft,
        key: &str,
        value: FieldValue,
    ) -> Result<(), ValidationError> {
        match (key, value) {
            (NAME, FieldValue::Text(raw)) => draft.name = raw,
            (LOCATION, FieldValue::Text(raw)) => draft.location = raw,
            (ACTIVE, FieldValue::Flag(flag)) => draft.active = flag,
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
        draft: &RoomDraft,
        key: &str,
        _now: NaiveDateTime,
    ) -> Result<(), ValidationError> {
        match key {
            NAME if draft.name.trim().is_empty() => {
                Err(ValidationError::new("Room name is required"))
            }
            LOCATION if draft.location.trim().is_empty() => {
                Err(ValidationError::new("Location is required"))
            }
            _ => Ok(()),
        }
    }

    fn draft_from(&self, room: &Room) -> RoomDraft {
        RoomDraft {
            name: room.name.clone(),
            location: room.location.clone(),
            active: room.active,
        }
    }

    fn to_input(&self, draft: &RoomDraft) -> Result<RoomInput, ValidationError> {
        Ok(RoomInput {
            name: draft.name.trim().to_string(),
            location: draft.location.trim().to_string(),
            active: draft.active,
        })
    }
}
