use serde::{Deserialize, Serialize};

use crate::domain::common::{null_as_default, Displayable, Identifiable};

/// A bookable physical space as returned by the `salas` endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Room {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u32,
    #[serde(rename = "nome", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "local", deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(rename = "ativo", deserialize_with = "null_as_default")]
    pub active: bool,
    /// Server-assigned creation timestamp, kept verbatim.
    #[serde(rename = "dataCriacao", deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl Room {
    pub fn status_label(&self) -> &'static str {
        if self.active {
            "Active"
        } else {
            "Inactive"
        }
    }
}

impl Identifiable for Room {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Displayable for Room {
    fn display_label(&self) -> String {
        if self.location.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.location)
        }
    }
}

/// Write payload for room creation and updates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomInput {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "local")]
    pub location: String,
    #[serde(rename = "ativo")]
    pub active: bool,
}
