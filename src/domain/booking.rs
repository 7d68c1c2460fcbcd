use serde::{Deserialize, Serialize};

use crate::domain::common::{null_as_default, Displayable, Identifiable};

/// A reservation of a room for a date and time range, optionally with
/// coffee service, as returned by the `agendamentos` endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Booking {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u32,
    #[serde(rename = "salaId", deserialize_with = "null_as_default")]
    pub room_id: u32,
    #[serde(rename = "salaNome", deserialize_with = "null_as_default")]
    pub room_name: String,
    #[serde(rename = "local", deserialize_with = "null_as_default")]
    pub location: String,
    /// Server date, usually `DD/MM/YYYY`.
    #[serde(rename = "dataAgendamento", deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "horaInicio", deserialize_with = "null_as_default")]
    pub start_time: String,
    #[serde(rename = "horaFim", deserialize_with = "null_as_default")]
    pub end_time: String,
    #[serde(rename = "responsavel", deserialize_with = "null_as_default")]
    pub responsible: String,
    #[serde(rename = "cafe", deserialize_with = "null_as_default")]
    pub coffee: bool,
    #[serde(rename = "cafeQuantidade", deserialize_with = "null_as_default")]
    pub coffee_quantity: u32,
    #[serde(rename = "cafeDescricao", deserialize_with = "null_as_default")]
    pub coffee_description: String,
    #[serde(rename = "dataCriacao", deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl Booking {
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }
}

impl Identifiable for Booking {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Displayable for Booking {
    fn display_label(&self) -> String {
        format!(
            "{} on {} ({})",
            self.room_name,
            self.date,
            self.time_range()
        )
    }
}

/// Write payload for booking creation and updates. `date` is in wire
/// format (`DD/MM/YYYY`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingInput {
    #[serde(rename = "salaId")]
    pub room_id: u32,
    #[serde(rename = "dataAgendamento")]
    pub date: String,
    #[serde(rename = "horaInicio")]
    pub start_time: String,
    #[serde(rename = "horaFim")]
    pub end_time: String,
    #[serde(rename = "responsavel")]
    pub responsible: String,
    #[serde(rename = "cafe")]
    pub coffee: bool,
    #[serde(rename = "cafeQuantidade")]
    pub coffee_quantity: u32,
    #[serde(rename = "cafeDescricao")]
    pub coffee_description: String,
}
