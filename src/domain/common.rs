use serde::{Deserialize, Deserializer};

/// Identifies entities that carry a server-assigned identifier.
///
/// Identifiers are positive once persisted; `0` marks an entity the server
/// has not seen yet.
pub trait Identifiable {
    fn id(&self) -> u32;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Formats an identifier the way list and detail views show it (`0007`).
pub fn format_code(id: u32) -> String {
    format!("{:04}", id)
}

/// Renders a boolean flag as the yes/no label used across views.
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Treats an explicit `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
