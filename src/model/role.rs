use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl Role {
    /// Normalizes free-form role text from a form or a database row.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    /// Landing page after login
    pub fn dashboard(&self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Faculty => "/faculty",
            Role::Admin => "/admin",
        }
    }
}
