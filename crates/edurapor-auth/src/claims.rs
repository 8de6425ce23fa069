//! JWT claim structures.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Portal roles. Only `Homeroom` may run semester validation and promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Tutor,
    Homeroom,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Tutor => "tutor",
            Role::Homeroom => "homeroom",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "tutor" => Ok(Role::Tutor),
            "homeroom" => Ok(Role::Homeroom),
            "student" => Ok(Role::Student),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// JWT claims for access tokens.
///
/// - `sub`: user ID; for staff this is the `teachers.id` row
/// - `email`: user's email address
/// - `role`: portal role
/// - `exp` / `iat`: expiry and issued-at Unix timestamps
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}
