//! User domain types.

use serde::{Deserialize, Serialize};

/// User permission level on the platform.
///
/// Wire format: lowercase string (`"student"`, `"professor"`, `"admin"`),
/// as stored in the `users.role` column and in session-token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Professor,
    Admin,
}

impl UserRole {
    /// Parse the wire string. Returns `None` for unknown values.
    pub fn from_str(v: &str) -> Option<Self> {
        match v {
            "student" => Some(Self::Student),
            "professor" => Some(Self::Professor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to the wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professor => "professor",
            Self::Admin => "admin",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Student => 0,
            Self::Professor => 1,
            Self::Admin => 2,
        }
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}
