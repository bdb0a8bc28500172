//! Profile rows (`profiles`), keyed by the auth user id.

use serde::{Deserialize, Serialize};
use sharedvisions_core::limits::{MAX_FULL_NAME_LENGTH, MAX_USERNAME_LENGTH};
use sharedvisions_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: DbId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Profile {
    pub fn new(id: DbId, full_name: Option<String>) -> Self {
        Self {
            id,
            username: None,
            full_name,
            avatar_url: None,
            created_at: Some(chrono::Utc::now()),
        }
    }

    /// Name shown for this user: full name, then username, then a placeholder.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.username.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Someone")
    }
}

/// DTO for editing a profile. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = MAX_FULL_NAME_LENGTH))]
    pub full_name: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.full_name.is_none()
    }
}
