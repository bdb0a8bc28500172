//! Groups (`groups`) and their embedded aesthetic profile.

use serde::{Deserialize, Serialize};
use sharedvisions_core::aesthetic::AestheticProfile;
use sharedvisions_core::limits::MAX_GROUP_NAME_LENGTH;
use sharedvisions_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `groups` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub invite_code: Option<String>,
    #[serde(default)]
    pub created_by: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub aesthetic_profile: Option<AestheticProfile>,
}

/// DTO for creating a group.
#[derive(Debug, Clone, Validate)]
pub struct NewGroup {
    #[validate(length(min = 1, max = MAX_GROUP_NAME_LENGTH))]
    pub name: String,
    pub created_by: DbId,
}

impl NewGroup {
    /// Trim the name so a whitespace-only name fails validation.
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            ..self
        }
    }
}
