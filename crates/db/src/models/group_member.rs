//! Group memberships (`group_members`).

use serde::{Deserialize, Serialize};
use sharedvisions_core::members::MemberRef;
use sharedvisions_core::types::{DbId, Timestamp};

use crate::models::profile::Profile;

/// Membership role. Stored but not enforced anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupRole {
    Owner,
    Admin,
    #[default]
    Member,
}

/// A row from the `group_members` table, optionally with the member's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: DbId,
    pub group_id: DbId,
    pub user_id: DbId,
    #[serde(default)]
    pub role: GroupRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<Timestamp>,
    /// Embedded via `select=*,profiles(*)`; never written.
    #[serde(default, rename = "profiles", skip_serializing)]
    pub profile: Option<Profile>,
}

impl GroupMember {
    pub fn new(group_id: DbId, user_id: DbId, role: GroupRole) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            group_id,
            user_id,
            role,
            joined_at: Some(chrono::Utc::now()),
            profile: None,
        }
    }

    pub fn full_name(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.full_name.as_deref())
    }

    /// The view of this member the mention resolver works with.
    pub fn as_member_ref(&self) -> MemberRef {
        MemberRef::new(self.user_id, self.full_name().map(str::to_string))
    }
}
