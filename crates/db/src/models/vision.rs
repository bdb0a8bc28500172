//! Visions (`visions`) and the DTO used to create them.

use serde::{Deserialize, Serialize};
use sharedvisions_core::limits::{MAX_VISION_DESCRIPTION_LENGTH, MAX_VISION_TITLE_LENGTH};
use sharedvisions_core::status::VisionStatus;
use sharedvisions_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::generated_image::GeneratedImage;

/// A row from the `visions` table, optionally with its generated images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vision {
    pub id: DbId,
    pub group_id: DbId,
    #[serde(default)]
    pub created_by: Option<DbId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Explicitly selected members. Empty means everyone in the group.
    #[serde(default)]
    pub target_members: Vec<DbId>,
    #[serde(default)]
    pub status: VisionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Embedded via `select=*,generated_images(*)`; never written.
    #[serde(default, skip_serializing)]
    pub generated_images: Vec<GeneratedImage>,
}

impl Vision {
    pub fn is_for_all_members(&self) -> bool {
        self.target_members.is_empty()
    }
}

/// DTO for creating a vision. New visions always start `pending`.
#[derive(Debug, Clone, Validate)]
pub struct NewVision {
    pub group_id: DbId,
    pub created_by: DbId,
    #[validate(length(min = 1, max = MAX_VISION_TITLE_LENGTH))]
    pub title: String,
    #[validate(length(max = MAX_VISION_DESCRIPTION_LENGTH))]
    pub description: Option<String>,
    pub target_members: Vec<DbId>,
}

impl NewVision {
    /// Trim the free-text fields so a whitespace-only title fails
    /// validation. Call before `validate()`.
    pub fn trimmed(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            ..self
        }
    }

    /// Build the row to insert. Blank descriptions are stored as `None`.
    pub fn into_vision(self) -> Vision {
        Vision {
            id: uuid::Uuid::new_v4(),
            group_id: self.group_id,
            created_by: Some(self.created_by),
            title: self.title.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            target_members: self.target_members,
            status: VisionStatus::Pending,
            created_at: Some(chrono::Utc::now()),
            generated_images: Vec::new(),
        }
    }
}
