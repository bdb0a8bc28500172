//! Reference photos (`user_photos`) used to personalize generated images.

use serde::{Deserialize, Serialize};
use sharedvisions_core::types::{DbId, Timestamp};

/// A row from the `user_photos` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPhoto {
    pub id: DbId,
    pub user_id: DbId,
    pub photo_url: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}
