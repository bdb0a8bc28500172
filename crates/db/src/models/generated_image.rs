//! Generated images (`generated_images`). Immutable apart from the favorite flag.

use serde::{Deserialize, Serialize};
use sharedvisions_core::types::{DbId, Timestamp};

/// A row from the `generated_images` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: DbId,
    pub vision_id: DbId,
    pub image_url: String,
    /// The exact prompt sent to the image model.
    #[serde(default)]
    pub prompt_used: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl GeneratedImage {
    pub fn new(vision_id: DbId, image_url: String, prompt_used: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            vision_id,
            image_url,
            prompt_used: Some(prompt_used),
            is_favorite: false,
            created_at: Some(chrono::Utc::now()),
        }
    }
}
