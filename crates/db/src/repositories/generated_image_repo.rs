//! Repository for the `generated_images` table.

use serde_json::json;
use sharedvisions_core::types::DbId;

use crate::client::{BackendClient, Table};
use crate::error::DbError;
use crate::models::generated_image::GeneratedImage;
use crate::query::Query;

pub struct GeneratedImageRepo;

impl GeneratedImageRepo {
    pub async fn create(
        client: &BackendClient,
        image: &GeneratedImage,
    ) -> Result<GeneratedImage, DbError> {
        client.insert(Table::GeneratedImages, image).await
    }

    pub async fn list_for_vision(
        client: &BackendClient,
        vision_id: DbId,
    ) -> Result<Vec<GeneratedImage>, DbError> {
        client
            .select(
                Table::GeneratedImages,
                &Query::new()
                    .eq("vision_id", vision_id)
                    .order_desc("created_at"),
            )
            .await
    }

    pub async fn set_favorite(
        client: &BackendClient,
        id: DbId,
        is_favorite: bool,
    ) -> Result<(), DbError> {
        client
            .update(
                Table::GeneratedImages,
                &json!({ "is_favorite": is_favorite }),
                &Query::new().eq("id", id),
            )
            .await
    }
}
