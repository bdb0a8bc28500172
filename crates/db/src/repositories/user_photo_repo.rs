//! Repository for the `user_photos` table.

use serde_json::json;
use sharedvisions_core::types::DbId;

use crate::client::{BackendClient, Table};
use crate::error::DbError;
use crate::models::user_photo::UserPhoto;
use crate::query::Query;

pub struct UserPhotoRepo;

impl UserPhotoRepo {
    pub async fn create(client: &BackendClient, photo: &UserPhoto) -> Result<UserPhoto, DbError> {
        client.insert(Table::UserPhotos, photo).await
    }

    /// A user's photos, newest first.
    pub async fn list_for_user(
        client: &BackendClient,
        user_id: DbId,
    ) -> Result<Vec<UserPhoto>, DbError> {
        client
            .select(
                Table::UserPhotos,
                &Query::new().eq("user_id", user_id).order_desc("created_at"),
            )
            .await
    }

    /// Photos for any of `user_ids`, primary photos first.
    pub async fn list_for_users(
        client: &BackendClient,
        user_ids: &[DbId],
    ) -> Result<Vec<UserPhoto>, DbError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        client
            .select(
                Table::UserPhotos,
                &Query::new()
                    .in_list("user_id", user_ids)
                    .order_desc("is_primary"),
            )
            .await
    }

    /// Clear the primary flag on every photo the user owns.
    pub async fn clear_primary(client: &BackendClient, user_id: DbId) -> Result<(), DbError> {
        client
            .update(
                Table::UserPhotos,
                &json!({ "is_primary": false }),
                &Query::new().eq("user_id", user_id),
            )
            .await
    }

    pub async fn set_primary(client: &BackendClient, id: DbId) -> Result<(), DbError> {
        client
            .update(
                Table::UserPhotos,
                &json!({ "is_primary": true }),
                &Query::new().eq("id", id),
            )
            .await
    }

    pub async fn delete(client: &BackendClient, id: DbId) -> Result<(), DbError> {
        client
            .delete(Table::UserPhotos, &Query::new().eq("id", id))
            .await
    }
}
