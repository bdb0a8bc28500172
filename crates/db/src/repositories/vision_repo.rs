//! Repository for the `visions` table.

use serde_json::json;
use sharedvisions_core::status::VisionStatus;
use sharedvisions_core::types::DbId;

use crate::client::{BackendClient, Table};
use crate::error::DbError;
use crate::models::vision::Vision;
use crate::query::Query;

/// Vision rows with their generated images embedded.
const WITH_IMAGES: &str = "*,generated_images(*)";

pub struct VisionRepo;

impl VisionRepo {
    /// Insert a new vision, returning the stored row.
    pub async fn create(client: &BackendClient, vision: &Vision) -> Result<Vision, DbError> {
        client.insert(Table::Visions, vision).await
    }

    pub async fn find_by_id(client: &BackendClient, id: DbId) -> Result<Option<Vision>, DbError> {
        client
            .select_optional(
                Table::Visions,
                &Query::new().select(WITH_IMAGES).eq("id", id),
            )
            .await
    }

    /// Visions with images, newest first, optionally limited to one group.
    pub async fn list(
        client: &BackendClient,
        group_id: Option<DbId>,
    ) -> Result<Vec<Vision>, DbError> {
        let mut query = Query::new().select(WITH_IMAGES).order_desc("created_at");
        if let Some(group_id) = group_id {
            query = query.eq("group_id", group_id);
        }
        client.select(Table::Visions, &query).await
    }

    /// Visions with images in any of `group_ids`, newest first.
    pub async fn list_for_groups(
        client: &BackendClient,
        group_ids: &[DbId],
    ) -> Result<Vec<Vision>, DbError> {
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }
        client
            .select(
                Table::Visions,
                &Query::new()
                    .select(WITH_IMAGES)
                    .in_list("group_id", group_ids)
                    .order_desc("created_at"),
            )
            .await
    }

    pub async fn set_status(
        client: &BackendClient,
        id: DbId,
        status: VisionStatus,
    ) -> Result<(), DbError> {
        client
            .update(
                Table::Visions,
                &json!({ "status": status }),
                &Query::new().eq("id", id),
            )
            .await
    }

    /// Hard delete. Images go with it through the foreign-key cascade.
    pub async fn delete(client: &BackendClient, id: DbId) -> Result<(), DbError> {
        client
            .delete(Table::Visions, &Query::new().eq("id", id))
            .await
    }
}
