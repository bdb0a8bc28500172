//! Repository for the `profiles` table.

use serde_json::json;
use sharedvisions_core::types::DbId;

use crate::client::{BackendClient, Table};
use crate::error::DbError;
use crate::models::profile::{Profile, ProfileUpdate};
use crate::query::Query;

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn create(client: &BackendClient, profile: &Profile) -> Result<Profile, DbError> {
        client.insert(Table::Profiles, profile).await
    }

    /// Make sure a profile row exists for `id`. Only the given columns are
    /// written, so an existing username or avatar is left alone.
    pub async fn ensure_exists(
        client: &BackendClient,
        id: DbId,
        full_name: Option<&str>,
    ) -> Result<(), DbError> {
        let mut row = json!({ "id": id });
        if let Some(name) = full_name {
            row["full_name"] = json!(name);
        }
        client.upsert(Table::Profiles, &row).await
    }

    pub async fn find_by_id(client: &BackendClient, id: DbId) -> Result<Option<Profile>, DbError> {
        client
            .select_optional(Table::Profiles, &Query::new().eq("id", id))
            .await
    }

    /// Apply the non-`None` fields of `input`.
    pub async fn update(
        client: &BackendClient,
        id: DbId,
        input: &ProfileUpdate,
    ) -> Result<(), DbError> {
        if input.is_empty() {
            return Ok(());
        }
        client
            .update(Table::Profiles, input, &Query::new().eq("id", id))
            .await
    }

    pub async fn set_avatar_url(
        client: &BackendClient,
        id: DbId,
        avatar_url: &str,
    ) -> Result<(), DbError> {
        client
            .update(
                Table::Profiles,
                &json!({ "avatar_url": avatar_url }),
                &Query::new().eq("id", id),
            )
            .await
    }
}
