//! Repository for the `groups` table.

use serde_json::json;
use sharedvisions_core::aesthetic::AestheticProfile;
use sharedvisions_core::types::DbId;

use crate::client::{BackendClient, Table};
use crate::error::DbError;
use crate::models::group::Group;
use crate::query::Query;

pub struct GroupRepo;

impl GroupRepo {
    pub async fn create(client: &BackendClient, group: &Group) -> Result<Group, DbError> {
        client.insert(Table::Groups, group).await
    }

    pub async fn find_by_id(client: &BackendClient, id: DbId) -> Result<Option<Group>, DbError> {
        client
            .select_optional(Table::Groups, &Query::new().eq("id", id))
            .await
    }

    /// Look up a group by an already-normalized invite code.
    pub async fn find_by_invite_code(
        client: &BackendClient,
        invite_code: &str,
    ) -> Result<Option<Group>, DbError> {
        client
            .select_optional(Table::Groups, &Query::new().eq("invite_code", invite_code))
            .await
    }

    /// Groups with any of the given ids, newest first.
    pub async fn list_by_ids(client: &BackendClient, ids: &[DbId]) -> Result<Vec<Group>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        client
            .select(
                Table::Groups,
                &Query::new().in_list("id", ids).order_desc("created_at"),
            )
            .await
    }

    pub async fn set_invite_code(
        client: &BackendClient,
        id: DbId,
        invite_code: &str,
    ) -> Result<(), DbError> {
        client
            .update(
                Table::Groups,
                &json!({ "invite_code": invite_code }),
                &Query::new().eq("id", id),
            )
            .await
    }

    pub async fn set_aesthetic_profile(
        client: &BackendClient,
        id: DbId,
        profile: &AestheticProfile,
    ) -> Result<(), DbError> {
        client
            .update(
                Table::Groups,
                &json!({ "aesthetic_profile": profile }),
                &Query::new().eq("id", id),
            )
            .await
    }
}
