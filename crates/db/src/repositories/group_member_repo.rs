//! Repository for the `group_members` table.

use sharedvisions_core::types::DbId;

use crate::client::{BackendClient, Table};
use crate::error::DbError;
use crate::models::group_member::GroupMember;
use crate::query::Query;

/// Member rows with each member's profile embedded.
const WITH_PROFILES: &str = "*,profiles(*)";

pub struct GroupMemberRepo;

impl GroupMemberRepo {
    pub async fn create(
        client: &BackendClient,
        member: &GroupMember,
    ) -> Result<GroupMember, DbError> {
        client.insert(Table::GroupMembers, member).await
    }

    pub async fn find(
        client: &BackendClient,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<Option<GroupMember>, DbError> {
        client
            .select_optional(
                Table::GroupMembers,
                &Query::new().eq("group_id", group_id).eq("user_id", user_id),
            )
            .await
    }

    /// Every member of a group, with profiles, in join order.
    pub async fn list_for_group(
        client: &BackendClient,
        group_id: DbId,
    ) -> Result<Vec<GroupMember>, DbError> {
        client
            .select(
                Table::GroupMembers,
                &Query::new()
                    .select(WITH_PROFILES)
                    .eq("group_id", group_id)
                    .order_asc("joined_at"),
            )
            .await
    }

    /// Ids of every group the user belongs to.
    pub async fn group_ids_for_user(
        client: &BackendClient,
        user_id: DbId,
    ) -> Result<Vec<DbId>, DbError> {
        let rows: Vec<GroupMember> = client
            .select(Table::GroupMembers, &Query::new().eq("user_id", user_id))
            .await?;
        Ok(rows.into_iter().map(|m| m.group_id).collect())
    }

    pub async fn delete(
        client: &BackendClient,
        group_id: DbId,
        user_id: DbId,
    ) -> Result<(), DbError> {
        client
            .delete(
                Table::GroupMembers,
                &Query::new().eq("group_id", group_id).eq("user_id", user_id),
            )
            .await
    }
}
