//! Groups: creation, invite codes, membership and the shared aesthetic.

use std::sync::Arc;

use serde_json::json;
use sharedvisions_core::aesthetic::AestheticProfile;
use sharedvisions_core::invite::{generate_invite_code, normalize_invite_code};
use sharedvisions_core::types::DbId;
use sharedvisions_db::models::group::{Group, NewGroup};
use sharedvisions_db::models::group_member::{GroupMember, GroupRole};
use sharedvisions_db::repositories::{GroupMemberRepo, GroupRepo};
use sharedvisions_db::BackendClient;
use sharedvisions_events::types::{entity, GROUP_CREATED, GROUP_JOINED, GROUP_LEFT, GROUP_UPDATED};
use sharedvisions_events::{EventBus, PlatformEvent};
use validator::Validate;

use crate::error::{report, PipelineError};

pub struct GroupService {
    client: Arc<BackendClient>,
    bus: Arc<EventBus>,
}

impl GroupService {
    pub fn new(client: Arc<BackendClient>, bus: Arc<EventBus>) -> Self {
        Self { client, bus }
    }

    /// Create a group with a fresh invite code and make the creator its owner.
    pub async fn create_group(&self, input: NewGroup) -> Result<Group, PipelineError> {
        let result = async {
            let input = input.trimmed();
            input.validate()?;
            let group = Group {
                id: uuid::Uuid::new_v4(),
                name: input.name.clone(),
                invite_code: Some(generate_invite_code()),
                created_by: Some(input.created_by),
                created_at: Some(chrono::Utc::now()),
                aesthetic_profile: None,
            };
            let stored = GroupRepo::create(&self.client, &group).await?;
            GroupMemberRepo::create(
                &self.client,
                &GroupMember::new(stored.id, input.created_by, GroupRole::Owner),
            )
            .await?;

            tracing::info!(group_id = %stored.id, "Group created");
            self.bus.publish(
                PlatformEvent::new(GROUP_CREATED)
                    .with_source(entity::GROUP, stored.id)
                    .with_actor(input.created_by)
                    .with_payload(json!({ "name": stored.name })),
            );
            Ok::<_, PipelineError>(stored)
        }
        .await;
        report(&self.bus, "create_group", result)
    }

    /// Join the group behind `invite_code` as a plain member.
    ///
    /// The membership check is client-side only, so two concurrent joins by
    /// the same user can both succeed.
    pub async fn join_group(&self, invite_code: &str, user_id: DbId) -> Result<Group, PipelineError> {
        let result = async {
            let code = normalize_invite_code(invite_code).map_err(|_| PipelineError::InvalidInviteCode)?;
            let group = match GroupRepo::find_by_invite_code(&self.client, &code).await {
                Ok(Some(group)) => group,
                Ok(None) => return Err(PipelineError::InvalidInviteCode),
                Err(e) => {
                    tracing::warn!(error = %e, "Invite code lookup failed");
                    return Err(PipelineError::InvalidInviteCode);
                }
            };

            if GroupMemberRepo::find(&self.client, group.id, user_id)
                .await?
                .is_some()
            {
                return Err(PipelineError::AlreadyMember);
            }
            GroupMemberRepo::create(
                &self.client,
                &GroupMember::new(group.id, user_id, GroupRole::Member),
            )
            .await?;

            tracing::info!(group_id = %group.id, user_id = %user_id, "Joined group");
            self.bus.publish(
                PlatformEvent::new(GROUP_JOINED)
                    .with_source(entity::GROUP, group.id)
                    .with_actor(user_id),
            );
            Ok::<_, PipelineError>(group)
        }
        .await;
        report(&self.bus, "join_group", result)
    }

    /// Groups the user belongs to, newest first.
    pub async fn fetch_groups(&self, user_id: DbId) -> Result<Vec<Group>, PipelineError> {
        let result = async {
            let ids = GroupMemberRepo::group_ids_for_user(&self.client, user_id).await?;
            Ok::<_, PipelineError>(GroupRepo::list_by_ids(&self.client, &ids).await?)
        }
        .await;
        report(&self.bus, "fetch_groups", result)
    }

    /// Members with their profiles.
    pub async fn fetch_members(&self, group_id: DbId) -> Result<Vec<GroupMember>, PipelineError> {
        let result = GroupMemberRepo::list_for_group(&self.client, group_id)
            .await
            .map_err(PipelineError::from);
        report(&self.bus, "fetch_members", result)
    }

    pub async fn leave_group(&self, group_id: DbId, user_id: DbId) -> Result<(), PipelineError> {
        let result = async {
            GroupMemberRepo::delete(&self.client, group_id, user_id).await?;
            self.bus.publish(
                PlatformEvent::new(GROUP_LEFT)
                    .with_source(entity::GROUP, group_id)
                    .with_actor(user_id),
            );
            Ok::<_, PipelineError>(())
        }
        .await;
        report(&self.bus, "leave_group", result)
    }

    /// Replace the invite code. The old code stops working immediately.
    pub async fn regenerate_invite_code(&self, group_id: DbId) -> Result<String, PipelineError> {
        let result = async {
            let code = generate_invite_code();
            GroupRepo::set_invite_code(&self.client, group_id, &code).await?;
            self.bus.publish(
                PlatformEvent::new(GROUP_UPDATED)
                    .with_source(entity::GROUP, group_id)
                    .with_payload(json!({ "invite_code": code })),
            );
            Ok::<_, PipelineError>(code)
        }
        .await;
        report(&self.bus, "regenerate_invite_code", result)
    }

    /// Store the style applied to every future image for the group.
    pub async fn update_aesthetic_profile(
        &self,
        group_id: DbId,
        profile: &AestheticProfile,
    ) -> Result<(), PipelineError> {
        let result = async {
            GroupRepo::set_aesthetic_profile(&self.client, group_id, profile).await?;
            self.bus.publish(
                PlatformEvent::new(GROUP_UPDATED)
                    .with_source(entity::GROUP, group_id)
                    .with_payload(json!({ "aesthetic_profile": profile })),
            );
            Ok::<_, PipelineError>(())
        }
        .await;
        report(&self.bus, "update_aesthetic_profile", result)
    }
}
