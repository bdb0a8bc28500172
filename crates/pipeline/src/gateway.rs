//! The persistence seam the vision controller depends on.
//!
//! [`BackendGateway`] is the production implementation over the REST and
//! storage endpoints. Tests use an in-memory double.

use std::sync::Arc;

use async_trait::async_trait;
use sharedvisions_core::status::VisionStatus;
use sharedvisions_core::types::DbId;
use sharedvisions_db::models::generated_image::GeneratedImage;
use sharedvisions_db::models::group::Group;
use sharedvisions_db::models::group_member::GroupMember;
use sharedvisions_db::models::user_photo::UserPhoto;
use sharedvisions_db::models::vision::Vision;
use sharedvisions_db::repositories::{
    GeneratedImageRepo, GroupMemberRepo, GroupRepo, UserPhotoRepo, VisionRepo,
};
use sharedvisions_db::storage::object_key;
use sharedvisions_db::{BackendClient, ObjectStorage, StorageBucket};

use crate::error::PipelineError;

#[async_trait]
pub trait VisionGateway: Send + Sync {
    /// Visions with images, newest first, optionally for one group.
    async fn list_visions(&self, group_id: Option<DbId>) -> Result<Vec<Vision>, PipelineError>;

    async fn group_ids_for_user(&self, user_id: DbId) -> Result<Vec<DbId>, PipelineError>;

    /// Visions with images in any of the groups, newest first.
    async fn list_visions_for_groups(&self, group_ids: &[DbId]) -> Result<Vec<Vision>, PipelineError>;

    async fn find_vision(&self, id: DbId) -> Result<Option<Vision>, PipelineError>;

    async fn insert_vision(&self, vision: &Vision) -> Result<Vision, PipelineError>;

    async fn set_vision_status(&self, id: DbId, status: VisionStatus) -> Result<(), PipelineError>;

    async fn delete_vision(&self, id: DbId) -> Result<(), PipelineError>;

    async fn find_group(&self, id: DbId) -> Result<Option<Group>, PipelineError>;

    /// Members with their profiles.
    async fn group_members(&self, group_id: DbId) -> Result<Vec<GroupMember>, PipelineError>;

    async fn photos_for_users(&self, user_ids: &[DbId]) -> Result<Vec<UserPhoto>, PipelineError>;

    /// Upload the image bytes and record them against the vision.
    async fn store_generated_image(
        &self,
        vision_id: DbId,
        bytes: Vec<u8>,
        prompt_used: &str,
    ) -> Result<GeneratedImage, PipelineError>;

    async fn set_image_favorite(&self, image_id: DbId, is_favorite: bool) -> Result<(), PipelineError>;
}

/// [`VisionGateway`] over the backend project.
pub struct BackendGateway {
    client: Arc<BackendClient>,
}

impl BackendGateway {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VisionGateway for BackendGateway {
    async fn list_visions(&self, group_id: Option<DbId>) -> Result<Vec<Vision>, PipelineError> {
        Ok(VisionRepo::list(&self.client, group_id).await?)
    }

    async fn group_ids_for_user(&self, user_id: DbId) -> Result<Vec<DbId>, PipelineError> {
        Ok(GroupMemberRepo::group_ids_for_user(&self.client, user_id).await?)
    }

    async fn list_visions_for_groups(&self, group_ids: &[DbId]) -> Result<Vec<Vision>, PipelineError> {
        Ok(VisionRepo::list_for_groups(&self.client, group_ids).await?)
    }

    async fn find_vision(&self, id: DbId) -> Result<Option<Vision>, PipelineError> {
        Ok(VisionRepo::find_by_id(&self.client, id).await?)
    }

    async fn insert_vision(&self, vision: &Vision) -> Result<Vision, PipelineError> {
        Ok(VisionRepo::create(&self.client, vision).await?)
    }

    async fn set_vision_status(&self, id: DbId, status: VisionStatus) -> Result<(), PipelineError> {
        Ok(VisionRepo::set_status(&self.client, id, status).await?)
    }

    async fn delete_vision(&self, id: DbId) -> Result<(), PipelineError> {
        Ok(VisionRepo::delete(&self.client, id).await?)
    }

    async fn find_group(&self, id: DbId) -> Result<Option<Group>, PipelineError> {
        Ok(GroupRepo::find_by_id(&self.client, id).await?)
    }

    async fn group_members(&self, group_id: DbId) -> Result<Vec<GroupMember>, PipelineError> {
        Ok(GroupMemberRepo::list_for_group(&self.client, group_id).await?)
    }

    async fn photos_for_users(&self, user_ids: &[DbId]) -> Result<Vec<UserPhoto>, PipelineError> {
        Ok(UserPhotoRepo::list_for_users(&self.client, user_ids).await?)
    }

    async fn store_generated_image(
        &self,
        vision_id: DbId,
        bytes: Vec<u8>,
        prompt_used: &str,
    ) -> Result<GeneratedImage, PipelineError> {
        let path = object_key(vision_id, "png");
        let url = ObjectStorage::upload(
            &self.client,
            StorageBucket::GeneratedImages,
            &path,
            bytes,
            "image/png",
            false,
        )
        .await?;

        let image = GeneratedImage::new(vision_id, url, prompt_used.to_string());
        Ok(GeneratedImageRepo::create(&self.client, &image).await?)
    }

    async fn set_image_favorite(&self, image_id: DbId, is_favorite: bool) -> Result<(), PipelineError> {
        Ok(GeneratedImageRepo::set_favorite(&self.client, image_id, is_favorite).await?)
    }
}
