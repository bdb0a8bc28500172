//! Reference photos and avatars.

use std::sync::Arc;

use serde_json::json;
use sharedvisions_core::types::DbId;
use sharedvisions_db::models::user_photo::UserPhoto;
use sharedvisions_db::repositories::{ProfileRepo, UserPhotoRepo};
use sharedvisions_db::storage::{object_key, object_path_from_url};
use sharedvisions_db::{BackendClient, ObjectStorage, StorageBucket};
use sharedvisions_events::types::{
    entity, PHOTO_DELETED, PHOTO_PRIMARY_CHANGED, PHOTO_UPLOADED, PROFILE_UPDATED,
};
use sharedvisions_events::{EventBus, PlatformEvent};

use crate::error::{report, PipelineError};
use crate::services::photos::reencode_jpeg;

pub struct ProfileService {
    client: Arc<BackendClient>,
    bus: Arc<EventBus>,
}

impl ProfileService {
    pub fn new(client: Arc<BackendClient>, bus: Arc<EventBus>) -> Self {
        Self { client, bus }
    }

    /// Re-encode, upload and record a reference photo.
    ///
    /// A new primary photo clears the flag on the user's other photos.
    pub async fn upload_photo(
        &self,
        user_id: DbId,
        bytes: &[u8],
        is_primary: bool,
    ) -> Result<UserPhoto, PipelineError> {
        let result = async {
            let jpeg = reencode_jpeg(bytes.to_vec()).await?;
            let path = object_key(user_id, "jpg");
            let url = ObjectStorage::upload(
                &self.client,
                StorageBucket::UserPhotos,
                &path,
                jpeg,
                "image/jpeg",
                false,
            )
            .await?;

            let stored = match self.record_photo(user_id, url, is_primary).await {
                Ok(stored) => stored,
                Err(e) => {
                    self.remove_orphan(&path).await;
                    return Err(e);
                }
            };

            tracing::info!(user_id = %user_id, photo_id = %stored.id, is_primary, "Photo uploaded");
            self.bus.publish(
                PlatformEvent::new(PHOTO_UPLOADED)
                    .with_source(entity::PHOTO, stored.id)
                    .with_actor(user_id)
                    .with_payload(json!({ "is_primary": is_primary })),
            );
            Ok::<_, PipelineError>(stored)
        }
        .await;
        report(&self.bus, "upload_photo", result)
    }

    /// A user's photos, newest first.
    pub async fn user_photos(&self, user_id: DbId) -> Result<Vec<UserPhoto>, PipelineError> {
        let result = UserPhotoRepo::list_for_user(&self.client, user_id)
            .await
            .map_err(PipelineError::from);
        report(&self.bus, "user_photos", result)
    }

    /// Remove the stored object, then the row.
    pub async fn delete_photo(&self, photo: &UserPhoto) -> Result<(), PipelineError> {
        let result = async {
            match object_path_from_url(&photo.photo_url, StorageBucket::UserPhotos) {
                Some(path) => {
                    ObjectStorage::remove(&self.client, StorageBucket::UserPhotos, &[path]).await?;
                }
                None => {
                    tracing::warn!(photo_id = %photo.id, url = %photo.photo_url, "Photo URL has no storage path");
                }
            }
            UserPhotoRepo::delete(&self.client, photo.id).await?;
            self.bus.publish(
                PlatformEvent::new(PHOTO_DELETED)
                    .with_source(entity::PHOTO, photo.id)
                    .with_actor(photo.user_id),
            );
            Ok::<_, PipelineError>(())
        }
        .await;
        report(&self.bus, "delete_photo", result)
    }

    /// Make `photo` the user's only primary photo.
    pub async fn set_primary_photo(&self, photo: &UserPhoto) -> Result<UserPhoto, PipelineError> {
        let result = async {
            UserPhotoRepo::clear_primary(&self.client, photo.user_id).await?;
            UserPhotoRepo::set_primary(&self.client, photo.id).await?;
            self.bus.publish(
                PlatformEvent::new(PHOTO_PRIMARY_CHANGED)
                    .with_source(entity::PHOTO, photo.id)
                    .with_actor(photo.user_id),
            );
            Ok::<_, PipelineError>(UserPhoto {
                is_primary: true,
                ..photo.clone()
            })
        }
        .await;
        report(&self.bus, "set_primary_photo", result)
    }

    /// Replace the user's avatar and point the profile at it.
    pub async fn upload_avatar(&self, user_id: DbId, bytes: &[u8]) -> Result<String, PipelineError> {
        let result = async {
            let jpeg = reencode_jpeg(bytes.to_vec()).await?;
            let url = ObjectStorage::upload(
                &self.client,
                StorageBucket::Avatars,
                &format!("{user_id}.jpg"),
                jpeg,
                "image/jpeg",
                true,
            )
            .await?;
            ProfileRepo::set_avatar_url(&self.client, user_id, &url).await?;

            self.bus.publish(
                PlatformEvent::new(PROFILE_UPDATED)
                    .with_source(entity::PROFILE, user_id)
                    .with_actor(user_id)
                    .with_payload(json!({ "avatar_url": url })),
            );
            Ok::<_, PipelineError>(url)
        }
        .await;
        report(&self.bus, "upload_avatar", result)
    }

    /// Make one of the user's reference photos their avatar.
    pub async fn use_photo_as_avatar(&self, photo: &UserPhoto) -> Result<String, PipelineError> {
        let bytes = match ObjectStorage::download(&self.client, &photo.photo_url).await {
            Ok(bytes) => bytes,
            Err(e) => return report(&self.bus, "use_photo_as_avatar", Err(e.into())),
        };
        self.upload_avatar(photo.user_id, &bytes).await
    }

    async fn record_photo(
        &self,
        user_id: DbId,
        photo_url: String,
        is_primary: bool,
    ) -> Result<UserPhoto, PipelineError> {
        if is_primary {
            UserPhotoRepo::clear_primary(&self.client, user_id).await?;
        }
        let photo = UserPhoto {
            id: uuid::Uuid::new_v4(),
            user_id,
            photo_url,
            is_primary,
            created_at: Some(chrono::Utc::now()),
        };
        Ok(UserPhotoRepo::create(&self.client, &photo).await?)
    }

    /// Best effort: drop an uploaded object whose row was never written.
    async fn remove_orphan(&self, path: &str) {
        if let Err(e) =
            ObjectStorage::remove(&self.client, StorageBucket::UserPhotos, &[path.to_string()]).await
        {
            tracing::warn!(path, error = %e, "Could not remove orphaned photo object");
        }
    }
}
