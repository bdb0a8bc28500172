//! Vision lifecycle controller.
//!
//! Owns the local, non-authoritative list of visions and runs the
//! generation sequence:
//!
//! ```text
//! pending | failed | completed -> generating -> completed | failed
//! ```
//!
//! Each status change is written to the backend before the next step
//! starts. The status write and the image write are independent: a crash
//! between them leaves the vision `generating` with an orphaned image.
//! Concurrent runs for the same vision are not coordinated; each appends
//! its own image.

use std::sync::Arc;

use serde_json::json;
use sharedvisions_core::error::CoreError;
use sharedvisions_core::limits::MAX_REFERENCE_PHOTOS;
use sharedvisions_core::members::MemberRef;
use sharedvisions_core::prompt::{build_prompt, vision_text};
use sharedvisions_core::status::VisionStatus;
use sharedvisions_core::style::ImageStyle;
use sharedvisions_core::types::DbId;
use sharedvisions_db::models::generated_image::GeneratedImage;
use sharedvisions_db::models::group_member::GroupMember;
use sharedvisions_db::models::user_photo::UserPhoto;
use sharedvisions_db::models::vision::{NewVision, Vision};
use sharedvisions_events::types::{
    entity, IMAGE_FAVORITE_TOGGLED, VISION_CREATED, VISION_DELETED, VISION_GENERATION_FAILED,
    VISION_IMAGE_GENERATED, VISION_STATUS_CHANGED,
};
use sharedvisions_events::{EventBus, PlatformEvent};
use sharedvisions_genai::{ImageModel, MemberResolver, PromptEnhancer, TextModel};
use tokio::sync::RwLock;
use validator::Validate;

use crate::actor::Actor;
use crate::error::{report, PipelineError};
use crate::gateway::VisionGateway;

/// Who should appear in a generated image.
#[derive(Debug)]
struct Targets {
    user_ids: Vec<DbId>,
    names: Vec<String>,
}

pub struct VisionController {
    gateway: Arc<dyn VisionGateway>,
    enhancer: PromptEnhancer,
    resolver: MemberResolver,
    image_model: Arc<dyn ImageModel>,
    bus: Arc<EventBus>,
    visions: RwLock<Vec<Vision>>,
}

impl VisionController {
    pub fn new(
        gateway: Arc<dyn VisionGateway>,
        text_model: Arc<dyn TextModel>,
        image_model: Arc<dyn ImageModel>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            gateway,
            enhancer: PromptEnhancer::new(Arc::clone(&text_model)),
            resolver: MemberResolver::new(text_model),
            image_model,
            bus,
            visions: RwLock::new(Vec::new()),
        }
    }

    // ---- local state ----

    /// Snapshot of the local list.
    pub async fn visions(&self) -> Vec<Vision> {
        self.visions.read().await.clone()
    }

    pub async fn vision(&self, id: DbId) -> Option<Vision> {
        self.visions.read().await.iter().find(|v| v.id == id).cloned()
    }

    // ---- fetching ----

    /// Reload visions (optionally for one group) and replace the local list.
    pub async fn fetch_visions(&self, group_id: Option<DbId>) -> Result<Vec<Vision>, PipelineError> {
        let result = async {
            let visions = self.gateway.list_visions(group_id).await?;
            *self.visions.write().await = visions.clone();
            Ok::<_, PipelineError>(visions)
        }
        .await;
        report(&self.bus, "fetch_visions", result)
    }

    /// Reload every vision in every group the user belongs to.
    pub async fn fetch_visions_for_user(&self, user_id: DbId) -> Result<Vec<Vision>, PipelineError> {
        let result = async {
            let group_ids = self.gateway.group_ids_for_user(user_id).await?;
            let visions = if group_ids.is_empty() {
                Vec::new()
            } else {
                self.gateway.list_visions_for_groups(&group_ids).await?
            };
            *self.visions.write().await = visions.clone();
            Ok::<_, PipelineError>(visions)
        }
        .await;
        report(&self.bus, "fetch_visions_for_user", result)
    }

    // ---- mutations ----

    /// Validate and store a new `pending` vision, newest first locally.
    pub async fn create_vision(&self, input: NewVision) -> Result<Vision, PipelineError> {
        let result = async {
            let input = input.trimmed();
            input.validate()?;
            let stored = self.gateway.insert_vision(&input.into_vision()).await?;

            self.visions.write().await.insert(0, stored.clone());
            tracing::info!(vision_id = %stored.id, group_id = %stored.group_id, "Vision created");
            let mut event = PlatformEvent::new(VISION_CREATED)
                .with_source(entity::VISION, stored.id)
                .with_payload(json!({ "group_id": stored.group_id, "title": stored.title }));
            if let Some(creator) = stored.created_by {
                event = event.with_actor(creator);
            }
            self.bus.publish(event);
            Ok::<_, PipelineError>(stored)
        }
        .await;
        report(&self.bus, "create_vision", result)
    }

    /// Create a vision and generate its first image straight away.
    ///
    /// Returns the vision as it stands after generation. A generation
    /// failure is returned as the error; the vision itself stays stored.
    pub async fn create_and_generate(
        &self,
        input: NewVision,
        style: ImageStyle,
        actor: &Actor,
    ) -> Result<Vision, PipelineError> {
        let created = self.create_vision(input).await?;
        self.generate_image(created.id, style, actor).await?;
        Ok(self.vision(created.id).await.unwrap_or(created))
    }

    /// Run the generation sequence for one vision.
    ///
    /// On any failure after the vision is found, the controller tries to
    /// mark it `failed` (a failing write is only logged) before returning
    /// the original error.
    pub async fn generate_image(
        &self,
        vision_id: DbId,
        style: ImageStyle,
        actor: &Actor,
    ) -> Result<GeneratedImage, PipelineError> {
        let vision = match self.load_vision(vision_id).await {
            Ok(vision) => vision,
            Err(e) => return report(&self.bus, "generate_image", Err(e)),
        };

        let result = self.run_generation(&vision, style, actor).await;
        if let Err(e) = &result {
            self.mark_failed(&vision, actor, e).await;
        }
        report(&self.bus, "generate_image", result)
    }

    /// Flip the favorite flag and replace the image in the local list.
    pub async fn toggle_favorite(&self, image: &GeneratedImage) -> Result<GeneratedImage, PipelineError> {
        let result = async {
            let updated = GeneratedImage {
                is_favorite: !image.is_favorite,
                ..image.clone()
            };
            self.gateway
                .set_image_favorite(image.id, updated.is_favorite)
                .await?;

            {
                let mut visions = self.visions.write().await;
                if let Some(slot) = visions
                    .iter_mut()
                    .flat_map(|v| v.generated_images.iter_mut())
                    .find(|i| i.id == image.id)
                {
                    *slot = updated.clone();
                }
            }

            self.bus.publish(
                PlatformEvent::new(IMAGE_FAVORITE_TOGGLED)
                    .with_source(entity::IMAGE, image.id)
                    .with_payload(json!({
                        "vision_id": image.vision_id,
                        "is_favorite": updated.is_favorite,
                    })),
            );
            Ok::<_, PipelineError>(updated)
        }
        .await;
        report(&self.bus, "toggle_favorite", result)
    }

    /// Delete remotely (images cascade) and drop from the local list.
    pub async fn delete_vision(&self, vision_id: DbId) -> Result<(), PipelineError> {
        let result = async {
            self.gateway.delete_vision(vision_id).await?;
            self.visions.write().await.retain(|v| v.id != vision_id);
            tracing::info!(vision_id = %vision_id, "Vision deleted");
            self.bus
                .publish(PlatformEvent::new(VISION_DELETED).with_source(entity::VISION, vision_id));
            Ok::<_, PipelineError>(())
        }
        .await;
        report(&self.bus, "delete_vision", result)
    }

    // ---- generation internals ----

    /// Local copy first, then the backend.
    async fn load_vision(&self, vision_id: DbId) -> Result<Vision, PipelineError> {
        if let Some(vision) = self.vision(vision_id).await {
            return Ok(vision);
        }
        self.gateway
            .find_vision(vision_id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "vision",
                    id: vision_id,
                }
                .into()
            })
    }

    async fn run_generation(
        &self,
        vision: &Vision,
        style: ImageStyle,
        actor: &Actor,
    ) -> Result<GeneratedImage, PipelineError> {
        self.transition(vision.id, vision.status, VisionStatus::Generating, actor)
            .await?;

        let profile = self
            .gateway
            .find_group(vision.group_id)
            .await?
            .and_then(|g| g.aesthetic_profile)
            .unwrap_or_default();
        let members = self.gateway.group_members(vision.group_id).await?;
        let targets = self.resolve_targets(vision, &members, actor).await;
        let photos = reference_photos(self.gateway.photos_for_users(&targets.user_ids).await?);

        let prompt = build_prompt(&vision.title, vision.description.as_deref(), style, Some(&profile));
        let enhanced = self
            .enhancer
            .enhance(&prompt, &targets.names, Some(&profile))
            .await;

        tracing::info!(
            vision_id = %vision.id,
            %style,
            targets = targets.user_ids.len(),
            references = photos.len(),
            "Generating image"
        );
        let bytes = self.image_model.generate_image(&enhanced, &photos).await?;
        let image = self
            .gateway
            .store_generated_image(vision.id, bytes, &enhanced)
            .await?;

        {
            let mut visions = self.visions.write().await;
            if let Some(local) = visions.iter_mut().find(|v| v.id == vision.id) {
                local.generated_images.push(image.clone());
            }
        }
        self.bus.publish(
            PlatformEvent::new(VISION_IMAGE_GENERATED)
                .with_source(entity::VISION, vision.id)
                .with_actor(actor.user_id)
                .with_payload(json!({ "image_id": image.id, "image_url": image.image_url })),
        );

        self.transition(vision.id, VisionStatus::Generating, VisionStatus::Completed, actor)
            .await?;
        Ok(image)
    }

    /// Explicit targets, then whoever the description names, then everyone.
    async fn resolve_targets(&self, vision: &Vision, members: &[GroupMember], actor: &Actor) -> Targets {
        let refs: Vec<MemberRef> = members.iter().map(GroupMember::as_member_ref).collect();

        if !vision.target_members.is_empty() {
            let names = vision
                .target_members
                .iter()
                .filter_map(|id| {
                    refs.iter()
                        .find(|r| r.user_id == *id)
                        .and_then(|r| r.first_name().map(str::to_string))
                        .or_else(|| (*id == actor.user_id).then(|| actor.display_name.clone()))
                })
                .collect();
            return Targets {
                user_ids: vision.target_members.clone(),
                names,
            };
        }

        let text = vision_text(&vision.title, vision.description.as_deref());
        let mentions = self
            .resolver
            .resolve(&text, &refs, actor.user_id, &actor.display_name)
            .await;
        if !mentions.is_empty() {
            tracing::debug!(vision_id = %vision.id, count = mentions.len(), "Using mentioned members");
            return Targets {
                user_ids: mentions.keys().copied().collect(),
                names: mentions.into_values().collect(),
            };
        }

        Targets {
            user_ids: refs.iter().map(|r| r.user_id).collect(),
            names: refs
                .iter()
                .filter_map(|r| r.first_name().map(str::to_string))
                .collect(),
        }
    }

    /// Persist a status change, mirror it locally and announce it.
    async fn transition(
        &self,
        vision_id: DbId,
        from: VisionStatus,
        to: VisionStatus,
        actor: &Actor,
    ) -> Result<(), PipelineError> {
        if !from.can_transition_to(to) {
            tracing::debug!(vision_id = %vision_id, %from, %to, "Unusual status transition");
        }
        self.gateway.set_vision_status(vision_id, to).await?;
        self.set_local_status(vision_id, to).await;

        tracing::info!(vision_id = %vision_id, status = %to, "Vision status changed");
        self.bus.publish(
            PlatformEvent::new(VISION_STATUS_CHANGED)
                .with_source(entity::VISION, vision_id)
                .with_actor(actor.user_id)
                .with_payload(json!({ "from": from, "to": to })),
        );
        Ok(())
    }

    /// Best-effort `failed` write after an error.
    async fn mark_failed(&self, vision: &Vision, actor: &Actor, cause: &PipelineError) {
        if let Err(e) = self
            .gateway
            .set_vision_status(vision.id, VisionStatus::Failed)
            .await
        {
            tracing::warn!(vision_id = %vision.id, error = %e, "Could not mark vision as failed");
        }
        self.set_local_status(vision.id, VisionStatus::Failed).await;

        self.bus.publish(
            PlatformEvent::new(VISION_GENERATION_FAILED)
                .with_source(entity::VISION, vision.id)
                .with_actor(actor.user_id)
                .with_payload(json!({ "message": cause.user_message() })),
        );
    }

    async fn set_local_status(&self, vision_id: DbId, status: VisionStatus) {
        let mut visions = self.visions.write().await;
        if let Some(local) = visions.iter_mut().find(|v| v.id == vision_id) {
            local.status = status;
        }
    }
}

/// Primary photos first, capped at [`MAX_REFERENCE_PHOTOS`].
fn reference_photos(mut photos: Vec<UserPhoto>) -> Vec<String> {
    photos.sort_by_key(|p| !p.is_primary);
    photos
        .into_iter()
        .take(MAX_REFERENCE_PHOTOS)
        .map(|p| p.photo_url)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn photo(n: u128, primary: bool) -> UserPhoto {
        UserPhoto {
            id: Uuid::from_u128(n),
            user_id: Uuid::from_u128(1),
            photo_url: format!("https://x/{n}.jpg"),
            is_primary: primary,
            created_at: None,
        }
    }

    #[test]
    fn reference_photos_put_primary_first_and_cap() {
        let photos = vec![
            photo(1, false),
            photo(2, false),
            photo(3, true),
            photo(4, false),
            photo(5, false),
        ];
        let urls = reference_photos(photos);
        assert_eq!(urls.len(), MAX_REFERENCE_PHOTOS);
        assert_eq!(urls[0], "https://x/3.jpg");
        assert_eq!(urls[1], "https://x/1.jpg");
    }
}
