//! In-memory doubles for the controller's seams.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sharedvisions_core::status::VisionStatus;
use sharedvisions_core::types::DbId;
use sharedvisions_db::models::generated_image::GeneratedImage;
use sharedvisions_db::models::group::Group;
use sharedvisions_db::models::group_member::GroupMember;
use sharedvisions_db::models::user_photo::UserPhoto;
use sharedvisions_db::models::vision::Vision;
use sharedvisions_db::DbError;
use sharedvisions_events::EventBus;
use sharedvisions_genai::{GenerationError, ImageModel, TextModel};
use sharedvisions_pipeline::{Actor, PipelineError, VisionController, VisionGateway};

#[derive(Default)]
pub struct State {
    pub visions: Vec<Vision>,
    pub groups: Vec<Group>,
    pub members: Vec<GroupMember>,
    pub photos: Vec<UserPhoto>,
    pub images: Vec<GeneratedImage>,
    /// Every status written, in order.
    pub status_log: Vec<(DbId, VisionStatus)>,
    /// Status writes with this value fail.
    pub fail_status: Option<VisionStatus>,
}

#[derive(Default, Clone)]
pub struct MemoryGateway {
    pub state: Arc<Mutex<State>>,
}

impl MemoryGateway {
    pub fn statuses_for(&self, id: DbId) -> Vec<VisionStatus> {
        self.state
            .lock()
            .unwrap()
            .status_log
            .iter()
            .filter(|(v, _)| *v == id)
            .map(|(_, s)| *s)
            .collect()
    }

    pub fn stored_status(&self, id: DbId) -> VisionStatus {
        self.state
            .lock()
            .unwrap()
            .visions
            .iter()
            .find(|v| v.id == id)
            .map(|v| v.status)
            .unwrap()
    }
}

fn with_images(vision: &Vision, images: &[GeneratedImage]) -> Vision {
    let mut v = vision.clone();
    v.generated_images = images.iter().filter(|i| i.vision_id == v.id).cloned().collect();
    v
}

#[async_trait]
impl VisionGateway for MemoryGateway {
    async fn list_visions(&self, group_id: Option<DbId>) -> Result<Vec<Vision>, PipelineError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .visions
            .iter()
            .rev()
            .filter(|v| group_id.map_or(true, |g| v.group_id == g))
            .map(|v| with_images(v, &state.images))
            .collect())
    }

    async fn group_ids_for_user(&self, user_id: DbId) -> Result<Vec<DbId>, PipelineError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .members
            .iter()
            .filter(|m| m.user_id == user_id)
            .map(|m| m.group_id)
            .collect())
    }

    async fn list_visions_for_groups(&self, group_ids: &[DbId]) -> Result<Vec<Vision>, PipelineError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .visions
            .iter()
            .rev()
            .filter(|v| group_ids.contains(&v.group_id))
            .map(|v| with_images(v, &state.images))
            .collect())
    }

    async fn find_vision(&self, id: DbId) -> Result<Option<Vision>, PipelineError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .visions
            .iter()
            .find(|v| v.id == id)
            .map(|v| with_images(v, &state.images)))
    }

    async fn insert_vision(&self, vision: &Vision) -> Result<Vision, PipelineError> {
        self.state.lock().unwrap().visions.push(vision.clone());
        Ok(vision.clone())
    }

    async fn set_vision_status(&self, id: DbId, status: VisionStatus) -> Result<(), PipelineError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_status == Some(status) {
            return Err(DbError::Api {
                status: 500,
                body: "status write rejected".into(),
            }
            .into());
        }
        state.status_log.push((id, status));
        if let Some(v) = state.visions.iter_mut().find(|v| v.id == id) {
            v.status = status;
        }
        Ok(())
    }

    async fn delete_vision(&self, id: DbId) -> Result<(), PipelineError> {
        let mut state = self.state.lock().unwrap();
        state.visions.retain(|v| v.id != id);
        state.images.retain(|i| i.vision_id != id);
        Ok(())
    }

    async fn find_group(&self, id: DbId) -> Result<Option<Group>, PipelineError> {
        Ok(self.state.lock().unwrap().groups.iter().find(|g| g.id == id).cloned())
    }

    async fn group_members(&self, group_id: DbId) -> Result<Vec<GroupMember>, PipelineError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .members
            .iter()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn photos_for_users(&self, user_ids: &[DbId]) -> Result<Vec<UserPhoto>, PipelineError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .photos
            .iter()
            .filter(|p| user_ids.contains(&p.user_id))
            .cloned()
            .collect())
    }

    async fn store_generated_image(
        &self,
        vision_id: DbId,
        bytes: Vec<u8>,
        prompt_used: &str,
    ) -> Result<GeneratedImage, PipelineError> {
        let image = GeneratedImage::new(
            vision_id,
            format!("memory://{vision_id}/{}.png", bytes.len()),
            prompt_used.to_string(),
        );
        self.state.lock().unwrap().images.push(image.clone());
        Ok(image)
    }

    async fn set_image_favorite(&self, image_id: DbId, is_favorite: bool) -> Result<(), PipelineError> {
        let mut state = self.state.lock().unwrap();
        if let Some(image) = state.images.iter_mut().find(|i| i.id == image_id) {
            image.is_favorite = is_favorite;
        }
        Ok(())
    }
}

/// Text model that echoes a fixed reply, or fails.
pub struct ScriptedText {
    pub reply: Option<String>,
    pub fail: bool,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedText {
    pub fn replying(reply: Option<&str>) -> Self {
        Self {
            reply: reply.map(str::to_string),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TextModel for ScriptedText {
    async fn generate_text(&self, system: &str, user: &str) -> Result<Option<String>, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        if self.fail {
            return Err(GenerationError::GenerationFailed("text model offline".into()));
        }
        Ok(self.reply.clone())
    }
}

/// Image model that returns fixed bytes, or fails, and records its prompts.
#[derive(Default)]
pub struct ScriptedImage {
    pub fail: bool,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

#[async_trait]
impl ImageModel for ScriptedImage {
    async fn generate_image(
        &self,
        prompt: &str,
        reference_photos: &[String],
    ) -> Result<Vec<u8>, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), reference_photos.to_vec()));
        if self.fail {
            return Err(GenerationError::GenerationFailed("status 500".into()));
        }
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

pub struct Harness {
    pub gateway: MemoryGateway,
    pub text: Arc<ScriptedText>,
    pub image: Arc<ScriptedImage>,
    pub bus: Arc<EventBus>,
    pub controller: VisionController,
    pub actor: Actor,
}

pub fn harness(text: ScriptedText, image: ScriptedImage) -> Harness {
    let gateway = MemoryGateway::default();
    let text = Arc::new(text);
    let image = Arc::new(image);
    let bus = Arc::new(EventBus::default());
    let controller = VisionController::new(
        Arc::new(gateway.clone()),
        text.clone(),
        image.clone(),
        Arc::clone(&bus),
    );
    Harness {
        gateway,
        text,
        image,
        bus,
        controller,
        actor: Actor::new(uuid::Uuid::from_u128(100), "Alex"),
    }
}
