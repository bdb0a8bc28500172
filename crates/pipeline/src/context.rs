//! Wiring: one shared backend client, one model client, one bus.

use std::sync::Arc;

use sharedvisions_db::BackendClient;
use sharedvisions_events::EventBus;
use sharedvisions_genai::{GeminiApi, GenerationError};

use crate::config::AppConfig;
use crate::controller::VisionController;
use crate::error::PipelineError;
use crate::gateway::BackendGateway;
use crate::services::{AuthService, GroupService, ProfileService};

/// Everything a front end or the worker needs, built from one [`AppConfig`].
pub struct AppContext {
    pub backend: Arc<BackendClient>,
    pub bus: Arc<EventBus>,
    pub visions: Arc<VisionController>,
    pub auth: AuthService,
    pub groups: GroupService,
    pub profiles: ProfileService,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Result<Self, PipelineError> {
        let backend = Arc::new(BackendClient::new(&config.backend)?);
        let gemini = Arc::new(GeminiApi::new(config.gemini.clone()).map_err(GenerationError::from)?);
        let bus = Arc::new(EventBus::default());

        let visions = Arc::new(VisionController::new(
            Arc::new(BackendGateway::new(Arc::clone(&backend))),
            gemini.clone(),
            gemini,
            Arc::clone(&bus),
        ));

        Ok(Self {
            auth: AuthService::new(Arc::clone(&backend), Arc::clone(&bus)),
            groups: GroupService::new(Arc::clone(&backend), Arc::clone(&bus)),
            profiles: ProfileService::new(Arc::clone(&backend), Arc::clone(&bus)),
            backend,
            bus,
            visions,
        })
    }
}
