//! Periodic pickup of `pending` visions.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sharedvisions_core::status::VisionStatus;
use sharedvisions_core::style::ImageStyle;
use sharedvisions_core::types::DbId;
use sharedvisions_pipeline::{Actor, VisionController};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

pub struct Poller {
    visions: Arc<VisionController>,
    actor: Actor,
    style: ImageStyle,
    interval: Duration,
    /// Visions with a generation task still running.
    in_flight: Arc<Mutex<HashSet<DbId>>>,
    tasks: TaskTracker,
}

impl Poller {
    pub fn new(visions: Arc<VisionController>, actor: Actor, style: ImageStyle, interval: Duration) -> Self {
        Self {
            visions,
            actor,
            style,
            interval,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            tasks: TaskTracker::new(),
        }
    }

    /// Poll until `cancel` fires, then wait for running generations.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            user_id = %self.actor.user_id,
            style = %self.style,
            interval_secs = self.interval.as_secs(),
            "Vision poller started"
        );

        let mut interval = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Vision poller stopping");
                    break;
                }
                _ = interval.tick() => self.poll_once().await,
            }
        }

        self.tasks.close();
        if !self.tasks.is_empty() {
            tracing::info!(running = self.tasks.len(), "Waiting for running generations");
        }
        self.tasks.wait().await;
    }

    async fn poll_once(&self) {
        let visions = match self.visions.fetch_visions_for_user(self.actor.user_id).await {
            Ok(visions) => visions,
            // Already logged and published by the controller.
            Err(_) => return,
        };

        let pending: Vec<DbId> = visions
            .iter()
            .filter(|v| v.status == VisionStatus::Pending)
            .map(|v| v.id)
            .collect();
        if pending.is_empty() {
            tracing::debug!(visions = visions.len(), "No pending visions");
            return;
        }

        for vision_id in pending {
            if !self.claim(vision_id) {
                continue;
            }
            let visions = Arc::clone(&self.visions);
            let actor = self.actor.clone();
            let style = self.style;
            let in_flight = Arc::clone(&self.in_flight);

            self.tasks.spawn(async move {
                match visions.generate_image(vision_id, style, &actor).await {
                    Ok(image) => tracing::info!(
                        vision_id = %vision_id,
                        image_id = %image.id,
                        "Generated image for pending vision"
                    ),
                    Err(e) => tracing::debug!(vision_id = %vision_id, error = %e, "Generation task ended with error"),
                }
                release(&in_flight, vision_id);
            });
        }
    }

    /// Mark a vision as in flight. False when a task already owns it.
    fn claim(&self, vision_id: DbId) -> bool {
        match self.in_flight.lock() {
            Ok(mut set) => set.insert(vision_id),
            Err(poisoned) => poisoned.into_inner().insert(vision_id),
        }
    }
}

fn release(in_flight: &Mutex<HashSet<DbId>>, vision_id: DbId) {
    match in_flight.lock() {
        Ok(mut set) => set.remove(&vision_id),
        Err(poisoned) => poisoned.into_inner().remove(&vision_id),
    };
}
