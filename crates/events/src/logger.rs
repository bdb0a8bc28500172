//! Background subscriber that writes every bus event to the tracing log.

use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

pub struct EventLogger;

impl EventLogger {
    /// Log events until the bus is dropped.
    pub async fn run(mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => Self::log(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
    }

    fn log(event: &PlatformEvent) {
        let entity_id = event.source_entity_id.map(|id| id.to_string());
        if event.is_error() {
            tracing::error!(
                event_type = %event.event_type,
                message = event.payload["message"].as_str().unwrap_or_default(),
                operation = event.payload["operation"].as_str().unwrap_or_default(),
                "Operation failed"
            );
        } else {
            tracing::info!(
                event_type = %event.event_type,
                entity = event.source_entity_type.as_deref().unwrap_or("-"),
                entity_id = entity_id.as_deref().unwrap_or("-"),
                payload = %event.payload,
                "Event"
            );
        }
    }
}
