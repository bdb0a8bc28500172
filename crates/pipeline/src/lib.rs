//! Orchestration: the vision lifecycle and the auth, group and profile
//! services.
//!
//! Everything here returns `Result<_, PipelineError>` and, on failure, also
//! publishes an `app.error` event carrying the message to show the user.

pub mod actor;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod services;

pub use actor::Actor;
pub use config::AppConfig;
pub use context::AppContext;
pub use controller::VisionController;
pub use error::{AuthError, PipelineError};
pub use gateway::{BackendGateway, VisionGateway};
pub use services::{AuthService, GroupService, ProfileService};
