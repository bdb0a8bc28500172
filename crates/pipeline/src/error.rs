use sharedvisions_core::error::CoreError;
use sharedvisions_db::{DbError, StorageError};
use sharedvisions_events::{EventBus, PlatformEvent};
use sharedvisions_genai::GenerationError;

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Authentication failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-up returned no user")]
    SignUpFailed,

    #[error("Sign-in rejected: {0}")]
    SignInFailed(#[source] DbError),

    #[error("No active session")]
    NotAuthenticated,

    #[error("No profile row for the signed-in user")]
    ProfileNotFound,

    #[error(transparent)]
    Backend(#[from] DbError),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SignUpFailed => "Failed to create account. Please try again.",
            Self::SignInFailed(_) => "Failed to sign in. Please check your credentials.",
            Self::NotAuthenticated => "You are not signed in.",
            Self::ProfileNotFound => "Profile not found.",
            Self::Backend(e) if e.is_unauthorized() => "You are not signed in.",
            Self::Backend(_) => GENERIC_MESSAGE,
        }
    }
}

/// Every error a controller or service operation can return.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Already a member of this group")]
    AlreadyMember,

    #[error("Invite code did not match a group")]
    InvalidInviteCode,
}

impl PipelineError {
    /// The sentence to show end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Core(CoreError::Validation(msg)) => format!("Please check your input: {msg}"),
            Self::Core(CoreError::NotFound { entity, .. }) => format!("That {entity} no longer exists."),
            Self::Core(CoreError::Conflict(msg)) => msg.clone(),
            Self::Core(CoreError::Internal(_)) => GENERIC_MESSAGE.to_string(),
            Self::Db(e) if e.is_unauthorized() => "You are not signed in.".to_string(),
            Self::Db(_) => GENERIC_MESSAGE.to_string(),
            Self::Storage(e) => e.user_message().to_string(),
            Self::Generation(e) => e.user_message().to_string(),
            Self::Auth(e) => e.user_message().to_string(),
            Self::AlreadyMember => "You're already a member of this group".to_string(),
            Self::InvalidInviteCode => "Invalid invite code or group not found".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for PipelineError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Core(e.into())
    }
}

/// Log a failed operation and publish it as an `app.error` event.
pub(crate) fn report<T>(
    bus: &EventBus,
    operation: &'static str,
    result: Result<T, PipelineError>,
) -> Result<T, PipelineError> {
    if let Err(e) = &result {
        tracing::error!(operation, error = %e, "Operation failed");
        bus.publish(PlatformEvent::app_error(operation, e.user_message()));
    }
    result
}
