//! Sign-up, sign-in and the signed-in user's profile.

use std::sync::Arc;

use serde_json::json;
use sharedvisions_core::limits::{MAX_FULL_NAME_LENGTH, MIN_PASSWORD_LENGTH};
use sharedvisions_core::types::DbId;
use sharedvisions_db::models::profile::{Profile, ProfileUpdate};
use sharedvisions_db::repositories::ProfileRepo;
use sharedvisions_db::{AuthApi, AuthUser, BackendClient, DbError};
use sharedvisions_events::types::{entity, AUTH_SIGNED_IN, AUTH_SIGNED_OUT, PROFILE_UPDATED};
use sharedvisions_events::{EventBus, PlatformEvent};
use validator::Validate;

use crate::actor::Actor;
use crate::error::{report, AuthError, PipelineError};

/// Sign-up form.
#[derive(Debug, Clone, Validate)]
pub struct SignUp {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH))]
    pub password: String,
    #[validate(length(min = 1, max = MAX_FULL_NAME_LENGTH))]
    pub full_name: String,
}

pub struct AuthService {
    client: Arc<BackendClient>,
    bus: Arc<EventBus>,
}

impl AuthService {
    pub fn new(client: Arc<BackendClient>, bus: Arc<EventBus>) -> Self {
        Self { client, bus }
    }

    /// Create the auth user, then their profile row.
    pub async fn sign_up(&self, form: SignUp) -> Result<Profile, PipelineError> {
        let result = async {
            form.validate()?;
            let outcome = AuthApi::sign_up(&self.client, &form.email, &form.password, &form.full_name)
                .await
                .map_err(AuthError::from)?;
            let user = outcome.user.ok_or(AuthError::SignUpFailed)?;

            let profile = Profile::new(user.id, Some(form.full_name.trim().to_string()));
            let stored = ProfileRepo::create(&self.client, &profile).await?;
            tracing::info!(user_id = %stored.id, "Account created");
            Ok::<_, PipelineError>(stored)
        }
        .await;
        report(&self.bus, "sign_up", result)
    }

    /// Sign in and keep the session on the shared client.
    ///
    /// A profile row is then upserted in a detached task. That write is
    /// best effort; failures are logged and never reach the caller.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, PipelineError> {
        let result = async {
            let session = AuthApi::sign_in_with_password(&self.client, email, password)
                .await
                .map_err(|e| match e {
                    DbError::Api { .. } => AuthError::SignInFailed(e),
                    other => AuthError::Backend(other),
                })?;
            let user = session.user;

            let client = Arc::clone(&self.client);
            let user_id = user.id;
            let full_name = user.full_name().map(str::to_string);
            tokio::spawn(async move {
                if let Err(e) = ProfileRepo::ensure_exists(&client, user_id, full_name.as_deref()).await {
                    tracing::warn!(user_id = %user_id, error = %e, "Profile upsert after sign-in failed");
                }
            });

            tracing::info!(user_id = %user.id, "Signed in");
            self.bus
                .publish(PlatformEvent::new(AUTH_SIGNED_IN).with_actor(user.id));
            Ok::<_, PipelineError>(user)
        }
        .await;
        report(&self.bus, "sign_in", result)
    }

    /// Revoke the session. The local session is gone even if this fails.
    pub async fn sign_out(&self) -> Result<(), PipelineError> {
        let result = async {
            let user_id = self.client.session().await.map(|s| s.user.id);
            AuthApi::sign_out(&self.client).await.map_err(AuthError::from)?;
            let mut event = PlatformEvent::new(AUTH_SIGNED_OUT);
            if let Some(id) = user_id {
                event = event.with_actor(id);
            }
            self.bus.publish(event);
            Ok::<_, PipelineError>(())
        }
        .await;
        report(&self.bus, "sign_out", result)
    }

    pub async fn has_session(&self) -> bool {
        self.client.session().await.is_some()
    }

    /// Profile of the signed-in user.
    pub async fn current_user(&self) -> Result<Profile, PipelineError> {
        let result = self.load_current_user().await;
        report(&self.bus, "current_user", result)
    }

    /// The signed-in user as an [`Actor`], named from their profile.
    pub async fn current_actor(&self) -> Result<Actor, PipelineError> {
        let result = async {
            let profile = self.load_current_user().await?;
            Ok::<_, PipelineError>(Actor::new(profile.id, profile.display_name()))
        }
        .await;
        report(&self.bus, "current_actor", result)
    }

    pub async fn update_profile(&self, user_id: DbId, input: ProfileUpdate) -> Result<(), PipelineError> {
        let result = async {
            input.validate()?;
            ProfileRepo::update(&self.client, user_id, &input).await?;
            self.bus.publish(
                PlatformEvent::new(PROFILE_UPDATED)
                    .with_source(entity::PROFILE, user_id)
                    .with_actor(user_id)
                    .with_payload(json!({
                        "username": input.username,
                        "full_name": input.full_name,
                    })),
            );
            Ok::<_, PipelineError>(())
        }
        .await;
        report(&self.bus, "update_profile", result)
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<(), PipelineError> {
        let result = AuthApi::recover(&self.client, email)
            .await
            .map_err(|e| PipelineError::from(AuthError::from(e)));
        report(&self.bus, "send_password_reset", result)
    }

    /// Confirms the session with the auth server before reading the profile.
    async fn load_current_user(&self) -> Result<Profile, PipelineError> {
        if self.client.session().await.is_none() {
            return Err(AuthError::NotAuthenticated.into());
        }
        let user = AuthApi::get_user(&self.client).await.map_err(|e| {
            if e.is_unauthorized() {
                AuthError::NotAuthenticated
            } else {
                AuthError::Backend(e)
            }
        })?;
        let profile = ProfileRepo::find_by_id(&self.client, user.id)
            .await
            .map_err(AuthError::from)?
            .ok_or(AuthError::ProfileNotFound)?;
        Ok(profile)
    }
}
