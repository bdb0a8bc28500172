//! Auth endpoints (`/auth/v1`): sign-up, password sign-in, sign-out,
//! current user and password recovery.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sharedvisions_core::types::DbId;

use crate::client::{ensure_success, parse_json, BackendClient};
use crate::error::DbError;

/// A user record as returned by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: DbId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    /// `full_name` from the metadata attached at sign-up, if any.
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
            .filter(|name| !name.trim().is_empty())
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Result of a sign-up call.
///
/// Projects with email confirmation return only the user; projects with
/// auto-confirm also return a session.
#[derive(Debug, Clone)]
pub struct SignUpOutcome {
    pub user: Option<AuthUser>,
    pub session: Option<Session>,
}

/// Stateless wrapper over the auth endpoints.
pub struct AuthApi;

impl AuthApi {
    /// Create an account. When a session comes back it is stored on the client.
    pub async fn sign_up(
        client: &BackendClient,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<SignUpOutcome, DbError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "full_name": full_name },
        });
        let request = client.http().post(client.auth_url("signup")).json(&body);
        let value: serde_json::Value = parse_json(client.authorize(request).await.send().await?).await?;

        let outcome = parse_sign_up(value)?;
        if let Some(session) = &outcome.session {
            client.set_session(session.clone()).await;
        }
        Ok(outcome)
    }

    /// Exchange email and password for a session and store it on the client.
    pub async fn sign_in_with_password(
        client: &BackendClient,
        email: &str,
        password: &str,
    ) -> Result<Session, DbError> {
        let body = json!({ "email": email, "password": password });
        let request = client
            .http()
            .post(client.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&body);
        let session: Session = parse_json(client.authorize(request).await.send().await?).await?;
        client.set_session(session.clone()).await;
        Ok(session)
    }

    /// Revoke the session remotely and forget it locally.
    ///
    /// The local session is cleared even when the remote call fails.
    pub async fn sign_out(client: &BackendClient) -> Result<(), DbError> {
        let request = client.http().post(client.auth_url("logout"));
        let result = match client.authorize(request).await.send().await {
            Ok(response) => ensure_success(response).await.map(|_| ()),
            Err(e) => Err(DbError::from(e)),
        };
        client.clear_session().await;
        result
    }

    /// The user behind the current session, as the auth server sees it.
    pub async fn get_user(client: &BackendClient) -> Result<AuthUser, DbError> {
        let request = client.http().get(client.auth_url("user"));
        parse_json(client.authorize(request).await.send().await?).await
    }

    /// Send a password-reset email.
    pub async fn recover(client: &BackendClient, email: &str) -> Result<(), DbError> {
        let request = client
            .http()
            .post(client.auth_url("recover"))
            .json(&json!({ "email": email }));
        ensure_success(client.authorize(request).await.send().await?).await?;
        Ok(())
    }
}

fn parse_sign_up(value: serde_json::Value) -> Result<SignUpOutcome, DbError> {
    if value.get("access_token").is_some() {
        let session: Session = serde_json::from_value(value)?;
        return Ok(SignUpOutcome {
            user: Some(session.user.clone()),
            session: Some(session),
        });
    }
    if let Some(user) = value.get("user").filter(|u| !u.is_null()) {
        return Ok(SignUpOutcome {
            user: Some(serde_json::from_value(user.clone())?),
            session: None,
        });
    }
    let user = value
        .get("id")
        .is_some()
        .then(|| serde_json::from_value::<AuthUser>(value))
        .transpose()?;
    Ok(SignUpOutcome { user, session: None })
}
