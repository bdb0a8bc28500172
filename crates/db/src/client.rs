//! HTTP client for the backend-as-a-service project.
//!
//! [`BackendClient`] holds the project URL, the anonymous key and, once a
//! user signs in, their session. Every request carries `apikey` plus an
//! `Authorization: Bearer` header with the session access token (or the
//! anonymous key when signed out). Table, storage and auth helpers build on
//! the generic methods here.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::auth::Session;
use crate::config::BackendConfig;
use crate::error::DbError;
use crate::query::Query;

/// Relational tables exposed through the REST endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Profiles,
    UserPhotos,
    Groups,
    GroupMembers,
    Visions,
    GeneratedImages,
}

impl Table {
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::UserPhotos => "user_photos",
            Table::Groups => "groups",
            Table::GroupMembers => "group_members",
            Table::Visions => "visions",
            Table::GeneratedImages => "generated_images",
        }
    }
}

/// Shared handle to the backend. Wrap in `Arc` and pass to services.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
}

impl BackendClient {
    /// Build a client with its own connection pool and request timeout.
    pub fn new(config: &BackendConfig) -> Result<Self, DbError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(http, config))
    }

    /// Build a client reusing an existing [`reqwest::Client`].
    pub fn with_client(http: reqwest::Client, config: &BackendConfig) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            session: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ---- session ----

    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Attach `apikey` and bearer headers to a request.
    pub(crate) async fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let bearer = match self.session.read().await.as_ref() {
            Some(session) => session.access_token.clone(),
            None => self.anon_key.clone(),
        };
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    // ---- URLs ----

    pub(crate) fn rest_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.as_str())
    }

    pub(crate) fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ---- table operations ----

    /// `GET /rest/v1/{table}` returning every matching row.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &Query,
    ) -> Result<Vec<T>, DbError> {
        let request = self.http.get(self.rest_url(table)).query(&query.to_params());
        let response = self.authorize(request).await.send().await?;
        parse_json(response).await
    }

    /// Select at most one row.
    pub async fn select_optional<T: DeserializeOwned>(
        &self,
        table: Table,
        query: &Query,
    ) -> Result<Option<T>, DbError> {
        let rows: Vec<T> = self.select(table, &query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// `POST /rest/v1/{table}`, returning the stored row.
    pub async fn insert<T, R>(&self, table: Table, row: &T) -> Result<R, DbError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(row);
        let response = self.authorize(request).await.send().await?;
        first_row(table, parse_json(response).await?)
    }

    /// Insert or merge on primary key.
    pub async fn upsert<T: Serialize + ?Sized>(&self, table: Table, row: &T) -> Result<(), DbError> {
        let request = self
            .http
            .post(self.rest_url(table))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(row);
        let response = self.authorize(request).await.send().await?;
        ensure_success(response).await.map(|_| ())
    }

    /// `PATCH /rest/v1/{table}` applying `patch` to every matching row.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        table: Table,
        patch: &T,
        query: &Query,
    ) -> Result<(), DbError> {
        if !query.has_filters() {
            return Err(DbError::Unfiltered {
                operation: "update",
                table: table.as_str(),
            });
        }
        let request = self
            .http
            .patch(self.rest_url(table))
            .query(&query.to_params())
            .header("Prefer", "return=minimal")
            .json(patch);
        let response = self.authorize(request).await.send().await?;
        ensure_success(response).await.map(|_| ())
    }

    /// `DELETE /rest/v1/{table}` for every matching row.
    pub async fn delete(&self, table: Table, query: &Query) -> Result<(), DbError> {
        if !query.has_filters() {
            return Err(DbError::Unfiltered {
                operation: "delete",
                table: table.as_str(),
            });
        }
        let request = self
            .http
            .delete(self.rest_url(table))
            .query(&query.to_params());
        let response = self.authorize(request).await.send().await?;
        ensure_success(response).await.map(|_| ())
    }
}

// ---- response helpers ----

/// Return the response unchanged on 2xx, or [`DbError::Api`] with the body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, DbError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(DbError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Decode a successful JSON body.
pub(crate) async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, DbError> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn first_row<R>(table: Table, rows: Vec<R>) -> Result<R, DbError> {
    rows.into_iter().next().ok_or(DbError::NotFound {
        table: table.as_str(),
    })
}
