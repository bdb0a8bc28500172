//! Object storage (`/storage/v1`): uploads, public URLs, deletes and
//! downloads of binary objects.

use serde_json::json;
use sharedvisions_core::types::DbId;

use crate::client::{ensure_success, BackendClient};
use crate::error::DbError;

/// Storage buckets used by the application. All are public-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBucket {
    UserPhotos,
    GeneratedImages,
    Avatars,
}

impl StorageBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBucket::UserPhotos => "user-photos",
            StorageBucket::GeneratedImages => "generated-images",
            StorageBucket::Avatars => "avatars",
        }
    }
}

/// Errors from storage operations and image preparation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to process image")]
    ImageConversionFailed,

    #[error("Image is {size} bytes, larger than the {max} byte limit")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Failed to upload file: {0}")]
    UploadFailed(#[source] DbError),

    #[error("Failed to download file: {0}")]
    DownloadFailed(#[source] DbError),

    #[error("Failed to delete file: {0}")]
    DeleteFailed(#[source] DbError),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ImageConversionFailed => "Failed to process image.",
            Self::ImageTooLarge { .. } => "Image is too large. Please choose a smaller photo.",
            Self::UploadFailed(_) => "Failed to upload file.",
            Self::DownloadFailed(_) => "Failed to download file.",
            Self::DeleteFailed(_) => "Failed to delete file.",
        }
    }
}

/// Object key `{owner}/{random}.{ext}`.
pub fn object_key(owner: DbId, ext: &str) -> String {
    format!("{owner}/{}.{ext}", uuid::Uuid::new_v4())
}

/// Recover the object path from a public URL produced by [`ObjectStorage::public_url`].
///
/// Returns `None` when the URL does not point into `bucket`.
pub fn object_path_from_url(url: &str, bucket: StorageBucket) -> Option<String> {
    let marker = format!("/{}/", bucket.as_str());
    let start = url.find(&marker)? + marker.len();
    let path = url[start..].split(['?', '#']).next()?;
    (!path.is_empty()).then(|| path.to_string())
}

/// Stateless wrapper over the storage endpoints.
pub struct ObjectStorage;

impl ObjectStorage {
    /// Upload bytes and return the object's public URL.
    ///
    /// With `upsert`, an existing object at `path` is replaced.
    pub async fn upload(
        client: &BackendClient,
        bucket: StorageBucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<String, StorageError> {
        let size = bytes.len();
        let request = client
            .http()
            .post(client.storage_url(&format!("object/{}/{path}", bucket.as_str())))
            .header("content-type", content_type)
            .header("x-upsert", if upsert { "true" } else { "false" })
            .body(bytes);

        let response = client
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.into()))?;
        ensure_success(response)
            .await
            .map_err(StorageError::UploadFailed)?;

        tracing::debug!(bucket = bucket.as_str(), path, size, "Uploaded object");
        Ok(Self::public_url(client, bucket, path))
    }

    /// Public URL of an object. No request is made.
    pub fn public_url(client: &BackendClient, bucket: StorageBucket, path: &str) -> String {
        client.storage_url(&format!("object/public/{}/{path}", bucket.as_str()))
    }

    /// Delete objects by path.
    pub async fn remove(
        client: &BackendClient,
        bucket: StorageBucket,
        paths: &[String],
    ) -> Result<(), StorageError> {
        let request = client
            .http()
            .delete(client.storage_url(&format!("object/{}", bucket.as_str())))
            .json(&json!({ "prefixes": paths }));
        let response = client
            .authorize(request)
            .await
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.into()))?;
        ensure_success(response)
            .await
            .map_err(StorageError::DeleteFailed)?;
        Ok(())
    }

    /// Download an object by absolute URL (public or signed).
    pub async fn download(client: &BackendClient, url: &str) -> Result<Vec<u8>, StorageError> {
        let response = client
            .http()
            .get(url)
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.into()))?;
        let response = ensure_success(response)
            .await
            .map_err(StorageError::DownloadFailed)?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.into()))?;
        Ok(bytes.to_vec())
    }
}
