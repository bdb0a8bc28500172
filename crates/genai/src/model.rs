//! Model seams. The pipeline depends on these, never on [`GeminiApi`](crate::GeminiApi).

use async_trait::async_trait;

use crate::error::GenerationError;

#[async_trait]
pub trait TextModel: Send + Sync {
    /// One system instruction plus one user turn.
    ///
    /// `Ok(None)` means the model answered without any text.
    async fn generate_text(&self, system: &str, user: &str) -> Result<Option<String>, GenerationError>;
}

#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generate one image and return its encoded bytes.
    ///
    /// `reference_photos` are URLs of photos of the people who should appear.
    async fn generate_image(
        &self,
        prompt: &str,
        reference_photos: &[String],
    ) -> Result<Vec<u8>, GenerationError>;
}
