//! HTTP client for the Gemini text endpoint and the Imagen predict endpoint.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::config::GeminiConfig;
use crate::error::GenerationError;
use crate::model::{ImageModel, TextModel};

/// Prepended to the image prompt when reference photos exist.
pub const REFERENCE_PHOTO_PREAMBLE: &str =
    "This image should feature the specific people whose reference photos are provided. ";

/// Endpoint path suffixes that produce images.
const IMAGE_METHODS: [&str; 2] = [":predict", ":generateImages"];

pub struct GeminiApi {
    client: reqwest::Client,
    config: GeminiConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiApi {
    pub fn new(config: GeminiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    fn text_url(&self) -> Result<reqwest::Url, GenerationError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.text_model
        );
        reqwest::Url::parse(&raw).map_err(|e| GenerationError::InvalidEndpoint(format!("{raw}: {e}")))
    }

    fn image_url(&self) -> Result<reqwest::Url, GenerationError> {
        let raw = &self.config.imagen_endpoint;
        let url = reqwest::Url::parse(raw)
            .map_err(|e| GenerationError::InvalidEndpoint(format!("{raw}: {e}")))?;
        if !IMAGE_METHODS.iter().any(|m| url.path().ends_with(m)) {
            return Err(GenerationError::ImageGenerationNotSupported(raw.clone()));
        }
        Ok(url)
    }

    /// Read the body of a non-200 response into a `GenerationFailed`.
    async fn failure(response: reqwest::Response) -> GenerationError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        GenerationError::GenerationFailed(format!("status {status}: {body}"))
    }
}

#[async_trait]
impl TextModel for GeminiApi {
    async fn generate_text(&self, system: &str, user: &str) -> Result<Option<String>, GenerationError> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": user }] }],
        });

        let response = self
            .client
            .post(self.text_url()?)
            .query(&[("key", &self.config.api_key)])
            .json(&body)
            .send()
            .await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(Self::failure(response).await);
        }

        let bytes = response.bytes().await?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GenerationError::ParsingFailed(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        Ok(if text.trim().is_empty() { None } else { Some(text) })
    }
}

#[async_trait]
impl ImageModel for GeminiApi {
    /// Single attempt. The photos are not sent; they only change the prompt.
    async fn generate_image(
        &self,
        prompt: &str,
        reference_photos: &[String],
    ) -> Result<Vec<u8>, GenerationError> {
        let url = self.image_url()?;
        let final_prompt = if reference_photos.is_empty() {
            prompt.to_string()
        } else {
            format!("{REFERENCE_PHOTO_PREAMBLE}{prompt}")
        };

        let body = json!({
            "instances": [{ "prompt": final_prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "1:1",
                "safetyFilterLevel": "block_medium_and_above",
            },
        });

        tracing::debug!(
            references = reference_photos.len(),
            prompt_len = final_prompt.len(),
            "Requesting image"
        );
        let response = self
            .client
            .post(url)
            .query(&[("key", &self.config.api_key)])
            .json(&body)
            .send()
            .await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(Self::failure(response).await);
        }

        let bytes = response.bytes().await?;
        let image = decode_prediction(&bytes)?;
        tracing::debug!(size = image.len(), "Image generated");
        Ok(image)
    }
}

/// Pull `predictions[0].bytesBase64Encoded` out of a predict response.
fn decode_prediction(body: &[u8]) -> Result<Vec<u8>, GenerationError> {
    let json: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| GenerationError::ParsingFailed(e.to_string()))?;
    let encoded = json
        .get("predictions")
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("bytesBase64Encoded"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| GenerationError::ParsingFailed("no predictions[0].bytesBase64Encoded".into()))?;
    STANDARD
        .decode(encoded)
        .map_err(|e| GenerationError::ParsingFailed(format!("invalid base64: {e}")))
}
