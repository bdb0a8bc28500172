/// Errors from the generative API layer.
///
/// The `Display` text carries detail for logs; [`user_message`](Self::user_message)
/// is what end users see.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Transport failure or a non-200 response.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A 200 response whose body did not carry the expected data.
    #[error("Failed to parse model response: {0}")]
    ParsingFailed(String),

    #[error("Invalid API endpoint: {0}")]
    InvalidEndpoint(String),

    /// The configured endpoint is not an image-generation model.
    #[error("Endpoint does not support image generation: {0}")]
    ImageGenerationNotSupported(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl GenerationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::GenerationFailed(_) => "Failed to generate image. Please try again.",
            Self::ParsingFailed(_) => "Failed to process the generated image.",
            Self::InvalidEndpoint(_) => "Invalid API endpoint.",
            Self::ImageGenerationNotSupported(_) => "Image generation requires Imagen API access.",
            Self::RateLimitExceeded => "Rate limit exceeded. Please wait a moment and try again.",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        Self::GenerationFailed(e.to_string())
    }
}
