//! Remote generative models: Gemini for text, Imagen for images.
//!
//! [`GeminiApi`] is the HTTP client. The pipeline only sees it through the
//! [`TextModel`] and [`ImageModel`] traits, which is also how tests swap in
//! doubles. [`PromptEnhancer`] and [`MemberResolver`] are the two text-model
//! workflows built on top.

pub mod api;
pub mod config;
pub mod enhancer;
pub mod error;
pub mod members;
pub mod model;

pub use api::GeminiApi;
pub use config::GeminiConfig;
pub use enhancer::PromptEnhancer;
pub use error::GenerationError;
pub use members::MemberResolver;
pub use model::{ImageModel, TextModel};
