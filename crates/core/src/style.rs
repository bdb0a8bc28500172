//! Image style presets offered when generating a vision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A fixed rendering style, each with a descriptive clause fed to the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    #[default]
    Realistic,
    Artistic,
    Cinematic,
    Dreamy,
}

impl ImageStyle {
    /// Every style, in display order.
    pub const ALL: [ImageStyle; 4] = [
        ImageStyle::Realistic,
        ImageStyle::Artistic,
        ImageStyle::Cinematic,
        ImageStyle::Dreamy,
    ];

    /// The clause appended to prompts rendered in this style.
    pub fn description(self) -> &'static str {
        match self {
            ImageStyle::Realistic => "Photorealistic, natural lighting, candid moment",
            ImageStyle::Artistic => "Artistic interpretation, painterly style",
            ImageStyle::Cinematic => "Cinematic look, dramatic lighting, movie-like",
            ImageStyle::Dreamy => "Soft focus, ethereal, dreamlike quality",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ImageStyle::Realistic => "Realistic",
            ImageStyle::Artistic => "Artistic",
            ImageStyle::Cinematic => "Cinematic",
            ImageStyle::Dreamy => "Dreamy",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ImageStyle::Realistic => "realistic",
            ImageStyle::Artistic => "artistic",
            ImageStyle::Cinematic => "cinematic",
            ImageStyle::Dreamy => "dreamy",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageStyle::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid image style '{s}'. Must be one of: realistic, artistic, cinematic, dreamy"
                ))
            })
    }
}
