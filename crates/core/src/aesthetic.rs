//! Group-level aesthetic preferences applied to every prompt in a group.

use serde::{Deserialize, Serialize};

use crate::style::ImageStyle;

/// Sentence appended to every aesthetic suffix so images in one group
/// read as a set.
pub const CONSISTENCY_CLAUSE: &str =
    "Keep a consistent visual style across every image for this group.";

/// Visual-style preferences stored as JSON in `groups.aesthetic_profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AestheticProfile {
    #[serde(default)]
    pub base_style: ImageStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,
    /// Free-text override. When non-empty it replaces every structured
    /// field in the prompt suffix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_vibe: Option<String>,
}

impl AestheticProfile {
    /// Build the text appended to prompts for this group.
    ///
    /// - `overall_vibe` set: `"{overall_vibe}. {CONSISTENCY_CLAUSE}"`.
    /// - otherwise: the base style description followed by each non-empty
    ///   structured field as `"Label: value"`, joined by `". "`, then the
    ///   consistency clause.
    pub fn prompt_suffix(&self) -> String {
        if let Some(vibe) = non_empty(&self.overall_vibe) {
            return format!("{vibe}. {CONSISTENCY_CLAUSE}");
        }

        let mut parts: Vec<String> = vec![self.base_style.description().to_string()];
        let labelled = [
            ("Color palette", &self.color_palette),
            ("Mood", &self.mood),
            ("Lighting", &self.lighting),
            ("Composition", &self.composition),
        ];
        for (label, value) in labelled {
            if let Some(value) = non_empty(value) {
                parts.push(format!("{label}: {value}"));
            }
        }
        parts.push(CONSISTENCY_CLAUSE.to_string());
        parts.join(". ")
    }

    /// True when nothing beyond the default base style has been chosen.
    pub fn is_default(&self) -> bool {
        self == &AestheticProfile::default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
