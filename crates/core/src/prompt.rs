//! Image-generation prompt assembly.

use crate::aesthetic::AestheticProfile;
use crate::style::ImageStyle;

/// Fixed opening of every generated prompt.
pub const PROMPT_LEAD_IN: &str = "Create a beautiful, aspirational photograph showing:";

/// Assemble the image prompt for a vision.
///
/// Lines, in order: lead-in with the title, `Details:` (only when the
/// description is non-empty), `Style:`, and finally the group's aesthetic
/// suffix. A group without a profile uses [`AestheticProfile::default`].
pub fn build_prompt(
    title: &str,
    description: Option<&str>,
    style: ImageStyle,
    profile: Option<&AestheticProfile>,
) -> String {
    let mut lines = vec![format!("{PROMPT_LEAD_IN} {}", title.trim())];

    if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
        lines.push(format!("Details: {description}"));
    }

    lines.push(format!("Style: {}", style.description()));

    let suffix = match profile {
        Some(profile) => profile.prompt_suffix(),
        None => AestheticProfile::default().prompt_suffix(),
    };
    lines.push(suffix);

    lines.join("\n")
}

/// The free text of a vision as the user wrote it. Member resolution reads this.
pub fn vision_text(title: &str, description: Option<&str>) -> String {
    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(description) => format!("{}. {description}", title.trim()),
        None => title.trim().to_string(),
    }
}
