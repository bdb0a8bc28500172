//! Rewrites a vision description into a richer image prompt.

use std::sync::Arc;

use sharedvisions_core::aesthetic::AestheticProfile;

use crate::model::TextModel;

pub const ENHANCER_INSTRUCTION: &str = "You are a creative assistant helping couples visualize their shared dreams and goals.
Take the user's description of their vision and enhance it into a detailed image generation prompt.
Make it warm, positive, and aspirational. Focus on the emotional connection and shared experience.
Keep the enhanced prompt under 200 words.";

pub struct PromptEnhancer {
    model: Arc<dyn TextModel>,
}

impl PromptEnhancer {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Enhance `description`. Falls back to the description unchanged when
    /// the model fails or returns no text, so this never errors.
    pub async fn enhance(
        &self,
        description: &str,
        member_names: &[String],
        profile: Option<&AestheticProfile>,
    ) -> String {
        let system = system_instruction(member_names, profile);
        let user = format!("User's vision: {description}");

        match self.model.generate_text(&system, &user).await {
            Ok(Some(text)) => text.trim().to_string(),
            Ok(None) => {
                tracing::warn!("Enhancer returned no text, using the original prompt");
                description.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Prompt enhancement failed, using the original prompt");
                description.to_string()
            }
        }
    }
}

fn system_instruction(member_names: &[String], profile: Option<&AestheticProfile>) -> String {
    let mut system = ENHANCER_INSTRUCTION.to_string();
    if !member_names.is_empty() {
        system.push_str(&format!(
            "\n\nImportant: The image should include these specific people: {}. Make sure to represent them accurately in the scene.",
            member_names.join(", ")
        ));
    }
    if let Some(profile) = profile {
        system.push_str(&format!(
            "\n\nVisual style to apply: {}",
            profile.prompt_suffix()
        ));
    }
    system
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<Option<String>, ()>,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TextModel for Scripted {
        async fn generate_text(&self, system: &str, user: &str) -> Result<Option<String>, GenerationError> {
            self.seen.lock().unwrap().push((system.to_string(), user.to_string()));
            self.reply
                .clone()
                .map_err(|_| GenerationError::GenerationFailed("offline".into()))
        }
    }

    fn build(reply: Result<Option<String>, ()>) -> (Arc<Scripted>, PromptEnhancer) {
        let model = Arc::new(Scripted { reply, seen: Mutex::new(Vec::new()) });
        (model.clone(), PromptEnhancer::new(model))
    }

    #[tokio::test]
    async fn returns_model_text_and_names_members() {
        let (model, enhancer) = build(Ok(Some("  A golden beach at dusk  ".into())));
        let out = enhancer
            .enhance("beach", &["me".into(), "Sam".into()], Some(&AestheticProfile::default()))
            .await;
        assert_eq!(out, "A golden beach at dusk");

        let seen = model.seen.lock().unwrap();
        let (system, user) = &seen[0];
        assert!(system.starts_with("You are a creative assistant"));
        assert!(system.contains("these specific people: me, Sam."));
        assert!(system.contains("Keep a consistent visual style"));
        assert_eq!(user, "User's vision: beach");
    }

    #[tokio::test]
    async fn falls_back_on_empty_or_failed_reply() {
        let (_, enhancer) = build(Ok(None));
        assert_eq!(enhancer.enhance("beach", &[], None).await, "beach");

        let (model, enhancer) = build(Err(()));
        assert_eq!(enhancer.enhance("beach", &[], None).await, "beach");
        assert_eq!(model.seen.lock().unwrap()[0].0, ENHANCER_INSTRUCTION);
    }
}
