//! Model-backed member resolution with the substring fallback.

use std::fmt::Write as _;
use std::sync::Arc;

use sharedvisions_core::members::{fallback_parse_members, parse_mentions, MemberMentions, MemberRef};
use sharedvisions_core::types::DbId;

use crate::model::TextModel;

const RESOLVER_INSTRUCTION: &str = "You are parsing a vision description to identify which people should appear in an AI-generated image.
Only include members explicitly mentioned. If the description says \"me and Izzy\", include both the current user and Izzy.
If it does not mention anyone (for example \"a beach vacation\"), return an empty array, which means all members.
Respond with JSON only, in this shape:
{\"mentioned_members\": [{\"user_id\": \"uuid-string\", \"name_in_prompt\": \"how they are referred to\"}]}";

/// Works out which group members a description names.
pub struct MemberResolver {
    model: Arc<dyn TextModel>,
}

impl MemberResolver {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Never fails. Any model or parse problem falls back to
    /// [`fallback_parse_members`] on the original `prompt`.
    pub async fn resolve(
        &self,
        prompt: &str,
        members: &[MemberRef],
        current_user_id: DbId,
        current_user_name: &str,
    ) -> MemberMentions {
        let user = member_context(prompt, members, current_user_id, current_user_name);

        let raw = match self.model.generate_text(RESOLVER_INSTRUCTION, &user).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!("Member resolver returned no text, using name matching");
                return fallback_parse_members(prompt, members, current_user_id);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Member resolver call failed, using name matching");
                return fallback_parse_members(prompt, members, current_user_id);
            }
        };

        match parse_mentions(&raw, members, current_user_id) {
            Ok(mentions) => {
                tracing::debug!(count = mentions.len(), "Resolved mentioned members");
                mentions
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable member list, using name matching");
                fallback_parse_members(prompt, members, current_user_id)
            }
        }
    }
}

fn member_context(
    prompt: &str,
    members: &[MemberRef],
    current_user_id: DbId,
    current_user_name: &str,
) -> String {
    let mut out = String::from("Available group members:\n");
    for member in members {
        if let Some(first) = member.first_name() {
            let _ = writeln!(out, "- {first} (ID: {})", member.user_id);
        }
    }
    let _ = write!(
        out,
        "\nCurrent user: {current_user_name} (ID: {current_user_id})\n\nUser's vision description: \"{prompt}\""
    );
    out
}
