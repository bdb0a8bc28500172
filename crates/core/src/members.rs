//! Member-mention parsing: which group members a vision description names.
//!
//! Two pieces live here, both pure:
//!
//! - [`parse_mentions`] reads the JSON a text model returns when asked to
//!   identify mentioned members. Grammar: optional leading code fence
//!   (```` ``` ```` with an optional language tag), a JSON object, optional
//!   trailing fence. Anything after the closing fence is ignored.
//! - [`fallback_parse_members`] is the substring heuristic used whenever the
//!   model path is unavailable or its output cannot be parsed.
//!
//! An empty result from either means "nobody in particular", which callers
//! treat as "all members".

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::types::DbId;

/// Mentioned member id -> the name used for them in the prompt.
pub type MemberMentions = BTreeMap<DbId, String>;

/// Name recorded for the acting user when they refer to themselves.
pub const SELF_REFERENCE: &str = "me";

static SELF_REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(me|i)\b").expect("valid regex"));

const CODE_FENCE: &str = "```";

/// A group member as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub user_id: DbId,
    pub full_name: Option<String>,
}

impl MemberRef {
    pub fn new(user_id: DbId, full_name: Option<String>) -> Self {
        Self { user_id, full_name }
    }

    /// First whitespace-separated token of the full name.
    pub fn first_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
    }
}

// ---------------------------------------------------------------------------
// Model output parsing
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MentionParseError {
    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct MentionResponse {
    mentioned_members: Vec<serde_json::Value>,
}

/// Remove surrounding markdown code fences from a model response.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut body = raw.trim();

    if let Some(start) = body.find(CODE_FENCE) {
        body = &body[start + CODE_FENCE.len()..];
        // Drop the language tag, e.g. "json", on its own line or not.
        body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        if let Some(end) = body.find(CODE_FENCE) {
            body = &body[..end];
        }
    }

    body.trim()
}

/// Parse a model's `{"mentioned_members": [...]}` response.
///
/// Entries with an unparseable `user_id`, a missing `name_in_prompt`, or an
/// id that is neither a group member nor the current user are dropped
/// silently.
pub fn parse_mentions(
    raw: &str,
    members: &[MemberRef],
    current_user_id: DbId,
) -> Result<MemberMentions, MentionParseError> {
    let body = strip_code_fences(raw);
    if !body.starts_with('{') {
        return Err(MentionParseError::NoJsonObject);
    }

    let response: MentionResponse = serde_json::from_str(body)?;

    let mut mentions = MemberMentions::new();
    for entry in response.mentioned_members {
        let Some(user_id) = entry
            .get("user_id")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<DbId>().ok())
        else {
            continue;
        };
        let Some(name) = entry.get("name_in_prompt").and_then(|v| v.as_str()) else {
            continue;
        };

        let known = user_id == current_user_id || members.iter().any(|m| m.user_id == user_id);
        if known {
            mentions.insert(user_id, name.to_string());
        }
    }
    Ok(mentions)
}

// ---------------------------------------------------------------------------
// Substring fallback
// ---------------------------------------------------------------------------

/// Best-effort substring matching.
///
/// - The current user is included as `"me"` when the text contains the
///   whole word "me" or "I" (any case).
/// - Every member whose first name or full name appears in the text (any
///   case) is included under their capitalized first name.
pub fn fallback_parse_members(
    text: &str,
    members: &[MemberRef],
    current_user_id: DbId,
) -> MemberMentions {
    let mut found = MemberMentions::new();
    let lower = text.to_lowercase();

    if SELF_REFERENCE_RE.is_match(text) {
        found.insert(current_user_id, SELF_REFERENCE.to_string());
    }

    for member in members {
        let (Some(full_name), Some(first_name)) = (member.full_name.as_deref(), member.first_name())
        else {
            continue;
        };
        let first_lower = first_name.to_lowercase();
        let full_lower = full_name.trim().to_lowercase();

        if lower.contains(&first_lower) || lower.contains(&full_lower) {
            found.insert(member.user_id, capitalize(&first_lower));
        }
    }

    found
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
