//! Vision lifecycle status and the transitions the controller performs.
//!
//! ```text
//! pending   -> generating
//! generating -> completed | failed
//! failed    -> generating   (retry)
//! completed -> generating   (regenerate, appends another image)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a vision row, stored as a lowercase string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisionStatus {
    #[default]
    Pending,
    Generating,
    Completed,
    Failed,
}

impl VisionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VisionStatus::Pending => "pending",
            VisionStatus::Generating => "generating",
            VisionStatus::Completed => "completed",
            VisionStatus::Failed => "failed",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            VisionStatus::Pending => "Pending",
            VisionStatus::Generating => "Generating...",
            VisionStatus::Completed => "Completed",
            VisionStatus::Failed => "Failed",
        }
    }

    /// Whether the controller ever moves a vision from `self` to `next`.
    pub fn can_transition_to(self, next: VisionStatus) -> bool {
        use VisionStatus::*;
        matches!(
            (self, next),
            (Pending, Generating)
                | (Failed, Generating)
                | (Completed, Generating)
                | (Generating, Completed)
                | (Generating, Failed)
        )
    }

    /// Terminal for a single run (the vision may still be regenerated).
    pub fn is_settled(self) -> bool {
        matches!(self, VisionStatus::Completed | VisionStatus::Failed)
    }
}

impl fmt::Display for VisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(VisionStatus::Pending),
            "generating" => Ok(VisionStatus::Generating),
            "completed" => Ok(VisionStatus::Completed),
            "failed" => Ok(VisionStatus::Failed),
            other => Err(CoreError::Validation(format!(
                "Invalid vision status '{other}'"
            ))),
        }
    }
}
