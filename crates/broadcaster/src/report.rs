//! Outcome reporting for broadcasts.

use database::{AgentSkeleton, PreferenceField};
use serde::Serialize;

use crate::fanout::RemoteFailure;

/// Secondary text shown when provider updates did not all go through.
pub const PARTIAL_SYNC_WARNING: &str = "Some updates may not have propagated.";

/// Severity of an operator-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A transient notification for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Qualifies a success; never carries resource IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            warning: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            warning: None,
        }
    }

    /// Success notice, qualified when the fan-out was incomplete.
    fn saved(message: &str, remote: &FanOutSummary) -> Self {
        let mut notice = Self::success(message);
        if remote.has_failures() {
            notice.warning = Some(PARTIAL_SYNC_WARNING.to_string());
        }
        notice
    }
}

/// Totals from one provider fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOutSummary {
    pub calls: usize,
    pub failures: Vec<RemoteFailure>,
}

impl FanOutSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.calls - self.failures.len()
    }
}

/// Result of a completed preference broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    pub field: PreferenceField,
    pub mirrors_updated: u64,
    pub remote: FanOutSummary,
}

impl BroadcastReport {
    /// The operator-facing notice for this save.
    pub fn notice(&self) -> Notice {
        let message = match self.field {
            PreferenceField::Ai => "AI preferences saved.",
            PreferenceField::Story => "Story preferences saved.",
        };
        Notice::saved(message, &self.remote)
    }
}

/// Result of a completed prompt save.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptReport {
    pub skeleton: AgentSkeleton,
    pub remote: FanOutSummary,
}

impl PromptReport {
    pub fn notice(&self) -> Notice {
        Notice::saved("Prompt saved.", &self.remote)
    }
}
