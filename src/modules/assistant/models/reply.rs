use serde::{Deserialize, Serialize};

use crate::modules::closings::models::{ClosingContext, ClosingResult};
use crate::modules::ledger::models::{LedgerEntry, NewLedgerEntry};

/// What the assistant answers to a message or a confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantReply {
    /// Plain text: prompts, re-prompts, conversational replies, errors
    Text { text: String },
    /// Extracted ledger entry awaiting confirmation
    EntryCandidate {
        id: String,
        text: String,
        entry: NewLedgerEntry,
    },
    /// Computed closing awaiting confirmation
    ClosingSummary {
        context: ClosingContext,
        result: ClosingResult,
        text: String,
    },
    /// A closing or entry was written
    Recorded {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        entry: Option<LedgerEntry>,
    },
}

impl AssistantReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// The text shown to the user, also kept in the transcript
    pub fn message(&self) -> &str {
        match self {
            Self::Text { text }
            | Self::EntryCandidate { text, .. }
            | Self::ClosingSummary { text, .. }
            | Self::Recorded { text, .. } => text,
        }
    }
}
