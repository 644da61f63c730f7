use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::closings::models::{
    AdHocExpenseEntry, ClosingCatalog, ClosingContext, ClosingResult,
};

/// Author of a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of the session transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Answers collected once the participation and revenue are known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    pub participation_pct: Decimal,
    pub gross_revenue: Decimal,
    /// One per variable catalog entry, in catalog order
    pub quantities: Vec<u32>,
    pub ad_hoc: Vec<AdHocExpenseEntry>,
}

/// Cursor of the closing conversation
///
/// Each stage carries only the answers that are valid at that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ClosingStage {
    AwaitingParticipationPct,
    AwaitingGrossRevenue {
        participation_pct: Decimal,
    },
    AwaitingVariableQuantity {
        participation_pct: Decimal,
        gross_revenue: Decimal,
        quantities: Vec<u32>,
    },
    AwaitingAdHocYesNo {
        answers: Answers,
    },
    AwaitingAdHocDescription {
        answers: Answers,
    },
    AwaitingAdHocAmount {
        answers: Answers,
        description: String,
    },
    Summary {
        result: ClosingResult,
    },
}

impl ClosingStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingParticipationPct => "awaiting_participation_pct",
            Self::AwaitingGrossRevenue { .. } => "awaiting_gross_revenue",
            Self::AwaitingVariableQuantity { .. } => "awaiting_variable_quantity",
            Self::AwaitingAdHocYesNo { .. } => "awaiting_adhoc_yesno",
            Self::AwaitingAdHocDescription { .. } => "awaiting_adhoc_description",
            Self::AwaitingAdHocAmount { .. } => "awaiting_adhoc_amount",
            Self::Summary { .. } => "closing_summary",
        }
    }
}

/// A closing in progress: the trigger's context, the catalog snapshot taken
/// when it started, and the current stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingFlow {
    pub context: ClosingContext,
    pub catalog: ClosingCatalog,
    pub stage: ClosingStage,
}

impl ClosingFlow {
    pub fn is_at_summary(&self) -> bool {
        matches!(self.stage, ClosingStage::Summary { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Idle,
    Closing(ClosingFlow),
}

impl ConversationState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Closing(flow) => flow.stage.name(),
        }
    }

    /// True while the sequencer should consume the user's answers
    pub fn is_collecting_answers(&self) -> bool {
        matches!(self, Self::Closing(flow) if !flow.is_at_summary())
    }
}
