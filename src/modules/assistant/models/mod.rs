pub mod conversation;
pub mod extracted_entry;
pub mod reply;

pub use conversation::{
    Answers, ChatMessage, ClosingFlow, ClosingStage, ConversationState, Role,
};
pub use extracted_entry::{ExtractedEntry, PendingEntry};
pub use reply::AssistantReply;
