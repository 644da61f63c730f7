// Chat assistant: closing wizard and ledger-entry extraction
pub mod controllers;
pub mod models;
pub mod services;

pub use models::{AssistantReply, ChatMessage, ConversationState};
pub use services::{AssistantService, ChatCompletionsClient, ExtractionGateway};
