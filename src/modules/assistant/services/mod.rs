pub mod answer_parser;
pub mod assistant_service;
pub mod extraction;
pub mod session_store;
pub mod step_sequencer;

pub use answer_parser::{parse_closing_trigger, parse_number, parse_yes_no, TriggerMatch};
pub use assistant_service::AssistantService;
pub use extraction::{parse_extracted_entry, ChatCompletionsClient, ExtractionGateway};
pub use session_store::{SessionCheckout, SessionSnapshot, SessionStore};
pub use step_sequencer::{Advance, StepSequencer};
