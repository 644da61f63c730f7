pub mod auth;
pub mod request_id;

pub use auth::{hash_api_key, verify_api_key, ApiKeyAuth};
pub use request_id::{RequestId, RequestIdValue, REQUEST_ID_HEADER};
