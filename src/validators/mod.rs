pub mod message;
pub mod parameter;
pub mod request;

pub use message::MessageValidator;
pub use parameter::{validate_headers, validate_path, validate_query};
pub use request::{validate_body, validate_content_type, validate_form_body};
