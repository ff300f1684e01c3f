pub mod parameter;
pub mod parameters;
pub mod registry;
pub mod request;
pub mod response;

pub use parameter::{Location, Parameter};
pub use parameters::Parameters;
pub use registry::RequestDefinitions;
pub use request::RequestDefinition;
pub use response::{ResponseDefinition, StatusKey};
