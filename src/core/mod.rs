// Public modules
pub mod agent;
pub mod config;
pub mod context;
pub mod defaults;
pub mod error;
pub mod executor;
pub mod filter;
pub mod host;
pub mod node;
pub mod paths;
pub mod payload;
pub mod trigger;

// Internal modules - not part of public API
pub(crate) mod http;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use node::Node;
pub use payload::Payload;
pub use trigger::{trigger, Action, Dispatcher, TriggerResult};
