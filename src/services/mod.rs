//! Calls to the external generative AI backend. These sit outside the
//! simulation: nothing in the scripted session depends on them.

mod config;
mod error;
mod genai;
mod host;

pub use config::{DEFAULT_BASE_URL, GenAiConfig};
pub use error::GenAiError;
pub use genai::{AspectRatio, GenAiClient, ReferenceImage};
pub use host::HostKeySelector;
