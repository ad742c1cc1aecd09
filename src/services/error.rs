use thiserror::Error;

/// Substring the API uses when the key cannot see the requested model.
const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

/// Failures of the generative AI calls.
#[derive(Debug, Error)]
pub enum GenAiError {
	/// Transport failure.
	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),
	/// The API answered with a non-success status.
	#[error("API returned {status}: {message}")]
	Api {
		/// HTTP status code.
		status: u16,
		/// Server message, or the raw body.
		message: String,
	},
	/// The long-running job reported an error.
	#[error("video operation failed: {0}")]
	Operation(String),
	/// The response body did not have the expected shape.
	#[error("unexpected response: {0}")]
	Decode(String),
	/// Neither the host nor the build provided a key.
	#[error("no API key configured")]
	MissingApiKey,
	/// A call into the embedding page failed.
	#[error("host capability failed: {0}")]
	Host(String),
}

impl GenAiError {
	/// The failure that calls for picking another API key.
	pub fn is_entity_not_found(&self) -> bool {
		match self {
			GenAiError::Api { message, .. } | GenAiError::Operation(message) => {
				message.contains(ENTITY_NOT_FOUND)
			}
			_ => false,
		}
	}
}
