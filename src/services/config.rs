use serde::{Deserialize, Serialize};

use super::host::runtime_api_key;

/// Public Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Settings for the generative AI backend.
///
/// The app runs in the browser. Overrides are captured when the crate is
/// built, except for the API key, which the embedding page may inject (and
/// replace) at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenAiConfig {
	/// Root of the REST API, without the version segment.
	pub base_url: String,
	/// Model used by `generate_text`.
	pub text_model: String,
	/// Model used by `generate_video`.
	pub video_model: String,
	/// Key sent as `x-goog-api-key` and appended to download links.
	pub api_key: Option<String>,
	/// Delay between two polls of a running video operation.
	pub poll_interval_ms: u32,
	/// Requested output resolution, e.g. "720p".
	pub video_resolution: String,
}

impl Default for GenAiConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			text_model: "gemini-2.5-flash".to_string(),
			video_model: "veo-3.1-fast-generate-preview".to_string(),
			api_key: None,
			poll_interval_ms: 10_000,
			video_resolution: "720p".to_string(),
		}
	}
}

impl GenAiConfig {
	/// Defaults overlaid with `GEMINI_API_KEY` (or `API_KEY`) and
	/// `GEMINI_BASE_URL` as they were set at build time.
	pub fn from_build_env() -> Self {
		let key = option_env!("GEMINI_API_KEY").or(option_env!("API_KEY"));
		Self::default().overlay(key, option_env!("GEMINI_BASE_URL"))
	}

	/// Build-time settings with the key the page currently exposes taking
	/// precedence. Read on every request so a newly picked key is used.
	pub fn from_host_env() -> Self {
		Self::from_build_env().with_runtime_key(runtime_api_key().as_deref())
	}

	/// Replaces the key with `key` unless it is missing or blank.
	pub fn with_runtime_key(self, key: Option<&str>) -> Self {
		self.overlay(key, None)
	}

	fn overlay(mut self, api_key: Option<&str>, base_url: Option<&str>) -> Self {
		if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
			self.api_key = Some(key.trim().to_string());
		}
		if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
			self.base_url = url.trim().trim_end_matches('/').to_string();
		}
		self
	}

	/// Sets the key unconditionally.
	pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self
	}
}
