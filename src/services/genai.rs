//! Thin client for the Gemini REST API: one-shot text generation and
//! long-running Veo video generation.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use wasm_bindgen_futures::JsFuture;

use super::config::GenAiConfig;
use super::error::GenAiError;

/// Frame shape of a generated video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AspectRatio {
	/// 16:9
	#[default]
	Landscape,
	/// 9:16
	Portrait,
}

impl AspectRatio {
	/// Value expected by the API.
	pub const fn as_str(self) -> &'static str {
		match self {
			AspectRatio::Landscape => "16:9",
			AspectRatio::Portrait => "9:16",
		}
	}
}

/// Still image the generated video should start from.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceImage {
	/// Image bytes, base64 encoded.
	pub base64: String,
	/// e.g. `image/png`.
	pub mime_type: String,
}

/// Gemini REST client bound to one [`GenAiConfig`].
#[derive(Clone, Debug)]
pub struct GenAiClient {
	http: reqwest::Client,
	config: GenAiConfig,
}

// ─── wire types ──────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
	contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
	parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
	text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
	content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
	#[serde(default)]
	parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
	text: Option<String>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
	instances: [VideoInstance<'a>; 1],
	parameters: VideoParameters<'a>,
}

#[derive(Serialize)]
struct VideoInstance<'a> {
	prompt: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	image: Option<InlineImage<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineImage<'a> {
	bytes_base64_encoded: &'a str,
	mime_type: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoParameters<'a> {
	aspect_ratio: &'a str,
	resolution: &'a str,
	number_of_videos: u8,
}

#[derive(Debug, Deserialize)]
struct Operation {
	name: String,
	#[serde(default)]
	done: bool,
	error: Option<StatusBody>,
	response: Option<OperationResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationResponse {
	generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateVideoResponse {
	#[serde(default)]
	generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
struct GeneratedSample {
	video: Option<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
	uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
	error: StatusBody,
}

#[derive(Debug, Deserialize)]
struct StatusBody {
	#[serde(default)]
	message: String,
}

// ─── client ──────────────────────────────────────────────

impl GenAiClient {
	/// Client using `config`. No request is made until a call.
	pub fn new(config: GenAiConfig) -> Self {
		Self {
			http: reqwest::Client::new(),
			config,
		}
	}

	/// Settings in use.
	pub fn config(&self) -> &GenAiConfig {
		&self.config
	}

	fn api_key(&self) -> Result<&str, GenAiError> {
		self.config
			.api_key
			.as_deref()
			.ok_or(GenAiError::MissingApiKey)
	}

	fn model_url(&self, model: &str, method: &str) -> String {
		format!("{}/v1beta/models/{model}:{method}", self.config.base_url)
	}

	/// Generates text for `prompt` with the configured text model.
	pub async fn generate_text(&self, prompt: &str) -> Result<String, GenAiError> {
		let key = self.api_key()?;
		let body = GenerateContentRequest {
			contents: [RequestContent {
				parts: [RequestPart { text: prompt }],
			}],
		};
		info!("generating text with {}", self.config.text_model);
		let resp = self
			.http
			.post(self.model_url(&self.config.text_model, "generateContent"))
			.header("x-goog-api-key", key)
			.json(&body)
			.send()
			.await?;
		let resp: GenerateContentResponse = check_status(resp).await?.json().await?;
		extract_text(resp)
	}

	/// Starts a video job and polls it until it completes.
	///
	/// Returns a playable URL of the first generated sample, or `None` when
	/// the job completed without producing one.
	pub async fn generate_video(
		&self,
		prompt: &str,
		image: Option<&ReferenceImage>,
		aspect_ratio: AspectRatio,
	) -> Result<Option<String>, GenAiError> {
		let key = self.api_key()?;
		let body = PredictRequest {
			instances: [VideoInstance {
				prompt,
				image: image.map(|img| InlineImage {
					bytes_base64_encoded: &img.base64,
					mime_type: &img.mime_type,
				}),
			}],
			parameters: VideoParameters {
				aspect_ratio: aspect_ratio.as_str(),
				resolution: &self.config.video_resolution,
				number_of_videos: 1,
			},
		};

		info!(
			"starting video generation with {} ({})",
			self.config.video_model,
			aspect_ratio.as_str()
		);
		let resp = self
			.http
			.post(self.model_url(&self.config.video_model, "predictLongRunning"))
			.header("x-goog-api-key", key)
			.json(&body)
			.send()
			.await?;
		let mut operation: Operation = check_status(resp).await?.json().await?;

		while !operation.done {
			debug!("video operation {} still running", operation.name);
			sleep_ms(self.config.poll_interval_ms).await?;
			let resp = self
				.http
				.get(format!("{}/v1beta/{}", self.config.base_url, operation.name))
				.header("x-goog-api-key", key)
				.send()
				.await?;
			operation = check_status(resp).await?.json().await?;
		}

		info!("video operation {} done", operation.name);
		Ok(video_uri(operation)?.map(|uri| with_api_key(&uri, key)))
	}
}

/// Turns a non-success response into [`GenAiError::Api`], keeping the
/// server's own message when the body carries one.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, GenAiError> {
	let status = resp.status();
	if status.is_success() {
		return Ok(resp);
	}
	let body = resp.text().await.unwrap_or_default();
	Err(GenAiError::Api {
		status: status.as_u16(),
		message: error_message(&body),
	})
}

fn error_message(body: &str) -> String {
	match serde_json::from_str::<ErrorEnvelope>(body) {
		Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
		_ => body.trim().to_string(),
	}
}

fn extract_text(resp: GenerateContentResponse) -> Result<String, GenAiError> {
	let text: String = resp
		.candidates
		.into_iter()
		.next()
		.and_then(|c| c.content)
		.map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
		.unwrap_or_default();
	if text.is_empty() {
		return Err(GenAiError::Decode("response carried no text".to_string()));
	}
	Ok(text)
}

fn video_uri(operation: Operation) -> Result<Option<String>, GenAiError> {
	if let Some(err) = operation.error {
		return Err(GenAiError::Operation(err.message));
	}
	Ok(operation
		.response
		.and_then(|r| r.generate_video_response)
		.and_then(|r| r.generated_samples.into_iter().next())
		.and_then(|s| s.video)
		.and_then(|v| v.uri))
}

/// Download links are only playable with the key attached.
fn with_api_key(uri: &str, key: &str) -> String {
	let sep = if uri.contains('?') { '&' } else { '?' };
	format!("{uri}{sep}key={key}")
}

async fn sleep_ms(ms: u32) -> Result<(), GenAiError> {
	let window = web_sys::window().ok_or_else(|| GenAiError::Host("no window".to_string()))?;
	let promise = js_sys::Promise::new(&mut |resolve, _reject| {
		let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
	});
	JsFuture::from(promise)
		.await
		.map(|_| ())
		.map_err(|e| GenAiError::Host(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn text_parts_are_concatenated() {
		let resp: GenerateContentResponse = serde_json::from_value(json!({
			"candidates": [{ "content": { "parts": [{ "text": "Buy " }, { "text": "the RTX one." }] } }]
		}))
		.unwrap();
		assert_eq!(extract_text(resp).unwrap(), "Buy the RTX one.");
	}

	#[test]
	fn empty_candidates_are_a_decode_error() {
		let resp: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
		assert!(matches!(extract_text(resp), Err(GenAiError::Decode(_))));
	}

	#[test]
	fn finished_operation_yields_first_sample() {
		let op: Operation = serde_json::from_value(json!({
			"name": "models/veo/operations/abc",
			"done": true,
			"response": { "generateVideoResponse": { "generatedSamples": [
				{ "video": { "uri": "https://files/v1?alt=media" } },
				{ "video": { "uri": "https://files/v2?alt=media" } }
			] } }
		}))
		.unwrap();
		assert_eq!(video_uri(op).unwrap().as_deref(), Some("https://files/v1?alt=media"));
	}

	#[test]
	fn operation_without_samples_is_no_result() {
		let op: Operation = serde_json::from_value(json!({
			"name": "operations/x",
			"done": true,
			"response": { "generateVideoResponse": {} }
		}))
		.unwrap();
		assert_eq!(video_uri(op).unwrap(), None);
	}

	#[test]
	fn operation_error_is_surfaced() {
		let op: Operation = serde_json::from_value(json!({
			"name": "operations/x",
			"done": true,
			"error": { "code": 5, "message": "Requested entity was not found." }
		}))
		.unwrap();
		let err = video_uri(op).unwrap_err();
		assert!(err.is_entity_not_found());
	}

	#[test]
	fn api_error_body_message_is_extracted() {
		let body = r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#;
		assert_eq!(error_message(body), "Requested entity was not found.");
		assert_eq!(error_message(" bad gateway \n"), "bad gateway");
	}

	#[test]
	fn key_is_appended_to_download_link() {
		assert_eq!(with_api_key("https://f/v?alt=media", "k"), "https://f/v?alt=media&key=k");
		assert_eq!(with_api_key("https://f/v", "k"), "https://f/v?key=k");
	}

	#[test]
	fn video_request_serializes_camel_case() {
		let img = ReferenceImage {
			base64: "AAAA".into(),
			mime_type: "image/png".into(),
		};
		let body = PredictRequest {
			instances: [VideoInstance {
				prompt: "a store",
				image: Some(InlineImage {
					bytes_base64_encoded: &img.base64,
					mime_type: &img.mime_type,
				}),
			}],
			parameters: VideoParameters {
				aspect_ratio: AspectRatio::Landscape.as_str(),
				resolution: "720p",
				number_of_videos: 1,
			},
		};
		assert_eq!(
			serde_json::to_value(&body).unwrap(),
			json!({
				"instances": [{ "prompt": "a store", "image": { "bytesBase64Encoded": "AAAA", "mimeType": "image/png" } }],
				"parameters": { "aspectRatio": "16:9", "resolution": "720p", "numberOfVideos": 1 }
			})
		);
	}

	#[test]
	fn missing_key_is_reported_before_any_request() {
		let client = GenAiClient::new(GenAiConfig::default());
		assert!(matches!(client.api_key(), Err(GenAiError::MissingApiKey)));
		let client = GenAiClient::new(GenAiConfig::default().with_api_key("k"));
		assert_eq!(client.api_key().unwrap(), "k");
	}
}
