use js_sys::{Function, Promise, Reflect};
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::error::GenAiError;

/// The optional key picker some embedding hosts expose as `window.aistudio`.
#[derive(Clone, Debug)]
pub struct HostKeySelector {
	host: JsValue,
}

impl HostKeySelector {
	/// Returns `None` when the page is not running inside such a host.
	pub fn detect() -> Option<Self> {
		let window = web_sys::window()?;
		let host = Reflect::get(&window, &JsValue::from_str("aistudio")).ok()?;
		if !host.is_object() {
			return None;
		}
		debug!("host key selector available");
		Some(Self { host })
	}

	/// Whether the user already picked a key in the host.
	pub async fn has_selected_api_key(&self) -> Result<bool, GenAiError> {
		Ok(self.call("hasSelectedApiKey").await?.is_truthy())
	}

	/// Opens the host's key picker and waits for it to close.
	pub async fn open_select_key(&self) -> Result<(), GenAiError> {
		self.call("openSelectKey").await.map(|_| ())
	}

	/// Asks the user to pick a key unless one is already selected.
	pub async fn ensure_key(&self) -> Result<(), GenAiError> {
		if !self.has_selected_api_key().await? {
			self.open_select_key().await?;
		}
		Ok(())
	}

	async fn call(&self, method: &str) -> Result<JsValue, GenAiError> {
		let func: Function = Reflect::get(&self.host, &JsValue::from_str(method))
			.map_err(|e| host_error(method, e))?
			.dyn_into()
			.map_err(|e| host_error(method, e))?;
		let ret = func.call0(&self.host).map_err(|e| host_error(method, e))?;
		JsFuture::from(Promise::resolve(&ret))
			.await
			.map_err(|e| host_error(method, e))
	}
}

/// Key the page injected as `window.process.env.API_KEY` (or
/// `GEMINI_API_KEY`). The host rewrites it when the user picks another key.
pub fn runtime_api_key() -> Option<String> {
	let window = web_sys::window()?;
	let env = ["process", "env"]
		.into_iter()
		.try_fold(JsValue::from(window), |obj, name| {
			Reflect::get(&obj, &JsValue::from_str(name))
				.ok()
				.filter(JsValue::is_object)
		})?;
	["API_KEY", "GEMINI_API_KEY"].into_iter().find_map(|name| {
		Reflect::get(&env, &JsValue::from_str(name))
			.ok()?
			.as_string()
			.filter(|k| !k.trim().is_empty())
	})
}

fn host_error(method: &str, err: JsValue) -> GenAiError {
	GenAiError::Host(format!("{method}: {err:?}"))
}
