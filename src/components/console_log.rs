use leptos::prelude::*;
use wasm_bindgen::JsValue;

use crate::simulation::LogEntry;

fn time_of_day(at_ms: f64) -> String {
	js_sys::Date::new(&JsValue::from_f64(at_ms))
		.to_locale_time_string("en-US")
		.into()
}

/// Rolling "System Logs" terminal. The newest line is highlighted.
#[component]
pub fn ConsoleLog(#[prop(into)] entries: Signal<Vec<LogEntry>>) -> impl IntoView {
	view! {
		<section class="panel console">
			<header class="panel__title">
				<span>"System Logs"</span>
				<span class="console__lights"><i /><i /><i /></span>
			</header>
			<div class="panel__body console__body">
				{move || {
					let entries = entries.get();
					if entries.is_empty() {
						return view! {
							<span class="console__idle">"Cluster ready. Waiting for signals."</span>
						}
						.into_any();
					}
					entries
						.into_iter()
						.enumerate()
						.map(|(i, e)| {
							let class = if i == 0 { "console__line console__line--latest" } else { "console__line" };
							view! {
								<div class=class>
									<span class="console__prompt">">"</span>
									"["{time_of_day(e.at_ms)}"] "{e.message}
								</div>
							}
						})
						.collect_view()
						.into_any()
				}}
			</div>
		</section>
	}
}
