use leptos::prelude::*;
use serde_json::Value;

use crate::simulation::{InspectorPayload, Trend, VisualType};

fn pretty(data: &Value) -> String {
	serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}

/// Entries of the `results` array as `(label, score)`, in the order given.
/// Entries without a numeric score are skipped.
fn ranked(data: &Value) -> Vec<(String, f64)> {
	let Some(results) = data.get("results").and_then(Value::as_array) else {
		return Vec::new();
	};
	results
		.iter()
		.filter_map(|entry| {
			let score = entry.get("score")?.as_f64()?;
			let label = entry
				.get("title")
				.or_else(|| entry.get("sku"))
				.and_then(Value::as_str)
				.unwrap_or("?");
			Some((label.to_string(), score))
		})
		.collect()
}

/// Payload of the current simulation step, plus the video generator.
#[component]
pub fn DataInspector(
	#[prop(into)] data: Signal<Option<InspectorPayload>>,
	#[prop(into)] video_url: Signal<Option<String>>,
	#[prop(into)] is_generating_video: Signal<bool>,
	#[prop(into)] on_generate_video: Callback<()>,
) -> impl IntoView {
	let body = move || {
		let Some(payload) = data.get() else {
			return view! {
				<p class="panel__empty">"Start the simulation to inspect the data flowing through each stage."</p>
			}
			.into_any();
		};

		let metric = payload.roi_metric.clone().map(|m| {
			let (arrow, class) = match m.trend {
				Trend::Up => ("▲", "metric metric--up"),
				Trend::Down => ("▼", "metric metric--down"),
			};
			view! {
				<div class=class>
					<span class="metric__label">{m.label}</span>
					<span class="metric__value">{m.value}" "{arrow}</span>
				</div>
			}
		});

		let ranking = match payload.visual_type {
			VisualType::Ranking => ranked(&payload.data),
			VisualType::Json => Vec::new(),
		};
		let data_view = if ranking.is_empty() {
			view! { <pre class="inspector__json">{pretty(&payload.data)}</pre> }.into_any()
		} else {
			view! {
				<ol class="inspector__ranking">
					{ranking
						.into_iter()
						.map(|(label, score)| view! {
							<li><span class="key">{label}</span>" "<span class="value">{format!("{score:.2}")}</span></li>
						})
						.collect_view()}
				</ol>
			}
			.into_any()
		};

		view! {
			<div class="inspector__header">
				<h3>{payload.title.clone()}</h3>
				{metric}
			</div>
			<p class="inspector__description">{payload.description.clone()}</p>
			{payload.impact.clone().map(|impact| view! { <p class="inspector__impact">"Impact: "{impact}</p> })}
			{data_view}
		}
		.into_any()
	};

	view! {
		<section class="panel inspector">
			<header class="panel__title">
				<span>"Data Inspector"</span>
				<button
					class="button button--small"
					disabled=move || is_generating_video.get()
					on:click=move |_| on_generate_video.run(())
				>
					{move || if is_generating_video.get() { "Generating..." } else { "Generate UX video" }}
				</button>
			</header>
			<div class="panel__body">
				{body}
				{move || video_url.get().map(|url| view! {
					<video class="inspector__video" src=url controls=true autoplay=true />
				})}
			</div>
		</section>
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn ranked_reads_results_in_order() {
		let r = ranked(&json!({
			"model": "ms-marco",
			"results": [
				{ "sku": "A", "title": "Laptop A", "score": 0.9 },
				{ "sku": "B", "score": 0.5 },
				{ "sku": "C" }
			]
		}));
		assert_eq!(r, vec![("Laptop A".to_string(), 0.9), ("B".to_string(), 0.5)]);
	}

	#[test]
	fn ranked_is_empty_without_results() {
		assert!(ranked(&json!({ "input_count": 50 })).is_empty());
		assert!(ranked(&json!("raw")).is_empty());
	}

	#[test]
	fn pretty_prints_nested_json() {
		assert_eq!(pretty(&json!({ "a": [1] })), "{\n  \"a\": [\n    1\n  ]\n}");
	}
}
