use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info, warn};
use web_sys::MouseEvent;

use super::layout::{PanelSizes, Splitter};
use crate::components::console_log::ConsoleLog;
use crate::components::data_inspector::DataInspector;
use crate::components::detail_panel::DetailPanel;
use crate::components::pipeline_canvas::PipelineCanvas;
use crate::services::{AspectRatio, GenAiClient, GenAiConfig, HostKeySelector};
use crate::simulation::{
	DEFAULT_REGION, REGIONS, SimulationController, VideoOutcome, VideoTicket,
	search_session_steps, validate_steps,
};
use crate::topology::validate_edges;

const STOREFRONT_VIDEO_PROMPT: &str = "A high-end e-commerce website interface on a monitor. \
	Modern, clean UI. A user is typing into a large search bar. Below, product cards for \
	'Gaming Laptops' appear instantly with glowing AI summaries. Data streams flowing into \
	the search bar. Tech style, blue and yellow accents.";

fn now() -> f64 {
	js_sys::Date::now()
}

fn window_size() -> Option<(f64, f64)> {
	let win = web_sys::window()?;
	Some((
		win.inner_width().ok()?.as_f64()?,
		win.inner_height().ok()?.as_f64()?,
	))
}

/// Generates the storefront clip for a request already marked in flight
/// with `ticket`, and reports back into the simulation log.
async fn generate_storefront_video(sim: RwSignal<SimulationController>, ticket: VideoTicket) {
	let host = HostKeySelector::detect();
	if let Some(host) = &host {
		if let Err(err) = host.ensure_key().await {
			warn!("key selection failed: {err}");
		}
	}

	// read after key selection so a freshly picked key is used
	let client = GenAiClient::new(GenAiConfig::from_host_env());
	let result = client
		.generate_video(STOREFRONT_VIDEO_PROMPT, None, AspectRatio::Landscape)
		.await;

	let outcome = sim.try_update(|s| s.finish_video(ticket, result, now()));
	info!("video generation finished: {outcome:?}");
	if let (Some(VideoOutcome::Failed { reselect_key: true }), Some(host)) = (outcome, host) {
		if let Err(err) = host.open_select_key().await {
			warn!("key selection failed: {err}");
		}
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	if let Err(err) =
		validate_edges().and_then(|()| validate_steps(&search_session_steps(DEFAULT_REGION)))
	{
		error!("pipeline content is inconsistent: {err}");
	}

	let sim = RwSignal::new(SimulationController::default());

	let active_node = Signal::derive(move || sim.with(|s| s.active_node()));
	let animating_edge = Signal::derive(move || sim.with(|s| s.active_edge()));
	let inspector = Signal::derive(move || sim.with(|s| s.inspector().cloned()));
	let log_entries = Signal::derive(move || sim.with(|s| s.log().cloned().collect::<Vec<_>>()));
	let video_url = Signal::derive(move || sim.with(|s| s.video_url().map(str::to_string)));
	let generating = Signal::derive(move || sim.with(|s| s.is_generating_video()));
	let running = Signal::derive(move || sim.with(|s| s.is_running()));
	let progress = Signal::derive(move || sim.with(|s| s.progress()));

	let on_node_click = Callback::new(move |id| sim.update(|s| s.select_node(id)));
	let on_close_detail = Callback::new(move |()| sim.update(|s| s.clear_selection()));
	let on_generate_video = Callback::new(move |()| {
		// marked busy before any await so a second click is refused
		if let Some(ticket) = sim.try_update(|s| s.begin_video(now())).flatten() {
			spawn_local(generate_storefront_video(sim, ticket));
		}
	});

	let sizes = RwSignal::new(PanelSizes::default());
	let dragging = RwSignal::new(None::<Splitter>);
	let on_drag = move |ev: MouseEvent| {
		let Some(splitter) = dragging.get_untracked() else {
			return;
		};
		if let Some(win) = window_size() {
			let pointer = (ev.client_x() as f64, ev.client_y() as f64);
			sizes.update(|z| z.drag(splitter, win, pointer));
		}
	};
	let start_drag = move |splitter: Splitter| {
		move |ev: MouseEvent| {
			ev.prevent_default();
			dragging.set(Some(splitter));
		}
	};
	let root_class = move || match dragging.get() {
		Some(Splitter::Sidebar) => "app app--resizing app--resizing-col",
		Some(Splitter::BottomPanels) => "app app--resizing app--resizing-row",
		None => "app",
	};

	view! {
		<div
			class=root_class
			on:mousemove=on_drag
			on:mouseup=move |_| dragging.set(None)
			on:mouseleave=move |_| dragging.set(None)
		>
			<header class="app__header">
				<div class="app__brand">
					<h1>"Elasticsearch " <span class="accent">"Search & RAG"</span> " Engine"</h1>
					<p class="subtitle">"Vector Search • ELSER • Hybrid Retrieval"</p>
				</div>
				<div class="app__controls">
					<label class="region">
						<span>"Cluster region:"</span>
						<select
							prop:value=move || sim.with(|s| s.region().to_string())
							disabled=move || running.get()
							on:change=move |ev| {
								let region = event_target_value(&ev);
								sim.update(|s| s.set_region(region));
							}
						>
							{REGIONS
								.iter()
								.map(|r| view! { <option value=*r>{*r}</option> })
								.collect_view()}
						</select>
					</label>
					<button
						class="button button--primary"
						disabled=move || running.get()
						on:click=move |_| sim.update(|s| s.start(now()))
					>
						"▶ Simulate search"
					</button>
					<button
						class="button"
						disabled=move || !running.get()
						on:click=move |_| sim.update(|s| s.advance(now()))
					>
						"Next step ›"
					</button>
					<button class="button button--ghost" title="Reset" on:click=move |_| sim.update(|s| s.reset())>
						"↺"
					</button>
				</div>
			</header>

			<main class="app__main">
				<div class="app__stage">
					<div class="app__map-title">
						<h2>"Topology Map"</h2>
						{move || progress.get().map(|(step, total)| view! {
							<span class="badge">"STEP "{step}" / "{total}</span>
						})}
					</div>
					<div class="app__map">
						<PipelineCanvas
							active_node=active_node
							animating_edge=animating_edge
							on_node_click=on_node_click
						/>
					</div>
					<div class="splitter splitter--row" on:mousedown=start_drag(Splitter::BottomPanels)>
						<span class="splitter__grip" />
					</div>
					<div
						class="app__panels"
						style:height=move || format!("{}px", sizes.get().bottom_height)
					>
						<DataInspector
							data=inspector
							video_url=video_url
							is_generating_video=generating
							on_generate_video=on_generate_video
						/>
						<ConsoleLog entries=log_entries />
					</div>
				</div>
				<div class="splitter splitter--col" on:mousedown=start_drag(Splitter::Sidebar)>
					<span class="splitter__grip" />
				</div>
				<aside
					class="app__sidebar"
					style:width=move || format!("{}px", sizes.get().sidebar_width)
				>
					<DetailPanel node_id=active_node on_close=on_close_detail />
				</aside>
			</main>
		</div>
	}
}
