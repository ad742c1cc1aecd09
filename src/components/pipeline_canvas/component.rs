use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{BUTTON_ZOOM_STEP, PipelineCanvasState};
use crate::topology::{Category, EdgeRef, NodeId};

const FRAME_DT: f64 = 0.016;

/// Size of the canvas: the window when fullscreen, else the explicit size
/// or the parent element's.
fn canvas_size(
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		if let Some(win) = web_sys::window() {
			let dim = |v: Result<JsValue, JsValue>, fallback| {
				v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
			};
			return (dim(win.inner_width(), 800.0), dim(win.inner_height(), 600.0));
		}
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
		height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
	)
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Pannable, zoomable drawing of the pipeline topology.
#[component]
pub fn PipelineCanvas(
	#[prop(into)] active_node: Signal<Option<NodeId>>,
	#[prop(into)] animating_edge: Signal<Option<EdgeRef>>,
	#[prop(into)] on_node_click: Callback<NodeId>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<PipelineCanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	let zoom_pct = RwSignal::new(100u32);
	let show_payloads = RwSignal::new(true);
	let cursor = RwSignal::new("grab");

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return warn!("2d context has an unexpected type"),
			},
			_ => return warn!("canvas 2d context unavailable"),
		};
		debug!("pipeline canvas initialised at {w}x{h}");
		*state_init.borrow_mut() = Some(PipelineCanvasState::new(w, h));

		// removed again when this effect's owner is cleaned up
		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		window_event_listener(ev::resize, move |_| {
			let (nw, nh) = canvas_size(&canvas_resize, fullscreen, width, height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		});

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// signals are gone once the component is unmounted; stop the loop
			let (Some(node), Some(edge)) = (
				active_node.try_get_untracked(),
				animating_edge.try_get_untracked(),
			) else {
				return;
			};
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.set_active(node, edge);
				s.tick(FRAME_DT);
				render::render(s, &ctx);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
			cursor.set(if s.drag.active { "grabbing" } else { "move" });
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
			if !s.drag.active && !s.pan.active {
				cursor.set(if s.hovered.is_some() { "pointer" } else { "grab" });
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let clicked = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_up(x, y));
		cursor.set("grab");
		// the callback may touch other signals; run it with the state released
		if let Some(id) = clicked {
			debug!("node clicked: {id}");
			on_node_click.run(id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
		cursor.set("grab");
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
			zoom_pct.set(s.transform.zoom_percent());
		}
	};

	let state_zoom = state.clone();
	let zoom = move |delta: Option<f64>| {
		if let Some(ref mut s) = *state_zoom.borrow_mut() {
			match delta {
				Some(d) => s.zoom_by(d),
				None => s.reset_view(),
			}
			zoom_pct.set(s.transform.zoom_percent());
		}
	};
	let (zoom_in, zoom_reset, zoom_out) = (zoom.clone(), zoom.clone(), zoom);

	let state_payloads = state.clone();
	let toggle_payloads = move |_: MouseEvent| {
		let next = !show_payloads.get_untracked();
		show_payloads.set(next);
		if let Some(ref mut s) = *state_payloads.borrow_mut() {
			s.show_payloads = next;
		}
	};

	view! {
		<div class="pipeline-canvas">
			<canvas
				node_ref=canvas_ref
				class="pipeline-canvas__surface"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style:cursor=move || cursor.get()
			/>
			<div class="pipeline-canvas__zoom">
				<button title="Zoom in" on:click=move |_| zoom_in(Some(BUTTON_ZOOM_STEP))>"+"</button>
				<button title="Reset view" class="pipeline-canvas__zoom-level" on:click=move |_| zoom_reset(None)>
					{move || format!("{}%", zoom_pct.get())}
				</button>
				<button title="Zoom out" on:click=move |_| zoom_out(Some(-BUTTON_ZOOM_STEP))>"−"</button>
			</div>
			<button
				class="pipeline-canvas__payloads"
				title="Toggle payload captions"
				on:click=toggle_payloads
			>
				{move || if show_payloads.get() { "Hide payloads" } else { "Show payloads" }}
			</button>
			<div class="pipeline-canvas__legend">
				{[Category::Frontend, Category::SearchCore, Category::DataOps]
					.into_iter()
					.map(|c| {
						let class = format!("legend-item legend-item--{c:?}").to_lowercase();
						view! { <span class=class>{c.label()}</span> }
					})
					.collect_view()}
			</div>
		</div>
	}
}
