use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasNode, PipelineCanvasState};
use crate::topology::{Category, EDGES, EdgeDef, NodeId};

const BACKGROUND: &str = "#0d0d0f";
const ACCENT: &str = "#0077CC";
const GRID_SPACING: f64 = 24.0;
const CORNER_RADIUS: f64 = 12.0;

struct Palette {
	fill: &'static str,
	fill_expanded: &'static str,
	border: &'static str,
	active_border: &'static str,
	label: &'static str,
	glow: &'static str,
}

fn palette(category: Category) -> Palette {
	match category {
		Category::Frontend => Palette {
			fill: "#1e293b",
			fill_expanded: "#1e293b",
			border: "#475569",
			active_border: "#ffffff",
			label: "#e2e8f0",
			glow: "rgba(255, 255, 255, 0.25)",
		},
		Category::SearchCore => Palette {
			fill: "rgba(0, 119, 204, 0.2)",
			fill_expanded: "rgba(0, 61, 107, 0.95)",
			border: "rgba(0, 119, 204, 0.5)",
			active_border: ACCENT,
			label: "#dbeafe",
			glow: "rgba(0, 119, 204, 0.6)",
		},
		Category::DataOps => Palette {
			fill: "rgba(254, 197, 20, 0.1)",
			fill_expanded: "rgba(66, 53, 12, 0.95)",
			border: "rgba(254, 197, 20, 0.4)",
			active_border: "#FEC514",
			label: "#fef9c3",
			glow: "rgba(254, 197, 20, 0.35)",
		},
		Category::Business => Palette {
			fill: "rgba(51, 65, 85, 0.5)",
			fill_expanded: "rgba(51, 65, 85, 0.95)",
			border: "rgba(100, 116, 139, 0.5)",
			active_border: "#94a3b8",
			label: "#cbd5e1",
			glow: "rgba(100, 116, 139, 0.5)",
		},
	}
}

pub fn render(state: &PipelineCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

/// Dot grid in screen space, following pan and zoom.
fn draw_grid(state: &PipelineCanvasState, ctx: &CanvasRenderingContext2d) {
	let step = GRID_SPACING * state.transform.k;
	let (ox, oy) = (
		state.transform.x.rem_euclid(step),
		state.transform.y.rem_euclid(step),
	);
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.1)");
	let mut y = oy;
	while y < state.height {
		let mut x = ox;
		while x < state.width {
			ctx.fill_rect(x, y, 1.0, 1.0);
			x += step;
		}
		y += step;
	}
}

fn is_business_edge(edge: &EdgeDef) -> bool {
	let business = |id: NodeId| {
		crate::topology::node_def(id).is_some_and(|n| n.category == Category::Business)
	};
	business(edge.from) || business(edge.to)
}

/// Where the segment from the centre of a `w × h` box towards `(dx, dy)`
/// leaves the box, as a fraction of `(dx, dy)`.
fn box_exit(dx: f64, dy: f64, w: f64, h: f64) -> f64 {
	let tx = if dx.abs() > f64::EPSILON { (w / 2.0) / dx.abs() } else { f64::INFINITY };
	let ty = if dy.abs() > f64::EPSILON { (h / 2.0) / dy.abs() } else { f64::INFINITY };
	tx.min(ty).min(1.0)
}

fn draw_edges(state: &PipelineCanvasState, ctx: &CanvasRenderingContext2d) {
	let mut captions = Vec::new();

	for edge in EDGES {
		let (Some((x1, y1)), Some((x2, y2))) =
			(state.node_center(edge.from), state.node_center(edge.to))
		else {
			continue;
		};
		let animating = state.is_animating(edge.edge_ref());
		let business = is_business_edge(edge);

		let (color, width, alpha) = if animating {
			(ACCENT, 3.0, 1.0)
		} else if business {
			("#475569", 2.0, 0.4)
		} else {
			("#334155", 1.5, 0.3)
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		if business && !animating {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(8.0),
				&JsValue::from_f64(8.0),
			));
		}
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		// arrow head where the edge enters the target box
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist > 0.001 {
			let (w, h) = state.node_size(edge.to);
			let t = 1.0 - box_exit(dx, dy, w, h);
			let (tip_x, tip_y) = (x1 + dx * t, y1 + dy * t);
			let (ux, uy) = (dx / dist, dy / dist);
			let size = if animating { 10.0 } else { 7.0 };
			let (back_x, back_y) = (tip_x - ux * size, tip_y - uy * size);
			let (px, py) = (-uy * size * 0.35, ux * size * 0.35);
			ctx.set_fill_style_str(color);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
		ctx.set_global_alpha(1.0);

		if animating {
			if let Some(p) = state.travel_progress() {
				draw_marker(ctx, x1 + dx * p, y1 + dy * p);
			}
		}
		if state.show_payloads {
			if let Some(info) = edge.payload_info {
				captions.push(((x1 + x2) / 2.0, (y1 + y2) / 2.0, info, animating));
			}
		}
	}

	// captions go over every line
	for (x, y, info, animating) in captions {
		draw_caption(ctx, x, y, info, animating);
	}
}

fn draw_marker(ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
	ctx.save();
	ctx.set_shadow_blur(10.0);
	ctx.set_shadow_color(ACCENT);
	ctx.set_fill_style_str("#ffffff");
	ctx.begin_path();
	let _ = ctx.arc(x, y, 4.0, 0.0, 2.0 * PI);
	ctx.fill();
	ctx.restore();
}

fn draw_caption(ctx: &CanvasRenderingContext2d, x: f64, y: f64, text: &str, active: bool) {
	let (w, h) = if active { (110.0, 20.0) } else { (100.0, 18.0) };
	let (fill, stroke, ink) = if active {
		("rgba(0, 119, 204, 0.8)", "#60a5fa", "#ffffff")
	} else {
		("rgba(17, 24, 39, 0.8)", "#374151", "#64748b")
	};
	rounded_rect(ctx, x - w / 2.0, y - h / 2.0, w, h, 4.0);
	ctx.set_fill_style_str(fill);
	ctx.fill();
	ctx.set_stroke_style_str(stroke);
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_font("500 9px monospace");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(ink);
	let _ = ctx.fill_text_with_max_width(text, x, y, w - 6.0);
	reset_text(ctx);
}

fn draw_nodes(state: &PipelineCanvasState, ctx: &CanvasRenderingContext2d) {
	for node in &state.nodes {
		if !state.is_expanded(node.def.id) {
			draw_collapsed(state, ctx, node);
		}
	}
	if let Some(node) = state.expanded.and_then(|id| state.node(id)) {
		draw_expanded(state, ctx, node);
	}
}

fn node_style(state: &PipelineCanvasState, node: &CanvasNode) -> (Palette, bool, bool) {
	let mut style = palette(node.def.category);
	let active = state.active_node == Some(node.def.id);
	let genai = active && node.def.id == NodeId::GenaiGateway;
	if genai {
		style.active_border = "#c084fc";
		style.glow = "rgba(192, 132, 252, 0.6)";
	}
	(style, active, genai)
}

fn draw_collapsed(state: &PipelineCanvasState, ctx: &CanvasRenderingContext2d, node: &CanvasNode) {
	let (style, active, genai) = node_style(state, node);
	let id = node.def.id;
	let (w, h) = state.node_size(id);
	let (cx, cy) = (node.x + w / 2.0, node.y + h / 2.0);

	ctx.save();
	// active nodes are drawn 10% larger around their centre
	if active {
		let _ = ctx.translate(cx, cy);
		let _ = ctx.scale(1.1, 1.1);
		let _ = ctx.translate(-cx, -cy);
		ctx.set_shadow_blur(if genai { 30.0 } else { 18.0 });
		ctx.set_shadow_color(style.glow);
	}
	rounded_rect(ctx, node.x, node.y, w, h, CORNER_RADIUS);
	ctx.set_fill_style_str(style.fill);
	ctx.fill();
	ctx.set_shadow_blur(0.0);
	ctx.set_line_width(2.0);
	ctx.set_stroke_style_str(if active {
		style.active_border
	} else if state.hovered == Some(id) {
		style.label
	} else {
		style.border
	});
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font("28px sans-serif");
	ctx.set_fill_style_str("#ffffff");
	let _ = ctx.fill_text(node.def.icon, cx, node.y + 32.0);

	ctx.set_font("bold 9px sans-serif");
	ctx.set_fill_style_str(if active { "#ffffff" } else { style.label });
	let lines = wrap_words(node.def.label, w - 8.0, |s| measure(ctx, s));
	for (i, line) in lines.iter().take(2).enumerate() {
		let _ = ctx.fill_text(line, cx, node.y + 58.0 + i as f64 * 11.0);
	}
	reset_text(ctx);

	if genai {
		draw_genai_badge(state, ctx, node.x + w, node.y);
	}
	ctx.restore();
}

fn draw_genai_badge(state: &PipelineCanvasState, ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
	let pulse = (state.flow_time * 2.0 * PI).sin() * 0.5 + 0.5;
	ctx.begin_path();
	let _ = ctx.arc(x, y, 8.0 + 4.0 * pulse, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&format!("rgba(192, 132, 252, {})", 0.6 * (1.0 - pulse)));
	ctx.fill();

	ctx.begin_path();
	let _ = ctx.arc(x, y, 8.0, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("#a855f7");
	ctx.fill();
	ctx.set_stroke_style_str("#d8b4fe");
	ctx.set_line_width(1.0);
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_font("9px sans-serif");
	ctx.set_fill_style_str("#ffffff");
	let _ = ctx.fill_text("✦", x, y + 0.5);
	reset_text(ctx);
}

fn draw_expanded(state: &PipelineCanvasState, ctx: &CanvasRenderingContext2d, node: &CanvasNode) {
	let (style, active, genai) = node_style(state, node);
	let (w, h) = state.node_size(node.def.id);
	let pad = 16.0;

	ctx.save();
	ctx.set_shadow_blur(30.0);
	ctx.set_shadow_color("rgba(0, 0, 0, 0.5)");
	rounded_rect(ctx, node.x, node.y, w, h, CORNER_RADIUS);
	ctx.set_fill_style_str(style.fill_expanded);
	ctx.fill();
	ctx.set_shadow_blur(0.0);
	ctx.set_line_width(2.0);
	ctx.set_stroke_style_str(if active { style.active_border } else { style.border });
	ctx.stroke();

	ctx.set_text_baseline("middle");
	ctx.set_font("18px sans-serif");
	let _ = ctx.fill_text(node.def.icon, node.x + pad, node.y + pad + 8.0);
	ctx.set_font("bold 14px sans-serif");
	ctx.set_fill_style_str("#ffffff");
	let _ = ctx.fill_text(node.def.label, node.x + pad + 26.0, node.y + pad + 8.0);

	if genai {
		ctx.set_font("bold 9px sans-serif");
		ctx.set_fill_style_str("#e9d5ff");
		ctx.set_text_align("right");
		let _ = ctx.fill_text("✦ GEN AI", node.x + w - pad, node.y + pad + 8.0);
		ctx.set_text_align("left");
	}

	ctx.set_font("12px sans-serif");
	ctx.set_fill_style_str("#cbd5e1");
	let lines = wrap_words(node.def.description, w - 2.0 * pad, |s| measure(ctx, s));
	for (i, line) in lines.iter().take(4).enumerate() {
		let _ = ctx.fill_text(line, node.x + pad, node.y + pad + 34.0 + i as f64 * 15.0);
	}

	ctx.set_font("bold 10px sans-serif");
	ctx.set_fill_style_str(ACCENT);
	let _ = ctx.fill_text("⤢ VIEW DETAILS", node.x + pad, node.y + h - 12.0);
	reset_text(ctx);
	ctx.restore();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn reset_text(ctx: &CanvasRenderingContext2d) {
	ctx.set_text_align("left");
	ctx.set_text_baseline("alphabetic");
}

fn measure(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
	ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

/// Greedy word wrap. A single word wider than `max_width` gets its own line.
fn wrap_words(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		if current.is_empty() {
			current.push_str(word);
			continue;
		}
		let candidate = format!("{current} {word}");
		if measure(&candidate) <= max_width {
			current = candidate;
		} else {
			lines.push(std::mem::replace(&mut current, word.to_string()));
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}

#[cfg(test)]
mod tests {
	use super::*;

	fn chars(s: &str) -> f64 {
		s.chars().count() as f64
	}

	#[test]
	fn wrap_breaks_on_width() {
		let lines = wrap_words("hybrid search with reciprocal rank fusion", 14.0, chars);
		assert_eq!(lines, vec!["hybrid search", "with", "reciprocal", "rank fusion"]);
	}

	#[test]
	fn wrap_keeps_long_words_whole() {
		assert_eq!(wrap_words("supercalifragilistic ok", 5.0, chars), vec!["supercalifragilistic", "ok"]);
		assert!(wrap_words("   ", 10.0, chars).is_empty());
	}

	#[test]
	fn box_exit_hits_nearest_side() {
		// horizontal edge leaves an 80 wide box after 40 units of a 100 unit run
		assert!((box_exit(100.0, 0.0, 80.0, 80.0) - 0.4).abs() < 1e-12);
		assert!((box_exit(0.0, -200.0, 80.0, 120.0) - 0.3).abs() < 1e-12);
		assert_eq!(box_exit(10.0, 10.0, 80.0, 80.0), 1.0);
	}

	#[test]
	fn business_edges_are_detected() {
		let dashed = EDGES.iter().filter(|e| is_business_edge(e)).count();
		assert_eq!(dashed, 3);
	}
}
