use crate::topology::{EdgeRef, NODES, NodeDef, NodeId};

use super::viewport::ViewTransform;

pub const NODE_SIZE: f64 = 80.0;
pub const EXPANDED_WIDTH: f64 = 256.0;
pub const EXPANDED_HEIGHT: f64 = 120.0;
/// Largest `|dx| + |dy|` in screen pixels that still counts as a click.
pub const CLICK_THRESHOLD: f64 = 5.0;
pub const BUTTON_ZOOM_STEP: f64 = 0.2;
/// Time the traveling marker takes to cross the animated edge.
pub const EDGE_TRAVEL_SECS: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct CanvasNode {
	pub def: &'static NodeDef,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<NodeId>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct EdgeAnimation {
	pub edge: Option<EdgeRef>,
	/// Seconds since `edge` became the animated edge.
	pub elapsed: f64,
}

pub struct PipelineCanvasState {
	pub nodes: Vec<CanvasNode>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub expanded: Option<NodeId>,
	pub hovered: Option<NodeId>,
	pub active_node: Option<NodeId>,
	pub edge_anim: EdgeAnimation,
	pub show_payloads: bool,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl PipelineCanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		let nodes = NODES
			.iter()
			.map(|def| CanvasNode {
				def,
				x: def.x,
				y: def.y,
			})
			.collect();

		Self {
			nodes,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			expanded: None,
			hovered: None,
			active_node: None,
			edge_anim: EdgeAnimation::default(),
			show_payloads: true,
			width,
			height,
			flow_time: 0.0,
		}
	}

	pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
		self.nodes.iter().find(|n| n.def.id == id)
	}

	fn node_mut(&mut self, id: NodeId) -> Option<&mut CanvasNode> {
		self.nodes.iter_mut().find(|n| n.def.id == id)
	}

	pub fn is_expanded(&self, id: NodeId) -> bool {
		self.expanded == Some(id)
	}

	/// Box size in world units; depends on whether `id` is expanded.
	pub fn node_size(&self, id: NodeId) -> (f64, f64) {
		if self.is_expanded(id) {
			(EXPANDED_WIDTH, EXPANDED_HEIGHT)
		} else {
			(NODE_SIZE, NODE_SIZE)
		}
	}

	pub fn node_center(&self, id: NodeId) -> Option<(f64, f64)> {
		let node = self.node(id)?;
		let (w, h) = self.node_size(id);
		Some((node.x + w / 2.0, node.y + h / 2.0))
	}

	/// Top-most node under a screen point. The expanded node is drawn last,
	/// so it wins over anything it overlaps.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<NodeId> {
		let (gx, gy) = self.transform.screen_to_world(sx, sy);
		let hit = |n: &CanvasNode| {
			let (w, h) = self.node_size(n.def.id);
			gx >= n.x && gx <= n.x + w && gy >= n.y && gy <= n.y + h
		};

		if let Some(id) = self.expanded {
			if self.node(id).is_some_and(hit) {
				return Some(id);
			}
		}
		self.nodes.iter().rev().find(|&n| hit(n)).map(|n| n.def.id)
	}

	/// Pointer pressed: grabs a node, or starts panning the background.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(id) = self.node_at_position(sx, sy) {
			let Some(node) = self.node(id) else {
				return;
			};
			self.drag = DragState {
				active: true,
				node: Some(id),
				start_x: sx,
				start_y: sy,
				node_start_x: node.x,
				node_start_y: node.y,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
			self.expanded = None;
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if !self.drag.active {
			self.hovered = self.node_at_position(sx, sy);
		}

		if self.drag.active {
			if let Some(id) = self.drag.node {
				let k = self.transform.k;
				let (nx, ny) = (
					self.drag.node_start_x + (sx - self.drag.start_x) / k,
					self.drag.node_start_y + (sy - self.drag.start_y) / k,
				);
				if let Some(node) = self.node_mut(id) {
					node.x = nx;
					node.y = ny;
				}
			}
		} else if self.pan.active {
			self.transform.x = sx - (self.pan.start_x - self.pan.transform_start_x);
			self.transform.y = sy - (self.pan.start_y - self.pan.transform_start_y);
		}
	}

	/// Pointer released. Returns the node that was clicked, if the gesture
	/// stayed within [`CLICK_THRESHOLD`].
	pub fn pointer_up(&mut self, sx: f64, sy: f64) -> Option<NodeId> {
		let drag = std::mem::take(&mut self.drag);
		self.pan.active = false;

		let id = drag.node.filter(|_| drag.active)?;
		let moved = (sx - drag.start_x).abs() + (sy - drag.start_y).abs();
		if moved > CLICK_THRESHOLD {
			return None;
		}

		if let Some(node) = self.node_mut(id) {
			node.x = drag.node_start_x;
			node.y = drag.node_start_y;
		}
		self.expanded = if self.is_expanded(id) { None } else { Some(id) };
		Some(id)
	}

	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.hovered = None;
	}

	pub fn wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		self.transform.wheel_zoom(sx, sy, delta_y);
	}

	/// Button zoom, anchored on the viewport centre.
	pub fn zoom_by(&mut self, delta: f64) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.transform.zoom_at(cx, cy, self.transform.k + delta);
	}

	pub fn reset_view(&mut self) {
		self.transform.reset();
	}

	/// Syncs the simulation's highlight. A new edge restarts the marker.
	pub fn set_active(&mut self, node: Option<NodeId>, edge: Option<EdgeRef>) {
		self.active_node = node;
		if self.edge_anim.edge != edge {
			self.edge_anim = EdgeAnimation { edge, elapsed: 0.0 };
		}
	}

	pub fn is_animating(&self, edge: EdgeRef) -> bool {
		self.edge_anim.edge == Some(edge)
	}

	/// Marker position along the animated edge in `[0, 1)`, while it travels.
	pub fn travel_progress(&self) -> Option<f64> {
		self.edge_anim.edge?;
		let t = self.edge_anim.elapsed / EDGE_TRAVEL_SECS;
		(t < 1.0).then_some(t)
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		self.edge_anim.elapsed += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn state() -> PipelineCanvasState {
		PipelineCanvasState::new(1200.0, 800.0)
	}

	/// Screen point at the middle of a collapsed node.
	fn screen_center(s: &PipelineCanvasState, id: NodeId) -> (f64, f64) {
		let (cx, cy) = s.node_center(id).unwrap();
		let t = &s.transform;
		(cx * t.k + t.x, cy * t.k + t.y)
	}

	#[test]
	fn hit_test_finds_nodes_and_background() {
		let s = state();
		let (x, y) = screen_center(&s, NodeId::SearchApi);
		assert_eq!(s.node_at_position(x, y), Some(NodeId::SearchApi));
		assert_eq!(s.node_at_position(5.0, 5.0), None);
	}

	#[test]
	fn background_drag_pans() {
		let mut s = state();
		s.pointer_down(10.0, 10.0);
		assert!(s.pan.active);
		s.pointer_move(60.0, -20.0);
		assert_eq!((s.transform.x, s.transform.y), (50.0, -30.0));
		s.pointer_up(60.0, -20.0);
		assert!(!s.pan.active);

		s.pointer_down(0.0, 0.0);
		s.pointer_move(10.0, 10.0);
		assert_eq!((s.transform.x, s.transform.y), (60.0, -20.0));
	}

	#[test]
	fn pressing_a_node_never_pans() {
		let mut s = state();
		let (x, y) = screen_center(&s, NodeId::Reranker);
		s.pointer_down(x, y);
		assert!(!s.pan.active);
		assert!(s.drag.active);
	}

	#[test]
	fn drag_moves_node_in_world_units() {
		let mut s = state();
		s.transform.zoom_at(0.0, 0.0, 2.0);
		let start = s.node(NodeId::Elasticsearch).map(|n| (n.x, n.y)).unwrap();
		let (x, y) = screen_center(&s, NodeId::Elasticsearch);

		s.pointer_down(x, y);
		s.pointer_move(x + 40.0, y - 20.0);
		let clicked = s.pointer_up(x + 40.0, y - 20.0);

		assert_eq!(clicked, None);
		let node = s.node(NodeId::Elasticsearch).unwrap();
		assert_eq!((node.x, node.y), (start.0 + 20.0, start.1 - 10.0));
		assert_eq!(s.expanded, None);
	}

	#[test]
	fn small_drag_is_a_click_that_expands() {
		let mut s = state();
		let start = s.node(NodeId::Reranker).map(|n| (n.x, n.y)).unwrap();
		let (x, y) = screen_center(&s, NodeId::Reranker);

		s.pointer_down(x, y);
		s.pointer_move(x + 3.0, y + 2.0);
		assert_eq!(s.pointer_up(x + 3.0, y + 2.0), Some(NodeId::Reranker));

		let node = s.node(NodeId::Reranker).unwrap();
		assert_eq!((node.x, node.y), start);
		assert_eq!(s.expanded, Some(NodeId::Reranker));
		assert_eq!(s.node_size(NodeId::Reranker), (EXPANDED_WIDTH, EXPANDED_HEIGHT));
	}

	#[test]
	fn clicking_again_collapses_and_only_one_node_expands() {
		let mut s = state();
		let click = |s: &mut PipelineCanvasState, id| {
			let (x, y) = screen_center(s, id);
			s.pointer_down(x, y);
			s.pointer_up(x, y)
		};

		click(&mut s, NodeId::SearchApi);
		click(&mut s, NodeId::StorefrontUi);
		assert_eq!(s.expanded, Some(NodeId::StorefrontUi));
		click(&mut s, NodeId::StorefrontUi);
		assert_eq!(s.expanded, None);
	}

	#[test]
	fn background_press_collapses() {
		let mut s = state();
		s.expanded = Some(NodeId::MobileApp);
		s.pointer_down(5.0, 5.0);
		assert_eq!(s.expanded, None);
	}

	#[test]
	fn edge_centers_follow_expansion() {
		let mut s = state();
		let def = NODES[0];
		assert_eq!(s.node_center(def.id), Some((def.x + 40.0, def.y + 40.0)));
		s.expanded = Some(def.id);
		assert_eq!(s.node_center(def.id), Some((def.x + 128.0, def.y + 60.0)));
	}

	#[test]
	fn button_zoom_anchors_on_center() {
		let mut s = state();
		let before = s.transform.screen_to_world(600.0, 400.0);
		s.zoom_by(BUTTON_ZOOM_STEP);
		let after = s.transform.screen_to_world(600.0, 400.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert!((s.transform.k - 1.2).abs() < 1e-9);
		s.reset_view();
		assert_eq!(s.transform, ViewTransform::default());
	}

	#[test]
	fn marker_restarts_on_new_edge_and_stops_after_one_pass() {
		let mut s = state();
		let a = EdgeRef::new(NodeId::StorefrontUi, NodeId::SearchApi);
		let b = EdgeRef::new(NodeId::SearchApi, NodeId::Elasticsearch);

		s.set_active(Some(NodeId::SearchApi), Some(a));
		s.tick(0.5);
		assert_eq!(s.travel_progress(), Some(0.5));
		s.set_active(Some(NodeId::SearchApi), Some(a));
		assert_eq!(s.travel_progress(), Some(0.5));
		s.tick(0.6);
		assert_eq!(s.travel_progress(), None);
		assert!(s.is_animating(a));

		s.set_active(Some(NodeId::Elasticsearch), Some(b));
		assert_eq!(s.travel_progress(), Some(0.0));
		s.set_active(None, None);
		assert_eq!(s.travel_progress(), None);
	}

	#[test]
	fn leaving_the_canvas_ends_gestures() {
		let mut s = state();
		let (x, y) = screen_center(&s, NodeId::Reranker);
		s.pointer_down(x, y);
		s.pointer_leave();
		assert!(!s.drag.active);
		assert_eq!(s.pointer_up(x, y), None);
	}

	#[test]
	fn button_zoom_follows_the_resized_centre() {
		let mut s = state();
		s.resize(600.0, 400.0);
		let before = s.transform.screen_to_world(300.0, 200.0);
		s.zoom_by(BUTTON_ZOOM_STEP);
		let after = s.transform.screen_to_world(300.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}
}
