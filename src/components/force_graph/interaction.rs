//! Interaction state machine: drag-to-pin, pin toggling, highlight focus and
//! zoom buttons.
//!
//! The controller owns the adjacency index, the simulation and the view
//! transform for one graph. The host input layer calls the named `on_*`
//! methods; every call mutates simulation node state directly, so the next
//! [`frame`](InteractionController::frame) sees it.

use log::{debug, info, warn};

use super::adjacency::AdjacencyIndex;
use super::config::GraphOptions;
use super::error::{GraphError, Result};
use super::highlight::HighlightState;
use super::scale::{ScaleConfig, ScaledValues};
use super::simulation::ForceSimulation;
use super::theme::Theme;
use super::types::{GraphData, NodeId};
use super::view::ViewTransform;

/// `alpha` the simulation is warmed toward while a node is held.
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Per-gesture node drag: idle → dragging → idle.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
	#[default]
	Idle,
	Dragging {
		node: usize,
		/// Node position minus pointer position at grab time, graph space.
		offset_x: f64,
		offset_y: f64,
	},
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Owns one loaded graph: its index, layout, view and highlight, plus the
/// gesture in progress.
pub struct InteractionController {
	pub(super) index: AdjacencyIndex,
	pub(super) simulation: ForceSimulation,
	pub(super) view: ViewTransform,
	pub(super) highlight: HighlightState,
	pub(super) labels: Vec<String>,
	pub(super) options: GraphOptions,
	pub(super) scale: ScaleConfig,
	pub(super) theme: Theme,
	drag: DragState,
	pan: PanState,
}

impl InteractionController {
	/// Validate options, build the adjacency index and seed the simulation.
	pub fn new(data: &GraphData, options: GraphOptions) -> Result<Self> {
		options.validate()?;
		let index = AdjacencyIndex::build(data)?;
		let simulation = ForceSimulation::new(&data.nodes, &index, options.simulation_params());
		let (width, height) = options.viewport();
		let view = ViewTransform::new(options.min_zoom, options.max_zoom, width, height);

		info!(
			"graph loaded: {} nodes, {} links",
			index.node_count(),
			index.link_count()
		);

		Ok(Self {
			index,
			simulation,
			view,
			highlight: HighlightState::default(),
			labels: data.nodes.iter().map(|n| n.label()).collect(),
			scale: ScaleConfig::with_node_size(options.node_size),
			options,
			theme: Theme::default(),
			drag: DragState::default(),
			pan: PanState::default(),
		})
	}

	/// Replace the default theme.
	pub fn with_theme(mut self, theme: Theme) -> Self {
		self.theme = theme;
		self
	}

	/// Adjacency for the loaded graph.
	pub fn index(&self) -> &AdjacencyIndex {
		&self.index
	}

	/// Layout state; node positions live here.
	pub fn simulation(&self) -> &ForceSimulation {
		&self.simulation
	}

	/// Current pan/zoom.
	pub fn view(&self) -> &ViewTransform {
		&self.view
	}

	/// Current focus.
	pub fn highlight(&self) -> HighlightState {
		self.highlight
	}

	/// Options in effect, viewport included.
	pub fn options(&self) -> &GraphOptions {
		&self.options
	}

	/// Colours used by snapshots.
	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Node drag in progress, if any.
	pub fn drag_state(&self) -> &DragState {
		&self.drag
	}

	fn contains(&self, node: usize) -> bool {
		node < self.index.node_count()
	}

	/// Whether a node is held.
	pub fn is_dragging(&self) -> bool {
		self.drag != DragState::Idle
	}

	/// Whether a background pan is in progress.
	pub fn is_panning(&self) -> bool {
		self.pan.active
	}

	/// Advance one frame: sample the zoom animation, then step the
	/// simulation. Returns whether anything moved.
	pub fn frame(&mut self, now_ms: f64) -> bool {
		let animating = self.view.sample(now_ms);
		let stepped = self.simulation.step();
		animating || stepped
	}

	/// New viewport size; the layout re-centres on it.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.view.resize(width, height);
		self.simulation.set_center(width / 2.0, height / 2.0);
		self.options.width = Some(width);
		self.options.height = Some(height);
	}

	/// Topmost node under a screen point, preferring the closest centre.
	pub fn node_at(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.view.screen_to_graph(sx, sy);
		let scaled = ScaledValues::new(&self.scale, self.view.scale());
		let mut found: Option<(usize, f64)> = None;
		for (idx, node) in self.simulation.nodes().iter().enumerate() {
			let (dx, dy) = (node.x - gx, node.y - gy);
			let dist = (dx * dx + dy * dy).sqrt();
			let radius = scaled.node_radius(self.scale.node_radius(self.index.degree(idx)));
			if dist <= radius + scaled.hit_padding && found.is_none_or(|(_, d)| dist <= d) {
				found = Some((idx, dist));
			}
		}
		found.map(|(idx, _)| idx)
	}

	/// Grab `node` at screen point `(sx, sy)`: pin it in place and warm the
	/// simulation. Out-of-range indices are ignored.
	pub fn on_drag_start(&mut self, node: usize, sx: f64, sy: f64) {
		if !self.contains(node) {
			return;
		}
		if !self.is_dragging() {
			self.simulation.set_alpha_target(DRAG_ALPHA_TARGET);
			self.simulation.restart();
		}
		let (x, y) = {
			let n = self.simulation.node(node);
			(n.x, n.y)
		};
		let (px, py) = self.view.screen_to_graph(sx, sy);
		self.simulation.pin(node, x, y);
		self.drag = DragState::Dragging {
			node,
			offset_x: x - px,
			offset_y: y - py,
		};
	}

	/// Move the held node with the pointer, keeping the grab offset. The
	/// pointer is mapped through the transform as it is now, so a zoom
	/// running mid-drag does not pull the node off the cursor.
	pub fn on_drag_move(&mut self, sx: f64, sy: f64) {
		let DragState::Dragging {
			node,
			offset_x,
			offset_y,
		} = self.drag
		else {
			return;
		};
		let (px, py) = self.view.screen_to_graph(sx, sy);
		self.simulation.pin(node, px + offset_x, py + offset_y);
	}

	/// Release the held node. It stays pinned only if double-click fixed it.
	pub fn on_drag_end(&mut self) {
		let DragState::Dragging { node, .. } = std::mem::take(&mut self.drag) else {
			return;
		};
		self.simulation.set_alpha_target(0.0);
		if !self.simulation.node(node).fixed {
			self.simulation.unpin(node);
		}
	}

	/// Toggle the persistent pin on a node. Out-of-range indices are ignored.
	pub fn on_double_click(&mut self, node: usize) {
		if !self.contains(node) {
			return;
		}
		let n = self.simulation.node_mut(node);
		n.fixed = !n.fixed;
		let (fixed, x, y) = (n.fixed, n.x, n.y);
		if fixed {
			self.simulation.pin(node, x, y);
		} else {
			self.simulation.unpin(node);
		}
		debug!(
			"node {} {}",
			self.index.id_of(node),
			if fixed { "pinned" } else { "unpinned" }
		);
	}

	/// Pointer moved onto `node`.
	pub fn on_pointer_enter(&mut self, node: usize) {
		self.focus(node);
	}

	/// Pointer left the node it was over.
	pub fn on_pointer_leave(&mut self) {
		self.clear_focus();
	}

	/// Highlight `node` and its neighbours. Out-of-range indices are ignored.
	pub fn focus(&mut self, node: usize) {
		if !self.contains(node) {
			return;
		}
		if !self.highlight.is_focused(node) {
			debug!(
				"focus {} ({} neighbors, {} links)",
				self.index.id_of(node),
				self.index.neighbors_of(node).len(),
				self.index.links_of(node).len()
			);
		}
		self.highlight.set(node);
	}

	/// Remove the highlight.
	pub fn clear_focus(&mut self) {
		self.highlight.clear();
	}

	/// Resolve raw input (e.g. a search box value) to a node index.
	///
	/// Numeric input matches integer ids first; anything else is compared as
	/// a string id.
	pub fn resolve_id(&self, raw: &str) -> Result<usize> {
		let raw = raw.trim();
		if let Ok(n) = raw.parse::<i64>() {
			if let Some(idx) = self.index.index_of(&NodeId::Int(n)) {
				return Ok(idx);
			}
		}
		self.index
			.index_of(&NodeId::Text(raw.to_string()))
			.ok_or_else(|| GraphError::NodeNotFound(raw.to_string()))
	}

	/// Focus the node named by `raw`. Returns false, leaving the current
	/// highlight untouched, when no such node exists.
	pub fn focus_by_id(&mut self, raw: &str) -> bool {
		match self.resolve_id(raw) {
			Ok(idx) => {
				self.focus(idx);
				true
			}
			Err(e) => {
				warn!("{e}");
				false
			}
		}
	}

	/// Animated zoom in about the viewport centre.
	pub fn zoom_in(&mut self, now_ms: f64) {
		debug!("zoom in");
		let (factor, ms) = (self.options.zoom_in_factor, self.options.transition_ms);
		self.view.zoom_by(factor, ms, now_ms);
	}

	/// Animated zoom out about the viewport centre.
	pub fn zoom_out(&mut self, now_ms: f64) {
		debug!("zoom out");
		let (factor, ms) = (self.options.zoom_out_factor, self.options.transition_ms);
		self.view.zoom_by(factor, ms, now_ms);
	}

	/// Animate back to the identity transform.
	pub fn zoom_reset(&mut self, now_ms: f64) {
		debug!("zoom reset");
		self.view.reset(self.options.transition_ms, now_ms);
	}

	/// Wheel zoom about the pointer. Purely horizontal scrolls are ignored.
	pub fn on_wheel(&mut self, sx: f64, sy: f64, delta_y: f64) {
		if delta_y == 0.0 || !delta_y.is_finite() {
			return;
		}
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		self.view.zoom_at(sx, sy, factor);
	}

	/// Background pressed at `(sx, sy)`.
	pub fn on_pan_start(&mut self, sx: f64, sy: f64) {
		let t = self.view.current();
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: t.x,
			transform_start_y: t.y,
		};
	}

	/// Translate the view with the pointer.
	pub fn on_pan_move(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		let t = self.view.current();
		let dx = self.pan.transform_start_x + (sx - self.pan.start_x) - t.x;
		let dy = self.pan.transform_start_y + (sy - self.pan.start_y) - t.y;
		self.view.pan_by(dx, dy);
	}

	/// Background released.
	pub fn on_pan_end(&mut self) {
		self.pan.active = false;
	}

	/// Pointer left the surface: end any gesture and drop hover focus.
	pub fn cancel_gestures(&mut self) {
		self.on_drag_end();
		self.on_pan_end();
		self.clear_focus();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::highlight::DIMMED_OPACITY;
	use crate::components::force_graph::types::{GraphLink, GraphNode};
	use crate::components::force_graph::view::Transform;
	use proptest::prelude::*;

	fn controller(nodes: &[i64], links: &[(i64, i64)]) -> InteractionController {
		let data = GraphData {
			nodes: nodes.iter().map(|&n| GraphNode::new(n)).collect(),
			links: links.iter().map(|&(s, t)| GraphLink::new(s, t)).collect(),
		};
		let options = GraphOptions::default().with_viewport(800.0, 600.0);
		InteractionController::new(&data, options).unwrap()
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn invalid_link_fails_before_simulation() {
		let data = GraphData {
			nodes: vec![GraphNode::new(1i64)],
			links: vec![GraphLink::new(1i64, 2i64)],
		};
		let err = InteractionController::new(&data, GraphOptions::default()).err();
		assert!(matches!(err, Some(GraphError::InvalidReference { .. })));
	}

	#[test]
	fn invalid_options_are_rejected() {
		let options = GraphOptions {
			min_zoom: -1.0,
			..GraphOptions::default()
		};
		let err = InteractionController::new(&GraphData::default(), options).err();
		assert!(matches!(err, Some(GraphError::InvalidOption { .. })));
	}

	#[test]
	fn drag_pins_then_releases() {
		let mut c = controller(&[1, 2, 3], &[(1, 2), (2, 3)]);
		let (x0, y0) = (c.simulation.node(0).x, c.simulation.node(0).y);
		c.on_drag_start(0, 100.0, 100.0);
		assert!(c.is_dragging());
		assert_eq!(c.simulation.node(0).fx, Some(x0));
		assert_eq!(c.simulation.alpha_target(), DRAG_ALPHA_TARGET);

		c.on_drag_move(110.0, 95.0);
		c.frame(16.0);
		assert!(close(c.simulation.node(0).x, x0 + 10.0));
		assert!(close(c.simulation.node(0).y, y0 - 5.0));

		c.on_drag_end();
		assert!(!c.is_dragging());
		assert_eq!(c.simulation.alpha_target(), 0.0);
		assert!(!c.simulation.node(0).is_pinned());
	}

	#[test]
	fn drag_move_is_inverse_transformed() {
		let mut c = controller(&[1, 2], &[(1, 2)]);
		c.view.apply_delta(Transform {
			x: 50.0,
			y: 0.0,
			k: 2.0,
		});
		let x0 = c.simulation.node(1).x;
		c.on_drag_start(1, 0.0, 0.0);
		c.on_drag_move(40.0, 0.0);
		assert!(c.simulation.node(1).fx.is_some_and(|fx| close(fx, x0 + 20.0)));
	}

	#[test]
	fn held_node_tracks_pointer_through_zoom_animation() {
		let mut c = controller(&[1, 2, 3], &[(1, 2), (2, 3)]);
		let (gx, gy) = (c.simulation.node(0).x, c.simulation.node(0).y);
		let (sx, sy) = c.view.graph_to_screen(gx, gy);

		c.zoom_in(0.0);
		c.on_drag_start(0, sx, sy);
		c.frame(300.0);
		assert!(!c.view.is_animating());
		c.on_drag_move(sx, sy);

		let (px, py) = c.view.screen_to_graph(sx, sy);
		let node = c.simulation.node(0);
		assert!(node.fx.is_some_and(|fx| close(fx, px)));
		assert!(node.fy.is_some_and(|fy| close(fy, py)));
	}

	#[test]
	fn wheel_during_drag_keeps_node_under_pointer() {
		let mut c = controller(&[1, 2], &[(1, 2)]);
		let (gx, gy) = (c.simulation.node(1).x, c.simulation.node(1).y);
		let (sx, sy) = c.view.graph_to_screen(gx + 3.0, gy);
		c.on_drag_start(1, sx, sy);
		c.on_wheel(0.0, 0.0, -100.0);
		c.on_drag_move(sx, sy);
		let (px, _) = c.view.screen_to_graph(sx, sy);
		assert!(c.simulation.node(1).fx.is_some_and(|fx| close(fx, px - 3.0)));
	}

	#[test]
	fn horizontal_scroll_does_not_zoom() {
		let mut c = controller(&[1, 2], &[(1, 2)]);
		c.on_wheel(100.0, 100.0, 0.0);
		assert_eq!(c.view.current(), Transform::IDENTITY);
		c.on_wheel(100.0, 100.0, 120.0);
		assert!(close(c.view.scale(), 0.9));
	}

	#[test]
	fn out_of_range_indices_are_ignored() {
		let mut c = controller(&[1, 2, 3], &[(1, 2)]);
		c.on_double_click(99);
		c.on_drag_start(99, 0.0, 0.0);
		assert!(!c.is_dragging());
		c.focus(99);
		assert_eq!(c.highlight().focused(), None);
		c.on_pointer_enter(42);
		assert!(c.nodes_snapshot().iter().all(|n| n.opacity == 1.0));
		assert!(c.simulation.nodes().iter().all(|n| !n.is_pinned()));
	}

	#[test]
	fn drag_reheats_settled_simulation() {
		let mut c = controller(&[1, 2], &[(1, 2)]);
		while c.simulation.step() {}
		assert!(c.simulation.is_settled());
		c.on_drag_start(0, 0.0, 0.0);
		assert!(!c.simulation.is_settled());
		assert!(c.frame(0.0));
	}

	#[test]
	fn fixed_node_stays_pinned_after_drag() {
		let mut c = controller(&[1, 2], &[(1, 2)]);
		c.on_double_click(0);
		c.on_drag_start(0, 0.0, 0.0);
		c.on_drag_move(30.0, 0.0);
		c.on_drag_end();
		let node = c.simulation.node(0);
		assert!(node.fixed);
		assert!(node.fx.is_some());
		let pinned = node.fx;
		for i in 0..10 {
			c.frame(i as f64 * 16.0);
		}
		assert_eq!(Some(c.simulation.node(0).x), pinned);
	}

	#[test]
	fn double_click_twice_restores_free_node() {
		let mut c = controller(&[1, 2, 3], &[(1, 2)]);
		c.on_double_click(2);
		assert!(c.simulation.node(2).fixed);
		assert_eq!(c.simulation.node(2).fx, Some(c.simulation.node(2).x));
		c.frame(0.0);
		c.on_double_click(2);
		let node = c.simulation.node(2);
		assert!(!node.fixed);
		assert_eq!((node.fx, node.fy), (None, None));
	}

	#[test]
	fn focus_then_clear_restores_full_opacity() {
		let mut c = controller(&[1, 2, 3, 4], &[(1, 2)]);
		let before: Vec<(f64, bool)> = c
			.nodes_snapshot()
			.iter()
			.map(|n| (n.opacity, n.label_visible))
			.collect();
		c.focus(0);
		c.clear_focus();
		let after: Vec<(f64, bool)> = c
			.nodes_snapshot()
			.iter()
			.map(|n| (n.opacity, n.label_visible))
			.collect();
		assert_eq!(before, after);
		assert!(after.iter().all(|&(o, l)| o == 1.0 && !l));
		assert!(c.links_snapshot().iter().all(|l| l.opacity == 1.0));
	}

	#[test]
	fn hub_focus_dims_nothing() {
		let mut c = controller(&[1, 2, 3], &[(1, 2), (2, 3)]);
		c.on_pointer_enter(1);
		assert!(c.nodes_snapshot().iter().all(|n| n.opacity == 1.0));
		assert!(c.links_snapshot().iter().all(|l| l.opacity == 1.0));
		c.on_pointer_leave();
		assert_eq!(c.highlight().focused(), None);
	}

	#[test]
	fn isolated_nodes_dim_on_focus() {
		let mut c = controller(&[1, 2, 3, 4], &[(1, 2)]);
		assert!(c.focus_by_id("1"));
		let nodes = c.nodes_snapshot();
		assert_eq!(nodes[1].opacity, 1.0);
		assert_eq!(nodes[2].opacity, DIMMED_OPACITY);
		assert_eq!(nodes[3].opacity, DIMMED_OPACITY);
		assert!(nodes[0].is_focused && nodes[0].label_visible);
		assert!(!nodes[1].label_visible);
		assert_eq!(c.links_snapshot()[0].opacity, 1.0);
	}

	#[test]
	fn unknown_search_id_leaves_highlight_alone() {
		let mut c = controller(&[1, 2, 3], &[(1, 2)]);
		c.focus(2);
		assert!(!c.focus_by_id("99"));
		assert_eq!(c.highlight().focused(), Some(2));
		assert!(!c.focus_by_id(""));
		assert!(matches!(c.resolve_id("abc"), Err(GraphError::NodeNotFound(_))));
	}

	#[test]
	fn search_matches_string_ids() {
		let data = GraphData {
			nodes: vec![GraphNode::new("alpha"), GraphNode::new("007")],
			links: vec![],
		};
		let mut c = InteractionController::new(&data, GraphOptions::default()).unwrap();
		assert!(c.focus_by_id(" alpha "));
		assert_eq!(c.highlight().focused(), Some(0));
		assert!(c.focus_by_id("007"));
		assert_eq!(c.highlight().focused(), Some(1));
	}

	#[test]
	fn zoom_buttons_animate_and_reset() {
		let mut c = controller(&[1], &[]);
		c.zoom_in(0.0);
		c.frame(300.0);
		assert!((c.view.scale() - 1.5).abs() < 1e-12);
		c.zoom_out(400.0);
		c.frame(700.0);
		assert!((c.view.scale() - 1.5 * 0.667).abs() < 1e-12);
		c.zoom_reset(800.0);
		c.frame(1100.0);
		assert_eq!(c.view.current(), Transform::IDENTITY);
	}

	#[test]
	fn hit_test_finds_node_under_pointer() {
		let mut c = controller(&[1, 2], &[]);
		c.simulation.pin(0, 100.0, 100.0);
		c.simulation.pin(1, 300.0, 300.0);
		c.simulation.tick();
		assert_eq!(c.node_at(101.0, 99.0), Some(0));
		assert_eq!(c.node_at(300.0, 302.0), Some(1));
		assert_eq!(c.node_at(200.0, 200.0), None);
	}

	#[test]
	fn pan_follows_pointer() {
		let mut c = controller(&[1], &[]);
		c.on_pan_start(10.0, 10.0);
		c.on_pan_move(40.0, 0.0);
		c.on_pan_move(50.0, 5.0);
		c.on_pan_end();
		let t = c.view.current();
		assert_eq!((t.x, t.y), (40.0, -5.0));
		c.on_pan_move(500.0, 500.0);
		assert_eq!(c.view.current().x, 40.0);
	}

	#[test]
	fn cancel_ends_drag_and_hover() {
		let mut c = controller(&[1, 2], &[(1, 2)]);
		c.focus(0);
		c.on_drag_start(1, 0.0, 0.0);
		c.cancel_gestures();
		assert!(!c.is_dragging());
		assert_eq!(c.highlight().focused(), None);
		assert!(!c.simulation.node(1).is_pinned());
	}

	proptest! {
		#[test]
		fn focus_then_clear_restores_opacities(
			n in 1i64..16,
			raw_links in prop::collection::vec((0i64..16, 0i64..16), 0..24),
			target in 0usize..16,
		) {
			let nodes: Vec<i64> = (0..n).collect();
			let links: Vec<(i64, i64)> = raw_links.into_iter().map(|(a, b)| (a % n, b % n)).collect();
			let mut c = controller(&nodes, &links);
			let target = target % n as usize;

			c.focus(target);
			let focused = c.nodes_snapshot();
			for (idx, node) in focused.iter().enumerate() {
				let near = idx == target || c.index.neighbors_of(target).contains(&idx);
				prop_assert_eq!(node.opacity, if near { 1.0 } else { DIMMED_OPACITY });
				prop_assert_eq!(node.label_visible, idx == target);
			}

			c.clear_focus();
			prop_assert!(c.nodes_snapshot().iter().all(|n| n.opacity == 1.0 && !n.label_visible));
			prop_assert!(c.links_snapshot().iter().all(|l| l.opacity == 1.0));
		}
	}
}
