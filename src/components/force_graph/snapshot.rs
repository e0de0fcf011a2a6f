//! Per-frame draw contract handed to the renderer.
//!
//! Positions are in graph coordinates. Sizes are already divided by the
//! current zoom so they stay constant on screen once the renderer applies
//! [`TransformSnapshot`].

use super::interaction::InteractionController;
use super::scale::ScaledValues;
use super::theme::Color;
use super::types::NodeId;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot<'a> {
	pub id: &'a NodeId,
	pub label: &'a str,
	pub x: f64,
	pub y: f64,
	/// World-space radius: `(sqrt(degree * 20) + node_size) / k`.
	pub radius: f64,
	pub color: Color,
	pub opacity: f64,
	pub is_focused: bool,
	pub label_visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkSnapshot {
	pub source_x: f64,
	pub source_y: f64,
	pub target_x: f64,
	pub target_y: f64,
	pub opacity: f64,
	/// World-space stroke width that renders as a constant screen width.
	pub stroke_width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSnapshot {
	pub translate_x: f64,
	pub translate_y: f64,
	pub scale: f64,
}

impl InteractionController {
	/// Zoom-dependent sizes for the current frame.
	pub fn scaled_values(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.view.scale())
	}

	/// One entry per node, in input order.
	pub fn nodes_snapshot(&self) -> Vec<NodeSnapshot<'_>> {
		let scaled = self.scaled_values();
		self.simulation
			.nodes()
			.iter()
			.enumerate()
			.map(|(idx, node)| {
				let degree = self.index.degree(idx);
				let is_focused = self.highlight.is_focused(idx);
				NodeSnapshot {
					id: self.index.id_of(idx),
					label: &self.labels[idx],
					x: node.x,
					y: node.y,
					radius: scaled.node_radius(self.scale.node_radius(degree)),
					color: self.theme.node_color(degree, is_focused),
					opacity: self.highlight.node_opacity(idx, &self.index),
					is_focused,
					label_visible: self.highlight.label_visible(idx),
				}
			})
			.collect()
	}

	/// One entry per link, in input order.
	pub fn links_snapshot(&self) -> Vec<LinkSnapshot> {
		let stroke_width = self.scaled_values().edge_line_width;
		let nodes = self.simulation.nodes();
		self.index
			.links()
			.iter()
			.enumerate()
			.map(|(link, &(s, t))| LinkSnapshot {
				source_x: nodes[s].x,
				source_y: nodes[s].y,
				target_x: nodes[t].x,
				target_y: nodes[t].y,
				opacity: self.highlight.link_opacity(link, &self.index),
				stroke_width,
			})
			.collect()
	}

	/// Transform the renderer applies before drawing snapshots.
	pub fn transform(&self) -> TransformSnapshot {
		let t = self.view.current();
		TransformSnapshot {
			translate_x: t.x,
			translate_y: t.y,
			scale: t.k,
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::components::force_graph::config::GraphOptions;
	use crate::components::force_graph::interaction::InteractionController;
	use crate::components::force_graph::theme::Theme;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};
	use crate::components::force_graph::view::Transform;

	fn star() -> InteractionController {
		let data = GraphData {
			nodes: (0..6i64).map(GraphNode::new).collect(),
			links: (1..6i64).map(|i| GraphLink::new(0i64, i)).collect(),
		};
		InteractionController::new(&data, GraphOptions::default()).unwrap()
	}

	#[test]
	fn radius_and_stroke_follow_inverse_scale() {
		let mut c = star();
		let hub = c.nodes_snapshot()[0].radius;
		assert_eq!(hub, 100f64.sqrt() + 3.0);
		assert_eq!(c.nodes_snapshot()[1].radius, 20f64.sqrt() + 3.0);

		c.view.apply_delta(Transform {
			x: 0.0,
			y: 0.0,
			k: 4.0,
		});
		assert_eq!(c.nodes_snapshot()[0].radius, hub / 4.0);
		assert!(c.links_snapshot().iter().all(|l| l.stroke_width == 0.25));
		assert_eq!(c.transform().scale, 4.0);
		assert_eq!(c.scaled_values().label_font_size, 3.0);
	}

	#[test]
	fn colour_tracks_degree_and_focus() {
		let mut c = star();
		let theme = Theme::default();
		assert_eq!(c.nodes_snapshot()[0].color, theme.ramp.sample(5.0 / 20.0));
		c.focus(0);
		let nodes = c.nodes_snapshot();
		assert_eq!(nodes[0].color, theme.highlight);
		assert_eq!(nodes[1].color, theme.ramp.sample(1.0 / 20.0));
	}

	#[test]
	fn links_follow_node_positions() {
		let mut c = star();
		c.frame(0.0);
		let nodes = c.nodes_snapshot();
		let link = &c.links_snapshot()[2];
		assert_eq!((link.source_x, link.source_y), (nodes[0].x, nodes[0].y));
		assert_eq!((link.target_x, link.target_y), (nodes[3].x, nodes[3].y));
		assert_eq!(nodes[3].label, "3");
	}
}
