//! Adjacency-driven highlight state.
//!
//! A single optional focus is stored. Opacities and label visibility are
//! derived from it on demand, so a frame never observes a half-applied
//! highlight when focus changes quickly. Hover and search both write the same
//! focus; the last write wins.

use super::adjacency::AdjacencyIndex;

/// Opacity of elements outside the focused node's neighbourhood.
pub const DIMMED_OPACITY: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
	focused: Option<usize>,
}

impl HighlightState {
	pub fn focused(&self) -> Option<usize> {
		self.focused
	}

	pub fn set(&mut self, node: usize) {
		self.focused = Some(node);
	}

	pub fn clear(&mut self) {
		self.focused = None;
	}

	pub fn is_focused(&self, node: usize) -> bool {
		self.focused == Some(node)
	}

	/// 1.0 for the focused node and its neighbours (or everything when
	/// nothing is focused), [`DIMMED_OPACITY`] otherwise.
	pub fn node_opacity(&self, node: usize, index: &AdjacencyIndex) -> f64 {
		match self.focused {
			None => 1.0,
			Some(f) if f == node || index.neighbors_of(f).contains(&node) => 1.0,
			Some(_) => DIMMED_OPACITY,
		}
	}

	pub fn link_opacity(&self, link: usize, index: &AdjacencyIndex) -> f64 {
		match self.focused {
			None => 1.0,
			Some(f) if index.is_incident(f, link) => 1.0,
			Some(_) => DIMMED_OPACITY,
		}
	}

	/// Only the focused node shows its label.
	pub fn label_visible(&self, node: usize) -> bool {
		self.is_focused(node)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};

	fn index(nodes: &[i64], links: &[(i64, i64)]) -> AdjacencyIndex {
		AdjacencyIndex::build(&GraphData {
			nodes: nodes.iter().map(|&n| GraphNode::new(n)).collect(),
			links: links.iter().map(|&(s, t)| GraphLink::new(s, t)).collect(),
		})
		.unwrap()
	}

	#[test]
	fn unfocused_everything_is_opaque() {
		let idx = index(&[1, 2, 3], &[(1, 2)]);
		let h = HighlightState::default();
		assert!((0..3).all(|n| h.node_opacity(n, &idx) == 1.0 && !h.label_visible(n)));
		assert_eq!(h.link_opacity(0, &idx), 1.0);
	}

	#[test]
	fn focus_dims_outside_neighbourhood() {
		let idx = index(&[1, 2, 3, 4], &[(1, 2), (3, 4)]);
		let mut h = HighlightState::default();
		h.set(0);
		assert_eq!(h.node_opacity(0, &idx), 1.0);
		assert_eq!(h.node_opacity(1, &idx), 1.0);
		assert_eq!(h.node_opacity(2, &idx), DIMMED_OPACITY);
		assert_eq!(h.link_opacity(0, &idx), 1.0);
		assert_eq!(h.link_opacity(1, &idx), DIMMED_OPACITY);
		assert!(h.label_visible(0) && !h.label_visible(1));
	}

	#[test]
	fn last_write_wins() {
		let mut h = HighlightState::default();
		h.set(2);
		h.set(0);
		assert_eq!(h.focused(), Some(0));
		h.clear();
		assert_eq!(h, HighlightState::default());
	}
}
