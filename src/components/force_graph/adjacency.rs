//! Precomputed node/link relationships for constant-time highlight queries.
//!
//! Built once from [`GraphData`] when a graph is loaded and never patched
//! afterwards. Link endpoints are normalized to dense node indices here, so
//! nothing downstream has to care whether the input carried bare ids or
//! embedded node objects.

use std::collections::{HashMap, HashSet};

use super::error::{GraphError, Result};
use super::types::{GraphData, NodeId};

#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	ids: Vec<NodeId>,
	id_to_idx: HashMap<NodeId, usize>,
	/// Normalized (source, target) per link, in input order.
	endpoints: Vec<(usize, usize)>,
	neighbors: Vec<HashSet<usize>>,
	incident: Vec<HashSet<usize>>,
}

impl AdjacencyIndex {
	/// Build the index in O(V + E). Fails if a link references a missing node.
	pub fn build(data: &GraphData) -> Result<Self> {
		let mut id_to_idx = HashMap::with_capacity(data.nodes.len());
		for (i, node) in data.nodes.iter().enumerate() {
			if id_to_idx.insert(node.id.clone(), i).is_some() {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
		}

		let mut neighbors = vec![HashSet::new(); data.nodes.len()];
		let mut incident = vec![HashSet::new(); data.nodes.len()];
		let mut endpoints = Vec::with_capacity(data.links.len());

		for (link, l) in data.links.iter().enumerate() {
			let resolve = |id: &NodeId| {
				id_to_idx
					.get(id)
					.copied()
					.ok_or_else(|| GraphError::InvalidReference {
						link,
						id: id.clone(),
					})
			};
			let src = resolve(l.source.id())?;
			let tgt = resolve(l.target.id())?;

			neighbors[src].insert(tgt);
			neighbors[tgt].insert(src);
			incident[src].insert(link);
			incident[tgt].insert(link);
			endpoints.push((src, tgt));
		}

		Ok(Self {
			ids: data.nodes.iter().map(|n| n.id.clone()).collect(),
			id_to_idx,
			endpoints,
			neighbors,
			incident,
		})
	}

	pub fn node_count(&self) -> usize {
		self.ids.len()
	}

	pub fn link_count(&self) -> usize {
		self.endpoints.len()
	}

	pub fn index_of(&self, id: &NodeId) -> Option<usize> {
		self.id_to_idx.get(id).copied()
	}

	pub fn id_of(&self, idx: usize) -> &NodeId {
		&self.ids[idx]
	}

	pub fn neighbors_of(&self, idx: usize) -> &HashSet<usize> {
		&self.neighbors[idx]
	}

	/// Indices (into the link list) of every link touching `idx`.
	pub fn links_of(&self, idx: usize) -> &HashSet<usize> {
		&self.incident[idx]
	}

	/// Neighbor identities of the node with the given id.
	pub fn neighbor_ids(&self, id: &NodeId) -> Option<HashSet<&NodeId>> {
		let idx = self.index_of(id)?;
		Some(self.neighbors[idx].iter().map(|&n| &self.ids[n]).collect())
	}

	/// Number of distinct neighbors.
	pub fn degree(&self, idx: usize) -> usize {
		self.neighbors[idx].len()
	}

	pub fn link_endpoints(&self, link: usize) -> (usize, usize) {
		self.endpoints[link]
	}

	pub fn links(&self) -> &[(usize, usize)] {
		&self.endpoints
	}

	/// Whether `link` touches node `idx`.
	pub fn is_incident(&self, idx: usize, link: usize) -> bool {
		self.incident[idx].contains(&link)
	}
}
