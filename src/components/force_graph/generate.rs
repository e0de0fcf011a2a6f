//! Random demo graphs.
//!
//! Used by the host when the page carries no graph data. Each node links to
//! up to `max_links` distinct random targets, never to itself and never to a
//! node it is already linked with in either direction.

use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::types::{GraphData, GraphLink, GraphNode, NodeId};

/// Node count of the built-in demo graph.
pub const DEMO_NODES: usize = 1024;
/// Maximum links each demo node starts.
pub const DEMO_MAX_LINKS: usize = 5;

/// `node_count` nodes named `"Node i"`, each starting up to `max_links` links.
pub fn random_graph<R: Rng + ?Sized>(node_count: usize, max_links: usize, rng: &mut R) -> GraphData {
	let nodes = (0..node_count)
		.map(|i| GraphNode {
			name: Some(format!("Node {i}")),
			..GraphNode::new(i as i64)
		})
		.collect();

	let mut linked: HashSet<(usize, usize)> = HashSet::new();
	let mut links = Vec::new();
	for source in 0..node_count {
		let wanted = rng.gen_range(0..=max_links);
		let mut candidates: Vec<usize> = (0..node_count)
			.filter(|&t| t != source && !linked.contains(&(source.min(t), source.max(t))))
			.collect();
		candidates.shuffle(rng);
		for target in candidates.into_iter().take(wanted) {
			linked.insert((source.min(target), source.max(target)));
			links.push(GraphLink::new(NodeId::Int(source as i64), NodeId::Int(target as i64)));
		}
	}

	GraphData { nodes, links }
}

/// The demo graph, reproducible from `seed`.
pub fn demo_graph(seed: u64) -> GraphData {
	random_graph(DEMO_NODES, DEMO_MAX_LINKS, &mut StdRng::seed_from_u64(seed))
}
