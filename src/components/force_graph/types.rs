//! Graph data structures for input to the force graph component.

use std::fmt;

use serde::Deserialize;

/// Identity of a node. Graph JSON may key nodes by number or by string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
	/// Numeric id, as produced by the demo generator.
	Int(i64),
	/// Any other JSON string id.
	Text(String),
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeId::Int(n) => write!(f, "{n}"),
			NodeId::Text(s) => f.write_str(s),
		}
	}
}

impl From<i64> for NodeId {
	fn from(n: i64) -> Self {
		NodeId::Int(n)
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		NodeId::Text(s.to_string())
	}
}

impl From<String> for NodeId {
	fn from(s: String) -> Self {
		NodeId::Text(s)
	}
}

/// One end of a link: either a bare id or an embedded node object carrying one.
///
/// Only the adjacency index looks at this; everything downstream works on
/// normalized node indices.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LinkEnd {
	/// `"source": 3`
	Id(NodeId),
	/// `"source": {"id": 3, ...}`; extra fields are ignored.
	Node {
		/// Id of the embedded node.
		id: NodeId,
	},
}

impl LinkEnd {
	/// The referenced node id, whichever form the link used.
	pub fn id(&self) -> &NodeId {
		match self {
			LinkEnd::Id(id) | LinkEnd::Node { id } => id,
		}
	}
}

impl From<NodeId> for LinkEnd {
	fn from(id: NodeId) -> Self {
		LinkEnd::Id(id)
	}
}

impl From<i64> for LinkEnd {
	fn from(n: i64) -> Self {
		LinkEnd::Id(NodeId::Int(n))
	}
}

impl From<&str> for LinkEnd {
	fn from(s: &str) -> Self {
		LinkEnd::Id(NodeId::from(s))
	}
}

/// A node in the graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: NodeId,
	/// Optional display name. Labels fall back to the id.
	#[serde(default)]
	pub name: Option<String>,
	/// Optional starting position; the simulation seeds a spiral otherwise.
	#[serde(default)]
	pub x: Option<f64>,
	/// Optional starting y; see `x`.
	#[serde(default)]
	pub y: Option<f64>,
	/// Start pinned at the initial position.
	#[serde(default)]
	pub fixed: bool,
}

impl GraphNode {
	/// Unnamed, unpinned node with no preset position.
	pub fn new(id: impl Into<NodeId>) -> Self {
		Self {
			id: id.into(),
			name: None,
			x: None,
			y: None,
			fixed: false,
		}
	}

	/// Text shown next to the node when it is focused.
	pub fn label(&self) -> String {
		self.name.clone().unwrap_or_else(|| self.id.to_string())
	}
}

/// An edge between two nodes. Direction is kept but ignored for adjacency.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Source node (id or embedded node).
	pub source: LinkEnd,
	/// Target node (id or embedded node).
	pub target: LinkEnd,
}

impl GraphLink {
	/// Link between two ids.
	pub fn new(source: impl Into<LinkEnd>, target: impl Into<LinkEnd>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
		}
	}
}

/// Complete graph data: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Nodes; ids must be unique.
	pub nodes: Vec<GraphNode>,
	/// Links; every endpoint must name a node in `nodes`.
	pub links: Vec<GraphLink>,
}
