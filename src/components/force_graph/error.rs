//! Errors surfaced by graph construction and configuration.

use thiserror::Error;

use super::types::NodeId;

/// Everything that can go wrong loading a graph or its options.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
	/// A link endpoint names a node that is not in the node set.
	#[error("link {link} references unknown node {id}")]
	InvalidReference {
		/// Position of the offending link in the input.
		link: usize,
		/// The unresolved id.
		id: NodeId,
	},
	/// Two nodes share an id.
	#[error("node id {0} appears more than once")]
	DuplicateNode(NodeId),
	/// Lookup by raw id found nothing. Callers usually fold this into a bool.
	#[error("node {0} not found")]
	NodeNotFound(String),
	/// A [`GraphOptions`](super::config::GraphOptions) value is out of range.
	#[error("invalid option `{name}`: {reason}")]
	InvalidOption {
		/// JSON key of the option.
		name: &'static str,
		/// What is wrong with it.
		reason: String,
	},
}

pub type Result<T> = std::result::Result<T, GraphError>;
