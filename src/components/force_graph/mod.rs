//! Force-directed graph layout and interaction.
//!
//! Renders an interactive force-directed graph on an HTML canvas with:
//! - Physics-based node positioning via a d3-style force simulation
//! - Pan, zoom buttons, and node drag-to-pin
//! - Neighbourhood highlighting on hover or search
//! - Configurable theming and zoom-independent sizing
//!
//! Everything except [`ForceGraphCanvas`] and the canvas painter is plain
//! Rust and runs without a browser.
//!
//! # Example
//!
//! ```ignore
//! use graph_explorer::{ForceGraphCanvas, GraphData, GraphLink, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("a"), GraphNode::new("b")],
//!     links: vec![GraphLink::new("a", "b")],
//! };
//!
//! view! { <ForceGraphCanvas data=data fullscreen=true /> }
//! ```

mod adjacency;
mod component;
mod config;
mod error;
mod generate;
mod highlight;
mod interaction;
mod quadtree;
mod render;
mod scale;
mod simulation;
mod snapshot;
mod theme;
mod types;
mod view;

pub use component::ForceGraphCanvas;
pub use config::GraphOptions;
pub use error::GraphError;
pub use generate::{demo_graph, random_graph};
pub use highlight::DIMMED_OPACITY;
pub use interaction::InteractionController;
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, LinkEnd, NodeId};
