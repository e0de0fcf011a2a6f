//! graph-explorer: interactive force-directed graph exploration in the browser.
//!
//! This crate provides a WASM-based graph view with a d3-style force layout,
//! drag-to-pin nodes, animated zoom, and neighbourhood highlighting. The
//! layout and interaction engine under [`components::force_graph`] is plain
//! Rust; only the canvas component touches the DOM.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	ForceGraphCanvas, GraphData, GraphError, GraphLink, GraphNode, GraphOptions,
	InteractionController, NodeId,
};

use components::force_graph::demo_graph;

/// Seed for the demo graph shown when the page carries no data.
const DEMO_SEED: u64 = 0x5eed;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("graph-explorer: logging initialized");
}

/// Parse the JSON body of `<script id="{id}">`, if present.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("graph-explorer: failed to parse #{id}: {e}");
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let data = load_script_json::<GraphData>("graph-data")?;
	info!(
		"graph-explorer: loaded {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Some(data)
}

/// Load layout options from a script element with id="graph-options".
fn load_options() -> GraphOptions {
	load_script_json("graph-options").unwrap_or_default()
}

/// Main application component.
/// Loads graph data from DOM, or a generated demo graph, and renders it.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_else(|| {
		info!("graph-explorer: no graph data on page, generating demo graph");
		demo_graph(DEMO_SEED)
	});
	let graph_signal = Signal::derive(move || graph_data.clone());
	let options = load_options();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas data=graph_signal options=options fullscreen=true />
			<div class="graph-overlay">
				<p class="subtitle">
					"Drag nodes to move them. Double-click to pin. Scroll or use the buttons to zoom."
				</p>
			</div>
		</div>
	}
}
