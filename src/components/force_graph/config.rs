//! Host-supplied configuration.
//!
//! Every field is optional in JSON (camelCase keys); missing fields take the
//! defaults below. Viewport size falls back to whatever the host measures.

use serde::Deserialize;

use super::error::{GraphError, Result};
use super::simulation::SimulationParams;

/// Layout, zoom and viewport settings read from `<script id="graph-options">`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
	/// Base node radius in screen pixels, before the degree term.
	pub node_size: f64,
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Many-body strength; negative repels.
	pub charge: f64,
	/// Pull of the node centroid toward the viewport centre, in [0, 1].
	pub center_strength: f64,
	/// Lower zoom bound, > 0.
	pub min_zoom: f64,
	/// Upper zoom bound, >= `min_zoom`.
	pub max_zoom: f64,
	/// Viewport width; measured by the host when absent.
	#[serde(alias = "viewportWidth")]
	pub width: Option<f64>,
	/// Viewport height; measured by the host when absent.
	#[serde(alias = "viewportHeight")]
	pub height: Option<f64>,
	/// Zoom-in button factor.
	pub zoom_in_factor: f64,
	/// Zoom-out button factor.
	pub zoom_out_factor: f64,
	/// Duration of animated zoom and reset.
	pub transition_ms: f64,
}

impl Default for GraphOptions {
	fn default() -> Self {
		Self {
			node_size: 3.0,
			link_distance: 30.0,
			charge: -30.0,
			center_strength: 0.1,
			min_zoom: 0.1,
			max_zoom: 10.0,
			width: None,
			height: None,
			zoom_in_factor: 1.5,
			zoom_out_factor: 0.667,
			transition_ms: 300.0,
		}
	}
}

impl GraphOptions {
	/// Fill in the viewport size when the host did not configure one.
	pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
		self.width.get_or_insert(width);
		self.height.get_or_insert(height);
		self
	}

	/// Configured size, or 800×600.
	pub fn viewport(&self) -> (f64, f64) {
		(self.width.unwrap_or(800.0), self.height.unwrap_or(600.0))
	}

	/// Reject non-finite numbers and out-of-range zoom, centering and size.
	pub fn validate(&self) -> Result<()> {
		let finite = [
			("nodeSize", self.node_size),
			("linkDistance", self.link_distance),
			("charge", self.charge),
			("centerStrength", self.center_strength),
			("minZoom", self.min_zoom),
			("maxZoom", self.max_zoom),
			("zoomInFactor", self.zoom_in_factor),
			("zoomOutFactor", self.zoom_out_factor),
			("transitionMs", self.transition_ms),
		];
		for (name, value) in finite {
			if !value.is_finite() {
				return Err(invalid(name, format!("{value} is not finite")));
			}
		}
		if self.min_zoom <= 0.0 {
			return Err(invalid("minZoom", "must be positive".into()));
		}
		if self.min_zoom > self.max_zoom {
			return Err(invalid(
				"maxZoom",
				format!("{} is below minZoom {}", self.max_zoom, self.min_zoom),
			));
		}
		// Centering is a velocity nudge; above 1 it overshoots the centre.
		if !(0.0..=1.0).contains(&self.center_strength) {
			return Err(invalid(
				"centerStrength",
				format!("{} is outside [0, 1]", self.center_strength),
			));
		}
		if self.zoom_in_factor <= 0.0 || self.zoom_out_factor <= 0.0 {
			return Err(invalid("zoomInFactor", "zoom factors must be positive".into()));
		}
		for (name, value) in [("width", self.width), ("height", self.height)] {
			if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
				return Err(invalid(name, "must be a positive size".into()));
			}
		}
		Ok(())
	}

	/// Force parameters centred on the viewport.
	pub fn simulation_params(&self) -> SimulationParams {
		let (w, h) = self.viewport();
		SimulationParams {
			link_distance: self.link_distance,
			charge: self.charge,
			center_strength: self.center_strength,
			center_x: w / 2.0,
			center_y: h / 2.0,
		}
	}
}

fn invalid(name: &'static str, reason: String) -> GraphError {
	GraphError::InvalidOption { name, reason }
}
