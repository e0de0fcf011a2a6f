//! Zoom-dependent sizing for graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: the graph's own coordinates. The renderer draws in this
//!   space after applying the view transform, so anything drawn here grows
//!   when zoomed in.
//! - **Screen-space**: canvas pixels. Node radii, stroke widths and label
//!   fonts are specified here and must look the same at every zoom level.
//!
//! [`ScaledValues`] converts the screen-space configuration into world-space
//! values for one zoom level by dividing by `k`.

/// Screen-space sizes for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Constant added to every node radius, in pixels.
	pub node_size: f64,
	/// Multiplier inside the degree term: `sqrt(degree * degree_weight)`.
	pub degree_weight: f64,
	/// Extra pick tolerance around each node, in pixels.
	pub hit_padding: f64,
	/// Link stroke width, in pixels.
	pub line_width: f64,
	/// Label font size, in pixels.
	pub label_size: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_size: 3.0,
			degree_weight: 20.0,
			hit_padding: 2.0,
			line_width: 1.0,
			label_size: 12.0,
		}
	}
}

impl ScaleConfig {
	pub fn with_node_size(node_size: f64) -> Self {
		Self {
			node_size,
			..Self::default()
		}
	}

	/// Node radius in screen pixels for the given degree.
	pub fn node_radius(&self, degree: usize) -> f64 {
		(degree as f64 * self.degree_weight).sqrt() + self.node_size
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame. All sizes are in world-space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Current zoom level.
	pub k: f64,
	/// `1 / k`.
	pub inverse: f64,
	pub edge_line_width: f64,
	pub label_font_size: f64,
	/// Label font string (e.g., "12px sans-serif").
	pub label_font: String,
	pub hit_padding: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.label_size / k;
		Self {
			k,
			inverse: 1.0 / k,
			edge_line_width: config.line_width / k,
			label_font_size,
			label_font: format!("{label_font_size}px sans-serif"),
			hit_padding: config.hit_padding / k,
		}
	}

	/// World-space radius for a node whose screen radius is `screen_radius`.
	pub fn node_radius(&self, screen_radius: f64) -> f64 {
		screen_radius / self.k
	}
}
