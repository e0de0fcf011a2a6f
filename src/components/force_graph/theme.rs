//! Visual theming for the force graph.
//!
//! Node colour comes from a perceptual ramp sampled at a degree-normalized
//! value; the focused node switches to a fixed highlight colour.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parse `#rrggbb`.
	pub const fn hex(v: u32) -> Self {
		Self::rgb((v >> 16) as u8, (v >> 8) as u8, v as u8)
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Piecewise-linear colour ramp over evenly spaced stops.
#[derive(Clone, Debug)]
pub struct ColorRamp {
	stops: Vec<Color>,
}

impl ColorRamp {
	/// Viridis, dark purple through green to yellow.
	pub fn viridis() -> Self {
		Self {
			stops: [
				0x440154, 0x482475, 0x414487, 0x355f8d, 0x2a788e, 0x21918c, 0x22a884, 0x44bf70,
				0x7ad151, 0xbddf26, 0xfde725,
			]
			.into_iter()
			.map(Color::hex)
			.collect(),
		}
	}

	/// Sample at `t`, clamped to [0, 1].
	pub fn sample(&self, t: f64) -> Color {
		let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
		let last = self.stops.len() - 1;
		let pos = t * last as f64;
		let i = (pos.floor() as usize).min(last.saturating_sub(1));
		if last == 0 {
			return self.stops[0];
		}
		self.stops[i].lerp(self.stops[i + 1], pos - i as f64)
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill.
	pub background: Color,
	/// Link stroke.
	pub edge: Color,
	/// Label text.
	pub label: Color,
	/// Fill for the focused node.
	pub highlight: Color,
	/// Node fill by degree.
	pub ramp: ColorRamp,
	/// Degree at which the ramp saturates.
	pub degree_scale: f64,
}

impl Theme {
	/// Light background, grey links, viridis nodes (default)
	pub fn default_theme() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			edge: Color::rgba(153, 153, 153, 0.6),
			label: Color::rgb(0, 0, 0),
			highlight: Color::hex(0xe15759),
			ramp: ColorRamp::viridis(),
			degree_scale: 20.0,
		}
	}

	/// Fill colour for a node of the given degree.
	pub fn node_color(&self, degree: usize, focused: bool) -> Color {
		if focused {
			self.highlight
		} else {
			self.ramp.sample(degree as f64 / self.degree_scale)
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ramp_endpoints_and_clamping() {
		let ramp = ColorRamp::viridis();
		assert_eq!(ramp.sample(0.0), Color::hex(0x440154));
		assert_eq!(ramp.sample(1.0), Color::hex(0xfde725));
		assert_eq!(ramp.sample(7.5), Color::hex(0xfde725));
		assert_eq!(ramp.sample(-1.0), Color::hex(0x440154));
		assert_eq!(ramp.sample(0.5), Color::hex(0x21918c));
	}

	#[test]
	fn focused_node_uses_highlight() {
		let theme = Theme::default();
		assert_eq!(theme.node_color(3, true).to_css(), "#e15759");
		assert_eq!(theme.node_color(40, false), Color::hex(0xfde725));
	}
}
