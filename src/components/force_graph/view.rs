//! Pan and zoom transform applied to the entire graph view.
//!
//! Gestures (drag-pan, wheel) write the transform directly. Zoom buttons run a
//! [`Tween`] sampled by the same frame clock that drives the simulation; a new
//! request always replaces the one in flight.

/// Translation plus uniform scale: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Transform {
	pub const IDENTITY: Transform = Transform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// How the translation of a tween is derived while it runs.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Anchor {
	/// Interpolate translation linearly.
	Free,
	/// Keep this graph point under this screen point.
	Fixed { gx: f64, gy: f64, sx: f64, sy: f64 },
}

/// A timed interpolation between two transforms.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
	from: Transform,
	to: Transform,
	start_ms: f64,
	duration_ms: f64,
	anchor: Anchor,
}

impl Tween {
	fn sample(&self, now_ms: f64) -> (Transform, bool) {
		let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
		if t >= 1.0 {
			return (self.to, true);
		}
		let e = ease_cubic_in_out(t);
		// Geometric interpolation keeps zoom speed perceptually even.
		let k = self.from.k * (self.to.k / self.from.k).powf(e);
		let (x, y) = match self.anchor {
			Anchor::Free => (
				self.from.x + (self.to.x - self.from.x) * e,
				self.from.y + (self.to.y - self.from.y) * e,
			),
			Anchor::Fixed { gx, gy, sx, sy } => (sx - gx * k, sy - gy * k),
		};
		(Transform { x, y, k }, false)
	}
}

fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t * 2.0;
	if t <= 1.0 {
		t * t * t / 2.0
	} else {
		let t = t - 2.0;
		(t * t * t + 2.0) / 2.0
	}
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
	current: Transform,
	min_zoom: f64,
	max_zoom: f64,
	width: f64,
	height: f64,
	tween: Option<Tween>,
}

impl ViewTransform {
	pub fn new(min_zoom: f64, max_zoom: f64, width: f64, height: f64) -> Self {
		Self {
			current: Transform::IDENTITY,
			min_zoom,
			max_zoom,
			width,
			height,
			tween: None,
		}
	}

	pub fn current(&self) -> Transform {
		self.current
	}

	pub fn scale(&self) -> f64 {
		self.current.k
	}

	/// `1 / k`: multiply screen-constant sizes by this before drawing in
	/// graph space.
	pub fn inverse_scale(&self) -> f64 {
		1.0 / self.current.k
	}

	pub fn is_animating(&self) -> bool {
		self.tween.is_some()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn clamp_k(&self, k: f64) -> f64 {
		if k.is_finite() {
			k.clamp(self.min_zoom, self.max_zoom)
		} else {
			self.current.k
		}
	}

	/// Replace the transform from a gesture, clamping the scale. Cancels any
	/// running animation.
	pub fn apply_delta(&mut self, transform: Transform) {
		self.tween = None;
		self.current = Transform {
			k: self.clamp_k(transform.k),
			..transform
		};
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.apply_delta(Transform {
			x: self.current.x + dx,
			y: self.current.y + dy,
			k: self.current.k,
		});
	}

	/// Zoom by `factor` keeping the graph point under `(sx, sy)` in place.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let target = self.scaled_about(self.current, sx, sy, factor);
		self.apply_delta(target);
	}

	fn scaled_about(&self, from: Transform, sx: f64, sy: f64, factor: f64) -> Transform {
		let k = self.clamp_k(from.k * factor);
		let ratio = k / from.k;
		Transform {
			x: sx - (sx - from.x) * ratio,
			y: sy - (sy - from.y) * ratio,
			k,
		}
	}

	/// Animate a multiplicative zoom about the viewport centre.
	pub fn zoom_by(&mut self, factor: f64, duration_ms: f64, now_ms: f64) {
		self.sample(now_ms);
		let (sx, sy) = (self.width / 2.0, self.height / 2.0);
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let to = self.scaled_about(self.current, sx, sy, factor);
		self.start(to, duration_ms, now_ms, Anchor::Fixed { gx, gy, sx, sy });
	}

	/// Animate back to the identity transform.
	pub fn reset(&mut self, duration_ms: f64, now_ms: f64) {
		self.sample(now_ms);
		let to = Transform {
			k: self.clamp_k(1.0),
			..Transform::IDENTITY
		};
		self.start(to, duration_ms, now_ms, Anchor::Free);
	}

	fn start(&mut self, to: Transform, duration_ms: f64, now_ms: f64, anchor: Anchor) {
		if duration_ms <= 0.0 || !duration_ms.is_finite() {
			self.tween = None;
			self.current = to;
			return;
		}
		self.tween = Some(Tween {
			from: self.current,
			to,
			start_ms: now_ms,
			duration_ms,
			anchor,
		});
	}

	/// Advance any running animation to `now_ms`. Returns true while one is
	/// still in flight.
	pub fn sample(&mut self, now_ms: f64) -> bool {
		let Some(tween) = &self.tween else {
			return false;
		};
		let (t, done) = tween.sample(now_ms);
		self.current = t;
		if done {
			self.tween = None;
		}
		!done
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.current.x) / self.current.k,
			(sy - self.current.y) / self.current.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.current.k + self.current.x,
			gy * self.current.k + self.current.y,
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn view() -> ViewTransform {
		ViewTransform::new(0.1, 10.0, 800.0, 600.0)
	}

	#[test]
	fn zoom_by_then_inverse_restores_scale() {
		let mut v = view();
		v.zoom_by(1.5, 300.0, 0.0);
		v.sample(300.0);
		assert!((v.scale() - 1.5).abs() < 1e-12);
		v.zoom_by(1.0 / 1.5, 300.0, 400.0);
		assert!(!v.sample(700.0));
		assert!((v.scale() - 1.0).abs() < 1e-12);
		// Centre stays put, so translation is back at the origin too.
		assert!(v.current().x.abs() < 1e-9 && v.current().y.abs() < 1e-9);
	}

	#[test]
	fn zoom_keeps_viewport_centre_fixed_mid_animation() {
		let mut v = view();
		v.apply_delta(Transform {
			x: 40.0,
			y: -25.0,
			k: 2.0,
		});
		let before = v.screen_to_graph(400.0, 300.0);
		v.zoom_by(3.0, 300.0, 1000.0);
		assert!(v.sample(1120.0));
		let mid = v.screen_to_graph(400.0, 300.0);
		assert!((mid.0 - before.0).abs() < 1e-9 && (mid.1 - before.1).abs() < 1e-9);
		assert!(v.scale() > 2.0 && v.scale() < 6.0);
	}

	#[test]
	fn reset_returns_to_identity() {
		let mut v = view();
		v.apply_delta(Transform {
			x: 120.0,
			y: 80.0,
			k: 4.0,
		});
		v.reset(300.0, 0.0);
		assert!(v.is_animating());
		v.sample(150.0);
		assert!(v.scale() < 4.0 && v.scale() > 1.0);
		v.sample(300.0);
		assert_eq!(v.current(), Transform::IDENTITY);
		assert!(!v.is_animating());
	}

	#[test]
	fn newer_request_replaces_running_animation() {
		let mut v = view();
		v.zoom_by(1.5, 300.0, 0.0);
		v.sample(100.0);
		let mid = v.scale();
		v.reset(300.0, 100.0);
		v.sample(400.0);
		assert_eq!(v.current(), Transform::IDENTITY);
		assert!(mid > 1.0);
	}

	#[test]
	fn gesture_cancels_animation() {
		let mut v = view();
		v.zoom_by(2.0, 300.0, 0.0);
		v.pan_by(10.0, 0.0);
		assert!(!v.is_animating());
		assert!(!v.sample(1000.0));
	}

	#[test]
	fn zero_duration_applies_immediately() {
		let mut v = view();
		v.zoom_by(2.0, 0.0, 0.0);
		assert_eq!(v.scale(), 2.0);
		assert!(!v.is_animating());
	}

	#[test]
	fn wheel_zoom_keeps_pointer_anchored() {
		let mut v = view();
		let before = v.screen_to_graph(100.0, 50.0);
		v.zoom_at(100.0, 50.0, 1.1);
		let after = v.screen_to_graph(100.0, 50.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn screen_graph_round_trip() {
		let mut v = view();
		v.apply_delta(Transform {
			x: 13.0,
			y: 7.0,
			k: 0.5,
		});
		let (gx, gy) = v.screen_to_graph(200.0, 100.0);
		let (sx, sy) = v.graph_to_screen(gx, gy);
		assert!((sx - 200.0).abs() < 1e-9 && (sy - 100.0).abs() < 1e-9);
		assert_eq!(v.inverse_scale(), 2.0);
	}

	#[derive(Clone, Debug)]
	enum Op {
		ZoomBy(f64),
		ZoomAt(f64),
		Delta(f64),
		Reset,
	}

	fn op() -> impl Strategy<Value = Op> {
		prop_oneof![
			(0.01f64..100.0).prop_map(Op::ZoomBy),
			(0.01f64..100.0).prop_map(Op::ZoomAt),
			(-1000.0f64..1000.0).prop_map(Op::Delta),
			Just(Op::Reset),
		]
	}

	proptest! {
		#[test]
		fn scale_never_leaves_bounds(ops in prop::collection::vec(op(), 1..40)) {
			let mut v = view();
			let mut now = 0.0;
			for op in ops {
				match op {
					Op::ZoomBy(f) => v.zoom_by(f, 300.0, now),
					Op::ZoomAt(f) => v.zoom_at(400.0, 300.0, f),
					Op::Delta(k) => v.apply_delta(Transform { x: 0.0, y: 0.0, k }),
					Op::Reset => v.reset(300.0, now),
				}
				now += 120.0;
				v.sample(now);
				prop_assert!(v.scale() >= 0.1 - 1e-12 && v.scale() <= 10.0 + 1e-12);
			}
		}

		#[test]
		fn zoom_by_inverse_is_identity_within_bounds(start in 0.2f64..5.0, factor in 0.5f64..2.0) {
			let mut v = view();
			v.apply_delta(Transform { x: 0.0, y: 0.0, k: start });
			v.zoom_by(factor, 0.0, 0.0);
			v.zoom_by(1.0 / factor, 0.0, 0.0);
			prop_assert!((v.scale() - start).abs() < 1e-9);
		}
	}
}
