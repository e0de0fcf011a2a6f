//! Barnes–Hut quadtree for the many-body (charge) force.
//!
//! Cells are stored in a flat arena. Each cell carries the summed charge of
//! the points below it and their charge-weighted centre, so a distant cell can
//! stand in for all of its points when computing repulsion.

/// Squared distance floor applied to every charge interaction.
pub const DISTANCE_MIN2: f64 = 1.0;

/// Past this depth points share a leaf instead of splitting further.
const MAX_DEPTH: u32 = 32;

#[derive(Clone, Debug)]
struct Cell {
	x0: f64,
	y0: f64,
	size: f64,
	children: [Option<usize>; 4],
	/// Point indices held directly (leaf cells only).
	points: Vec<usize>,
	strength: f64,
	cx: f64,
	cy: f64,
}

impl Cell {
	fn new(x0: f64, y0: f64, size: f64) -> Self {
		Self {
			x0,
			y0,
			size,
			children: [None; 4],
			points: Vec::new(),
			strength: 0.0,
			cx: 0.0,
			cy: 0.0,
		}
	}

	fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	fn quadrant(&self, x: f64, y: f64) -> usize {
		let half = self.size / 2.0;
		let right = (x >= self.x0 + half) as usize;
		let bottom = (y >= self.y0 + half) as usize;
		bottom << 1 | right
	}
}

/// Spatial index over a snapshot of node positions.
#[derive(Clone, Debug)]
pub struct QuadTree {
	cells: Vec<Cell>,
	positions: Vec<(f64, f64)>,
	charge: f64,
}

impl QuadTree {
	/// Build a tree over `positions`, every point carrying the same `charge`.
	pub fn build(positions: &[(f64, f64)], charge: f64) -> Self {
		let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
		let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in positions {
			x0 = x0.min(x);
			y0 = y0.min(y);
			x1 = x1.max(x);
			y1 = y1.max(y);
		}
		if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
			(x0, y0, x1, y1) = (0.0, 0.0, 1.0, 1.0);
		}
		let size = (x1 - x0).max(y1 - y0).max(1.0);

		let mut tree = Self {
			cells: vec![Cell::new(x0, y0, size)],
			positions: positions.to_vec(),
			charge,
		};
		for i in 0..positions.len() {
			tree.insert(i);
		}
		tree.accumulate(0);
		tree
	}

	fn insert(&mut self, point: usize) {
		let (x, y) = self.positions[point];
		let mut cell = 0;
		let mut depth = 0;
		loop {
			if self.cells[cell].is_leaf() {
				let occupied = !self.cells[cell].points.is_empty();
				let coincident = self.cells[cell]
					.points
					.first()
					.is_some_and(|&p| self.positions[p] == (x, y));
				if !occupied || coincident || depth >= MAX_DEPTH {
					self.cells[cell].points.push(point);
					return;
				}
				// Split: push the resident points one level down.
				let resident = std::mem::take(&mut self.cells[cell].points);
				let q = {
					let (rx, ry) = self.positions[resident[0]];
					self.cells[cell].quadrant(rx, ry)
				};
				let child = self.child(cell, q);
				self.cells[child].points = resident;
			}
			let q = self.cells[cell].quadrant(x, y);
			cell = self.child(cell, q);
			depth += 1;
		}
	}

	fn child(&mut self, cell: usize, q: usize) -> usize {
		if let Some(c) = self.cells[cell].children[q] {
			return c;
		}
		let parent = &self.cells[cell];
		let half = parent.size / 2.0;
		let x0 = parent.x0 + if q & 1 == 1 { half } else { 0.0 };
		let y0 = parent.y0 + if q & 2 == 2 { half } else { 0.0 };
		self.cells.push(Cell::new(x0, y0, half));
		let idx = self.cells.len() - 1;
		self.cells[cell].children[q] = Some(idx);
		idx
	}

	fn accumulate(&mut self, cell: usize) {
		let (mut strength, mut weight, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0);
		if self.cells[cell].is_leaf() {
			for &p in &self.cells[cell].points {
				let (x, y) = self.positions[p];
				strength += self.charge;
				weight += 1.0;
				sx += x;
				sy += y;
			}
		} else {
			for q in 0..4 {
				let Some(c) = self.cells[cell].children[q] else {
					continue;
				};
				self.accumulate(c);
				let child = &self.cells[c];
				let w = if self.charge != 0.0 {
					child.strength.abs()
				} else {
					child.points.len().max(1) as f64
				};
				strength += child.strength;
				weight += w;
				sx += child.cx * w;
				sy += child.cy * w;
			}
		}
		let c = &mut self.cells[cell];
		c.strength = strength;
		if weight > 0.0 {
			c.cx = sx / weight;
			c.cy = sy / weight;
		} else {
			c.cx = c.x0 + c.size / 2.0;
			c.cy = c.y0 + c.size / 2.0;
		}
	}

	/// Velocity delta on `point` from every other point, approximating cells
	/// whose width over distance is below `theta`.
	pub fn force_on(
		&self,
		point: usize,
		theta: f64,
		alpha: f64,
		jiggle: &mut dyn FnMut() -> f64,
	) -> (f64, f64) {
		let (x, y) = self.positions[point];
		let theta2 = theta * theta;
		let (mut fx, mut fy) = (0.0, 0.0);
		let mut stack = vec![0usize];

		while let Some(idx) = stack.pop() {
			let cell = &self.cells[idx];
			if cell.strength == 0.0 {
				continue;
			}
			let (dx, dy) = (cell.cx - x, cell.cy - y);
			let l = dx * dx + dy * dy;

			if !cell.is_leaf() && cell.size * cell.size / theta2 < l {
				let (vx, vy) = repulse(dx, dy, cell.strength, alpha, jiggle);
				fx += vx;
				fy += vy;
				continue;
			}
			if !cell.is_leaf() {
				stack.extend(cell.children.iter().flatten().copied());
				continue;
			}
			for &p in &cell.points {
				if p == point {
					continue;
				}
				let (px, py) = self.positions[p];
				let (vx, vy) = repulse(px - x, py - y, self.charge, alpha, jiggle);
				fx += vx;
				fy += vy;
			}
		}
		(fx, fy)
	}
}

/// One charge interaction. `(dx, dy)` points from the affected node to the
/// source. Zero offsets are jiggled and the squared distance is floored at
/// [`DISTANCE_MIN2`].
pub fn repulse(
	mut dx: f64,
	mut dy: f64,
	strength: f64,
	alpha: f64,
	jiggle: &mut dyn FnMut() -> f64,
) -> (f64, f64) {
	let mut l = dx * dx + dy * dy;
	if dx == 0.0 {
		dx = jiggle();
		l += dx * dx;
	}
	if dy == 0.0 {
		dy = jiggle();
		l += dy * dy;
	}
	if l < DISTANCE_MIN2 {
		l = (DISTANCE_MIN2 * l).sqrt();
	}
	let w = strength * alpha / l;
	(dx * w, dy * w)
}
