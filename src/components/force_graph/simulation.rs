//! Iterative force-directed layout.
//!
//! Each tick cools `alpha`, lets every force add a velocity delta, then
//! integrates positions with velocity decay. Forces, in order:
//!
//! 1. Link springs toward `link_distance`, weighted so hub endpoints move less.
//! 2. Many-body charge, Barnes–Hut approximated above [`EXACT_CHARGE_LIMIT`] nodes.
//! 3. Centroid centering toward the viewport centre.
//! 4. Per-axis anchoring toward the viewport centre.
//!
//! Nodes with `fx`/`fy` set are held there and accumulate no velocity.

use std::f64::consts::PI;

use log::{debug, info};

use super::adjacency::AdjacencyIndex;
use super::quadtree::{QuadTree, repulse};
use super::types::GraphNode;

/// Graphs smaller than this use exact pairwise repulsion.
pub const EXACT_CHARGE_LIMIT: usize = 64;

const ALPHA_MIN: f64 = 0.001;
const VELOCITY_DECAY: f64 = 0.4;
const AXIS_STRENGTH: f64 = 0.1;
const THETA: f64 = 0.9;
const INITIAL_RADIUS: f64 = 10.0;
/// Smallest link length used as a divisor.
const LINK_EPSILON: f64 = 1e-9;

/// Simulated state of one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned x; overrides simulated motion while set.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
	/// User intent to keep the node pinned after a drag ends.
	pub fixed: bool,
}

impl SimNode {
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Force parameters. Built from [`GraphOptions`](super::config::GraphOptions)
/// by the controller.
#[derive(Clone, Debug)]
pub struct SimulationParams {
	pub link_distance: f64,
	/// Many-body strength; negative values repel.
	pub charge: f64,
	pub center_strength: f64,
	pub center_x: f64,
	pub center_y: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			link_distance: 30.0,
			charge: -30.0,
			center_strength: 0.1,
			center_x: 0.0,
			center_y: 0.0,
		}
	}
}

/// Deterministic linear congruential generator used for jiggling
/// coincident points apart.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A.wrapping_mul(self.0).wrapping_add(Self::C)) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

pub struct ForceSimulation {
	nodes: Vec<SimNode>,
	links: Vec<(usize, usize)>,
	link_strength: Vec<f64>,
	link_bias: Vec<f64>,
	params: SimulationParams,
	alpha: f64,
	alpha_decay: f64,
	alpha_target: f64,
	running: bool,
	ticks: u64,
	rng: Lcg,
}

impl ForceSimulation {
	pub fn new(nodes: &[GraphNode], index: &AdjacencyIndex, params: SimulationParams) -> Self {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		let sim_nodes = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				let x = node
					.x
					.unwrap_or(params.center_x + radius * angle.cos());
				let y = node
					.y
					.unwrap_or(params.center_y + radius * angle.sin());
				SimNode {
					x,
					y,
					fx: node.fixed.then_some(x),
					fy: node.fixed.then_some(y),
					fixed: node.fixed,
					..SimNode::default()
				}
			})
			.collect();

		// Link incidences per node; duplicate links count separately.
		let links = index.links().to_vec();
		let mut count = vec![0usize; nodes.len()];
		for &(s, t) in &links {
			count[s] += 1;
			count[t] += 1;
		}
		let link_strength = links
			.iter()
			.map(|&(s, t)| 1.0 / count[s].min(count[t]) as f64)
			.collect();
		let link_bias = links
			.iter()
			.map(|&(s, t)| count[s] as f64 / (count[s] + count[t]) as f64)
			.collect();

		Self {
			nodes: sim_nodes,
			links,
			link_strength,
			link_bias,
			params,
			alpha: 1.0,
			alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / 300.0),
			alpha_target: 0.0,
			running: true,
			ticks: 0,
			rng: Lcg(1),
		}
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, idx: usize) -> &SimNode {
		&self.nodes[idx]
	}

	pub fn node_mut(&mut self, idx: usize) -> &mut SimNode {
		&mut self.nodes[idx]
	}

	pub fn params(&self) -> &SimulationParams {
		&self.params
	}

	/// Pin a node at `(x, y)`. Takes effect on the next tick.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		let node = &mut self.nodes[idx];
		node.fx = Some(x);
		node.fy = Some(y);
	}

	/// Let a node move freely again.
	pub fn unpin(&mut self, idx: usize) {
		let node = &mut self.nodes[idx];
		node.fx = None;
		node.fy = None;
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Value `alpha` relaxes toward each tick.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	/// True once `alpha` has dropped below the floor and ticking has stopped.
	pub fn is_settled(&self) -> bool {
		!self.running
	}

	/// Resume ticking without touching `alpha`.
	pub fn restart(&mut self) {
		if !self.running {
			debug!("simulation restarted at alpha {:.4}", self.alpha);
		}
		self.running = true;
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.params.center_x = x;
		self.params.center_y = y;
	}

	/// Advance one tick if the simulation is still running. Returns whether a
	/// tick happened.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < ALPHA_MIN {
			self.running = false;
			info!("simulation settled after {} ticks", self.ticks);
		}
		true
	}

	/// Advance exactly one tick regardless of `alpha`.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		self.ticks += 1;

		self.apply_links();
		self.apply_charge();
		self.apply_centering();
		self.apply_axes();

		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= 1.0 - VELOCITY_DECAY;
					if !node.vx.is_finite() {
						node.vx = 0.0;
					}
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= 1.0 - VELOCITY_DECAY;
					if !node.vy.is_finite() {
						node.vy = 0.0;
					}
					node.y += node.vy;
				}
			}
		}
	}

	fn apply_links(&mut self) {
		let distance = self.params.link_distance;
		for (i, &(s, t)) in self.links.iter().enumerate() {
			let (src, tgt) = (&self.nodes[s], &self.nodes[t]);
			let mut x = tgt.x + tgt.vx - src.x - src.vx;
			let mut y = tgt.y + tgt.vy - src.y - src.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let l = (x * x + y * y).sqrt().max(LINK_EPSILON);
			let l = (l - distance) / l * self.alpha * self.link_strength[i];
			let (x, y) = (x * l, y * l);
			let b = self.link_bias[i];

			let tgt = &mut self.nodes[t];
			tgt.vx -= x * b;
			tgt.vy -= y * b;
			let src = &mut self.nodes[s];
			src.vx += x * (1.0 - b);
			src.vy += y * (1.0 - b);
		}
	}

	fn apply_charge(&mut self) {
		if self.params.charge == 0.0 || self.nodes.len() < 2 {
			return;
		}
		let positions: Vec<(f64, f64)> = self.nodes.iter().map(|n| (n.x, n.y)).collect();
		let (charge, alpha) = (self.params.charge, self.alpha);
		let rng = &mut self.rng;
		let mut jiggle = || rng.jiggle();

		if positions.len() < EXACT_CHARGE_LIMIT {
			for (i, node) in self.nodes.iter_mut().enumerate() {
				let (x, y) = positions[i];
				for (j, &(px, py)) in positions.iter().enumerate() {
					if i == j {
						continue;
					}
					let (vx, vy) = repulse(px - x, py - y, charge, alpha, &mut jiggle);
					node.vx += vx;
					node.vy += vy;
				}
			}
		} else {
			let tree = QuadTree::build(&positions, charge);
			for (i, node) in self.nodes.iter_mut().enumerate() {
				let (vx, vy) = tree.force_on(i, THETA, alpha, &mut jiggle);
				node.vx += vx;
				node.vy += vy;
			}
		}
	}

	fn apply_centering(&mut self) {
		if self.nodes.is_empty() || self.params.center_strength == 0.0 {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let dx = (sx / n - self.params.center_x) * self.params.center_strength;
		let dy = (sy / n - self.params.center_y) * self.params.center_strength;
		for node in &mut self.nodes {
			node.vx -= dx;
			node.vy -= dy;
		}
	}

	fn apply_axes(&mut self) {
		let k = AXIS_STRENGTH * self.alpha;
		let (cx, cy) = (self.params.center_x, self.params.center_y);
		for node in &mut self.nodes {
			node.vx += (cx - node.x) * k;
			node.vy += (cy - node.y) * k;
		}
	}
}
