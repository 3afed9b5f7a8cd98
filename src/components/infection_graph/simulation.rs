//! Force layout for the case graph.
//!
//! `force_graph` integrates charge repulsion and a weak spring. On top of
//! each integration step this module runs three position passes in the
//! manner of d3-force: links pulled toward a rest distance, collision
//! separation, and centring. A d3-style energy ("alpha") scales each step and
//! stops the loop once it has decayed.

use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::debug;

use super::config::{ForceConfig, GraphConfig};
use super::geometry::Point;
use super::types::Dataset;

const INITIAL_RADIUS: f64 = 100.0;
const NODE_MASS: f32 = 10.0;

/// Payload carried by every `force_graph` node.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub case: usize,
}

/// Position snapshot the passes work on, indexed by case.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub pinned: bool,
}

pub struct Simulation {
	graph: ForceGraph<NodeInfo, ()>,
	nodes: Vec<DefaultNodeIdx>,
	links: Vec<(usize, usize)>,
	degree: Vec<usize>,
	forces: ForceConfig,
	center: Point,
	alpha: f64,
	alpha_target: f64,
	running: bool,
}

impl Simulation {
	pub fn new(data: &Dataset, config: &GraphConfig) -> Self {
		let mut graph = ForceGraph::new(config.forces.simulation_parameters());
		let center = config.center();
		let count = data.cases.len().max(1) as f64;

		let nodes: Vec<DefaultNodeIdx> = (0..data.cases.len())
			.map(|case| {
				let angle = (case as f64) * 2.0 * PI / count;
				graph.add_node(NodeData {
					x: (center.0 + INITIAL_RADIUS * angle.cos()) as f32,
					y: (center.1 + INITIAL_RADIUS * angle.sin()) as f32,
					mass: NODE_MASS,
					is_anchor: false,
					user_data: NodeInfo { case },
				})
			})
			.collect();

		let mut degree = vec![0; nodes.len()];
		let mut links = Vec::with_capacity(data.links.len());
		for link in data.links.iter().filter(|l| l.source != l.target) {
			graph.add_edge(nodes[link.source], nodes[link.target], EdgeData::default());
			degree[link.source] += 1;
			degree[link.target] += 1;
			links.push((link.source, link.target));
		}
		debug!(
			"simulation built with {} nodes and {} links",
			nodes.len(),
			links.len()
		);

		Self {
			graph,
			nodes,
			links,
			degree,
			forces: config.forces.clone(),
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
		}
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn restart(&mut self) {
		if !self.running {
			debug!("simulation restarted at alpha {:.4}", self.alpha);
		}
		self.running = true;
	}

	/// Advance one step. Returns `false` once the energy has run out.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.forces.alpha_decay;
		self.graph.update(self.forces.frame_dt * self.alpha as f32);

		let mut bodies = self.bodies();
		apply_links(
			&mut bodies,
			&self.links,
			&self.degree,
			&self.forces,
			self.alpha,
		);
		apply_collisions(
			&mut bodies,
			self.forces.collide_radius,
			self.forces.collide_strength,
		);
		apply_centering(&mut bodies, self.center);
		self.write_back(&bodies);

		if self.alpha < self.forces.alpha_min {
			self.running = false;
			debug!("simulation settled");
		}
		true
	}

	pub fn bodies(&self) -> Vec<Body> {
		let mut bodies = vec![Body::default(); self.nodes.len()];
		self.graph.visit_nodes(|node| {
			bodies[node.data.user_data.case] = Body {
				x: node.x() as f64,
				y: node.y() as f64,
				pinned: node.data.is_anchor,
			};
		});
		bodies
	}

	pub fn position(&self, case: usize) -> Option<Point> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.data.user_data.case == case {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn is_pinned(&self, case: usize) -> bool {
		let mut pinned = false;
		self.graph.visit_nodes(|node| {
			if node.data.user_data.case == case {
				pinned = node.data.is_anchor;
			}
		});
		pinned
	}

	/// Hold a node at `(x, y)` until [`Simulation::unpin`].
	pub fn pin(&mut self, case: usize, (x, y): Point) {
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data.case == case {
				node.data.x = x as f32;
				node.data.y = y as f32;
				node.data.is_anchor = true;
			}
		});
	}

	pub fn unpin(&mut self, case: usize) {
		self.graph.visit_nodes_mut(|node| {
			if node.data.user_data.case == case {
				node.data.is_anchor = false;
			}
		});
	}

	fn write_back(&mut self, bodies: &[Body]) {
		self.graph.visit_nodes_mut(|node| {
			let body = bodies[node.data.user_data.case];
			if !node.data.is_anchor {
				node.data.x = body.x as f32;
				node.data.y = body.y as f32;
			}
		});
	}
}

/// Tiny deterministic offset for coincident bodies.
fn jiggle(i: usize) -> f64 {
	((i % 7) as f64 - 3.5) * 1e-6
}

/// Pull each linked pair toward the rest distance. Low-degree ends move more.
pub fn apply_links(
	bodies: &mut [Body],
	links: &[(usize, usize)],
	degree: &[usize],
	forces: &ForceConfig,
	alpha: f64,
) {
	for (i, &(s, t)) in links.iter().enumerate() {
		let (source, target) = (bodies[s], bodies[t]);
		let mut dx = target.x - source.x;
		let mut dy = target.y - source.y;
		if dx == 0.0 && dy == 0.0 {
			dx = jiggle(i);
			dy = jiggle(i + 3);
		}
		let len = (dx * dx + dy * dy).sqrt();
		let pull = (len - forces.link_distance) / len * alpha * forces.link_strength;
		let (fx, fy) = (dx * pull, dy * pull);
		let total = (degree[s] + degree[t]).max(1) as f64;
		let bias = degree[s] as f64 / total;

		if !target.pinned {
			bodies[t].x -= fx * bias;
			bodies[t].y -= fy * bias;
		}
		if !source.pinned {
			bodies[s].x += fx * (1.0 - bias);
			bodies[s].y += fy * (1.0 - bias);
		}
	}
}

/// Push apart any pair closer than twice `radius`, splitting the correction.
pub fn apply_collisions(bodies: &mut [Body], radius: f64, strength: f64) {
	let reach = radius * 2.0;
	for i in 0..bodies.len() {
		for j in (i + 1)..bodies.len() {
			let mut dx = bodies[i].x - bodies[j].x;
			let mut dy = bodies[i].y - bodies[j].y;
			let mut dist_sq = dx * dx + dy * dy;
			if dist_sq >= reach * reach {
				continue;
			}
			if dist_sq == 0.0 {
				dx = jiggle(i);
				dy = jiggle(j);
				dist_sq = dx * dx + dy * dy;
			}
			let dist = dist_sq.sqrt();
			let push = (reach - dist) / dist * strength;
			let (px, py) = (dx * push, dy * push);
			let share = match (bodies[i].pinned, bodies[j].pinned) {
				(true, true) => continue,
				(true, false) => (0.0, 1.0),
				(false, true) => (1.0, 0.0),
				(false, false) => (0.5, 0.5),
			};
			bodies[i].x += px * share.0;
			bodies[i].y += py * share.0;
			bodies[j].x -= px * share.1;
			bodies[j].y -= py * share.1;
		}
	}
}

/// Translate free bodies so the mean position lands on `center`.
pub fn apply_centering(bodies: &mut [Body], center: Point) {
	if bodies.is_empty() {
		return;
	}
	let n = bodies.len() as f64;
	let (sx, sy) = bodies
		.iter()
		.fold((0.0, 0.0), |(sx, sy), b| (sx + b.x, sy + b.y));
	let (ox, oy) = (sx / n - center.0, sy / n - center.1);
	for body in bodies.iter_mut().filter(|b| !b.pinned) {
		body.x -= ox;
		body.y -= oy;
	}
}
