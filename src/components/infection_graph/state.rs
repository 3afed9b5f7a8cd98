use std::collections::HashSet;

use log::info;

use super::config::GraphConfig;
use super::geometry::{self, ArcPath, Point};
use super::legend::Legend;
use super::scale::LegendMode;
use super::simulation::Simulation;
use super::types::{Dataset, Gender};
use super::zoom::{ViewTransform, ZoomBehavior};

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub case: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

impl DragState {
	pub fn active(&self) -> bool {
		self.case.is_some()
	}

	/// World position that keeps the grab offset under the pointer.
	pub fn target(&self, (sx, sy): Point, k: f64) -> Point {
		(
			self.node_start_x + (sx - self.start_x) / k,
			self.node_start_y + (sy - self.start_y) / k,
		)
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub case: Option<usize>,
	pub links: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_case: Option<usize>,
	pub prev_links: HashSet<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub lines: Vec<String>,
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeFrame {
	pub center: Point,
	pub icon: Point,
	pub gender: Gender,
	pub fill: &'static str,
	pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkFrame {
	pub arc: Option<ArcPath>,
	pub marker: Option<ArcPath>,
	pub kind: String,
	pub selected: bool,
}

/// Everything the renderer needs for one animation frame, in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	pub nodes: Vec<NodeFrame>,
	pub links: Vec<LinkFrame>,
}

/// Shared context every event handler operates on.
pub struct GraphState {
	/// Settings the graph was built with.
	pub config: GraphConfig,
	/// Cases and links being drawn.
	pub data: Dataset,
	/// Layout positions and energy.
	pub simulation: Simulation,
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Limits applied to every change of `transform`.
	pub zoom: ZoomBehavior,
	/// Node drag in progress, if any.
	pub drag: DragState,
	/// Background pan in progress, if any.
	pub pan: PanState,
	/// Hovered case and the fade of its highlight.
	pub hover: HoverState,
	mode: LegendMode,
	fills: Vec<&'static str>,
	legend: Legend,
}

impl GraphState {
	/// Lay out `data` from its starting ring, coloured by the initial mode.
	pub fn new(data: Dataset, config: GraphConfig) -> Self {
		let simulation = Simulation::new(&data, &config);
		let zoom = ZoomBehavior::new(&config);
		let mode = config.initial_mode;
		let mut state = Self {
			simulation,
			zoom,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			mode,
			fills: Vec::new(),
			legend: Legend::for_mode(mode),
			config,
			data,
		};
		state.select_mode(mode);
		state
	}

	/// Active legend mode.
	pub fn mode(&self) -> LegendMode {
		self.mode
	}

	/// Legend for the active mode.
	pub fn legend(&self) -> &Legend {
		&self.legend
	}

	/// Fill colour of `case` in the active mode.
	pub fn fill(&self, case: usize) -> Option<&'static str> {
		self.fills.get(case).copied()
	}

	/// Recolour every node and replace the legend.
	pub fn select_mode(&mut self, mode: LegendMode) {
		self.mode = mode;
		self.fills = self.data.cases.iter().map(|c| mode.color_of(c)).collect();
		self.legend = Legend::for_mode(mode);
		info!("legend switched to {}", mode.label());
	}

	/// One animation frame: a layout step plus the highlight fade over `dt`
	/// seconds.
	pub fn tick(&mut self, dt: f64) {
		self.simulation.tick();

		let (target, speed) = if self.hover.case.is_some() {
			(1.0, 9.0)
		} else {
			(0.0, 6.0)
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
		if self.hover.case.is_none() && self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
			self.hover.prev_case = None;
			self.hover.prev_links.clear();
		}
	}

	/// Snapshot of node and link geometry for drawing.
	pub fn frame(&self) -> Frame {
		let bodies = self.simulation.bodies();
		let icons = &self.config.icons;
		let nodes = self
			.data
			.cases
			.iter()
			.zip(&bodies)
			.enumerate()
			.map(|(i, (case, body))| {
				let center = (body.x, body.y);
				NodeFrame {
					center,
					icon: geometry::icon_origin(center, icons.width, icons.height),
					gender: case.gender,
					fill: self.fills[i],
					selected: self.is_node_selected(i),
				}
			})
			.collect();
		let links = self
			.data
			.links
			.iter()
			.enumerate()
			.map(|(i, link)| {
				let (s, t) = (bodies[link.source], bodies[link.target]);
				let (source, target) = ((s.x, s.y), (t.x, t.y));
				LinkFrame {
					arc: geometry::link_arc(source, target),
					marker: geometry::marker_arc(source, target),
					kind: link.kind.clone(),
					selected: self.is_link_selected(i),
				}
			})
			.collect();
		Frame { nodes, links }
	}

	/// Topmost case under a point in view coordinates.
	pub fn node_at(&self, view: Point) -> Option<usize> {
		let (wx, wy) = self.transform.invert(view);
		let radius = self.config.node_radius;
		self.simulation
			.bodies()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, b)| {
				let (dx, dy) = (b.x - wx, b.y - wy);
				dx * dx + dy * dy <= radius * radius
			})
			.map(|(i, _)| i)
	}

	/// Update hover from the pointer. Returns whether the hovered case changed.
	pub fn hover_at(&mut self, view: Point) -> bool {
		if self.drag.active() {
			return false;
		}
		let hit = self.node_at(view);
		if hit == self.hover.case {
			return false;
		}
		self.set_hover(hit);
		true
	}

	/// Make `case` the hovered node, keeping the previous one for the fade.
	pub fn set_hover(&mut self, case: Option<usize>) {
		if self.hover.case == case {
			return;
		}
		if case.is_none() {
			self.hover.prev_case = self.hover.case.take();
			self.hover.prev_links = std::mem::take(&mut self.hover.links);
		} else {
			self.hover.prev_case = None;
			self.hover.prev_links.clear();
		}

		self.hover.case = case;
		self.hover.links = match case {
			Some(idx) => self
				.data
				.links
				.iter()
				.enumerate()
				.filter(|(_, l)| l.touches(idx))
				.map(|(i, _)| i)
				.collect(),
			None => HashSet::new(),
		};
	}

	/// Whether `case` is drawn highlighted.
	pub fn is_node_selected(&self, case: usize) -> bool {
		self.hover.case == Some(case) || self.hover.prev_case == Some(case)
	}

	/// Whether link `link` is drawn highlighted.
	pub fn is_link_selected(&self, link: usize) -> bool {
		self.hover.links.contains(&link) || self.hover.prev_links.contains(&link)
	}

	/// Tooltip for the hovered case, placed at the given page coordinates.
	pub fn tooltip(&self, page_x: f64, page_y: f64) -> Option<Tooltip> {
		let case = self.data.cases.get(self.hover.case?)?;
		Some(Tooltip {
			lines: case.tooltip_lines(),
			x: page_x,
			y: page_y,
		})
	}

	/// Pin `case` where it is and wake the simulation.
	pub fn drag_start(&mut self, case: usize, view: Point) {
		let Some((x, y)) = self.simulation.position(case) else {
			return;
		};
		if !self.drag.active() {
			self.simulation
				.set_alpha_target(self.config.forces.drag_alpha_target);
			self.simulation.restart();
		}
		self.simulation.pin(case, (x, y));
		self.drag = DragState {
			case: Some(case),
			start_x: view.0,
			start_y: view.1,
			node_start_x: x,
			node_start_y: y,
		};
	}

	/// Move the dragged node to a world position.
	pub fn drag_move(&mut self, to: Point) {
		if let Some(case) = self.drag.case {
			self.simulation.pin(case, to);
		}
	}

	/// Move the dragged node under the pointer, in view coordinates.
	pub fn drag_to_pointer(&mut self, view: Point) {
		let to = self.drag.target(view, self.transform.k);
		self.drag_move(to);
	}

	/// Release the dragged node and let the layout cool down.
	pub fn drag_end(&mut self) {
		if let Some(case) = self.drag.case.take() {
			self.simulation.unpin(case);
			self.simulation.set_alpha_target(0.0);
		}
	}

	/// Begin panning from a background point.
	pub fn pan_start(&mut self, view: Point) {
		self.pan = PanState {
			active: true,
			start_x: view.0,
			start_y: view.1,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Pan by the pointer travel since [`GraphState::pan_start`].
	pub fn pan_move(&mut self, view: Point) {
		if !self.pan.active {
			return;
		}
		self.transform = self.zoom.translate_to(
			self.transform,
			self.pan.transform_start_x + (view.0 - self.pan.start_x),
			self.pan.transform_start_y + (view.1 - self.pan.start_y),
		);
	}

	/// Stop panning.
	pub fn pan_end(&mut self) {
		self.pan.active = false;
	}

	/// One wheel notch about `view`.
	pub fn zoom_at(&mut self, view: Point, delta_y: f64) {
		self.transform = self.zoom.wheel_at(self.transform, view, delta_y);
	}

	/// CSS cursor for the current gesture.
	pub fn cursor(&self) -> &'static str {
		if self.drag.active() || self.pan.active {
			"grabbing"
		} else if self.hover.case.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}

	/// Pointer left the canvas: drop every gesture.
	pub fn release_all(&mut self) {
		self.drag_end();
		self.pan_end();
		self.set_hover(None);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::infection_graph::types::{Case, Link, Vaccination};

	fn case(id: &str, age: f64, gender: Gender, vaccinated: Vaccination) -> Case {
		Case {
			id: id.into(),
			age,
			gender,
			date: "2021-10-01".into(),
			nationality: "Singaporean".into(),
			occupation: "Nurse".into(),
			vaccinated,
		}
	}

	fn sample() -> GraphState {
		let data = Dataset {
			cases: vec![
				case("a", 34.0, Gender::Male, Vaccination::Unvaccinated),
				case("b", 71.0, Gender::Female, Vaccination::Full),
				case("c", 8.0, Gender::Female, Vaccination::Partial),
			],
			links: vec![
				Link {
					source: 0,
					target: 1,
					kind: String::new(),
				},
				Link {
					source: 1,
					target: 2,
					kind: "imported".into(),
				},
			],
		};
		GraphState::new(data, GraphConfig::default())
	}

	#[test]
	fn every_mode_colours_nodes_from_its_scale() {
		let mut state = sample();
		for mode in LegendMode::ALL {
			state.select_mode(mode);
			for (i, case) in state.data.cases.iter().enumerate() {
				assert_eq!(state.fill(i), Some(mode.scale().color(mode.value_of(case))));
			}
			let fills: Vec<_> = state.frame().nodes.iter().map(|n| n.fill).collect();
			assert_eq!(fills, state.fills);
		}
	}

	#[test]
	fn legend_is_replaced_not_accumulated() {
		let mut state = sample();
		for mode in [
			LegendMode::Age,
			LegendMode::Gender,
			LegendMode::Vaccinated,
			LegendMode::Age,
			LegendMode::Vaccinated,
		] {
			state.select_mode(mode);
			assert_eq!(state.legend(), &Legend::for_mode(mode));
		}
		assert_eq!(state.legend().entries.len(), 3);
	}

	#[test]
	fn frame_geometry_tracks_positions_each_tick() {
		let mut state = sample();
		for _ in 0..15 {
			state.tick(0.016);
			let bodies = state.simulation.bodies();
			let frame = state.frame();
			for (node, body) in frame.nodes.iter().zip(&bodies) {
				assert_eq!(node.center, (body.x, body.y));
				assert_eq!(node.icon, (body.x - 7.5, body.y - 7.5));
			}
			for (link, data) in frame.links.iter().zip(&state.data.links) {
				let (s, t) = (bodies[data.source], bodies[data.target]);
				let arc = link.arc.as_ref().expect("distinct endpoints");
				assert_eq!(arc.radius, geometry::distance((s.x, s.y), (t.x, t.y)));
			}
		}
	}

	#[test]
	fn hover_selects_node_and_incident_links() {
		let mut state = sample();
		let (x, y) = state.simulation.position(1).unwrap();
		assert!(state.hover_at((x + 3.0, y - 3.0)));
		assert!(state.is_node_selected(1));
		assert!(state.is_link_selected(0) && state.is_link_selected(1));
		let tip = state.tooltip(40.0, 60.0).unwrap();
		assert_eq!(tip.lines[0], "Age: 71");
		assert_eq!((tip.x, tip.y), (40.0, 60.0));

		state.set_hover(Some(0));
		assert!(state.is_link_selected(0));
		assert!(!state.is_link_selected(1));

		state.set_hover(None);
		assert!(state.tooltip(0.0, 0.0).is_none());
		for _ in 0..200 {
			state.tick(0.016);
		}
		assert!(!state.is_node_selected(0));
		assert!(!state.is_link_selected(0));
	}

	#[test]
	fn dragged_node_follows_pointer_then_rejoins_layout() {
		let mut state = sample();
		for _ in 0..400 {
			state.tick(0.016);
		}
		assert!(!state.simulation.is_running());

		let start = state.simulation.position(2).unwrap();
		state.drag_start(2, start);
		assert!(state.simulation.is_running());
		assert_eq!(state.simulation.alpha_target(), 0.3);

		for target in [(100.0, 50.0), (250.5, 300.25), (800.0, 120.0)] {
			state.drag_move(target);
			state.tick(0.016);
			assert_eq!(state.simulation.position(2), Some(target));
		}

		state.drag_end();
		assert!(!state.simulation.is_pinned(2));
		assert_eq!(state.simulation.alpha_target(), 0.0);
		state.tick(0.016);
		assert_ne!(state.simulation.position(2), Some((800.0, 120.0)));
	}

	#[test]
	fn drag_keeps_grab_offset_under_zoom() {
		let mut state = sample();
		state.zoom_at((500.0, 200.0), -1.0);
		let k = state.transform.k;
		let node = state.simulation.position(0).unwrap();
		let grab = state.transform.apply(node);
		state.drag_start(0, grab);
		state.drag_to_pointer((grab.0 + 22.0, grab.1 - 11.0));
		let (x, y) = state.simulation.position(0).unwrap();
		assert!((x - (node.0 + 22.0 / k)).abs() < 1e-3);
		assert!((y - (node.1 - 11.0 / k)).abs() < 1e-3);
	}

	#[test]
	fn cursor_follows_the_gesture() {
		let mut state = sample();
		assert_eq!(state.cursor(), "grab");
		let node = state.simulation.position(0).unwrap();
		state.hover_at(node);
		assert_eq!(state.cursor(), "pointer");
		state.drag_start(0, node);
		assert_eq!(state.cursor(), "grabbing");
		state.release_all();
		assert_eq!(state.cursor(), "grab");
		state.pan_start((5.0, 5.0));
		assert_eq!(state.cursor(), "grabbing");
		state.pan_end();
		assert_eq!(state.cursor(), "grab");
	}

	#[test]
	fn background_pan_stays_in_bounds() {
		let mut state = sample();
		state.zoom_at((0.0, 0.0), -1.0);
		state.pan_start((10.0, 10.0));
		state.pan_move((900.0, 390.0));
		assert!(state.transform.x.abs() < 1e-9 && state.transform.y.abs() < 1e-9);
		state.pan_move((-900.0, -390.0));
		let (x1, y1) = state.transform.invert((1000.0, 400.0));
		assert!((x1 - 1000.0).abs() < 1e-9 && (y1 - 400.0).abs() < 1e-9);
		state.pan_end();
		assert!(!state.pan.active);
	}
}
