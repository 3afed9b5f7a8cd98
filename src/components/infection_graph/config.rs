use super::scale::LegendMode;

/// Where the two JSON resources live.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSources {
	/// Array of `{infector, infectee, type}` records.
	pub links_url: String,
	/// Array of case records.
	pub cases_url: String,
}

impl Default for DataSources {
	fn default() -> Self {
		Self {
			links_url: "https://chi-loong.github.io/CSC3007/assignments/links-sample.json".into(),
			cases_url: "https://chi-loong.github.io/CSC3007/assignments/cases-sample.json".into(),
		}
	}
}

/// Force parameters in d3-force terms. See [`ForceConfig::simulation_parameters`]
/// for how they map onto the `force_graph` integrator.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConfig {
	/// Rest length of a link.
	pub link_distance: f64,
	/// Fraction of the length error corrected per step.
	pub link_strength: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	/// Radius each node keeps clear of others.
	pub collide_radius: f64,
	pub collide_strength: f64,
	/// The loop stops once alpha falls below this.
	pub alpha_min: f64,
	/// Share of the distance to the alpha target covered per step.
	pub alpha_decay: f64,
	/// Energy target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Seconds of integrator time per animation frame.
	pub frame_dt: f32,
}

impl Default for ForceConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 40.0,
			link_strength: 0.2,
			charge_strength: -15.0,
			collide_radius: 15.0,
			collide_strength: 0.1,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			drag_alpha_target: 0.3,
			frame_dt: 0.016,
		}
	}
}

impl ForceConfig {
	/// Integrator settings for `force_graph`.
	pub fn simulation_parameters(&self) -> force_graph::SimulationParameters {
		force_graph::SimulationParameters {
			force_charge: (-self.charge_strength * 10.0) as f32,
			force_spring: (self.link_strength * 0.25) as f32,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

/// Scale bounds and wheel sensitivity.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomConfig {
	/// Smallest zoom factor.
	pub min_scale: f64,
	/// Largest zoom factor.
	pub max_scale: f64,
	/// Scale multiplier per wheel notch.
	pub wheel_step: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: 1.0,
			max_scale: 5.0,
			wheel_step: 1.1,
		}
	}
}

/// Gender icon images and the size they are drawn at.
#[derive(Clone, Debug, PartialEq)]
pub struct IconConfig {
	/// Image URL for male cases.
	pub male: String,
	/// Image URL for female cases.
	pub female: String,
	/// Drawn width in world units.
	pub width: f64,
	/// Drawn height in world units.
	pub height: f64,
}

impl Default for IconConfig {
	fn default() -> Self {
		Self {
			male: "gender-male.svg".into(),
			female: "gender-female.svg".into(),
			width: 15.0,
			height: 15.0,
		}
	}
}

/// Everything the graph needs besides its data.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// Logical canvas width; the element is scaled to fit its container.
	pub width: f64,
	/// Logical canvas height.
	pub height: f64,
	/// Circle radius, also the hit radius for hover and drag.
	pub node_radius: f64,
	/// Gender icons.
	pub icons: IconConfig,
	/// Legend mode selected on first render.
	pub initial_mode: LegendMode,
	/// Layout forces.
	pub forces: ForceConfig,
	/// Zoom limits.
	pub zoom: ZoomConfig,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			width: 1000.0,
			height: 400.0,
			node_radius: 10.0,
			icons: IconConfig::default(),
			initial_mode: LegendMode::Gender,
			forces: ForceConfig::default(),
			zoom: ZoomConfig::default(),
		}
	}
}

impl GraphConfig {
	/// Centre of the canvas, where the layout gravitates.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}
