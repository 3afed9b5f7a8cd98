use super::scale::LegendMode;

pub const LEGEND_X: f64 = 50.0;
pub const LABEL_X: f64 = 75.0;
pub const LABEL_BASELINE: f64 = 10.0;
pub const SWATCH_SIZE: f64 = 15.0;
pub const ROW_HEIGHT: f64 = 20.0;

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
	pub color: &'static str,
	pub label: String,
}

/// Swatches for the active colour scale. Rebuilt from scratch on every mode
/// change, never patched.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
	pub mode: LegendMode,
	pub entries: Vec<LegendEntry>,
}

impl Legend {
	pub fn for_mode(mode: LegendMode) -> Self {
		let scale = mode.scale();
		let entries = mode
			.domain()
			.into_iter()
			.map(|value| LegendEntry {
				color: scale.color(value),
				label: value.to_string(),
			})
			.collect();
		Self { mode, entries }
	}

	/// Entries paired with the top edge of their row.
	pub fn rows(&self) -> impl Iterator<Item = (f64, &LegendEntry)> {
		self.entries
			.iter()
			.enumerate()
			.map(|(i, entry)| (i as f64 * ROW_HEIGHT, entry))
	}
}
