//! Colour scales for the three legend modes.
//!
//! Ordinal scales map a category to the range colour at the same position,
//! threshold scales bucket a number by its cut points (a value equal to a cut
//! point falls in the bucket above it).

use std::fmt;

use super::types::Case;

/// Fill used for values outside a scale's domain.
pub const UNKNOWN_COLOR: &str = "#cccccc";

pub const GENDER_DOMAIN: [&str; 2] = ["male", "female"];
pub const VACCINATED_DOMAIN: [&str; 3] = ["yes (2 doses)", "partial (1 dose)", "no"];
pub const AGE_THRESHOLDS: [f64; 7] = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0];

const GENDER_COLORS: [&str; 2] = ["RoyalBlue", "Violet"];

const TABLEAU10: [&str; 10] = [
	"#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
	"#9c755f", "#bab0ab",
];

// Eight-step sequential reds: one bucket below the first cut point, one per cut point.
const REDS: [&str; 8] = [
	"#fff5f0", "#fee0d2", "#fcbba1", "#fc9272", "#fb6a4a", "#ef3b2c", "#cb181d", "#99000d",
];

/// A value fed to a colour scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DomainValue<'a> {
	/// For ordinal scales.
	Category(&'a str),
	/// For threshold scales.
	Number(f64),
}

impl fmt::Display for DomainValue<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DomainValue::Category(c) => f.write_str(c),
			DomainValue::Number(n) => write!(f, "{n}"),
		}
	}
}

/// Maps a domain value to a CSS colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorScale {
	/// Category to colour by position.
	Ordinal {
		/// Known categories.
		domain: &'static [&'static str],
		/// Colours, cycled when shorter than the domain.
		range: &'static [&'static str],
	},
	/// Number to colour by bucket.
	Threshold {
		/// Ascending cut points.
		thresholds: &'static [f64],
		/// One more colour than there are cut points.
		range: &'static [&'static str],
	},
}

impl ColorScale {
	/// Colour for `value`, or [`UNKNOWN_COLOR`] outside the domain.
	pub fn color(&self, value: DomainValue<'_>) -> &'static str {
		match (*self, value) {
			(ColorScale::Ordinal { domain, range }, DomainValue::Category(c)) => domain
				.iter()
				.position(|d| *d == c)
				.map(|i| range[i % range.len()])
				.unwrap_or(UNKNOWN_COLOR),
			(ColorScale::Threshold { thresholds, range }, DomainValue::Number(x)) if !x.is_nan() => {
				range[thresholds.partition_point(|t| *t <= x)]
			}
			_ => UNKNOWN_COLOR,
		}
	}
}

/// Which attribute drives node colour. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LegendMode {
	/// Two-colour ordinal scale.
	#[default]
	Gender,
	/// Three-colour ordinal scale.
	Vaccinated,
	/// Sequential reds by age bracket.
	Age,
}

impl LegendMode {
	/// Every mode, in radio-button order.
	pub const ALL: [LegendMode; 3] = [LegendMode::Gender, LegendMode::Vaccinated, LegendMode::Age];

	/// Colour scale for this mode.
	pub fn scale(self) -> ColorScale {
		match self {
			LegendMode::Gender => ColorScale::Ordinal {
				domain: &GENDER_DOMAIN,
				range: &GENDER_COLORS,
			},
			LegendMode::Vaccinated => ColorScale::Ordinal {
				domain: &VACCINATED_DOMAIN,
				range: &TABLEAU10,
			},
			LegendMode::Age => ColorScale::Threshold {
				thresholds: &AGE_THRESHOLDS,
				range: &REDS,
			},
		}
	}

	/// Values listed in the legend, in display order.
	pub fn domain(self) -> Vec<DomainValue<'static>> {
		match self {
			LegendMode::Gender => GENDER_DOMAIN.iter().map(|c| DomainValue::Category(*c)).collect(),
			LegendMode::Vaccinated => VACCINATED_DOMAIN
				.iter()
				.map(|c| DomainValue::Category(*c))
				.collect(),
			LegendMode::Age => AGE_THRESHOLDS.iter().map(|n| DomainValue::Number(*n)).collect(),
		}
	}

	/// The attribute of `case` this mode colours by.
	pub fn value_of(self, case: &Case) -> DomainValue<'static> {
		match self {
			LegendMode::Gender => DomainValue::Category(case.gender.as_str()),
			LegendMode::Vaccinated => DomainValue::Category(case.vaccinated.as_str()),
			LegendMode::Age => DomainValue::Number(case.age),
		}
	}

	/// Node fill for `case`.
	pub fn color_of(self, case: &Case) -> &'static str {
		self.scale().color(self.value_of(case))
	}

	/// Element id of the radio button for this mode.
	pub fn input_id(self) -> &'static str {
		match self {
			LegendMode::Gender => "r1",
			LegendMode::Vaccinated => "r2",
			LegendMode::Age => "r3",
		}
	}

	/// Value attribute of the radio button.
	pub fn input_value(self) -> &'static str {
		match self {
			LegendMode::Gender => "1",
			LegendMode::Vaccinated => "2",
			LegendMode::Age => "3",
		}
	}

	/// Any value other than the first two selects age.
	pub fn from_input_value(value: &str) -> Self {
		match value {
			"1" => LegendMode::Gender,
			"2" => LegendMode::Vaccinated,
			_ => LegendMode::Age,
		}
	}

	/// Text next to the radio button.
	pub fn label(self) -> &'static str {
		match self {
			LegendMode::Gender => "Gender",
			LegendMode::Vaccinated => "Vaccination",
			LegendMode::Age => "Age",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::infection_graph::types::{Gender, Vaccination};

	#[test]
	fn domains_match_record_spellings() {
		let genders: Vec<_> = Gender::ALL.iter().map(|g| g.as_str()).collect();
		assert_eq!(genders, GENDER_DOMAIN);
		let statuses: Vec<_> = Vaccination::ALL.iter().map(|v| v.as_str()).collect();
		assert_eq!(statuses, VACCINATED_DOMAIN);
	}

	#[test]
	fn ordinal_scale_maps_by_position() {
		let scale = LegendMode::Vaccinated.scale();
		assert_eq!(scale.color(DomainValue::Category("yes (2 doses)")), "#4e79a7");
		assert_eq!(scale.color(DomainValue::Category("no")), "#e15759");
		assert_eq!(scale.color(DomainValue::Category("maybe")), UNKNOWN_COLOR);
		assert_eq!(
			LegendMode::Gender.scale().color(DomainValue::Category("female")),
			"Violet"
		);
	}

	#[test]
	fn threshold_scale_buckets_with_cut_points_above() {
		let scale = LegendMode::Age.scale();
		assert_eq!(scale.color(DomainValue::Number(3.0)), REDS[0]);
		assert_eq!(scale.color(DomainValue::Number(10.0)), REDS[1]);
		assert_eq!(scale.color(DomainValue::Number(34.0)), REDS[3]);
		assert_eq!(scale.color(DomainValue::Number(69.9)), REDS[6]);
		assert_eq!(scale.color(DomainValue::Number(95.0)), REDS[7]);
		assert_eq!(scale.color(DomainValue::Number(f64::NAN)), UNKNOWN_COLOR);
	}

	#[test]
	fn mismatched_value_kind_is_unknown() {
		assert_eq!(
			LegendMode::Age.scale().color(DomainValue::Category("male")),
			UNKNOWN_COLOR
		);
		assert_eq!(
			LegendMode::Gender.scale().color(DomainValue::Number(1.0)),
			UNKNOWN_COLOR
		);
	}

	#[test]
	fn radio_values_round_trip() {
		for mode in LegendMode::ALL {
			assert_eq!(LegendMode::from_input_value(mode.input_value()), mode);
		}
		assert_eq!(LegendMode::from_input_value("7"), LegendMode::Age);
	}
}
