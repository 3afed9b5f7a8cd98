use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Gender as spelled in the case records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
	/// `"male"`
	Male,
	/// `"female"`
	Female,
}

impl Gender {
	/// Every gender, in legend order.
	pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

	/// Record spelling.
	pub fn as_str(self) -> &'static str {
		match self {
			Gender::Male => "male",
			Gender::Female => "female",
		}
	}
}

impl fmt::Display for Gender {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Gender {
	type Err = RecordError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"male" => Ok(Gender::Male),
			"female" => Ok(Gender::Female),
			other => Err(RecordError::UnknownGender(other.to_string())),
		}
	}
}

/// Vaccination status as spelled in the case records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Vaccination {
	/// `"yes (2 doses)"`
	Full,
	/// `"partial (1 dose)"`
	Partial,
	/// `"no"`
	Unvaccinated,
}

impl Vaccination {
	/// Every status, in legend order.
	pub const ALL: [Vaccination; 3] = [
		Vaccination::Full,
		Vaccination::Partial,
		Vaccination::Unvaccinated,
	];

	/// Record spelling.
	pub fn as_str(self) -> &'static str {
		match self {
			Vaccination::Full => "yes (2 doses)",
			Vaccination::Partial => "partial (1 dose)",
			Vaccination::Unvaccinated => "no",
		}
	}
}

impl fmt::Display for Vaccination {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Vaccination {
	type Err = RecordError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Vaccination::ALL
			.into_iter()
			.find(|v| v.as_str() == s)
			.ok_or_else(|| RecordError::UnknownVaccination(s.to_string()))
	}
}

/// Why a single record was left out of the dataset.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RecordError {
	/// A field is missing or has the wrong JSON type.
	#[error("malformed {kind} record: {message}")]
	Malformed {
		/// `"case"` or `"link"`.
		kind: &'static str,
		/// Decoder message.
		message: String,
	},
	/// Gender other than `male` or `female`.
	#[error("unknown gender {0:?}")]
	UnknownGender(String),
	/// Vaccination status outside the three known spellings.
	#[error("unknown vaccination status {0:?}")]
	UnknownVaccination(String),
	/// A second record with an id already seen.
	#[error("duplicate case id {0:?}")]
	DuplicateCase(String),
	/// A link endpoint that matches no case.
	#[error("link {infector:?} -> {infectee:?} names an unknown case")]
	UnresolvedLink {
		/// Source case id.
		infector: String,
		/// Target case id.
		infectee: String,
	},
	/// A case recorded as infecting itself.
	#[error("link {0:?} -> {0:?} points at its own source")]
	SelfLink(String),
}

/// A single reported case, one node of the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Case {
	/// Unique case identifier.
	pub id: String,
	/// Age in years.
	pub age: f64,
	/// Drives the icon and the gender legend.
	pub gender: Gender,
	/// Reporting date, shown verbatim.
	pub date: String,
	/// Shown verbatim in the tooltip.
	pub nationality: String,
	/// Shown verbatim in the tooltip.
	pub occupation: String,
	/// Drives the vaccination legend.
	pub vaccinated: Vaccination,
}

impl Case {
	/// Lines shown in the hover tooltip.
	pub fn tooltip_lines(&self) -> Vec<String> {
		vec![
			format!("Age: {}", self.age),
			format!("Gender: {}", self.gender),
			format!("Date: {}", self.date),
			format!("Nationality: {}", self.nationality),
			format!("Occupation: {}", self.occupation),
			format!("Vaccinated: {}", self.vaccinated),
		]
	}
}

/// Infector -> infectee edge. Endpoints index into [`Dataset::cases`].
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// Infector.
	pub source: usize,
	/// Infectee.
	pub target: usize,
	/// Free-form transmission type; selects the dash pattern.
	pub kind: String,
}

impl Link {
	/// Whether `case` is either endpoint.
	pub fn touches(&self, case: usize) -> bool {
		self.source == case || self.target == case
	}
}

/// Resolved cases and links, ready for layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
	/// Nodes, in record order.
	pub cases: Vec<Case>,
	/// Edges whose endpoints index into `cases`.
	pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_known_categories() {
		assert_eq!("female".parse::<Gender>(), Ok(Gender::Female));
		assert_eq!("partial (1 dose)".parse::<Vaccination>(), Ok(Vaccination::Partial));
		assert_eq!(
			"unknown".parse::<Gender>(),
			Err(RecordError::UnknownGender("unknown".into()))
		);
		assert!("yes".parse::<Vaccination>().is_err());
	}

	#[test]
	fn tooltip_lists_every_attribute() {
		let case = Case {
			id: "C1".into(),
			age: 34.0,
			gender: Gender::Male,
			date: "2021-09-01".into(),
			nationality: "Singaporean".into(),
			occupation: "Teacher".into(),
			vaccinated: Vaccination::Unvaccinated,
		};
		assert_eq!(
			case.tooltip_lines(),
			vec![
				"Age: 34",
				"Gender: male",
				"Date: 2021-09-01",
				"Nationality: Singaporean",
				"Occupation: Teacher",
				"Vaccinated: no",
			]
		);
	}
}
