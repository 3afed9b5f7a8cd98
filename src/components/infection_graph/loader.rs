use std::collections::HashMap;

use futures_util::future::try_join;
use gloo_net::http::Request;
use log::{info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::config::DataSources;
use super::types::{Case, Dataset, Link, RecordError};

/// Failure to produce a dataset at all. Individual bad records are skipped
/// instead, see [`RecordError`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LoadError {
	/// The request never got a response.
	#[error("could not fetch {url}: {message}")]
	Fetch {
		/// Resource that failed.
		url: String,
		/// Transport error text.
		message: String,
	},
	/// The server answered with a non-success status.
	#[error("{url} answered with HTTP {status}")]
	Status {
		/// Resource that failed.
		url: String,
		/// HTTP status code.
		status: u16,
	},
	/// The body is not a JSON array.
	#[error("could not decode {url}: {message}")]
	Decode {
		/// Resource that failed.
		url: String,
		/// Decoder message.
		message: String,
	},
}

/// Identifiers show up both as strings and as bare numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(serde_json::Number),
}

impl RawId {
	fn into_string(self) -> String {
		match self {
			RawId::Text(s) => s,
			RawId::Number(n) => n.to_string(),
		}
	}
}

#[derive(Debug, Deserialize)]
struct RawLink {
	infector: RawId,
	infectee: RawId,
	#[serde(rename = "type", default)]
	kind: String,
}

#[derive(Debug, Deserialize)]
struct RawCase {
	id: RawId,
	age: f64,
	gender: String,
	#[serde(default)]
	date: String,
	#[serde(default)]
	nationality: String,
	#[serde(default)]
	occupation: String,
	vaccinated: String,
}

impl TryFrom<RawCase> for Case {
	type Error = RecordError;

	fn try_from(raw: RawCase) -> Result<Self, Self::Error> {
		Ok(Case {
			id: raw.id.into_string(),
			age: raw.age,
			gender: raw.gender.parse()?,
			date: raw.date,
			nationality: raw.nationality,
			occupation: raw.occupation,
			vaccinated: raw.vaccinated.parse()?,
		})
	}
}

/// Decode one array element, keeping the rest of the file usable when it fails.
fn record<T: DeserializeOwned>(kind: &'static str, value: Value) -> Result<T, RecordError> {
	serde_json::from_value(value).map_err(|e| RecordError::Malformed {
		kind,
		message: e.to_string(),
	})
}

impl Dataset {
	/// Resolve raw JSON records into a dataset, dropping what cannot be laid
	/// out with a warning per record.
	fn from_values(raw_links: Vec<Value>, raw_cases: Vec<Value>) -> Self {
		let mut cases = Vec::with_capacity(raw_cases.len());
		let mut index = HashMap::new();
		for raw in raw_cases {
			let case = match record::<RawCase>("case", raw).and_then(Case::try_from) {
				Ok(case) => case,
				Err(err) => {
					warn!("skipping case: {err}");
					continue;
				}
			};
			if index.contains_key(&case.id) {
				warn!("skipping case: {}", RecordError::DuplicateCase(case.id));
				continue;
			}
			index.insert(case.id.clone(), cases.len());
			cases.push(case);
		}

		let mut links = Vec::with_capacity(raw_links.len());
		for raw in raw_links {
			let raw = match record::<RawLink>("link", raw) {
				Ok(raw) => raw,
				Err(err) => {
					warn!("skipping link: {err}");
					continue;
				}
			};
			let (infector, infectee) = (raw.infector.into_string(), raw.infectee.into_string());
			match (index.get(&infector), index.get(&infectee)) {
				(Some(&source), Some(&target)) if source == target => {
					warn!("skipping link: {}", RecordError::SelfLink(infector))
				}
				(Some(&source), Some(&target)) => links.push(Link {
					source,
					target,
					kind: raw.kind,
				}),
				_ => warn!(
					"skipping link: {}",
					RecordError::UnresolvedLink { infector, infectee }
				),
			}
		}

		Self { cases, links }
	}

	/// Build a dataset from the two response bodies.
	pub fn from_json(links_json: &str, cases_json: &str) -> Result<Self, LoadError> {
		let links = decode("links", links_json)?;
		let cases = decode("cases", cases_json)?;
		Ok(Self::from_values(links, cases))
	}
}

fn decode(url: &str, body: &str) -> Result<Vec<Value>, LoadError> {
	serde_json::from_str(body).map_err(|e| LoadError::Decode {
		url: url.to_string(),
		message: e.to_string(),
	})
}

async fn fetch_text(url: &str) -> Result<String, LoadError> {
	let resp = Request::get(url).send().await.map_err(|e| LoadError::Fetch {
		url: url.to_string(),
		message: e.to_string(),
	})?;
	if !resp.ok() {
		return Err(LoadError::Status {
			url: url.to_string(),
			status: resp.status(),
		});
	}
	resp.text().await.map_err(|e| LoadError::Fetch {
		url: url.to_string(),
		message: e.to_string(),
	})
}

/// Fetch both resources concurrently and build the dataset once both have
/// arrived.
pub async fn load_dataset(sources: &DataSources) -> Result<Dataset, LoadError> {
	let (links_body, cases_body) = try_join(
		fetch_text(&sources.links_url),
		fetch_text(&sources.cases_url),
	)
	.await?;
	let links = decode(&sources.links_url, &links_body)?;
	let cases = decode(&sources.cases_url, &cases_body)?;
	let (link_count, case_count) = (links.len(), cases.len());
	let data = Dataset::from_values(links, cases);
	info!(
		"loaded {} of {} cases and {} of {} links",
		data.cases.len(),
		case_count,
		data.links.len(),
		link_count
	);
	Ok(data)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::infection_graph::types::{Gender, Vaccination};

	const CASES: &str = r#"[
		{"id": "C1", "age": 34, "gender": "male", "date": "2021-09-01",
		 "nationality": "Singaporean", "occupation": "Teacher", "vaccinated": "no"},
		{"id": 2, "age": 61, "gender": "female", "vaccinated": "yes (2 doses)"},
		{"id": "C3", "age": 12, "gender": "other", "vaccinated": "no"},
		{"id": "C1", "age": 50, "gender": "female", "vaccinated": "no"}
	]"#;

	#[test]
	fn links_are_renamed_and_resolved() {
		let links = r#"[
			{"infector": "C1", "infectee": 2, "type": "local"},
			{"infector": "C1", "infectee": "C9"},
			{"infector": "C3", "infectee": "C1", "type": "local"}
		]"#;
		let data = Dataset::from_json(links, CASES).unwrap();
		assert_eq!(
			data.links,
			vec![Link {
				source: 0,
				target: 1,
				kind: "local".into(),
			}]
		);
	}

	#[test]
	fn bad_and_duplicate_cases_are_skipped() {
		let data = Dataset::from_json("[]", CASES).unwrap();
		let ids: Vec<_> = data.cases.iter().map(|c| c.id.as_str()).collect();
		assert_eq!(ids, ["C1", "2"]);
		assert_eq!(data.cases[0].age, 34.0);
		assert_eq!(data.cases[0].vaccinated, Vaccination::Unvaccinated);
		assert_eq!(data.cases[1].gender, Gender::Female);
		assert_eq!(data.cases[1].occupation, "");
	}

	#[test]
	fn malformed_records_are_skipped_not_fatal() {
		let cases = r#"[
			{"id": "A", "age": 40, "gender": "male", "vaccinated": "no"},
			{"id": "B", "age": null, "gender": "female", "vaccinated": "no"},
			{"id": "C", "age": 22, "vaccinated": "no"},
			{"id": "D", "age": 9, "gender": "female", "vaccinated": 2},
			{"id": "E", "age": 63, "gender": "female", "vaccinated": "partial (1 dose)"}
		]"#;
		let links = r#"[
			{"infector": "A", "infectee": "E"},
			{"infector": "A"},
			{"infector": ["A"], "infectee": "E"}
		]"#;
		let data = Dataset::from_json(links, cases).unwrap();
		let ids: Vec<_> = data.cases.iter().map(|c| c.id.as_str()).collect();
		assert_eq!(ids, ["A", "E"]);
		assert_eq!(
			data.links,
			vec![Link {
				source: 0,
				target: 1,
				kind: String::new(),
			}]
		);
	}

	#[test]
	fn self_links_are_skipped() {
		let cases = r#"[
			{"id": "A", "age": 40, "gender": "male", "vaccinated": "no"},
			{"id": "B", "age": 41, "gender": "female", "vaccinated": "no"}
		]"#;
		let links = r#"[
			{"infector": "A", "infectee": "B"},
			{"infector": "A", "infectee": "A"}
		]"#;
		let data = Dataset::from_json(links, cases).unwrap();
		assert_eq!(data.links.len(), 1);
		assert_eq!((data.links[0].source, data.links[0].target), (0, 1));
	}

	#[test]
	fn non_array_body_is_a_decode_error() {
		let err = Dataset::from_json("{", "[]").unwrap_err();
		assert!(matches!(err, LoadError::Decode { ref url, .. } if url == "links"));
		let err = Dataset::from_json("[]", r#"{"id": "x"}"#).unwrap_err();
		assert!(matches!(err, LoadError::Decode { ref url, .. } if url == "cases"));
	}

	#[test]
	fn record_errors_name_the_record_kind() {
		let err = record::<RawLink>("link", serde_json::json!({"infector": "A"})).unwrap_err();
		assert!(matches!(err, RecordError::Malformed { kind: "link", .. }));
		assert!(err.to_string().starts_with("malformed link record"));
	}
}
