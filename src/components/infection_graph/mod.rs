//! Infection chain graph: record loading, colour scales, force layout and the
//! canvas component that draws them.

mod component;
mod config;
mod geometry;
mod legend;
mod loader;
mod render;
mod scale;
mod simulation;
mod state;
mod types;
mod zoom;

pub use component::InfectionGraph;
pub use config::{DataSources, ForceConfig, GraphConfig, IconConfig, ZoomConfig};
pub use loader::{LoadError, load_dataset};
pub use scale::{ColorScale, DomainValue, LegendMode};
pub use state::GraphState;
pub use types::{Case, Dataset, Gender, Link, RecordError, Vaccination};
