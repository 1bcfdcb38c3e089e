//! Loading a network from a JSON file at start-up.
//!
//! ```json
//! {
//!   "stations": ["Gangnam", "Yangjae"],
//!   "lines": [
//!     {
//!       "name": "Shinbundang",
//!       "color": "red",
//!       "extra_fare": 900,
//!       "sections": [{ "up": "Gangnam", "down": "Yangjae", "distance": 10 }]
//!     }
//!   ]
//! }
//! ```
//!
//! Every section goes through the same service operations as an HTTP
//! request, so a seed cannot produce a line the editor would reject.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::domain::StationId;
use crate::service::{CreateLine, EditRequest, ServiceError, SubwayService};
use crate::store::Store;

/// Error loading a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed seed file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("line {line:?} references unknown station {station:?}")]
    UnknownStation { line: String, station: String },

    #[error("line {0:?} has no sections")]
    EmptyLine(String),

    #[error("failed to seed {what}: {source}")]
    Service {
        what: String,
        source: ServiceError,
    },
}

/// A whole network.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub stations: Vec<String>,
    #[serde(default)]
    pub lines: Vec<SeedLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedLine {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub extra_fare: u32,
    pub sections: Vec<SeedSection>,
}

/// A segment between two stations named in [`Seed::stations`].
#[derive(Debug, Clone, Deserialize)]
pub struct SeedSection {
    pub up: String,
    pub down: String,
    pub distance: u32,
}

/// Totals of what a seed created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub stations: usize,
    pub lines: usize,
    pub sections: usize,
}

impl Seed {
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let text = fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Creates the stations, then each line from its first section, then
    /// inserts the remaining sections in file order.
    ///
    /// Stops at the first failure; anything created before it stays.
    pub fn apply<S: Store>(&self, service: &SubwayService<S>) -> Result<SeedReport, SeedError> {
        let mut ids: HashMap<&str, StationId> = HashMap::new();
        for name in &self.stations {
            let station = service
                .create_station(name)
                .map_err(|source| SeedError::Service {
                    what: format!("station {name:?}"),
                    source,
                })?;
            ids.insert(name.trim(), station.id());
        }

        let mut sections = 0;
        for line in &self.lines {
            let lookup = |name: &str| {
                ids.get(name.trim())
                    .copied()
                    .ok_or_else(|| SeedError::UnknownStation {
                        line: line.name.clone(),
                        station: name.to_string(),
                    })
            };
            let failed = |source: ServiceError| SeedError::Service {
                what: format!("line {:?}", line.name),
                source,
            };

            let (first, rest) = line
                .sections
                .split_first()
                .ok_or_else(|| SeedError::EmptyLine(line.name.clone()))?;

            let created = service
                .create_line(CreateLine {
                    name: line.name.clone(),
                    color: line.color.clone(),
                    extra_fare: line.extra_fare,
                    up_station_id: lookup(&first.up)?,
                    down_station_id: lookup(&first.down)?,
                    distance: first.distance,
                })
                .map_err(failed)?;

            for section in rest {
                let request = EditRequest::Insert {
                    up_station_id: lookup(&section.up)?,
                    down_station_id: lookup(&section.down)?,
                    distance: section.distance,
                };
                service
                    .edit_topology(created.line().id, request)
                    .map_err(failed)?;
            }
            sections += line.sections.len();
        }

        let report = SeedReport {
            stations: self.stations.len(),
            lines: self.lines.len(),
            sections,
        };
        info!(
            stations = report.stations,
            lines = report.lines,
            sections = report.sections,
            "seeded network"
        );
        Ok(report)
    }
}
