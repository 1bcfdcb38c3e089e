//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Diff, LineMap, Segment, Station, StationId};
use crate::service::{CreateLine, EditRequest, PathSummary, UpdateLine};

/// Request to register a station.
#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    pub name: String,
}

/// A station in responses.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StationResponse {
    pub id: u64,
    pub name: String,
}

/// Request to create a line with its first section.
#[derive(Debug, Deserialize)]
pub struct CreateLineRequest {
    pub name: String,
    pub color: String,

    /// Surcharge for riding this line (defaults to 0)
    #[serde(default)]
    pub extra_fare: u32,

    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u32,
}

/// Request to change a line's attributes.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub extra_fare: u32,
}

/// A line in responses, stations from upper to lower terminus.
#[derive(Debug, Serialize, Deserialize)]
pub struct LineResponse {
    pub id: u64,
    pub name: String,
    pub color: String,
    pub extra_fare: u32,
    pub stations: Vec<StationResponse>,
}

/// Request to add a section to a line.
#[derive(Debug, Deserialize)]
pub struct SectionRequest {
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u32,
}

/// Query for removing a station from a line.
#[derive(Debug, Deserialize)]
pub struct RemoveSectionQuery {
    pub station_id: u64,
}

/// One section in a diff.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionResponse {
    pub up_station_id: u64,
    pub down_station_id: u64,
    pub distance: u32,
}

/// Sections removed from and added to a line by an edit.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiffResponse {
    pub removed: Vec<SectionResponse>,
    pub added: Vec<SectionResponse>,
}

/// Query for a shortest path.
#[derive(Debug, Deserialize)]
pub struct PathQuery {
    /// Origin station id
    pub source: u64,

    /// Destination station id
    pub target: u64,

    /// Rider's age, for the fare discount
    pub age: i32,
}

/// Shortest path with its fare.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathResponse {
    pub stations: Vec<StationResponse>,
    pub distance: u32,
    pub fare: u32,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl From<&Station> for StationResponse {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id().0,
            name: station.name().to_string(),
        }
    }
}

impl From<&LineMap> for LineResponse {
    fn from(map: &LineMap) -> Self {
        let line = map.line();
        Self {
            id: line.id.0,
            name: line.name.clone(),
            color: line.color.clone(),
            extra_fare: line.extra_fare,
            stations: map.ordered_stations().iter().map(StationResponse::from).collect(),
        }
    }
}

impl From<&Segment> for SectionResponse {
    fn from(segment: &Segment) -> Self {
        Self {
            up_station_id: segment.up_station().id().0,
            down_station_id: segment.down_station().id().0,
            distance: segment.distance().get(),
        }
    }
}

impl From<&Diff> for DiffResponse {
    fn from(diff: &Diff) -> Self {
        Self {
            removed: diff.removed().iter().map(SectionResponse::from).collect(),
            added: diff.added().iter().map(SectionResponse::from).collect(),
        }
    }
}

impl From<PathSummary> for PathResponse {
    fn from(summary: PathSummary) -> Self {
        Self {
            stations: summary.stations.iter().map(StationResponse::from).collect(),
            distance: summary.distance,
            fare: summary.fare,
        }
    }
}

impl From<CreateLineRequest> for CreateLine {
    fn from(req: CreateLineRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
            extra_fare: req.extra_fare,
            up_station_id: StationId(req.up_station_id),
            down_station_id: StationId(req.down_station_id),
            distance: req.distance,
        }
    }
}

impl From<UpdateLineRequest> for UpdateLine {
    fn from(req: UpdateLineRequest) -> Self {
        Self {
            name: req.name,
            color: req.color,
            extra_fare: req.extra_fare,
        }
    }
}

impl From<SectionRequest> for EditRequest {
    fn from(req: SectionRequest) -> Self {
        EditRequest::Insert {
            up_station_id: StationId(req.up_station_id),
            down_station_id: StationId(req.down_station_id),
            distance: req.distance,
        }
    }
}
