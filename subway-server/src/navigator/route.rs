//! Shortest-path results.

use std::collections::BTreeSet;

use crate::domain::{LineId, Station};

/// A shortest path between two stations, possibly spanning several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    stations: Vec<Station>,
    distance: u32,
    line_ids: Vec<LineId>,
}

impl Route {
    /// Builds a route from the stations visited and the lines ridden
    /// between them. Line ids are deduplicated and sorted ascending.
    pub(crate) fn new(
        stations: Vec<Station>,
        distance: u32,
        lines: impl IntoIterator<Item = LineId>,
    ) -> Self {
        let line_ids: BTreeSet<LineId> = lines.into_iter().collect();
        Self {
            stations,
            distance,
            line_ids: line_ids.into_iter().collect(),
        }
    }

    /// Stations from origin to destination, inclusive.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn into_stations(self) -> Vec<Station> {
        self.stations
    }

    /// Total track length of the route.
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Lines whose segments the route uses, ascending by id.
    pub fn line_ids(&self) -> &[LineId] {
        &self.line_ids
    }

    pub fn origin(&self) -> &Station {
        &self.stations[0]
    }

    pub fn destination(&self) -> &Station {
        &self.stations[self.stations.len() - 1]
    }
}
