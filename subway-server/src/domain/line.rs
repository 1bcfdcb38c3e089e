//! Line types.

use std::fmt;

use super::{Station, Topology};

/// Store-assigned line identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Line attributes, without its track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: String,
    /// Surcharge added to any fare whose route uses this line.
    pub extra_fare: u32,
}

/// A line together with its current topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMap {
    line: Line,
    topology: Topology,
}

impl LineMap {
    pub fn new(line: Line, topology: Topology) -> Self {
        Self { line, topology }
    }

    pub fn line(&self) -> &Line {
        &self.line
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Stations from upper to lower terminus.
    pub fn ordered_stations(&self) -> Vec<Station> {
        self.topology.ordered_stations()
    }
}
