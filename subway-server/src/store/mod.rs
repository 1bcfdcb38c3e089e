//! Persistence boundary.
//!
//! The services only talk to storage through these traits, so the topology
//! and routing logic can be exercised against any backing store. The crate
//! ships an in-process implementation, [`MemoryStore`].

mod memory;

use std::collections::HashMap;

use crate::domain::{Diff, Line, LineId, Segment, Station, StationId, Topology};

pub use memory::MemoryStore;

/// Errors raised by a store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("station {0} not found")]
    StationNotFound(StationId),

    #[error("line {0} not found")]
    LineNotFound(LineId),

    #[error("a station named {0:?} already exists")]
    DuplicateStationName(String),

    #[error("a line named {0:?} already exists")]
    DuplicateLineName(String),

    /// Station is still part of some line
    #[error("station {0} is registered on a line and cannot be deleted")]
    StationInUse(StationId),

    /// The line changed between reading its segments and writing the diff
    #[error("line {0} was modified concurrently; retry the edit")]
    Conflict(LineId),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::StationNotFound(_) | StoreError::LineNotFound(_)
        )
    }
}

/// Attributes of a line that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLine {
    pub name: String,
    pub color: String,
    pub extra_fare: u32,
}

/// Every line's track and surcharge, read at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSnapshot {
    pub segments: Vec<Segment>,
    pub extra_fares: HashMap<LineId, u32>,
}

impl NetworkSnapshot {
    /// Extra fare of each line in `ids`, in the same order.
    pub fn extra_fares_of(&self, ids: &[LineId]) -> Result<Vec<u32>, StoreError> {
        ids.iter()
            .map(|id| {
                self.extra_fares
                    .get(id)
                    .copied()
                    .ok_or(StoreError::LineNotFound(*id))
            })
            .collect()
    }
}

/// Segment storage.
pub trait SegmentStore {
    /// All segments of one line, in no particular order.
    fn segments_for_line(&self, line_id: LineId) -> Result<Vec<Segment>, StoreError>;

    /// Every segment of every line together with every line's extra fare.
    fn network(&self) -> Result<NetworkSnapshot, StoreError>;

    /// Atomically deletes `diff.removed()` and inserts `diff.added()`.
    fn replace_segments(&self, line_id: LineId, diff: &Diff) -> Result<(), StoreError>;
}

/// Station lookup by id.
pub trait StationLookup {
    fn find_station(&self, id: StationId) -> Result<Station, StoreError>;
}

/// Line lookup by id.
pub trait LineLookup {
    fn find_line(&self, id: LineId) -> Result<Line, StoreError>;
}

/// Station management.
pub trait StationStore: StationLookup {
    /// Stores a station under a fresh id. Names are unique.
    fn insert_station(&self, name: &str) -> Result<Station, StoreError>;

    fn list_stations(&self) -> Result<Vec<Station>, StoreError>;

    /// Deletes a station that no segment references.
    fn delete_station(&self, id: StationId) -> Result<(), StoreError>;
}

/// Line management.
pub trait LineStore: LineLookup {
    /// Stores a line under a fresh id together with its first track, in
    /// one write. Names are unique.
    ///
    /// `lay_track` receives the id the line will get and returns its
    /// topology. It runs with the store locked and must not call back into
    /// it. If it fails, nothing is stored.
    fn insert_line<E, F>(&self, line: &NewLine, lay_track: F) -> Result<(Line, Topology), E>
    where
        E: From<StoreError>,
        F: FnOnce(LineId) -> Result<Topology, E>;

    fn list_lines(&self) -> Result<Vec<Line>, StoreError>;

    /// Overwrites name, color and extra fare of an existing line.
    fn update_line(&self, line: &Line) -> Result<(), StoreError>;

    /// Deletes a line and all of its segments.
    fn delete_line(&self, id: LineId) -> Result<(), StoreError>;
}

/// Everything the services need from storage.
pub trait Store: SegmentStore + StationStore + LineStore {}

impl<T: SegmentStore + StationStore + LineStore> Store for T {}
