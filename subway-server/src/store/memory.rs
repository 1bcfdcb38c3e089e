//! In-process store.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{Diff, Line, LineId, Segment, Station, StationId, Topology};

use super::{
    LineLookup, LineStore, NetworkSnapshot, NewLine, SegmentStore, StationLookup, StationStore,
    StoreError,
};

#[derive(Debug, Default)]
struct Tables {
    stations: BTreeMap<StationId, Station>,
    lines: BTreeMap<LineId, Line>,
    segments: Vec<Segment>,
    last_station_id: u64,
    last_line_id: u64,
}

impl Tables {
    fn line_segments(&self, line_id: LineId) -> Vec<Segment> {
        self.segments
            .iter()
            .filter(|s| s.line_id() == line_id)
            .cloned()
            .collect()
    }

    fn ensure_stations(&self, segments: &[Segment]) -> Result<(), StoreError> {
        for segment in segments {
            for station in [segment.up_station(), segment.down_station()] {
                if !self.stations.contains_key(&station.id()) {
                    return Err(StoreError::StationNotFound(station.id()));
                }
            }
        }
        Ok(())
    }
}

/// Thread-safe store holding all tables behind one reader/writer lock.
///
/// Every write takes the write lock for its whole duration, so a diff is
/// applied all-or-nothing and a stored line always has a valid track.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables.write().map_err(|_| StoreError::Poisoned)
    }
}

impl SegmentStore for MemoryStore {
    fn segments_for_line(&self, line_id: LineId) -> Result<Vec<Segment>, StoreError> {
        Ok(self.read()?.line_segments(line_id))
    }

    fn network(&self) -> Result<NetworkSnapshot, StoreError> {
        let tables = self.read()?;
        Ok(NetworkSnapshot {
            segments: tables.segments.clone(),
            extra_fares: tables
                .lines
                .values()
                .map(|line| (line.id, line.extra_fare))
                .collect(),
        })
    }

    /// Applies `diff` if it still matches the stored line.
    ///
    /// The diff is rejected with [`StoreError::Conflict`] when a segment it
    /// removes is gone, when it adds a segment of another line, or when the
    /// result would no longer be a single connected path. Any of these means
    /// the diff was computed from a stale snapshot.
    fn replace_segments(&self, line_id: LineId, diff: &Diff) -> Result<(), StoreError> {
        let mut tables = self.write()?;

        if !tables.lines.contains_key(&line_id) {
            return Err(StoreError::LineNotFound(line_id));
        }
        tables.ensure_stations(diff.added())?;

        let current = tables.line_segments(line_id);
        let stale = diff.removed().iter().any(|s| !current.contains(s));
        let foreign = diff.added().iter().any(|s| s.line_id() != line_id);
        if stale || foreign {
            return Err(StoreError::Conflict(line_id));
        }

        // A line never loses its last segment
        let updated = Topology::new(diff.apply(&current))
            .map_err(|_| StoreError::Conflict(line_id))?;

        tables.segments.retain(|s| s.line_id() != line_id);
        tables.segments.extend(updated.into_segments());
        Ok(())
    }
}

impl StationLookup for MemoryStore {
    fn find_station(&self, id: StationId) -> Result<Station, StoreError> {
        self.read()?
            .stations
            .get(&id)
            .cloned()
            .ok_or(StoreError::StationNotFound(id))
    }
}

impl StationStore for MemoryStore {
    fn insert_station(&self, name: &str) -> Result<Station, StoreError> {
        let mut tables = self.write()?;
        if tables.stations.values().any(|s| s.name() == name) {
            return Err(StoreError::DuplicateStationName(name.to_string()));
        }

        tables.last_station_id += 1;
        let station = Station::new(StationId(tables.last_station_id), name);
        tables.stations.insert(station.id(), station.clone());
        Ok(station)
    }

    fn list_stations(&self) -> Result<Vec<Station>, StoreError> {
        Ok(self.read()?.stations.values().cloned().collect())
    }

    fn delete_station(&self, id: StationId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let Some(station) = tables.stations.get(&id) else {
            return Err(StoreError::StationNotFound(id));
        };
        if tables.segments.iter().any(|s| s.touches(station)) {
            return Err(StoreError::StationInUse(id));
        }
        tables.stations.remove(&id);
        Ok(())
    }
}

impl LineLookup for MemoryStore {
    fn find_line(&self, id: LineId) -> Result<Line, StoreError> {
        self.read()?
            .lines
            .get(&id)
            .cloned()
            .ok_or(StoreError::LineNotFound(id))
    }
}

impl LineStore for MemoryStore {
    fn insert_line<E, F>(&self, new: &NewLine, lay_track: F) -> Result<(Line, Topology), E>
    where
        E: From<StoreError>,
        F: FnOnce(LineId) -> Result<Topology, E>,
    {
        let mut tables = self.write()?;
        if tables.lines.values().any(|l| l.name == new.name) {
            return Err(StoreError::DuplicateLineName(new.name.clone()).into());
        }

        // The id is only taken once the track is accepted
        let id = LineId(tables.last_line_id + 1);
        let topology = lay_track(id)?;
        if topology.line_id() != id {
            return Err(StoreError::Conflict(id).into());
        }
        tables.ensure_stations(topology.ordered_segments())?;

        let line = Line {
            id,
            name: new.name.clone(),
            color: new.color.clone(),
            extra_fare: new.extra_fare,
        };
        tables.last_line_id = id.0;
        tables.lines.insert(id, line.clone());
        tables
            .segments
            .extend(topology.ordered_segments().iter().cloned());
        Ok((line, topology))
    }

    fn list_lines(&self) -> Result<Vec<Line>, StoreError> {
        Ok(self.read()?.lines.values().cloned().collect())
    }

    fn update_line(&self, line: &Line) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if !tables.lines.contains_key(&line.id) {
            return Err(StoreError::LineNotFound(line.id));
        }
        if tables
            .lines
            .values()
            .any(|other| other.id != line.id && other.name == line.name)
        {
            return Err(StoreError::DuplicateLineName(line.name.clone()));
        }
        tables.lines.insert(line.id, line.clone());
        Ok(())
    }

    fn delete_line(&self, id: LineId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.lines.remove(&id).is_none() {
            return Err(StoreError::LineNotFound(id));
        }
        tables.segments.retain(|s| s.line_id() != id);
        Ok(())
    }
}
