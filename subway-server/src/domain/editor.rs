//! Structural edits to a line's topology.
//!
//! An edit never mutates the current topology. It produces a new
//! [`Topology`] and the [`Diff`] between the two, so persistence only has to
//! touch the segments that actually changed.

use std::collections::HashSet;

use super::{DomainError, LineId, Segment, Station, Topology};

/// A single structural change to a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Add a segment, splitting an existing one if it lands mid-line
    Insert(Segment),
    /// Remove a station, merging its neighbouring segments if it is interior
    Delete(Station),
}

/// Minimal set of segment changes between two topologies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    removed: Vec<Segment>,
    added: Vec<Segment>,
}

impl Diff {
    /// Computes `old − new` and `new − old` by full value equality.
    ///
    /// Both lists keep the order of their source slice.
    pub fn between(old: &[Segment], new: &[Segment]) -> Self {
        let old_set: HashSet<&Segment> = old.iter().collect();
        let new_set: HashSet<&Segment> = new.iter().collect();

        Self {
            removed: old
                .iter()
                .filter(|s| !new_set.contains(s))
                .cloned()
                .collect(),
            added: new
                .iter()
                .filter(|s| !old_set.contains(s))
                .cloned()
                .collect(),
        }
    }

    /// Segments to delete from storage.
    pub fn removed(&self) -> &[Segment] {
        &self.removed
    }

    /// Segments to write to storage.
    pub fn added(&self) -> &[Segment] {
        &self.added
    }

    /// Applies this diff to a segment list: drop `removed`, then append `added`.
    pub fn apply(&self, segments: &[Segment]) -> Vec<Segment> {
        let removed: HashSet<&Segment> = self.removed.iter().collect();
        segments
            .iter()
            .filter(|s| !removed.contains(s))
            .chain(self.added.iter())
            .cloned()
            .collect()
    }
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub topology: Topology,
    pub diff: Diff,
}

/// Applies edits to one line's topology.
///
/// The editor may start from an empty line, in which case the first
/// inserted segment is accepted as-is.
#[derive(Debug, Clone)]
pub struct TopologyEditor {
    line_id: LineId,
    current: Option<Topology>,
}

impl TopologyEditor {
    /// Creates an editor over the given (unordered, possibly empty) segments.
    pub fn new(line_id: LineId, segments: Vec<Segment>) -> Result<Self, DomainError> {
        if segments.is_empty() {
            return Ok(Self {
                line_id,
                current: None,
            });
        }
        let topology = Topology::new(segments)?;
        if topology.line_id() != line_id {
            return Err(DomainError::MixedLines {
                expected: line_id,
                found: topology.line_id(),
            });
        }
        Ok(Self {
            line_id,
            current: Some(topology),
        })
    }

    /// Returns the topology edits are applied to, if the line has any segments.
    pub fn current(&self) -> Option<&Topology> {
        self.current.as_ref()
    }

    pub fn apply(&self, edit: Edit) -> Result<EditOutcome, DomainError> {
        match edit {
            Edit::Insert(segment) => self.insert(segment),
            Edit::Delete(station) => self.delete(&station),
        }
    }

    /// Inserts `segment`, extending a terminus or splitting an existing segment.
    ///
    /// # Errors
    ///
    /// - [`DomainError::MixedLines`] if the segment belongs to another line
    /// - [`DomainError::DuplicateSegment`] if both stations are already adjacent
    /// - [`DomainError::StationsAlreadyLinked`] if both stations are on the line
    /// - [`DomainError::InvalidDistance`] if a split segment is not longer
    ///   than the new one
    /// - [`DomainError::NoAttachmentPoint`] if neither station is on the line
    pub fn insert(&self, segment: Segment) -> Result<EditOutcome, DomainError> {
        if segment.line_id() != self.line_id {
            return Err(DomainError::MixedLines {
                expected: self.line_id,
                found: segment.line_id(),
            });
        }

        let Some(current) = &self.current else {
            return self.finish(&[], vec![segment]);
        };

        let up = segment.up_station();
        let down = segment.down_station();

        if current.ordered_segments().iter().any(|s| s.joins(up, down)) {
            return Err(DomainError::DuplicateSegment {
                up: up.id(),
                down: down.id(),
            });
        }
        if current.is_registered(up) && current.is_registered(down) {
            return Err(DomainError::StationsAlreadyLinked {
                up: up.id(),
                down: down.id(),
            });
        }

        let mut segments = current.ordered_segments().to_vec();

        if current.is_extension_of(&segment) {
            segments.push(segment);
        } else if current.is_registered(up) {
            let existing = current
                .downstream_segment_of(up)?
                .ok_or(DomainError::StationNotRegistered(up.id()))?;
            let remainder = existing.distance().shorten_by(segment.distance())?;
            let tail = Segment::with_distance(
                self.line_id,
                down.clone(),
                existing.down_station().clone(),
                remainder,
            )?;
            replace(&mut segments, existing, [segment, tail]);
        } else if current.is_registered(down) {
            let existing = current
                .upstream_segment_of(down)?
                .ok_or(DomainError::StationNotRegistered(down.id()))?;
            let remainder = existing.distance().shorten_by(segment.distance())?;
            let head = Segment::with_distance(
                self.line_id,
                existing.up_station().clone(),
                up.clone(),
                remainder,
            )?;
            replace(&mut segments, existing, [head, segment]);
        } else {
            return Err(DomainError::NoAttachmentPoint {
                up: up.id(),
                down: down.id(),
            });
        }

        self.finish(current.ordered_segments(), segments)
    }

    /// Removes `station`, merging the segments on either side if it is interior.
    ///
    /// # Errors
    ///
    /// - [`DomainError::SingleSegmentRemoval`] if the line has one segment
    /// - [`DomainError::StationNotRegistered`] if the station is not on the line
    pub fn delete(&self, station: &Station) -> Result<EditOutcome, DomainError> {
        let Some(current) = &self.current else {
            return Err(DomainError::StationNotRegistered(station.id()));
        };

        if current.is_single_segment() {
            return Err(DomainError::SingleSegmentRemoval);
        }

        let upstream = current.upstream_segment_of(station)?;
        let downstream = current.downstream_segment_of(station)?;

        let mut segments: Vec<Segment> = current
            .ordered_segments()
            .iter()
            .filter(|s| !s.touches(station))
            .cloned()
            .collect();

        if let (Some(before), Some(after)) = (upstream, downstream) {
            segments.push(Segment::with_distance(
                self.line_id,
                before.up_station().clone(),
                after.down_station().clone(),
                before.distance().extend_by(after.distance()),
            )?);
        }

        self.finish(current.ordered_segments(), segments)
    }

    fn finish(&self, old: &[Segment], new: Vec<Segment>) -> Result<EditOutcome, DomainError> {
        let topology = Topology::new(new)?;
        let diff = Diff::between(old, topology.ordered_segments());
        Ok(EditOutcome { topology, diff })
    }
}

/// Swaps `target` for `replacements`, keeping its position.
fn replace(segments: &mut Vec<Segment>, target: &Segment, replacements: [Segment; 2]) {
    if let Some(idx) = segments.iter().position(|s| s == target) {
        segments.splice(idx..=idx, replacements);
    }
}
