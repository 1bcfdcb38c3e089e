//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the topology model. They are distinct from store/HTTP errors.

use super::{LineId, StationId};

/// Domain-level errors for segment construction and topology edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Segment distance is zero, or a split would leave a non-positive remainder
    #[error("invalid distance: {0}")]
    InvalidDistance(&'static str),

    /// Segment starts and ends at the same station
    #[error("segment cannot start and end at station {0}")]
    IdenticalEndpoints(StationId),

    /// Topology was built from no segments
    #[error("line has no segments")]
    EmptyTopology,

    /// Segments do not form exactly one connected path
    #[error("segments do not form a single connected path")]
    DisconnectedTopology,

    /// Segments from different lines were mixed together
    #[error("segment belongs to line {found}, expected line {expected}")]
    MixedLines { expected: LineId, found: LineId },

    /// Station is not part of the line
    #[error("station {0} is not registered on the line")]
    StationNotRegistered(StationId),

    /// Neither endpoint of a new segment touches the line
    #[error("neither station {up} nor station {down} is registered on the line")]
    NoAttachmentPoint { up: StationId, down: StationId },

    /// Both endpoints are already joined by a segment
    #[error("stations {up} and {down} are already connected")]
    DuplicateSegment { up: StationId, down: StationId },

    /// Both endpoints are on the line but not adjacent
    #[error("stations {up} and {down} are both already on the line")]
    StationsAlreadyLinked { up: StationId, down: StationId },

    /// Removing a station would leave the line without segments
    #[error("cannot remove a station from a line with a single segment")]
    SingleSegmentRemoval,
}

impl DomainError {
    /// Returns true for errors that mean "the referenced entity is absent".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::StationNotRegistered(_) | DomainError::NoAttachmentPoint { .. }
        )
    }

    /// Returns true for errors caused by malformed persisted data rather
    /// than by the request.
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyTopology
                | DomainError::DisconnectedTopology
                | DomainError::MixedLines { .. }
        )
    }
}
