//! Track segments between adjacent stations.

use std::fmt;

use super::{DomainError, LineId, Station};

/// A strictly positive track length.
///
/// # Examples
///
/// ```
/// use subway_server::domain::Distance;
///
/// let d = Distance::new(7).unwrap();
/// assert_eq!(d.get(), 7);
///
/// // Zero-length segments do not exist
/// assert!(Distance::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Distance(u32);

impl Distance {
    /// Creates a distance, rejecting zero.
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidDistance("distance must be positive"));
        }
        Ok(Distance(value))
    }

    /// Returns the raw length.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Returns what is left of `self` after carving `part` out of it.
    ///
    /// Fails unless `part` is strictly shorter than `self`.
    pub fn shorten_by(self, part: Distance) -> Result<Distance, DomainError> {
        if part.0 >= self.0 {
            return Err(DomainError::InvalidDistance(
                "new segment must be shorter than the segment it splits",
            ));
        }
        Ok(Distance(self.0 - part.0))
    }

    /// Returns the combined length of two segments.
    pub fn extend_by(self, other: Distance) -> Distance {
        Distance(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed edge from an up-station to a down-station on one line.
///
/// # Invariants
///
/// - `distance > 0`
/// - `up_station != down_station`
///
/// Equality covers every field, including distance, so a split segment
/// never compares equal to the segment it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    line_id: LineId,
    up_station: Station,
    down_station: Station,
    distance: Distance,
}

impl Segment {
    /// Creates a segment, validating distance and endpoints.
    pub fn new(
        line_id: LineId,
        up_station: Station,
        down_station: Station,
        distance: u32,
    ) -> Result<Self, DomainError> {
        Self::with_distance(line_id, up_station, down_station, Distance::new(distance)?)
    }

    /// Creates a segment from an already validated distance.
    pub fn with_distance(
        line_id: LineId,
        up_station: Station,
        down_station: Station,
        distance: Distance,
    ) -> Result<Self, DomainError> {
        if up_station == down_station {
            return Err(DomainError::IdenticalEndpoints(up_station.id()));
        }
        Ok(Self {
            line_id,
            up_station,
            down_station,
            distance,
        })
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    pub fn up_station(&self) -> &Station {
        &self.up_station
    }

    pub fn down_station(&self) -> &Station {
        &self.down_station
    }

    pub fn distance(&self) -> Distance {
        self.distance
    }

    /// Returns true if the segment starts at `station`.
    pub fn starts_at(&self, station: &Station) -> bool {
        &self.up_station == station
    }

    /// Returns true if the segment ends at `station`.
    pub fn ends_at(&self, station: &Station) -> bool {
        &self.down_station == station
    }

    /// Returns true if `station` is either endpoint.
    pub fn touches(&self, station: &Station) -> bool {
        self.starts_at(station) || self.ends_at(station)
    }

    /// Returns true if the segment joins `a` and `b`, in either direction.
    pub fn joins(&self, a: &Station, b: &Station) -> bool {
        (self.starts_at(a) && self.ends_at(b)) || (self.starts_at(b) && self.ends_at(a))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] {} -> {} ({})",
            self.line_id,
            self.up_station.id(),
            self.down_station.id(),
            self.distance
        )
    }
}
