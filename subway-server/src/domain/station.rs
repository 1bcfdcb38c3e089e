//! Station types.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Store-assigned station identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(pub u64);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted station.
///
/// Identity is the id alone: two `Station` values with the same id are the
/// same station even if one carries a stale name.
///
/// # Examples
///
/// ```
/// use subway_server::domain::{Station, StationId};
///
/// let a = Station::new(StationId(1), "Gangnam");
/// let b = Station::new(StationId(1), "Gangnam (renamed)");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct Station {
    id: StationId,
    name: String,
}

impl Station {
    /// Creates a station with the given id and name.
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Returns the station id.
    pub fn id(&self) -> StationId {
        self.id
    }

    /// Returns the station name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
