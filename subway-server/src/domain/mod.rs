//! Domain types for subway lines.
//!
//! This module contains the core topology model: stations, segments, the
//! ordered layout of a line, and the edit algebra that changes it. All types
//! enforce their invariants at construction time, so code that receives
//! these types can trust their validity.

mod editor;
mod error;
mod line;
mod segment;
mod station;
mod topology;

pub use editor::{Diff, Edit, EditOutcome, TopologyEditor};
pub use error::DomainError;
pub use line::{Line, LineId, LineMap};
pub use segment::{Distance, Segment};
pub use station::{Station, StationId};
pub use topology::Topology;
