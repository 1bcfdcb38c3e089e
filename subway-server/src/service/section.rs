//! Segment insertion and station removal on a line.

use tracing::{debug, info, warn};

use crate::domain::{Diff, Edit, LineId, Segment, StationId, TopologyEditor};
use crate::store::Store;

use super::{ServiceError, SubwayService};

/// A requested change to one line, by station id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRequest {
    Insert {
        up_station_id: StationId,
        down_station_id: StationId,
        distance: u32,
    },
    Delete {
        station_id: StationId,
    },
}

impl<S: Store> SubwayService<S> {
    /// Applies `request` to the line and persists the resulting diff.
    ///
    /// Nothing is written unless the edit succeeds. If another edit of the
    /// same line lands first, the write fails with a store conflict and the
    /// caller may retry.
    pub fn edit_topology(&self, line_id: LineId, request: EditRequest) -> Result<Diff, ServiceError> {
        self.store.find_line(line_id)?;
        let edit = self.resolve(line_id, request)?;

        let editor = TopologyEditor::new(line_id, self.store.segments_for_line(line_id)?)?;
        let outcome = editor.apply(edit).inspect_err(|e| {
            warn!(line = %line_id, ?request, error = %e, "rejected topology edit");
        })?;

        debug!(
            line = %line_id,
            removed = outcome.diff.removed().len(),
            added = outcome.diff.added().len(),
            "computed topology diff"
        );
        self.store.replace_segments(line_id, &outcome.diff)?;
        info!(
            line = %line_id,
            stations = outcome.topology.len() + 1,
            "updated line topology"
        );

        Ok(outcome.diff)
    }

    fn resolve(&self, line_id: LineId, request: EditRequest) -> Result<Edit, ServiceError> {
        match request {
            EditRequest::Insert {
                up_station_id,
                down_station_id,
                distance,
            } => {
                let up = self.store.find_station(up_station_id)?;
                let down = self.store.find_station(down_station_id)?;
                Ok(Edit::Insert(Segment::new(line_id, up, down, distance)?))
            }
            EditRequest::Delete { station_id } => {
                Ok(Edit::Delete(self.store.find_station(station_id)?))
            }
        }
    }
}
