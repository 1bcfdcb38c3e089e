//! Line management.

use tracing::{info, warn};

use crate::domain::{
    Distance, DomainError, Line, LineId, LineMap, Segment, StationId, Topology, TopologyEditor,
};
use crate::store::{NewLine, Store};

use super::{ServiceError, SubwayService, required};

/// A new line with its first segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLine {
    pub name: String,
    pub color: String,
    pub extra_fare: u32,
    pub up_station_id: StationId,
    pub down_station_id: StationId,
    pub distance: u32,
}

/// New attributes for an existing line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateLine {
    pub name: String,
    pub color: String,
    pub extra_fare: u32,
}

impl<S: Store> SubwayService<S> {
    /// Creates a line whose track is a single segment.
    ///
    /// The line and its segment are stored in one write, so no reader ever
    /// sees the line without track.
    pub fn create_line(&self, request: CreateLine) -> Result<LineMap, ServiceError> {
        let name = required(&request.name, "line name")?;
        let color = required(&request.color, "line color")?;
        let distance = Distance::new(request.distance)?;
        let up = self.store.find_station(request.up_station_id)?;
        let down = self.store.find_station(request.down_station_id)?;
        if up == down {
            return Err(DomainError::IdenticalEndpoints(up.id()).into());
        }

        let new = NewLine {
            name,
            color,
            extra_fare: request.extra_fare,
        };
        let (line, topology) = self
            .store
            .insert_line(&new, |line_id| -> Result<Topology, ServiceError> {
                let segment = Segment::with_distance(line_id, up, down, distance)?;
                Ok(TopologyEditor::new(line_id, Vec::new())?.insert(segment)?.topology)
            })
            .inspect_err(|e| warn!(name = %new.name, error = %e, "line rejected"))?;

        info!(line = %line.id, name = %line.name, "created line");
        Ok(LineMap::new(line, topology))
    }

    /// Returns a line with its stations in order.
    pub fn find_line(&self, id: LineId) -> Result<LineMap, ServiceError> {
        let line = self.store.find_line(id)?;
        self.map_line(line)
    }

    pub fn list_lines(&self) -> Result<Vec<LineMap>, ServiceError> {
        self.store
            .list_lines()?
            .into_iter()
            .map(|line| self.map_line(line))
            .collect()
    }

    fn map_line(&self, line: Line) -> Result<LineMap, ServiceError> {
        let topology = Topology::new(self.store.segments_for_line(line.id)?)?;
        Ok(LineMap::new(line, topology))
    }

    /// Renames, recolors or reprices a line. Its track is untouched.
    pub fn update_line(&self, id: LineId, request: UpdateLine) -> Result<Line, ServiceError> {
        let mut line = self.store.find_line(id)?;
        line.name = required(&request.name, "line name")?;
        line.color = required(&request.color, "line color")?;
        line.extra_fare = request.extra_fare;

        self.store.update_line(&line)?;
        info!(line = %id, name = %line.name, "updated line");
        Ok(line)
    }

    /// Deletes a line and its segments.
    pub fn delete_line(&self, id: LineId) -> Result<(), ServiceError> {
        self.store.delete_line(id)?;
        info!(line = %id, "deleted line");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{create_line, network, service};
    use super::*;
    use crate::service::{EditRequest, ErrorKind};
    use crate::store::{LineLookup, LineStore, MemoryStore, SegmentStore, StationStore, StoreError};

    fn request(name: &str, up: u64, down: u64, distance: u32) -> CreateLine {
        CreateLine {
            name: name.to_string(),
            color: "orange".to_string(),
            extra_fare: 200,
            up_station_id: StationId(up),
            down_station_id: StationId(down),
            distance,
        }
    }

    fn with_stations(n: u64) -> SubwayService<MemoryStore> {
        let service = service();
        for i in 1..=n {
            service.create_station(&format!("S{i}")).unwrap();
        }
        service
    }

    #[test]
    fn create_line_lays_first_segment() {
        let service = with_stations(2);
        let map = service.create_line(request(" Line 3 ", 1, 2, 7)).unwrap();

        assert_eq!(map.line().name, "Line 3");
        assert_eq!(map.line().extra_fare, 200);
        let ids: Vec<u64> = map.ordered_stations().iter().map(|s| s.id().0).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(map.topology().total_distance(), 7);
        assert_eq!(service.store().segments_for_line(map.line().id).unwrap().len(), 1);
    }

    #[test]
    fn create_line_validates_before_storing() {
        let service = with_stations(2);

        let err = service.create_line(request("L", 1, 2, 0)).unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidDistance(_))));

        let err = service.create_line(request("L", 1, 1, 5)).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Domain(DomainError::IdenticalEndpoints(StationId(1)))
        );

        let err = service.create_line(request("L", 1, 9, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = service.create_line(request("  ", 1, 2, 5)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidRequest(_)));

        assert!(service.list_lines().unwrap().is_empty());
    }

    #[test]
    fn line_names_are_unique() {
        let service = with_stations(4);
        service.create_line(request("Line 3", 1, 2, 5)).unwrap();
        let err = service.create_line(request("Line 3", 3, 4, 5)).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Store(StoreError::DuplicateLineName("Line 3".to_string()))
        );
        assert_eq!(service.store().list_lines().unwrap().len(), 1);
    }

    #[test]
    fn rejected_line_leaves_no_trace() {
        let service = network();
        let err = service.create_line(request("Line 7", 4, 4, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        let err = service.create_line(request("Line 7", 4, 99, 5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert_eq!(service.list_lines().unwrap().len(), 3);

        let map = service.create_line(request("Line 7", 4, 6, 5)).unwrap();
        assert_eq!(map.line().id, LineId(4));
    }

    #[test]
    fn lines_being_created_are_listed_with_track() {
        let service = with_stations(2);
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..20 {
                    service.create_line(request(&format!("Line {i}"), 1, 2, 5)).unwrap();
                }
            });
            scope.spawn(|| {
                for _ in 0..200 {
                    for map in service.list_lines().unwrap() {
                        assert_eq!(map.topology().len(), 1);
                    }
                }
            });
        });
        assert_eq!(service.list_lines().unwrap().len(), 20);
    }

    #[test]
    fn list_lines_orders_stations() {
        let service = network();
        let lines = service.list_lines().unwrap();
        assert_eq!(lines.len(), 3);

        let ids: Vec<u64> = lines[0].ordered_stations().iter().map(|s| s.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3, 6]);
    }

    #[test]
    fn update_line_changes_attributes_only() {
        let service = network();
        let updated = service
            .update_line(
                LineId(2),
                UpdateLine {
                    name: "Shinbundang".to_string(),
                    color: "red".to_string(),
                    extra_fare: 1000,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Shinbundang");

        let map = service.find_line(LineId(2)).unwrap();
        assert_eq!(map.line().extra_fare, 1000);
        assert_eq!(map.topology().len(), 2);

        let err = service
            .update_line(
                LineId(1),
                UpdateLine {
                    name: "Shinbundang".to_string(),
                    color: "red".to_string(),
                    extra_fare: 0,
                },
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Store(StoreError::DuplicateLineName(_))
        ));
    }

    #[test]
    fn delete_line_frees_its_stations() {
        let service = with_stations(3);
        let line = create_line(&service, "Line 1", 0, (1, 2, 4));
        service
            .edit_topology(
                line,
                EditRequest::Insert {
                    up_station_id: StationId(2),
                    down_station_id: StationId(3),
                    distance: 4,
                },
            )
            .unwrap();

        service.delete_line(line).unwrap();
        assert_eq!(
            service.find_line(line).unwrap_err(),
            ServiceError::Store(StoreError::LineNotFound(line))
        );
        assert!(service.store().find_line(line).is_err());
        service.store().delete_station(StationId(2)).unwrap();
    }
}
