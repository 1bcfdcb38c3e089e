//! Shortest path and fare between two stations.

use tracing::debug;

use crate::domain::{Station, StationId};
use crate::fare::FarePipeline;
use crate::navigator::{RouteError, RouteGraph};
use crate::store::Store;

use super::{ServiceError, SubwayService};

/// Route and fare answered to a rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSummary {
    /// Stations from origin to destination, inclusive
    pub stations: Vec<Station>,
    pub distance: u32,
    pub fare: u32,
}

impl<S: Store> SubwayService<S> {
    /// Finds the shortest route across all lines and prices it for a rider
    /// of `age`.
    pub fn compute_shortest_path(
        &self,
        start_id: StationId,
        end_id: StationId,
        age: i32,
    ) -> Result<PathSummary, ServiceError> {
        if start_id == end_id {
            return Err(RouteError::SameStation(start_id).into());
        }
        let start = self.store.find_station(start_id)?;
        let end = self.store.find_station(end_id)?;

        // Track and surcharges come from the same read
        let network = self.store.network()?;
        let graph = RouteGraph::new(&network.segments, self.traversal)?;
        let route = graph.shortest_path(&start, &end)?;

        let extra_fares = network.extra_fares_of(route.line_ids())?;
        let fare = FarePipeline::new(route.distance(), &extra_fares, age)?.calculate();

        debug!(
            from = %route.origin(),
            to = %route.destination(),
            distance = route.distance(),
            lines = route.line_ids().len(),
            fare,
            "computed path"
        );

        Ok(PathSummary {
            distance: route.distance(),
            stations: route.into_stations(),
            fare,
        })
    }
}
