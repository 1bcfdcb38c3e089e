//! Weighted station graph over every line's segments.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::trace;

use crate::domain::{LineId, Segment, Station, StationId};

use super::route::Route;

/// Error from route computation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// No segments to build a graph from
    #[error("no segments registered on any line")]
    EmptyGraph,

    /// Origin and destination are the same station
    #[error("origin and destination are the same station ({0})")]
    SameStation(StationId),

    /// Station has no segments on any line
    #[error("station {0} is not served by any line")]
    StationNotFound(StationId),

    /// No sequence of segments connects the two stations
    #[error("no route from station {from} to station {to}")]
    Unreachable { from: StationId, to: StationId },
}

impl RouteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RouteError::StationNotFound(_))
    }
}

/// Which way a segment may be ridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Only from up-station to down-station.
    #[default]
    Directed,
    /// Both ways, at the same cost.
    Bidirectional,
}

impl Traversal {
    /// Parses `directed` or `bidirectional`, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "directed" => Some(Traversal::Directed),
            "bidirectional" => Some(Traversal::Bidirectional),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: StationId,
    weight: u32,
    line_id: LineId,
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: u64,
    station: StationId,
}

// Min-heap on cost; ties pop the lower station id first.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.station.cmp(&self.station))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Directed weighted graph: stations are vertices, segments are edges.
///
/// Between any ordered pair of stations only the lightest segment is kept
/// (ties go to the lower line id), so route results are deterministic even
/// when several lines share track.
#[derive(Debug, Clone)]
pub struct RouteGraph {
    stations: HashMap<StationId, Station>,
    edges: HashMap<StationId, Vec<Edge>>,
}

impl RouteGraph {
    /// Builds the graph from segments of any number of lines.
    pub fn new(segments: &[Segment], traversal: Traversal) -> Result<Self, RouteError> {
        if segments.is_empty() {
            return Err(RouteError::EmptyGraph);
        }

        let mut graph = Self {
            stations: HashMap::new(),
            edges: HashMap::new(),
        };

        for segment in segments {
            let weight = segment.distance().get();
            let (up, down) = (segment.up_station(), segment.down_station());
            graph.add_edge(up, down, weight, segment.line_id());
            if traversal == Traversal::Bidirectional {
                graph.add_edge(down, up, weight, segment.line_id());
            }
        }

        Ok(graph)
    }

    fn add_edge(&mut self, from: &Station, to: &Station, weight: u32, line_id: LineId) {
        self.stations
            .entry(from.id())
            .or_insert_with(|| from.clone());
        self.stations.entry(to.id()).or_insert_with(|| to.clone());

        let edges = self.edges.entry(from.id()).or_default();
        match edges.iter_mut().find(|e| e.to == to.id()) {
            Some(existing) => {
                if (weight, line_id) < (existing.weight, existing.line_id) {
                    existing.weight = weight;
                    existing.line_id = line_id;
                }
            }
            None => edges.push(Edge {
                to: to.id(),
                weight,
                line_id,
            }),
        }
    }

    /// Returns true if any segment touches `station`.
    pub fn contains(&self, station: StationId) -> bool {
        self.stations.contains_key(&station)
    }

    /// Finds the minimum-distance route from `start` to `end` (Dijkstra).
    ///
    /// # Errors
    ///
    /// - [`RouteError::SameStation`] if `start == end`
    /// - [`RouteError::StationNotFound`] if either station is not in the graph
    /// - [`RouteError::Unreachable`] if no path exists
    pub fn shortest_path(&self, start: &Station, end: &Station) -> Result<Route, RouteError> {
        let (start, end) = (start.id(), end.id());
        if start == end {
            return Err(RouteError::SameStation(start));
        }
        for station in [start, end] {
            if !self.contains(station) {
                return Err(RouteError::StationNotFound(station));
            }
        }

        let mut dist: HashMap<StationId, u64> = HashMap::new();
        let mut prev: HashMap<StationId, (StationId, LineId)> = HashMap::new();
        let mut heap = BinaryHeap::new();

        dist.insert(start, 0);
        heap.push(State {
            cost: 0,
            station: start,
        });

        while let Some(State { cost, station }) = heap.pop() {
            if station == end {
                break;
            }
            // Stale heap entry
            if dist.get(&station).is_some_and(|&best| cost > best) {
                continue;
            }

            for edge in self.edges.get(&station).into_iter().flatten() {
                let next = cost + u64::from(edge.weight);
                if dist.get(&edge.to).is_none_or(|&best| next < best) {
                    dist.insert(edge.to, next);
                    prev.insert(edge.to, (station, edge.line_id));
                    heap.push(State {
                        cost: next,
                        station: edge.to,
                    });
                }
            }
        }

        let Some(&total) = dist.get(&end) else {
            return Err(RouteError::Unreachable {
                from: start,
                to: end,
            });
        };

        let mut path = vec![end];
        let mut lines = Vec::new();
        let mut current = end;
        while let Some(&(before, line_id)) = prev.get(&current) {
            path.push(before);
            lines.push(line_id);
            current = before;
        }
        path.reverse();

        let stations = path
            .iter()
            .filter_map(|id| self.stations.get(id).cloned())
            .collect();

        trace!(
            from = %start,
            to = %end,
            distance = total,
            hops = lines.len(),
            "shortest path found"
        );

        Ok(Route::new(
            stations,
            u32::try_from(total).unwrap_or(u32::MAX),
            lines,
        ))
    }
}
