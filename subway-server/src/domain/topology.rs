//! Ordered, validated track layout of a single line.
//!
//! A `Topology` is always a single simple path: one upper terminus, one
//! lower terminus, and every segment's down-station is the next segment's
//! up-station. Construction sorts an unordered segment set into that chain
//! and rejects anything that does not fit.

use std::collections::{HashMap, HashSet};

use super::{DomainError, LineId, Segment, Station};

/// The segments of one line, sorted from upper to lower terminus.
///
/// # Invariants
///
/// - At least one segment
/// - All segments belong to the same line
/// - Consecutive segments connect (down-station = next up-station)
/// - No station is visited twice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    segments: Vec<Segment>,
}

impl Topology {
    /// Sorts `segments` into a single chain.
    ///
    /// # Errors
    ///
    /// - [`DomainError::EmptyTopology`] if `segments` is empty
    /// - [`DomainError::MixedLines`] if segments come from different lines
    /// - [`DomainError::DisconnectedTopology`] on branches, cycles, or
    ///   disjoint pieces
    ///
    /// # Examples
    ///
    /// ```
    /// use subway_server::domain::{LineId, Segment, Station, StationId, Topology};
    ///
    /// let a = Station::new(StationId(1), "A");
    /// let b = Station::new(StationId(2), "B");
    /// let c = Station::new(StationId(3), "C");
    ///
    /// // Input order does not matter
    /// let topology = Topology::new(vec![
    ///     Segment::new(LineId(1), b.clone(), c.clone(), 4).unwrap(),
    ///     Segment::new(LineId(1), a.clone(), b.clone(), 3).unwrap(),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(topology.ordered_stations(), vec![a, b, c]);
    /// ```
    pub fn new(segments: Vec<Segment>) -> Result<Self, DomainError> {
        let line_id = segments
            .first()
            .map(Segment::line_id)
            .ok_or(DomainError::EmptyTopology)?;

        if let Some(stray) = segments.iter().find(|s| s.line_id() != line_id) {
            return Err(DomainError::MixedLines {
                expected: line_id,
                found: stray.line_id(),
            });
        }

        let sorted = sort_chain(&segments)?;
        if sorted.len() != segments.len() {
            return Err(DomainError::DisconnectedTopology);
        }

        Ok(Self { segments: sorted })
    }

    /// Returns the line these segments belong to.
    pub fn line_id(&self) -> LineId {
        self.segments[0].line_id()
    }

    pub fn is_single_segment(&self) -> bool {
        self.segments.len() == 1
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a constructed topology.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn upper_terminus(&self) -> &Station {
        self.segments[0].up_station()
    }

    pub fn lower_terminus(&self) -> &Station {
        self.segments[self.segments.len() - 1].down_station()
    }

    /// Returns true if `segment` would extend the line past either terminus.
    pub fn is_extension_of(&self, segment: &Segment) -> bool {
        segment.ends_at(self.upper_terminus()) || segment.starts_at(self.lower_terminus())
    }

    pub fn is_registered(&self, station: &Station) -> bool {
        self.segments.iter().any(|s| s.touches(station))
    }

    /// The segment arriving at `station`, or `None` at the upper terminus.
    pub fn upstream_segment_of(&self, station: &Station) -> Result<Option<&Segment>, DomainError> {
        self.ensure_registered(station)?;
        Ok(self.segments.iter().find(|s| s.ends_at(station)))
    }

    /// The segment leaving `station`, or `None` at the lower terminus.
    pub fn downstream_segment_of(
        &self,
        station: &Station,
    ) -> Result<Option<&Segment>, DomainError> {
        self.ensure_registered(station)?;
        Ok(self.segments.iter().find(|s| s.starts_at(station)))
    }

    /// Upper terminus followed by every segment's down-station.
    pub fn ordered_stations(&self) -> Vec<Station> {
        std::iter::once(self.upper_terminus())
            .chain(self.segments.iter().map(Segment::down_station))
            .cloned()
            .collect()
    }

    pub fn ordered_segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Consumes the topology, returning its segments in chain order.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Total length from upper to lower terminus.
    pub fn total_distance(&self) -> u32 {
        self.segments.iter().map(|s| s.distance().get()).sum()
    }

    fn ensure_registered(&self, station: &Station) -> Result<(), DomainError> {
        if self.is_registered(station) {
            Ok(())
        } else {
            Err(DomainError::StationNotRegistered(station.id()))
        }
    }
}

/// Follows segments from the unique upper terminus.
///
/// The returned chain is shorter than the input when the input branches or
/// contains disjoint pieces; the caller compares lengths.
fn sort_chain(segments: &[Segment]) -> Result<Vec<Segment>, DomainError> {
    let down_stations: HashSet<&Station> = segments.iter().map(Segment::down_station).collect();
    let termini: HashSet<&Station> = segments
        .iter()
        .map(Segment::up_station)
        .filter(|s| !down_stations.contains(s))
        .collect();

    let mut termini = termini.into_iter();
    let upper = match (termini.next(), termini.next()) {
        (Some(only), None) => only,
        _ => return Err(DomainError::DisconnectedTopology),
    };

    let mut by_up: HashMap<&Station, &Segment> = HashMap::with_capacity(segments.len());
    for segment in segments {
        if by_up.insert(segment.up_station(), segment).is_some() {
            // Two segments leave the same station
            return Err(DomainError::DisconnectedTopology);
        }
    }

    let mut chain = Vec::with_capacity(segments.len());
    let mut current = upper;
    while let Some(segment) = by_up.get(current) {
        if chain.len() == segments.len() {
            // Cycle below the terminus
            return Err(DomainError::DisconnectedTopology);
        }
        chain.push((*segment).clone());
        current = segment.down_station();
    }

    Ok(chain)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn sorts_unordered_segments() {
        let topology =
            Topology::new(vec![seg(1, 3, 4, 5), seg(1, 1, 2, 5), seg(1, 2, 3, 5)]).unwrap();

        let ids: Vec<u64> = topology
            .ordered_stations()
            .iter()
            .map(|s| s.id().0)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(topology.ordered_segments()[0], seg(1, 1, 2, 5));
        assert_eq!(topology.total_distance(), 15);
    }

    #[test]
    fn empty_input_fails() {
        assert_eq!(Topology::new(vec![]), Err(DomainError::EmptyTopology));
    }

    #[test]
    fn disjoint_pieces_fail() {
        let result = Topology::new(vec![seg(1, 1, 2, 5), seg(1, 3, 4, 5)]);
        assert_eq!(result, Err(DomainError::DisconnectedTopology));
    }

    #[test]
    fn branch_fails() {
        let result = Topology::new(vec![seg(1, 1, 2, 5), seg(1, 2, 3, 5), seg(1, 2, 4, 5)]);
        assert_eq!(result, Err(DomainError::DisconnectedTopology));
    }

    #[test]
    fn merge_into_one_station_fails() {
        let result = Topology::new(vec![seg(1, 1, 3, 5), seg(1, 2, 3, 5)]);
        assert_eq!(result, Err(DomainError::DisconnectedTopology));
    }

    #[test]
    fn full_cycle_fails() {
        let result = Topology::new(vec![seg(1, 1, 2, 5), seg(1, 2, 3, 5), seg(1, 3, 1, 5)]);
        assert_eq!(result, Err(DomainError::DisconnectedTopology));
    }

    #[test]
    fn cycle_below_terminus_fails_without_looping() {
        let result = Topology::new(vec![seg(1, 1, 2, 5), seg(1, 2, 3, 5), seg(1, 3, 2, 5)]);
        assert_eq!(result, Err(DomainError::DisconnectedTopology));
    }

    #[test]
    fn mixed_lines_fail() {
        let result = Topology::new(vec![seg(1, 1, 2, 5), seg(2, 2, 3, 5)]);
        assert_eq!(
            result,
            Err(DomainError::MixedLines {
                expected: LineId(1),
                found: LineId(2)
            })
        );
    }

    #[test]
    fn termini_and_extension() {
        let topology = Topology::new(chain(&[5, 5])).unwrap();
        assert_eq!(topology.upper_terminus(), &station(1));
        assert_eq!(topology.lower_terminus(), &station(3));

        assert!(topology.is_extension_of(&seg(1, 9, 1, 2)));
        assert!(topology.is_extension_of(&seg(1, 3, 9, 2)));
        assert!(!topology.is_extension_of(&seg(1, 2, 9, 2)));
        assert!(!topology.is_extension_of(&seg(1, 1, 9, 2)));
    }

    #[test]
    fn neighbouring_segments() {
        let topology = Topology::new(chain(&[5, 7])).unwrap();

        assert_eq!(topology.upstream_segment_of(&station(1)).unwrap(), None);
        assert_eq!(
            topology.downstream_segment_of(&station(1)).unwrap(),
            Some(&seg(1, 1, 2, 5))
        );
        assert_eq!(
            topology.upstream_segment_of(&station(2)).unwrap(),
            Some(&seg(1, 1, 2, 5))
        );
        assert_eq!(
            topology.downstream_segment_of(&station(2)).unwrap(),
            Some(&seg(1, 2, 3, 7))
        );
        assert_eq!(topology.downstream_segment_of(&station(3)).unwrap(), None);

        assert_eq!(
            topology.upstream_segment_of(&station(99)),
            Err(DomainError::StationNotRegistered(crate::domain::StationId(99)))
        );
    }

    #[test]
    fn registration() {
        let topology = Topology::new(chain(&[5, 5, 5])).unwrap();
        assert!(topology.is_registered(&station(4)));
        assert!(!topology.is_registered(&station(5)));
    }

    #[test]
    fn single_segment() {
        let topology = Topology::new(chain(&[5])).unwrap();
        assert!(topology.is_single_segment());
        assert_eq!(topology.len(), 1);
        assert!(!Topology::new(chain(&[5, 5])).unwrap().is_single_segment());
    }
}
