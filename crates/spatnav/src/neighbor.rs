#![forbid(unsafe_code)]

//! Nearest-neighbor search restricted to the half-plane in the requested
//! direction.

use spatnav_core::{Direction, ElementId, Host, Point};

use crate::metrics::{Buckets, Candidate, CandidateMetrics, QueryMetrics, Source};
use crate::registry::Snapshot;

/// Scores every registry element against the origin and picks the closest
/// one in the requested bucket.
#[derive(Debug, Clone, Copy)]
pub struct NeighborSearch<'a, H> {
    host: &'a H,
}

impl<'a, H: Host> NeighborSearch<'a, H> {
    #[must_use]
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Closest element in `direction`'s bucket.
    ///
    /// The origin element and `exclude` (the ray hit, already scored) are
    /// skipped. Every other element with a box gets a metrics entry in
    /// `metrics`. Ties keep the element seen first in registry order.
    pub fn nearest(
        &self,
        origin_element: ElementId,
        origin: Point,
        direction: Direction,
        registry: &Snapshot,
        exclude: Option<ElementId>,
        metrics: &mut QueryMetrics,
    ) -> Option<Candidate> {
        let wanted = Buckets::for_direction(direction);
        let axis = direction.axis();
        let mut best: Option<Candidate> = None;

        for element in registry.elements() {
            let id = element.id;
            if id == origin_element || Some(id) == exclude {
                continue;
            }
            let Some(rect) = self.host.bounding_box(id) else {
                continue;
            };
            let center = rect.center();
            let scored = CandidateMetrics {
                center,
                distance: origin.distance_to(center),
                coord_distance: (origin.on(axis) - center.on(axis)).abs(),
                buckets: Buckets::classify(origin, center),
                source: Source::Bucket,
            };
            metrics.record(id, scored);

            if !scored.buckets.contains(wanted) {
                continue;
            }
            let closer = best.is_none_or(|current| current.metrics.distance > scored.distance);
            if closer {
                best = Some(Candidate {
                    id,
                    metrics: scored,
                });
            }
        }
        best
    }
}
