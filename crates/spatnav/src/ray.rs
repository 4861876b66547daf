#![forbid(unsafe_code)]

//! Ray search: walk from the origin center along the requested direction
//! and report the first navigable element hit.
//!
//! # Algorithm
//!
//! The sample point advances by `ray_step` per iteration. At each sample the
//! host hit-tests the point (topmost first); the first registry member that
//! is not the origin element ends the walk.
//!
//! Alongside, an off-registry *run length* is accumulated: it resets to zero
//! while samples still land on the origin element and grows by one step for
//! every sample that lands on neither the origin nor a target. The value
//! recorded for a hit is the run length before the hit sample is counted.
//! It approximates the empty gap between origin and target and is used as a
//! directional-alignment proxy by the arbiter.
//!
//! # Termination
//!
//! The walk stops when a target is found, when a sample outside the
//! viewport hit-tests to nothing, or when a sample is more than
//! `max_ray_overscan` past the viewport edge. Independently of the host, it
//! also stops once the sample stops moving (the step is lost to `f32`
//! rounding far from the origin) or is no longer finite, and after
//! `(viewport extent + max_ray_overscan + |origin|) / ray_step + 2` samples.
//! A non-finite viewport extent counts as zero in that budget.

use spatnav_core::{Direction, ElementId, Host, NavConfig, Point};

use crate::metrics::{Buckets, CandidateMetrics, Source};
use crate::registry::Snapshot;

/// Result of a successful ray walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub element: ElementId,
    pub center: Point,
    /// Euclidean distance between the origin center and the hit's center.
    pub distance: f32,
    /// Off-registry run length accumulated before the hit.
    pub run_length: f32,
    /// Samples taken, including the hit sample.
    pub samples: usize,
}

impl RayHit {
    #[must_use]
    pub fn metrics(&self, origin: Point) -> CandidateMetrics {
        CandidateMetrics {
            center: self.center,
            distance: self.distance,
            coord_distance: self.run_length,
            buckets: Buckets::classify(origin, self.center),
            source: Source::Ray,
        }
    }
}

/// Why a walk ended without a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayMiss {
    /// Left the viewport into empty space.
    ExitedViewport { samples: usize },
    /// Hit the overscan bound while still over content.
    OverscanLimit { samples: usize },
    /// The sample stopped advancing or left the finite range.
    Stalled { samples: usize },
    /// Used up the sample budget.
    SampleLimit { samples: usize },
}

impl RayMiss {
    #[must_use]
    pub const fn samples(self) -> usize {
        match self {
            Self::ExitedViewport { samples }
            | Self::OverscanLimit { samples }
            | Self::Stalled { samples }
            | Self::SampleLimit { samples } => samples,
        }
    }
}

/// Upper bound on the samples a walk from `origin` may take.
fn sample_budget(extent: f32, max_overscan: f32, origin: Point, step: f32) -> usize {
    let extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
    let overscan = if max_overscan.is_finite() {
        max_overscan.max(0.0)
    } else {
        NavConfig::default().max_ray_overscan
    };
    let offset = origin.x.abs().max(origin.y.abs());
    let offset = if offset.is_finite() { offset } else { 0.0 };
    // Float-to-int casts saturate.
    ((extent + overscan + offset) / step).ceil() as usize + 2
}

/// Walks rays through a host's hit tester.
#[derive(Debug, Clone, Copy)]
pub struct RayCaster<'a, H> {
    host: &'a H,
    step: f32,
    max_overscan: f32,
}

impl<'a, H: Host> RayCaster<'a, H> {
    #[must_use]
    pub fn new(host: &'a H, config: &NavConfig) -> Self {
        Self {
            host,
            step: config.ray_step,
            max_overscan: config.max_ray_overscan,
        }
    }

    /// Find the first registry member in line with `origin`.
    #[must_use]
    pub fn find(
        &self,
        origin_element: ElementId,
        origin: Point,
        direction: Direction,
        registry: &Snapshot,
    ) -> Option<RayHit> {
        self.walk(origin_element, origin, direction, registry).ok()
    }

    /// Like [`find`](Self::find) but reports why nothing was found.
    pub fn walk(
        &self,
        origin_element: ElementId,
        origin: Point,
        direction: Direction,
        registry: &Snapshot,
    ) -> Result<RayHit, RayMiss> {
        let viewport = self.host.viewport();
        // Non-positive steps would never leave the viewport.
        let step = if self.step > 0.0 && self.step.is_finite() {
            self.step
        } else {
            NavConfig::default().ray_step
        };

        let budget = sample_budget(
            viewport.width.max(viewport.height),
            self.max_overscan,
            origin,
            step,
        );

        let mut sample = origin;
        let mut run_length = 0.0_f32;
        let mut samples = 0_usize;

        loop {
            let previous = sample;
            sample = sample.step(direction, step);
            samples += 1;
            if sample == previous || !sample.x.is_finite() || !sample.y.is_finite() {
                return Err(RayMiss::Stalled { samples });
            }

            let hits = self.host.elements_at(sample);
            let target = hits
                .iter()
                .copied()
                .find(|id| *id != origin_element && registry.contains(*id));

            if let Some(element) = target {
                let center = self
                    .host
                    .bounding_box(element)
                    .map(|rect| rect.center())
                    .unwrap_or(sample);
                return Ok(RayHit {
                    element,
                    center,
                    distance: origin.distance_to(center),
                    run_length,
                    samples,
                });
            }

            if hits.contains(&origin_element) {
                run_length = 0.0;
            } else {
                run_length += step;
            }

            if !viewport.contains(sample) {
                if hits.is_empty() {
                    return Err(RayMiss::ExitedViewport { samples });
                }
                if viewport.overshoot(sample) > self.max_overscan {
                    return Err(RayMiss::OverscanLimit { samples });
                }
            }
            if samples >= budget {
                return Err(RayMiss::SampleLimit { samples });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use spatnav_core::{Rect, Role};
    use spatnav_harness::FixtureDocument;

    #[test]
    fn finds_adjacent_grid_cell() {
        let doc = spatnav_harness::grid(3, 3, 100.0);
        let center = doc.cell(1, 1);
        let snapshot = Registry::new(&doc).snapshot(None);
        let caster = RayCaster::new(&doc, &NavConfig::default());

        let hit = caster
            .find(center, Point::new(150.0, 150.0), Direction::Right, &snapshot)
            .expect("cell to the right");
        assert_eq!(hit.element, doc.cell(2, 1));
        assert_eq!(hit.distance, 100.0);
    }

    #[test]
    fn run_length_counts_gap_samples_only() {
        let mut doc = FixtureDocument::new(400.0, 100.0);
        let root = doc.root();
        let a = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 20.0, 20.0));
        let b = doc.add(root, Role::Button, Rect::new(50.0, 0.0, 20.0, 20.0));
        let snapshot = Registry::new(&doc).snapshot(None);
        let caster = RayCaster::new(&doc, &NavConfig::default());

        // Origin center (10,10); samples at x=15 (on a), 20..45 (gap), 50 (hit).
        let hit = caster
            .find(a, Point::new(10.0, 10.0), Direction::Right, &snapshot)
            .expect("b is in line");
        assert_eq!(hit.element, b);
        assert_eq!(hit.run_length, 30.0);
        assert_eq!(hit.samples, 8);
    }

    #[test]
    fn empty_direction_terminates_at_viewport_edge() {
        let doc = spatnav_harness::grid(1, 1, 100.0);
        let only = doc.cell(0, 0);
        let snapshot = Registry::new(&doc).snapshot(None);
        let caster = RayCaster::new(&doc, &NavConfig::default());

        let miss = caster
            .walk(only, Point::new(50.0, 50.0), Direction::Up, &snapshot)
            .unwrap_err();
        assert!(matches!(miss, RayMiss::ExitedViewport { samples } if samples <= 12));
    }

    #[test]
    fn overscan_bounds_walk_over_unclipped_content() {
        let mut doc = FixtureDocument::new(100.0, 100.0);
        doc.set_clip_hits_to_viewport(false);
        let root = doc.root();
        // A huge decorative backdrop covers everything beyond the viewport.
        doc.add(root, Role::Generic, Rect::new(-1.0e6, -1.0e6, 2.0e6, 2.0e6));
        let origin = doc.add(root, Role::Button, Rect::new(40.0, 40.0, 20.0, 20.0));
        let snapshot = Registry::new(&doc).snapshot(None);
        let config = NavConfig {
            max_ray_overscan: 100.0,
            ..NavConfig::default()
        };
        let caster = RayCaster::new(&doc, &config);

        let miss = caster
            .walk(origin, Point::new(50.0, 50.0), Direction::Right, &snapshot)
            .unwrap_err();
        assert_eq!(miss, RayMiss::OverscanLimit { samples: 31 });
    }

    #[test]
    fn walk_far_from_origin_stops_when_step_is_lost() {
        let mut doc = FixtureDocument::new(4.0e8, 4.0e8);
        let root = doc.root();
        let near = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 10.0, 10.0));
        let far = doc.add(root, Role::Button, Rect::new(2.0e8, 2.0e8, 10.0, 10.0));
        let snapshot = Registry::new(&doc).snapshot(None);
        let caster = RayCaster::new(&doc, &NavConfig::default());

        // 2e8 + 5 rounds back to 2e8 in f32.
        let miss = caster
            .walk(far, Point::new(2.0e8, 2.0e8), Direction::Right, &snapshot)
            .unwrap_err();
        assert_eq!(miss, RayMiss::Stalled { samples: 1 });
        assert!(caster
            .find(near, Point::new(5.0, 5.0), Direction::Left, &snapshot)
            .is_none());
    }

    #[test]
    fn infinite_viewport_is_bounded_by_budget() {
        let mut doc = FixtureDocument::new(f32::INFINITY, 100.0);
        doc.set_clip_hits_to_viewport(false);
        let root = doc.root();
        let origin = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 20.0, 20.0));
        let snapshot = Registry::new(&doc).snapshot(None);
        let config = NavConfig {
            max_ray_overscan: 100.0,
            ..NavConfig::default()
        };
        let caster = RayCaster::new(&doc, &config);

        // Budget: ceil((0 + 100 + 10) / 5) + 2.
        let miss = caster
            .walk(origin, Point::new(10.0, 10.0), Direction::Right, &snapshot)
            .unwrap_err();
        assert_eq!(miss, RayMiss::SampleLimit { samples: 24 });
    }

    #[test]
    fn far_origin_falls_back_to_nearest() {
        let mut doc = FixtureDocument::new(4.0e8, 4.0e8);
        let root = doc.root();
        let a = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(root, Role::Button, Rect::new(2.0e8, 2.0e8, 10.0, 10.0));
        let config = NavConfig::default();

        let resolution = crate::resolve::Resolver::new(&doc, &config)
            .explain(b, Direction::Left)
            .expect("b has a box");
        assert!(resolution.direct.is_none());
        assert_eq!(resolution.target(), Some(a));
    }

    #[test]
    fn non_members_are_passed_through() {
        let mut doc = FixtureDocument::new(400.0, 100.0);
        let root = doc.root();
        let a = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 20.0, 20.0));
        let label = doc.add(root, Role::Generic, Rect::new(30.0, 0.0, 20.0, 20.0));
        let b = doc.add(root, Role::Link, Rect::new(60.0, 0.0, 20.0, 20.0));
        let snapshot = Registry::new(&doc).snapshot(None);
        assert!(!snapshot.contains(label));

        let hit = RayCaster::new(&doc, &NavConfig::default())
            .find(a, Point::new(10.0, 10.0), Direction::Right, &snapshot)
            .expect("b behind the label");
        assert_eq!(hit.element, b);
    }
}
