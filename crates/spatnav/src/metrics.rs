#![forbid(unsafe_code)]

//! Per-query candidate metrics.
//!
//! Every `resolve` call builds one [`QueryMetrics`] table keyed by element
//! identity and drops it on return. Nothing is written back onto the
//! elements, so concurrent or repeated queries cannot observe each other's
//! distances or bucket flags.

use ahash::AHashMap;
use bitflags::bitflags;
use spatnav_core::{Direction, ElementId, Point};

bitflags! {
    /// Half-planes (relative to the origin center) an element falls in.
    ///
    /// Membership is per axis and non-exclusive: an element up-and-left of
    /// the origin is in both `UP` and `LEFT`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buckets: u8 {
        const UP    = 1 << 0;
        const DOWN  = 1 << 1;
        const LEFT  = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl Buckets {
    /// Classify `center` against `origin`. Strict comparisons: an element
    /// exactly level with the origin on an axis is in neither bucket of
    /// that axis.
    #[must_use]
    pub fn classify(origin: Point, center: Point) -> Self {
        let mut buckets = Self::empty();
        if center.x < origin.x {
            buckets |= Self::LEFT;
        }
        if center.x > origin.x {
            buckets |= Self::RIGHT;
        }
        if center.y < origin.y {
            buckets |= Self::UP;
        }
        if center.y > origin.y {
            buckets |= Self::DOWN;
        }
        buckets
    }

    #[must_use]
    pub const fn for_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::UP,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
            Direction::Right => Self::RIGHT,
        }
    }
}

/// How a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Ray,
    Bucket,
}

/// Metrics computed for one element during one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateMetrics {
    pub center: Point,
    /// Euclidean distance between centers.
    pub distance: f32,
    /// Ray hits: off-registry run length before the hit. Bucket members:
    /// offset from the origin along the travel axis.
    pub coord_distance: f32,
    pub buckets: Buckets,
    pub source: Source,
}

/// A scored candidate handed to the arbiter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub id: ElementId,
    pub metrics: CandidateMetrics,
}

/// Metrics table for a single query.
#[derive(Debug, Default)]
pub struct QueryMetrics {
    entries: AHashMap<ElementId, CandidateMetrics>,
}

impl QueryMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record metrics for `id`. The first record wins so a ray hit is never
    /// overwritten by the bucket pass.
    pub fn record(&mut self, id: ElementId, metrics: CandidateMetrics) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, metrics);
        true
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&CandidateMetrics> {
        self.entries.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
