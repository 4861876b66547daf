#![forbid(unsafe_code)]

//! Arbiter: reconcile the ray hit and the nearest bucket member into one
//! target.
//!
//! Rules are tried in order and the first that decides wins:
//!
//! 1. [`Rule::NoCandidates`]: neither search found anything; stay put.
//! 2. [`Rule::SingleCandidate`]: only one search found something.
//! 3. [`Rule::Agreement`]: both found the same element.
//! 4. [`Rule::SharedContainer`]: both share an immediate parent that is
//!    neither the scope root nor the document root; take the ray hit.
//! 5. [`Rule::Aligned`]: the ray hit is within `alignment_tolerance` of the
//!    origin on the cross axis; take it.
//! 6. [`Rule::CrossAxis`]: distances differ by less than `distance_band`;
//!    the smaller cross-axis offset wins. Equal offsets do not decide.
//! 7. [`Rule::DirectReach`] / [`Rule::NearestFallback`]: take the ray hit
//!    when its run length does not exceed the nearest element's travel-axis
//!    offset, when the distance gap is inside the band, or when it is
//!    strictly closer; otherwise take the nearest element.

use spatnav_core::{Direction, ElementId, Host, NavConfig, Point};

use crate::metrics::Candidate;

/// The rule that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    NoCandidates,
    SingleCandidate,
    Agreement,
    SharedContainer,
    Aligned,
    CrossAxis,
    DirectReach,
    NearestFallback,
}

impl Rule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoCandidates => "no-candidates",
            Self::SingleCandidate => "single-candidate",
            Self::Agreement => "agreement",
            Self::SharedContainer => "shared-container",
            Self::Aligned => "aligned",
            Self::CrossAxis => "cross-axis",
            Self::DirectReach => "direct-reach",
            Self::NearestFallback => "nearest-fallback",
        }
    }
}

/// Outcome of arbitration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub chosen: Option<Candidate>,
    pub rule: Rule,
}

impl Verdict {
    #[inline]
    #[must_use]
    pub fn element(&self) -> Option<ElementId> {
        self.chosen.map(|c| c.id)
    }

    fn pick(chosen: Candidate, rule: Rule) -> Self {
        Self {
            chosen: Some(chosen),
            rule,
        }
    }
}

/// Tie-break rule set.
#[derive(Debug, Clone, Copy)]
pub struct Arbiter<'a, H> {
    host: &'a H,
    alignment_tolerance: f32,
    distance_band: f32,
}

impl<'a, H: Host> Arbiter<'a, H> {
    #[must_use]
    pub fn new(host: &'a H, config: &NavConfig) -> Self {
        Self {
            host,
            alignment_tolerance: config.alignment_tolerance,
            distance_band: config.distance_band,
        }
    }

    /// Apply the rules to the two search results. Pure: no state changes.
    #[must_use]
    pub fn arbitrate(
        &self,
        direct: Option<Candidate>,
        nearest: Option<Candidate>,
        origin: Point,
        direction: Direction,
        scope_root: ElementId,
    ) -> Verdict {
        let (direct, nearest) = match (direct, nearest) {
            (None, None) => {
                return Verdict {
                    chosen: None,
                    rule: Rule::NoCandidates,
                };
            }
            (Some(only), None) | (None, Some(only)) => {
                return Verdict::pick(only, Rule::SingleCandidate);
            }
            (Some(direct), Some(nearest)) => (direct, nearest),
        };

        if direct.id == nearest.id {
            return Verdict::pick(direct, Rule::Agreement);
        }

        if self.share_local_container(direct.id, nearest.id, scope_root) {
            return Verdict::pick(direct, Rule::SharedContainer);
        }

        let cross = direction.axis().cross();
        let direct_offset = (direct.metrics.center.on(cross) - origin.on(cross)).abs();
        if direct_offset < self.alignment_tolerance {
            return Verdict::pick(direct, Rule::Aligned);
        }

        let gap = (direct.metrics.distance - nearest.metrics.distance).abs();
        if gap < self.distance_band {
            let nearest_offset = (nearest.metrics.center.on(cross) - origin.on(cross)).abs();
            if direct_offset < nearest_offset {
                return Verdict::pick(direct, Rule::CrossAxis);
            }
            if nearest_offset < direct_offset {
                return Verdict::pick(nearest, Rule::CrossAxis);
            }
            // Equal offsets: no decision here.
        }

        if direct.metrics.coord_distance <= nearest.metrics.coord_distance
            || gap < self.distance_band
            || direct.metrics.distance < nearest.metrics.distance
        {
            Verdict::pick(direct, Rule::DirectReach)
        } else {
            Verdict::pick(nearest, Rule::NearestFallback)
        }
    }

    fn share_local_container(&self, a: ElementId, b: ElementId, scope_root: ElementId) -> bool {
        let (Some(pa), Some(pb)) = (self.host.parent(a), self.host.parent(b)) else {
            return false;
        };
        pa == pb && pa != scope_root && pa != self.host.document_root()
    }
}
