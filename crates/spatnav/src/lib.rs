#![forbid(unsafe_code)]

//! Directional focus navigation.
//!
//! Given an active element and a direction, [`Resolver`] picks the element a
//! user would expect to reach next. Two searches run per query:
//!
//! - [`ray`]: walk a sample point from the active element's center and take
//!   the first navigable element it lands on.
//! - [`neighbor`]: the closest navigable element whose center lies in the
//!   requested half-plane.
//!
//! The [`arbiter`] reconciles the two. [`Navigator`] owns the selection,
//! keeps the [`highlight`] in sync, scrolls, and runs delayed activation.
//!
//! # Example
//!
//! ```rust
//! use spatnav::Navigator;
//! use spatnav_core::Direction;
//! use spatnav_harness::{RecordingEffects, grid};
//!
//! let doc = grid(3, 3, 100.0);
//! let mut nav = Navigator::default();
//! let mut effects = RecordingEffects::default();
//!
//! nav.set_active(&doc, doc.cell(1, 1));
//! assert_eq!(
//!     nav.move_focus(&doc, &mut effects, Direction::Right),
//!     Some(doc.cell(2, 1))
//! );
//! assert!(nav.highlight().visible);
//! ```

pub mod arbiter;
pub mod highlight;
pub mod metrics;
pub mod navigator;
pub mod neighbor;
pub mod ray;
pub mod registry;
pub mod resolve;
pub mod schedule;

pub use arbiter::{Arbiter, Rule, Verdict};
pub use highlight::{Highlight, HighlightState};
pub use metrics::{Buckets, Candidate, CandidateMetrics, QueryMetrics, Source};
pub use navigator::{Navigator, SelectionState};
pub use neighbor::NeighborSearch;
pub use ray::{RayCaster, RayHit, RayMiss};
pub use registry::{Registry, Scope, Snapshot};
pub use resolve::{Resolution, Resolver};
pub use schedule::{DeferredQueue, Task, TaskId, TaskKind};
