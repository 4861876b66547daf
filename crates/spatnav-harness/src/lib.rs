#![forbid(unsafe_code)]

//! Test harness and reference fixtures for spatnav.
//!
//! - [`FixtureDocument`]: an in-memory host implementing every read trait
//!   of `spatnav-core`.
//! - [`RecordingEffects`]: an effects sink that logs requests.
//! - [`grid`], [`column`], [`scatter`]: layout builders.

pub mod document;
pub mod effects;
pub mod layout;

pub use document::FixtureDocument;
pub use effects::{Effect, RecordingEffects};
pub use layout::{column, grid, scatter};
