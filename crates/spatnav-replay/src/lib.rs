#![forbid(unsafe_code)]

//! Scenario replay for spatnav.
//!
//! A scenario describes a laid-out page and a script of navigation inputs.
//! [`report::replay`] runs the script against a fixture document on a lab
//! clock and records the selection after every step.

pub mod cli;
pub mod error;
pub mod report;
pub mod scenario;

pub use cli::{run, run_from_env};
pub use error::{ReplayError, Result};
