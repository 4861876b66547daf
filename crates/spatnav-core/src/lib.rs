#![forbid(unsafe_code)]

//! Core: geometry, element model, host interfaces, events, clock and
//! configuration for directional focus navigation.

pub mod clock;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod host;

pub use clock::{Clock, LabClock};
pub use config::{NavConfig, Reentrancy};
pub use element::{Capability, ElementId, Markers, NavigableElement, Role, Visibility};
pub use event::{InputSource, NavCommand, NavEvent};
pub use geometry::{Axis, Direction, Point, Rect, Size};
pub use host::{
    Effects, GeometryProvider, HitTester, Host, OverlayEntry, OverlayStack, ScrollAlign,
    ScrollRequest, VisualTree,
};
