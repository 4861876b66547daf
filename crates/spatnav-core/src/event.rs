#![forbid(unsafe_code)]

//! Notifications the host forwards to the navigator.

use crate::geometry::{Direction, Size};

/// Host-side events relevant to navigation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavEvent {
    /// An overlay opened or closed.
    ScopeChanged,
    /// The viewport was resized.
    ViewportResized(Size),
    /// Some scroll container (or the page) scrolled.
    ViewportScrolled,
    /// A pointer click. Only trusted (user-originated) clicks deselect.
    PointerClick { trusted: bool },
}

/// Input source that produced a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard,
    Controller,
}

/// A decoded navigation command from a keyboard or controller mapping layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavCommand {
    Move(Direction),
    Select,
}
