#![forbid(unsafe_code)]

//! Highlight overlay that tracks the active element.
//!
//! [`Highlight`] owns the last computed [`HighlightState`]. Each
//! [`sync`](Highlight::sync) either moves it onto the active element's box
//! (expanded by the configured padding) or hides it. Hiding keeps the last
//! geometry so a host animating opacity does not see the box jump.
//!
//! # Usage
//!
//! ```rust
//! use spatnav::highlight::Highlight;
//!
//! let highlight = Highlight::new(8.0);
//! assert!(!highlight.state().visible);
//! assert_eq!(highlight.state().opacity(), 0.0);
//! ```

use spatnav_core::{ElementId, GeometryProvider, InputSource, Rect, VisualTree};

/// Position, size and shape of the highlight overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HighlightState {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    /// `None` means the overlay's own default radius.
    pub border_radius: Option<f32>,
    pub visible: bool,
    /// Input that last pressed the active element, cleared on move.
    pub pressed: Option<InputSource>,
}

impl HighlightState {
    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        if self.visible { 1.0 } else { 0.0 }
    }

    /// Geometry as a rect.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

/// The highlight overlay.
#[derive(Debug, Clone, Default)]
pub struct Highlight {
    padding: f32,
    state: HighlightState,
}

impl Highlight {
    #[must_use]
    pub fn new(padding: f32) -> Self {
        Self {
            padding,
            state: HighlightState::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    #[must_use]
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Recompute from `active`. An element without a box hides the overlay
    /// like no selection does.
    pub fn sync<H>(&mut self, host: &H, active: Option<ElementId>) -> &HighlightState
    where
        H: VisualTree + GeometryProvider,
    {
        let placed = active.and_then(|id| host.bounding_box(id).map(|rect| (id, rect)));
        let Some((id, rect)) = placed else {
            self.hide();
            return &self.state;
        };

        let p = self.padding;
        let radius = host.corner_radius(id);
        self.state = HighlightState {
            top: rect.y - p,
            left: rect.x - p,
            width: rect.width + 2.0 * p,
            height: rect.height + 2.0 * p,
            border_radius: (radius != 0.0).then_some(radius),
            visible: true,
            pressed: self.state.pressed,
        };
        &self.state
    }

    pub fn set_pressed(&mut self, source: Option<InputSource>) {
        self.state.pressed = source;
    }

    /// Hide the overlay in place; the last geometry is kept.
    pub fn hide(&mut self) {
        self.state.visible = false;
    }
}
