#![forbid(unsafe_code)]

//! Narrow interfaces to the host environment.
//!
//! The navigator never owns the visual tree. It reads structure and
//! geometry through [`VisualTree`], [`GeometryProvider`], [`HitTester`] and
//! [`OverlayStack`], and pushes outward actions through [`Effects`].
//! [`Host`] is blanket-implemented for anything providing the read side.

use crate::element::{ElementId, Markers, Role, Visibility};
use crate::geometry::{Point, Rect, Size};

/// Read-only structure of the visual tree.
pub trait VisualTree {
    /// The base document root.
    fn document_root(&self) -> ElementId;

    /// Immediate parent, `None` for the document root or unknown ids.
    fn parent(&self, id: ElementId) -> Option<ElementId>;

    /// Strict descendants of `root` in document (pre-)order.
    fn descendants(&self, root: ElementId) -> Vec<ElementId>;

    fn role(&self, id: ElementId) -> Role;

    fn markers(&self, id: ElementId) -> Markers;

    /// The node's own computed visibility state.
    fn visibility(&self, id: ElementId) -> Visibility;

    /// Own corner radius in layout units; `0.0` when square.
    fn corner_radius(&self, id: ElementId) -> f32 {
        let _ = id;
        0.0
    }

    /// Nearest ancestor-or-self satisfying `pred`.
    fn closest(&self, id: ElementId, mut pred: impl FnMut(ElementId) -> bool) -> Option<ElementId>
    where
        Self: Sized,
    {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if pred(node) {
                return Some(node);
            }
            cursor = self.parent(node);
        }
        None
    }

    /// Nearest ancestor-or-self carrying any of `markers`.
    fn closest_marked(&self, id: ElementId, markers: Markers) -> Option<ElementId>
    where
        Self: Sized,
    {
        self.closest(id, |node| self.markers(node).intersects(markers))
    }
}

/// Geometry of laid-out nodes.
pub trait GeometryProvider {
    /// On-screen bounding box, `None` when the node has no box.
    fn bounding_box(&self, id: ElementId) -> Option<Rect>;

    /// Current viewport size.
    fn viewport(&self) -> Size;
}

/// Point hit-testing.
pub trait HitTester {
    /// Every node whose box occupies `point`, topmost first.
    fn elements_at(&self, point: Point) -> Vec<ElementId>;
}

/// One layer of the overlay stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayEntry {
    pub root: ElementId,
    pub shown: bool,
}

/// Overlay (popup) visibility provider.
pub trait OverlayStack {
    /// Overlays ordered bottom layer first.
    fn overlays(&self) -> Vec<OverlayEntry>;

    /// Root of the topmost shown overlay.
    fn topmost_shown(&self) -> Option<ElementId> {
        self.overlays()
            .into_iter()
            .rev()
            .find(|entry| entry.shown)
            .map(|entry| entry.root)
    }

    fn is_shown(&self, root: ElementId) -> bool {
        self.overlays()
            .iter()
            .any(|entry| entry.root == root && entry.shown)
    }
}

/// Everything the navigator reads from its host.
pub trait Host: VisualTree + GeometryProvider + HitTester + OverlayStack {}

impl<T> Host for T where T: VisualTree + GeometryProvider + HitTester + OverlayStack {}

/// Alignment used when scrolling an element into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    Start,
    #[default]
    Center,
    End,
    Nearest,
}

/// Request to bring an element into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    pub target: ElementId,
    pub block: ScrollAlign,
    pub inline: ScrollAlign,
    pub smooth: bool,
}

impl ScrollRequest {
    /// Smooth scroll centering `target` on both axes.
    #[must_use]
    pub const fn centered(target: ElementId) -> Self {
        Self {
            target,
            block: ScrollAlign::Center,
            inline: ScrollAlign::Center,
            smooth: true,
        }
    }
}

/// Outward actions the navigator asks the host to perform.
pub trait Effects {
    /// Toggle a switch-style control (the settings toggle handler).
    fn toggle(&mut self, switch: ElementId);

    /// Generic activation (a click).
    fn activate(&mut self, id: ElementId);

    /// Move input focus to `id`.
    fn focus(&mut self, id: ElementId);

    fn scroll_into_view(&mut self, request: ScrollRequest);
}
