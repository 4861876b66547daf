#![forbid(unsafe_code)]

//! In-memory visual tree implementing every host trait.
//!
//! [`FixtureDocument`] stands in for a laid-out page: nodes carry a role,
//! markers, computed visibility, an optional box and a corner radius. Hit
//! testing returns every rendered node under a point, topmost first, where
//! "topmost" means higher z, then later in document order.
//!
//! # Example
//!
//! ```rust
//! use spatnav_core::{GeometryProvider, HitTester, Point, Rect, Role};
//! use spatnav_harness::FixtureDocument;
//!
//! let mut doc = FixtureDocument::new(200.0, 100.0);
//! let root = doc.root();
//! let button = doc.add(root, Role::Button, Rect::new(10.0, 10.0, 50.0, 20.0));
//!
//! assert_eq!(doc.elements_at(Point::new(20.0, 20.0)), vec![button, root]);
//! assert_eq!(doc.bounding_box(button).map(|r| r.width), Some(50.0));
//! ```

use std::collections::HashMap;

use spatnav_core::{
    ElementId, GeometryProvider, HitTester, Markers, OverlayEntry, OverlayStack, Point, Rect,
    Role, Size, Visibility, VisualTree,
};

#[derive(Debug, Clone)]
struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    role: Role,
    markers: Markers,
    visibility: Visibility,
    rect: Option<Rect>,
    radius: f32,
    z: i32,
}

/// A mutable fixture document.
#[derive(Debug, Clone)]
pub struct FixtureDocument {
    nodes: Vec<Node>,
    overlays: Vec<OverlayEntry>,
    viewport: Size,
    clip_hits: bool,
    labels: HashMap<String, ElementId>,
}

impl FixtureDocument {
    /// Empty document whose root box covers a `width` x `height` viewport.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            role: Role::Generic,
            markers: Markers::empty(),
            visibility: Visibility::visible(),
            rect: Some(Rect::new(0.0, 0.0, width, height)),
            radius: 0.0,
            z: 0,
        };
        Self {
            nodes: vec![root],
            overlays: Vec::new(),
            viewport: Size::new(width, height),
            clip_hits: true,
            labels: HashMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> ElementId {
        ElementId::new(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Append a child of `parent` with a box.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this document.
    pub fn add(&mut self, parent: ElementId, role: Role, rect: Rect) -> ElementId {
        let id = self.add_unboxed(parent, role);
        self.node_mut(id).rect = Some(rect);
        id
    }

    /// Append a child of `parent` without a layout box.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this document.
    pub fn add_unboxed(&mut self, parent: ElementId, role: Role) -> ElementId {
        assert!(self.contains(parent), "unknown parent {parent}");
        let id = ElementId::new(self.nodes.len() as u64);
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            role,
            markers: Markers::empty(),
            visibility: Visibility::visible(),
            rect: None,
            radius: 0.0,
            z: 0,
        });
        self.node_mut(parent).children.push(id);
        id
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        (id.get() as usize) < self.nodes.len()
    }

    /// Add `markers` to a node.
    pub fn mark(&mut self, id: ElementId, markers: Markers) {
        self.node_mut(id).markers |= markers;
    }

    pub fn unmark(&mut self, id: ElementId, markers: Markers) {
        self.node_mut(id).markers -= markers;
    }

    pub fn set_visibility(&mut self, id: ElementId, visibility: Visibility) {
        self.node_mut(id).visibility = visibility;
    }

    pub fn set_radius(&mut self, id: ElementId, radius: f32) {
        self.node_mut(id).radius = radius;
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        self.node_mut(id).rect = Some(rect);
    }

    pub fn clear_rect(&mut self, id: ElementId) {
        self.node_mut(id).rect = None;
    }

    /// Stacking order; higher is hit first. Defaults to 0.
    pub fn set_z(&mut self, id: ElementId, z: i32) {
        self.node_mut(id).z = z;
    }

    /// Push an overlay layer on top of the stack.
    pub fn add_overlay(&mut self, root: ElementId, shown: bool) {
        self.overlays.push(OverlayEntry { root, shown });
    }

    /// Show or hide an existing overlay layer. Returns `false` for unknown
    /// roots.
    pub fn set_shown(&mut self, root: ElementId, shown: bool) -> bool {
        match self.overlays.iter_mut().find(|entry| entry.root == root) {
            Some(entry) => {
                entry.shown = shown;
                true
            }
            None => false,
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// When enabled (the default) points outside the viewport hit nothing,
    /// like a browser's `elementsFromPoint`.
    pub fn set_clip_hits_to_viewport(&mut self, clip: bool) {
        self.clip_hits = clip;
    }

    /// Attach a name to a node for later lookup. Re-labelling moves the name.
    pub fn label(&mut self, id: ElementId, name: impl Into<String>) {
        self.labels.insert(name.into(), id);
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.labels.get(name).copied()
    }

    /// Name given to `id`, if any.
    #[must_use]
    pub fn name_of(&self, id: ElementId) -> Option<&str> {
        self.labels
            .iter()
            .find(|(_, labelled)| **labelled == id)
            .map(|(name, _)| name.as_str())
    }

    /// Cell of a document built by [`grid`](crate::grid).
    ///
    /// # Panics
    ///
    /// Panics if the cell does not exist.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> ElementId {
        self.find(&cell_label(col, row))
            .unwrap_or_else(|| panic!("no grid cell at ({col}, {row})"))
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.get() as usize)
    }

    fn node_mut(&mut self, id: ElementId) -> &mut Node {
        let index = id.get() as usize;
        assert!(index < self.nodes.len(), "unknown node {id}");
        &mut self.nodes[index]
    }

    fn preorder(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Painted: nothing on the ancestor chain hides it and it is not inside
    /// a hidden overlay layer.
    fn is_painted(&self, id: ElementId) -> bool {
        if self.visibility(id).hidden {
            return false;
        }
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if self.visibility(node).hides_subtree() {
                return false;
            }
            if self.markers(node).contains(Markers::OVERLAY) && !self.is_shown(node) {
                return false;
            }
            cursor = self.parent(node);
        }
        true
    }
}

pub(crate) fn cell_label(col: usize, row: usize) -> String {
    format!("cell-{col}-{row}")
}

impl VisualTree for FixtureDocument {
    fn document_root(&self) -> ElementId {
        self.root()
    }

    fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|node| node.parent)
    }

    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let Some(node) = self.node(root) else {
            return out;
        };
        let mut stack: Vec<ElementId> = node.children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(child) = self.node(id) {
                stack.extend(child.children.iter().rev().copied());
            }
        }
        out
    }

    fn role(&self, id: ElementId) -> Role {
        self.node(id).map(|node| node.role).unwrap_or_default()
    }

    fn markers(&self, id: ElementId) -> Markers {
        self.node(id).map(|node| node.markers).unwrap_or_default()
    }

    fn visibility(&self, id: ElementId) -> Visibility {
        self.node(id).map(|node| node.visibility).unwrap_or_default()
    }

    fn corner_radius(&self, id: ElementId) -> f32 {
        self.node(id).map(|node| node.radius).unwrap_or(0.0)
    }
}

impl GeometryProvider for FixtureDocument {
    fn bounding_box(&self, id: ElementId) -> Option<Rect> {
        self.node(id).and_then(|node| node.rect)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}

impl HitTester for FixtureDocument {
    fn elements_at(&self, point: Point) -> Vec<ElementId> {
        if self.clip_hits && !self.viewport.contains(point) {
            return Vec::new();
        }
        let mut hits: Vec<(i32, usize, ElementId)> = self
            .preorder()
            .into_iter()
            .enumerate()
            .filter_map(|(order, id)| {
                let node = self.node(id)?;
                let rect = node.rect?;
                (rect.contains(point) && self.is_painted(id)).then_some((node.z, order, id))
            })
            .collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        hits.into_iter().map(|(_, _, id)| id).collect()
    }
}

impl OverlayStack for FixtureDocument {
    fn overlays(&self) -> Vec<OverlayEntry> {
        self.overlays.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descendants_are_preorder() {
        let mut doc = FixtureDocument::new(100.0, 100.0);
        let root = doc.root();
        let a = doc.add(root, Role::Generic, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(root, Role::Generic, Rect::new(0.0, 0.0, 10.0, 10.0));
        let a1 = doc.add(a, Role::Button, Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(doc.descendants(root), vec![a, a1, b]);
        assert_eq!(doc.descendants(a), vec![a1]);
    }

    #[test]
    fn hit_order_is_topmost_first() {
        let mut doc = FixtureDocument::new(100.0, 100.0);
        let root = doc.root();
        let low = doc.add(root, Role::Generic, Rect::new(0.0, 0.0, 50.0, 50.0));
        let high = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 20.0, 20.0));
        let p = Point::new(5.0, 5.0);
        assert_eq!(doc.elements_at(p), vec![high, low, root]);

        doc.set_z(low, 1);
        assert_eq!(doc.elements_at(p), vec![low, high, root]);
    }

    #[test]
    fn hidden_overlays_are_not_hit() {
        let mut doc = FixtureDocument::new(100.0, 100.0);
        let root = doc.root();
        let popup = doc.add(root, Role::Generic, Rect::new(0.0, 0.0, 50.0, 50.0));
        doc.mark(popup, Markers::OVERLAY);
        doc.add_overlay(popup, false);
        let p = Point::new(5.0, 5.0);
        assert_eq!(doc.elements_at(p), vec![root]);

        assert!(doc.set_shown(popup, true));
        assert_eq!(doc.elements_at(p), vec![popup, root]);
    }

    #[test]
    fn outside_viewport_hits_nothing_when_clipped() {
        let mut doc = FixtureDocument::new(100.0, 100.0);
        let root = doc.root();
        let wide = doc.add(root, Role::Generic, Rect::new(-50.0, 0.0, 300.0, 10.0));
        assert!(doc.elements_at(Point::new(150.0, 5.0)).is_empty());
        doc.set_clip_hits_to_viewport(false);
        assert_eq!(doc.elements_at(Point::new(150.0, 5.0)), vec![wide]);
    }

    #[test]
    fn labels_resolve_both_ways() {
        let mut doc = FixtureDocument::new(100.0, 100.0);
        let root = doc.root();
        let ok = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.label(ok, "ok");
        assert_eq!(doc.find("ok"), Some(ok));
        assert_eq!(doc.name_of(ok), Some("ok"));
        assert_eq!(doc.find("cancel"), None);
    }
}
