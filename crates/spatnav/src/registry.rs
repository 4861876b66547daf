#![forbid(unsafe_code)]

//! Element registry: enumerate the navigable elements of a scope.
//!
//! # Scope resolution
//!
//! - An explicit scope enumerates that subtree only.
//! - Without one, the topmost shown overlay is the scope and the control
//!   bar's clickable elements are prepended.
//! - With no overlay shown the document root is the scope.
//!
//! # Filtering
//!
//! A node is a candidate when its [`Role`] is interactive or it carries
//! [`Markers::ACTIVATION_HANDLER`]. It is then dropped when its nearest
//! matching ancestor-or-self is a scrim, non-navigable, a visual-only
//! button or a hidden overlay, or when it is not actually rendered.
//!
//! Output order is the control bar followed by document order inside the
//! scope, and is stable for an unchanged tree.

use ahash::AHashSet;
use spatnav_core::{ElementId, Host, Markers, NavigableElement, Role};

/// A resolved scope root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub root: ElementId,
    /// The control bar set is part of this scope.
    pub with_control_bar: bool,
}

/// The navigable set of one scope, with O(1) membership.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub scope: Scope,
    elements: Vec<NavigableElement>,
    members: AHashSet<ElementId>,
}

impl Snapshot {
    #[must_use]
    pub fn elements(&self) -> &[NavigableElement] {
        &self.elements
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.members.contains(&id)
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&NavigableElement> {
        if !self.contains(id) {
            return None;
        }
        self.elements.iter().find(|el| el.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn into_elements(self) -> Vec<NavigableElement> {
        self.elements
    }
}

/// Enumerates and classifies navigable elements of a host tree.
#[derive(Debug, Clone, Copy)]
pub struct Registry<'a, H> {
    host: &'a H,
}

impl<'a, H: Host> Registry<'a, H> {
    #[must_use]
    pub fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Resolve the scope used when `scope` is omitted or given explicitly.
    #[must_use]
    pub fn resolve_scope(&self, scope: Option<ElementId>) -> Scope {
        if let Some(root) = scope {
            return Scope {
                root,
                with_control_bar: false,
            };
        }
        match self.host.topmost_shown() {
            Some(root) => Scope {
                root,
                with_control_bar: true,
            },
            None => Scope {
                root: self.host.document_root(),
                with_control_bar: false,
            },
        }
    }

    /// Navigable elements of `scope` (see module docs).
    #[must_use]
    pub fn enumerate(&self, scope: Option<ElementId>) -> Vec<NavigableElement> {
        self.snapshot(scope).into_elements()
    }

    /// Like [`enumerate`](Self::enumerate), keeping the resolved scope and a
    /// membership set.
    #[must_use]
    pub fn snapshot(&self, scope: Option<ElementId>) -> Snapshot {
        let scope = self.resolve_scope(scope);
        let mut raw = Vec::new();
        if scope.with_control_bar {
            raw.extend(self.control_bar());
        }
        raw.extend(
            self.host
                .descendants(scope.root)
                .into_iter()
                .filter(|id| self.is_candidate(*id)),
        );

        let mut members = AHashSet::with_capacity(raw.len());
        let mut elements = Vec::with_capacity(raw.len());
        for id in raw {
            if !members.contains(&id) && !self.is_excluded(id) && self.is_rendered(id) {
                members.insert(id);
                elements.push(self.classify(id));
            }
        }

        tracing::trace!(
            message = "registry.enumerate",
            scope = scope.root.get(),
            control_bar = scope.with_control_bar,
            count = elements.len()
        );

        Snapshot {
            scope,
            elements,
            members,
        }
    }

    /// Clickable elements inside every control bar container.
    fn control_bar(&self) -> Vec<ElementId> {
        let root = self.host.document_root();
        self.host
            .descendants(root)
            .into_iter()
            .filter(|id| self.host.markers(*id).contains(Markers::CONTROL_BAR))
            .flat_map(|bar| self.host.descendants(bar))
            .filter(|id| {
                self.host
                    .markers(*id)
                    .contains(Markers::ACTIVATION_HANDLER)
            })
            .collect()
    }

    /// Structural match: interactive role or explicit activation handler.
    #[must_use]
    pub fn is_candidate(&self, id: ElementId) -> bool {
        self.host.role(id).is_interactive()
            || self
                .host
                .markers(id)
                .contains(Markers::ACTIVATION_HANDLER)
    }

    /// Nearest-ancestor exclusion test.
    #[must_use]
    pub fn is_excluded(&self, id: ElementId) -> bool {
        let host = self.host;
        host.closest(id, |node| {
            let markers = host.markers(node);
            markers.intersects(Markers::SCRIM | Markers::NON_NAVIGABLE)
                || (host.role(node) == Role::Button && markers.contains(Markers::VISUAL_ONLY))
                || (markers.contains(Markers::OVERLAY) && !host.is_shown(node))
        })
        .is_some()
    }

    /// Whether the element is actually rendered: not hidden itself, and no
    /// ancestor-or-self collapsed, fully transparent or content-hidden.
    #[must_use]
    pub fn is_rendered(&self, id: ElementId) -> bool {
        if self.host.visibility(id).hidden {
            return false;
        }
        self.host
            .closest(id, |node| self.host.visibility(node).hides_subtree())
            .is_none()
    }

    /// Resolve the activation capability of `id`.
    #[must_use]
    pub fn classify(&self, id: ElementId) -> NavigableElement {
        match self.host.closest_marked(id, Markers::SWITCH) {
            Some(switch) => NavigableElement::toggle(id, switch),
            None => NavigableElement::generic(id),
        }
    }
}
