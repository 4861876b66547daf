#![forbid(unsafe_code)]

//! Element model shared between the navigator and its host.
//!
//! The host owns the visual tree; everything here is a transient, `Copy`
//! view of one node: its identity, structural [`Role`], semantic
//! [`Markers`], and computed [`Visibility`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Opaque identity of a node in the host's visual tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl ElementId {
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural role of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Link,
    Input,
    Button,
    Select,
    TextArea,
    /// Containers, text, images and anything else without built-in interaction.
    #[default]
    Generic,
}

impl Role {
    /// Whether the role is interactive on its own, without an activation
    /// handler marker.
    #[inline]
    #[must_use]
    pub const fn is_interactive(self) -> bool {
        !matches!(self, Self::Generic)
    }
}

bitflags! {
    /// Semantic markers the host attaches to nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Markers: u32 {
        /// Carries an explicit activation handler (clickable).
        const ACTIVATION_HANDLER = 1 << 0;
        /// Subtree is excluded from navigation.
        const NON_NAVIGABLE      = 1 << 1;
        /// Purely decorative button.
        const VISUAL_ONLY        = 1 << 2;
        /// Scrim/backdrop behind overlays.
        const SCRIM              = 1 << 3;
        /// Root of an overlay (popup) panel.
        const OVERLAY            = 1 << 4;
        /// Preferred initial selection inside an overlay.
        const DEFAULT_SELECTION  = 1 << 5;
        /// Always-on-top control bar container.
        const CONTROL_BAR        = 1 << 6;
        /// Base navigation sidebar container.
        const NAV_SIDEBAR        = 1 << 7;
        /// Sidebar item that is not the current page.
        const INACTIVE           = 1 << 8;
        /// Switch-style toggle control container.
        const SWITCH             = 1 << 9;
        /// Region that must never be scrolled by navigation (menus, sidebars).
        const NO_SCROLL          = 1 << 10;
        /// Region that is scrolled into view in place of its descendants.
        const SCROLL_PROXY       = 1 << 11;
    }
}

impl Markers {
    /// Parse a kebab- or snake-case marker name (`"no-scroll"`, `"NO_SCROLL"`).
    #[must_use]
    pub fn parse_name(name: &str) -> Option<Self> {
        let normalized = name.trim().replace('-', "_").to_ascii_uppercase();
        Self::from_name(&normalized)
    }
}

/// Computed rendering state of a single node (not including ancestors).
///
/// `hidden` is the computed `visibility` property and is already inherited
/// by the host; the other fields apply to the node's whole subtree and are
/// combined along the ancestor chain by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    /// Not laid out at all (`display: none`).
    pub collapsed: bool,
    /// Computed `visibility: hidden`.
    pub hidden: bool,
    /// Own opacity in `[0, 1]`.
    pub opacity: f32,
    /// Rendering of the subtree contents is skipped (`content-visibility: hidden`).
    pub content_hidden: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            collapsed: false,
            hidden: false,
            opacity: 1.0,
            content_hidden: false,
        }
    }
}

impl Visibility {
    /// Fully visible node.
    #[must_use]
    pub fn visible() -> Self {
        Self::default()
    }

    /// Whether this node's own state hides its subtree.
    #[inline]
    #[must_use]
    pub fn hides_subtree(&self) -> bool {
        self.collapsed || self.opacity <= 0.0 || self.content_hidden
    }
}

/// How an element reacts to activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Click then focus.
    Generic,
    /// Part of a switch control; activation toggles `switch`.
    Toggle { switch: ElementId },
}

/// A navigable element resolved during enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigableElement {
    pub id: ElementId,
    pub capability: Capability,
}

impl NavigableElement {
    #[must_use]
    pub const fn generic(id: ElementId) -> Self {
        Self {
            id,
            capability: Capability::Generic,
        }
    }

    #[must_use]
    pub const fn toggle(id: ElementId, switch: ElementId) -> Self {
        Self {
            id,
            capability: Capability::Toggle { switch },
        }
    }
}
