//! Scenario files: a layout, an optional configuration and a script.
//!
//! ```json
//! {
//!   "viewport": { "width": 800, "height": 600 },
//!   "config": { "reentrancy": "first-wins" },
//!   "elements": [
//!     { "name": "dialog", "rect": { "x": 100, "y": 100, "width": 400, "height": 300 },
//!       "markers": ["overlay"] },
//!     { "name": "ok", "parent": "dialog", "role": "button",
//!       "rect": { "x": 300, "y": 300, "width": 80, "height": 30 } }
//!   ],
//!   "overlays": [{ "root": "dialog", "shown": true }],
//!   "steps": [{ "move": "right" }, "select", { "advance": 150 }]
//! }
//! ```
//!
//! Elements are created in file order, so a parent must be listed before
//! its children. Elements without a parent hang off the document root.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spatnav_core::{Direction, ElementId, Markers, NavConfig, Rect, Role, Size, Visibility};
use spatnav_harness::FixtureDocument;

use crate::error::{ReplayError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub viewport: Size,
    #[serde(default)]
    pub config: NavConfig,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
    #[serde(default)]
    pub overlays: Vec<OverlaySpec>,
    /// Element to select before the first step.
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementSpec {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Omitted for nodes without a layout box.
    #[serde(default)]
    pub rect: Option<Rect>,
    #[serde(default)]
    pub markers: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub radius: f32,
    #[serde(default)]
    pub z: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlaySpec {
    pub root: String,
    #[serde(default)]
    pub shown: bool,
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Move(Direction),
    Select,
    ScopeChanged,
    /// Advance the lab clock by this many milliseconds, then poll.
    Advance(u64),
    Show(String),
    Hide(String),
    Click { trusted: bool },
    Scroll,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(direction) => write!(f, "move {direction}"),
            Self::Select => f.write_str("select"),
            Self::ScopeChanged => f.write_str("scope-changed"),
            Self::Advance(ms) => write!(f, "advance {ms}ms"),
            Self::Show(name) => write!(f, "show {name}"),
            Self::Hide(name) => write!(f, "hide {name}"),
            Self::Click { trusted: true } => f.write_str("click"),
            Self::Click { trusted: false } => f.write_str("click (synthetic)"),
            Self::Scroll => f.write_str("scroll"),
        }
    }
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReplayError::MissingPath {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Build the fixture document. Every element is labelled with its name.
    pub fn build(&self) -> Result<FixtureDocument> {
        let Size { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ReplayError::invalid(
                "viewport must have a finite, positive size",
            ));
        }
        let mut doc = FixtureDocument::new(self.viewport.width, self.viewport.height);
        let mut seen = HashSet::new();

        for spec in &self.elements {
            if !seen.insert(spec.name.as_str()) {
                return Err(ReplayError::DuplicateElement {
                    name: spec.name.clone(),
                });
            }
            if let Some(rect) = spec.rect {
                if ![rect.x, rect.y, rect.width, rect.height]
                    .iter()
                    .all(|v| v.is_finite())
                {
                    return Err(ReplayError::invalid(format!(
                        "rect of {} must be finite",
                        spec.name
                    )));
                }
            }
            if !spec.radius.is_finite() {
                return Err(ReplayError::invalid(format!(
                    "radius of {} must be finite",
                    spec.name
                )));
            }
            let parent = match &spec.parent {
                Some(name) => lookup(&doc, name)?,
                None => doc.root(),
            };
            let id = match spec.rect {
                Some(rect) => doc.add(parent, spec.role, rect),
                None => doc.add_unboxed(parent, spec.role),
            };
            doc.mark(id, parse_markers(&spec.markers)?);
            doc.set_visibility(id, spec.visibility);
            doc.set_radius(id, spec.radius);
            doc.set_z(id, spec.z);
            doc.label(id, spec.name.clone());
        }

        for overlay in &self.overlays {
            let root = lookup(&doc, &overlay.root)?;
            doc.add_overlay(root, overlay.shown);
        }

        tracing::debug!(
            message = "replay.scenario.built",
            elements = self.elements.len(),
            overlays = self.overlays.len(),
            steps = self.steps.len()
        );
        Ok(doc)
    }
}

/// Resolve an element name in a built document.
pub fn lookup(doc: &FixtureDocument, name: &str) -> Result<ElementId> {
    doc.find(name).ok_or_else(|| ReplayError::unknown(name))
}

fn parse_markers(names: &[String]) -> Result<Markers> {
    names.iter().try_fold(Markers::empty(), |acc, name| {
        Markers::parse_name(name)
            .map(|marker| acc | marker)
            .ok_or_else(|| ReplayError::invalid(format!("unknown marker: {name}")))
    })
}
