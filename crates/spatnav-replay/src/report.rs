use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;
use spatnav::{HighlightState, Navigator};
use spatnav_core::{Clock, ElementId, LabClock, NavConfig, NavEvent, ScrollAlign};
use spatnav_harness::{Effect, FixtureDocument, RecordingEffects};
use web_time::Duration;

use crate::error::{ReplayError, Result};
use crate::scenario::{Scenario, Step, lookup};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightRecord {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub border_radius: Option<f32>,
    pub visible: bool,
}

impl From<&HighlightState> for HighlightRecord {
    fn from(state: &HighlightState) -> Self {
        Self {
            top: state.top,
            left: state.left,
            width: state.width,
            height: state.height,
            border_radius: state.border_radius,
            visible: state.visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: String,
    /// Lab time after the step, in milliseconds since the start.
    pub at_ms: u64,
    pub selection: Option<String>,
    pub changed: bool,
    pub effects: Vec<String>,
    pub highlight: HighlightRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub config: NavConfig,
    pub start: Option<String>,
    pub steps: Vec<StepRecord>,
    pub final_selection: Option<String>,
}

impl ReplayReport {
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "start: {}", self.start.as_deref().unwrap_or("-"));
        for record in &self.steps {
            let marker = if record.changed { "*" } else { " " };
            let _ = write!(
                out,
                "{:>3} {marker} {:<18} -> {}",
                record.index,
                record.step,
                record.selection.as_deref().unwrap_or("-")
            );
            if !record.effects.is_empty() {
                let _ = write!(out, "  [{}]", record.effects.join(", "));
            }
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "final: {}",
            self.final_selection.as_deref().unwrap_or("-")
        );
        out
    }

    /// Fail unless the final selection is `expected` (`"-"` for none).
    pub fn expect_final(&self, expected: &str) -> Result<()> {
        let actual = self.final_selection.as_deref().unwrap_or("-");
        if actual == expected {
            Ok(())
        } else {
            Err(ReplayError::ExpectationFailed {
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }
}

fn name(doc: &FixtureDocument, id: ElementId) -> String {
    doc.name_of(id)
        .map_or_else(|| id.to_string(), ToString::to_string)
}

fn describe(doc: &FixtureDocument, effect: &Effect) -> String {
    match effect {
        Effect::Toggle(id) => format!("toggle {}", name(doc, *id)),
        Effect::Activate(id) => format!("activate {}", name(doc, *id)),
        Effect::Focus(id) => format!("focus {}", name(doc, *id)),
        Effect::Scroll(request) => {
            let align = match request.block {
                ScrollAlign::Start => "start",
                ScrollAlign::Center => "center",
                ScrollAlign::End => "end",
                ScrollAlign::Nearest => "nearest",
            };
            format!("scroll {} ({align})", name(doc, request.target))
        }
    }
}

/// Run every step of `scenario` with `config` on a lab clock.
pub fn replay(scenario: &Scenario, config: NavConfig) -> Result<ReplayReport> {
    config.validate()?;
    let mut doc = scenario.build()?;
    let lab = LabClock::new();
    let mut nav = Navigator::new(config.clone()).with_clock(Clock::lab(&lab));
    let mut effects = RecordingEffects::new();

    if let Some(start) = &scenario.start {
        let id = lookup(&doc, start)?;
        if !nav.set_active(&doc, id) {
            return Err(ReplayError::invalid(format!(
                "start element {start} is not navigable"
            )));
        }
    }
    let start = nav.current().map(|id| name(&doc, id));

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        let before = nav.current();
        match step {
            Step::Move(direction) => {
                nav.move_focus(&doc, &mut effects, *direction);
            }
            Step::Select => {
                nav.select();
            }
            Step::ScopeChanged => nav.handle_event(&doc, NavEvent::ScopeChanged),
            Step::Advance(ms) => {
                lab.advance(Duration::from_millis(*ms));
                nav.poll(&doc, &mut effects);
            }
            Step::Show(overlay) | Step::Hide(overlay) => {
                let root = lookup(&doc, overlay)?;
                if !doc.set_shown(root, matches!(step, Step::Show(_))) {
                    return Err(ReplayError::invalid(format!("{overlay} is not an overlay")));
                }
            }
            Step::Click { trusted } => {
                nav.handle_event(&doc, NavEvent::PointerClick { trusted: *trusted });
            }
            Step::Scroll => nav.handle_event(&doc, NavEvent::ViewportScrolled),
        }

        let after = nav.current();
        let record = StepRecord {
            index,
            step: step.to_string(),
            at_ms: u64::try_from(lab.elapsed().as_millis()).unwrap_or(u64::MAX),
            selection: after.map(|id| name(&doc, id)),
            changed: before != after,
            effects: effects
                .take()
                .iter()
                .map(|effect| describe(&doc, effect))
                .collect(),
            highlight: HighlightRecord::from(nav.highlight()),
        };
        tracing::debug!(
            message = "replay.step",
            index,
            step = %record.step,
            selection = record.selection.as_deref().unwrap_or("-")
        );
        steps.push(record);
    }

    Ok(ReplayReport {
        config,
        start,
        final_selection: nav.current().map(|id| name(&doc, id)),
        steps,
    })
}
