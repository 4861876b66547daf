//! E2E navigation scenarios over fixture documents.
//!
//! Drives a [`Navigator`] end to end (registry, ray search, bucket search,
//! arbitration, highlight, scrolling and deferred tasks) and checks the
//! observable behaviour:
//!
//! 1. Lone element: no move in any direction.
//! 2. Grid: right then left returns to the start.
//! 3. Hidden, transparent and non-navigable elements are never reached.
//! 4. Stacked overlays: only the shown one plus the control bar.
//! 5. Highlight geometry and hiding.
//! 6. Same-container preference.
//! 7. Delayed activation and settle under each re-entrancy policy.

#![forbid(unsafe_code)]

use spatnav::{Navigator, Registry, Resolver, Rule};
use spatnav_core::{
    Clock, Direction, ElementId, LabClock, Markers, NavConfig, NavEvent, Rect, Reentrancy, Role,
    Visibility,
};
use spatnav_harness::{Effect, FixtureDocument, RecordingEffects, grid};
use web_time::Duration;

// ── Helpers ──────────────────────────────────────────────────────────

fn lab_navigator(config: NavConfig) -> (Navigator, LabClock) {
    let lab = LabClock::new();
    (Navigator::new(config).with_clock(Clock::lab(&lab)), lab)
}

fn ids(doc: &FixtureDocument) -> Vec<ElementId> {
    Registry::new(doc)
        .enumerate(None)
        .into_iter()
        .map(|el| el.id)
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Basic moves
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn lone_element_never_moves() {
    let mut doc = FixtureDocument::new(1024.0, 768.0);
    let root = doc.root();
    let only = doc.add(root, Role::Link, Rect::new(400.0, 300.0, 120.0, 40.0));
    let mut nav = Navigator::default();
    let mut fx = RecordingEffects::default();
    nav.set_active(&doc, only);

    for direction in Direction::ALL {
        assert_eq!(nav.move_focus(&doc, &mut fx, direction), None);
        assert_eq!(nav.current(), Some(only));
    }
}

#[test]
fn grid_right_then_left_round_trips() {
    let doc = grid(3, 3, 100.0);
    let mut nav = Navigator::default();
    let mut fx = RecordingEffects::default();
    nav.set_active(&doc, doc.cell(1, 1));

    assert_eq!(nav.move_focus(&doc, &mut fx, Direction::Right), Some(doc.cell(2, 1)));
    assert_eq!(nav.move_focus(&doc, &mut fx, Direction::Left), Some(doc.cell(1, 1)));
}

#[test]
fn full_grid_sweep_visits_every_column() {
    let doc = grid(5, 2, 80.0);
    let mut nav = Navigator::default();
    let mut fx = RecordingEffects::default();
    nav.set_active(&doc, doc.cell(0, 0));

    for col in 1..5 {
        assert_eq!(nav.move_focus(&doc, &mut fx, Direction::Right), Some(doc.cell(col, 0)));
    }
    assert_eq!(nav.move_focus(&doc, &mut fx, Direction::Right), None);
    assert_eq!(nav.move_focus(&doc, &mut fx, Direction::Down), Some(doc.cell(4, 1)));
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Filtering
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn invisible_and_excluded_elements_are_skipped() {
    let mut doc = FixtureDocument::new(600.0, 100.0);
    let root = doc.root();
    let start = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 80.0, 40.0));
    let faded = doc.add(root, Role::Button, Rect::new(100.0, 0.0, 80.0, 40.0));
    doc.set_visibility(
        faded,
        Visibility {
            opacity: 0.0,
            ..Visibility::default()
        },
    );
    let skipped = doc.add(root, Role::Generic, Rect::new(200.0, 0.0, 80.0, 40.0));
    doc.set_visibility(
        skipped,
        Visibility {
            content_hidden: true,
            ..Visibility::default()
        },
    );
    let buried = doc.add(skipped, Role::Button, Rect::new(200.0, 0.0, 80.0, 40.0));
    let fenced = doc.add(root, Role::Generic, Rect::new(300.0, 0.0, 80.0, 40.0));
    doc.mark(fenced, Markers::NON_NAVIGABLE);
    let fenced_button = doc.add(fenced, Role::Button, Rect::new(300.0, 0.0, 80.0, 40.0));
    let end = doc.add(root, Role::Button, Rect::new(400.0, 0.0, 80.0, 40.0));

    let members = ids(&doc);
    assert_eq!(members, vec![start, end]);
    for hidden in [faded, buried, fenced_button] {
        assert!(!members.contains(&hidden));
    }

    let mut nav = Navigator::default();
    let mut fx = RecordingEffects::default();
    nav.set_active(&doc, start);
    assert_eq!(nav.move_focus(&doc, &mut fx, Direction::Right), Some(end));
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Overlay scoping
// ═════════════════════════════════════════════════════════════════════════

struct Stacked {
    doc: FixtureDocument,
    close: ElementId,
    layers: Vec<(ElementId, ElementId)>,
}

/// Three full-screen overlays, each with one button, plus a control bar.
fn stacked_overlays() -> Stacked {
    let mut doc = FixtureDocument::new(800.0, 600.0);
    let root = doc.root();
    let bar = doc.add(root, Role::Generic, Rect::new(0.0, 0.0, 800.0, 40.0));
    doc.mark(bar, Markers::CONTROL_BAR);
    let close = doc.add(bar, Role::Generic, Rect::new(760.0, 0.0, 40.0, 40.0));
    doc.mark(close, Markers::ACTIVATION_HANDLER);

    let mut layers = Vec::new();
    for i in 0..3 {
        let overlay = doc.add(root, Role::Generic, Rect::new(0.0, 40.0, 800.0, 560.0));
        doc.mark(overlay, Markers::OVERLAY);
        doc.add_overlay(overlay, false);
        let x = 100.0 + 200.0 * i as f32;
        let button = doc.add(overlay, Role::Button, Rect::new(x, 300.0, 100.0, 40.0));
        layers.push((overlay, button));
    }
    Stacked { doc, close, layers }
}

#[test]
fn only_shown_overlay_and_control_bar_enumerate() {
    let mut stacked = stacked_overlays();
    let (middle, middle_button) = stacked.layers[1];
    stacked.doc.set_shown(middle, true);

    assert_eq!(ids(&stacked.doc), vec![stacked.close, middle_button]);
}

#[test]
fn topmost_shown_overlay_wins() {
    let mut stacked = stacked_overlays();
    stacked.doc.set_shown(stacked.layers[0].0, true);
    stacked.doc.set_shown(stacked.layers[2].0, true);

    assert_eq!(ids(&stacked.doc), vec![stacked.close, stacked.layers[2].1]);
}

#[test]
fn explicit_scope_skips_control_bar() {
    let mut stacked = stacked_overlays();
    let (first, first_button) = stacked.layers[0];
    stacked.doc.set_shown(first, true);
    let scoped: Vec<ElementId> = Registry::new(&stacked.doc)
        .enumerate(Some(first))
        .into_iter()
        .map(|el| el.id)
        .collect();
    assert_eq!(scoped, vec![first_button]);
}

#[test]
fn overlay_button_reaches_control_bar() {
    let mut stacked = stacked_overlays();
    let (last, last_button) = stacked.layers[2];
    stacked.doc.set_shown(last, true);
    let config = NavConfig::default();
    // Button at x 500..600; close sits at 760..800, up and to the right.
    assert_eq!(
        Resolver::new(&stacked.doc, &config).resolve(last_button, Direction::Up),
        Some(stacked.close)
    );
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Highlight
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn highlight_follows_and_hides() {
    let mut doc = FixtureDocument::new(800.0, 600.0);
    let root = doc.root();
    let el = doc.add(root, Role::Button, Rect::new(100.0, 100.0, 50.0, 20.0));
    let mut nav = Navigator::default();
    nav.set_active(&doc, el);

    let shown = *nav.highlight();
    assert!(shown.visible);
    assert_eq!((shown.top, shown.left, shown.width, shown.height), (92.0, 92.0, 66.0, 36.0));

    nav.handle_event(&doc, NavEvent::PointerClick { trusted: true });
    let hidden = *nav.highlight();
    assert!(!hidden.visible);
    assert_eq!(hidden.opacity(), 0.0);
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Same-container preference
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn ray_hit_sharing_a_container_with_the_nearest_wins() {
    let mut doc = FixtureDocument::new(600.0, 600.0);
    let root = doc.root();
    let origin = doc.add(root, Role::Button, Rect::new(250.0, 500.0, 100.0, 40.0));
    let toolbar = doc.add(root, Role::Generic, Rect::new(0.0, 100.0, 600.0, 80.0));
    // Far along the ray, but in the same toolbar as the closer diagonal.
    let in_line = doc.add(toolbar, Role::Button, Rect::new(260.0, 100.0, 80.0, 40.0));
    let diagonal = doc.add(toolbar, Role::Button, Rect::new(420.0, 140.0, 80.0, 40.0));

    let config = NavConfig::default();
    let resolution = Resolver::new(&doc, &config)
        .explain(origin, Direction::Up)
        .expect("origin has a box");
    assert_eq!(resolution.direct.map(|c| c.id), Some(in_line));
    assert_eq!(resolution.nearest.map(|c| c.id), Some(diagonal));
    assert_eq!(resolution.target(), Some(in_line));
    assert_eq!(resolution.verdict.rule, Rule::SharedContainer);
}

#[test]
fn ray_with_nothing_in_line_terminates() {
    let mut doc = FixtureDocument::new(400.0, 400.0);
    let root = doc.root();
    let origin = doc.add(root, Role::Button, Rect::new(0.0, 0.0, 50.0, 50.0));
    let _below = doc.add(root, Role::Button, Rect::new(0.0, 300.0, 50.0, 50.0));
    let config = NavConfig::default();
    let resolution = Resolver::new(&doc, &config)
        .explain(origin, Direction::Right)
        .expect("origin has a box");
    assert!(resolution.direct.is_none());
    assert!(resolution.target().is_none());
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Deferred tasks
// ═════════════════════════════════════════════════════════════════════════

fn double_select(policy: Reentrancy) -> Vec<Effect> {
    let doc = grid(2, 1, 100.0);
    let config = NavConfig {
        reentrancy: policy,
        ..NavConfig::default()
    };
    let (mut nav, lab) = lab_navigator(config);
    let mut fx = RecordingEffects::default();
    nav.set_active(&doc, doc.cell(0, 0));
    nav.select();
    lab.advance(Duration::from_millis(50));
    nav.move_focus(&doc, &mut fx, Direction::Right);
    nav.select();
    lab.advance(Duration::from_millis(500));
    nav.poll(&doc, &mut fx);
    fx.take()
}

#[test]
fn last_wins_activates_only_latest() {
    let doc = grid(2, 1, 100.0);
    let second = doc.cell(1, 0);
    assert_eq!(
        double_select(Reentrancy::LastWins),
        vec![Effect::Activate(second), Effect::Focus(second)]
    );
}

#[test]
fn first_wins_activates_only_first() {
    let doc = grid(2, 1, 100.0);
    let first = doc.cell(0, 0);
    assert_eq!(
        double_select(Reentrancy::FirstWins),
        vec![Effect::Activate(first), Effect::Focus(first)]
    );
}

#[test]
fn unguarded_activates_both_in_order() {
    let doc = grid(2, 1, 100.0);
    let (first, second) = (doc.cell(0, 0), doc.cell(1, 0));
    assert_eq!(
        double_select(Reentrancy::Unguarded),
        vec![
            Effect::Activate(first),
            Effect::Focus(first),
            Effect::Activate(second),
            Effect::Focus(second),
        ]
    );
}

#[test]
fn closing_overlay_resettles_on_sidebar() {
    let mut doc = FixtureDocument::new(800.0, 600.0);
    let root = doc.root();
    let sidebar = doc.add(root, Role::Generic, Rect::new(0.0, 0.0, 120.0, 600.0));
    doc.mark(sidebar, Markers::NAV_SIDEBAR);
    let current = doc.add(sidebar, Role::Button, Rect::new(10.0, 10.0, 100.0, 40.0));
    let other = doc.add(sidebar, Role::Button, Rect::new(10.0, 60.0, 100.0, 40.0));
    doc.mark(other, Markers::INACTIVE);

    let popup = doc.add(root, Role::Generic, Rect::new(200.0, 100.0, 400.0, 300.0));
    doc.mark(popup, Markers::OVERLAY);
    doc.add_overlay(popup, true);
    let first = doc.add(popup, Role::Button, Rect::new(250.0, 300.0, 100.0, 40.0));
    let _second = doc.add(popup, Role::Button, Rect::new(400.0, 300.0, 100.0, 40.0));

    let (mut nav, lab) = lab_navigator(NavConfig::default());
    let mut fx = RecordingEffects::default();
    assert_eq!(nav.default_selection(&doc), Some(first));

    doc.set_shown(popup, false);
    nav.handle_event(&doc, NavEvent::ScopeChanged);
    assert_eq!(nav.current(), None);
    lab.advance(Duration::from_millis(300));
    assert_eq!(nav.poll(&doc, &mut fx), 1);
    assert_eq!(nav.current(), Some(current));
}
