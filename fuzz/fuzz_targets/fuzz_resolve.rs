#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spatnav::{Registry, Resolver};
use spatnav_core::{Direction, NavConfig, Rect};

#[derive(Arbitrary, Debug)]
struct FuzzBox {
    x: u16,
    y: u16,
    w: u8,
    h: u8,
}

#[derive(Arbitrary, Debug)]
enum FuzzDirection {
    Up,
    Down,
    Left,
    Right,
}

impl From<&FuzzDirection> for Direction {
    fn from(d: &FuzzDirection) -> Self {
        match d {
            FuzzDirection::Up => Direction::Up,
            FuzzDirection::Down => Direction::Down,
            FuzzDirection::Left => Direction::Left,
            FuzzDirection::Right => Direction::Right,
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    boxes: Vec<FuzzBox>,
    start: u8,
    moves: Vec<FuzzDirection>,
}

fuzz_target!(|input: FuzzInput| {
    if input.boxes.is_empty() || input.boxes.len() > 64 || input.moves.len() > 64 {
        return;
    }
    let rects: Vec<Rect> = input
        .boxes
        .iter()
        .map(|b| {
            Rect::new(
                f32::from(b.x % 1200),
                f32::from(b.y % 900),
                f32::from(b.w.max(1)),
                f32::from(b.h.max(1)),
            )
        })
        .collect();
    let (doc, ids) = spatnav_harness::scatter((1280.0, 960.0), &rects);
    let config = NavConfig::default();
    let members = Registry::new(&doc).snapshot(None);
    let resolver = Resolver::new(&doc, &config);

    let mut active = ids[usize::from(input.start) % ids.len()];
    for mv in &input.moves {
        let Some(next) = resolver.resolve(active, mv.into()) else {
            continue;
        };
        assert_ne!(next, active);
        assert!(members.contains(next));
        active = next;
    }
});
