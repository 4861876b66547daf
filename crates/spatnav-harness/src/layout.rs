#![forbid(unsafe_code)]

//! Layout builders for common fixture shapes.

use spatnav_core::{ElementId, Rect, Role};

use crate::document::{FixtureDocument, cell_label};

/// `cols` x `rows` adjacent square buttons of side `cell`, row-major,
/// directly under the document root. The viewport is exactly the grid.
///
/// Cells are labelled so [`FixtureDocument::cell`] finds them.
#[must_use]
pub fn grid(cols: usize, rows: usize, cell: f32) -> FixtureDocument {
    let mut doc = FixtureDocument::new(cols as f32 * cell, rows as f32 * cell);
    let root = doc.root();
    for row in 0..rows {
        for col in 0..cols {
            let rect = Rect::new(col as f32 * cell, row as f32 * cell, cell, cell);
            let id = doc.add(root, Role::Button, rect);
            doc.label(id, cell_label(col, row));
        }
    }
    doc
}

/// A vertical list of `count` buttons inside one container, `gap` apart.
/// Returns the document, the container and the items top to bottom.
#[must_use]
pub fn column(
    count: usize,
    item: (f32, f32),
    gap: f32,
) -> (FixtureDocument, ElementId, Vec<ElementId>) {
    let (width, height) = item;
    let total = count as f32 * (height + gap);
    let mut doc = FixtureDocument::new(width, total.max(height));
    let root = doc.root();
    let list = doc.add(root, Role::Generic, Rect::new(0.0, 0.0, width, total));
    let items: Vec<ElementId> = (0..count)
        .map(|i| {
            let y = i as f32 * (height + gap);
            doc.add(list, Role::Button, Rect::new(0.0, y, width, height))
        })
        .collect();
    (doc, list, items)
}

/// One button per rect, all directly under the root, in the given order.
#[must_use]
pub fn scatter(viewport: (f32, f32), rects: &[Rect]) -> (FixtureDocument, Vec<ElementId>) {
    let mut doc = FixtureDocument::new(viewport.0, viewport.1);
    let root = doc.root();
    let ids: Vec<ElementId> = rects
        .iter()
        .map(|rect| doc.add(root, Role::Button, *rect))
        .collect();
    (doc, ids)
}
