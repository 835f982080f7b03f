//! Placement on the column grid: first-fit insertion and push-down collision
//! resolution.

use crate::layout::PlacedWidget;
use std::collections::VecDeque;

/// Top-most, then left-most free slot for a `w` x `h` widget.
///
/// `w` must already be clamped to `columns`.
pub(crate) fn first_fit(placed: &[PlacedWidget], w: u32, h: u32, columns: u32) -> (u32, u32) {
    let max_x = columns.saturating_sub(w);
    let mut y = 0;
    loop {
        for x in 0..=max_x {
            let candidate = PlacedWidget::new("", "", x, y, w, h);
            if !placed.iter().any(|p| p.overlaps(&candidate)) {
                return (x, y);
            }
        }
        // Rows past the lowest widget are always free, so this terminates.
        y += 1;
    }
}

/// Push every widget overlapping `widgets[anchor]` below it, cascading.
///
/// The anchor keeps its position. Returns the ids of widgets that moved.
pub(crate) fn push_down(widgets: &mut [PlacedWidget], anchor: usize) -> Vec<String> {
    let mut moved = Vec::new();
    let mut queue = VecDeque::from([anchor]);

    while let Some(pusher) = queue.pop_front() {
        let rect = widgets[pusher].clone();
        for (i, widget) in widgets.iter_mut().enumerate() {
            if i == pusher || i == anchor || !widget.overlaps(&rect) {
                continue;
            }
            widget.y = rect.bottom();
            if !moved.contains(&widget.id) {
                moved.push(widget.id.clone());
            }
            queue.push_back(i);
        }
    }

    moved
}
