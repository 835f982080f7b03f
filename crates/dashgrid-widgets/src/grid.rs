//! Column-grid board.
//!
//! Paints cells placed in grid units and, when editable, turns header drags,
//! corner-grip drags and close clicks into [`GridEvent`]s. Events are only
//! reported once the gesture ends, so callers never see half-finished moves.

use egui::{
    pos2, vec2, Align2, Color32, CornerRadius, CursorIcon, FontId, Id, Pos2, Rect, Sense, Stroke,
    StrokeKind, Ui, Vec2,
};

use crate::{sizing, theme};

/// Grid geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStyle {
    /// Number of columns
    pub columns: u32,
    /// Height of one row in points
    pub cell_height: f32,
    /// Gap between cells in points
    pub margin: f32,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            columns: 12,
            cell_height: 60.0,
            margin: 10.0,
        }
    }
}

impl GridStyle {
    /// Width of one column when the board is `total_width` wide.
    pub fn column_width(&self, total_width: f32) -> f32 {
        let columns = self.columns.max(1) as f32;
        ((total_width - self.margin * (columns - 1.0)) / columns).max(1.0)
    }

    /// Screen rectangle of a cell at `(x, y)` spanning `w` x `h`.
    pub fn cell_rect(&self, origin: Pos2, total_width: f32, (x, y, w, h): (u32, u32, u32, u32)) -> Rect {
        let col = self.column_width(total_width);
        let min = pos2(
            origin.x + x as f32 * (col + self.margin),
            origin.y + y as f32 * (self.cell_height + self.margin),
        );
        let size = vec2(
            w as f32 * col + w.saturating_sub(1) as f32 * self.margin,
            h as f32 * self.cell_height + h.saturating_sub(1) as f32 * self.margin,
        );
        Rect::from_min_size(min, size)
    }

    /// Nearest grid position for a cell whose top-left corner is at `top_left`.
    pub fn snap_position(&self, origin: Pos2, total_width: f32, top_left: Pos2, w: u32) -> (u32, u32) {
        let col_step = self.column_width(total_width) + self.margin;
        let row_step = self.cell_height + self.margin;
        let max_x = self.columns.saturating_sub(w) as f32;
        let x = ((top_left.x - origin.x) / col_step).round().clamp(0.0, max_x);
        let y = ((top_left.y - origin.y) / row_step).round().max(0.0);
        (x as u32, y as u32)
    }

    /// Nearest span for a cell of `size` points starting at column `x`.
    pub fn snap_size(&self, total_width: f32, size: Vec2, x: u32) -> (u32, u32) {
        let col_step = self.column_width(total_width) + self.margin;
        let row_step = self.cell_height + self.margin;
        let max_w = self.columns.saturating_sub(x).max(1) as f32;
        let w = ((size.x + self.margin) / col_step).round().clamp(1.0, max_w);
        let h = ((size.y + self.margin) / row_step).round().max(1.0);
        (w as u32, h as u32)
    }
}

/// One cell on the board.
#[derive(Debug, Clone)]
pub struct GridCell<'a> {
    pub title: &'a str,
    /// Secondary text drawn in the body (e.g. the component name)
    pub body: &'a str,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A completed user gesture, in grid units. `index` refers to the cell slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    Moved { index: usize, x: u32, y: u32 },
    Resized { index: usize, w: u32, h: u32 },
    Removed { index: usize },
}

/// Board that draws cells and, when editable, reports gestures.
pub struct GridBoard<'a> {
    cells: &'a [GridCell<'a>],
    style: GridStyle,
    editable: bool,
}

impl<'a> GridBoard<'a> {
    pub fn new(cells: &'a [GridCell<'a>]) -> Self {
        Self {
            cells,
            style: GridStyle::default(),
            editable: false,
        }
    }

    pub fn style(mut self, style: GridStyle) -> Self {
        self.style = style;
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Show the board and return the gesture completed this frame, if any.
    pub fn show(self, ui: &mut Ui) -> Option<GridEvent> {
        let style = self.style;
        let total_width = ui.available_width().max(1.0);
        let mut rows = self
            .cells
            .iter()
            .map(|c| c.y.saturating_add(c.h))
            .max()
            .unwrap_or(0);
        if self.editable {
            // Room to drop below the last row
            rows = rows.saturating_add(2);
        }
        let height = rows as f32 * (style.cell_height + style.margin);
        let (board, _) = ui.allocate_exact_size(vec2(total_width, height), Sense::hover());
        let origin = board.min;
        let base_id = ui.id().with("grid_board");

        let mut event = None;
        for (index, cell) in self.cells.iter().enumerate() {
            let rect = style.cell_rect(origin, total_width, (cell.x, cell.y, cell.w, cell.h));
            paint_cell(ui, rect, cell);

            if !self.editable {
                continue;
            }

            let header = Rect::from_min_max(
                rect.min,
                pos2(rect.max.x, rect.min.y + sizing::HEADER_HEIGHT),
            );
            let close = Rect::from_min_size(
                pos2(header.max.x - sizing::HEADER_HEIGHT, header.min.y),
                vec2(sizing::HEADER_HEIGHT, sizing::HEADER_HEIGHT),
            );
            let handle = Rect::from_min_max(header.min, pos2(close.min.x, header.max.y));
            let grip = Rect::from_min_size(
                rect.max - vec2(sizing::GRIP, sizing::GRIP),
                vec2(sizing::GRIP, sizing::GRIP),
            );

            let close_response = ui.interact(close, base_id.with(("close", index)), Sense::click());
            ui.painter().text(
                close.center(),
                Align2::CENTER_CENTER,
                "×",
                FontId::proportional(14.0),
                if close_response.hovered() { theme::DANGER } else { theme::TEXT_MUTED },
            );
            if close_response.clicked() {
                event = Some(GridEvent::Removed { index });
            }

            let move_id = base_id.with(("move", index));
            let move_response = ui
                .interact(handle, move_id, Sense::drag())
                .on_hover_cursor(CursorIcon::Grab);
            if let Some(delta) = track_drag(ui, move_id, &move_response) {
                if move_response.drag_stopped() {
                    let (x, y) = style.snap_position(origin, total_width, rect.min + delta, cell.w);
                    if (x, y) != (cell.x, cell.y) {
                        event = Some(GridEvent::Moved { index, x, y });
                    }
                } else {
                    paint_ghost(ui, rect.translate(delta));
                }
            }

            let grip_id = base_id.with(("resize", index));
            let grip_response = ui
                .interact(grip, grip_id, Sense::drag())
                .on_hover_cursor(CursorIcon::ResizeNwSe);
            ui.painter()
                .rect_filled(grip.shrink(2.0), CornerRadius::same(2), theme::BORDER);
            if let Some(delta) = track_drag(ui, grip_id, &grip_response) {
                let resized = Rect::from_min_size(rect.min, (rect.size() + delta).max(vec2(1.0, 1.0)));
                if grip_response.drag_stopped() {
                    let (w, h) = style.snap_size(total_width, resized.size(), cell.x);
                    if (w, h) != (cell.w, cell.h) {
                        event = Some(GridEvent::Resized { index, w, h });
                    }
                } else {
                    paint_ghost(ui, resized);
                }
            }
        }

        event
    }
}

/// Accumulate the drag offset for `id` across frames. Returns the total while
/// the drag is active (and on the frame it stops), clearing it at the end.
fn track_drag(ui: &Ui, id: Id, response: &egui::Response) -> Option<Vec2> {
    if !response.dragged() && !response.drag_stopped() {
        return None;
    }
    let delta = response.drag_delta();
    let total = ui.data_mut(|d| {
        let acc = d.get_temp_mut_or_default::<Vec2>(id);
        *acc += delta;
        *acc
    });
    if response.drag_stopped() {
        ui.data_mut(|d| d.remove::<Vec2>(id));
    }
    Some(total)
}

fn paint_cell(ui: &Ui, rect: Rect, cell: &GridCell<'_>) {
    if !ui.is_rect_visible(rect) {
        return;
    }
    let painter = ui.painter();
    let radius = CornerRadius::same(sizing::CORNER_RADIUS);
    painter.rect_filled(rect, radius, theme::CELL_BG);
    painter.rect_stroke(rect, radius, Stroke::new(1.0, theme::BORDER), StrokeKind::Inside);
    painter.line_segment(
        [
            pos2(rect.min.x, rect.min.y + sizing::HEADER_HEIGHT),
            pos2(rect.max.x, rect.min.y + sizing::HEADER_HEIGHT),
        ],
        Stroke::new(1.0, Color32::from_gray(235)),
    );
    painter.text(
        pos2(rect.min.x + 8.0, rect.min.y + sizing::HEADER_HEIGHT / 2.0),
        Align2::LEFT_CENTER,
        cell.title,
        FontId::proportional(12.0),
        theme::TEXT,
    );
    painter.text(
        pos2(rect.center().x, rect.center().y + sizing::HEADER_HEIGHT / 2.0),
        Align2::CENTER_CENTER,
        cell.body,
        FontId::monospace(11.0),
        theme::TEXT_MUTED,
    );
}

fn paint_ghost(ui: &Ui, rect: Rect) {
    ui.painter().rect_stroke(
        rect,
        CornerRadius::same(sizing::CORNER_RADIUS),
        Stroke::new(1.5, theme::ACCENT),
        StrokeKind::Outside,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> GridStyle {
        GridStyle {
            columns: 12,
            cell_height: 60.0,
            margin: 10.0,
        }
    }

    #[test]
    fn test_column_width() {
        // 12 columns of 50 with 11 gaps of 10
        assert_eq!(style().column_width(710.0), 50.0);
    }

    #[test]
    fn test_cell_rect() {
        let rect = style().cell_rect(Pos2::ZERO, 710.0, (2, 1, 3, 2));
        assert_eq!(rect.min, pos2(120.0, 70.0));
        assert_eq!(rect.size(), vec2(170.0, 130.0));
    }

    #[test]
    fn test_snap_position_rounds_and_clamps() {
        let s = style();
        assert_eq!(s.snap_position(Pos2::ZERO, 710.0, pos2(125.0, 80.0), 4), (2, 1));
        assert_eq!(s.snap_position(Pos2::ZERO, 710.0, pos2(-40.0, -90.0), 4), (0, 0));
        assert_eq!(s.snap_position(Pos2::ZERO, 710.0, pos2(700.0, 0.0), 4), (8, 0));
    }

    #[test]
    fn test_snap_size() {
        let s = style();
        assert_eq!(s.snap_size(710.0, vec2(170.0, 130.0), 0), (3, 2));
        assert_eq!(s.snap_size(710.0, vec2(5.0, 5.0), 0), (1, 1));
        assert_eq!(s.snap_size(710.0, vec2(2000.0, 60.0), 10), (2, 1));
    }

    #[test]
    fn test_board_idle_frame_reports_nothing() {
        let cells = [
            GridCell { title: "Data Table", body: "data-table-widget", x: 0, y: 0, w: 6, h: 5 },
            GridCell { title: "Weather", body: "weather-widget", x: 6, y: 0, w: 3, h: 4 },
        ];
        let ctx = egui::Context::default();
        let mut result = Some(GridEvent::Removed { index: 9 });
        for editable in [false, true] {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    result = GridBoard::new(&cells).editable(editable).show(ui);
                });
            });
            assert_eq!(result, None);
        }
    }

    #[test]
    fn test_board_with_far_edge_cell() {
        let cells = [GridCell { title: "Metrics", body: "metrics-widget", x: 0, y: u32::MAX, w: 3, h: 3 }];
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                assert_eq!(GridBoard::new(&cells).editable(true).show(ui), None);
            });
        });
    }
}
