//! Button components: toggle buttons and action buttons.

use egui::{vec2, Align2, Color32, CornerRadius, CursorIcon, Sense, Ui};

use crate::{sizing, theme};

/// A toggle button with text label.
/// Uses solid blue background when selected (Excalidraw style).
pub struct ToggleButton<'a> {
    label: &'a str,
    selected: bool,
    min_width: Option<f32>,
    height: f32,
    font_size: f32,
}

impl<'a> ToggleButton<'a> {
    /// Create a new toggle button.
    pub fn new(label: &'a str, selected: bool) -> Self {
        Self {
            label,
            selected,
            min_width: None,
            height: 24.0,
            font_size: 11.0,
        }
    }

    /// Set minimum width.
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = Some(width);
        self
    }

    /// Set the button height.
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = egui::FontId::proportional(self.font_size);
        let galley = ui.painter().layout_no_wrap(
            self.label.to_string(),
            font_id.clone(),
            Color32::PLACEHOLDER,
        );
        let text_width = galley.size().x;
        let width = self.min_width.unwrap_or(0.0).max(text_width + 16.0);

        let (rect, response) = ui.allocate_exact_size(vec2(width, self.height), Sense::click());

        if ui.is_rect_visible(rect) {
            let (bg_color, text_color) = if self.selected {
                (theme::ACCENT, Color32::WHITE)
            } else if response.hovered() {
                (Color32::from_gray(235), Color32::from_gray(80))
            } else {
                (Color32::from_gray(245), Color32::from_gray(80))
            };

            ui.painter()
                .rect_filled(rect, CornerRadius::same(sizing::CORNER_RADIUS), bg_color);
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = response.clicked();
        response.on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// Visual weight of an [`ActionButton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionStyle {
    /// Plain outlined button.
    #[default]
    Outline,
    /// Filled accent button for the main action.
    Primary,
    /// Red text for destructive actions.
    Danger,
}

/// A labelled button with optional tooltip.
pub struct ActionButton<'a> {
    label: &'a str,
    tooltip: Option<&'a str>,
    style: ActionStyle,
    enabled: bool,
}

impl<'a> ActionButton<'a> {
    pub fn new(label: &'a str) -> Self {
        Self {
            label,
            tooltip: None,
            style: ActionStyle::default(),
            enabled: true,
        }
    }

    pub fn style(mut self, style: ActionStyle) -> Self {
        self.style = style;
        self
    }

    pub fn primary(self) -> Self {
        self.style(ActionStyle::Primary)
    }

    pub fn danger(self) -> Self {
        self.style(ActionStyle::Danger)
    }

    /// Text shown on hover.
    pub fn tooltip(mut self, tooltip: &'a str) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the button and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let font_id = egui::FontId::proportional(12.0);
        let galley = ui.painter().layout_no_wrap(
            self.label.to_string(),
            font_id.clone(),
            Color32::PLACEHOLDER,
        );
        let size = vec2(galley.size().x + 20.0, sizing::BUTTON_HEIGHT);
        let sense = if self.enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) = ui.allocate_exact_size(size, sense);

        if ui.is_rect_visible(rect) {
            let radius = CornerRadius::same(sizing::CORNER_RADIUS);
            let hovered = self.enabled && response.hovered();
            let (fill, text_color) = match self.style {
                ActionStyle::Primary => (theme::ACCENT, Color32::WHITE),
                ActionStyle::Danger => (
                    if hovered { theme::HOVER_BG } else { Color32::TRANSPARENT },
                    theme::DANGER,
                ),
                ActionStyle::Outline => (
                    if hovered { theme::HOVER_BG } else { Color32::TRANSPARENT },
                    theme::TEXT,
                ),
            };
            let text_color = if self.enabled {
                text_color
            } else {
                Color32::from_gray(180)
            };

            ui.painter().rect_filled(rect, radius, fill);
            if self.style != ActionStyle::Primary {
                ui.painter().rect_stroke(
                    rect,
                    radius,
                    egui::Stroke::new(1.0, theme::BORDER),
                    egui::StrokeKind::Inside,
                );
            }
            ui.painter()
                .text(rect.center(), Align2::CENTER_CENTER, self.label, font_id, text_color);
        }

        let clicked = self.enabled && response.clicked();
        let response = if self.enabled {
            response.on_hover_cursor(CursorIcon::PointingHand)
        } else {
            response
        };
        if let Some(tooltip) = self.tooltip {
            response.on_hover_text(tooltip);
        }
        clicked
    }
}
