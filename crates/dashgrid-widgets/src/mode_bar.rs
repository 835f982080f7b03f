//! Mode bar: the edit/view toggle and the edit-mode actions.

use egui::Ui;

use crate::buttons::{ActionButton, ToggleButton};
use crate::layout::toolbar_frame;

/// Action requested from the mode bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeBarAction {
    ToggleEdit,
    Save,
    /// Ask to clear; the bar then shows the confirmation.
    Clear,
    /// Clearing was confirmed.
    ConfirmClear,
    /// Clearing was declined.
    KeepWidgets,
    Cancel,
}

/// Top bar with the mode toggle. Save, clear and cancel only show while
/// editing. Clearing takes a second click on the confirmation.
pub struct ModeBar<'a> {
    editing: bool,
    confirm_clear: bool,
    status: Option<&'a str>,
}

impl<'a> ModeBar<'a> {
    pub fn new(editing: bool) -> Self {
        Self {
            editing,
            confirm_clear: false,
            status: None,
        }
    }

    /// Replace the clear button with a yes/no confirmation.
    pub fn confirm_clear(mut self, confirm: bool) -> Self {
        self.confirm_clear = confirm;
        self
    }

    /// Message shown after the buttons (e.g. a save failure).
    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    /// Show the bar and return the requested action, if any.
    pub fn show(self, ui: &mut Ui) -> Option<ModeBarAction> {
        let mut action = None;
        toolbar_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                let label = if self.editing { "Back to View" } else { "Edit Dashboard" };
                if ToggleButton::new(label, self.editing).min_width(110.0).height(28.0).show(ui) {
                    action = Some(ModeBarAction::ToggleEdit);
                }

                if self.editing {
                    if ActionButton::new("Save Layout").primary().show(ui) {
                        action = Some(ModeBarAction::Save);
                    }
                    if self.confirm_clear {
                        crate::layout::section_label(ui, "Remove every widget?");
                        if ActionButton::new("Yes, clear").danger().show(ui) {
                            action = Some(ModeBarAction::ConfirmClear);
                        }
                        if ActionButton::new("Keep").show(ui) {
                            action = Some(ModeBarAction::KeepWidgets);
                        }
                    } else if ActionButton::new("Clear")
                        .danger()
                        .tooltip("Remove every widget from the grid")
                        .show(ui)
                    {
                        action = Some(ModeBarAction::Clear);
                    }
                    if ActionButton::new("Cancel")
                        .tooltip("Discard unsaved changes")
                        .show(ui)
                    {
                        action = Some(ModeBarAction::Cancel);
                    }
                }

                if let Some(status) = self.status {
                    crate::layout::section_label(ui, status);
                }
            });
        });
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bar_idle_frame() {
        let ctx = egui::Context::default();
        let mut result = Some(ModeBarAction::Save);
        for editing in [false, true] {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    result = ModeBar::new(editing).status(Some("Saved")).show(ui);
                });
            });
            assert_eq!(result, None);
        }
    }

    #[test]
    fn test_confirm_clear_idle_frame() {
        let ctx = egui::Context::default();
        let mut result = Some(ModeBarAction::ConfirmClear);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                result = ModeBar::new(true).confirm_clear(true).show(ui);
            });
        });
        assert_eq!(result, None);
    }
}
