//! Toolbox: a wrapped row of buttons, one per widget kind.

use egui::Ui;

use crate::buttons::ActionButton;

/// One toolbox button.
#[derive(Debug, Clone)]
pub struct ToolboxEntry<'a, T: Clone> {
    /// Value returned when the button is clicked
    pub value: T,
    /// Button label
    pub label: &'a str,
    /// Icon name, shown as the hover tooltip
    pub icon: &'a str,
}

impl<'a, T: Clone> ToolboxEntry<'a, T> {
    pub fn new(value: T, label: &'a str, icon: &'a str) -> Self {
        Self { value, label, icon }
    }
}

/// Row of toolbox buttons in entry order.
pub struct Toolbox<'a, T: Clone> {
    entries: &'a [ToolboxEntry<'a, T>],
    enabled: bool,
}

impl<'a, T: Clone> Toolbox<'a, T> {
    pub fn new(entries: &'a [ToolboxEntry<'a, T>]) -> Self {
        Self {
            entries,
            enabled: true,
        }
    }

    /// Disabled toolboxes draw greyed out and never report clicks.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Show the toolbox. Returns the value of the clicked entry, if any.
    pub fn show(self, ui: &mut Ui) -> Option<T> {
        let mut clicked = None;
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;
            for entry in self.entries {
                let button = ActionButton::new(entry.label)
                    .tooltip(entry.icon)
                    .enabled(self.enabled);
                if button.show(ui) {
                    clicked = Some(entry.value.clone());
                }
            }
        });
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbox_without_input_reports_nothing() {
        let entries = [
            ToolboxEntry::new(1, "Line", "bi-graph-up"),
            ToolboxEntry::new(2, "Bar", "bi-bar-chart"),
        ];
        let ctx = egui::Context::default();
        let mut result = Some(0);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                result = Toolbox::new(&entries).show(ui);
            });
        });
        assert_eq!(result, None);
    }
}
