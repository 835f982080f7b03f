//! Widget registry: the closed set of widget kinds and their display metadata.
//!
//! Arrangements refer to widget kinds by their string type id so that layouts
//! written by a newer build still load. Resolution therefore goes through
//! [`WidgetRegistry::resolve`], where an unknown id is an ordinary `None`.

use serde::{Deserialize, Serialize};

/// Every widget kind the dashboard knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    LineChart,
    BarChart,
    PieChart,
    DataTable,
    ProfileCard,
    Metrics,
    Calendar,
    Notifications,
    Weather,
    StockMarket,
}

impl WidgetKind {
    /// All kinds, in toolbox order.
    pub const ALL: [WidgetKind; 10] = [
        WidgetKind::LineChart,
        WidgetKind::BarChart,
        WidgetKind::PieChart,
        WidgetKind::DataTable,
        WidgetKind::ProfileCard,
        WidgetKind::Metrics,
        WidgetKind::Calendar,
        WidgetKind::Notifications,
        WidgetKind::Weather,
        WidgetKind::StockMarket,
    ];

    /// Static metadata for this kind.
    pub const fn descriptor(self) -> WidgetTypeDescriptor {
        use WidgetKind::*;
        match self {
            LineChart => WidgetTypeDescriptor::new(
                self,
                "lineChart",
                "Crypto Price Chart",
                "line-chart-widget",
                (4, 4),
                "bi-graph-up",
            ),
            BarChart => WidgetTypeDescriptor::new(
                self,
                "barChart",
                "Population Chart",
                "bar-chart-widget",
                (4, 4),
                "bi-bar-chart",
            ),
            PieChart => WidgetTypeDescriptor::new(
                self,
                "pieChart",
                "Weather Comparison",
                "pie-chart-widget",
                (4, 4),
                "bi-pie-chart",
            ),
            DataTable => WidgetTypeDescriptor::new(
                self,
                "dataTable",
                "Data Table",
                "data-table-widget",
                (6, 5),
                "bi-table",
            ),
            ProfileCard => WidgetTypeDescriptor::new(
                self,
                "profileCard",
                "User Profile",
                "profile-card-widget",
                (3, 4),
                "bi-person-circle",
            ),
            Metrics => WidgetTypeDescriptor::new(
                self,
                "metrics",
                "Crypto Market Metrics",
                "metrics-widget",
                (4, 4),
                "bi-speedometer2",
            ),
            Calendar => WidgetTypeDescriptor::new(
                self,
                "calendar",
                "Holiday Calendar",
                "calendar-widget",
                (4, 5),
                "bi-calendar-event",
            ),
            Notifications => WidgetTypeDescriptor::new(
                self,
                "notifications",
                "Notifications",
                "notifications-widget",
                (3, 4),
                "bi-bell",
            ),
            Weather => WidgetTypeDescriptor::new(
                self,
                "weather",
                "Weather Forecast",
                "weather-widget",
                (3, 4),
                "bi-cloud-sun",
            ),
            StockMarket => WidgetTypeDescriptor::new(
                self,
                "stockMarket",
                "Stock Market",
                "stock-market-widget",
                (4, 4),
                "bi-currency-dollar",
            ),
        }
    }

    /// The string id stored in persisted arrangements.
    pub const fn type_id(self) -> &'static str {
        self.descriptor().type_id
    }

    /// Look up a kind by its persisted type id.
    pub fn from_type_id(type_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_id() == type_id)
    }
}

/// Immutable display metadata for one widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetTypeDescriptor {
    pub kind: WidgetKind,
    /// Identifier used in persisted arrangements.
    pub type_id: &'static str,
    /// Header and toolbox label.
    pub title: &'static str,
    /// Component the renderer instantiates for this kind.
    pub render_target: &'static str,
    /// Width in grid columns when first added.
    pub default_width: u32,
    /// Height in grid rows when first added.
    pub default_height: u32,
    /// Icon name shown in headers and toolbox buttons.
    pub icon: &'static str,
}

impl WidgetTypeDescriptor {
    const fn new(
        kind: WidgetKind,
        type_id: &'static str,
        title: &'static str,
        render_target: &'static str,
        (default_width, default_height): (u32, u32),
        icon: &'static str,
    ) -> Self {
        Self {
            kind,
            type_id,
            title,
            render_target,
            default_width,
            default_height,
            icon,
        }
    }
}

/// A toolbox entry; clicking it adds a widget of `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxButton {
    pub kind: WidgetKind,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Registry of widget descriptors, in registration order.
#[derive(Debug, Clone)]
pub struct WidgetRegistry {
    entries: Vec<WidgetTypeDescriptor>,
}

impl WidgetRegistry {
    /// Registry containing every built-in widget kind.
    pub fn builtin() -> Self {
        Self::with_kinds(WidgetKind::ALL)
    }

    /// Registry restricted to the given kinds. Duplicates are ignored.
    pub fn with_kinds(kinds: impl IntoIterator<Item = WidgetKind>) -> Self {
        let mut entries: Vec<WidgetTypeDescriptor> = Vec::new();
        for kind in kinds {
            if !entries.iter().any(|d| d.kind == kind) {
                entries.push(kind.descriptor());
            }
        }
        Self { entries }
    }

    /// Resolve a persisted type id. `None` is expected for kinds removed in
    /// later versions.
    pub fn resolve(&self, type_id: &str) -> Option<&WidgetTypeDescriptor> {
        self.entries.iter().find(|d| d.type_id == type_id)
    }

    /// Descriptor for a kind, if it is registered.
    pub fn get(&self, kind: WidgetKind) -> Option<&WidgetTypeDescriptor> {
        self.entries.iter().find(|d| d.kind == kind)
    }

    /// All entries as `(type_id, descriptor)` pairs, in registration order.
    pub fn list_all(&self) -> impl Iterator<Item = (&'static str, &WidgetTypeDescriptor)> {
        self.entries.iter().map(|d| (d.type_id, d))
    }

    /// One toolbox button per entry.
    pub fn toolbox_buttons(&self) -> Vec<ToolboxButton> {
        self.entries
            .iter()
            .map(|d| ToolboxButton {
                kind: d.kind,
                label: d.title,
                icon: d.icon,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
