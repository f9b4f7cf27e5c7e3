//! The closed set of chart kinds.

use core::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Capacity,
    RawTable,
    SystemCosts,
    ProductionPrices,
    StoragePrices,
    TransportationPrices,
    GeoImportsExports,
    SupplyStack,
    /// Fallback for kind names this build does not know.
    #[serde(other)]
    Unrecognized,
}

impl ChartKind {
    /// Every kind a user can pick when creating a chart.
    pub const SELECTABLE: [ChartKind; 8] = [
        ChartKind::Capacity,
        ChartKind::RawTable,
        ChartKind::SystemCosts,
        ChartKind::ProductionPrices,
        ChartKind::StoragePrices,
        ChartKind::TransportationPrices,
        ChartKind::GeoImportsExports,
        ChartKind::SupplyStack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Capacity => "capacity",
            ChartKind::RawTable => "raw-table",
            ChartKind::SystemCosts => "system-costs",
            ChartKind::ProductionPrices => "production-prices",
            ChartKind::StoragePrices => "storage-prices",
            ChartKind::TransportationPrices => "transportation-prices",
            ChartKind::GeoImportsExports => "geo-imports-exports",
            ChartKind::SupplyStack => "supply-stack",
            ChartKind::Unrecognized => "unrecognized",
        }
    }

    /// Parse a kind name; unknown names map to [`ChartKind::Unrecognized`].
    pub fn from_name(name: &str) -> Self {
        Self::SELECTABLE
            .into_iter()
            .find(|k| k.name() == name.trim())
            .unwrap_or(ChartKind::Unrecognized)
    }

    /// Title given to a freshly created chart, e.g. "Capacity Chart".
    pub fn default_title(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => format!("{}{} Chart", first.to_ascii_uppercase(), chars.as_str()),
            None => "Chart".to_string(),
        }
    }

    pub fn is_recognized(self) -> bool {
        self != ChartKind::Unrecognized
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
