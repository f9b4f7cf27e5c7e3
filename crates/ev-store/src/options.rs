//! Kind-specific chart options.
//!
//! One variant per chart kind that has selectable settings. A configuration's
//! options always match its kind; the store resets them when the kind changes.

use core::fmt;

use ev_core::{ALL_CARRIERS, FlowDirection, Resolution, StorageType, YearRange};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::kind::ChartKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChartOptions {
    Capacity(CapacityOptions),
    RawTable(RawTableOptions),
    SystemCosts,
    ProductionPrices(PriceOptions),
    StoragePrices(StoragePriceOptions),
    TransportationPrices(TransportPriceOptions),
    GeoImportsExports(EnergyFlowOptions),
    SupplyStack(SupplyOptions),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapacityOptions {
    pub asset: Option<String>,
    /// Years are asset-scoped: they are cleared whenever the asset changes.
    #[serde(default)]
    pub years: YearRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum RawSource {
    Table(String),
    Query(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawTableOptions {
    pub source: Option<RawSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOptions {
    pub year: Option<i32>,
    pub resolution: Resolution,
    pub carrier: String,
}

impl Default for PriceOptions {
    fn default() -> Self {
        Self {
            year: None,
            resolution: Resolution::Days,
            carrier: ALL_CARRIERS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoragePriceOptions {
    #[serde(flatten)]
    pub price: PriceOptions,
    pub storage_type: StorageType,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransportPriceOptions {
    #[serde(flatten)]
    pub price: PriceOptions,
    pub direction: FlowDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnergyFlowOptions {
    /// Category level of the metadata tree (0 = finest).
    pub level: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyOptions {
    pub year: Option<i32>,
    pub resolution: Resolution,
}

impl Default for SupplyOptions {
    fn default() -> Self {
        Self {
            year: None,
            resolution: Resolution::Days,
        }
    }
}

/// First required option a configuration is still missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingOption {
    Asset,
    StartYear,
    EndYear,
    Year,
    DetailLevel,
    Source,
}

impl fmt::Display for MissingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MissingOption::Asset => "asset",
            MissingOption::StartYear => "start year",
            MissingOption::EndYear => "end year",
            MissingOption::Year => "year",
            MissingOption::DetailLevel => "detail level",
            MissingOption::Source => "table or query",
        };
        f.write_str(label)
    }
}

/// A single user selection applied to a configuration's options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEdit {
    Asset(Option<String>),
    StartYear(Option<i32>),
    EndYear(Option<i32>),
    Year(Option<i32>),
    Resolution(Resolution),
    Carrier(String),
    StorageType(StorageType),
    Direction(FlowDirection),
    Level(Option<u32>),
    Source(Option<RawSource>),
}

impl OptionEdit {
    pub fn name(&self) -> &'static str {
        match self {
            OptionEdit::Asset(_) => "asset",
            OptionEdit::StartYear(_) => "start year",
            OptionEdit::EndYear(_) => "end year",
            OptionEdit::Year(_) => "year",
            OptionEdit::Resolution(_) => "resolution",
            OptionEdit::Carrier(_) => "carrier",
            OptionEdit::StorageType(_) => "storage type",
            OptionEdit::Direction(_) => "direction",
            OptionEdit::Level(_) => "detail level",
            OptionEdit::Source(_) => "source",
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl PriceOptions {
    fn apply(&mut self, edit: OptionEdit) -> Result<bool, OptionEdit> {
        match edit {
            OptionEdit::Year(year) => Ok(replace(&mut self.year, year)),
            OptionEdit::Resolution(resolution) => Ok(replace(&mut self.resolution, resolution)),
            OptionEdit::Carrier(carrier) => Ok(replace(&mut self.carrier, carrier)),
            other => Err(other),
        }
    }
}

impl ChartOptions {
    /// Empty options for a kind, or `None` for kinds without options.
    pub fn default_for(kind: ChartKind) -> Option<Self> {
        match kind {
            ChartKind::Capacity => Some(ChartOptions::Capacity(CapacityOptions::default())),
            ChartKind::RawTable => Some(ChartOptions::RawTable(RawTableOptions::default())),
            ChartKind::SystemCosts => Some(ChartOptions::SystemCosts),
            ChartKind::ProductionPrices => {
                Some(ChartOptions::ProductionPrices(PriceOptions::default()))
            }
            ChartKind::StoragePrices => {
                Some(ChartOptions::StoragePrices(StoragePriceOptions::default()))
            }
            ChartKind::TransportationPrices => Some(ChartOptions::TransportationPrices(
                TransportPriceOptions::default(),
            )),
            ChartKind::GeoImportsExports => {
                Some(ChartOptions::GeoImportsExports(EnergyFlowOptions::default()))
            }
            ChartKind::SupplyStack => Some(ChartOptions::SupplyStack(SupplyOptions::default())),
            ChartKind::Unrecognized => None,
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartOptions::Capacity(_) => ChartKind::Capacity,
            ChartOptions::RawTable(_) => ChartKind::RawTable,
            ChartOptions::SystemCosts => ChartKind::SystemCosts,
            ChartOptions::ProductionPrices(_) => ChartKind::ProductionPrices,
            ChartOptions::StoragePrices(_) => ChartKind::StoragePrices,
            ChartOptions::TransportationPrices(_) => ChartKind::TransportationPrices,
            ChartOptions::GeoImportsExports(_) => ChartKind::GeoImportsExports,
            ChartOptions::SupplyStack(_) => ChartKind::SupplyStack,
        }
    }

    /// The first required selection that is still empty, in UI order.
    pub fn missing_requirement(&self) -> Option<MissingOption> {
        match self {
            ChartOptions::Capacity(c) => {
                if c.asset.is_none() {
                    Some(MissingOption::Asset)
                } else if c.years.start.is_none() {
                    Some(MissingOption::StartYear)
                } else if c.years.end.is_none() {
                    Some(MissingOption::EndYear)
                } else {
                    None
                }
            }
            ChartOptions::RawTable(r) => r.source.is_none().then_some(MissingOption::Source),
            ChartOptions::SystemCosts => None,
            ChartOptions::ProductionPrices(p) => p.year.is_none().then_some(MissingOption::Year),
            ChartOptions::StoragePrices(s) => {
                s.price.year.is_none().then_some(MissingOption::Year)
            }
            ChartOptions::TransportationPrices(t) => {
                t.price.year.is_none().then_some(MissingOption::Year)
            }
            ChartOptions::GeoImportsExports(g) => {
                if g.level.is_none() {
                    Some(MissingOption::DetailLevel)
                } else if g.year.is_none() {
                    Some(MissingOption::Year)
                } else {
                    None
                }
            }
            ChartOptions::SupplyStack(s) => s.year.is_none().then_some(MissingOption::Year),
        }
    }

    /// Apply one selection. Returns `Ok(false)` when the value is already set.
    pub fn apply(&mut self, edit: OptionEdit) -> StoreResult<bool> {
        let kind = self.kind();
        let name = edit.name();
        let outcome = match self {
            ChartOptions::Capacity(c) => match edit {
                OptionEdit::Asset(asset) => {
                    if c.asset == asset {
                        Ok(false)
                    } else {
                        c.asset = asset;
                        c.years.clear();
                        Ok(true)
                    }
                }
                OptionEdit::StartYear(year) => Ok(c.years.set_start(year).changed()),
                OptionEdit::EndYear(year) => Ok(c.years.set_end(year).changed()),
                other => Err(other),
            },
            ChartOptions::RawTable(r) => match edit {
                OptionEdit::Source(source) => Ok(replace(&mut r.source, source)),
                other => Err(other),
            },
            ChartOptions::SystemCosts => Err(edit),
            ChartOptions::ProductionPrices(p) => p.apply(edit),
            ChartOptions::StoragePrices(s) => match edit {
                OptionEdit::StorageType(t) => Ok(replace(&mut s.storage_type, t)),
                other => s.price.apply(other),
            },
            ChartOptions::TransportationPrices(t) => match edit {
                OptionEdit::Direction(d) => Ok(replace(&mut t.direction, d)),
                other => t.price.apply(other),
            },
            ChartOptions::GeoImportsExports(g) => match edit {
                OptionEdit::Level(level) => Ok(replace(&mut g.level, level)),
                OptionEdit::Year(year) => Ok(replace(&mut g.year, year)),
                other => Err(other),
            },
            ChartOptions::SupplyStack(s) => match edit {
                OptionEdit::Year(year) => Ok(replace(&mut s.year, year)),
                OptionEdit::Resolution(r) => Ok(replace(&mut s.resolution, r)),
                other => Err(other),
            },
        };
        outcome.map_err(|_| StoreError::EditNotApplicable { kind, edit: name })
    }

    pub fn as_capacity(&self) -> Option<&CapacityOptions> {
        match self {
            ChartOptions::Capacity(c) => Some(c),
            _ => None,
        }
    }

    pub fn resolution(&self) -> Option<Resolution> {
        match self {
            ChartOptions::ProductionPrices(p) => Some(p.resolution),
            ChartOptions::StoragePrices(s) => Some(s.price.resolution),
            ChartOptions::TransportationPrices(t) => Some(t.price.resolution),
            ChartOptions::SupplyStack(s) => Some(s.resolution),
            _ => None,
        }
    }

    pub fn carrier(&self) -> Option<&str> {
        match self {
            ChartOptions::ProductionPrices(p) => Some(&p.carrier),
            ChartOptions::StoragePrices(s) => Some(&s.price.carrier),
            ChartOptions::TransportationPrices(t) => Some(&t.price.carrier),
            _ => None,
        }
    }

    pub fn storage_type(&self) -> Option<StorageType> {
        match self {
            ChartOptions::StoragePrices(s) => Some(s.storage_type),
            _ => None,
        }
    }

    pub fn direction(&self) -> Option<FlowDirection> {
        match self {
            ChartOptions::TransportationPrices(t) => Some(t.direction),
            _ => None,
        }
    }

    pub fn level(&self) -> Option<u32> {
        match self {
            ChartOptions::GeoImportsExports(g) => g.level,
            _ => None,
        }
    }

    pub fn source(&self) -> Option<&RawSource> {
        match self {
            ChartOptions::RawTable(r) => r.source.as_ref(),
            _ => None,
        }
    }

    /// Selected year for single-year charts.
    pub fn year(&self) -> Option<i32> {
        match self {
            ChartOptions::ProductionPrices(p) => p.year,
            ChartOptions::StoragePrices(s) => s.price.year,
            ChartOptions::TransportationPrices(t) => t.price.year,
            ChartOptions::GeoImportsExports(g) => g.year,
            ChartOptions::SupplyStack(s) => s.year,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_kind() {
        for kind in ChartKind::SELECTABLE {
            let opts = ChartOptions::default_for(kind).unwrap();
            assert_eq!(opts.kind(), kind);
        }
        assert!(ChartOptions::default_for(ChartKind::Unrecognized).is_none());
    }

    #[test]
    fn capacity_requirements_in_order() {
        let mut opts = ChartOptions::default_for(ChartKind::Capacity).unwrap();
        assert_eq!(opts.missing_requirement(), Some(MissingOption::Asset));
        opts.apply(OptionEdit::Asset(Some("wind_1".into()))).unwrap();
        assert_eq!(opts.missing_requirement(), Some(MissingOption::StartYear));
        opts.apply(OptionEdit::StartYear(Some(2025))).unwrap();
        assert_eq!(opts.missing_requirement(), Some(MissingOption::EndYear));
        opts.apply(OptionEdit::EndYear(Some(2030))).unwrap();
        assert_eq!(opts.missing_requirement(), None);
    }

    #[test]
    fn changing_asset_clears_years() {
        let mut opts = ChartOptions::Capacity(CapacityOptions {
            asset: Some("wind_1".into()),
            years: YearRange::new(Some(2025), Some(2030)),
        });
        assert!(opts.apply(OptionEdit::Asset(None)).unwrap());
        let cap = opts.as_capacity().unwrap();
        assert_eq!(cap.years, YearRange::default());
    }

    #[test]
    fn same_value_is_not_a_change() {
        let mut opts = ChartOptions::default_for(ChartKind::ProductionPrices).unwrap();
        assert!(opts.apply(OptionEdit::Year(Some(2030))).unwrap());
        assert!(!opts.apply(OptionEdit::Year(Some(2030))).unwrap());
        assert!(!opts.apply(OptionEdit::Carrier("all".into())).unwrap());
    }

    #[test]
    fn foreign_edit_rejected() {
        let mut opts = ChartOptions::default_for(ChartKind::SupplyStack).unwrap();
        let err = opts.apply(OptionEdit::Asset(Some("x".into()))).unwrap_err();
        assert_eq!(
            err,
            StoreError::EditNotApplicable {
                kind: ChartKind::SupplyStack,
                edit: "asset"
            }
        );
        assert!(ChartOptions::SystemCosts.apply(OptionEdit::Year(None)).is_err());
    }

    #[test]
    fn storage_and_transport_share_price_edits() {
        let mut storage = ChartOptions::default_for(ChartKind::StoragePrices).unwrap();
        assert!(storage.apply(OptionEdit::StorageType(StorageType::Both)).unwrap());
        assert!(storage.apply(OptionEdit::Resolution(Resolution::Weeks)).unwrap());
        let mut transport = ChartOptions::default_for(ChartKind::TransportationPrices).unwrap();
        assert!(transport.apply(OptionEdit::Direction(FlowDirection::Min)).unwrap());
        assert!(transport.apply(OptionEdit::Year(Some(2050))).unwrap());
        assert_eq!(transport.year(), Some(2050));
    }

    #[test]
    fn serde_tagged_by_kind() {
        let opts = ChartOptions::GeoImportsExports(EnergyFlowOptions {
            level: Some(1),
            year: Some(2030),
        });
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["kind"], "geo-imports-exports");
        let back: ChartOptions = serde_json::from_value(json).unwrap();
        assert_eq!(back, opts);
    }
}
