//! Declared refetch dependencies per chart kind.
//!
//! Each chart kind lists the configuration fields its primary dataset and its
//! selection lists depend on. Controllers compare the configuration before and
//! after an update and refetch only what a changed field feeds.

use core::fmt;

use crate::graph::GraphConfig;
use crate::kind::ChartKind;
use crate::options::ChartOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TriggerField {
    Database,
    Kind,
    Asset,
    StartYear,
    EndYear,
    Year,
    Resolution,
    Carrier,
    StorageType,
    Direction,
    Level,
    Source,
    Filters,
    Breakdown,
}

impl TriggerField {
    pub const ALL: [TriggerField; 14] = [
        TriggerField::Database,
        TriggerField::Kind,
        TriggerField::Asset,
        TriggerField::StartYear,
        TriggerField::EndYear,
        TriggerField::Year,
        TriggerField::Resolution,
        TriggerField::Carrier,
        TriggerField::StorageType,
        TriggerField::Direction,
        TriggerField::Level,
        TriggerField::Source,
        TriggerField::Filters,
        TriggerField::Breakdown,
    ];

    fn differs(self, old: &GraphConfig, new: &GraphConfig) -> bool {
        let (a, b) = (&old.options, &new.options);
        match self {
            TriggerField::Database => old.graph_db_file_path != new.graph_db_file_path,
            TriggerField::Kind => old.kind != new.kind,
            TriggerField::Asset => {
                opt(a, |o| o.as_capacity().and_then(|c| c.asset.clone()))
                    != opt(b, |o| o.as_capacity().and_then(|c| c.asset.clone()))
            }
            TriggerField::StartYear => {
                opt(a, |o| o.as_capacity().and_then(|c| c.years.start))
                    != opt(b, |o| o.as_capacity().and_then(|c| c.years.start))
            }
            TriggerField::EndYear => {
                opt(a, |o| o.as_capacity().and_then(|c| c.years.end))
                    != opt(b, |o| o.as_capacity().and_then(|c| c.years.end))
            }
            TriggerField::Year => opt(a, ChartOptions::year) != opt(b, ChartOptions::year),
            TriggerField::Resolution => {
                opt(a, ChartOptions::resolution) != opt(b, ChartOptions::resolution)
            }
            TriggerField::Carrier => {
                opt(a, |o| o.carrier().map(str::to_string))
                    != opt(b, |o| o.carrier().map(str::to_string))
            }
            TriggerField::StorageType => {
                opt(a, ChartOptions::storage_type) != opt(b, ChartOptions::storage_type)
            }
            TriggerField::Direction => {
                opt(a, ChartOptions::direction) != opt(b, ChartOptions::direction)
            }
            TriggerField::Level => opt(a, ChartOptions::level) != opt(b, ChartOptions::level),
            TriggerField::Source => {
                opt(a, |o| o.source().cloned()) != opt(b, |o| o.source().cloned())
            }
            TriggerField::Filters => old.filters != new.filters,
            TriggerField::Breakdown => old.breakdown != new.breakdown,
        }
    }
}

fn opt<T>(options: &Option<ChartOptions>, read: impl Fn(&ChartOptions) -> Option<T>) -> Option<T> {
    options.as_ref().and_then(read)
}

impl fmt::Display for TriggerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Secondary lists a chart offers as selectable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SelectionList {
    AvailableAssets,
    AvailableYears,
    Carriers,
    Tables,
    Categories,
}

/// Fields the primary dataset of `kind` depends on.
pub fn dataset_triggers(kind: ChartKind) -> &'static [TriggerField] {
    use TriggerField::*;
    match kind {
        ChartKind::Capacity => &[Database, Asset, StartYear, EndYear],
        ChartKind::RawTable => &[Database, Source],
        ChartKind::SystemCosts => &[Database, Filters, Breakdown],
        ChartKind::ProductionPrices => &[Database, Year, Resolution, Carrier, Filters, Breakdown],
        ChartKind::StoragePrices => &[
            Database,
            Year,
            Resolution,
            Carrier,
            StorageType,
            Filters,
            Breakdown,
        ],
        ChartKind::TransportationPrices => &[Database, Year, Resolution, Carrier, Direction],
        ChartKind::GeoImportsExports => &[Database, Level, Year],
        ChartKind::SupplyStack => &[Database, Year, Resolution],
        ChartKind::Unrecognized => &[],
    }
}

/// Selection lists rendered by a chart of `kind`.
pub fn selection_lists(kind: ChartKind) -> &'static [SelectionList] {
    use SelectionList::*;
    match kind {
        ChartKind::Capacity => &[AvailableAssets, AvailableYears],
        ChartKind::RawTable => &[Tables],
        ChartKind::SystemCosts => &[Categories],
        ChartKind::ProductionPrices | ChartKind::StoragePrices => &[AvailableYears, Categories],
        ChartKind::TransportationPrices => &[AvailableYears, Carriers],
        ChartKind::GeoImportsExports => &[AvailableYears, Categories],
        ChartKind::SupplyStack => &[AvailableYears],
        ChartKind::Unrecognized => &[],
    }
}

/// Fields a selection list of `kind` depends on.
///
/// Capacity years are asset-scoped; every other list depends on the bound
/// database only.
pub fn selection_triggers(kind: ChartKind, list: SelectionList) -> &'static [TriggerField] {
    match (kind, list) {
        (ChartKind::Capacity, SelectionList::AvailableYears) => {
            &[TriggerField::Database, TriggerField::Asset]
        }
        _ => &[TriggerField::Database],
    }
}

/// Every field whose value differs between `old` and `new`.
pub fn changed_fields(old: &GraphConfig, new: &GraphConfig) -> Vec<TriggerField> {
    TriggerField::ALL
        .into_iter()
        .filter(|field| field.differs(old, new))
        .collect()
}

/// True when the update from `old` to `new` touches a dataset trigger.
pub fn needs_dataset_refetch(old: &GraphConfig, new: &GraphConfig) -> bool {
    if old.kind != new.kind {
        return true;
    }
    let changed = changed_fields(old, new);
    dataset_triggers(new.kind)
        .iter()
        .any(|field| changed.contains(field))
}

/// Lists of `new.kind` whose triggers changed between `old` and `new`.
pub fn stale_selection_lists(old: &GraphConfig, new: &GraphConfig) -> Vec<SelectionList> {
    let changed = changed_fields(old, new);
    let kind_changed = old.kind != new.kind;
    selection_lists(new.kind)
        .iter()
        .copied()
        .filter(|list| {
            kind_changed
                || selection_triggers(new.kind, *list)
                    .iter()
                    .any(|field| changed.contains(field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionEdit;
    use ev_core::{ContainerId, Resolution};

    fn chart(kind: ChartKind) -> GraphConfig {
        let mut g = GraphConfig::new(kind, ContainerId(0));
        g.graph_db_file_path = Some("/a.duckdb".into());
        g.options = ChartOptions::default_for(kind);
        g
    }

    fn edited(g: &GraphConfig, edit: OptionEdit) -> GraphConfig {
        let mut next = g.clone();
        if let Some(options) = next.options.as_mut() {
            options.apply(edit).unwrap();
        }
        next
    }

    #[test]
    fn every_kind_depends_on_its_database() {
        for kind in ChartKind::SELECTABLE {
            assert!(dataset_triggers(kind).contains(&TriggerField::Database));
        }
        assert!(dataset_triggers(ChartKind::Unrecognized).is_empty());
    }

    #[test]
    fn resolution_change_refetches_prices() {
        let old = chart(ChartKind::ProductionPrices);
        let new = edited(&old, OptionEdit::Resolution(Resolution::Weeks));
        assert_eq!(changed_fields(&old, &new), vec![TriggerField::Resolution]);
        assert!(needs_dataset_refetch(&old, &new));
    }

    #[test]
    fn title_change_refetches_nothing() {
        let old = chart(ChartKind::SupplyStack);
        let mut new = old.clone();
        new.title = "Renamed".into();
        assert!(changed_fields(&old, &new).is_empty());
        assert!(!needs_dataset_refetch(&old, &new));
        assert!(stale_selection_lists(&old, &new).is_empty());
    }

    #[test]
    fn filters_do_not_feed_transport_prices() {
        let old = chart(ChartKind::TransportationPrices);
        let mut new = old.clone();
        new.filters.toggle(1, 2);
        assert_eq!(changed_fields(&old, &new), vec![TriggerField::Filters]);
        assert!(!needs_dataset_refetch(&old, &new));
    }

    #[test]
    fn capacity_years_follow_the_asset() {
        let old = chart(ChartKind::Capacity);
        let new = edited(&old, OptionEdit::Asset(Some("wind_1".into())));
        assert_eq!(
            stale_selection_lists(&old, &new),
            vec![SelectionList::AvailableYears]
        );
    }

    #[test]
    fn database_change_refreshes_every_list() {
        let old = chart(ChartKind::Capacity);
        let mut new = old.clone();
        new.graph_db_file_path = Some("/b.duckdb".into());
        assert_eq!(
            stale_selection_lists(&old, &new),
            vec![SelectionList::AvailableAssets, SelectionList::AvailableYears]
        );
        assert!(needs_dataset_refetch(&old, &new));
    }
}
