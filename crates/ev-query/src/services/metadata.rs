//! Assets, tables and the metadata category tree.

use serde::{Deserialize, Serialize};

use super::{call_db, strings};
use crate::error::QueryResult;
use crate::gateway::TableGateway;
use crate::table::Row;

pub fn get_assets(gateway: &dyn TableGateway, db_path: &str) -> QueryResult<Vec<String>> {
    let rows = call_db(gateway, "get_assets", db_path)?;
    strings(&rows, "asset")
}

pub fn get_tables(gateway: &dyn TableGateway, db_path: &str) -> QueryResult<Vec<String>> {
    let rows = call_db(gateway, "get_tables", db_path)?;
    strings(&rows, "name")
}

/// One node of the metadata category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    /// Distance from the leaves; 0 is the finest level.
    pub level: u32,
}

impl Category {
    fn from_row(row: &Row) -> QueryResult<Self> {
        let level = row.get_opt_i32("level")?.unwrap_or(0).max(0);
        Ok(Self {
            id: row.get_i32("id")?,
            name: row.get_str("name")?.to_string(),
            parent_id: row.get_opt_i32("parent_id")?,
            level: level as u32,
        })
    }
}

pub fn get_categories(gateway: &dyn TableGateway, db_path: &str) -> QueryResult<Vec<Category>> {
    let rows = call_db(gateway, "get_categories", db_path)?;
    rows.iter().map(Category::from_row).collect()
}

/// A category with its children, as shown in the filter picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterNode {
    pub category: Category,
    pub children: Vec<FilterNode>,
}

impl FilterNode {
    /// Ids of this node and all of its descendants.
    pub fn ids(&self) -> Vec<i32> {
        let mut out = vec![self.category.id];
        for child in &self.children {
            out.extend(child.ids());
        }
        out
    }
}

/// Arrange flat categories into trees rooted at the parentless ones.
///
/// Categories whose parent is missing from `categories` are treated as roots.
/// Siblings are sorted by name.
pub fn build_filter_tree(categories: &[Category]) -> Vec<FilterNode> {
    let known = |id: i32| categories.iter().any(|c| c.id == id);
    let mut roots: Vec<FilterNode> = categories
        .iter()
        .filter(|c| c.parent_id.is_none_or(|p| !known(p) || p == c.id))
        .map(|c| subtree(c, categories, 0))
        .collect();
    roots.sort_by(|a, b| a.category.name.cmp(&b.category.name));
    roots
}

fn subtree(root: &Category, all: &[Category], depth: usize) -> FilterNode {
    let mut children: Vec<FilterNode> = if depth >= all.len() {
        Vec::new()
    } else {
        all.iter()
            .filter(|c| c.parent_id == Some(root.id) && c.id != root.id)
            .map(|c| subtree(c, all, depth + 1))
            .collect()
    };
    children.sort_by(|a, b| a.category.name.cmp(&b.category.name));
    FilterNode {
        category: root.clone(),
        children,
    }
}

/// Categories at one detail level, sorted by name.
pub fn categories_at_level(categories: &[Category], level: u32) -> Vec<Category> {
    let mut out: Vec<Category> = categories
        .iter()
        .filter(|c| c.level == level)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Distinct levels present, ascending.
pub fn levels(categories: &[Category]) -> Vec<u32> {
    let mut out: Vec<u32> = categories.iter().map(|c| c.level).collect();
    out.sort_unstable();
    out.dedup();
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn every_category_appears_once(parents in prop::collection::vec(prop::option::of(0usize..20), 1..20)) {
            // Parents only point at earlier ids, so the input is always a forest.
            let cats: Vec<Category> = parents
                .iter()
                .enumerate()
                .map(|(i, p)| Category {
                    id: i as i32,
                    name: format!("c{i}"),
                    parent_id: p.filter(|p| *p < i).map(|p| p as i32),
                    level: 0,
                })
                .collect();
            let mut ids: Vec<i32> = build_filter_tree(&cats).iter().flat_map(FilterNode::ids).collect();
            ids.sort_unstable();
            let expected: Vec<i32> = (0..cats.len() as i32).collect();
            prop_assert_eq!(ids, expected);
        }
    }
}
