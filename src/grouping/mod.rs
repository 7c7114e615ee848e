//! Grouping module - partition projected records by category label

use crate::data::ProjectedRecord;
use crate::error::{AmuError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Number of records carrying one category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Category label to records, keys in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clusters {
    groups: IndexMap<String, Vec<ProjectedRecord>>,
}

impl Clusters {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&[ProjectedRecord]> {
        self.groups.get(category).map(Vec::as_slice)
    }

    /// Category labels in first-seen order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ProjectedRecord])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Per-category record counts, in key order
    pub fn counts(&self) -> Vec<CategoryCount> {
        self.groups
            .iter()
            .map(|(category, records)| CategoryCount {
                category: category.clone(),
                count: records.len(),
            })
            .collect()
    }

    /// Total number of grouped records
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Group records by exact (case-sensitive) category label.
///
/// Every record lands in exactly one cluster, keeping its relative order.
/// A record without a category fails with [`AmuError::MissingField`].
pub fn group_by_category(records: &[ProjectedRecord]) -> Result<Clusters> {
    let mut groups: IndexMap<String, Vec<ProjectedRecord>> = IndexMap::new();
    for record in records {
        let category = record.category().ok_or_else(|| AmuError::MissingField {
            record: record.name().to_string(),
            field: "category",
        })?;
        groups
            .entry(category.to_string())
            .or_default()
            .push(record.clone());
    }

    tracing::debug!(clusters = groups.len(), records = records.len(), "Grouped records by category");
    Ok(Clusters { groups })
}
