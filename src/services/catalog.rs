// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Static food catalog: loading, detail lookup and paginated search.

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{FoodInfo, FoodRecord, FoodSummary, Lang};

/// Region filter value meaning "every region".
pub const ALL_REGIONS: &str = "all";

/// Read-only catalog kept in dataset file order.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    entries: Vec<(String, FoodRecord)>,
    index: HashMap<String, usize>,
}

/// Search filters and page request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub text: String,
    pub region: String,
    pub lang: Lang,
    /// 1-indexed; clamped into range
    pub page: i64,
    pub per_page: usize,
}

/// Pagination metadata for a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub foods: Vec<FoodSummary>,
    pub pagination: Pagination,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON object keyed by food name.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let raw: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(json_data).map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let mut entries = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let record: FoodRecord = serde_json::from_value(value).map_err(|e| {
                CatalogError::InvalidEntry {
                    name: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            entries.push((name, record));
        }

        let index: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();

        for (name, record) in &entries {
            for related in &record.related {
                if !index.contains_key(related) {
                    tracing::warn!(food = %name, related = %related, "Dangling related reference");
                }
            }
        }

        tracing::info!(count = entries.len(), "Loaded food catalog");
        Ok(Self { entries, index })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Food names in dataset order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FoodRecord> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Localized detail for an exact food name.
    pub fn info(&self, name: &str, lang: Lang) -> Option<FoodInfo> {
        self.get(name).map(|record| record.localize(name, lang))
    }

    /// Filter by region and text, then return the requested page.
    ///
    /// The page number is clamped into `[1, total_pages]`, and there is always
    /// at least one (possibly empty) page.
    pub fn search(&self, query: &SearchQuery) -> SearchPage {
        let needle = query.text.trim().to_lowercase();
        let per_page = query.per_page.max(1);

        let matches: Vec<FoodSummary> = self
            .entries
            .iter()
            .filter(|(_, record)| query.region == ALL_REGIONS || record.region == query.region)
            .map(|(name, record)| FoodSummary {
                id: name.clone(),
                info: record.localize(name, query.lang),
            })
            .filter(|food| {
                needle.is_empty()
                    || food.id.to_lowercase().contains(&needle)
                    || food.info.description.to_lowercase().contains(&needle)
            })
            .collect();

        let total = matches.len();
        let total_pages = total.div_ceil(per_page).max(1);
        let page = query.page.clamp(1, total_pages as i64) as usize;

        let foods = matches
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        SearchPage {
            foods,
            pagination: Pagination {
                page,
                per_page,
                total,
                total_pages,
                has_next: page < total_pages,
                has_prev: page > 1,
            },
        }
    }
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(String),

    #[error("Invalid catalog entry {name}: {reason}")]
    InvalidEntry { name: String, reason: String },
}
