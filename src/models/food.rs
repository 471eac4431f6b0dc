// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food catalog entries and their localized projections.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Response language. `VN` selects the Vietnamese fields; any other code
/// selects English.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Lang {
    #[default]
    Vn,
    En,
}

impl Lang {
    pub fn from_code(code: &str) -> Self {
        if code == "VN" {
            Lang::Vn
        } else {
            Lang::En
        }
    }
}

impl From<String> for Lang {
    fn from(code: String) -> Self {
        Lang::from_code(&code)
    }
}

/// A food entry as stored in the dataset, keyed by its Vietnamese name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRecord {
    /// Region code (e.g. "north", "central", "south", "nationwide")
    pub region: String,
    #[serde(default)]
    pub name_en: Option<String>,
    pub description_vn: String,
    #[serde(default)]
    pub description_en: Option<String>,
    pub ingredients_vn: String,
    #[serde(default)]
    pub ingredients_en: Option<String>,
    /// Keys of similar foods in the same dataset
    #[serde(default)]
    pub related: Vec<String>,
}

impl FoodRecord {
    /// Project this record into `lang`, falling back to Vietnamese for
    /// missing English fields.
    pub fn localize(&self, key: &str, lang: Lang) -> FoodInfo {
        match lang {
            Lang::Vn => FoodInfo {
                name: key.to_string(),
                region: self.region.clone(),
                description: self.description_vn.clone(),
                ingredients: self.ingredients_vn.clone(),
                related: self.related.clone(),
            },
            Lang::En => FoodInfo {
                name: self.name_en.clone().unwrap_or_else(|| key.to_string()),
                region: self.region.clone(),
                description: self
                    .description_en
                    .clone()
                    .unwrap_or_else(|| self.description_vn.clone()),
                ingredients: self
                    .ingredients_en
                    .clone()
                    .unwrap_or_else(|| self.ingredients_vn.clone()),
                related: self.related.clone(),
            },
        }
    }
}

/// Localized view of a food entry returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodInfo {
    pub name: String,
    pub region: String,
    pub description: String,
    pub ingredients: String,
    pub related: Vec<String>,
}

/// Search result row: the catalog key plus its localized view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodSummary {
    pub id: String,
    #[serde(flatten)]
    pub info: FoodInfo,
}
