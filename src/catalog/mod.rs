use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

mod bundled;
mod file;

pub use bundled::BundledCatalog;
pub use file::FileCatalog;

/// Shown for any category without an entry in [`category_icon`].
pub const DEFAULT_ICON: &str = "📁";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} not found in bundled assets")]
    MissingAsset(String),

    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(String),

    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate card id '{0}'")]
    DuplicateId(String),

    #[error("card '{0}' has an empty category")]
    EmptyCategory(String),
}

/// One vocabulary card as stored in the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardRecord {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub category: String,
    pub english: String,
    pub marathi: String,
    pub transliteration: String,
    pub first_letter: String,
    pub image_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(default)]
    pub frozen: bool,
}

// Ids appear both as JSON numbers and strings in hand-edited catalogs.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

pub trait CatalogLoader {
    fn name(&self) -> String;
    fn load(&self) -> Result<Vec<FlashcardRecord>, CatalogError>;
}

pub(crate) fn parse_records(data: &str) -> Result<Vec<FlashcardRecord>, CatalogError> {
    Ok(serde_json::from_str(data)?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub name: String,
    pub icon: &'static str,
    pub count: usize,
}

pub fn category_icon(name: &str) -> &'static str {
    match name {
        "Family" => "👨‍👩‍👧‍👦",
        "Food" => "🍎",
        "Animals" => "🦁",
        "Actions" => "🏃",
        "Nature" => "🌲",
        "Colors" => "🎨",
        "Numbers" => "🔢",
        "Body Parts" => "👤",
        "Objects" => "📦",
        _ => DEFAULT_ICON,
    }
}

/// Read-only card collection plus its category index.
///
/// The index is built once on construction; the cards never change afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    cards: Vec<FlashcardRecord>,
    categories: Vec<CategorySummary>,
}

impl Catalog {
    pub fn load(loader: &dyn CatalogLoader) -> Result<Self, CatalogError> {
        let records = loader.load()?;
        log::debug!("loaded {} cards from {}", records.len(), loader.name());
        Self::from_records(records)
    }

    pub fn from_records(cards: Vec<FlashcardRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for card in &cards {
            if card.category.trim().is_empty() {
                return Err(CatalogError::EmptyCategory(card.id.clone()));
            }
            if !seen.insert(card.id.as_str()) {
                return Err(CatalogError::DuplicateId(card.id.clone()));
            }
        }

        let categories = index_categories(&cards);
        Ok(Self { cards, categories })
    }

    pub fn cards(&self) -> &[FlashcardRecord] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Categories in order of first appearance.
    pub fn categories(&self) -> &[CategorySummary] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Cards of one category, in catalog order.
    pub fn cards_in(&self, category: &str) -> Vec<&FlashcardRecord> {
        self.cards
            .iter()
            .filter(|card| card.category == category)
            .collect()
    }
}

fn index_categories(cards: &[FlashcardRecord]) -> Vec<CategorySummary> {
    let mut categories: Vec<CategorySummary> = Vec::new();
    for card in cards {
        match categories.iter_mut().find(|c| c.name == card.category) {
            Some(summary) => summary.count += 1,
            None => categories.push(CategorySummary {
                name: card.category.clone(),
                icon: category_icon(&card.category),
                count: 1,
            }),
        }
    }
    categories
}

#[cfg(test)]
pub(crate) fn card(id: &str, category: &str, english: &str) -> FlashcardRecord {
    FlashcardRecord {
        id: id.to_string(),
        category: category.to_string(),
        english: english.to_string(),
        marathi: format!("{english}-mr"),
        transliteration: english.to_lowercase(),
        first_letter: english.chars().next().map(String::from).unwrap_or_default(),
        image_path: format!("/images/{}.png", english.to_lowercase()),
        image_prompt: None,
        frozen: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_records(vec![
            card("1", "Animals", "Tiger"),
            card("2", "Food", "Mango"),
            card("3", "Animals", "Cat"),
            card("4", "Robots", "Gear"),
            card("5", "Animals", "Dog"),
        ])
        .unwrap()
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        let catalog = sample();
        let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Animals", "Food", "Robots"]);
    }

    #[test]
    fn test_category_counts_cover_catalog() {
        let catalog = sample();
        for summary in catalog.categories() {
            let members = catalog
                .cards()
                .iter()
                .filter(|c| c.category == summary.name)
                .count();
            assert_eq!(summary.count, members);
        }
        let total: usize = catalog.categories().iter().map(|c| c.count).sum();
        assert_eq!(total, catalog.len());
    }

    #[test]
    fn test_icon_lookup_and_fallback() {
        let catalog = sample();
        assert_eq!(catalog.category("Animals").unwrap().icon, "🦁");
        assert_eq!(catalog.category("Robots").unwrap().icon, DEFAULT_ICON);
        assert_eq!(category_icon("Body Parts"), "👤");
    }

    #[test]
    fn test_cards_in_preserves_catalog_order() {
        let catalog = sample();
        let english: Vec<_> = catalog
            .cards_in("Animals")
            .iter()
            .map(|c| c.english.as_str())
            .collect();
        assert_eq!(english, vec!["Tiger", "Cat", "Dog"]);
        assert!(catalog.cards_in("Nope").is_empty());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::from_records(vec![card("7", "Food", "Rice"), card("7", "Food", "Milk")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "7"));
    }

    #[test]
    fn test_empty_category_rejected() {
        let err = Catalog::from_records(vec![card("1", "  ", "Rice")]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCategory(_)));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = Catalog::from_records(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.categories().is_empty());
    }

    #[test]
    fn test_parse_numeric_and_string_ids() {
        let data = r#"[
            {"id": 1, "category": "Food", "english": "Milk", "marathi": "दूध",
             "transliteration": "Doodh", "firstLetter": "द", "imagePath": "/images/milk.png"},
            {"id": "tea-1", "category": "Food", "english": "Tea", "marathi": "चहा",
             "transliteration": "Chaha", "firstLetter": "च", "imagePath": "images/tea.png",
             "imagePrompt": "a cup of tea", "frozen": true}
        ]"#;
        let records = parse_records(data).unwrap();
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].first_letter, "द");
        assert!(!records[0].frozen);
        assert_eq!(records[1].id, "tea-1");
        assert_eq!(records[1].image_prompt.as_deref(), Some("a cup of tea"));
        assert!(records[1].frozen);
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let data = r#"[{"id": 1, "category": "Food", "english": "Milk"}]"#;
        assert!(matches!(parse_records(data), Err(CatalogError::Json(_))));
    }
}
