use super::{parse_records, CatalogError, CatalogLoader, FlashcardRecord};
use include_dir::{include_dir, Dir, File};

static ASSETS_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

const CATALOG_FILE: &str = "flashcards.json";

/// The catalog compiled into the binary.
#[derive(Debug, Clone)]
pub struct BundledCatalog;

impl CatalogLoader for BundledCatalog {
    fn name(&self) -> String {
        format!("bundled {}", CATALOG_FILE)
    }

    fn load(&self) -> Result<Vec<FlashcardRecord>, CatalogError> {
        let catalog_file: &File = ASSETS_DIR
            .get_file(CATALOG_FILE)
            .ok_or_else(|| CatalogError::MissingAsset(CATALOG_FILE.to_string()))?;

        let data = catalog_file
            .contents_utf8()
            .ok_or_else(|| CatalogError::InvalidUtf8(CATALOG_FILE.to_string()))?;

        parse_records(data)
    }
}
