use super::{parse_records, CatalogError, CatalogLoader, FlashcardRecord};
use std::path::PathBuf;

/// A catalog read from disk, same schema as the bundled one.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogLoader for FileCatalog {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<FlashcardRecord>, CatalogError> {
        let data = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_records(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::io::Write;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 9, "category": "Colors", "english": "Red", "marathi": "लाल",
                "transliteration": "Laal", "firstLetter": "ल", "imagePath": "/images/red.png"}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(&FileCatalog::new(file.path())).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.categories()[0].name, "Colors");
        assert_eq!(catalog.categories()[0].icon, "🎨");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = FileCatalog::new(&path).load().unwrap_err();
        match err {
            CatalogError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
