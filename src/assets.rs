use crate::catalog::{Catalog, FlashcardRecord};
use std::path::{Path, PathBuf};

/// Joins `path` onto `base` with exactly one `/` between them.
pub fn resolve_asset_path(base: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{base}{path}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Thumbnail,
    Detail,
}

impl ImageSlot {
    pub fn placeholder(self) -> &'static str {
        match self {
            ImageSlot::Thumbnail => "https://via.placeholder.com/150?text=Generating...",
            ImageSlot::Detail => "https://via.placeholder.com/300?text=Image+Coming+Soon",
        }
    }
}

/// Where card images are served from and, optionally, where they live on disk.
#[derive(Debug, Clone)]
pub struct AssetLocator {
    base_path: String,
    assets_dir: Option<PathBuf>,
}

impl AssetLocator {
    pub fn new(base_path: impl Into<String>, assets_dir: Option<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            assets_dir,
        }
    }

    /// Local file backing `path`, if an assets directory is configured.
    pub fn local_file(&self, path: &str) -> Option<PathBuf> {
        let dir = self.assets_dir.as_ref()?;
        Some(dir.join(path.strip_prefix('/').unwrap_or(path)))
    }

    /// Without an assets directory every image counts as present.
    pub fn exists(&self, path: &str) -> bool {
        match self.local_file(path) {
            Some(file) => file.is_file(),
            None => true,
        }
    }

    /// Resolved path, or the slot's placeholder when the image is missing.
    pub fn image_src(&self, path: &str, slot: ImageSlot) -> String {
        if path.is_empty() || !self.exists(path) {
            log::debug!("image '{}' missing, using placeholder", path);
            return slot.placeholder().to_string();
        }
        resolve_asset_path(&self.base_path, path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Present,
    Frozen,
    Missing,
}

#[derive(Debug, Clone)]
pub struct ImageEntry<'a> {
    pub card: &'a FlashcardRecord,
    pub file: PathBuf,
    pub status: ImageStatus,
}

/// Frozen cards are reported as such whether or not their file exists.
pub fn image_report<'a>(catalog: &'a Catalog, assets_dir: &Path) -> Vec<ImageEntry<'a>> {
    catalog
        .cards()
        .iter()
        .map(|card| {
            let file = assets_dir.join(card.image_path.trim_start_matches('/'));
            let status = if card.frozen {
                ImageStatus::Frozen
            } else if file.is_file() {
                ImageStatus::Present
            } else {
                ImageStatus::Missing
            };
            ImageEntry { card, file, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::card;
    use std::fs;

    #[test]
    fn test_resolve_adds_separator() {
        assert_eq!(resolve_asset_path("/app", "images/cat.png"), "/app/images/cat.png");
    }

    #[test]
    fn test_resolve_strips_leading_separator() {
        assert_eq!(resolve_asset_path("/app/", "/images/cat.png"), "/app/images/cat.png");
    }

    #[test]
    fn test_resolve_empty_path() {
        assert_eq!(resolve_asset_path("", ""), "");
        assert_eq!(resolve_asset_path("/app", ""), "");
    }

    #[test]
    fn test_resolve_empty_base_is_root() {
        assert_eq!(resolve_asset_path("", "images/cat.png"), "/images/cat.png");
        assert_eq!(resolve_asset_path("/", "/images/cat.png"), "/images/cat.png");
    }

    #[test]
    fn test_image_src_without_assets_dir() {
        let locator = AssetLocator::new("/app", None);
        assert_eq!(
            locator.image_src("/images/cat.png", ImageSlot::Detail),
            "/app/images/cat.png"
        );
        assert_eq!(
            locator.image_src("", ImageSlot::Thumbnail),
            ImageSlot::Thumbnail.placeholder()
        );
    }

    #[test]
    fn test_image_src_falls_back_per_slot() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/cat.png"), b"png").unwrap();
        let locator = AssetLocator::new("/", Some(dir.path().to_path_buf()));

        assert_eq!(
            locator.image_src("/images/cat.png", ImageSlot::Thumbnail),
            "/images/cat.png"
        );
        assert_eq!(
            locator.image_src("/images/dog.png", ImageSlot::Thumbnail),
            ImageSlot::Thumbnail.placeholder()
        );
        assert_eq!(
            locator.image_src("/images/dog.png", ImageSlot::Detail),
            ImageSlot::Detail.placeholder()
        );
        assert_ne!(ImageSlot::Thumbnail.placeholder(), ImageSlot::Detail.placeholder());
    }

    #[test]
    fn test_image_report_statuses() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/tiger.png"), b"png").unwrap();

        let mut frozen = card("3", "Animals", "Dog");
        frozen.frozen = true;
        let catalog = Catalog::from_records(vec![
            card("1", "Animals", "Tiger"),
            card("2", "Animals", "Cat"),
            frozen,
        ])
        .unwrap();

        let statuses: Vec<_> = image_report(&catalog, dir.path())
            .iter()
            .map(|e| e.status)
            .collect();
        assert_eq!(
            statuses,
            vec![ImageStatus::Present, ImageStatus::Missing, ImageStatus::Frozen]
        );
    }
}
