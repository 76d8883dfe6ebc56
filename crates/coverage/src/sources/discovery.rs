use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use tracing::{debug, warn};

use crate::error::{CoverageError, Result};

/// Keeps file names whose extension is one of a configured set.
///
/// Matching is on the exact final extension, ignoring ASCII case:
/// with the default `jpg`, `IMG_1.JPG` passes and `img_3.jpeg` does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFilter {
    extensions: Vec<String>,
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new(["jpg"])
    }
}

impl ImageFilter {
    /// Extensions may be given with or without the leading dot
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn matches(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    pub fn apply(&self, names: Vec<String>) -> Vec<String> {
        names.into_iter().filter(|name| self.matches(name)).collect()
    }
}

/// Whether the image directory could be listed at all
#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    Serialize, Deserialize,
    Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiscoveryStatus {
    Listed,
    Unavailable,
}

/// Image names found in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Names that passed the filter, in listing order
    pub images: Vec<String>,
    pub status: DiscoveryStatus,
    /// Entries seen before filtering
    pub total_entries: usize,
}

/// List the non-directory entries of `dir`, sorted by name.
///
/// Names that are not valid UTF-8 are skipped.
pub async fn list_directory(dir: &Path) -> Result<Vec<String>> {
    let unavailable = |source| CoverageError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(unavailable)?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!("Skipping non UTF-8 entry {:?}", raw),
        }
    }

    names.sort();
    Ok(names)
}

/// List and filter `dir`, treating an unreadable directory as empty
pub async fn discover_images(dir: &Path, filter: &ImageFilter) -> Discovery {
    match list_directory(dir).await {
        Ok(names) => {
            let total_entries = names.len();
            Discovery {
                images: filter.apply(names),
                status: DiscoveryStatus::Listed,
                total_entries,
            }
        }
        Err(err) => {
            warn!("{err}; continuing with no images");
            Discovery {
                images: Vec::new(),
                status: DiscoveryStatus::Unavailable,
                total_entries: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_case_insensitive_and_exact() {
        let filter = ImageFilter::default();
        assert!(filter.matches("IMG_1.JPG"));
        assert!(filter.matches("img_2.jpg"));
        assert!(!filter.matches("img_3.jpeg"));
        assert!(!filter.matches("notes.txt"));
        assert!(!filter.matches("jpg"));
        assert!(!filter.matches("archive.jpg.zip"));
    }

    #[test]
    fn test_filter_accepts_configured_extensions() {
        let filter = ImageFilter::new([".JPEG", "tif", " "]);
        assert_eq!(filter.extensions(), ["jpeg", "tif"]);
        assert!(filter.matches("a.jpeg"));
        assert!(filter.matches("b.TIF"));
        assert!(!filter.matches("c.jpg"));
    }

    #[tokio::test]
    async fn test_list_directory_sorted_files_only() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        for name in ["b.jpg", "A.JPG", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").expect("Should write file");
        }
        std::fs::create_dir(dir.path().join("nested.jpg")).expect("Should create dir");

        let names = list_directory(dir.path()).await.expect("Should list");
        assert_eq!(names, vec!["A.JPG", "b.jpg", "notes.txt"]);

        let discovery = discover_images(dir.path(), &ImageFilter::default()).await;
        assert_eq!(discovery.status, DiscoveryStatus::Listed);
        assert_eq!(discovery.total_entries, 3);
        assert_eq!(discovery.images, vec!["A.JPG", "b.jpg"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_distinguishable_but_not_fatal() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let missing = dir.path().join("does-not-exist");

        let err = list_directory(&missing).await.unwrap_err();
        assert!(matches!(err, CoverageError::DirectoryUnavailable { .. }));

        let discovery = discover_images(&missing, &ImageFilter::default()).await;
        assert!(discovery.images.is_empty());
        assert_eq!(discovery.status, DiscoveryStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_empty_directory_is_listed() {
        let dir = tempfile::tempdir().expect("Should create temp dir");

        let discovery = discover_images(dir.path(), &ImageFilter::default()).await;
        assert!(discovery.images.is_empty());
        assert_eq!(discovery.status, DiscoveryStatus::Listed);
    }
}
