//! Labeled reference image gallery

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Accepted reference image extensions
const VALID_EXTENSIONS: [&str; 3] = ["jpeg", "jpg", "png"];

/// A labeled reference image; the person id is the file stem
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub person_id: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Set of reference images loaded from a directory
#[derive(Debug, Clone, Default)]
pub struct ReferenceGallery {
    references: Vec<ReferenceImage>,
}

impl ReferenceGallery {
    /// Load every reference image from a directory
    ///
    /// Non-image entries are ignored. An empty or missing directory yields
    /// an empty gallery (no one can be matched, which is logged).
    ///
    /// # Errors
    ///
    /// Returns error if the directory exists but cannot be read
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            tracing::warn!(dir = %dir.display(), "reference image directory missing");
            return Ok(Self::default());
        }

        let mut references = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(Error::Io)? {
            let entry = entry.map_err(Error::Io)?;
            let path = entry.path();

            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    VALID_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                });
            if !is_image {
                continue;
            }

            let Some(person_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            references.push(ReferenceImage {
                person_id: person_id.to_string(),
                file_name: file_name.to_string(),
                path: path.clone(),
            });
        }

        // Deterministic scan order
        references.sort_by(|a, b| a.person_id.cmp(&b.person_id));

        if references.is_empty() {
            tracing::warn!(dir = %dir.display(), "no reference images found");
        } else {
            tracing::info!(
                dir = %dir.display(),
                count = references.len(),
                "reference gallery loaded"
            );
        }

        Ok(Self { references })
    }

    /// Iterate over the references in person-id order
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.references.iter()
    }

    /// Look up the image file name for a person
    #[must_use]
    pub fn file_name(&self, person_id: &str) -> Option<&str> {
        self.references
            .iter()
            .find(|r| r.person_id == person_id)
            .map(|r| r.file_name.as_str())
    }

    /// Number of references
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Whether the gallery is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_filters_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alice.jpg"), b"jpg").unwrap();
        std::fs::write(dir.path().join("bob.PNG"), b"png").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"txt").unwrap();

        let gallery = ReferenceGallery::load(dir.path()).unwrap();
        assert_eq!(gallery.len(), 2);

        let ids: Vec<&str> = gallery.iter().map(|r| r.person_id.as_str()).collect();
        assert_eq!(ids, vec!["alice", "bob"]);

        assert_eq!(gallery.file_name("alice"), Some("alice.jpg"));
        assert_eq!(gallery.file_name("carol"), None);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = ReferenceGallery::load(dir.path().join("nope")).unwrap();
        assert!(gallery.is_empty());
    }
}
