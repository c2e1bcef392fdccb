//! Saving and restoring the showtime index
//!
//! Only the descending order is written, as a JSON array of movies. Restoring
//! re-inserts that array back to front, so every movie has a count no lower
//! than the ones inserted before it and goes right. The restored tree is a
//! chain down the right side: same traversal, different shape.

use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use super::ShowtimeIndex;
use crate::data::MovieRecord;

/// Errors that can occur when saving the index
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Failed to write index file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize index: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ShowtimeIndex {
    /// Writes the movies in descending order to `path`, replacing the file
    ///
    /// Only `name`, `link` and `showing` are written; counts are recomputed
    /// on restore.
    ///
    /// # Arguments
    /// * `path` - Destination file; missing parent directories are created
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation, serialization or file writing fails
    pub fn persist(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let records: Vec<&MovieRecord> = self.iter_descending().collect();
        fs::write(path, serde_json::to_string(&records)?)?;

        debug!(path = %path.display(), movies = records.len(), "Saved showtime index");
        Ok(())
    }

    /// Rebuilds an index from a file written by [`ShowtimeIndex::persist`]
    ///
    /// The descending traversal of the result equals the one that was saved,
    /// ties included. The tree shape is not kept.
    ///
    /// # Arguments
    /// * `path` - File to read
    ///
    /// # Returns
    /// * The restored index
    /// * An empty index if the file is missing or unparsable
    pub fn restore(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No saved index");
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<MovieRecord>>(&content) {
            Ok(records) => Self::from_records(records.into_iter().rev()),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Saved index is unreadable");
                Self::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::movie;
    use tempfile::TempDir;

    fn sample() -> ShowtimeIndex {
        ShowtimeIndex::from_records(
            [("a", 3), ("b", 1), ("c", 4), ("d", 1), ("e", 5), ("f", 4)]
                .into_iter()
                .map(|(name, count)| movie(name, count)),
        )
    }

    #[test]
    fn test_round_trip_keeps_descending_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        let index = sample();

        index.persist(&path).unwrap();
        let restored = ShowtimeIndex::restore(&path);

        assert_eq!(restored.len(), index.len());
        assert!(restored.iter_descending().eq(index.iter_descending()));
    }

    #[test]
    fn test_restore_loses_shape() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        let index = ShowtimeIndex::from_records(
            [("b", 3), ("a", 1), ("d", 6), ("c", 2), ("e", 9)]
                .into_iter()
                .map(|(name, count)| movie(name, count)),
        );
        assert_eq!(index.height(), 3);

        index.persist(&path).unwrap();
        let restored = ShowtimeIndex::restore(&path);

        // lowest count becomes the root, each node's only child is on the right
        assert_eq!(restored.height(), restored.len());
        assert!(restored.nodes.iter().all(|node| node.left.is_none()));
        assert_eq!(restored.nodes[restored.root.unwrap()].record.name, "a");
        assert!(restored.iter_descending().eq(index.iter_descending()));
    }

    #[test]
    fn test_restore_keeps_tie_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        let index = ShowtimeIndex::from_records([movie("x", 4), movie("y", 4), movie("z", 1)]);

        index.persist(&path).unwrap();
        let restored = ShowtimeIndex::restore(&path);

        let names = |index: &ShowtimeIndex| -> Vec<String> {
            index.iter_descending().map(|m| m.name.clone()).collect()
        };
        assert_eq!(names(&index), vec!["y", "x", "z"]);
        assert_eq!(names(&restored), names(&index));
        assert!(restored.nodes.iter().all(|node| node.left.is_none()));
    }

    #[test]
    fn test_restore_twice_is_stable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        let index = sample();

        index.persist(&path).unwrap();
        let once = ShowtimeIndex::restore(&path);
        once.persist(&path).unwrap();
        let twice = ShowtimeIndex::restore(&path);

        assert!(twice.iter_descending().eq(index.iter_descending()));
    }

    #[test]
    fn test_persisted_file_is_flat_descending_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("tree.json");

        ShowtimeIndex::from_records([movie("low", 1), movie("high", 2)])
            .persist(&path)
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["name"], "high");
        assert_eq!(array[1]["name"], "low");
        assert_eq!(array[0]["showing"][0]["type"], "Standard");
        assert!(array[0].get("showtime_count").is_none());
    }

    #[test]
    fn test_restore_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        let restored = ShowtimeIndex::restore(&temp_dir.path().join("missing.json"));

        assert_eq!(restored.len(), 0);
        assert_eq!(restored.iter_descending().count(), 0);
    }

    #[test]
    fn test_restore_corrupt_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");
        fs::write(&path, r#"{"name": "not an array"}"#).unwrap();

        assert!(ShowtimeIndex::restore(&path).is_empty());
    }

    #[test]
    fn test_persist_empty_index() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tree.json");

        ShowtimeIndex::new().persist(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(ShowtimeIndex::restore(&path).is_empty());
    }
}
