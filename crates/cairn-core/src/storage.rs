use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// JSON key-value persistence under the app state directory.
///
/// Each key is one file (`<dir>/<key>.json`). This backs the persisted
/// session, the calendar reference, and the activity templates.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Open the default store in the user's config directory.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("cairn");
        Self::at(dir)
    }

    /// Open a store rooted at the given directory, creating it if needed.
    pub fn at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context("Failed to create state directory")?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Serialize and write a value under a key.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.path_for(key);

        let json = serde_json::to_string_pretty(value)
            .context("Failed to serialize state")?;

        fs::write(&path, &json).context("Failed to write state file")?;

        tracing::debug!("Saved state for key: {} at {:?}", key, path);
        Ok(())
    }

    /// Read a value back, or `None` if the key was never saved.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.path_for(key);

        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).context("Failed to read state file")?;

        let value: T =
            serde_json::from_str(&json).context("Failed to deserialize state")?;

        Ok(Some(value))
    }

    /// Delete a key. Missing keys are not an error.
    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);

        if path.exists() {
            fs::remove_file(&path).context("Failed to delete state file")?;
            tracing::debug!("Deleted state for key: {}", key);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::at(tmp.path()).unwrap();

        let sample = Sample {
            name: "run".to_string(),
            count: 3,
        };
        store.save("sample", &sample).unwrap();

        let loaded: Sample = store.load("sample").unwrap().unwrap();
        assert_eq!(loaded, sample);
    }

    #[test]
    fn test_load_missing_key_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::at(tmp.path()).unwrap();

        let loaded: Option<Sample> = store.load("nope").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = StateStore::at(tmp.path()).unwrap();

        store.save("sample", &Sample { name: "x".into(), count: 1 }).unwrap();
        store.delete("sample").unwrap();
        store.delete("sample").unwrap();

        let loaded: Option<Sample> = store.load("sample").unwrap();
        assert!(loaded.is_none());
    }
}
