use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

/// Logged-in admin profile, cleared on logout and on 401.
pub const USER_KEY: &str = "user";

pub const CART_KEY: &str = "cart";

pub const WISHLIST_KEY: &str = "wishlist";

/// String keys mapped to JSON strings, one `<key>.json` file per key when
/// file-backed.
pub struct LocalStore {
    dir: Option<PathBuf>,
    memory: Mutex<HashMap<String, String>>,
}

impl LocalStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory: {}", dir.display()))?;
        Ok(Self {
            dir: Some(dir),
            memory: Mutex::new(HashMap::new()),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            dir: None,
            memory: Mutex::new(HashMap::new()),
        }
    }

    fn item_path(&self, key: &str) -> Result<Option<PathBuf>> {
        // Keys become file names
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            bail!("Invalid store key: {:?}", key);
        }
        Ok(self.dir.as_ref().map(|dir| dir.join(format!("{}.json", key))))
    }

    fn memory(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.memory
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self.item_path(key)? {
            Some(path) => {
                if !path.exists() {
                    return Ok(None);
                }
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read store item: {}", key))?;
                Ok(Some(contents))
            }
            None => Ok(self.memory().get(key).cloned()),
        }
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        match self.item_path(key)? {
            Some(path) => std::fs::write(&path, value)
                .with_context(|| format!("Failed to write store item: {}", key))?,
            None => {
                self.memory().insert(key.to_string(), value.to_string());
            }
        }
        debug!(key = key, "Stored item");
        Ok(())
    }

    /// Remove an item. Removing a missing key is not an error.
    pub fn remove_item(&self, key: &str) -> Result<()> {
        match self.item_path(key)? {
            Some(path) => {
                if path.exists() {
                    std::fs::remove_file(&path)
                        .with_context(|| format!("Failed to remove store item: {}", key))?;
                }
            }
            None => {
                self.memory().remove(key);
            }
        }
        debug!(key = key, "Removed item");
        Ok(())
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_item(key)? {
            Some(contents) => {
                let value = serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse store item: {}", key))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let contents = serde_json::to_string_pretty(value)?;
        self.set_item(key, &contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        email: String,
        name: String,
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "glowcart-store-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_in_memory_items() {
        let store = LocalStore::in_memory();
        assert_eq!(store.get_item(USER_KEY).unwrap(), None);

        store.set_item(USER_KEY, r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(
            store.get_item(USER_KEY).unwrap().as_deref(),
            Some(r#"{"email":"a@b.c"}"#)
        );

        store.remove_item(USER_KEY).unwrap();
        assert_eq!(store.get_item(USER_KEY).unwrap(), None);
        // Removing twice is fine
        store.remove_item(USER_KEY).unwrap();
    }

    #[test]
    fn test_file_backed_typed_round_trip() {
        let dir = temp_dir("typed");
        let store = LocalStore::new(dir.clone()).unwrap();
        let profile = Profile {
            email: "admin@glowcart.test".to_string(),
            name: "Admin".to_string(),
        };
        store.save(USER_KEY, &profile).unwrap();
        assert!(dir.join("user.json").exists());

        let reopened = LocalStore::new(dir.clone()).unwrap();
        assert_eq!(reopened.load::<Profile>(USER_KEY).unwrap(), Some(profile));

        reopened.remove_item(USER_KEY).unwrap();
        assert!(!dir.join("user.json").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let store = LocalStore::in_memory();
        assert!(store.set_item("../escape", "x").is_err());
        assert!(store.get_item("").is_err());
    }

    #[test]
    fn test_load_corrupt_item_errors() {
        let store = LocalStore::in_memory();
        store.set_item(CART_KEY, "not json").unwrap();
        assert!(store.load::<Profile>(CART_KEY).is_err());
    }
}
