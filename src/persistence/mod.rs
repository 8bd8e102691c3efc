//! Save/load helpers over platform storage
//!
//! Values are stored as JSON strings. Callers decide how to recover from a
//! [`PersistError`]; the leaderboard and settings fall back to defaults.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::platform::Storage;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("corrupt data under `{key}`: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Read and decode `key`. `Ok(None)` when nothing is stored.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, PersistError> {
    let Some(json) = storage.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|source| PersistError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Encode and write `value` under `key`
pub fn save_json<T: Serialize + ?Sized>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_missing_key_is_none() {
        let storage = MemoryStorage::new();
        let value: Option<Vec<u32>> = load_json(&storage, "nothing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_corrupt_data_is_reported() {
        let mut storage = MemoryStorage::new();
        storage.set("k", "{ not json").unwrap();
        let err = load_json::<Vec<u32>>(&storage, "k").unwrap_err();
        assert!(matches!(err, PersistError::Corrupt { ref key, .. } if key == "k"));
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        save_json(&mut storage, "k", &[1u32, 2, 3]).unwrap();
        let value: Option<Vec<u32>> = load_json(&storage, "k").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }
}
