//! Shared key generation for storage backends.
//!
//! Key format: `<prefix>/<random>.<extension>` where `<random>` is unpadded
//! URL-safe base64 of 16 random bytes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tubely_core::constants::OBJECT_KEY_RANDOM_BYTES;

use crate::{StorageError, StorageResult};

/// Generate a collision-resistant object key under `prefix`.
pub fn generate_object_key(prefix: &str, extension: &str) -> String {
    // ThreadRng is a CSPRNG
    let bytes: [u8; OBJECT_KEY_RANDOM_BYTES] = rand::random();
    format!(
        "{}/{}.{}",
        prefix.trim_matches('/'),
        URL_SAFE_NO_PAD.encode(bytes),
        extension
    )
}

/// Reject keys that could escape a backend's namespace.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_format() {
        let key = generate_object_key("landscape", "mp4");
        let (prefix, file) = key.split_once('/').unwrap();
        assert_eq!(prefix, "landscape");

        let stem = file.strip_suffix(".mp4").unwrap();
        // 16 bytes -> 22 unpadded base64 characters
        assert_eq!(stem.len(), 22);
        assert!(stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert!(!key.contains('='));
        assert!(validate_key(&key).is_ok());
    }

    #[test]
    fn test_no_collisions_over_many_generations() {
        let keys: HashSet<String> = (0..10_000)
            .map(|_| generate_object_key("other", "mp4"))
            .collect();
        assert_eq!(keys.len(), 10_000);
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(matches!(
            validate_key("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            validate_key("/etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
    }
}
