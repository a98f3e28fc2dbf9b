use super::error::StorageError;
use std::fmt;

/// A stored object's key, namespaced by deployment environment.
///
/// Building a key from a name that already carries the environment prefix
/// yields the same key, so re-saving or migrating a record never stacks
/// prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    environment_prefix: String,
    logical_path: String,
    path: String,
}

impl StorageKey {
    pub fn namespaced(environment_prefix: &str, name: &str) -> Result<Self, StorageError> {
        let prefix = environment_prefix.trim_matches('/');
        let name = name.trim().trim_start_matches('/');

        let logical_path = if prefix.is_empty() {
            name
        } else {
            name.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(name)
        };

        if logical_path.is_empty() || logical_path.ends_with('/') {
            return Err(StorageError::InvalidKey(format!(
                "'{}' does not name an object",
                name
            )));
        }
        if logical_path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(StorageError::InvalidKey(format!(
                "'{}' contains an empty or relative path segment",
                name
            )));
        }

        let path = if prefix.is_empty() {
            logical_path.to_string()
        } else {
            format!("{}/{}", prefix, logical_path)
        };

        Ok(Self {
            environment_prefix: prefix.to_string(),
            logical_path: logical_path.to_string(),
            path,
        })
    }

    pub fn environment_prefix(&self) -> &str {
        &self.environment_prefix
    }

    pub fn logical_path(&self) -> &str {
        &self.logical_path
    }

    /// Full object path inside the bucket or media root
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.path
    }
}
