//! Class table mapping folder names to YOLO class IDs.
//!
//! The order of names is significant: a class's position is its ID, and the
//! manifest lists classes in that order.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::error::PrepError;

/// Class names used when no explicit list is given.
pub const DEFAULT_CLASSES: [&str; 3] = ["Fito", "Monilia", "Sana"];

/// A YOLO class identifier (dense, 0-based).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ClassId(pub usize);

impl ClassId {
    /// Returns the underlying index.
    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered class name → ID table.
///
/// IDs always form the sequence `0..len()`. Names are non-empty, unique, and
/// usable as a single path component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassMap {
    names: Vec<String>,
}

impl ClassMap {
    /// Build a class map from names in ID order.
    pub fn new<I, S>(names: I) -> Result<Self, PrepError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        if names.is_empty() {
            return Err(PrepError::InvalidClassMap {
                message: "at least one class is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for name in &names {
            if name.trim().is_empty() {
                return Err(PrepError::InvalidClassMap {
                    message: "class names must not be empty".to_string(),
                });
            }
            if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
                return Err(PrepError::InvalidClassMap {
                    message: format!("class name '{}' is not a plain directory name", name),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(PrepError::InvalidClassMap {
                    message: format!("duplicate class name '{}'", name),
                });
            }
        }

        Ok(Self { names })
    }

    /// Number of configured classes (the manifest's `nc`).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the map holds no classes.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(id, name)` pairs in ascending ID order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (ClassId(i), name.as_str()))
    }

    /// Class names in ID order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for ClassMap {
    fn default() -> Self {
        Self {
            names: DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_dense_and_ordered() {
        let map = ClassMap::default();
        let pairs: Vec<(usize, &str)> = map.iter().map(|(id, n)| (id.as_usize(), n)).collect();
        assert_eq!(pairs, vec![(0, "Fito"), (1, "Monilia"), (2, "Sana")]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn ids_follow_configured_order() {
        let map = ClassMap::new(["dog", "cat"]).expect("valid map");
        let ids: Vec<ClassId> = map.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![ClassId(0), ClassId(1)]);
        assert_eq!(map.names(), ["dog".to_string(), "cat".to_string()]);
        assert!(!map.is_empty());
    }

    #[test]
    fn rejects_duplicates_and_empty_names() {
        assert!(matches!(
            ClassMap::new(["a", "a"]),
            Err(PrepError::InvalidClassMap { .. })
        ));
        assert!(matches!(
            ClassMap::new(["a", " "]),
            Err(PrepError::InvalidClassMap { .. })
        ));
        assert!(matches!(
            ClassMap::new(Vec::<String>::new()),
            Err(PrepError::InvalidClassMap { .. })
        ));
    }

    #[test]
    fn rejects_path_like_names() {
        let err = ClassMap::new(["ok", "nested/dir"]).unwrap_err();
        assert!(err.to_string().contains("nested/dir"));
        assert!(ClassMap::new([".."]).is_err());
    }
}
