//! Bucket names
//!
//! A bucket is a named partition of the backing store (a table, a shard).
//! The name is fixed at construction and never validated here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable bucket name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bucket {
    name: String,
}

impl Bucket {
    /// Creates a bucket from an already checked name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the raw bucket name
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for Bucket {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
