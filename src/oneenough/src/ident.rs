//! Namespaced identifier model.
//!
//! Identifiers are the canonical `namespace:id` pairs the game uses to refer
//! to blocks, items, and fluids. Both parts are lowercase `[a-z0-9_.-]+`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentError {
    #[error("identifier '{0}' is missing a ':' separator")]
    MissingSeparator(String),

    #[error("identifier '{0}' has an empty namespace or id")]
    EmptyPart(String),

    #[error("identifier '{0}' contains characters outside [a-z0-9_.-]")]
    InvalidCharacters(String),
}

/// A `namespace:id` pair.
///
/// Equality and ordering follow the canonical string form, so sorting a list
/// of identifiers matches sorting their `to_string()` values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespacedId {
    pub namespace: String,
    pub id: String,
}

impl NamespacedId {
    /// Build an identifier, validating both parts.
    pub fn new(namespace: &str, id: &str) -> Result<Self, IdentError> {
        let canonical = format!("{namespace}:{id}");
        if namespace.is_empty() || id.is_empty() {
            return Err(IdentError::EmptyPart(canonical));
        }
        if !is_valid_part(namespace) || !is_valid_part(id) {
            return Err(IdentError::InvalidCharacters(canonical));
        }
        Ok(NamespacedId {
            namespace: namespace.to_string(),
            id: id.to_string(),
        })
    }

    /// The canonical `namespace:id` form.
    pub fn canonical(&self) -> String {
        format!("{}:{}", self.namespace, self.id)
    }
}

/// Valid identifier characters: lowercase alphanumerics plus `_`, `.`, `-`.
fn is_valid_part(part: &str) -> bool {
    part.bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'.' | b'-'))
}

impl fmt::Display for NamespacedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.id)
    }
}

impl FromStr for NamespacedId {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, id) = s
            .split_once(':')
            .ok_or_else(|| IdentError::MissingSeparator(s.to_string()))?;
        NamespacedId::new(namespace, id)
    }
}

impl Ord for NamespacedId {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare the canonical forms without allocating them.
        let lhs = self.namespace.bytes().chain([b':']).chain(self.id.bytes());
        let rhs = other
            .namespace
            .bytes()
            .chain([b':'])
            .chain(other.id.bytes());
        lhs.cmp(rhs)
    }
}

impl PartialOrd for NamespacedId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
