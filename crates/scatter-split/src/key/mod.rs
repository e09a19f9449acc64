//! Module: key
//! Responsibility: hierarchical entity keys and their total store order.
//! Does not own: key allocation or encoding; keys arrive from the store client.

#[cfg(test)]
mod tests;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};
use thiserror::Error as ThisError;

///
/// KeyError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum KeyError {
    #[error("key path must contain at least one element")]
    EmptyPath,
}

///
/// IdOrName
///
/// Identifier of one path element: a store-allocated integer id or a
/// caller-chosen name. Any `Id` orders before any `Name`.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum IdOrName {
    #[display("{_0}")]
    Id(i64),
    #[display("'{_0}'")]
    Name(String),
}

impl IdOrName {
    // ── Variant ranks (do not reorder) ────────────────
    const RANK_ID: u8 = 0;
    const RANK_NAME: u8 = 1;

    const fn variant_rank(&self) -> u8 {
        match self {
            Self::Id(_) => Self::RANK_ID,
            Self::Name(_) => Self::RANK_NAME,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Name(_) => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Name(name) => Some(name.as_str()),
        }
    }
}

impl Ord for IdOrName {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Id(a), Self::Id(b)) => Ord::cmp(a, b),
            (Self::Name(a), Self::Name(b)) => Ord::cmp(a, b),

            _ => Ord::cmp(&self.variant_rank(), &other.variant_rank()),
        }
    }
}

impl PartialOrd for IdOrName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl From<i64> for IdOrName {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for IdOrName {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for IdOrName {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

///
/// PathElement
///
/// One `(kind, id_or_name)` segment of a key path.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[display("{kind}({id_or_name})")]
pub struct PathElement {
    pub kind: String,
    pub id_or_name: IdOrName,
}

impl PathElement {
    #[must_use]
    pub fn new(kind: impl Into<String>, id_or_name: impl Into<IdOrName>) -> Self {
        Self {
            kind: kind.into(),
            id_or_name: id_or_name.into(),
        }
    }
}

impl Ord for PathElement {
    fn cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.id_or_name.cmp(&other.id_or_name))
    }
}

impl PartialOrd for PathElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

///
/// Key
///
/// Complete, immutable entity key: project, optional namespace, and a
/// root-first path that always holds at least one element.
///
/// Ordering follows the store's key order: project, then namespace (absent
/// sorts as empty), then path element by element. An ancestor sorts before
/// all of its descendants.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "KeyRepr")]
pub struct Key {
    project: String,
    namespace: Option<String>,
    path: Vec<PathElement>,
}

// Wire shape of `Key`; decoding goes through `TryFrom` so the path is never empty.
#[derive(Deserialize)]
struct KeyRepr {
    project: String,
    namespace: Option<String>,
    path: Vec<PathElement>,
}

impl TryFrom<KeyRepr> for Key {
    type Error = KeyError;

    fn try_from(repr: KeyRepr) -> Result<Self, Self::Error> {
        if repr.path.is_empty() {
            return Err(KeyError::EmptyPath);
        }

        Ok(Self {
            project: repr.project,
            namespace: repr.namespace,
            path: repr.path,
        })
    }
}

impl Key {
    /// Build a root key with no namespace.
    #[must_use]
    pub fn new(
        project: impl Into<String>,
        kind: impl Into<String>,
        id_or_name: impl Into<IdOrName>,
    ) -> Self {
        Self {
            project: project.into(),
            namespace: None,
            path: vec![PathElement::new(kind, id_or_name)],
        }
    }

    /// Return a copy of this key scoped to `namespace`.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Build a descendant key one level below `self`.
    #[must_use]
    pub fn child(&self, kind: impl Into<String>, id_or_name: impl Into<IdOrName>) -> Self {
        let mut path = self.path.clone();
        path.push(PathElement::new(kind, id_or_name));

        Self {
            project: self.project.clone(),
            namespace: self.namespace.clone(),
            path,
        }
    }

    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[must_use]
    pub fn path(&self) -> &[PathElement] {
        &self.path
    }

    /// Kind of the last path element.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.leaf().kind.as_str()
    }

    /// Identifier of the last path element.
    #[must_use]
    pub fn id_or_name(&self) -> &IdOrName {
        &self.leaf().id_or_name
    }

    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.path.len() < 2 {
            return None;
        }

        Some(Self {
            project: self.project.clone(),
            namespace: self.namespace.clone(),
            path: self.path[..self.path.len() - 1].to_vec(),
        })
    }

    /// True when `self` is a strict ancestor of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.project == other.project
            && self.namespace == other.namespace
            && self.path.len() < other.path.len()
            && other.path.starts_with(&self.path)
    }

    fn leaf(&self) -> &PathElement {
        // path is never empty: constructors seed one element, decoding rejects none
        &self.path[self.path.len() - 1]
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.project
            .cmp(&other.project)
            .then_with(|| {
                let lhs = self.namespace.as_deref().unwrap_or_default();
                let rhs = other.namespace.as_deref().unwrap_or_default();
                lhs.cmp(rhs)
            })
            // slice Ord is lexicographic with prefix-first, i.e. ancestor-first
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(Ord::cmp(self, other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.project)?;
        if let Some(namespace) = &self.namespace {
            write!(f, "/{namespace}")?;
        }
        for element in &self.path {
            write!(f, "/{element}")?;
        }

        Ok(())
    }
}

/// Compare two keys in store order.
#[must_use]
pub fn compare_keys(lhs: &Key, rhs: &Key) -> Ordering {
    Ord::cmp(lhs, rhs)
}

/// Stable in-place sort into store order; equal keys keep their relative order.
pub fn sort_keys(keys: &mut [Key]) {
    keys.sort_by(compare_keys);
}
