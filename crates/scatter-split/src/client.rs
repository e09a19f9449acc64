//! Store-client boundary.
//!
//! The splitter never speaks the store protocol itself; it hands one query to
//! a `StoreClient` and reads keys off whatever comes back.

use crate::{key::Key, query::Query, value::Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// EntityKey
///
/// Anything returned by a store that exposes its entity key.
///

pub trait EntityKey {
    fn key(&self) -> &Key;
}

impl EntityKey for Key {
    fn key(&self) -> &Key {
        self
    }
}

///
/// Entity
///
/// Plain keyed record as returned by a full (non keys-only) query.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Entity {
    pub key: Key,
    pub properties: BTreeMap<String, Value>,
}

impl Entity {
    #[must_use]
    pub const fn new(key: Key) -> Self {
        Self {
            key,
            properties: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

impl EntityKey for Entity {
    fn key(&self) -> &Key {
        &self.key
    }
}

///
/// StoreClient
///
/// Synchronous "run this query, return its entities" handle.
/// Retries, timeouts and transport errors are the implementor's concern;
/// the splitter surfaces `Self::Error` unchanged.
///

pub trait StoreClient {
    type Entity: EntityKey;
    type Error;

    fn run_query(&self, query: &Query) -> Result<Vec<Self::Entity>, Self::Error>;
}

impl<C: StoreClient + ?Sized> StoreClient for &C {
    type Entity = C::Entity;
    type Error = C::Error;

    fn run_query(&self, query: &Query) -> Result<Vec<Self::Entity>, Self::Error> {
        (**self).run_query(query)
    }
}
