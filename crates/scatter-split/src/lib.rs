//! Scatter-sampled key-range splitting: partitions one kind-scoped query into
//! contiguous `__key__` ranges so independent workers can scan them in parallel.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod client;
pub mod config;
pub mod error;
pub mod key;
pub mod obs;
pub mod query;
pub mod split;
pub mod value;

///
/// CONSTANTS
///

/// Reserved pseudo-property naming the entity key in filters, orders and
/// projections. Must match the store's spelling exactly.
pub const KEY_PROPERTY_NAME: &str = "__key__";

/// Reserved pseudo-property whose ascending order yields scatter samples.
pub const SCATTER_PROPERTY_NAME: &str = "__scatter__";

/// Number of scatter samples requested per desired split boundary.
///
/// Oversampling keeps the variance of the chosen boundaries low without
/// fetching anywhere near the full keyspace.
pub const KEYS_PER_SPLIT: usize = 32;

///
/// Prelude
///
/// Prelude contains only domain vocabulary and the splitting entry points.
///

pub mod prelude {
    pub use crate::{
        client::{Entity, EntityKey, StoreClient},
        error::{SplitError, SplitNotPossibleError},
        key::{IdOrName, Key, PathElement},
        query::{CompareOp, Filter, Order, OrderDirection, Query},
        split::{QuerySplitter, get_splits},
        value::Value,
    };
}
