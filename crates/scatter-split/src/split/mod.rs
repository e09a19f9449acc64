//! Module: split
//! Responsibility: scatter-sampled partitioning of one query into contiguous
//! `__key__` ranges.
//! Does not own: query execution; one scatter query is delegated to the
//! injected `StoreClient` and everything after that is in-memory.


use crate::{
    KEY_PROPERTY_NAME, KEYS_PER_SPLIT, SCATTER_PROPERTY_NAME,
    client::{EntityKey, StoreClient},
    config::{ConfigError, SplitterConfig},
    error::{SplitError, SplitNotPossibleError},
    key::{Key, sort_keys},
    obs::{MetricsEvent, MetricsSink, NoopSink},
    query::{Filter, Order, Query},
};
use std::{fmt, sync::Arc};
use tracing::{debug, trace};

/// Build the scatter query whose results sample the keyspace of `query`.
///
/// The scatter query keeps the kind and partition (project, namespace) of `query`,
/// orders by the scatter pseudo-property, projects only keys, and asks for
/// `(num_splits - 1) * KEYS_PER_SPLIT` samples.
#[must_use]
pub fn create_scatter_query(query: &Query, num_splits: usize) -> Query {
    scatter_query(query, num_splits, KEYS_PER_SPLIT)
}

/// Split `query` into at most `num_splits` contiguous key ranges using the
/// default configuration.
pub fn get_splits<C: StoreClient>(
    client: &C,
    query: &Query,
    num_splits: usize,
) -> Result<Vec<Query>, SplitError<C::Error>> {
    QuerySplitter::default().get_splits(client, query, num_splits)
}

///
/// QuerySplitter
///
/// Configured splitter. Holds no per-call state, so one instance can serve
/// concurrent callers.
///

pub struct QuerySplitter {
    config: SplitterConfig,
    sink: Arc<dyn MetricsSink + Send + Sync>,
}

impl QuerySplitter {
    /// Build a splitter from `config`, rejecting values `from_toml_str`
    /// would reject.
    pub fn new(config: SplitterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            sink: Arc::new(NoopSink),
        })
    }

    /// Route split telemetry into `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn MetricsSink + Send + Sync>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Scatter query using the configured `keys_per_split`.
    #[must_use]
    pub fn create_scatter_query(&self, query: &Query, num_splits: usize) -> Query {
        scatter_query(query, num_splits, self.config.keys_per_split)
    }

    /// Check that `query` can be split `num_splits` ways.
    ///
    /// Offsets are always rejected: an offset applied per split would skip
    /// rows in every range. Strict mode also rejects what the store cannot
    /// combine with a `__key__` inequality.
    pub fn validate(&self, query: &Query, num_splits: usize) -> Result<(), SplitNotPossibleError> {
        if num_splits < 2 {
            return Err(SplitNotPossibleError::NumSplits { num_splits });
        }
        if query.offset.is_some() {
            return Err(SplitNotPossibleError::Offset);
        }

        if self.config.strict {
            if query.limit.is_some() {
                return Err(SplitNotPossibleError::Limit);
            }
            if !query.order.is_empty() {
                return Err(SplitNotPossibleError::SortOrder);
            }
            if let Some(filter) = query.filters.iter().find(|f| f.op.is_inequality()) {
                return Err(SplitNotPossibleError::InequalityFilter {
                    property: filter.property.clone(),
                });
            }
        }

        Ok(())
    }

    /// Sample the keyspace of `query` through `client` and split it into at
    /// most `num_splits` contiguous key ranges.
    ///
    /// Exactly one query is sent to the client. When the store returns no
    /// samples the result is `[query]`, unsplit.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(kind = query.kind.as_deref(), num_splits = num_splits)
    )]
    pub fn get_splits<C: StoreClient>(
        &self,
        client: &C,
        query: &Query,
        num_splits: usize,
    ) -> Result<Vec<Query>, SplitError<C::Error>> {
        self.check(query, num_splits)?;

        let scatter = self.create_scatter_query(query, num_splits);
        self.sink.record(MetricsEvent::ScatterIssued {
            limit: scatter.limit.unwrap_or_default(),
        });
        debug!(limit = scatter.limit, "issuing scatter query");

        let entities = client.run_query(&scatter).map_err(|err| {
            debug!(error = std::any::type_name::<C::Error>(), "scatter query failed");
            SplitError::Fetch(err)
        })?;
        let keys = entities.iter().map(|entity| entity.key().clone()).collect();

        Ok(self.partition(query, num_splits, keys))
    }

    /// Split `query` using an already-fetched sample of keys in any order.
    pub fn split_with_keys(
        &self,
        query: &Query,
        num_splits: usize,
        keys: Vec<Key>,
    ) -> Result<Vec<Query>, SplitNotPossibleError> {
        self.check(query, num_splits)?;

        Ok(self.partition(query, num_splits, keys))
    }

    fn check(&self, query: &Query, num_splits: usize) -> Result<(), SplitNotPossibleError> {
        self.validate(query, num_splits).inspect_err(|err| {
            self.sink.record(MetricsEvent::SplitRejected);
            debug!(%err, "split rejected");
        })
    }

    fn partition(&self, query: &Query, num_splits: usize, mut keys: Vec<Key>) -> Vec<Query> {
        let samples = keys.len();
        self.sink.record(MetricsEvent::SampleReceived { samples });

        if keys.is_empty() {
            trace!("scatter query returned no samples, keeping query unsplit");
            self.sink.record(MetricsEvent::SplitsEmitted {
                requested: num_splits,
                realized: 1,
            });

            return vec![query.clone()];
        }

        sort_keys(&mut keys);
        let boundaries = select_boundaries(keys, num_splits);
        let splits = build_splits(query, boundaries);

        debug!(samples, realized = splits.len(), "split query");
        self.sink.record(MetricsEvent::SplitsEmitted {
            requested: num_splits,
            realized: splits.len(),
        });

        splits
    }
}

impl Default for QuerySplitter {
    fn default() -> Self {
        Self {
            config: SplitterConfig::default(),
            sink: Arc::new(NoopSink),
        }
    }
}

impl fmt::Debug for QuerySplitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySplitter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn scatter_query(query: &Query, num_splits: usize, keys_per_split: usize) -> Query {
    Query {
        kind: query.kind.clone(),
        project: query.project.clone(),
        namespace: query.namespace.clone(),
        filters: Vec::new(),
        order: vec![Order::asc(SCATTER_PROPERTY_NAME)],
        projection: vec![KEY_PROPERTY_NAME.to_string()],
        limit: Some(num_splits.saturating_sub(1).saturating_mul(keys_per_split)),
        offset: None,
    }
}

/// Pick at most `num_splits - 1` boundary keys from a sorted sample.
///
/// A sample no larger than the number of wanted boundaries is used whole.
/// Otherwise the sample is cut into `num_splits` equal buckets and the last
/// key of each of the first `num_splits - 1` buckets becomes a boundary.
/// Consecutive equal boundaries collapse into one.
pub(crate) fn select_boundaries(sorted: Vec<Key>, num_splits: usize) -> Vec<Key> {
    let wanted = num_splits.saturating_sub(1);
    let samples = sorted.len();

    let mut boundaries = if samples <= wanted {
        sorted
    } else {
        // samples >= num_splits, so every index is in 0..samples and strictly increasing
        (1..=wanted)
            .map(|k| sorted[k * (samples + 1) / num_splits - 1].clone())
            .collect()
    };
    boundaries.dedup();

    boundaries
}

// [< b0], [>= b0, < b1], ..., [>= bn]
fn build_splits(query: &Query, boundaries: Vec<Key>) -> Vec<Query> {
    let mut splits = Vec::with_capacity(boundaries.len() + 1);
    let mut lower = None;

    for upper in boundaries {
        splits.push(create_split(query, lower.take(), Some(upper.clone())));
        lower = Some(upper);
    }
    splits.push(create_split(query, lower, None));

    splits
}

fn create_split(query: &Query, lower: Option<Key>, upper: Option<Key>) -> Query {
    let mut split = query.clone();

    if let Some(lower) = lower {
        split.filters.push(Filter::key_gte(lower));
    }
    if let Some(upper) = upper {
        split.filters.push(Filter::key_lt(upper));
    }

    split
}
