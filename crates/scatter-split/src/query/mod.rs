//! Module: query
//! Responsibility: immutable query values read and derived by the splitter.
//! Does not own: execution, which belongs to the store client.

#[cfg(test)]
mod tests;

use crate::{KEY_PROPERTY_NAME, key::Key, value::Value};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum CompareOp {
    #[display("<")]
    Lt,
    #[display("<=")]
    Lte,
    #[display("=")]
    Eq,
    #[display(">")]
    Gt,
    #[display(">=")]
    Gte,
}

impl CompareOp {
    #[must_use]
    pub const fn is_inequality(self) -> bool {
        !matches!(self, Self::Eq)
    }
}

///
/// Filter
///
/// One `(property, op, value)` conjunct of a query.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[display("{property} {op} {value}")]
pub struct Filter {
    pub property: String,
    pub op: CompareOp,
    pub value: Value,
}

impl Filter {
    #[must_use]
    pub fn new(property: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self {
            property: property.into(),
            op,
            value: value.into(),
        }
    }

    /// `__key__ >= key`
    #[must_use]
    pub fn key_gte(key: Key) -> Self {
        Self::new(KEY_PROPERTY_NAME, CompareOp::Gte, key)
    }

    /// `__key__ < key`
    #[must_use]
    pub fn key_lt(key: Key) -> Self {
        Self::new(KEY_PROPERTY_NAME, CompareOp::Lt, key)
    }

    #[must_use]
    pub fn is_key_filter(&self) -> bool {
        self.property == KEY_PROPERTY_NAME
    }
}

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

///
/// Order
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Order {
    pub property: String,
    pub direction: OrderDirection,
}

impl Order {
    #[must_use]
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: OrderDirection::Asc,
        }
    }

    #[must_use]
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: OrderDirection::Desc,
        }
    }
}

///
/// Query
///
/// Declarative, kind-scoped query value.
///
/// Builder methods consume and return `Self`; nothing here validates or
/// executes. A query names at most one kind by construction.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Query {
    pub kind: Option<String>,
    pub project: Option<String>,
    pub namespace: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub projection: Vec<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Query {
    /// Create an empty query with no kind restriction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty query over one kind.
    #[must_use]
    pub fn for_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Append a filter conjunct.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Append an ascending sort key.
    #[must_use]
    pub fn order_by(mut self, property: impl Into<String>) -> Self {
        self.order.push(Order::asc(property));
        self
    }

    /// Append a descending sort key.
    #[must_use]
    pub fn order_by_desc(mut self, property: impl Into<String>) -> Self {
        self.order.push(Order::desc(property));
        self
    }

    /// Append a projected property.
    #[must_use]
    pub fn project_property(mut self, property: impl Into<String>) -> Self {
        self.projection.push(property.into());
        self
    }

    /// Set or replace the result limit.
    #[must_use]
    pub const fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Set or replace the result offset.
    #[must_use]
    pub const fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    /// Inclusive lower `__key__` bound, if the query carries one.
    #[must_use]
    pub fn key_lower_bound(&self) -> Option<&Key> {
        self.key_bound(CompareOp::Gte)
    }

    /// Exclusive upper `__key__` bound, if the query carries one.
    #[must_use]
    pub fn key_upper_bound(&self) -> Option<&Key> {
        self.key_bound(CompareOp::Lt)
    }

    /// Iterate the filters that are not `__key__` filters.
    pub fn property_filters(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter().filter(|f| !f.is_key_filter())
    }

    fn key_bound(&self, op: CompareOp) -> Option<&Key> {
        self.filters
            .iter()
            .rev()
            .find(|f| f.is_key_filter() && f.op == op)
            .and_then(|f| f.value.as_key())
    }
}
