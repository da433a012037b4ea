//! Access layer for the hosted table-oriented backend.
//!
//! Every service talks to storage exclusively through [`TableGateway`]:
//! equality/range filters ANDed together, ordering applied in sequence, and
//! single-row expectations spelled out per call. [`PostgrestGateway`] is the
//! production implementation; [`MemoryGateway`] backs tests and demo mode.

pub mod memory;
pub mod postgrest;

pub use memory::MemoryGateway;
pub use postgrest::PostgrestGateway;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// One storage row: column name to JSON value, snake_case column names.
pub type Row = serde_json::Map<String, Value>;

/// Builds a [`Row`] from a `serde_json::json!` object literal.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    Lt,
}

impl FilterOp {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gte => "gte",
            FilterOp::Lte => "lte",
            FilterOp::Lt => "lt",
        }
    }
}

/// A single column predicate; a filter list is ANDed together.
#[derive(Debug, Clone)]
pub struct Filter {
    pub column: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    fn new(column: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Eq, value)
    }

    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Gte, value)
    }

    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Lte, value)
    }

    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, FilterOp::Lt, value)
    }
}

/// One ordering key; a list is applied in sequence.
#[derive(Debug, Clone)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// Request/response contract with the hosted backend, one method per
/// operation shape the services use. Transport and backend errors surface
/// as [`crate::Error::Gateway`] / [`crate::Error::Transport`] and are
/// propagated to callers unchanged.
#[async_trait]
pub trait TableGateway: Send + Sync {
    async fn select(&self, table: &str, filters: &[Filter], order: &[Order]) -> Result<Vec<Row>>;

    /// Exactly one row: `NotFound` when nothing matches, a gateway error
    /// when the filters match more than one row.
    async fn select_one(&self, table: &str, filters: &[Filter]) -> Result<Row>;

    /// At most one row; more than one match is a gateway error.
    async fn select_maybe_one(&self, table: &str, filters: &[Filter]) -> Result<Option<Row>>;

    /// Inserts and returns the stored row (id and created_at assigned by
    /// the backend).
    async fn insert(&self, table: &str, row: Row) -> Result<Row>;

    /// Patches every matching row and returns the updated record;
    /// `NotFound` when nothing matches.
    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Row>;

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()>;
}
