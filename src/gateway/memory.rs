use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::{Filter, FilterOp, Order, Row, TableGateway};
use crate::error::{Error, Result};

/// In-process stand-in for the hosted backend, used by the test suite and
/// by demo mode. Mints uuid-v4 ids and `created_at` timestamps on insert
/// and mirrors the hosted backend's single-row semantics.
#[derive(Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn matching(rows: &[Row], filters: &[Filter]) -> Vec<Row> {
        rows.iter()
            .filter(|row| filters.iter().all(|f| matches(row, f)))
            .cloned()
            .collect()
    }
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let actual = row.get(&filter.column).unwrap_or(&Value::Null);
    match filter.op {
        FilterOp::Eq => {
            actual == &filter.value
                || compare(actual, &filter.value) == Some(Ordering::Equal)
        }
        FilterOp::Gte => matches!(
            compare(actual, &filter.value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        FilterOp::Lte => matches!(
            compare(actual, &filter.value),
            Some(Ordering::Less | Ordering::Equal)
        ),
        FilterOp::Lt => compare(actual, &filter.value) == Some(Ordering::Less),
    }
}

/// Numbers compare numerically, strings lexically (ISO dates and rfc3339
/// timestamps order correctly that way). Anything else is incomparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn sort(rows: &mut [Row], order: &[Order]) {
    rows.sort_by(|a, b| {
        for key in order {
            let left = a.get(&key.column).unwrap_or(&Value::Null);
            let right = b.get(&key.column).unwrap_or(&Value::Null);
            let ord = compare(left, right).unwrap_or(Ordering::Equal);
            let ord = if key.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl TableGateway for MemoryGateway {
    async fn select(&self, table: &str, filters: &[Filter], order: &[Order]) -> Result<Vec<Row>> {
        let tables = self.tables.read().unwrap();
        let mut rows = tables
            .get(table)
            .map(|rows| Self::matching(rows, filters))
            .unwrap_or_default();
        sort(&mut rows, order);
        Ok(rows)
    }

    async fn select_one(&self, table: &str, filters: &[Filter]) -> Result<Row> {
        let rows = self.select(table, filters, &[]).await?;
        match rows.len() {
            0 => Err(Error::NotFound),
            1 => Ok(rows.into_iter().next().unwrap()),
            n => Err(Error::Gateway(format!(
                "expected a single row, got {n}"
            ))),
        }
    }

    async fn select_maybe_one(&self, table: &str, filters: &[Filter]) -> Result<Option<Row>> {
        let mut rows = self.select(table, filters, &[]).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(Error::Gateway(format!(
                "expected at most one row, got {n}"
            ))),
        }
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row> {
        if !row.contains_key("id") {
            row.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
        }
        if !row.contains_key("created_at") {
            row.insert("created_at".into(), Value::String(Utc::now().to_rfc3339()));
        }

        let mut tables = self.tables.write().unwrap();
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Row> {
        let mut tables = self.tables.write().unwrap();
        let rows = tables.entry(table.to_string()).or_default();

        let mut updated = None;
        for row in rows.iter_mut() {
            if filters.iter().all(|f| matches(row, f)) {
                for (column, value) in &patch {
                    row.insert(column.clone(), value.clone());
                }
                if updated.is_none() {
                    updated = Some(row.clone());
                }
            }
        }

        updated.ok_or(Error::NotFound)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()> {
        let mut tables = self.tables.write().unwrap();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !filters.iter().all(|f| matches(row, f)));
        }
        Ok(())
    }
}
