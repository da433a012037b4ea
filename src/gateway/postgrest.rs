use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use super::{Filter, Order, Row, TableGateway};
use crate::error::{Error, Result};

/// Gateway over a PostgREST-style hosted backend (Supabase and friends).
///
/// Filters become `column=op.value` query parameters, ordering becomes the
/// `order` parameter, and writes ask for `return=representation` so the
/// stored row comes back in the response body.
pub struct PostgrestGateway {
    client: Client,
    base_url: String,
}

impl PostgrestGateway {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| Error::Gateway("API key is not a valid header value".into()))?;
        bearer.set_sensitive(true);
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| Error::Gateway("API key is not a valid header value".into()))?;
        key.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("apikey", key);

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn params(filters: &[Filter], order: &[Order]) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = filters
            .iter()
            .map(|f| {
                (
                    f.column.clone(),
                    format!("{}.{}", f.op.as_str(), literal(&f.value)),
                )
            })
            .collect();

        if !order.is_empty() {
            let keys: Vec<String> = order
                .iter()
                .map(|o| {
                    format!(
                        "{}.{}",
                        o.column,
                        if o.ascending { "asc" } else { "desc" }
                    )
                })
                .collect();
            params.push(("order".into(), keys.join(",")));
        }

        params
    }
}

/// Renders a filter value the way PostgREST expects it on the query string:
/// strings bare, everything else in JSON form.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turns a non-success response into `Error::Gateway`, preserving the
/// backend's own message where one is present.
async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error_description"))
                .or_else(|| v.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("backend returned {status}"));

    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound);
    }
    Err(Error::Gateway(message))
}

#[async_trait]
impl TableGateway for PostgrestGateway {
    async fn select(&self, table: &str, filters: &[Filter], order: &[Order]) -> Result<Vec<Row>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&Self::params(filters, order))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    async fn select_one(&self, table: &str, filters: &[Filter]) -> Result<Row> {
        let rows = self.select(table, filters, &[]).await?;
        match rows.len() {
            0 => Err(Error::NotFound),
            1 => Ok(rows.into_iter().next().unwrap()),
            n => Err(Error::Gateway(format!("expected a single row, got {n}"))),
        }
    }

    async fn select_maybe_one(&self, table: &str, filters: &[Filter]) -> Result<Option<Row>> {
        let mut rows = self.select(table, filters, &[]).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(Error::Gateway(format!("expected at most one row, got {n}"))),
        }
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&Value::Object(row))
            .send()
            .await?;
        let mut rows: Vec<Row> = ensure_success(response).await?.json().await?;
        rows.pop()
            .ok_or_else(|| Error::Gateway("insert returned no representation".into()))
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Row> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(&Self::params(filters, &[]))
            .header("Prefer", "return=representation")
            .json(&Value::Object(patch))
            .send()
            .await?;
        let mut rows: Vec<Row> = ensure_success(response).await?.json().await?;
        rows.pop().ok_or(Error::NotFound)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<()> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(&Self::params(filters, &[]))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn params_render_postgrest_operators() {
        let params = PostgrestGateway::params(
            &[
                Filter::eq("employee_id", "e-1"),
                Filter::gte("date", "2025-01-01"),
                Filter::lt("date", "2025-02-01"),
            ],
            &[Order::desc("year"), Order::desc("month")],
        );

        assert_eq!(
            params,
            vec![
                ("employee_id".to_string(), "eq.e-1".to_string()),
                ("date".to_string(), "gte.2025-01-01".to_string()),
                ("date".to_string(), "lt.2025-02-01".to_string()),
                ("order".to_string(), "year.desc,month.desc".to_string()),
            ]
        );
    }

    #[test]
    fn literals_keep_strings_bare() {
        assert_eq!(literal(&json!("abc")), "abc");
        assert_eq!(literal(&json!(12)), "12");
        assert_eq!(literal(&json!(true)), "true");
    }
}
