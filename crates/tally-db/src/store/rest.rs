//! PostgREST datastore client.
//!
//! Requests go to `{url}/rest/v1/{table}` with filters as `column=op.value`
//! query pairs. Every call asks for `return=representation`, so writes echo
//! the rows they touched.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use super::Datastore;
use crate::error::{DbError, Result};
use crate::query::{CompareOp, Condition, ReadQuery, Row};

/// Connection settings for a PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Base URL, e.g. `https://project.example.co`.
    pub url: String,
    /// Service key sent as both `apikey` and bearer token.
    pub service_key: String,
}

impl RestConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_key: service_key.into(),
        }
    }

    /// Endpoint for `table`.
    #[must_use]
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.url.trim_end_matches('/'))
    }
}

/// Datastore backed by a PostgREST HTTP API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    config: RestConfig,
}

impl RestStore {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub const fn with_client(client: Client, config: RestConfig) -> Self {
        Self { client, config }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.table_url(table))
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .header("Prefer", "return=representation")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<Row>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| status.to_string());
            warn!(status = %status, message = %message, "datastore request failed");
            return Err(DbError::Datastore(message));
        }
        if body.trim().is_empty() {
            return Ok(vec![]);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pulls `message` out of a PostgREST error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message")?.as_str().map(ToString::to_string)
}

/// Renders a value the way PostgREST expects it inside a filter.
#[must_use]
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// PostgREST spells the LIKE wildcard `*` and has no escape for a literal
/// `*`, so one is sent as the single-character wildcard `_`.
fn encode_like(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '%' => '*',
            '*' => '_',
            c => c,
        })
        .collect()
}

/// Encodes one condition as a `column=op.value` query pair.
#[must_use]
pub fn encode_condition(condition: &Condition) -> (String, String) {
    let filter = match condition.op {
        CompareOp::IsNull => String::from("is.null"),
        CompareOp::IsNotNull => String::from("not.is.null"),
        CompareOp::ILike => format!("ilike.{}", encode_like(&encode_value(&condition.value))),
        op => format!("{}.{}", op.postgrest_name(), encode_value(&condition.value)),
    };
    (condition.column.clone(), filter)
}

/// Encodes a read as query pairs.
#[must_use]
pub fn encode_read(query: &ReadQuery) -> Vec<(String, String)> {
    let select = query
        .columns
        .as_ref()
        .map_or_else(|| String::from("*"), |cols| cols.join(","));
    let mut pairs = vec![(String::from("select"), select)];
    pairs.extend(query.conditions.iter().map(encode_condition));
    if let Some(order) = &query.order {
        let direction = if order.is_desc() { "desc" } else { "asc" };
        pairs.push((String::from("order"), format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        pairs.push((String::from("limit"), limit.to_string()));
    }
    if let Some(offset) = query.offset {
        pairs.push((String::from("offset"), offset.to_string()));
    }
    pairs
}

fn encode_conditions(
    operation: &'static str,
    table: &str,
    conditions: &[Condition],
) -> Result<Vec<(String, String)>> {
    if conditions.is_empty() {
        return Err(DbError::UnfilteredWrite {
            operation,
            table: table.to_string(),
        });
    }
    Ok(conditions.iter().map(encode_condition).collect())
}

/// A comparison against NULL is never true, while `eq.null` would compare
/// against the text `null`. Such requests are answered locally.
fn matches_nothing(table: &str, conditions: &[Condition]) -> bool {
    let unsatisfiable = conditions.iter().any(Condition::never_matches);
    if unsatisfiable {
        debug!(table = %table, "comparison against NULL; no request sent");
    }
    unsatisfiable
}

#[async_trait]
impl Datastore for RestStore {
    async fn select(&self, query: &ReadQuery) -> Result<Vec<Row>> {
        if matches_nothing(&query.table, &query.conditions) {
            return Ok(vec![]);
        }
        let pairs = encode_read(query);
        debug!(table = %query.table, ?pairs, "GET");
        self.send(self.request(Method::GET, &query.table).query(&pairs))
            .await
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Vec<Row>> {
        debug!(table = %table, "POST");
        self.send(self.request(Method::POST, table).json(&row)).await
    }

    async fn update(&self, table: &str, values: Row, conditions: &[Condition]) -> Result<Vec<Row>> {
        let pairs = encode_conditions("update", table, conditions)?;
        if matches_nothing(table, conditions) {
            return Ok(vec![]);
        }
        debug!(table = %table, ?pairs, "PATCH");
        self.send(self.request(Method::PATCH, table).query(&pairs).json(&values))
            .await
    }

    async fn delete(&self, table: &str, conditions: &[Condition]) -> Result<Vec<Row>> {
        let pairs = encode_conditions("delete", table, conditions)?;
        if matches_nothing(table, conditions) {
            return Ok(vec![]);
        }
        debug!(table = %table, ?pairs, "DELETE");
        self.send(self.request(Method::DELETE, table).query(&pairs))
            .await
    }
}
