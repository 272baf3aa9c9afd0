use tracing::{debug, info};

use crate::{
    config::ClickHouseConfig,
    error::{PageseedError, Result},
    types::PageEvent,
    writer::EventSink,
};

/// Column list of the insert, in `PageEvent` field order
pub const COLUMNS: [&str; 7] = ["id", "user_id", "event_type", "url", "referrer", "ts", "meta"];

/// Build the insert statement sent with every batch
pub fn insert_query(table: &str) -> String {
    format!(
        "INSERT INTO {table} ({}) FORMAT JSONEachRow",
        COLUMNS.join(", ")
    )
}

/// Encode events as newline-delimited JSON objects, one per row
pub fn encode_rows(events: &[PageEvent]) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(events.len() * 320);
    for event in events {
        serde_json::to_writer(&mut body, event)?;
        body.push(b'\n');
    }
    Ok(body)
}

/// Bulk-insert client for the ClickHouse HTTP interface
pub struct ClickHouseClient {
    http: reqwest::Client,
    config: ClickHouseConfig,
    table: String,
    query: String,
}

impl ClickHouseClient {
    pub fn new(config: ClickHouseConfig, table: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self::with_http(http, config, table))
    }

    pub fn with_http(
        http: reqwest::Client,
        config: ClickHouseConfig,
        table: impl Into<String>,
    ) -> Self {
        let table = table.into();
        info!(
            endpoint = %config.endpoint(),
            database = %config.database,
            table = %table,
            "using ClickHouse"
        );
        Self {
            query: insert_query(&table),
            http,
            config,
            table,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Check the server is reachable before generating anything
    pub async fn ping(&self) -> Result<()> {
        let endpoint = self.config.endpoint();
        let response = self.http.get(format!("{endpoint}ping")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PageseedError::NotReady {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl EventSink for ClickHouseClient {
    async fn insert_batch(&mut self, events: &[PageEvent]) -> Result<()> {
        let body = encode_rows(events)?;
        debug!(rows = events.len(), bytes = body.len(), "sending insert");

        let response = self
            .http
            .post(self.config.endpoint())
            .query(&[
                ("database", self.config.database.as_str()),
                ("query", self.query.as_str()),
            ])
            .header("X-ClickHouse-User", &self.config.user)
            .header("X-ClickHouse-Key", &self.config.password)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageseedError::InsertRejected {
                table: self.table.clone(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default().trim().to_string(),
            });
        }

        Ok(())
    }
}
