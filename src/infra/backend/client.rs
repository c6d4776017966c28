use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::debug;
use work_tracker_rollup::fetch::auth::ApiKey;
use work_tracker_rollup::fetch::{BasicClient, HttpClient};
use work_tracker_rollup::parser::parse_rows;
use work_tracker_rollup::records::Row;

use crate::infra::config::TableConfig;
use crate::services::record_source::{RecordKind, RecordSource};

type AuthedClient = ApiKey<ApiKey<BasicClient>>;

/// Reads tables through the backend's REST gateway (`/rest/v1/<table>`).
pub struct BackendClient {
    base_url: String,
    http: AuthedClient,
    tables: TableConfig,
}

impl BackendClient {
    pub fn new(base_url: &str, api_key: &str, tables: TableConfig) -> Result<Self> {
        let basic = BasicClient::with_timeouts()?;
        let http = ApiKey::new(ApiKey::bearer(basic, api_key)?, "apikey", api_key)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            tables,
        })
    }

    /// Builds a client from `BACKEND_API_KEY`.
    pub fn from_env(base_url: &str, tables: TableConfig) -> Result<Self> {
        let api_key = std::env::var("BACKEND_API_KEY").context("BACKEND_API_KEY must be set")?;
        Self::new(base_url, &api_key, tables)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}?select=*", self.base_url, table)
    }
}

#[async_trait]
impl RecordSource for BackendClient {
    async fn load(&self, kind: RecordKind) -> Result<Vec<Row>> {
        let table = self.tables.table(kind);
        let url = self.table_url(table);
        let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

        let response = self
            .http
            .execute(req)
            .await
            .map_err(|e| anyhow!("Failed to send request for table '{}': {}", table, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Backend returned status {} for table '{}': {}",
                status,
                table,
                body
            ));
        }

        let bytes = response.bytes().await?;
        let rows = parse_rows(&bytes).with_context(|| format!("decoding table '{table}'"))?;
        debug!(table, rows = rows.len(), "Table fetched");
        Ok(rows)
    }
}
