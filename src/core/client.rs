use crate::core::{ConfigProvider, TranscriptionSource};
use crate::domain::model::TablePayload;
use crate::utils::error::{Result, ViewerError};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fetches pages from `GET {base}/api/transcriptions?page={n}`.
pub struct HttpTranscriptionSource {
    client: Client,
    base_url: String,
}

impl HttpTranscriptionSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // reject bad bases up front rather than on the first fetch
        Url::parse(base_url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn page_url(&self, page: u32) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/api/transcriptions", self.base_url))?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }
}

/// Logs rows whose width differs from the header count and returns their indices.
/// Such rows are still displayed; missing cells read as null.
pub fn report_malformed_rows(page: u32, payload: &TablePayload) -> Vec<usize> {
    let malformed = payload.malformed_rows();
    if !malformed.is_empty() {
        tracing::warn!(
            "Page {} has {} rows whose width differs from {} headers: {:?}",
            page,
            malformed.len(),
            payload.headers.len(),
            malformed
        );
    }
    malformed
}

#[async_trait::async_trait]
impl TranscriptionSource for HttpTranscriptionSource {
    async fn fetch_page(&self, page: u32) -> Result<TablePayload> {
        let url = self.page_url(page)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(ViewerError::HttpStatusError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        let payload: TablePayload = serde_json::from_slice(&body)?;

        report_malformed_rows(page, &payload);

        tracing::debug!(
            "Fetched page {} with {} headers and {} rows",
            page,
            payload.headers.len(),
            payload.row_count()
        );
        Ok(payload)
    }
}
