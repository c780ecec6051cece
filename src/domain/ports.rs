use crate::core::projector::{ColumnPolicy, MatchMode};
use crate::domain::model::TablePayload;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn page(&self) -> u32;
    fn match_mode(&self) -> MatchMode;
    fn column_policy(&self) -> ColumnPolicy;
    fn timeout_seconds(&self) -> u64;
    fn export_dir(&self) -> Option<&str>;
}

/// Where pages of transcription records come from.
#[async_trait]
pub trait TranscriptionSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<TablePayload>;
}
