pub mod client;
pub mod content;
pub mod export;
pub mod projector;
pub mod render;
pub mod session;
pub mod timefmt;
pub mod viewer;

pub use crate::domain::model::{AnalysisRecord, Dimension, TablePayload};
pub use crate::domain::ports::{ConfigProvider, Storage, TranscriptionSource};
pub use crate::utils::error::Result;
