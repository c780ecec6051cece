pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, AppConfig, CliConfig};
pub use core::{
    client::HttpTranscriptionSource,
    export::PageExporter,
    projector::{ColumnPolicy, MatchMode, Projector},
    viewer::{TranscriptionViewer, ViewSettings},
};
pub use utils::error::{Result, ViewerError};
