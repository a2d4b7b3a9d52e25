use thiserror::Error;

pub mod export;

pub use export::{ExportFormat, export_report, render_report};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown export format: {0} (expected json, csv, markdown or text)")]
    UnknownFormat(String),
}
