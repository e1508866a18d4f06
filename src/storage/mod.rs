pub mod csv;
pub mod json;
pub mod temp;

pub use temp::TempStore;

use crate::error::Result;
use crate::models::Review;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Write reviews to `path` in the requested format, creating parent
/// directories on demand.
pub fn write_reviews(path: &Path, format: OutputFormat, reviews: &[Review]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    match format {
        OutputFormat::Json => json::write_json(path, reviews),
        OutputFormat::Csv => csv::write_csv(path, reviews),
    }
}
