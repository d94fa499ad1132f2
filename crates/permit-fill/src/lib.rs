//! Permit Fill - field resolution and form filling engine
//!
//! This crate provides:
//! - Run configuration (static defaults per trade, rename table, skip sets)
//! - Row extraction from spreadsheets
//! - Field name resolution (skip, then rename)
//! - Value resolution (row data over static defaults)
//! - Field writing with widget-kind coercion
//! - Orchestration of one output document per row and trade
//!
//! # Example
//!
//! ```ignore
//! use permit_fill::{FillConfig, Filler};
//!
//! let config = FillConfig::default();
//! let summary = Filler::new(&config, "template.pdf")
//!     .with_jurisdiction("miami")
//!     .run("test excel 1.xlsx")?;
//! println!("{} documents written", summary.written.len());
//! ```

pub mod config;
mod filler;
pub mod resolver;
pub mod row;
pub mod writer;

pub use config::{FillConfig, RenameTable, SaveFailurePolicy, SkipSet, StaticTable, Trade};
pub use filler::{DocumentStats, FillSummary, Filler};
pub use resolver::{resolve_name, resolve_value, ResolvedName};
pub use row::{extract_rows, load_rows, RowRecord, REQUIRED_COLUMNS};
pub use writer::{apply_value, coerce_value, is_checked, WriteOutcome};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a fill run
#[derive(Debug, Error)]
pub enum FillError {
    #[error("Template not found or unreadable: {} ({reason})", path.display())]
    TemplateNotFound { path: PathBuf, reason: String },

    #[error("Spreadsheet not found: {}", path.display())]
    SpreadsheetNotFound { path: PathBuf },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Spreadsheet is missing required column: {0}")]
    MissingColumn(String),

    #[error("Failed to save {}: {source}", path.display())]
    SaveFailure {
        path: PathBuf,
        source: pdf_core::PdfError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fill operations
pub type Result<T> = std::result::Result<T, FillError>;
