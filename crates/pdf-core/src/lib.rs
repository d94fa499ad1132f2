//! PDF Core - Low-level AcroForm manipulation
//!
//! This crate provides functionality for:
//! - Opening and saving PDF documents
//! - Enumerating form widgets page by page, with inherited names and types
//! - Writing text, choice and checkbox values
//! - Marking appearance streams for regeneration
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{FieldValue, PdfDocument};
//!
//! let mut doc = PdfDocument::open("template.pdf")?;
//! let field = doc.field("Contracting Co")?;
//! doc.set_field_value(&field, &FieldValue::Text("MES Electric".into()))?;
//! doc.save("output.pdf")?;
//! ```

mod document;
mod form;

pub use document::PdfDocument;
pub use form::{decode_text_string, encode_text_string, flags, FieldKind, FieldValue, FormField};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Form field not found: {0}")]
    FieldNotFound(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
