//! Form fill orchestration
//!
//! One output document per (row, trade): open the template, resolve every
//! field name, write the resolved values, save, close.

use crate::config::{FillConfig, SaveFailurePolicy, SkipSet, Trade};
use crate::resolver::{resolve_name, resolve_value, ResolvedName};
use crate::row::{load_rows, RowRecord};
use crate::writer::{apply_value, WriteOutcome};
use crate::{FillError, Result};
use pdf_core::{FormField, PdfDocument, PdfError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Characters replaced in output file names
const FORBIDDEN_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Result of a fill run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillSummary {
    /// Saved documents, in generation order (may repeat on name collisions)
    pub written: Vec<PathBuf>,
    /// Documents that could not be saved, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// Per-document counters, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub written: usize,
    pub untouched: usize,
    pub skipped: usize,
    pub unsupported: usize,
}

/// Fills a template for every row and trade
pub struct Filler<'a> {
    /// Tables and policies for the run
    config: &'a FillConfig,
    /// Template PDF
    template: PathBuf,
    /// Directory holding the per-trade output directories
    output_root: PathBuf,
    /// Fields excluded for the selected jurisdiction
    skip: SkipSet,
}

impl<'a> Filler<'a> {
    /// Create a filler writing below the current directory, skipping nothing
    pub fn new(config: &'a FillConfig, template: impl Into<PathBuf>) -> Self {
        Self {
            config,
            template: template.into(),
            output_root: PathBuf::from("."),
            skip: SkipSet::new(),
        }
    }

    /// Set the directory that receives `Filled <Trade> PDFs/`
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Select the skip set for a jurisdiction
    pub fn with_jurisdiction(mut self, jurisdiction: &str) -> Self {
        self.skip = self.config.skip_set(jurisdiction);
        if !self.skip.is_empty() {
            log::info!(
                "jurisdiction '{}': skipping {} field(s)",
                jurisdiction.trim(),
                self.skip.len()
            );
        }
        self
    }

    /// Output directory for a trade
    pub fn output_dir(&self, trade: Trade) -> PathBuf {
        self.output_root.join(trade.output_dir_name())
    }

    /// Output file for a row and trade
    pub fn output_path(&self, trade: Trade, row: &RowRecord) -> PathBuf {
        let file_name = trade
            .file_name(row.property_owner())
            .replace(FORBIDDEN_FILE_CHARS, "_");
        self.output_dir(trade).join(file_name)
    }

    /// Create every trade's output directory; existing ones are fine
    pub fn prepare_output_dirs(&self) -> Result<()> {
        for trade in Trade::ALL {
            std::fs::create_dir_all(self.output_dir(trade))?;
        }
        Ok(())
    }

    /// Load a spreadsheet and fill the template for each of its rows
    pub fn run<P: AsRef<Path>>(&self, spreadsheet: P) -> Result<FillSummary> {
        let rows = load_rows(spreadsheet)?;
        self.fill_rows(&rows)
    }

    /// Fill the template for each row (in order) and each trade
    pub fn fill_rows(&self, rows: &[RowRecord]) -> Result<FillSummary> {
        self.prepare_output_dirs()?;

        let mut summary = FillSummary::default();
        let mut seen = HashSet::new();

        for row in rows {
            for trade in Trade::ALL {
                match self.fill_document(trade, row) {
                    Ok(path) => {
                        if !seen.insert(path.clone()) {
                            log::warn!(
                                "{} was generated more than once; keeping the latest",
                                path.display()
                            );
                        }
                        summary.written.push(path);
                    }
                    Err(FillError::SaveFailure { path, source })
                        if self.config.on_save_failure == SaveFailurePolicy::Continue =>
                    {
                        log::warn!("could not save {}: {}", path.display(), source);
                        summary.failed.push((path, source.to_string()));
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(summary)
    }

    /// Produce the document for one row and trade, returning its path
    ///
    /// The document is dropped when this returns, whether or not it saved.
    pub fn fill_document(&self, trade: Trade, row: &RowRecord) -> Result<PathBuf> {
        let mut doc = self.open_template()?;
        let fields = doc.form_fields()?;

        let mut stats = DocumentStats::default();
        let targets = self.resolve_names(&fields, &mut stats);

        let table = self.config.static_table(trade);
        for (field, name) in targets {
            let value = resolve_value(name, row, table);
            match apply_value(&mut doc, field, value)? {
                WriteOutcome::Written => stats.written += 1,
                WriteOutcome::Untouched => stats.untouched += 1,
                WriteOutcome::Unsupported => stats.unsupported += 1,
            }
        }

        let path = self.output_path(trade, row);
        doc.save(&path).map_err(|source| FillError::SaveFailure {
            path: path.clone(),
            source,
        })?;

        log::info!(
            "saved {} ({} written, {} untouched, {} skipped, {} unsupported)",
            path.display(),
            stats.written,
            stats.untouched,
            stats.skipped,
            stats.unsupported
        );
        Ok(path)
    }

    fn open_template(&self) -> Result<PdfDocument> {
        PdfDocument::open(&self.template).map_err(|e| match e {
            PdfError::OpenError(reason) => FillError::TemplateNotFound {
                path: self.template.clone(),
                reason,
            },
            other => FillError::Pdf(other),
        })
    }

    /// Effective names for every field that is not skipped
    fn resolve_names<'f>(
        &'f self,
        fields: &'f [FormField],
        stats: &mut DocumentStats,
    ) -> Vec<(&'f FormField, &'f str)> {
        let mut targets = Vec::with_capacity(fields.len());
        for field in fields {
            match resolve_name(&field.name, &self.config.rename, &self.skip) {
                ResolvedName::Field(name) => targets.push((field, name)),
                ResolvedName::Skip => {
                    log::debug!("'{}' skipped for this jurisdiction", field.name);
                    stats.skipped += 1;
                }
            }
        }
        targets
    }
}
