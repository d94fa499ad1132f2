//! Field writing with widget-kind coercion

use crate::Result;
use pdf_core::{FieldKind, FieldValue, FormField, PdfDocument};

/// Words (compared lower-cased) that check a checkbox
pub const CHECKED_WORDS: [&str; 3] = ["yes", "true", "checked"];

/// What happened to a field during writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// A value was stored
    Written,
    /// No value applied; the template content was kept
    Untouched,
    /// The widget kind cannot be filled; the template content was kept
    Unsupported,
}

/// Whether text checks a checkbox
///
/// Exact, case-insensitive membership in [`CHECKED_WORDS`]; surrounding
/// whitespace is not trimmed.
pub fn is_checked(raw: &str) -> bool {
    let lowered = raw.to_lowercase();
    CHECKED_WORDS.contains(&lowered.as_str())
}

/// Convert resolved text into the representation a widget kind stores
///
/// Returns `None` for unsupported widget kinds.
pub fn coerce_value(kind: &FieldKind, raw: &str) -> Option<FieldValue> {
    match kind {
        FieldKind::Text => Some(FieldValue::Text(raw.to_string())),
        FieldKind::ComboBox | FieldKind::ListBox => Some(FieldValue::Choice(raw.to_string())),
        FieldKind::CheckBox => Some(FieldValue::Checked(is_checked(raw))),
        FieldKind::Unsupported(_) => None,
    }
}

/// Write a resolved value into a field of an open document
pub fn apply_value(
    doc: &mut PdfDocument,
    field: &FormField,
    value: Option<&str>,
) -> Result<WriteOutcome> {
    let Some(raw) = value else {
        return Ok(WriteOutcome::Untouched);
    };

    let Some(coerced) = coerce_value(&field.kind, raw) else {
        log::debug!(
            "skipping '{}': unsupported widget kind {}",
            field.name,
            field.kind.label()
        );
        return Ok(WriteOutcome::Unsupported);
    };

    doc.set_field_value(field, &coerced)?;
    log::debug!("'{}' <- {:?}", field.name, coerced);
    Ok(WriteOutcome::Written)
}
