//! Field name and value resolution
//!
//! Both stages are pure lookups over read-only tables:
//! skip → rename → dynamic row value → static default.

use crate::config::{RenameTable, SkipSet, StaticTable};
use crate::row::RowRecord;

/// Outcome of resolving a template field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedName<'a> {
    /// Name to look values up under
    Field(&'a str),
    /// Field is excluded for this jurisdiction
    Skip,
}

/// Decide the effective name of a template field
///
/// The skip set is checked against the template's own name, before renaming.
/// Names absent from the rename table are used unchanged.
pub fn resolve_name<'a>(
    original: &'a str,
    rename: &'a RenameTable,
    skip: &SkipSet,
) -> ResolvedName<'a> {
    if skip.contains(original) {
        return ResolvedName::Skip;
    }

    match rename.get(original) {
        Some(mapped) => ResolvedName::Field(mapped),
        None => ResolvedName::Field(original),
    }
}

/// Pick the value for an effective field name
///
/// Row data wins over static defaults whenever the row has the key, including
/// when its value is empty. `None` means the field must be left untouched.
pub fn resolve_value<'a>(
    name: &str,
    row: &'a RowRecord,
    table: &'a StaticTable,
) -> Option<&'a str> {
    if let Some(value) = row.get(name) {
        return Some(value);
    }
    table.get(name).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename() -> RenameTable {
        RenameTable::from([(
            "Check Box20".to_string(),
            "TRADE-BUILDINGCheck Box".to_string(),
        )])
    }

    fn statics() -> StaticTable {
        StaticTable::from([
            ("Contracting Co".to_string(), "MES Electric".to_string()),
            ("City".to_string(), "Wellington".to_string()),
        ])
    }

    #[test]
    fn test_identity_when_not_renamed() {
        let table = rename();
        let result = resolve_name("Contracting Co", &table, &SkipSet::new());
        assert_eq!(result, ResolvedName::Field("Contracting Co"));
    }

    #[test]
    fn test_rename_applies() {
        let table = rename();
        let result = resolve_name("Check Box20", &table, &SkipSet::new());
        assert_eq!(result, ResolvedName::Field("TRADE-BUILDINGCheck Box"));
    }

    #[test]
    fn test_skip_takes_precedence_over_rename() {
        let skip = SkipSet::from(["Check Box20".to_string()]);
        assert_eq!(
            resolve_name("Check Box20", &rename(), &skip),
            ResolvedName::Skip
        );
    }

    #[test]
    fn test_skip_matches_original_name_only() {
        // Renamed target listed in the skip set does not skip the source field
        let skip = SkipSet::from(["TRADE-BUILDINGCheck Box".to_string()]);
        let table = rename();
        assert_eq!(
            resolve_name("Check Box20", &table, &skip),
            ResolvedName::Field("TRADE-BUILDINGCheck Box")
        );
    }

    #[test]
    fn test_dynamic_wins_over_static() {
        let row: RowRecord = [("City", "Miami")].into_iter().collect();
        assert_eq!(resolve_value("City", &row, &statics()), Some("Miami"));
    }

    #[test]
    fn test_empty_dynamic_value_still_wins() {
        let row: RowRecord = [("City", "")].into_iter().collect();
        assert_eq!(resolve_value("City", &row, &statics()), Some(""));
    }

    #[test]
    fn test_static_fallback() {
        let row = RowRecord::default();
        let table = statics();
        assert_eq!(
            resolve_value("Contracting Co", &row, &table),
            Some("MES Electric")
        );
    }

    #[test]
    fn test_absent_when_nowhere() {
        let row: RowRecord = [("City", "Miami")].into_iter().collect();
        assert_eq!(resolve_value("License Number", &row, &statics()), None);
    }
}
