//! Run configuration: trades, static defaults, rename and skip tables
//!
//! Every table is built once at start (from the built-in defaults or a JSON
//! file) and only read afterwards.

use crate::{FillError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Target field name -> literal value applied to every document of a trade
pub type StaticTable = BTreeMap<String, String>;

/// Template field name -> canonical field name
pub type RenameTable = BTreeMap<String, String>;

/// Field names excluded from filling
pub type SkipSet = BTreeSet<String>;

/// Output variant produced for every spreadsheet row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trade {
    Electrical,
    Structural,
}

impl Trade {
    /// All trades, in generation order
    pub const ALL: [Trade; 2] = [Trade::Electrical, Trade::Structural];

    /// Display label used in file and directory names
    pub fn label(self) -> &'static str {
        match self {
            Trade::Electrical => "Electrical",
            Trade::Structural => "Structural",
        }
    }

    /// Output directory, relative to the output root
    pub fn output_dir_name(self) -> String {
        format!("Filled {} PDFs", self.label())
    }

    /// Output file name for a property owner
    pub fn file_name(self, property_owner: &str) -> String {
        format!("{} Filled {} Form.pdf", property_owner, self.label())
    }
}

/// What to do when an output document cannot be written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFailurePolicy {
    /// Stop the whole run at the first failed save
    #[default]
    Abort,
    /// Record the failure and move on to the next document
    Continue,
}

/// Complete configuration for a fill run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FillConfig {
    /// Spreadsheet base name used when the user gives none
    pub default_spreadsheet: String,

    /// Template base name used when the user gives none
    pub default_template: String,

    /// Template field name overlay
    pub rename: RenameTable,

    /// Jurisdiction (lower case) -> fields to leave untouched
    pub skip_sets: BTreeMap<String, SkipSet>,

    /// Static defaults for electrical permits
    pub electrical: StaticTable,

    /// Static defaults for structural permits
    pub structural: StaticTable,

    /// Save failure handling
    pub on_save_failure: SaveFailurePolicy,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            default_spreadsheet: "test excel 1".to_string(),
            default_template: "template".to_string(),
            rename: table(DEFAULT_RENAME),
            skip_sets: BTreeMap::from([(
                "miami".to_string(),
                SkipSet::from(["City_3".to_string(), "Phone_2".to_string()]),
            )]),
            electrical: table(DEFAULT_ELECTRICAL),
            structural: table(DEFAULT_STRUCTURAL),
            on_save_failure: SaveFailurePolicy::default(),
        }
    }
}

impl FillConfig {
    /// A configuration with no rename, skip or static entries
    pub fn empty() -> Self {
        Self {
            rename: RenameTable::new(),
            skip_sets: BTreeMap::new(),
            electrical: StaticTable::new(),
            structural: StaticTable::new(),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| FillError::Config(e.to_string()))
    }

    /// Read a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| FillError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Serialize as pretty JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FillError::Config(e.to_string()))
    }

    /// Static defaults for a trade
    pub fn static_table(&self, trade: Trade) -> &StaticTable {
        match trade {
            Trade::Electrical => &self.electrical,
            Trade::Structural => &self.structural,
        }
    }

    /// Skip set for user-supplied jurisdiction text
    ///
    /// Matching ignores case and surrounding whitespace. Unknown or empty
    /// jurisdictions skip nothing.
    pub fn skip_set(&self, jurisdiction: &str) -> SkipSet {
        let wanted = jurisdiction.trim().to_lowercase();
        self.skip_sets
            .iter()
            .find(|(name, _)| name.trim().to_lowercase() == wanted)
            .map(|(_, fields)| fields.clone())
            .unwrap_or_default()
    }
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// Field names of the county template -> names used by the static tables
// and the spreadsheet columns.
const DEFAULT_RENAME: &[(&str, &str)] = &[
    ("Job Address", "Job Address"),
    ("Folio", "Tax Folio No"),
    ("Contractor Name", "Contracting Co"),
    ("Qualifier Name", "Qualifiers Name"),
    ("Address", "Company Address"),
    ("City", "City_3"),
    ("State", "State_2"),
    ("Zip", "Zip_2"),
    ("Check Box1", "WORK-NEWCheck Box"),
    ("Current use of property 2", "Present Use"),
    ("Description of Work 2", "Description of Work"),
    ("Owner", "Property Owner"),
    ("Address_2", "Owners Address"),
    ("City_2", "City_2"),
    ("State_2", "State"),
    ("Zip_2", "Zip"),
    ("Print", "TypePrint Property Owner or Agent Name_2"),
    ("Print_2", "Notary Name_2"),
    ("Check Box20", "TRADE-BUILDINGCheck Box"),
    ("Check Box21", "TRADE-ELECTRICALCheck Box"),
];

const DEFAULT_ELECTRICAL: &[(&str, &str)] = &[
    ("TRADE-ELECTRICALCheck Box", "Yes"),
    ("Building Use", "Residential"),
    ("Dropdown4", "VB"),
    ("Occupancy Group", "Residential"),
    ("Present Use", "Residential"),
    ("Proposed Use", "Residential"),
    (
        "Description of Work",
        "Solar System Roof Mount and Interconnection",
    ),
    ("WORK-NEWCheck Box", "Yes"),
    ("Contracting Co", "MES Electric"),
    ("Phone_2", "(571) 422-0970"),
    ("Email_2", "jackson.mcinerney@smartroofinc.com"),
    ("Company Address", "2083 Guadelupe Dr"),
    ("City_3", "Wellington"),
    ("State_2", "FL"),
    ("Zip_2", "33414"),
    ("Qualifiers Name", "Mark Spoor"),
    ("License Number", "EC13001707"),
    ("TypePrint Property Owner or Agent Name_2", "Mark Spoor"),
    ("Notary Name_2", "Jackson McInerney"),
];

const DEFAULT_STRUCTURAL: &[(&str, &str)] = &[
    ("TRADE-BUILDINGCheck Box", "Yes"),
    ("Building Use", "Residential"),
    ("Dropdown4", "VB"),
    ("Present Use", "Residential"),
    ("Proposed Use", "Residential"),
    (
        "Description of Work",
        "Solar PV System Roof Mount and Interconnection",
    ),
    ("WORK-NEWCheck Box", "Yes"),
    ("Contracting Co", "Smart Roof LLC"),
    ("Phone_2", "(571) 422-0970"),
    ("Email_2", "jackson.mcinerney@smartroofinc.com"),
    ("Company Address", "6413 Congress Ave #225"),
    ("City_3", "Boca Raton"),
    ("State_2", "FL"),
    ("Zip_2", "33487"),
    ("Qualifiers Name", "Juan David Castro Marino"),
    ("License Number", "CGC1528586"),
    (
        "TypePrint Property Owner or Agent Name_2",
        "Juan David Castro Marino",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trade_names() {
        assert_eq!(
            Trade::Electrical.output_dir_name(),
            "Filled Electrical PDFs"
        );
        assert_eq!(
            Trade::Structural.output_dir_name(),
            "Filled Structural PDFs"
        );
        assert_eq!(
            Trade::Structural.file_name("Jane Doe"),
            "Jane Doe Filled Structural Form.pdf"
        );
    }

    #[test]
    fn test_default_tables_share_keys_with_different_values() {
        let config = FillConfig::default();
        assert_eq!(
            config.static_table(Trade::Electrical)["Contracting Co"],
            "MES Electric"
        );
        assert_eq!(
            config.static_table(Trade::Structural)["Contracting Co"],
            "Smart Roof LLC"
        );
        assert!(!config.structural.contains_key("Notary Name_2"));
        assert_eq!(config.rename["Check Box20"], "TRADE-BUILDINGCheck Box");
    }

    #[test]
    fn test_skip_set_lookup_normalizes_jurisdiction() {
        let config = FillConfig::default();
        let expected = SkipSet::from(["City_3".to_string(), "Phone_2".to_string()]);

        assert_eq!(config.skip_set("miami"), expected);
        assert_eq!(config.skip_set("  Miami "), expected);
        assert!(config.skip_set("palm beach").is_empty());
        assert!(config.skip_set("").is_empty());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FillConfig::from_json(
            r#"{
                "defaultTemplate": "miami template",
                "rename": {},
                "onSaveFailure": "continue"
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_template, "miami template");
        assert_eq!(config.default_spreadsheet, "test excel 1");
        assert!(config.rename.is_empty());
        assert_eq!(config.on_save_failure, SaveFailurePolicy::Continue);
        assert_eq!(config.electrical, FillConfig::default().electrical);
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let config = FillConfig::default();
        let json = config.to_json_pretty().unwrap();
        assert_eq!(FillConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let result = FillConfig::from_json(r#"{ "rename": [1, 2] }"#);
        assert!(matches!(result, Err(FillError::Config(_))));
    }

    #[test]
    fn test_empty_config() {
        let config = FillConfig::empty();
        assert!(config.rename.is_empty());
        assert!(config.skip_sets.is_empty());
        assert!(config.static_table(Trade::Electrical).is_empty());
        assert_eq!(config.default_template, "template");
    }
}
