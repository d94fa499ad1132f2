//! Subcommands and their flags

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill the template once per spreadsheet row and trade
    Fill(FillArgs),

    /// List a template's form fields grouped by widget kind
    Fields(FieldsArgs),

    /// Print the effective configuration as JSON
    Defaults(DefaultsArgs),
}

#[derive(Args, Debug)]
pub struct FillArgs {
    /// Spreadsheet name; `.xlsx` is appended when no extension is given
    #[arg(long)]
    pub data: Option<String>,

    /// Template PDF name; `.pdf` is appended when no extension is given
    #[arg(long)]
    pub template: Option<String>,

    /// Jurisdiction selecting a skip set (e.g. "miami")
    #[arg(long)]
    pub jurisdiction: Option<String>,

    /// JSON configuration replacing the built-in tables
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory receiving the `Filled <Trade> PDFs` folders
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Never ask; use configured defaults for anything not given
    #[arg(long)]
    pub no_prompt: bool,

    /// Keep going when a document cannot be saved
    #[arg(long)]
    pub continue_on_error: bool,
}

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Template PDF to inspect
    #[arg(long)]
    pub template: PathBuf,
}

#[derive(Args, Debug)]
pub struct DefaultsArgs {
    /// JSON configuration to merge over the built-in tables
    #[arg(long)]
    pub config: Option<PathBuf>,
}
