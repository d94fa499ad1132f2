//! Command-line interface
//!
//! Parsing and console output only; filling lives in `permit-fill`.

pub mod commands;

use crate::prompt::{ask_file_name, ask_jurisdiction, with_extension};
use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, DefaultsArgs, FieldsArgs, FillArgs};
use pdf_core::PdfDocument;
use permit_fill::{FillConfig, Filler, SaveFailurePolicy};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(
    name = "permit-filler",
    version,
    about = "Fill electrical and structural permit PDFs from a spreadsheet."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Fill(args) => run_fill(args),
            Commands::Fields(args) => run_fields(args),
            Commands::Defaults(args) => run_defaults(args),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<FillConfig> {
    match path {
        Some(path) => {
            log::info!("using configuration from {}", path.display());
            FillConfig::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))
        }
        None => Ok(FillConfig::default()),
    }
}

fn print_banner() {
    println!("permit-filler {}", env!("CARGO_PKG_VERSION"));
    println!();
}

fn run_fill(args: FillArgs) -> Result<()> {
    print_banner();

    let mut config = load_config(args.config.as_deref())?;
    if args.continue_on_error {
        config.on_save_failure = SaveFailurePolicy::Continue;
    }

    let (spreadsheet, template, jurisdiction) = if args.no_prompt {
        let data = args.data.as_deref().unwrap_or(&config.default_spreadsheet);
        let template = args.template.as_deref().unwrap_or(&config.default_template);
        (
            with_extension(data, "xlsx"),
            with_extension(template, "pdf"),
            args.jurisdiction.unwrap_or_default(),
        )
    } else {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();

        let spreadsheet = match args.data {
            Some(name) => with_extension(&name, "xlsx"),
            None => ask_file_name(
                &mut input,
                &mut output,
                "Excel file",
                &config.default_spreadsheet,
                "xlsx",
            )?,
        };
        let template = match args.template {
            Some(name) => with_extension(&name, "pdf"),
            None => ask_file_name(
                &mut input,
                &mut output,
                "PDF template",
                &config.default_template,
                "pdf",
            )?,
        };
        let jurisdiction = match args.jurisdiction {
            Some(j) => j,
            None => ask_jurisdiction(&mut input, &mut output)?,
        };
        (spreadsheet, template, jurisdiction)
    };

    println!("Processing... please wait.");

    let summary = Filler::new(&config, &template)
        .with_output_root(&args.output_dir)
        .with_jurisdiction(&jurisdiction)
        .run(&spreadsheet)
        .with_context(|| format!("filling {template} from {spreadsheet}"))?;

    if summary.failed.is_empty() {
        println!(
            "PDFs generated successfully. ({} written)",
            summary.written.len()
        );
    } else {
        println!(
            "{} PDF(s) written, {} failed:",
            summary.written.len(),
            summary.failed.len()
        );
        for (path, reason) in &summary.failed {
            println!("  {}: {}", path.display(), reason);
        }
    }
    Ok(())
}

fn run_fields(args: FieldsArgs) -> Result<()> {
    let doc = PdfDocument::open(&args.template)
        .with_context(|| format!("opening {}", args.template.display()))?;
    let fields = doc.form_fields()?;

    let grouped = group_by_kind(fields.iter().map(|f| (f.kind.label(), f.name.as_str())));
    if grouped.is_empty() {
        println!("{} has no form fields", args.template.display());
        return Ok(());
    }

    for (kind, names) in grouped {
        println!("{kind} ({}):", names.len());
        for name in names {
            println!("  {name}");
        }
    }
    Ok(())
}

fn run_defaults(args: DefaultsArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    println!("{}", config.to_json_pretty()?);
    Ok(())
}

/// Group field names under their kind label, keeping first-seen order inside a group
fn group_by_kind<'a>(
    fields: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> BTreeMap<&'a str, Vec<&'a str>> {
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (kind, name) in fields {
        let names = grouped.entry(kind).or_default();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    grouped
}
