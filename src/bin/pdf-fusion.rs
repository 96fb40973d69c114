//! PDF Fusion CLI tool
//!
//! A command-line tool for combining selected pages of several PDFs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdf_fusion::host::{self, ActionOutcome, FileAction, Opener};
use pdf_fusion::inputs::{expand_patterns, load_inputs};
use pdf_fusion::pdf::{extract_metadata, merge};
use pdf_fusion::report::{empty_files_warning, render_info_json, render_json, render_table};
use pdf_fusion::SelectionPolicy;

/// PDF Fusion - Combine chosen pages of several PDFs into one
#[derive(Parser)]
#[command(name = "pdf-fusion")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Take every page of every file
    pdf-fusion merge -o combined.pdf a.pdf b.pdf

    # First and last page of each numbered handout
    pdf-fusion merge -o covers.pdf --first-last \"[0-9]*.pdf\"

    # Page 3 of each file, plus first and last, then print
    pdf-fusion merge -o summary.pdf --first-last --page 3 --print *.pdf")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine selected pages of several PDF files into one
    Merge {
        /// Input PDF files (in order). Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output PDF file path
        #[arg(short, long, default_value = "combined.pdf")]
        output: PathBuf,

        /// Include the first and last page of each file
        #[arg(long)]
        first_last: bool,

        /// Include this page (1-based) of each file
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        page: Option<u32>,

        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,

        /// Send the output file to the default printer
        #[arg(long)]
        print: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,

        /// Print the information as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Merge { inputs, output, first_last, page, json, open, print } => {
            cmd_merge(inputs, output, SelectionPolicy::new(first_last, page), json, open, print)
        }
        Commands::Info { input, json } => cmd_info(&input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Combine selected pages into one PDF and report per file
fn cmd_merge(
    inputs: Vec<String>,
    output: PathBuf,
    policy: SelectionPolicy,
    json: bool,
    open: bool,
    print: bool,
) -> Result<()> {
    let paths = expand_patterns(&inputs)?;
    let files = load_inputs(&paths)?;

    eprintln!("Combining {} PDF files...", files.len());
    let outcome = merge(&files, &policy)?;

    std::fs::write(&output, &outcome.document)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote {} page(s) to {}", outcome.page_count(), output.display());

    if let Some(warning) = empty_files_warning(&outcome.empty_files) {
        eprintln!("Warning: {}", warning);
    }

    if json {
        println!("{}", render_json(&outcome, &output.display().to_string())?);
    } else {
        print!("{}", render_table(&outcome.reports));
        eprintln!("Combined {} page(s) into: {}", outcome.page_count(), output.display());
    }

    if open {
        run_host_action("Open", Some(&Opener), &output);
    }
    if print {
        let printer = host::printer();
        run_host_action("Print", printer.as_ref().map(|p| p as &dyn FileAction), &output);
    }

    Ok(())
}

/// Host actions never fail the command; the output file is already written
fn run_host_action(label: &str, action: Option<&dyn FileAction>, path: &Path) {
    match host::attempt(action, path) {
        ActionOutcome::Done => eprintln!("{} started for {}", label, path.display()),
        ActionOutcome::Unavailable => {
            eprintln!("{} is not available on this system", label)
        }
        ActionOutcome::Failed(e) => eprintln!("Error: {}", e),
    }
}

/// Show information about a PDF
fn cmd_info(input: &Path, json: bool) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let bytes = std::fs::read(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let metadata = extract_metadata(&bytes)
        .with_context(|| format!("Failed to read PDF {}", input.display()))?;

    if json {
        println!("{}", render_info_json(&metadata, &input.display().to_string())?);
        return Ok(());
    }

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    Ok(())
}
