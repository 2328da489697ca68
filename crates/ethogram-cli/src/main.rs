//! ethogram CLI - Behavioral observation reports
//!
//! Reads a persisted observation record (JSON), builds the behavior × time
//! matrix and renders the Excel report and notification email.

mod config;
mod diagnostics;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ethogram_core::{Matrix, ObservationRecord, Renderer, SubmissionRequest};
use ethogram_render::report_filename;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::diagnostics::{DiagnosticConfig, ExitCode};

#[derive(Parser)]
#[command(name = "ethogram")]
#[command(author, version, about = "Behavioral observation report generator", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Report configuration file (TOML)
    #[arg(long, global = true, env = "ETHOGRAM_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct InputArgs {
    /// Observation record (JSON)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Input is a submission form payload (one flat observation per slot)
    #[arg(long)]
    flat: bool,
}

#[derive(clap::Args)]
struct DiagnosticArgs {
    /// Treat data left out of the report as an error
    #[arg(long)]
    strict: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report slot data that would not reach the report
    Check {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        diagnostics: DiagnosticArgs,
    },

    /// Print the behavior × time matrix
    Matrix {
        #[command(flatten)]
        input: InputArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: MatrixFormat,
    },

    /// Render the Excel report
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        diagnostics: DiagnosticArgs,

        /// Output file (defaults to ethogram-<subject>-<date>.xlsx in --out-dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the default file name
        #[arg(long, env = "ETHOGRAM_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Report title (overrides the config file)
        #[arg(long, env = "ETHOGRAM_TITLE")]
        title: Option<String>,

        /// Also write the notification email body (HTML)
        #[arg(long, value_name = "FILE")]
        email_html: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MatrixFormat {
    Text,
    Json,
}

fn main() -> Result<std::process::ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    let code = match cli.command {
        Commands::Check { input, diagnostics } => cmd_check(&input, &diagnostics)?,
        Commands::Matrix { input, format } => cmd_matrix(&input, format)?,
        Commands::Render {
            input,
            diagnostics,
            output,
            out_dir,
            title,
            email_html,
        } => {
            let options = RenderOptions {
                output,
                out_dir,
                title,
                email_html,
            };
            cmd_render(&input, &diagnostics, &options, &config)?
        }
    };

    Ok(code.into())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_record(input: &InputArgs) -> Result<ObservationRecord> {
    let text = fs::read_to_string(&input.file)
        .with_context(|| format!("Failed to read {}", input.file.display()))?;
    parse_record(&text, input.flat).with_context(|| format!("Invalid observation record {}", input.file.display()))
}

fn parse_record(text: &str, flat: bool) -> Result<ObservationRecord> {
    if flat {
        let request: SubmissionRequest = serde_json::from_str(text)?;
        Ok(request.into_record())
    } else {
        Ok(serde_json::from_str(text)?)
    }
}

fn report_diagnostics(matrix: &Matrix, args: &DiagnosticArgs) -> Result<ExitCode> {
    let config = DiagnosticConfig {
        strict: args.strict,
        quiet: args.quiet,
    };
    let findings = diagnostics::findings(&matrix.diagnostics);
    let code = diagnostics::emit(&mut io::stderr().lock(), &findings, &config)?;
    Ok(code)
}

fn cmd_check(input: &InputArgs, args: &DiagnosticArgs) -> Result<ExitCode> {
    let record = load_record(input)?;
    let matrix = record.matrix();

    let code = report_diagnostics(&matrix, args)?;
    if !args.quiet {
        println!(
            "{}: {} slot(s), {} populated cell(s)",
            input.file.display(),
            matrix.columns.len(),
            matrix.cells().len()
        );
    }
    Ok(code)
}

fn cmd_matrix(input: &InputArgs, format: MatrixFormat) -> Result<ExitCode> {
    let record = load_record(input)?;
    let matrix = record.matrix();

    let mut out = io::stdout().lock();
    match format {
        MatrixFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &matrix)?;
            writeln!(out)?;
        }
        MatrixFormat::Text => write_matrix_text(&mut out, &matrix)?,
    }
    Ok(ExitCode::Success)
}

/// One line per populated cell, in column order
fn write_matrix_text<W: Write>(out: &mut W, matrix: &Matrix) -> io::Result<()> {
    writeln!(
        out,
        "{} slot(s) x {} behavior(s)",
        matrix.columns.len(),
        matrix.rows.len()
    )?;
    for cell in matrix.cells() {
        let column = &matrix.columns[cell.column];
        writeln!(
            out,
            "{:>6}  {}  {}  {}",
            column.label,
            column.key,
            matrix.rows[cell.row].label,
            cell.content.replace('\n', " | ")
        )?;
    }
    Ok(())
}

struct RenderOptions {
    output: Option<PathBuf>,
    out_dir: PathBuf,
    title: Option<String>,
    email_html: Option<PathBuf>,
}

fn cmd_render(
    input: &InputArgs,
    args: &DiagnosticArgs,
    options: &RenderOptions,
    config: &Config,
) -> Result<ExitCode> {
    let record = load_record(input)?;
    let matrix = record.matrix();

    let code = report_diagnostics(&matrix, args)?;
    if !code.is_success() {
        return Ok(code);
    }

    let mut renderer = config.excel_renderer();
    if let Some(title) = &options.title {
        renderer = renderer.title(title);
    }

    let bytes = renderer.render(&record, &matrix).context("Render failed")?;

    let output = options.output.clone().unwrap_or_else(|| {
        options
            .out_dir
            .join(report_filename(&record.patient, record.observation_date))
    });
    write_file(&output, &bytes)?;
    tracing::info!(path = %output.display(), bytes = bytes.len(), "wrote report");

    if let Some(path) = &options.email_html {
        let message = config.email_renderer().render(&record);
        write_file(path, message.html_body.as_bytes())?;
        tracing::info!(path = %path.display(), subject = %message.subject, "wrote notification body");
    }

    if !args.quiet {
        println!("Created: {}", output.display());
    }
    Ok(code)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
