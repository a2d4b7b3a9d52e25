use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use citelink_parsing::{CitationExtractor, ParsingConfig, ParsingConfigBuilder};
use citelink_reporting::ExportFormat;

mod config_file;
mod output;

use config_file::ConfigFile;
use output::ColorMode;

/// Citation Linker - Cross-check in-text citations against a document's reference list
#[derive(Parser, Debug)]
#[command(name = "citelink", version, about, long_about = None)]
struct Cli {
    /// Log parser decisions to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a TOML config file (default: ./.citelink.toml over the platform config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a UTF-8 text document for citations and reference entries
    Scan {
        /// Path to the text file to scan
        file_path: PathBuf,

        /// Report format: json, csv, markdown or text
        #[arg(short, long)]
        format: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Skip bracketed numeric citations such as [1]
        #[arg(long)]
        no_numeric: bool,

        /// Regex for the heading that opens the reference list
        #[arg(long)]
        section_header: Option<String>,
    },

    /// Print the resolved configuration as TOML
    CheckConfig,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "citelink_core=debug,citelink_parsing=debug,citelink_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config_file::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::CheckConfig => check_config(&config),
        Command::Scan {
            file_path,
            format,
            output,
            no_color,
            no_numeric,
            section_header,
        } => scan(
            &config,
            &file_path,
            format,
            output,
            no_color,
            no_numeric,
            section_header,
        ),
    }
}

/// Combine CLI flags with the config file: flags win, then file values, then defaults.
fn parsing_config(
    config: &ConfigFile,
    no_numeric: bool,
    section_header: Option<String>,
) -> anyhow::Result<ParsingConfig> {
    let file = config.parsing();
    let mut builder = ParsingConfigBuilder::new();

    if let Some(pattern) = section_header.or(file.section_header) {
        builder = builder.section_header_regex(&pattern);
    }
    if let Some(pattern) = file.doi_pattern {
        builder = builder.doi_regex(&pattern);
    }
    let numeric = !no_numeric && file.numeric_citations.unwrap_or(true);
    builder = builder.numeric_citations(numeric);

    Ok(builder.build()?)
}

/// Format to export in, if any. `None` means the colored console summary.
fn export_format(
    config: &ConfigFile,
    format: Option<String>,
    output: Option<&Path>,
) -> anyhow::Result<Option<ExportFormat>> {
    if let Some(f) = format {
        return Ok(Some(f.parse()?));
    }
    let Some(path) = output else {
        return Ok(None);
    };
    if let Some(f) = ExportFormat::from_path(path) {
        return Ok(Some(f));
    }
    match config.display().format {
        Some(f) => Ok(Some(f.parse()?)),
        None => Ok(Some(ExportFormat::Text)),
    }
}

fn scan(
    config: &ConfigFile,
    file_path: &Path,
    format: Option<String>,
    output: Option<PathBuf>,
    no_color: bool,
    no_numeric: bool,
    section_header: Option<String>,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }
    let text = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read {} as UTF-8 text", file_path.display()))?;

    let parsing = parsing_config(config, no_numeric, section_header)?;
    tracing::debug!(
        custom_patterns = parsing.has_custom_patterns(),
        numeric = parsing.numeric_citations(),
        "parsing config resolved"
    );
    let extractor = CitationExtractor::with_config(parsing);
    let result = extractor.parse(&text);

    let file_name = file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string());

    let format = export_format(config, format, output.as_deref())?;
    tracing::debug!(file = %file_path.display(), ?format, "scan complete");

    match (format, output) {
        (Some(format), Some(path)) => {
            citelink_reporting::export_report(&result, &file_name, format, &path)?;
            eprintln!("Wrote {} report to {}", format.label(), path.display());
        }
        (Some(format), None) => {
            let report = citelink_reporting::render_report(&result, &file_name, format)?;
            let mut stdout = std::io::stdout();
            stdout.write_all(report.as_bytes())?;
            if !report.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
        (None, _) => {
            let use_color = !no_color && config.display().color.unwrap_or(true);
            let color = ColorMode(use_color);
            let mut writer = std::io::stdout();
            output::print_scan_summary(&mut writer, &file_name, &result, color)?;
            output::print_problems(&mut writer, &text, &result, color)?;
            output::print_summary(&mut writer, &result, color)?;
        }
    }

    Ok(())
}

fn check_config(config: &ConfigFile) -> anyhow::Result<()> {
    if let Some(path) = config_file::config_path() {
        println!("# platform config: {}", path.display());
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
