//! CLI for bib-blocks - Compile annotated Markdown bibliographies into Notion blocks.

use std::fmt;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use bib_blocks::{
    compile_bibliography_page, compile_blocks, database_url, extract_articles_report,
    extract_section, load_config, render_append_request, render_markdown, BlockNode,
    ExtractReport,
};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Compile annotated Markdown bibliographies into Notion block trees
#[derive(Parser)]
#[command(name = "bib-blocks")]
#[command(version)]
#[command(after_help = "\
Examples:
  bib-blocks compile bibliographies.md --section '## Bibliography 1:' --section-end '## Bibliography 2:'
  bib-blocks compile bib.md --locator https://www.notion.so/abc123 --format markdown
  bib-blocks page bib.md --title 'Attachment Theory' -o page.json
  cat bib.md | bib-blocks articles -")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile the quick-access section (citations and full-text links)
    #[command(after_help = "\
The closing section links to the Articles database. Pass its URL with
--locator, or let it be derived from academicDatabases.articles in the
config file.")]
    Compile {
        #[command(flatten)]
        source: SourceArgs,

        /// URL of the articles catalog linked from the closing section
        #[arg(long, conflicts_with = "config")]
        locator: Option<String>,

        /// Notion config file holding academicDatabases.articles
        #[arg(long, default_value = ".notion-config.json")]
        config: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compile a full annotated bibliography page
    Page {
        #[command(flatten)]
        source: SourceArgs,

        /// Page title
        #[arg(long)]
        title: String,

        /// Introduction paragraph placed under the title
        #[arg(long, default_value = "")]
        intro: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the extracted articles and skipped fragments as JSON
    Articles {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Input Markdown file (use '-' for stdin)
    input: PathBuf,

    /// Only read the text after this marker (e.g. '## Bibliography 1:')
    #[arg(long)]
    section: Option<String>,

    /// Stop the section at this marker
    #[arg(long, requires = "section")]
    section_end: Option<String>,

    /// Fail if any article fragment is skipped
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Notion "append block children" request body
    Json,
    /// Markdown preview
    Markdown,
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — input file not found / unreadable
    InputFile(String),
    /// Exit 11 — config file not found / invalid / incomplete
    Config(String),
    /// Exit 12 — section marker not found in the input
    SectionNotFound(String),
    /// Exit 13 — fragments were skipped in strict mode
    SkippedFragments(String),
    /// Exit 15 — cannot write output
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::Config(_) => 11,
            AppError::SectionNotFound(_) => 12,
            AppError::SkippedFragments(_) => 13,
            AppError::OutputFile(_) => 15,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::Config(msg) => {
                write!(
                    f,
                    "{}\n  hint: pass --locator, or point --config at a file with academicDatabases.articles",
                    msg
                )
            }
            AppError::SectionNotFound(msg) => {
                write!(
                    f,
                    "{}\n  hint: the --section marker must appear verbatim in the input",
                    msg
                )
            }
            AppError::SkippedFragments(msg) => {
                write!(
                    f,
                    "{}\n  hint: each '### Article <n>' needs a **bold citation** and a '**Full-text available at:** https://...' line",
                    msg
                )
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Compile {
            source,
            locator,
            config,
            output,
        } => compile_command(&source, locator.as_deref(), &config, &output),
        Commands::Page {
            source,
            title,
            intro,
            output,
        } => page_command(&source, &title, &intro, &output),
        Commands::Articles { source } => articles_command(&source),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Compile the quick-access section.
fn compile_command(
    source: &SourceArgs,
    locator: Option<&str>,
    config: &Path,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let report = load_articles(source)?;

    let locator = match locator {
        Some(locator) => locator.to_string(),
        None => {
            let config_data = load_config(config)
                .map_err(|e| AppError::Config(format!("'{}': {}", config.display(), e)))?;
            let id = config_data
                .articles_database()
                .map_err(|e| AppError::Config(format!("'{}': {}", config.display(), e)))?;
            database_url(id)
        }
    };
    log::debug!("cross-reference locator: {}", locator);

    let blocks = compile_blocks(&report.articles, &locator);
    emit(&blocks, output)?;
    log::info!(
        "compiled {} article(s) into {} block(s)",
        report.articles.len(),
        blocks.len()
    );
    Ok(())
}

/// Compile a full bibliography page.
fn page_command(
    source: &SourceArgs,
    title: &str,
    intro: &str,
    output: &OutputArgs,
) -> Result<(), AppError> {
    let report = load_articles(source)?;
    let blocks = compile_bibliography_page(title, intro, &report.articles);
    emit(&blocks, output)?;
    log::info!(
        "compiled page '{}' with {} article(s) into {} block(s)",
        title,
        report.articles.len(),
        blocks.len()
    );
    Ok(())
}

/// Print the extraction report.
fn articles_command(source: &SourceArgs) -> Result<(), AppError> {
    let report = load_articles(source)?;
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| AppError::OutputFile(format!("failed to serialize report: {}", e)))?;
    write_to(None, &format!("{}\n", json))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read the input, narrow it to the requested section and extract articles.
fn load_articles(source: &SourceArgs) -> Result<ExtractReport, AppError> {
    // Support '-' for stdin
    let markdown = if source.input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| AppError::InputFile(format!("failed to read from stdin: {}", e)))?;
        buf
    } else {
        fs::read_to_string(&source.input).map_err(|e| {
            AppError::InputFile(format!("'{}': {}", source.input.display(), e))
        })?
    };

    let section = match &source.section {
        Some(start) => extract_section(&markdown, start, source.section_end.as_deref())
            .ok_or_else(|| {
                AppError::SectionNotFound(format!("section marker '{}' not found", start))
            })?,
        None => markdown.as_str(),
    };

    let report = extract_articles_report(section);
    for skipped in &report.skipped {
        log::warn!(
            "skipped article fragment {}: {}",
            skipped.position,
            skipped.reason
        );
    }

    if source.strict && !report.skipped.is_empty() {
        return Err(AppError::SkippedFragments(format!(
            "{} article fragment(s) skipped ({} kept)",
            report.skipped.len(),
            report.articles.len()
        )));
    }

    Ok(report)
}

fn emit(blocks: &[BlockNode], output: &OutputArgs) -> Result<(), AppError> {
    let rendered = match output.format {
        Format::Json => {
            let json = serde_json::to_string_pretty(&render_append_request(blocks))
                .map_err(|e| AppError::OutputFile(format!("failed to serialize blocks: {}", e)))?;
            format!("{}\n", json)
        }
        Format::Markdown => render_markdown(blocks),
    };
    write_to(output.output.as_deref(), &rendered)?;

    if let Some(path) = &output.output {
        eprintln!("wrote {} block(s) to {}", blocks.len(), path.display());
    }
    Ok(())
}

/// Write to a file, or stdout when no path is given.
fn write_to(path: Option<&Path>, content: &str) -> Result<(), AppError> {
    match path {
        Some(path) => fs::write(path, content)
            .map_err(|e| AppError::OutputFile(format!("'{}': {}", path.display(), e))),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(content.as_bytes())
                .map_err(|e| AppError::OutputFile(format!("stdout: {}", e)))
        }
    }
}
