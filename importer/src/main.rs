//! Tradeload CLI - import broker trade CSVs into a portfolio
//!
//! ```bash
//! tradeload headers                                   # Print the expected CSV header
//! tradeload preview trades.csv -p /portfolio/api/portfolios/1/
//! tradeload import trades.csv -p /portfolio/api/portfolios/1/ --csrf-token $TOKEN
//! ```
//!
//! Settings are read from `TRADELOAD_*` environment variables (and a `.env`
//! file, if present); flags override them.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use tradeload::{
    header_line, parse_file, render_report, BulkSubmitter, ClientContext, ImportState,
    ImportWorkflow, TRADE_HEADERS,
};

#[derive(Parser)]
#[command(name = "tradeload")]
#[command(about = "Bulk-import broker trade CSVs into a portfolio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the expected CSV header line
    Headers,

    /// Parse a CSV file and output the candidate trades as JSON
    Preview {
        /// Input CSV file
        input: PathBuf,

        /// Portfolio URL the trades belong to
        #[arg(short, long)]
        portfolio: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse a CSV file and submit it to the bulk endpoint
    Import {
        /// Input CSV file
        input: PathBuf,

        /// Portfolio URL the trades belong to
        #[arg(short, long)]
        portfolio: String,

        /// API origin (overrides TRADELOAD_API_URL)
        #[arg(long)]
        api_url: Option<String>,

        /// CSRF token (overrides TRADELOAD_CSRF_TOKEN)
        #[arg(long)]
        csrf_token: Option<String>,

        /// Bulk endpoint path (overrides TRADELOAD_BULK_PATH)
        #[arg(long)]
        bulk_path: Option<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Headers => cmd_headers(),

        Commands::Preview {
            input,
            portfolio,
            output,
        } => cmd_preview(&input, &portfolio, output.as_deref()),

        Commands::Import {
            input,
            portfolio,
            api_url,
            csrf_token,
            bulk_path,
        } => cmd_import(&input, &portfolio, api_url, csrf_token, bulk_path).await,
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

type CmdResult = Result<bool, Box<dyn std::error::Error>>;

fn cmd_headers() -> CmdResult {
    println!("{}", header_line(&TRADE_HEADERS));
    Ok(true)
}

fn cmd_preview(input: &Path, portfolio: &str, output: Option<&Path>) -> CmdResult {
    eprintln!("📄 Parsing: {}", input.display());

    let preview = parse_file(input, &TRADE_HEADERS, portfolio)?;
    eprintln!("✅ Parsed {} trades\n", preview.len());
    eprint!("{}", render_report(&preview));

    let json = serde_json::to_string_pretty(&preview.payload())?;
    write_output(&json, output)?;

    Ok(preview.error_count() == 0)
}

async fn cmd_import(
    input: &Path,
    portfolio: &str,
    api_url: Option<String>,
    csrf_token: Option<String>,
    bulk_path: Option<String>,
) -> CmdResult {
    let mut context = ClientContext::from_env()?;
    if let Some(url) = api_url {
        context.base_url = url;
    }
    if let Some(token) = csrf_token {
        context = context.with_csrf_token(token);
    }
    if let Some(path) = bulk_path {
        context = context.with_bulk_path(path);
    }
    context.validate()?;

    let mut workflow = ImportWorkflow::new(portfolio);
    workflow.select_file(input.display().to_string())?;

    let bytes = fs::read(input)?;
    let rows = workflow.load_preview_bytes(&bytes)?;
    eprintln!("📄 {}: {} trades", input.display(), rows);

    let submitter = BulkSubmitter::new(context)?;
    eprintln!("📤 Submitting to {}", submitter.context().bulk_url());

    let state = workflow.submit_with(&submitter).await?;

    match state {
        ImportState::Succeeded => {
            eprintln!("✨ {}", workflow.message().unwrap_or("Import complete"));
            Ok(true)
        }
        _ => {
            eprintln!("\n{}", render_report(workflow.preview()));
            eprintln!("⚠️  {}", workflow.message().unwrap_or("Import rejected"));
            Ok(false)
        }
    }
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
