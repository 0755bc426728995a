use anyhow::Context;
use clap::{Parser, Subcommand};
use sheet_sync::{google, read_sheet_rows, Config, SyncPipeline};
use shared_types::RunSummary;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sheet-sync")]
#[command(about = "Copy unread Gmail messages into a Google Sheet")]
#[command(
    long_about = "Fetches unread inbox messages, appends sender, subject, date and plain-text\n\
    body to a Google Sheet, marks each message read and remembers its ID so it is\n\
    never copied twice. Runs once and exits."
)]
struct Cli {
    /// Path to the TOML configuration file.
    ///
    /// Every setting can also be supplied through SHEET_SYNC_* environment
    /// variables, which take precedence over the file.
    #[arg(
        short,
        long,
        default_value = "sheet-sync.toml",
        env = "SHEET_SYNC_CONFIG"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Copy new unread messages into the sheet (default)
    Run,
    /// Print the rows already stored in the sheet
    Rows,
    /// Print a sample configuration file
    ExampleConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&cli.config).await,
        Commands::Rows => print_rows(&cli.config).await,
        Commands::ExampleConfig => {
            let text = toml::to_string_pretty(&Config::example())
                .context("Failed to render example config")?;
            print!("{}", text);
            Ok(())
        }
    }
}

async fn run(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;

    tracing::info!("Gmail to Sheets sync starting");

    let (gmail, sheets) = google::connect(&config).await?;
    let pipeline = SyncPipeline::new(config, gmail, sheets);
    let summary = pipeline.run().await?;

    print_summary(&summary);
    Ok(())
}

async fn print_rows(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let sheets = google::connect_sheets(&config).await?;
    let rows = read_sheet_rows(&sheets, &config.sheet_name).await?;

    if rows.is_empty() {
        println!("No rows stored in '{}'.", config.sheet_name);
        return Ok(());
    }

    for row in &rows {
        let preview = row.content.lines().next().unwrap_or("");
        println!("{} | {} | {} | {}", row.date, row.from, row.subject, preview);
    }
    println!("{} row(s)", rows.len());
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let rule = "=".repeat(60);
    println!("{}", rule);
    println!("Processing complete");
    println!("New emails processed:        {}", summary.new);
    println!("Already processed (skipped): {}", summary.skipped);
    println!("Failed (retried next run):   {}", summary.failed);
    println!("Total unread emails found:   {}", summary.total);
    println!("{}", rule);
}
