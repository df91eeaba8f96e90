use anyhow::Context;
use bom_climate::{ClimateAnalyzer, StoreBackend};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Summarise BoM weather observations by time of day"
)]
struct Cli {
    /// Log debug diagnostics (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    /// Keep the observation snapshot in a Parquet file under this directory
    /// instead of in memory
    #[arg(long, value_name = "DIR")]
    scratch_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// BoM observation JSON files
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn setup_logger(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    setup_logger(&cli);

    let backend = match &cli.scratch_dir {
        Some(dir) => StoreBackend::TempFile { dir: dir.clone() },
        None => StoreBackend::InMemory,
    };
    let mut analyzer = ClimateAnalyzer::builder().backend(backend).build();

    analyzer.ingest_files(&cli.files).await?;
    let report = analyzer.analyze()?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", report);
    }
    Ok(())
}
