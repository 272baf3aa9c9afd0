use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use pageseed_core::{
    BatchWriter, ClickHouseClient, ClickHouseConfig, DEFAULT_BATCH_SIZE, DEFAULT_TABLE,
    DEFAULT_TOTAL, EventGenerator, format_duration, format_progress, format_rate,
};

#[derive(Parser, Debug)]
#[command(name = "pageseed")]
#[command(
    about = "Seed a ClickHouse page_events table with synthetic analytics events",
    long_about = "Seed a ClickHouse page_events table with synthetic analytics events.\n\n\
                  Connection settings come from CLICKHOUSE_HOST, CLICKHOUSE_PORT, \
                  CLICKHOUSE_DATABASE, CLICKHOUSE_USER, CLICKHOUSE_PASSWORD and \
                  CLICKHOUSE_CONNECT_TIMEOUT_SECS."
)]
struct Cli {
    /// Number of events to generate
    #[arg(default_value_t = DEFAULT_TOTAL)]
    total: u64,

    /// Events per insert request
    #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: NonZeroUsize,

    /// Target table
    #[arg(short, long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Seed for a reproducible event stream
    #[arg(short, long)]
    seed: Option<u64>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pageseed=info,pageseed_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn create_progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} rows ({per_sec}, eta {eta})")?
            .progress_chars("█▓░"),
    );
    Ok(pb)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Validate configuration early
    let config = match ClickHouseConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    println!(
        "\n{}  {}\n",
        style("pageseed").cyan().bold(),
        style("ClickHouse Seeder").dim()
    );

    let endpoint = config.endpoint();
    let client = ClickHouseClient::new(config, cli.table.as_str())?;

    let spinner = create_spinner(&format!("Connecting to {}...", endpoint))?;
    if let Err(e) = client.ping().await {
        spinner.finish_and_clear();
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
    spinner.finish_with_message(format!(
        "{} Connected: {}",
        style("✓").green().bold(),
        style(&endpoint).dim()
    ));

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let events = EventGenerator::new(cli.total, rng);

    info!(
        total = cli.total,
        batch_size = cli.batch_size.get(),
        table = %client.table(),
        "seeding"
    );

    let started = Instant::now();
    let pb = create_progress_bar(cli.total)?;
    let mut writer = BatchWriter::new(client, cli.batch_size);

    let result = writer
        .write_all(events, |progress| {
            pb.suspend(|| println!("{}", format_progress(&progress)));
            pb.set_position(progress.inserted);
        })
        .await;
    pb.finish_and_clear();

    let inserted = match result {
        Ok(inserted) => inserted,
        Err(e) => {
            eprintln!(
                "{} {} {}",
                style("Error:").red().bold(),
                e,
                style(format!("({} rows inserted before failure)", writer.inserted())).dim()
            );
            std::process::exit(1);
        }
    };

    let elapsed = started.elapsed();
    println!(
        "\n{} Seeded {} rows in {} {}",
        style("✓").green().bold(),
        style(inserted).cyan(),
        format_duration(elapsed),
        style(format!("({})", format_rate(inserted, elapsed))).dim()
    );

    Ok(())
}
