//! # Baidu News CLI
//!
//! Searches Baidu News for the given keywords, shows the results in the
//! terminal and optionally saves them as JSON and/or CSV.
//!
//! ## Usage
//!
//! ```sh
//! baidu_news 人工智能 -p 2 -s both
//! ```
//!
//! ## Exit codes
//!
//! - `0`: finished normally, or interrupted with Ctrl-C
//! - `1`: configuration or client setup failed

use baidu_news::cli::{Cli, OutputFormat};
use baidu_news::config::SearchConfig;
use baidu_news::display::display_results;
use baidu_news::outputs::{csv, json};
use baidu_news::scrapers::{Fetcher, NewsSearcher};
use baidu_news::tools::{render_json, render_markdown};
use clap::Parser;
use std::error::Error;
use std::io::{self, IsTerminal};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("baidu_news starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // Ctrl-C ends the process on the spot; exports are renamed into place, never half-written.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted by user");
            eprintln!("\nInterrupted by user");
            std::process::exit(0);
        }
    });

    if let Err(e) = run(&args).await {
        error!(error = %e, "baidu_news failed");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

async fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
    // ---- Configuration ----
    let config = args.apply_overrides(SearchConfig::load(args.config.as_deref())?)?;
    debug!(?config, "Effective configuration");

    let fetcher = Fetcher::http(config.timeout(), config.max_retries)?
        .with_backoff_unit(config.backoff_unit())
        .with_user_agents(config.user_agents.clone());
    let mut searcher = NewsSearcher::new(fetcher);

    // ---- Search ----
    let query = args.query();
    info!(%query, pages = args.page, "Searching Baidu News");
    let records = searcher.search_pages(&query, args.page, config.delay()).await;

    // ---- Display ----
    let page_size = usize::try_from(args.num).unwrap_or(usize::MAX);
    match args.format {
        OutputFormat::Pager => {
            let stdout = io::stdout();
            let clear = stdout.is_terminal();
            display_results(&records, page_size, io::stdin().lock(), stdout.lock(), clear)?;
        }
        OutputFormat::Json => println!("{}", render_json(&records)),
        OutputFormat::Markdown => {
            let heading = match &args.topic {
                Some(topic) => format!("{topic} news results"),
                None => format!("Baidu News results: {query}"),
            };
            print!("{}", render_markdown(&heading, &records));
        }
    }

    // ---- Export ----
    if let Some(save) = args.save {
        if save.includes_json() {
            let path = args.json_path();
            if json::save_json(&records, &path).await {
                println!("Results saved as JSON: {}", path.display());
            }
        }
        if save.includes_csv() {
            let path = args.csv_path();
            if csv::save_csv(&records, &path).await {
                println!("Results saved as CSV: {}", path.display());
            }
        }
    }

    Ok(())
}
