use anyhow::Result;
use clap::{Parser, Subcommand};
use feedline_core::{ConfigLoader, FeedError, FeedlineConfig, NewsApiClient, QuakeFeedClient, SourceCatalog};
use futures_util::StreamExt;
use log::LevelFilter;
use std::path::Path;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(
    name = "Feedline",
    author,
    version = "0.1.0",
    about = "Incremental line and record streaming for text feeds"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(
        long,
        short,
        default_value = "feedline.yaml",
        help = "Path to the YAML configuration file; defaults apply when the file is absent"
    )]
    config: String,

    #[clap(long, short, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stream the USGS earthquake feed
    Quakes {
        #[clap(
            long,
            help = "Download the entire feed before printing anything, instead of printing lines as they arrive"
        )]
        eager: bool,

        #[clap(long, help = "Print raw CSV lines instead of formatted records")]
        raw: bool,

        #[clap(long, short = 'n', help = "Stop after this many items")]
        limit: Option<usize>,

        #[clap(long, help = "Override the feed URL from configuration")]
        url: Option<String>,
    },
    /// Fetch and print the news-source directory
    Sources {
        #[clap(long, help = "Override the API key from configuration")]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .init();

    let config = load_config(&cli.config).await?;

    match cli.command {
        Commands::Quakes {
            eager,
            raw,
            limit,
            url,
        } => run_quakes(config, eager, raw, limit, url).await,
        Commands::Sources { api_key } => run_sources(config, api_key).await,
    }
}

async fn load_config(path: &str) -> Result<FeedlineConfig> {
    if Path::new(path).exists() {
        log::info!("Loading configuration from file: {}", path);
        Ok(ConfigLoader::from_file(path).await?)
    } else {
        log::info!("No configuration file at {}; using defaults", path);
        Ok(FeedlineConfig::default())
    }
}

async fn run_quakes(
    config: FeedlineConfig,
    eager: bool,
    raw: bool,
    limit: Option<usize>,
    url: Option<String>,
) -> Result<()> {
    let url = url.unwrap_or(config.quake.url);
    let client = QuakeFeedClient::with_url(url);
    let limit = limit.unwrap_or(usize::MAX);

    log::info!("Fetching earthquake feed from {}", client.url());

    if eager {
        // Materialize-then-iterate: nothing prints until the download is done.
        let lines = client.fetch_all_lines().await?;
        log::info!("Downloaded {} lines", lines.len());
        for line in lines.into_iter().take(limit) {
            println!("{}", line);
        }
        return Ok(());
    }

    if raw {
        let mut lines = client.stream_lines().await?;
        let mut printed = 0;
        while printed < limit {
            match lines.next().await {
                Some(line) => {
                    println!("{}", line?);
                    printed += 1;
                }
                None => break,
            }
        }
        return Ok(());
    }

    let mut records = client.stream_records().await?;
    let mut printed = 0;
    while printed < limit {
        match records.next().await {
            Some(Ok(record)) => {
                println!("{}", record);
                printed += 1;
            }
            Some(Err(FeedError::Parse(msg))) => {
                log::warn!("Skipping malformed feed row: {}", msg);
            }
            Some(Err(e)) => return Err(e.into()),
            None => break,
        }
    }
    Ok(())
}

async fn run_sources(config: FeedlineConfig, api_key: Option<String>) -> Result<()> {
    let mut provider = NewsApiClient::new(config.sources.url)
        .with_timeout(Duration::from_secs(config.sources.timeout_secs));
    if let Some(key) = api_key.or(config.sources.api_key) {
        provider = provider.with_api_key(key);
    }

    let catalog = SourceCatalog::new(Box::new(provider));
    catalog.refresh().await?;

    let sources = catalog.current();
    log::info!("Fetched {} news sources", sources.len());
    for source in sources {
        println!("{:<24} {}", source.id, source.name);
        println!("{:<24} {}", "", source.description);
    }
    Ok(())
}
