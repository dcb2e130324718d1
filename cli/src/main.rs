use anyhow::{Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use docsearch::session::{self, OutputOptions};
use docsearch_core::{load, FetchConfig, IndexSource};
use std::io;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Query a pre-built full-text search index", long_about = None)]
struct Cli {
    /// Index artifact: a file path or an http(s) URL
    #[arg(long, default_value = "./ezp_index.json")]
    index: String,
    /// Timeout for remote loads in seconds, 0 disables it
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
    /// User-Agent sent when fetching remote artifacts
    #[arg(long)]
    user_agent: Option<String>,
    /// Ignore proxy settings from the environment
    #[arg(long, default_value_t = false)]
    no_proxy: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query, or read one query per line from stdin when none is given
    Search {
        /// Maximum number of hits to print
        #[arg(long, short = 'k', default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        limit: usize,
        /// Print JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
        query: Vec<String>,
    },
    /// Print a single document
    Show {
        doc_id: u32,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print index statistics as JSON
    Stats,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let source: IndexSource = cli.index.parse()?;
    let mut fetch = FetchConfig {
        timeout: (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs)),
        no_proxy: cli.no_proxy,
        ..FetchConfig::default()
    };
    if let Some(ua) = cli.user_agent {
        fetch.user_agent = ua;
    }

    // Only the load suspends; everything after it is synchronous work on the loaded index.
    let runtime = tokio::runtime::Runtime::new()?;
    let index = runtime
        .block_on(load(&source, &fetch))
        .with_context(|| format!("loading index from {source}"))?;
    drop(runtime);

    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Search { limit, json, query } => {
            let opts = OutputOptions { limit, json };
            if query.is_empty() {
                session::interactive(io::stdin().lock(), &mut out, &index, opts)?;
                Ok(())
            } else {
                session::print_query(&mut out, &index, &query.join(" "), opts)
            }
        }
        Commands::Show { doc_id, json } => session::show(&mut out, &index, doc_id, json),
        Commands::Stats => session::stats(&mut out, &index),
    }
}
