//! shop-crawler - Resilient storefront product extraction CLI
//!
//! Fetches a listing page with TLS fingerprint emulation, extracts products
//! through selector cascades and exports them sorted by price.

use anyhow::Result;
use clap::{Parser, Subcommand};
use shop_crawler::commands::ScrapeCommand;
use shop_crawler::config::{Config, OutputFormat};
use shop_crawler::extract::PriceNormalizer;
use shop_crawler::format::Formatter;
use shop_crawler::sample::sample_products;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shop-crawler",
    version,
    about = "Resilient storefront product extraction CLI",
    long_about = "Extracts product names and prices from e-commerce listing pages whose markup varies, keeping only products from one domain."
)]
struct Cli {
    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Delay before each request in milliseconds
    #[arg(long, global = true)]
    delay: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract products from a listing page
    #[command(alias = "s")]
    Scrape {
        /// Search query (defaults to the configured query)
        query: Option<String>,

        /// Full page URL to fetch instead of a search
        #[arg(long, conflicts_with = "input")]
        url: Option<String>,

        /// Read the page from a saved HTML file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Export file; the extension picks the format (csv, json, md, txt)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum price filter
        #[arg(long)]
        min_price: Option<f64>,

        /// Maximum price filter
        #[arg(long)]
        max_price: Option<f64>,

        /// Domain keywords, any of which must appear in the name (comma-separated)
        #[arg(long, value_delimiter = ',')]
        keywords: Option<Vec<String>>,

        /// Keywords that exclude a product (comma-separated)
        #[arg(long, value_delimiter = ',')]
        exclude: Option<Vec<String>>,

        /// Do not fall back to sample data when nothing is extracted
        #[arg(long)]
        no_sample: bool,

        /// Add a price column converted to this currency code
        #[arg(long)]
        convert_to: Option<String>,

        /// Keep only the cheapest N products
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show the built-in sample products
    Sample,

    /// Print the effective selector and keyword lists
    Selectors,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Scrape {
            query,
            url,
            input,
            output,
            min_price,
            max_price,
            keywords,
            exclude,
            no_sample,
            convert_to,
            limit,
        } => {
            if let Some(query) = query {
                config.query = query;
            }
            if url.is_some() {
                config.url = url;
            }
            if let Some(output) = output {
                config.output = output;
            }
            if min_price.is_some() {
                config.min_price = min_price;
            }
            if max_price.is_some() {
                config.max_price = max_price;
            }
            if let Some(kw) = keywords {
                config.rules.keywords = kw;
            }
            if let Some(ex) = exclude {
                config.rules.exclude_keywords = ex;
            }
            if no_sample {
                config.sample_fallback = false;
            }
            if convert_to.is_some() {
                config.convert_to = convert_to;
            }
            if limit.is_some() {
                config.limit = limit;
            }

            let cmd = ScrapeCommand::new(config).with_input(input);
            let output = cmd.execute().await?;
            println!("{}", output);
        }

        Commands::Sample => {
            let normalizer = PriceNormalizer::new(config.rules.currency_symbol.clone())
                .with_max_amount(config.rules.max_amount);
            let products = sample_products(&normalizer);
            println!("{}", Formatter::new(config.format).format_products(&products));
        }

        Commands::Selectors => {
            let rules = &config.rules;
            let sections: [(&str, Vec<String>); 6] = [
                ("Container selectors", rules.container_selectors.clone()),
                (
                    "Fallback scan",
                    vec![format!(
                        "{} with class containing '{}'",
                        rules.fallback_tags.join(", "),
                        rules.fallback_class_marker
                    )],
                ),
                ("Name selectors", rules.name_selectors.clone()),
                ("Price selectors", rules.price_selectors.clone()),
                ("Domain keywords", rules.keywords.clone()),
                ("Excluded keywords", rules.exclude_keywords.clone()),
            ];

            for (title, entries) in sections {
                println!("{}:", title);
                if entries.is_empty() {
                    println!("  (none)");
                }
                for entry in entries {
                    println!("  {}", entry);
                }
                println!();
            }

            println!(
                "Currency: {} ({}), max amount {:.2}",
                rules.currency_symbol, rules.currency_code, rules.max_amount
            );
        }
    }

    Ok(())
}
