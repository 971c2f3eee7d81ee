//! Pricelens - marketplace price search CLI
//!
//! The `pricelens` command searches several marketplaces at once and lines up
//! listings of the same product.
//!
//! ## Commands
//!
//! - `search`: Query marketplaces concurrently and print results per source
//! - `categories`: List the categories of an offline catalog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pricelens_core::{
    comparison_rows, parse_timeout_secs, AggregationResult, Aggregator, CatalogFetcher,
    ComparisonRow, HttpSourceFetcher, PricelensConfig, SearchRequest, Source, SourceFetcher,
    SourceOutcome, SourceQuery,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "pricelens")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compare product prices across marketplaces", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search marketplaces for a product
    Search {
        /// Search text
        query: String,

        /// Marketplace to query (repeatable)
        #[arg(short, long = "platform", default_values = ["amazon", "flipkart"])]
        platforms: Vec<String>,

        /// Pair matching listings across the first two marketplaces
        #[arg(long)]
        compare: bool,

        /// Per-marketplace deadline in seconds (overrides PRICELENS_TIMEOUT_SECS)
        #[arg(long)]
        timeout_secs: Option<String>,

        /// RapidAPI key for live searches
        #[arg(long, env = "RAPIDAPI_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Serve results from an offline catalog instead of live APIs
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Print the result as JSON on stdout
        #[arg(long)]
        output_json: bool,
    },

    /// List categories of an offline catalog
    Categories {
        /// Catalog file (JSON)
        #[arg(long)]
        catalog: PathBuf,
    },
}

struct SearchOptions<'a> {
    query: &'a str,
    platforms: &'a [String],
    compare: bool,
    timeout_secs: Option<&'a str>,
    api_key: Option<&'a str>,
    catalog: Option<&'a Path>,
}

/// Search output as printed with `--output-json`.
#[derive(Debug, Serialize)]
struct SearchReport {
    query: String,
    results: AggregationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<Vec<ComparisonRow>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    pricelens_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Search {
            query,
            platforms,
            compare,
            timeout_secs,
            api_key,
            catalog,
            output_json,
        } => {
            let options = SearchOptions {
                query: &query,
                platforms: &platforms,
                compare,
                timeout_secs: timeout_secs.as_deref(),
                api_key: api_key.as_deref(),
                catalog: catalog.as_deref(),
            };
            let report = cmd_search(&options).await?;
            if output_json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Commands::Categories { catalog } => cmd_categories(&catalog),
    }
}

async fn cmd_search(options: &SearchOptions<'_>) -> Result<SearchReport> {
    let mut config = PricelensConfig::from_env().context("Invalid pricelens environment")?;
    if let Some(raw) = options.timeout_secs {
        config = config.with_timeout(parse_timeout_secs(raw)?);
    }
    if let Some(key) = options.api_key {
        config = config.with_api_key(key);
    }

    let request = SearchRequest::new(options.query, options.platforms.iter().cloned());
    let query = request.validate()?;
    let compare_pair = if options.compare {
        Some(comparison_sources(&query)?)
    } else {
        None
    };

    let fetcher: Arc<dyn SourceFetcher> = match options.catalog {
        Some(path) => Arc::new(
            CatalogFetcher::from_path(path)
                .with_context(|| format!("Failed to load catalog {:?}", path))?,
        ),
        None => Arc::new(HttpSourceFetcher::new(config.clone())?),
    };

    info!(query = %query.text(), sources = query.sources().len(), "searching");
    let aggregator = Aggregator::new(fetcher, config.per_source_timeout);
    let results = aggregator.aggregate(&query).await;

    let comparison =
        compare_pair.map(|(left, right)| comparison_rows(results.match_sources(left, right)));

    Ok(SearchReport {
        query: query.text().to_string(),
        results,
        comparison,
    })
}

/// The first two requested sources in identifier order.
fn comparison_sources(query: &SourceQuery) -> Result<(Source, Source)> {
    let mut sources = query.sources().iter().copied();
    match (sources.next(), sources.next()) {
        (Some(left), Some(right)) => Ok((left, right)),
        _ => anyhow::bail!("--compare needs at least two platforms"),
    }
}

fn cmd_categories(catalog: &Path) -> Result<()> {
    let fetcher = CatalogFetcher::from_path(catalog)
        .with_context(|| format!("Failed to load catalog {:?}", catalog))?;
    for category in fetcher.categories() {
        println!("{}", category);
    }
    Ok(())
}

fn print_report(report: &SearchReport) {
    println!("Results for \"{}\"", report.query);
    for (source, outcome) in report.results.iter() {
        println!();
        match outcome {
            SourceOutcome::Records(records) => {
                println!("{} ({} results)", source.display_name(), records.len());
                for record in records {
                    println!(
                        "  {:>10.2}  {:.1}★ ({})  {}  [{}]",
                        record.price,
                        record.rating,
                        record.review_count,
                        record.product_name,
                        record.availability
                    );
                }
            }
            SourceOutcome::Failed(failure) => {
                println!("{}: {}", source.display_name(), failure.error);
            }
        }
    }

    if let Some(rows) = &report.comparison {
        println!();
        println!("Matched products ({})", rows.len());
        for row in rows {
            println!(
                "  {:.2}  {}  |  {}",
                row.pair.similarity_score(),
                row.pair.left().product_name,
                row.pair.right().product_name
            );
            println!(
                "        {:.2} vs {:.2}  {:?} (saves {:.2}, {:.1}%)",
                row.pair.left().price,
                row.pair.right().price,
                row.comparison.verdict,
                row.comparison.savings,
                row.comparison.percent_less
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    const CATALOG: &str = r#"{
        "products": {
            "mice": [
                { "name": "Logitech M331 Silent Wireless Mouse", "category": "mice",
                  "amazon": { "price": 1095 }, "flipkart": { "price": 1049 } }
            ],
            "keyboards": [
                { "name": "Zebronics K20 Keyboard", "category": "keyboards",
                  "amazon": { "price": 399 } }
            ]
        }
    }"#;

    fn catalog_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        file
    }

    fn options<'a>(
        query: &'a str,
        platforms: &'a [String],
        catalog: Option<&'a Path>,
    ) -> SearchOptions<'a> {
        SearchOptions {
            query,
            platforms,
            compare: true,
            timeout_secs: Some("2"),
            api_key: None,
            catalog,
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_defaults_to_both_platforms() {
        let cli = Cli::try_parse_from(["pricelens", "search", "mouse"]).unwrap();
        match cli.command {
            Commands::Search { platforms, .. } => assert_eq!(platforms, ["amazon", "flipkart"]),
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_search_accepts_repeated_platforms() {
        let cli =
            Cli::try_parse_from(["pricelens", "search", "mouse", "-p", "flipkart", "--compare"])
                .unwrap();
        match cli.command {
            Commands::Search {
                platforms, compare, ..
            } => {
                assert_eq!(platforms, ["flipkart"]);
                assert!(compare);
            }
            _ => panic!("expected search"),
        }
    }

    #[tokio::test]
    async fn test_cmd_search_from_catalog_compares_sources() {
        let file = catalog_file();
        let platforms = vec!["amazon".to_string(), "flipkart".to_string()];
        let report = cmd_search(&options("mouse", &platforms, Some(file.path())))
            .await
            .unwrap();

        assert_eq!(report.results.len(), 2);
        let rows = report.comparison.as_ref().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pair.right().price, 1049.0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"]["amazon"][0]["price"], 1095.0);
    }

    #[tokio::test]
    async fn test_cmd_search_rejects_unknown_platform() {
        let file = catalog_file();
        let platforms = vec!["amazon".to_string(), "ebay".to_string()];
        let err = cmd_search(&options("mouse", &platforms, Some(file.path())))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ebay"));
    }

    #[tokio::test]
    async fn test_compare_needs_two_platforms() {
        let file = catalog_file();
        let platforms = vec!["amazon".to_string()];
        let err = cmd_search(&options("mouse", &platforms, Some(file.path())))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("two platforms"));
    }

    #[tokio::test]
    async fn test_compare_is_checked_before_any_fetcher_is_built() {
        // The catalog does not exist, so building a fetcher would fail first.
        let platforms = vec!["flipkart".to_string()];
        let missing = Path::new("/nonexistent/catalog.json");
        let err = cmd_search(&options("mouse", &platforms, Some(missing)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("two platforms"), "{err:#}");
    }

    #[test]
    fn test_comparison_sources_use_identifier_order() {
        let query = SourceQuery::new("mouse", [Source::Flipkart, Source::Amazon]).unwrap();
        assert_eq!(
            comparison_sources(&query).unwrap(),
            (Source::Amazon, Source::Flipkart)
        );
    }

    #[test]
    fn test_categories_reads_catalog() {
        let file = catalog_file();
        assert!(cmd_categories(file.path()).is_ok());
        assert!(cmd_categories(Path::new("/nonexistent/catalog.json")).is_err());
    }
}
