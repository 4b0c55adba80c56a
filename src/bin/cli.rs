//! Sales Analytics CLI
//!
//! Command-line interface for Sales Analytics operations:
//! - Fetch and print the dashboard straight from the sales API
//! - Check a running server's refresh status
//! - Trigger a refresh on a running server
//! - Generate a config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sales_analytics::config::{generate_default_config, Config};
use sales_analytics::refresh::{RefreshConfig, RefreshManager, RefreshReport};
use sales_analytics::sales::DashboardView;
use sales_analytics::upstream::SalesApiClient;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "sales-analytics-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sales dashboard aggregator")]
#[command(long_about = "Fetches sales data, aggregates revenue metrics and talks to a running Sales Analytics server.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all datasets once and print the dashboard
    Fetch {
        /// Sales API base URL (default: from config)
        #[arg(long)]
        base_url: Option<String>,
        /// Per-request timeout in milliseconds (default: from config)
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Show a running server's refresh status
    Status {
        /// API server URL
        #[arg(long, default_value = "http://localhost:8050")]
        api_url: String,
    },

    /// Trigger a refresh on a running server
    Refresh {
        /// API server URL
        #[arg(long, default_value = "http://localhost:8050")]
        api_url: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            base_url,
            timeout_ms,
        } => {
            let mut config = Config::load_default().context("failed to load configuration")?;
            if let Some(url) = base_url {
                config.upstream.base_url = url;
            }
            if let Some(ms) = timeout_ms {
                config.upstream.request_timeout_ms = ms;
            }
            config.validate().context("invalid fetch options")?;

            let client = SalesApiClient::new(config.upstream_client_config())
                .context("failed to build HTTP client")?;
            let manager = RefreshManager::new(
                Arc::new(client),
                RefreshConfig {
                    enabled: false,
                    ..Default::default()
                },
            );

            let report = manager.refresh().await;
            print_failures(&report);

            let Some(view) = manager.latest().await else {
                bail!("refresh produced no dashboard");
            };

            match cli.format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(view.as_ref())?);
                }
                "csv" => {
                    print_csv(&view)?;
                }
                _ => {
                    print_table(&view);
                }
            }
        }

        Commands::Status { api_url } => {
            let client = reqwest::Client::new();
            let response = client
                .get(format!("{}/api/v1/refresh/status", api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let status: serde_json::Value = resp.json().await?;

                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(&status)?);
                        return Ok(());
                    }

                    println!("Sales Analytics v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "Polling: {} (every {}s)",
                        if status["enabled"].as_bool().unwrap_or(false) {
                            "enabled"
                        } else {
                            "disabled"
                        },
                        status["interval_secs"].as_u64().unwrap_or(0)
                    );
                    println!(
                        "Refreshes: {}",
                        status["refresh_count"].as_u64().unwrap_or(0)
                    );
                    println!(
                        "Has data: {}",
                        status["has_data"].as_bool().unwrap_or(false)
                    );

                    if let Some(last) = status.get("last_refresh") {
                        println!();
                        println!("Last refresh:");
                        println!("  Started: {}", last["started_at"].as_str().unwrap_or("-"));
                        println!(
                            "  Duration: {}ms",
                            last["duration_ms"].as_u64().unwrap_or(0)
                        );
                        print_resource_rows(last);
                    }
                }
                Ok(resp) => {
                    bail!("API returned error: {}", resp.status());
                }
                Err(e) => {
                    eprintln!("Cannot connect to Sales Analytics API at {}", api_url);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin sales-analytics");
                    return Err(e.into());
                }
            }
        }

        Commands::Refresh { api_url } => {
            let client = reqwest::Client::new();
            let response = client
                .post(format!("{}/api/v1/refresh", api_url))
                .send()
                .await
                .with_context(|| format!("cannot connect to {}", api_url))?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                bail!("Refresh failed ({}): {}", status, text);
            }

            let report: serde_json::Value = response.json().await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Refresh #{} finished in {}ms",
                    report["sequence"].as_u64().unwrap_or(0),
                    report["duration_ms"].as_u64().unwrap_or(0)
                );
                print_resource_rows(&report);
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn print_failures(report: &RefreshReport) {
    for outcome in report.resources.iter().filter(|r| !r.success) {
        eprintln!(
            "warning: {} data unavailable: {}",
            outcome.resource,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}

fn print_resource_rows(report: &serde_json::Value) {
    let Some(resources) = report["resources"].as_array() else {
        return;
    };

    for r in resources {
        let state = if r["success"].as_bool().unwrap_or(false) {
            format!("{} records", r["records"].as_u64().unwrap_or(0))
        } else {
            format!("failed: {}", r["error"].as_str().unwrap_or("-"))
        };
        println!("  {:<10} {}", r["resource"].as_str().unwrap_or("-"), state);
    }
}

fn print_table(view: &DashboardView) {
    println!("Total Revenue:  {}", view.headline.total_revenue);
    println!("Average Order:  {}", view.headline.average_order);
    println!("Top Category:   {}", view.headline.top_category);

    println!();
    println!("{:<20} {:>15} {:>15} {:<12}", "Category", "Revenue", "Avg Price", "Best Day");
    println!("{}", "-".repeat(65));

    if view.category_details.is_empty() {
        println!("No category data");
    }
    for detail in &view.category_details {
        println!(
            "{:<20} {:>15} {:>15} {:<12}",
            detail.category,
            detail.total_revenue,
            detail.average_price,
            detail.day_with_highest_sales
        );
    }

    println!();
    println!("{:<20} {:>15}", "Product", "Sales");
    println!("{}", "-".repeat(36));

    if view.product_performance.is_empty() {
        println!("No product data");
    }
    for bar in &view.product_performance {
        println!("{:<20} {:>15}", bar.product, bar.label);
    }
}

fn print_csv(view: &DashboardView) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());

    for detail in &view.category_details {
        writer.serialize(detail)?;
    }
    // Header is only written with the first record
    if view.category_details.is_empty() {
        writer.write_record([
            "category",
            "total_revenue",
            "average_price",
            "day_with_highest_sales",
        ])?;
    }

    writer.flush()?;
    Ok(())
}
