//! Reviews proxy CLI
//!
//! Runs the caching reviews server, or performs a one-off upstream fetch.

use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reviews_api::{ApiConfig, ApiServer};
use reviews_core::constants::PLACE_DETAILS_URL;
use reviews_core::types::PlaceId;
use reviews_places::{PlacesClient, PlacesConfig};

/// Caching proxy for Google Places reviews
#[derive(Parser)]
#[command(name = "reviews-proxy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on (defaults to $PORT, then 3000)
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: IpAddr,
    },

    /// Fetch reviews for a place straight from the Places API, bypassing the cache
    Fetch {
        /// Place identifier
        place_id: String,
        /// Places API key
        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        api_key: String,
        /// Place-details endpoint
        #[arg(long, env = "PLACES_API_URL", default_value = PLACE_DETAILS_URL)]
        places_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap resolves env-backed arguments
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "reviews=debug,info"
    } else {
        "reviews=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, bind).await,
        Commands::Fetch {
            place_id,
            api_key,
            places_url,
        } => cmd_fetch(&place_id, api_key, places_url).await,
    }
}

/// Run the API server
async fn cmd_serve(port: Option<u16>, bind: IpAddr) -> Result<()> {
    let config = ApiConfig::from_env();
    let addr = SocketAddr::new(bind, port.unwrap_or(config.port));
    debug!(?config, %addr, "Resolved server configuration");

    println!("{}", "Starting reviews proxy...".cyan().bold());
    println!("   Places API: {}", config.places_url);
    println!("   Cache TTL:  {}s", config.cache_ttl_seconds);
    println!("   Listening:  http://{}", addr);

    let server = ApiServer::new(config).context("Failed to build server state")?;
    server.run(addr).await.context("Server error")?;

    Ok(())
}

/// Fetch reviews once, without caching
async fn cmd_fetch(place_id: &str, api_key: String, places_url: String) -> Result<()> {
    let place = PlaceId::parse(Some(place_id))?;
    let client = PlacesClient::with_config(PlacesConfig::new(api_key).with_base_url(places_url))?;
    debug!(endpoint = %client.endpoint(), "Using Places endpoint");

    println!("{} {}", "Fetching reviews for".cyan(), place.as_str().bold());

    let snapshot = match client.fetch(&place).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            println!("{} {} ({})", "Fetch failed:".red().bold(), e, e.kind());
            return Err(e.into());
        }
    };

    info!(place = %place, reviews = snapshot.len(), "Fetched reviews");
    println!(
        "{} {} reviews, {} ratings, average {:.1}",
        "Fetched".green().bold(),
        snapshot.len(),
        snapshot.total_reviews,
        snapshot.average_rating
    );
    for review in &snapshot.reviews {
        println!(
            "   {} {}",
            format!("[{}]", review.rating().map(|r| r.to_string()).unwrap_or_else(|| "-".into())).yellow(),
            review.author_name().unwrap_or("anonymous")
        );
    }

    println!("\n{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fetch_reads_key_and_url_from_env() {
        std::env::set_var("GOOGLE_API_KEY", "env-key");
        std::env::set_var("PLACES_API_URL", "http://localhost:9/details");

        let cli = Cli::try_parse_from(["reviews-proxy", "fetch", "place123"]).unwrap();
        match cli.command {
            Commands::Fetch {
                place_id,
                api_key,
                places_url,
            } => {
                assert_eq!(place_id, "place123");
                assert_eq!(api_key, "env-key");
                assert_eq!(places_url, "http://localhost:9/details");
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["reviews-proxy", "-v", "serve"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Serve { port, bind } => {
                assert_eq!(port, None);
                assert_eq!(bind, IpAddr::from([0, 0, 0, 0]));
            }
            _ => panic!("expected serve"),
        }
    }
}
