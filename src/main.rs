//! CLI interface for sky-search

use anyhow::Result;
use clap::{Parser, Subcommand};
use sky_search::{
    airports_near, flight_details, format_duration, search_airports, search_flights, CabinClass,
    Coordinate, LocationFix, Passengers, SearchOutcome, TripCriteria, TripType,
};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sky-search")]
#[command(about = "Flight and airport search against the Sky Scrapper API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for flights between two places
    Search {
        /// Origin airport or city (free text, resolved via autocomplete)
        #[arg(short, long)]
        from: String,
        /// Destination airport or city (free text, resolved via autocomplete)
        #[arg(short, long)]
        to: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Return date for round trips (YYYY-MM-DD)
        #[arg(short, long)]
        return_date: Option<String>,
        /// Number of adults
        #[arg(long, default_value = "1")]
        adults: i32,
        /// Number of children
        #[arg(long, default_value = "0")]
        children: i32,
        /// Number of infants in seat
        #[arg(long, default_value = "0")]
        infants_in_seat: i32,
        /// Number of infants on lap
        #[arg(long, default_value = "0")]
        infants_on_lap: i32,
        /// Cabin class (economy, premium-economy, business, first)
        #[arg(long, default_value = "economy")]
        class: String,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Look up airport and city suggestions for a query
    Airports {
        /// Free-text query
        query: String,
    },
    /// List airports near a coordinate (defaults to the fallback region)
    Nearby {
        /// Latitude
        #[arg(long)]
        lat: Option<f64>,
        /// Longitude
        #[arg(long)]
        lng: Option<f64>,
    },
}

/// Initialize logging to rotating JSON files under logs/
fn init_logging() -> Result<()> {
    let log_dir = PathBuf::from("logs");
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "sky-search.log");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .json(),
        )
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            from,
            to,
            date,
            return_date,
            adults,
            children,
            infants_in_seat,
            infants_on_lap,
            class,
            output,
        } => {
            let origin = resolve_place(&from).await?;
            let destination = resolve_place(&to).await?;

            let criteria = TripCriteria {
                trip_type: if return_date.is_some() {
                    TripType::RoundTrip
                } else {
                    TripType::OneWay
                },
                origin: Some(origin),
                destination: Some(destination),
                departure: Some(TripCriteria::parse_date(&date)?),
                return_date: return_date
                    .as_deref()
                    .map(TripCriteria::parse_date)
                    .transpose()?,
                cabin_class: class.parse::<CabinClass>()?,
                passengers: Passengers::new(adults, children, infants_in_seat, infants_on_lap)?,
            };

            println!("Searching for flights...");
            match search_flights(&criteria).await? {
                SearchOutcome::Results(session) => {
                    info!(
                        session = %session.session_id,
                        itineraries = session.itineraries.len(),
                        "Search succeeded"
                    );
                    let json = serde_json::to_string_pretty(&session.itineraries)?;
                    if let Some(output_file) = output {
                        fs::write(&output_file, &json)?;
                        println!("Results saved to {}", output_file);
                    } else {
                        println!("{}", json);
                    }

                    println!("\nSummary:");
                    println!("Found {} itineraries", session.itineraries.len());
                    if let Some(first) = session.itineraries.first() {
                        println!("Cheapest shown: {}", first.price.formatted);
                        if let Some(leg) = first.first_leg() {
                            println!(
                                "Outbound: {} -> {} ({})",
                                leg.origin_code,
                                leg.destination_code,
                                format_duration(leg.duration_minutes)
                            );
                        }
                        match flight_details(&session, first).await {
                            Ok(detail) => println!(
                                "Booking options for {}: {}",
                                first.id,
                                detail.pricing_options.len()
                            ),
                            Err(e) => println!("Detail lookup: {}", e),
                        }
                    }
                }
                outcome => {
                    if let Some(message) = outcome.user_message() {
                        println!("{}", message);
                    }
                }
            }
        }
        Commands::Airports { query } => {
            let groups = search_airports(&query).await;
            if groups.is_empty() {
                println!("No results found.");
            }
            for group in groups {
                match &group.subtitle {
                    Some(subtitle) => println!("{} — {}", group.title, subtitle),
                    None => println!("{}", group.title),
                }
                for airport in &group.airports {
                    println!("    {}", airport.title);
                }
            }
        }
        Commands::Nearby { lat, lng } => {
            let fix = match (lat, lng) {
                (Some(latitude), Some(longitude)) => LocationFix::Position(Coordinate {
                    latitude,
                    longitude,
                }),
                _ => LocationFix::PermissionDenied,
            };
            match airports_near(&fix).await {
                Ok(airports) => {
                    if let Some(current) = &airports.current {
                        println!("Closest: {}", current.title);
                    }
                    for airport in &airports.nearby {
                        println!("{}", airport.title);
                    }
                }
                Err(e) => {
                    eprintln!("Error fetching nearby airports: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Resolve free text to the first matching suggestion
async fn resolve_place(query: &str) -> Result<sky_search::AirportSuggestion> {
    let groups = search_airports(query).await;
    let suggestion = groups.into_iter().find_map(|group| {
        group
            .direct
            .or_else(|| group.airports.into_iter().next())
    });
    suggestion.ok_or_else(|| anyhow::anyhow!("No airport or city found for '{}'", query))
}
