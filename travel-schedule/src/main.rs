use chrono::{Local, NaiveDate};

use travel_schedule::availability::{AvailabilityChecker, AvailabilityState};
use travel_schedule::cache::{CachedSearchClient, SearchCacheConfig};
use travel_schedule::catalog::{CatalogCache, CountryMatcher};
use travel_schedule::rasp::{RaspClient, RaspConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_schedule=info".into()),
        )
        .init();

    // Get credentials from environment
    let api_key = std::env::var("RASP_APIKEY").unwrap_or_else(|_| {
        eprintln!("Warning: RASP_APIKEY not set. API calls will fail.");
        String::new()
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 4 {
        eprintln!(
            "Usage: travel-schedule <from-city> <from-station> <to-city> <to-station> [YYYY-MM-DD]"
        );
        std::process::exit(2);
    }
    let (from_city, from_station, to_city, to_station) =
        (&args[0], &args[1], &args[2], &args[3]);

    let date = match args.get(4) {
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                eprintln!("Invalid date {raw:?}, expected YYYY-MM-DD");
                std::process::exit(2);
            }
        },
        None => Local::now().date_naive(),
    };

    let client = RaspClient::new(RaspConfig::new(&api_key))
        .expect("Failed to create schedule client");

    // Attribution is required by the provider's terms; show it when reachable.
    if let Ok(copyright) = client.copyright().await
        && let Some(text) = copyright.text()
    {
        println!("{text}");
        println!();
    }

    let catalog = CatalogCache::new(client.clone());
    let search = CachedSearchClient::new(client, &SearchCacheConfig::default());

    let mut checker = AvailabilityChecker::new(catalog, CountryMatcher::russia(), search);
    println!("Checking {from_city} ({from_station}) -> {to_city} ({to_station}) on {date}...");
    checker
        .check_availability(from_city, from_station, to_city, to_station, date)
        .await;

    match checker.state() {
        AvailabilityState::Unknown => println!("Availability could not be determined."),
        AvailabilityState::Unavailable => {
            if let Some(e) = checker.last_error() {
                eprintln!("Check failed: {e}");
            } else {
                println!("No transport found between these stations.");
            }
        }
        AvailabilityState::Available(options) => {
            println!("{} option(s) on {}:", options.len(), options[0].date_text);
            for option in options {
                let transfer = option
                    .transfer_note
                    .as_deref()
                    .map(|note| format!(" ({note})"))
                    .unwrap_or_default();
                println!(
                    "  {} -> {}  {:<10}  {}{}",
                    option.depart, option.arrive, option.duration_text, option.carrier_name, transfer
                );
            }
        }
    }
}
