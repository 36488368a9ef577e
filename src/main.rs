mod clock;
mod config;
mod elements;
mod predict;
mod service;
mod telemetry;
mod web;

#[cfg(test)]
mod test_support;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use crate::clock::{Clock, FixedClock, SystemClock};
use crate::config::Config;
use crate::predict::Observer;
use crate::service::PassService;
use crate::web::AppState;

#[derive(Parser)]
#[command(name = "iss-pass")]
#[command(about = "Next visible ISS pass for a location on Earth")]
struct Cli {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve,
    /// Predict the next pass over a location
    Pass {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, default_value_t = 0.0)]
        height_km: f64,
        /// Predict from this instant (RFC3339) instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Print the element set in use and where it came from
    Elements,
    /// Print an orbit summary
    Orbit,
    /// Print the live position
    Position,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let client = reqwest::Client::new();

    match cli.command {
        Commands::Serve => serve(config, client).await,
        Commands::Pass {
            lat,
            lon,
            height_km,
            at,
        } => {
            let clock: Arc<dyn Clock> = match at {
                Some(at) => Arc::new(FixedClock(at)),
                None => Arc::new(SystemClock),
            };
            pass(&config, client, clock, Observer::new(lat, lon).with_height_km(height_km)).await
        }
        Commands::Elements => elements(&config, client).await,
        Commands::Orbit => orbit(&config, client).await,
        Commands::Position => position(&config, client).await,
    }
}

fn build_service(
    config: &Config,
    client: reqwest::Client,
    clock: Arc<dyn Clock>,
) -> Option<PassService> {
    match PassService::from_config(config, client, clock) {
        Ok(service) => Some(service),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    }
}

async fn serve(config: Config, client: reqwest::Client) -> ExitCode {
    let Some(service) = build_service(&config, client.clone(), Arc::new(SystemClock)) else {
        return ExitCode::FAILURE;
    };

    let state = AppState {
        config: Arc::new(config),
        service,
        client,
    };

    match web::run_server(state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn pass(
    config: &Config,
    client: reqwest::Client,
    clock: Arc<dyn Clock>,
    observer: Observer,
) -> ExitCode {
    let Some(service) = build_service(config, client, clock) else {
        return ExitCode::FAILURE;
    };

    match service.next_pass_for(observer).await {
        Ok(pass) => {
            let rise = pass
                .window
                .rise_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| pass.window.rise_time.to_string());
            println!("Rise:     {}", rise);
            println!("Duration: {} s", pass.window.duration_seconds);
            println!("Elements: {}", pass.provenance);
            if pass.is_degraded() {
                println!("Note: live orbital data was unavailable, accuracy may be reduced");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn elements(config: &Config, client: reqwest::Client) -> ExitCode {
    let Some(service) = build_service(config, client, Arc::new(SystemClock)) else {
        return ExitCode::FAILURE;
    };

    match service.element_set().await {
        Ok(resolved) => {
            println!("# {}", resolved.provenance);
            if let Some(name) = &resolved.element_set.name {
                println!("{}", name);
            }
            println!("{}", resolved.element_set.to_text());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn orbit(config: &Config, client: reqwest::Client) -> ExitCode {
    let Some(service) = build_service(config, client, Arc::new(SystemClock)) else {
        return ExitCode::FAILURE;
    };

    match service.orbit_info().await {
        Ok((info, provenance)) => {
            let number = |v: Option<f64>, unit: &str| match v {
                Some(v) => format!("{:.4} {}", v, unit),
                None => "unknown".to_string(),
            };
            println!("NORAD id:    {}", info.norad_id);
            if let Some(name) = &info.name {
                println!("Name:        {}", name);
            }
            match info.orbit_number {
                Some(n) => println!("Orbit:       {}", n),
                None => println!("Orbit:       unknown"),
            }
            println!("Inclination: {}", number(info.inclination_deg, "deg"));
            println!("Period:      {}", number(info.period_minutes, "min"));
            println!("Mean motion: {}", number(info.revs_per_day, "rev/day"));
            println!("Epoch:       {}", info.epoch.to_rfc3339());
            println!("Elements:    {}", provenance);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn position(config: &Config, client: reqwest::Client) -> ExitCode {
    let url = config
        .telemetry
        .position_url
        .replace("{norad_id}", &config.satellite.norad_id.to_string());

    match telemetry::fetch_position(&client, &url, config.telemetry.request_timeout).await {
        Ok(p) => {
            println!("Latitude:  {:.4}", p.latitude);
            println!("Longitude: {:.4}", p.longitude);
            println!("Altitude:  {:.1} km", p.altitude);
            println!("Velocity:  {:.0} km/h", p.velocity);
            println!("Timestamp: {}", p.timestamp);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
