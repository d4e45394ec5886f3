//! Run a fire-spread simulation and scrub through its time steps.

use anyhow::{Context, Result};
use clap::Parser;
use firesim_cli::{ensure_installed, Config, ConsoleMap};
use firesim_core::{SimulationParameters, SimulationSession, SubmitOutcome};
use firesim_sdk::FireSimClient;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Simulation backend URL (overrides FIRESIM_API_URL)
    #[arg(long)]
    url: Option<String>,

    /// Fire origin latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Fire origin longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Base wind speed in km/h (defaults to current weather)
    #[arg(long)]
    wind_speed: Option<f64>,

    /// Building density, 0-100
    #[arg(long, default_value_t = 40.0)]
    building_density: f64,

    /// Number of time steps to simulate
    #[arg(long, default_value_t = 10)]
    time_steps: u32,

    /// Show zones up to this step instead of scrubbing through all of them
    #[arg(long)]
    step: Option<u32>,

    /// Skip the weather lookup used to pre-seed wind speed
    #[arg(long)]
    no_weather: bool,

    /// Print the result summary as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
                .add_directive("firesim=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let url = args.url.clone().unwrap_or_else(|| config.api_url.clone());
    let client = FireSimClient::with_timeout(url, config.request_timeout)?;

    let lat = args.lat.unwrap_or(config.default_location.latitude);
    let lon = args.lon.unwrap_or(config.default_location.longitude);

    let mut parameters = SimulationParameters {
        building_density: args.building_density,
        time_steps: args.time_steps,
        ..SimulationParameters::default()
    };
    match args.wind_speed {
        Some(wind_speed) => parameters.wind_speed = wind_speed,
        None if !args.no_weather => match client.weather(lat, lon).await {
            Ok(weather) => {
                println!(
                    "Weather: {}°C, wind {} km/h from {}°, humidity {}% ({}, {})",
                    weather.temperature,
                    weather.wind_speed,
                    weather.wind_direction,
                    weather.humidity,
                    weather.description,
                    weather.location
                );
                println!("Source: {}", weather.source);
                parameters = parameters.with_wind_from(&weather);
            }
            Err(err) => warn!(error = %err, "unable to load weather, using default wind speed"),
        },
        None => {}
    }

    let mut session = SimulationSession::new(ConsoleMap::new());
    session.set_origin(lat, lon)?;
    println!("Fire origin: Lat {:.4}, Lon {:.4}", lat, lon);

    let outcome = session
        .submit(&client, parameters)
        .await
        .context("Simulation failed")?;
    if outcome == SubmitOutcome::Stale {
        warn!("simulation response arrived for a replaced session");
    }
    ensure_installed(outcome)?;

    let result = session
        .result()
        .cloned()
        .context("Simulation finished without a result")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary)?);
    } else {
        println!("Urban wind:   {:.1} km/h", result.parameters.urban_wind);
        println!("Spread rate:  {:.2} m/min", result.parameters.spread_rate);
        println!("Max distance: {:.0} m", result.summary.max_distance);
        println!("Total time:   {} min", result.summary.total_time);
    }

    let steps: Vec<u32> = match args.step {
        Some(step) => vec![step],
        None => (0..=result.parameters.time_steps).collect(),
    };
    for step in steps {
        session.set_visible_step(step)?;
        let map = session.layer().map();
        println!(
            "{:>12}: {} zone(s) visible{}",
            result.time_label(step),
            map.visible_steps().len(),
            if map.heat_visible() { " + heat" } else { "" }
        );
    }

    info!("done");
    Ok(())
}
