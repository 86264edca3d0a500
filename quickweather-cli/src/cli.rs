use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use quickweather_core::{
    CacheStore, Config, Connectivity, Dashboard, DataKind, FileStore, HistoryTracker,
    LocationQuery, NetworkMonitor, OpenWeatherClient, TemperatureUnit, ViewModel,
    provider_from_config,
};
use std::time::Duration;

use crate::render;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "quickweather", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred unit.
    Configure,

    /// Show current conditions, forecast, alerts and air quality.
    Show {
        /// Place name, e.g. "Paris". Defaults to the most recent search.
        place: Option<String>,

        /// Latitude of "my location"; requires --lon.
        #[arg(long, requires = "lon", conflicts_with = "place", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude of "my location"; requires --lat.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Repeat a recent search, 1 being the most recent.
        #[arg(long, conflicts_with_all = ["place", "lat"])]
        recent: Option<usize>,

        /// Display unit (celsius or fahrenheit); overrides the configured one.
        #[arg(long)]
        unit: Option<TemperatureUnit>,

        /// Do not touch the network; show the last saved data.
        #[arg(long)]
        offline: bool,
    },

    /// List or clear recent searches.
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },

    /// Manage the saved copies used when offline.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    List,
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Forget one kind (weather, forecast, hourly, alerts, air_quality), or everything.
    Clear { kind: Option<DataKind> },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                place,
                lat,
                lon,
                recent,
                unit,
                offline,
            } => {
                let target = match (place, lat.zip(lon), recent) {
                    (Some(place), _, _) => Target::Query(LocationQuery::Place(place)),
                    (None, Some((lat, lon)), _) => {
                        Target::Query(LocationQuery::coordinates(lat, lon))
                    }
                    (None, None, Some(n)) => Target::Recent(n),
                    (None, None, None) => Target::Recent(1),
                };
                show(target, unit, offline).await
            }
            Command::History { action } => history(action.unwrap_or(HistoryAction::List)),
            Command::Cache {
                action: CacheAction::Clear { kind },
            } => clear_cache(kind),
        }
    }
}

enum Target {
    Query(LocationQuery),
    Recent(usize),
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt was cancelled")?;

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let start = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    let unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Unit prompt was cancelled")?;

    config.set_api_key(api_key);
    config.unit = unit;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    target: Target,
    unit: Option<TemperatureUnit>,
    offline: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let unit = unit.unwrap_or(config.unit);

    // Cached data needs no key, so offline mode works before `configure`.
    let provider = if offline {
        provider_from_config(&config).or_else(|_| {
            OpenWeatherClient::with_base_url(String::new(), config.base_url())
        })?
    } else {
        provider_from_config(&config)?
    };

    let network = NetworkMonitor::default();
    if offline {
        network.set_status(Connectivity::Offline);
    } else {
        let http = reqwest::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        network.probe(&http, config.base_url()).await;
    }

    let store = FileStore::new(config.data_dir()?);
    tracing::debug!(data_dir = %store.dir().display(), status = %network.status(), "Opening dashboard");
    let mut dashboard = Dashboard::open(provider, store, network)?;

    let query = match target {
        Target::Query(query) => query,
        Target::Recent(n) => {
            let place = n
                .checked_sub(1)
                .and_then(|i| dashboard.history().get(i))
                .cloned()
                .ok_or_else(|| {
                    if dashboard.history().is_empty() {
                        anyhow!("No recent searches. Pass a place name, e.g. `quickweather show Paris`.")
                    } else {
                        anyhow!(
                            "There are only {} recent searches; pick 1..={}.",
                            dashboard.history().len(),
                            dashboard.history().len()
                        )
                    }
                })?;
            LocationQuery::Place(place)
        }
    };

    if !dashboard.network().is_online() {
        eprintln!("You are offline. Showing the last saved data.");
    }

    let result = dashboard.fetch_all(query).await;
    let view = ViewModel::build(&result, unit);

    if let Some(notice) = &view.notice {
        return Err(anyhow!("{notice}"));
    }

    render::print_dashboard(&view, dashboard.history());
    Ok(())
}

fn history(action: HistoryAction) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut history = HistoryTracker::load(FileStore::new(config.data_dir()?))?;

    match action {
        HistoryAction::List => {
            if history.list().is_empty() {
                println!("No recent searches.");
            }
            for (i, place) in history.list().iter().enumerate() {
                println!("{:>2}. {place}", i + 1);
            }
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("Search history cleared.");
        }
    }

    Ok(())
}

fn clear_cache(kind: Option<DataKind>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut cache = CacheStore::new(FileStore::new(config.data_dir()?));
    cache.clear(kind)?;

    match kind {
        Some(kind) => println!("Cleared cached {kind}."),
        None => println!("Cleared all cached data."),
    }
    Ok(())
}
