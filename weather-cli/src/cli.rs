use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Text};
use weather_core::{
    Config, UiState, WeatherProjector,
    config::{parse_location, validate_days},
    projector_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default location and day count.
    Configure,

    /// Show current conditions, today's hours and the daily forecast.
    Show {
        /// "lat,lon" to use instead of the configured default.
        #[arg(long)]
        location: Option<String>,

        /// Number of forecast days to request.
        #[arg(long)]
        days: Option<u32>,

        /// Print the decoded response as JSON instead of the text view.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, days, json } => {
                let config = Config::load()?;
                let projector = projector_from_config(&config, location.as_deref(), days)?;
                show(&projector, json).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt aborted")?;
    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }
    config.set_api_key(api_key);

    config.default_location = Text::new("Default location (lat,lon):")
        .with_default(&config.default_location)
        .with_validator(|value: &str| {
            Ok(match parse_location(value) {
                Ok(_) => inquire::validator::Validation::Valid,
                Err(e) => inquire::validator::Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()
        .context("Location prompt aborted")?
        .trim()
        .to_string();

    config.default_days = CustomType::<u32>::new("Forecast days:")
        .with_default(config.default_days)
        .with_error_message("Please enter a whole number")
        .with_validator(|days: &u32| {
            Ok(match validate_days(*days) {
                Ok(()) => inquire::validator::Validation::Valid,
                Err(e) => inquire::validator::Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()
        .context("Day count prompt aborted")?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

/// Follow the projector until it settles on data, offering a retry on errors.
async fn show(projector: &WeatherProjector, json: bool) -> anyhow::Result<()> {
    let mut states = projector.subscribe();

    loop {
        if states.borrow().is_loading() {
            eprintln!("{}", render::loading());
        }

        let state = states
            .wait_for(|s| !s.is_loading())
            .await
            .context("Forecast state channel closed")?
            .clone();

        match state {
            UiState::Success(data) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&data)?);
                } else {
                    print!("{}", render::weather(&data)?);
                }
                return Ok(());
            }
            UiState::Error(message) => {
                eprintln!("{}", render::error(&message));

                let retry = !json
                    && Confirm::new("Retry?")
                        .with_default(true)
                        .prompt()
                        .unwrap_or(false);
                if !retry {
                    bail!("Forecast unavailable");
                }

                log::debug!("Retrying forecast fetch");
                projector.retry();
            }
            UiState::Loading => {}
        }
    }
}
