use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use skycast_core::{Config, WeatherProvider, provider_from_config};
use tracing::{info, warn};

use crate::{
    output,
    session::{self, Action, Request, Session, Transition},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "skycast",
    version,
    about = "Current weather and 5-day forecast from OpenWeatherMap",
    long_about = "Current weather and 5-day forecast from OpenWeatherMap.\n\n\
                  Without a subcommand, prompts for a city and prints its current weather."
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API keys in the config file.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City or location name, e.g. "Belfast" or "Paris,FR".
        city: String,
    },

    /// Show the 5-day forecast for a city, one summary per day.
    Forecast {
        /// City or location name.
        city: String,
    },

    /// Interactive session with map and forecast actions.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure()?,
            None => {
                let config = load_config()?;
                println!(
                    "{}",
                    output::format_credentials(
                        config.has_llm_api_key(),
                        config.weather_api_key().is_ok()
                    )
                );
                let provider = provider_from_config(&config)?;

                let prompt = Text::new("Enter a city to check the weather:").prompt();
                let Some(city) = cancellable(prompt)? else {
                    return Ok(());
                };
                println!("{}", weather_text(provider.as_ref(), city.trim()).await);
            }
            Some(Command::Show { city }) => {
                println!("{}", weather_text(load_provider()?.as_ref(), city.trim()).await);
            }
            Some(Command::Forecast { city }) => {
                println!("{}", forecast_text(load_provider()?.as_ref(), city.trim()).await);
            }
            Some(Command::Interactive) => run_interactive(load_provider()?.as_ref()).await?,
        }

        Ok(())
    }
}

fn load_config() -> Result<Config> {
    let config = Config::load()?;
    info!(
        weather_key = config.api_key.is_some(),
        llm_key = config.has_llm_api_key(),
        "credentials loaded"
    );
    Ok(config)
}

/// Load config, validate the credential once, and build the provider.
fn load_provider() -> Result<Box<dyn WeatherProvider>> {
    provider_from_config(&load_config()?)
}

/// Report text, or the failure text: lookups never fail the command.
async fn weather_text(provider: &dyn WeatherProvider, city: &str) -> String {
    match provider.current_weather(city).await {
        Ok(report) => output::format_report(&report),
        Err(err) => {
            warn!(%city, status = ?err.status(), error = %err, "weather lookup failed");
            output::WEATHER_FAILURE.to_string()
        }
    }
}

async fn forecast_text(provider: &dyn WeatherProvider, city: &str) -> String {
    match provider.forecast(city).await {
        Ok(days) => output::format_forecast(&days),
        Err(err) => {
            warn!(%city, status = ?err.status(), error = %err, "forecast lookup failed");
            output::FORECAST_FAILURE.to_string()
        }
    }
}

async fn run_interactive(provider: &dyn WeatherProvider) -> Result<()> {
    println!("🌍 Weather Checker");
    println!("Enter a city to see the current weather and forecast! 🌦️\n");

    let mut session = Session::default();

    loop {
        let prompt = Select::new("What would you like to do?", session.actions()).prompt();
        let Some(action) = cancellable(prompt)? else {
            break;
        };

        let request = match action {
            Action::Quit => break,
            Action::CheckWeather => {
                let input = Text::new("City Name")
                    .with_default(session.city_prompt_default())
                    .prompt();
                let Some(city) = cancellable(input)? else {
                    continue;
                };
                let city = city.trim();
                let city = if city.is_empty() {
                    session.city_prompt_default()
                } else {
                    city
                };
                Request::Check(city.to_string())
            }
            Action::ShowMap => Request::ShowMap,
            Action::ShowForecast => Request::ShowForecast,
        };

        let open_map = request == Request::ShowMap;
        let Transition {
            session: next,
            output: text,
        } = session::dispatch(session, request, provider).await;
        session = next;

        if let Some(report) = &session.report {
            println!("\n{report}\n");
        }
        if let Some(text) = text {
            println!("{text}\n");
        }
        if open_map {
            if let Some(url) = session.map_url() {
                if let Err(err) = webbrowser::open(&url) {
                    warn!(error = %err, "could not open browser");
                }
            }
        }
    }

    Ok(())
}

/// Esc / Ctrl-C become `None`; other prompt errors propagate.
fn cancellable<T>(answer: Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn configure() -> Result<()> {
    let path = Config::config_file_path()?;
    // File layer only; environment overrides are never written back.
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read OpenWeather API key")?;
    config.api_key = Some(api_key.trim().to_string());

    let llm_key = Password::new("LLM API key (leave empty to skip):")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read LLM API key")?;
    if !llm_key.trim().is_empty() {
        config.llm_api_key = Some(llm_key.trim().to_string());
    }

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProvider;

    #[tokio::test]
    async fn weather_text_renders_report() {
        let provider = FakeProvider::default();

        let text = weather_text(&provider, "Belfast").await;

        assert!(text.contains("Weather in Belfast"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn failed_lookups_print_fixed_failure_text() {
        let provider = FakeProvider::failing();

        assert_eq!(
            weather_text(&provider, "Atlantis").await,
            output::WEATHER_FAILURE
        );
        assert_eq!(
            forecast_text(&provider, "Atlantis").await,
            output::FORECAST_FAILURE
        );
    }

    #[tokio::test]
    async fn forecast_text_renders_days() {
        let provider = FakeProvider::default();

        let text = forecast_text(&provider, "Belfast").await;

        assert!(text.contains("📅 2024-01-01 (Mon)"));
        assert!(text.contains("Condition: Clear"));
    }

    #[test]
    fn no_subcommand_is_batch_mode() {
        let cli = Cli::try_parse_from(["skycast"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_show_with_city() {
        let cli = Cli::try_parse_from(["skycast", "show", "Belfast"]).expect("parse");
        assert!(matches!(cli.command, Some(Command::Show { city }) if city == "Belfast"));
    }

    #[test]
    fn verbose_is_global_and_counted() {
        let cli = Cli::try_parse_from(["skycast", "forecast", "Paris,FR", "-vv"]).expect("parse");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::Forecast { city }) if city == "Paris,FR"));
    }

    #[test]
    fn show_requires_city() {
        assert!(Cli::try_parse_from(["skycast", "show"]).is_err());
    }

    #[test]
    fn cancelled_prompt_is_none() {
        let answer: Result<String, InquireError> = Err(InquireError::OperationCanceled);
        assert!(cancellable(answer).expect("not an error").is_none());
    }

    #[test]
    fn clap_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
