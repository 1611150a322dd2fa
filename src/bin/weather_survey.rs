//! Samples random cities, collects their current weather into `output_data/cities.csv`
//! and regresses each weather variable against latitude.
//!
//! Needs `CITYWEATHER_WEATHER_API_KEY` (a `.env` file works too).

use cityweather::{run_weather_survey, CityWeatherError, Config};
use log::info;

#[tokio::main]
async fn main() -> Result<(), CityWeatherError> {
    dotenvy::dotenv().ok();
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let config = Config::from_env()?;
    let summary = run_weather_survey(&config).await?;

    info!(
        "Survey finished: {} of {} cities stored, {} regressions",
        summary.report.records.len(),
        summary.report.attempted(),
        summary.regressions.len()
    );
    Ok(())
}
