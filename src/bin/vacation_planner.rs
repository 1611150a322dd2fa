//! Reads `output_data/cities.csv`, keeps the cities with ideal weather and finds
//! a hotel near each of them. Writes `city_map.geojson` and `hotel_map.geojson`.
//!
//! Needs `CITYWEATHER_GEOAPIFY_API_KEY` (a `.env` file works too).

use cityweather::{run_vacation_planner, CityWeatherError, Config};
use log::info;

#[tokio::main]
async fn main() -> Result<(), CityWeatherError> {
    dotenvy::dotenv().ok();
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let config = Config::from_env()?;
    let rows = run_vacation_planner(&config).await?;

    for row in &rows {
        info!(
            "{} ({}) - {}",
            row.city,
            row.country,
            row.hotel_display()
        );
    }
    Ok(())
}
