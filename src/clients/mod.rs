//! HTTP clients for the two third-party services and the traits the batch loops
//! are written against.

pub mod error;
pub mod geoapify;
pub mod open_weather;

use crate::clients::error::LookupError;
use crate::types::lat_lon::LatLon;
use reqwest::{RequestBuilder, StatusCode};

/// Status and raw body of one HTTP exchange.
///
/// Status handling and body parsing are left to the caller so both stay testable
/// without a live service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Current-weather lookup by city name.
#[allow(async_fn_in_trait)]
pub trait WeatherSource {
    async fn current_weather(&self, city: &str) -> Result<ApiResponse, LookupError>;
}

/// Points-of-interest search around a coordinate.
#[allow(async_fn_in_trait)]
pub trait PlaceSource {
    async fn search_places(&self, query: &PlaceQuery) -> Result<ApiResponse, LookupError>;
}

/// A places search constrained to a circle and ranked by proximity to its centre.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub categories: String,
    pub limit: u32,
    pub center: LatLon,
    pub radius_m: u32,
}

impl PlaceQuery {
    /// `circle:<lng>,<lat>,<radius_m>`
    pub fn filter_param(&self) -> String {
        format!(
            "circle:{},{},{}",
            self.center.lon(),
            self.center.lat(),
            self.radius_m
        )
    }

    /// `proximity:<lng>,<lat>`
    pub fn bias_param(&self) -> String {
        format!("proximity:{},{}", self.center.lon(), self.center.lat())
    }
}

/// Sends `request` and reads the body, whatever the status.
pub(crate) async fn send(request: RequestBuilder, url: &str) -> Result<ApiResponse, LookupError> {
    let response = request
        .send()
        .await
        .map_err(|e| LookupError::NetworkRequest(url.to_string(), e))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LookupError::ResponseBody(url.to_string(), e))?;
    Ok(ApiResponse { status, body })
}
