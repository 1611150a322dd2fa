//! Geoapify Places API client.

use crate::clients::error::LookupError;
use crate::clients::{send, ApiResponse, PlaceQuery, PlaceSource};
use reqwest::Client;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "https://api.geoapify.com/v2/places";

/// Name of the first feature in a places response (`features[0].properties.name`).
///
/// # Errors
///
/// [`LookupError::JsonParse`] for a body that is not JSON, [`LookupError::MissingField`]
/// when there are no features or the first one has no name.
pub fn first_place_name(resource: &str, body: &str) -> Result<String, LookupError> {
    let json: Value = serde_json::from_str(body).map_err(|e| LookupError::JsonParse {
        resource: resource.to_string(),
        source: e,
    })?;

    json.pointer("/features/0/properties/name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| LookupError::MissingField {
            resource: resource.to_string(),
            path: "features[0].properties.name".to_string(),
        })
}

pub struct GeoapifyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeoapifyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

impl PlaceSource for GeoapifyClient {
    async fn search_places(&self, query: &PlaceQuery) -> Result<ApiResponse, LookupError> {
        let request = self.client.get(&self.base_url).query(&[
            ("categories", query.categories.clone()),
            ("limit", query.limit.to_string()),
            ("filter", query.filter_param()),
            ("bias", query.bias_param()),
            ("apiKey", self.api_key.clone()),
        ]);
        send(request, &self.base_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_place_name() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Hotel Les Cocotiers","country":"Mauritius"}},
            {"type":"Feature","properties":{"name":"Second"}}
        ]}"#;
        assert_eq!(
            first_place_name("mahebourg", body).unwrap(),
            "Hotel Les Cocotiers"
        );
    }

    #[test]
    fn test_first_place_name_without_results() {
        let empty = r#"{"type":"FeatureCollection","features":[]}"#;
        assert!(matches!(
            first_place_name("x", empty),
            Err(LookupError::MissingField { .. })
        ));

        let unnamed = r#"{"features":[{"properties":{"street":"Rue Royale"}}]}"#;
        assert!(matches!(
            first_place_name("x", unnamed),
            Err(LookupError::MissingField { .. })
        ));

        let error_body = r#"{"statusCode":401,"error":"Unauthorized"}"#;
        assert!(first_place_name("x", error_body).is_err());
        assert!(matches!(
            first_place_name("x", "not json"),
            Err(LookupError::JsonParse { .. })
        ));
    }
}
