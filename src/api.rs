//! Dashboard backend HTTP client

use reqwest::header::{COOKIE, HeaderMap, HeaderValue, InvalidHeaderValue};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::state::{
    CitySuggestion, FavoriteCity, StatusReply, WeatherOutcome, WeatherReport,
};

/// Backend client error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Network response was not ok ({0})")]
    Status(StatusCode),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid cookie header: {0}")]
    Cookie(#[from] InvalidHeaderValue),
}

/// How a weather lookup identifies the city
#[derive(Clone, Debug, PartialEq)]
pub enum WeatherLookup {
    /// Search button: name only
    CityName { city_name: String },
    /// Chosen suggestion
    Coordinates { lat: f64, lon: f64, city_name: String },
    /// Dashboard card refresh
    Favorite { city_name: String, lat: f64, lon: f64 },
}

impl WeatherLookup {
    fn query(&self) -> String {
        match self {
            WeatherLookup::CityName { city_name } => {
                format!("city_name={}", urlencoding::encode(city_name))
            }
            WeatherLookup::Coordinates {
                lat,
                lon,
                city_name,
            } => format!(
                "lat={}&lon={}&city_name={}",
                lat,
                lon,
                urlencoding::encode(city_name)
            ),
            WeatherLookup::Favorite {
                city_name,
                lat,
                lon,
            } => format!(
                "city_name={}&lat={}&lon={}",
                urlencoding::encode(city_name),
                lat,
                lon
            ),
        }
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// `/get_weather` body before it is split into report or error.
///
/// The backend echoes `lat`/`lon` from the query string, so they arrive as
/// strings, numbers or null.
#[derive(Debug, Deserialize)]
struct WeatherPayload {
    #[serde(default)]
    error: Option<String>,
    name: Option<String>,
    temp: Option<f64>,
    description: Option<String>,
    icon: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    lon: Option<f64>,
}

impl WeatherPayload {
    fn into_outcome(self) -> Result<WeatherOutcome, ApiError> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Ok(WeatherOutcome::Error(error));
        }
        let missing = |field: &str| ApiError::Decode(format!("weather payload missing `{field}`"));
        Ok(WeatherOutcome::Report(WeatherReport {
            name: self.name.ok_or_else(|| missing("name"))?,
            temp: self.temp.ok_or_else(|| missing("temp"))?,
            description: self.description.ok_or_else(|| missing("description"))?,
            icon: self.icon.ok_or_else(|| missing("icon"))?,
            lat: self.lat,
            lon: self.lon,
        }))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoordinateRepr {
    Number(f64),
    Text(String),
}

fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<CoordinateRepr>::deserialize(deserializer)? {
            Some(CoordinateRepr::Number(value)) => Some(value),
            Some(CoordinateRepr::Text(text)) => text.trim().parse().ok(),
            None => None,
        },
    )
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    city_name: &'a str,
}

/// Parse a `/get_weather` body
pub fn parse_weather(body: &str) -> Result<WeatherOutcome, ApiError> {
    let payload: WeatherPayload =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    payload.into_outcome()
}

// ============================================================================
// Client
// ============================================================================

/// Client for the dashboard backend
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client; `cookie` is forwarded verbatim on every request
    pub fn new(base_url: &str, cookie: Option<&str>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn suggestions_url(&self, query: &str) -> String {
        format!(
            "{}/get_suggestions?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    pub fn weather_url(&self, lookup: &WeatherLookup) -> String {
        format!("{}/get_weather?{}", self.base_url, lookup.query())
    }

    /// Cities matching a partial name
    pub async fn suggestions(&self, query: &str) -> Result<Vec<CitySuggestion>, ApiError> {
        let response = self.http.get(self.suggestions_url(query)).send().await?;
        Ok(response.json().await?)
    }

    /// Current weather, or the backend's error payload
    pub async fn weather(&self, lookup: &WeatherLookup) -> Result<WeatherOutcome, ApiError> {
        let response = self.http.get(self.weather_url(lookup)).send().await?;
        let body = response.text().await?;
        parse_weather(&body)
    }

    /// POST `/favorite`; any JSON reply is returned whatever its HTTP status
    pub async fn add_favorite(&self, city: &FavoriteCity) -> Result<StatusReply, ApiError> {
        let response = self
            .http
            .post(format!("{}/favorite", self.base_url))
            .json(city)
            .send()
            .await?;
        Ok(response.json().await?)
    }

    /// POST `/delete_favorite`; a non-2xx status is an error
    pub async fn delete_favorite(&self, city_name: &str) -> Result<StatusReply, ApiError> {
        let response = self
            .http
            .post(format!("{}/delete_favorite", self.base_url))
            .json(&DeleteRequest { city_name })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Raw HTML of the server-rendered dashboard page
    pub async fn dashboard_page(&self) -> Result<String, ApiError> {
        let response = self
            .http
            .get(format!("{}/dashboard", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:5000/", None).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_suggestions_url_encodes_query() {
        assert_eq!(
            client().suggestions_url("São Paulo"),
            "http://localhost:5000/get_suggestions?query=S%C3%A3o%20Paulo"
        );
    }

    #[test]
    fn test_weather_urls() {
        let c = client();
        assert_eq!(
            c.weather_url(&WeatherLookup::CityName {
                city_name: "New York".into()
            }),
            "http://localhost:5000/get_weather?city_name=New%20York"
        );
        assert_eq!(
            c.weather_url(&WeatherLookup::Coordinates {
                lat: 51.5,
                lon: -0.12,
                city_name: "London".into()
            }),
            "http://localhost:5000/get_weather?lat=51.5&lon=-0.12&city_name=London"
        );
        assert_eq!(
            c.weather_url(&WeatherLookup::Favorite {
                city_name: "London".into(),
                lat: 51.5,
                lon: -0.12
            }),
            "http://localhost:5000/get_weather?city_name=London&lat=51.5&lon=-0.12"
        );
    }

    #[test]
    fn test_parse_weather_report_with_string_coordinates() {
        let body = r#"{"name":"Oslo","temp":-4,"description":"light snow","icon":"13n","lat":"59.91","lon":"10.75"}"#;
        let outcome = parse_weather(body).unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.name, "Oslo");
        assert_eq!(report.temp, -4.0);
        assert_eq!(report.lat, Some(59.91));
        assert_eq!(report.lon, Some(10.75));
    }

    #[test]
    fn test_parse_weather_null_coordinates() {
        let body = r#"{"name":"Oslo","temp":1.5,"description":"mist","icon":"50d","lat":null,"lon":null}"#;
        let report = parse_weather(body).unwrap().report().cloned().unwrap();
        assert_eq!(report.lat, None);
        assert_eq!(report.lon, None);
    }

    #[test]
    fn test_parse_weather_error_payload_wins() {
        let outcome = parse_weather(r#"{"error":"Weather data not found"}"#).unwrap();
        assert_eq!(outcome, WeatherOutcome::Error("Weather data not found".into()));
    }

    #[test]
    fn test_parse_weather_incomplete_payload_is_decode_error() {
        let err = parse_weather(r#"{"name":"Oslo"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(err.to_string().contains("temp"));
    }

    #[test]
    fn test_parse_weather_rejects_non_json() {
        assert!(matches!(
            parse_weather("<html>login</html>"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_cookie_must_be_valid_header() {
        assert!(ApiClient::new("http://localhost", Some("session=abc")).is_ok());
        assert!(matches!(
            ApiClient::new("http://localhost", Some("bad\nvalue")),
            Err(ApiError::Cookie(_))
        ));
    }
}
