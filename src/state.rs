//! Application state - the UI model every render reads from

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

/// Delay before flash messages from a page load are hidden.
pub const FLASH_DISMISS_MS: u64 = 1500;

/// Where weather icon images are served from.
pub const ICON_URL_BASE: &str = "http://openweathermap.org/img/wn";

/// A candidate city returned by `/get_suggestions`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CitySuggestion {
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl CitySuggestion {
    /// Row label shown in the suggestion list
    pub fn label(&self) -> String {
        format!("{}, {}, {}", self.name, self.state, self.country)
    }
}

/// Current conditions for one city, as returned by `/get_weather`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherReport {
    pub name: String,
    pub temp: f64,
    pub description: String,
    pub icon: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl WeatherReport {
    pub fn title(&self) -> String {
        format!("Weather in {}", self.name)
    }

    pub fn temperature_text(&self) -> String {
        temperature_text(self.temp)
    }

    pub fn description_text(&self) -> String {
        description_text(&self.description)
    }

    pub fn latitude_text(&self) -> String {
        format!("Latitude: {}", coordinate_text(self.lat))
    }

    pub fn longitude_text(&self) -> String {
        format!("Longitude: {}", coordinate_text(self.lon))
    }

    pub fn icon_url(&self) -> String {
        icon_url(&self.icon)
    }

    /// Identity carried by the card's favorite control
    pub fn identity(&self) -> FavoriteCity {
        FavoriteCity {
            city_name: self.name.clone(),
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Result of a weather lookup: a report, or the backend's error payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum WeatherOutcome {
    Report(WeatherReport),
    Error(String),
}

impl WeatherOutcome {
    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            WeatherOutcome::Report(report) => Some(report),
            WeatherOutcome::Error(_) => None,
        }
    }
}

/// City identity submitted to `/favorite`
///
/// Coordinates may be missing when the card came from a name-only lookup;
/// the backend rejects those and the user sees the failure alert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteCity {
    pub city_name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// A favorite city card on the dashboard, keyed by `city_name`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FavoriteCard {
    pub city_name: String,
    pub lat: f64,
    pub lon: f64,
    pub temp_text: Option<String>,
    pub desc_text: Option<String>,
    pub icon_src: Option<String>,
}

impl FavoriteCard {
    pub fn new(city_name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            city_name: city_name.into(),
            lat,
            lon,
            temp_text: None,
            desc_text: None,
            icon_src: None,
        }
    }

    /// Update the refreshable fields in place
    pub fn apply_report(&mut self, report: &WeatherReport) {
        self.temp_text = Some(report.temperature_text());
        self.desc_text = Some(report.description_text());
        self.icon_src = Some(report.icon_url());
    }
}

/// Server-rendered transient notice
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlashMessage {
    pub category: String,
    pub text: String,
}

/// What the client reads out of the server-rendered dashboard page
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardPage {
    pub favorites: Vec<FavoriteCard>,
    pub flashes: Vec<FlashMessage>,
}

/// `{status, message?}` reply from `/favorite` and `/delete_favorite`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatusReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusReply {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Which page of the dashboard is showing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum View {
    #[default]
    Dashboard,
    Search,
}

impl View {
    pub fn toggle(&self) -> Self {
        match self {
            View::Dashboard => View::Search,
            View::Search => View::Dashboard,
        }
    }
}

/// Latest request token issued per query kind.
///
/// Responses echo the token they were issued with; anything that is not the
/// latest for its kind is dropped by the reducer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RequestTokens {
    pub counter: u64,
    pub suggestions: u64,
    pub weather: u64,
    pub page: u64,
    pub refresh: BTreeMap<String, u64>,
}

impl RequestTokens {
    fn issue(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }

    pub fn issue_suggestions(&mut self) -> u64 {
        self.suggestions = self.issue();
        self.suggestions
    }

    pub fn issue_weather(&mut self) -> u64 {
        self.weather = self.issue();
        self.weather
    }

    pub fn issue_page(&mut self) -> u64 {
        self.page = self.issue();
        self.page
    }

    /// Token for a favorite add/delete; replies are never discarded, the
    /// token only keeps their tasks apart
    pub fn issue_favorite(&mut self) -> u64 {
        self.issue()
    }

    pub fn issue_refresh(&mut self, city_name: &str) -> u64 {
        let token = self.issue();
        self.refresh.insert(city_name.to_string(), token);
        token
    }

    pub fn is_current_refresh(&self, city_name: &str, token: u64) -> bool {
        self.refresh.get(city_name) == Some(&token)
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "View", label = "Active", debug_fmt)]
    pub view: View,

    // --- Search page ---
    #[debug(section = "Search", label = "Query")]
    pub search_query: String,

    #[debug(section = "Search", label = "Suggestions shown")]
    pub suggestions_visible: bool,

    #[debug(skip)]
    pub suggestions: Vec<CitySuggestion>,

    #[debug(skip)]
    pub suggestion_selected: usize,

    /// At most one weather card (or error notice) at a time
    #[debug(section = "Search", label = "Weather", debug_fmt)]
    pub weather_panel: Option<WeatherOutcome>,

    // --- Dashboard page ---
    /// Favorite cards from the last page load: Empty → Loading → Loaded/Failed
    #[debug(section = "Dashboard", label = "Favorites", debug_fmt)]
    pub favorites: DataResource<Vec<FavoriteCard>>,

    #[debug(skip)]
    pub favorite_selected: usize,

    // --- Notices ---
    #[debug(skip)]
    pub flashes: Vec<FlashMessage>,

    #[debug(section = "Notices", label = "Flash shown")]
    pub flash_visible: bool,

    #[debug(section = "Notices", label = "Alert", debug_fmt)]
    pub alert: Option<String>,

    #[debug(skip)]
    pub tokens: RequestTokens,
}

impl AppState {
    pub fn new(view: View) -> Self {
        Self {
            view,
            search_query: String::new(),
            suggestions_visible: false,
            suggestions: Vec::new(),
            suggestion_selected: 0,
            weather_panel: None,
            favorites: DataResource::Empty,
            favorite_selected: 0,
            flashes: Vec::new(),
            flash_visible: false,
            alert: None,
            tokens: RequestTokens::default(),
        }
    }

    /// Cards currently on the dashboard (empty unless loaded)
    pub fn favorite_cards(&self) -> &[FavoriteCard] {
        self.favorites.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_favorite(&self) -> Option<&FavoriteCard> {
        self.favorite_cards().get(self.favorite_selected)
    }

    /// The weather card on the search page, if one is showing
    pub fn weather_card(&self) -> Option<&WeatherReport> {
        self.weather_panel.as_ref().and_then(WeatherOutcome::report)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(View::default())
    }
}

pub fn temperature_text(temp: f64) -> String {
    format!("Temperature: {} °C", temp)
}

pub fn description_text(description: &str) -> String {
    format!("Weather: {}", description)
}

pub fn icon_url(icon: &str) -> String {
    format!("{}/{}.png", ICON_URL_BASE, icon)
}

fn coordinate_text(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(temp: f64) -> WeatherReport {
        WeatherReport {
            name: "Lisbon".into(),
            temp,
            description: "clear sky".into(),
            icon: "01d".into(),
            lat: Some(38.72),
            lon: Some(-9.14),
        }
    }

    #[test]
    fn test_temperature_text_keeps_shortest_number() {
        assert_eq!(report(21.5).temperature_text(), "Temperature: 21.5 °C");
        assert_eq!(report(21.0).temperature_text(), "Temperature: 21 °C");
        assert_eq!(report(-3.25).temperature_text(), "Temperature: -3.25 °C");
    }

    #[test]
    fn test_coordinates_fall_back_when_missing() {
        let mut r = report(10.0);
        assert_eq!(r.latitude_text(), "Latitude: 38.72");
        assert_eq!(r.longitude_text(), "Longitude: -9.14");
        r.lat = None;
        assert_eq!(r.latitude_text(), "Latitude: n/a");
    }

    #[test]
    fn test_icon_url() {
        assert_eq!(
            report(1.0).icon_url(),
            "http://openweathermap.org/img/wn/01d.png"
        );
    }

    #[test]
    fn test_suggestion_label() {
        let s = CitySuggestion {
            name: "Springfield".into(),
            state: "Illinois".into(),
            country: "US".into(),
            lat: 39.8,
            lon: -89.6,
        };
        assert_eq!(s.label(), "Springfield, Illinois, US");
    }

    #[test]
    fn test_tokens_are_monotonic_across_kinds() {
        let mut tokens = RequestTokens::default();
        let a = tokens.issue_suggestions();
        let b = tokens.issue_weather();
        let c = tokens.issue_suggestions();
        assert!(a < b && b < c);
        assert_eq!(tokens.suggestions, c);
        assert_eq!(tokens.weather, b);
    }

    #[test]
    fn test_refresh_tokens_are_per_city() {
        let mut tokens = RequestTokens::default();
        let paris = tokens.issue_refresh("Paris");
        let rome = tokens.issue_refresh("Rome");
        assert!(tokens.is_current_refresh("Paris", paris));
        assert!(tokens.is_current_refresh("Rome", rome));
        let paris_again = tokens.issue_refresh("Paris");
        assert!(!tokens.is_current_refresh("Paris", paris));
        assert!(tokens.is_current_refresh("Paris", paris_again));
    }

    #[test]
    fn test_apply_report_updates_refreshable_fields() {
        let mut card = FavoriteCard::new("Lisbon", 38.72, -9.14);
        card.apply_report(&report(18.5));
        assert_eq!(card.temp_text.as_deref(), Some("Temperature: 18.5 °C"));
        assert_eq!(card.desc_text.as_deref(), Some("Weather: clear sky"));
        assert_eq!(
            card.icon_src.as_deref(),
            Some("http://openweathermap.org/img/wn/01d.png")
        );
    }
}
