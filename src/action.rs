//! Actions - user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{CitySuggestion, DashboardPage, FavoriteCity, StatusReply, WeatherOutcome};

/// Application actions with automatic category inference
///
/// Results carry the request token they were issued with so the reducer can
/// drop responses that arrive after a newer request.
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Search category =====
    /// Search field text changed
    SearchQueryChange(String),

    /// Search button: look up weather by the typed city name
    SearchSubmit,

    // ===== Suggestions category =====
    /// Result: matching cities loaded
    SuggestionsDidLoad {
        token: u64,
        results: Vec<CitySuggestion>,
    },

    /// Result: suggestion lookup failed
    SuggestionsDidError { token: u64, error: String },

    /// Move the highlight in the suggestion list
    SuggestionsHighlight(usize),

    /// Choose a suggestion (by index) and look up its weather
    SuggestionsPick(usize),

    /// Hide the suggestion list without choosing
    SuggestionsHide,

    // ===== Weather category =====
    /// Result: weather lookup answered (report or error payload)
    WeatherDidLoad { token: u64, outcome: WeatherOutcome },

    /// Result: weather lookup failed in transport
    WeatherDidError { token: u64, error: String },

    // ===== Favorite category =====
    /// Favorite control on a weather card
    FavoriteAdd(FavoriteCity),

    /// Result: `/favorite` replied
    FavoriteDidRespond { city_name: String, reply: StatusReply },

    /// Result: `/favorite` failed in transport
    FavoriteDidError { city_name: String, error: String },

    /// Delete control on a dashboard card
    FavoriteDelete(String),

    /// Result: `/delete_favorite` replied with a 2xx
    FavoriteDeleteDidRespond { city_name: String, reply: StatusReply },

    /// Result: `/delete_favorite` failed (transport or non-2xx)
    FavoriteDeleteDidError { city_name: String, error: String },

    /// Refresh control on a dashboard card
    FavoriteRefresh { city_name: String, lat: f64, lon: f64 },

    /// Result: refresh lookup answered
    FavoriteRefreshDidLoad {
        city_name: String,
        token: u64,
        outcome: WeatherOutcome,
    },

    /// Result: refresh lookup failed in transport
    FavoriteRefreshDidError {
        city_name: String,
        token: u64,
        error: String,
    },

    /// Move the dashboard card selection
    FavoriteSelect(usize),

    // ===== Dashboard category =====
    /// (Re)load the server-rendered dashboard page
    DashboardLoad,

    /// Result: dashboard page scanned
    DashboardDidLoad { token: u64, page: DashboardPage },

    /// Result: dashboard page could not be loaded
    DashboardDidError { token: u64, error: String },

    // ===== Notice category =====
    /// Timer: hide the flash messages of the given page load
    NoticeFlashExpire { page: u64 },

    /// Close the alert
    NoticeAlertDismiss,

    // ===== UI category =====
    /// Switch between the search and dashboard views
    UiToggleView,

    /// Jump to the search view
    UiShowSearch,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Exit the application
    Quit,
}
