//! Effect runner - performs one effect and reports the result as an action

use std::time::Duration;

use crate::action::Action;
use crate::api::{ApiClient, WeatherLookup};
use crate::effect::Effect;
use crate::page;

/// Run an effect to completion.
///
/// Transport failures are logged here; the reducer decides what (if
/// anything) the user sees.
pub async fn run(client: &ApiClient, effect: Effect) -> Action {
    match effect {
        Effect::FetchSuggestions { token, query } => match client.suggestions(&query).await {
            Ok(results) => Action::SuggestionsDidLoad { token, results },
            Err(err) => {
                tracing::error!(%err, query = %query, "error fetching city suggestions");
                Action::SuggestionsDidError {
                    token,
                    error: err.to_string(),
                }
            }
        },

        Effect::FetchWeather { token, lookup } => match client.weather(&lookup).await {
            Ok(outcome) => Action::WeatherDidLoad { token, outcome },
            Err(err) => {
                tracing::error!(%err, ?lookup, "error fetching weather data");
                Action::WeatherDidError {
                    token,
                    error: err.to_string(),
                }
            }
        },

        Effect::AddFavorite { city, .. } => match client.add_favorite(&city).await {
            Ok(reply) => Action::FavoriteDidRespond {
                city_name: city.city_name,
                reply,
            },
            Err(err) => {
                tracing::error!(%err, city = %city.city_name, "error favoriting city");
                Action::FavoriteDidError {
                    city_name: city.city_name,
                    error: err.to_string(),
                }
            }
        },

        Effect::DeleteFavorite { city_name, .. } => match client.delete_favorite(&city_name).await {
            Ok(reply) => Action::FavoriteDeleteDidRespond { city_name, reply },
            Err(err) => {
                tracing::error!(%err, city = %city_name, "error removing favorite");
                Action::FavoriteDeleteDidError {
                    city_name,
                    error: err.to_string(),
                }
            }
        },

        Effect::RefreshFavorite {
            token,
            city_name,
            lat,
            lon,
        } => {
            let lookup = WeatherLookup::Favorite {
                city_name: city_name.clone(),
                lat,
                lon,
            };
            match client.weather(&lookup).await {
                Ok(outcome) => Action::FavoriteRefreshDidLoad {
                    city_name,
                    token,
                    outcome,
                },
                Err(err) => {
                    tracing::warn!(%err, city = %city_name, "error refreshing favorite weather");
                    Action::FavoriteRefreshDidError {
                        city_name,
                        token,
                        error: err.to_string(),
                    }
                }
            }
        }

        Effect::LoadDashboard { token } => match client.dashboard_page().await {
            Ok(html) => {
                let page = page::scan_dashboard(&html);
                tracing::info!(
                    favorites = page.favorites.len(),
                    flashes = page.flashes.len(),
                    "dashboard loaded"
                );
                Action::DashboardDidLoad { token, page }
            }
            Err(err) => {
                tracing::error!(%err, "error loading dashboard");
                Action::DashboardDidError {
                    token,
                    error: err.to_string(),
                }
            }
        },

        Effect::ExpireFlash { page, delay_ms } => {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Action::NoticeFlashExpire { page }
        }
    }
}
