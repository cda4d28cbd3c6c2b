//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::api::WeatherLookup;
use crate::effect::Effect;
use crate::state::{AppState, FLASH_DISMISS_MS, View, WeatherOutcome};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Search actions =====
        Action::SearchQueryChange(query) => {
            state.search_query = query;
            state.suggestions.clear();
            state.suggestion_selected = 0;
            let token = state.tokens.issue_suggestions();
            if state.search_query.is_empty() {
                state.suggestions_visible = false;
                return DispatchResult::changed();
            }
            DispatchResult::changed_with(Effect::FetchSuggestions {
                token,
                query: state.search_query.clone(),
            })
        }

        Action::SearchSubmit => {
            if state.search_query.is_empty() {
                return DispatchResult::unchanged();
            }
            let token = state.tokens.issue_weather();
            DispatchResult::changed_with(Effect::FetchWeather {
                token,
                lookup: WeatherLookup::CityName {
                    city_name: state.search_query.clone(),
                },
            })
        }

        // ===== Suggestion actions =====
        Action::SuggestionsDidLoad { token, results } => {
            if token != state.tokens.suggestions {
                tracing::debug!(token, "discarding stale suggestions");
                return DispatchResult::unchanged();
            }
            state.suggestions_visible = !results.is_empty();
            state.suggestions = results;
            state.suggestion_selected = 0;
            DispatchResult::changed()
        }

        // The list keeps whatever visibility it had.
        Action::SuggestionsDidError { .. } => DispatchResult::unchanged(),

        Action::SuggestionsHighlight(index) => {
            if index < state.suggestions.len() && index != state.suggestion_selected {
                state.suggestion_selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SuggestionsPick(index) => {
            let Some(city) = state.suggestions.get(index).cloned() else {
                return DispatchResult::unchanged();
            };
            state.search_query = city.name.clone();
            state.suggestions.clear();
            state.suggestions_visible = false;
            state.suggestion_selected = 0;
            // Late answers for the old query must not reopen the list.
            state.tokens.issue_suggestions();
            let token = state.tokens.issue_weather();
            DispatchResult::changed_with(Effect::FetchWeather {
                token,
                lookup: WeatherLookup::Coordinates {
                    lat: city.lat,
                    lon: city.lon,
                    city_name: city.name,
                },
            })
        }

        Action::SuggestionsHide => {
            if state.suggestions_visible {
                state.suggestions_visible = false;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Weather actions =====
        Action::WeatherDidLoad { token, outcome } => {
            if token != state.tokens.weather {
                tracing::debug!(token, "discarding stale weather result");
                return DispatchResult::unchanged();
            }
            state.weather_panel = Some(outcome);
            DispatchResult::changed()
        }

        Action::WeatherDidError { .. } => DispatchResult::unchanged(),

        // ===== Favorite actions =====
        Action::FavoriteAdd(city) => {
            let token = state.tokens.issue_favorite();
            DispatchResult::changed_with(Effect::AddFavorite { token, city })
        }

        Action::FavoriteDidRespond { city_name, reply } => {
            state.alert = Some(if reply.is_success() {
                format!("{city_name} has been added to your favorites!")
            } else {
                "Error adding favorite.".to_string()
            });
            DispatchResult::changed()
        }

        Action::FavoriteDidError { .. } => {
            state.alert = Some("Error adding favorite.".to_string());
            DispatchResult::changed()
        }

        Action::FavoriteDelete(city_name) => {
            let token = state.tokens.issue_favorite();
            DispatchResult::changed_with(Effect::DeleteFavorite { token, city_name })
        }

        Action::FavoriteDeleteDidRespond { city_name, reply } => {
            if !reply.is_success() {
                let message = reply.message.as_deref().unwrap_or("unknown error");
                state.alert = Some(format!("Error removing favorite: {message}"));
                return DispatchResult::changed();
            }
            state.alert = Some(format!("{city_name} has been removed from your favorites."));
            if let DataResource::Loaded(cards) = &mut state.favorites {
                cards.retain(|card| card.city_name != city_name);
                state.favorite_selected = clamp_selection(state.favorite_selected, cards.len());
            }
            DispatchResult::changed()
        }

        Action::FavoriteDeleteDidError { error, .. } => {
            state.alert = Some(format!("Error removing favorite: {error}"));
            DispatchResult::changed()
        }

        Action::FavoriteRefresh {
            city_name,
            lat,
            lon,
        } => {
            let token = state.tokens.issue_refresh(&city_name);
            DispatchResult::changed_with(Effect::RefreshFavorite {
                token,
                city_name,
                lat,
                lon,
            })
        }

        Action::FavoriteRefreshDidLoad {
            city_name,
            token,
            outcome,
        } => {
            if !state.tokens.is_current_refresh(&city_name, token) {
                tracing::debug!(city = %city_name, token, "discarding stale refresh");
                return DispatchResult::unchanged();
            }
            let WeatherOutcome::Report(report) = outcome else {
                return DispatchResult::unchanged();
            };
            let DataResource::Loaded(cards) = &mut state.favorites else {
                return DispatchResult::unchanged();
            };
            // Cards are keyed by the name the backend answers with.
            match cards.iter_mut().find(|card| card.city_name == report.name) {
                Some(card) => {
                    card.apply_report(&report);
                    DispatchResult::changed()
                }
                None => {
                    tracing::debug!(city = %report.name, "no dashboard card for refreshed city");
                    DispatchResult::unchanged()
                }
            }
        }

        Action::FavoriteRefreshDidError { .. } => DispatchResult::unchanged(),

        Action::FavoriteSelect(index) => {
            let len = state.favorite_cards().len();
            if index < len && index != state.favorite_selected {
                state.favorite_selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Dashboard actions =====
        Action::DashboardLoad => {
            if !state.favorites.is_loaded() {
                state.favorites = DataResource::Loading;
            }
            let token = state.tokens.issue_page();
            DispatchResult::changed_with(Effect::LoadDashboard { token })
        }

        Action::DashboardDidLoad { token, page } => {
            if token != state.tokens.page {
                tracing::debug!(token, "discarding stale dashboard page");
                return DispatchResult::unchanged();
            }
            state.favorite_selected = clamp_selection(state.favorite_selected, page.favorites.len());
            state.favorites = DataResource::Loaded(page.favorites);
            state.flash_visible = !page.flashes.is_empty();
            state.flashes = page.flashes;
            if state.flash_visible {
                DispatchResult::changed_with(Effect::ExpireFlash {
                    page: token,
                    delay_ms: FLASH_DISMISS_MS,
                })
            } else {
                DispatchResult::changed()
            }
        }

        Action::DashboardDidError { token, error } => {
            if token != state.tokens.page {
                return DispatchResult::unchanged();
            }
            state.favorites = DataResource::Failed(error);
            state.favorite_selected = 0;
            DispatchResult::changed()
        }

        // ===== Notice actions =====
        Action::NoticeFlashExpire { page } => {
            if page != state.tokens.page || !state.flash_visible {
                return DispatchResult::unchanged();
            }
            state.flash_visible = false;
            DispatchResult::changed()
        }

        Action::NoticeAlertDismiss => {
            if state.alert.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== UI actions =====
        Action::UiToggleView => {
            state.view = state.view.toggle();
            DispatchResult::changed()
        }

        Action::UiShowSearch => {
            if state.view == View::Search {
                return DispatchResult::unchanged();
            }
            state.view = View::Search;
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn clamp_selection(selected: usize, len: usize) -> usize {
    selected.min(len.saturating_sub(1))
}
