//! Effects - side effects declared by the reducer

use crate::api::WeatherLookup;
use crate::state::FavoriteCity;

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Query `/get_suggestions`
    FetchSuggestions { token: u64, query: String },
    /// Query `/get_weather` for the search view
    FetchWeather { token: u64, lookup: WeatherLookup },
    /// POST `/favorite`
    AddFavorite { token: u64, city: FavoriteCity },
    /// POST `/delete_favorite`
    DeleteFavorite { token: u64, city_name: String },
    /// Query `/get_weather` for one dashboard card
    RefreshFavorite {
        token: u64,
        city_name: String,
        lat: f64,
        lon: f64,
    },
    /// GET `/dashboard` and scan it
    LoadDashboard { token: u64 },
    /// Hide flash messages of page load `page` after `delay_ms`
    ExpireFlash { page: u64, delay_ms: u64 },
}

impl Effect {
    /// Task key for the spawned request.
    ///
    /// Every key carries the request token. Spawning under a running key
    /// aborts that task, and a favorite or delete POST may already have
    /// reached the server by then.
    pub fn task_key(&self) -> String {
        match self {
            Effect::FetchSuggestions { token, .. } => format!("suggestions_{token}"),
            Effect::FetchWeather { token, .. } => format!("weather_{token}"),
            Effect::AddFavorite { token, city } => {
                format!("favorite_add_{}_{token}", city.city_name)
            }
            Effect::DeleteFavorite { token, city_name } => {
                format!("favorite_delete_{city_name}_{token}")
            }
            Effect::RefreshFavorite {
                token, city_name, ..
            } => format!("refresh_{city_name}_{token}"),
            Effect::LoadDashboard { token } => format!("dashboard_{token}"),
            Effect::ExpireFlash { page, .. } => format!("flash_{page}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_delete_keys_differ() {
        let first = Effect::DeleteFavorite {
            token: 1,
            city_name: "Paris".into(),
        };
        let second = Effect::DeleteFavorite {
            token: 2,
            city_name: "Paris".into(),
        };
        assert_eq!(first.task_key(), "favorite_delete_Paris_1");
        assert_ne!(first.task_key(), second.task_key());
    }

    #[test]
    fn test_repeated_add_keys_differ() {
        let city = FavoriteCity {
            city_name: "Paris".into(),
            lat: Some(48.85),
            lon: Some(2.35),
        };
        let first = Effect::AddFavorite {
            token: 3,
            city: city.clone(),
        };
        let second = Effect::AddFavorite { token: 4, city };
        assert_ne!(first.task_key(), second.task_key());
    }
}
