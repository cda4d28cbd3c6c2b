//! Store and component tests
//!
//! EffectStore drives the reducer directly; TestHarness feeds key strings
//! through the screen's event handler.

use citydash::{
    action::Action,
    api::WeatherLookup,
    components::{AppView, AppViewProps, Component},
    effect::Effect,
    reducer::reducer,
    state::{AppState, FavoriteCard, StatusReply, View, WeatherOutcome, WeatherReport},
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_dispatch::testing::*;
use tui_dispatch::{DataResource, EffectStore, EventKind, NumericComponentId};

fn send(harness: &mut TestHarness<AppState, Action>, keys: &str) -> Vec<Action> {
    let mut view = AppView::new();
    harness.send_keys::<NumericComponentId, _, _>(keys, |state, event| {
        view.handle_event(
            &event.kind,
            AppViewProps {
                state,
                is_focused: true,
            },
        )
        .into_iter()
        .collect::<Vec<_>>()
    })
}

#[test]
fn test_initial_state_is_dashboard() {
    let store = EffectStore::new(AppState::default(), reducer);
    assert_eq!(store.state().view, View::Dashboard);
    assert!(store.state().favorites.is_empty());
    assert!(store.state().alert.is_none());
}

#[test]
fn test_search_button_looks_up_by_name() {
    let mut store = EffectStore::new(AppState::new(View::Search), reducer);
    store.dispatch(Action::SearchQueryChange("New York".into()));

    let result = store.dispatch(Action::SearchSubmit);
    assert_eq!(result.effects.len(), 1);
    assert!(matches!(
        &result.effects[0],
        Effect::FetchWeather {
            lookup: WeatherLookup::CityName { city_name },
            ..
        } if city_name == "New York"
    ));
}

#[test]
fn test_second_weather_result_replaces_first() {
    let mut store = EffectStore::new(AppState::new(View::Search), reducer);
    store.dispatch(Action::SearchQueryChange("Rome".into()));
    let first = store.dispatch(Action::SearchSubmit);
    let Effect::FetchWeather { token: old, .. } = first.effects[0].clone() else {
        panic!("expected weather lookup");
    };
    let second = store.dispatch(Action::SearchSubmit);
    let Effect::FetchWeather { token: new, .. } = second.effects[0].clone() else {
        panic!("expected weather lookup");
    };

    let rome = |temp: f64| {
        WeatherOutcome::Report(WeatherReport {
            name: "Rome".into(),
            temp,
            description: "clear sky".into(),
            icon: "01d".into(),
            lat: None,
            lon: None,
        })
    };
    store.dispatch(Action::WeatherDidLoad {
        token: new,
        outcome: rome(30.0),
    });
    let late = store.dispatch(Action::WeatherDidLoad {
        token: old,
        outcome: rome(10.0),
    });

    assert!(!late.changed);
    assert_eq!(store.state().weather_card().map(|r| r.temp), Some(30.0));
}

#[test]
fn test_favorite_failure_alerts() {
    let mut store = EffectStore::new(AppState::new(View::Search), reducer);

    store.dispatch(Action::FavoriteDidRespond {
        city_name: "Lisbon".into(),
        reply: StatusReply {
            status: "error".into(),
            message: Some("Missing coordinates".into()),
        },
    });
    assert_eq!(store.state().alert.as_deref(), Some("Error adding favorite."));

    store.dispatch(Action::NoticeAlertDismiss);
    store.dispatch(Action::FavoriteDidError {
        city_name: "Lisbon".into(),
        error: "request failed".into(),
    });
    assert_eq!(store.state().alert.as_deref(), Some("Error adding favorite."));
}

#[test]
fn test_delete_rejection_keeps_cards() {
    let state = AppState {
        favorites: DataResource::Loaded(vec![FavoriteCard::new("Rome", 41.9, 12.5)]),
        ..AppState::new(View::Dashboard)
    };
    let mut store = EffectStore::new(state, reducer);

    store.dispatch(Action::FavoriteDeleteDidError {
        city_name: "Rome".into(),
        error: "Network response was not ok (500 Internal Server Error)".into(),
    });

    assert_eq!(store.state().favorite_cards().len(), 1);
    assert_eq!(
        store.state().alert.as_deref(),
        Some("Error removing favorite: Network response was not ok (500 Internal Server Error)")
    );
}

#[test]
fn test_dashboard_failure_then_retry() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::DashboardLoad);
    let token = store.state().tokens.page;
    store.dispatch(Action::DashboardDidError {
        token,
        error: "request failed".into(),
    });
    assert!(store.state().favorites.is_failed());

    let retry = store.dispatch(Action::DashboardLoad);
    assert!(store.state().favorites.is_loading());
    assert!(matches!(retry.effects[0], Effect::LoadDashboard { .. }));
}

#[test]
fn test_dashboard_keys() {
    let mut harness = TestHarness::<AppState, Action>::new(AppState::new(View::Dashboard));

    send(&mut harness, "g").assert_first(Action::DashboardLoad);
    send(&mut harness, "/").assert_first(Action::UiShowSearch);
    send(&mut harness, "q").assert_first(Action::Quit);
    // No cards loaded yet
    send(&mut harness, "d").assert_empty();
}

#[test]
fn test_search_page_enter_submits() {
    let state = AppState {
        search_query: "Boston".into(),
        ..AppState::new(View::Search)
    };
    let mut view = AppView::new();
    let enter = EventKind::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));

    view.handle_search_event(&enter, &state)
        .assert_first(Action::SearchSubmit);
}

#[test]
fn test_view_toggle_round_trip() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::UiToggleView);
    assert_eq!(store.state().view, View::Search);
    store.dispatch(Action::UiToggleView);
    assert_eq!(store.state().view, View::Dashboard);

    let result = store.dispatch(Action::UiShowSearch);
    assert!(result.changed);
    assert!(!store.dispatch(Action::UiShowSearch).changed);
}
