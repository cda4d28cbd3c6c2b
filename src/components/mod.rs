pub mod alert_modal;
pub mod app_view;
pub mod favorite_list;
pub mod flash_bar;
pub mod search_panel;
pub mod weather_card;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use alert_modal::{AlertModal, AlertModalProps};
pub use app_view::{AppView, AppViewProps};
pub use favorite_list::{FavoriteList, FavoriteListProps, CARD_HEIGHT};
pub use flash_bar::{FlashBar, FlashBarProps};
pub use search_panel::{SearchPanel, SearchPanelProps};
pub use weather_card::{WeatherCard, WeatherCardProps, ERROR_ICON};

use crate::action::Action;

/// Keys that work on every page: Tab switches view, Ctrl+C quits
pub(crate) fn shell_action(key: &KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Tab => Some(Action::UiToggleView),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        _ => None,
    }
}
