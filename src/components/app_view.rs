use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{
    AlertModal, AlertModalProps, Component, FavoriteList, FavoriteListProps, FlashBar,
    FlashBarProps, SearchPanel, SearchPanelProps, shell_action,
};
use crate::action::Action;
use crate::state::{AppState, View};

/// Props for AppView - read-only view of state
pub struct AppViewProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Top-level screen: tab line, flash messages, the active view, help bar
/// and the alert box on top
pub struct AppView {
    search: SearchPanel,
    favorites: FavoriteList,
    alert: AlertModal,
}

impl Default for AppView {
    fn default() -> Self {
        Self {
            search: SearchPanel::new(),
            favorites: FavoriteList,
            alert: AlertModal::new(),
        }
    }
}

impl AppView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys while an alert is open; everything but dismissal is swallowed
    pub fn handle_alert_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        let Some(message) = state.alert.as_deref() else {
            return Vec::new();
        };
        if let EventKind::Key(key) = event {
            if let Some(Action::Quit) = shell_action(key) {
                return vec![Action::Quit];
            }
        }
        self.alert
            .handle_event(
                event,
                AlertModalProps {
                    message,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }

    pub fn handle_search_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        if let EventKind::Key(key) = event {
            if let Some(action) = shell_action(key) {
                return vec![action];
            }
        }
        self.search
            .handle_event(event, search_props(state, true))
            .into_iter()
            .collect()
    }

    pub fn handle_dashboard_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        if let EventKind::Key(key) = event {
            if let Some(action) = shell_action(key) {
                return vec![action];
            }
        }
        self.favorites
            .handle_event(
                event,
                FavoriteListProps {
                    favorites: &state.favorites,
                    selected: state.favorite_selected,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect()
    }
}

fn search_props(state: &AppState, is_focused: bool) -> SearchPanelProps<'_> {
    SearchPanelProps {
        query: &state.search_query,
        suggestions: &state.suggestions,
        suggestions_visible: state.suggestions_visible,
        selected: state.suggestion_selected,
        weather: state.weather_panel.as_ref(),
        is_focused,
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, view: View) {
    let tab = |label: &'static str, active: bool| {
        if active {
            Span::styled(
                format!(" {label} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {label} "), Style::default().fg(Color::DarkGray))
        }
    };
    let line = Line::from(vec![
        tab("Dashboard", view == View::Dashboard),
        Span::raw(" "),
        tab("Search", view == View::Search),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.alert.is_some() {
        return vec![StatusBarHint::new("Enter", "dismiss")];
    }
    match state.view {
        View::Search => {
            let mut hints = vec![StatusBarHint::new("Enter", "search")];
            if state.suggestions_visible && !state.suggestions.is_empty() {
                hints.push(StatusBarHint::new("Up/Down", "choose"));
                hints.push(StatusBarHint::new("Esc", "close list"));
            }
            if state.weather_card().is_some() {
                hints.push(StatusBarHint::new("Ctrl+F", "favorite"));
            }
            hints.push(StatusBarHint::new("Tab", "dashboard"));
            hints
        }
        View::Dashboard => vec![
            StatusBarHint::new("j/k", "select"),
            StatusBarHint::new("r", "refresh"),
            StatusBarHint::new("d", "delete"),
            StatusBarHint::new("g", "reload"),
            StatusBarHint::new("/", "search"),
            StatusBarHint::new("q", "quit"),
        ],
    }
}

impl Component<Action> for AppView {
    type Props<'a> = AppViewProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        if props.state.alert.is_some() {
            return self.handle_alert_event(event, props.state);
        }
        match props.state.view {
            View::Search => self.handle_search_event(event, props.state),
            View::Dashboard => self.handle_dashboard_event(event, props.state),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let flash_rows = if state.flash_visible {
            state.flashes.len() as u16
        } else {
            0
        };
        let [tabs_area, flash_area, body_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(flash_rows),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        render_tabs(frame, tabs_area, state.view);

        if flash_rows > 0 {
            FlashBar.render(
                frame,
                flash_area,
                FlashBarProps {
                    flashes: &state.flashes,
                },
            );
        }

        // Blank row under the tabs
        let [_, body_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(body_area);
        let body_focused = props.is_focused && state.alert.is_none();
        match state.view {
            View::Search => {
                self.search
                    .render(frame, body_area, search_props(state, body_focused));
            }
            View::Dashboard => {
                self.favorites.render(
                    frame,
                    body_area,
                    FavoriteListProps {
                        favorites: &state.favorites,
                        selected: state.favorite_selected,
                        is_focused: body_focused,
                    },
                );
            }
        }

        let hints = hints(state);
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            help_area,
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&hints),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );

        if let Some(message) = state.alert.as_deref() {
            self.alert.render(
                frame,
                area,
                AlertModalProps {
                    message,
                    is_focused: props.is_focused,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn key_event(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_tab_toggles_from_either_view() {
        let mut view = AppView::new();
        let dashboard = AppState::new(View::Dashboard);
        let search = AppState::new(View::Search);

        let out = view.handle_dashboard_event(&key_event(KeyCode::Tab), &dashboard);
        out.assert_first(Action::UiToggleView);
        let out = view.handle_search_event(&key_event(KeyCode::Tab), &search);
        out.assert_first(Action::UiToggleView);
    }

    #[test]
    fn test_alert_blocks_view_keys() {
        let mut view = AppView::new();
        let mut state = AppState::new(View::Dashboard);
        state.alert = Some("Error adding favorite.".into());

        let out: Vec<_> = view
            .handle_event(
                &EventKind::Key(key("q")),
                AppViewProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        out.assert_empty();

        let out: Vec<_> = view
            .handle_event(
                &key_event(KeyCode::Enter),
                AppViewProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        out.assert_first(Action::NoticeAlertDismiss);
    }

    #[test]
    fn test_search_view_routes_typing_to_input() {
        let mut view = AppView::new();
        let state = AppState::new(View::Search);
        let out: Vec<_> = view
            .handle_event(
                &key_event(KeyCode::Char('p')),
                AppViewProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        out.assert_first(Action::SearchQueryChange("p".into()));
    }

    #[test]
    fn test_hints_follow_view() {
        let dashboard = hints(&AppState::new(View::Dashboard));
        assert_eq!(dashboard.len(), 6);
        let search = hints(&AppState::new(View::Search));
        assert_eq!(search.len(), 2);
    }
}
