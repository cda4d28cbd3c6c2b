use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Borders,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, BorderStyle, Padding, ScrollbarStyle, SelectList, SelectListBehavior,
    SelectListProps, SelectListStyle, SelectionStyle, TextInput, TextInputProps, TextInputStyle,
    highlight_substring,
};

use super::{Component, WeatherCard, WeatherCardProps};
use crate::action::Action;
use crate::state::{CitySuggestion, WeatherOutcome};

/// Most suggestion rows shown at once
const MAX_LIST_ROWS: usize = 8;

const PLACEHOLDER: &str = "Search for a city...";

/// Search field, suggestion list and weather panel
pub struct SearchPanel {
    input: TextInput,
    list: SelectList,
}

pub struct SearchPanelProps<'a> {
    pub query: &'a str,
    pub suggestions: &'a [CitySuggestion],
    pub suggestions_visible: bool,
    pub selected: usize,
    pub weather: Option<&'a WeatherOutcome>,
    pub is_focused: bool,
}

impl SearchPanelProps<'_> {
    fn list_open(&self) -> bool {
        self.suggestions_visible && !self.suggestions.is_empty()
    }
}

impl Default for SearchPanel {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            list: SelectList::new(),
        }
    }
}

impl SearchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(suggestions: &[CitySuggestion], query: &str) -> Vec<Line<'static>> {
        let base = Style::default().fg(Color::Reset);
        let highlight = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        suggestions
            .iter()
            .map(|city| highlight_substring(&city.label(), query, base, highlight))
            .collect()
    }

    fn list_style() -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(Color::DarkGray),
                    focused_style: Some(Style::default().fg(Color::Yellow)),
                }),
                padding: Padding::xy(1, 0),
                bg: None,
                fg: None,
            },
            selection: SelectionStyle::default(),
            scrollbar: ScrollbarStyle::default(),
        }
    }

    fn input_props<'a>(query: &'a str, is_focused: bool) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: query,
            placeholder: PLACEHOLDER,
            is_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::all(1),
                    bg: Some(Color::Rgb(50, 50, 60)),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: Action::SearchQueryChange,
            on_submit: |_| Action::SearchSubmit,
            on_cursor_move: Some(|_| Action::Render),
        }
    }
}

impl Component<Action> for SearchPanel {
    type Props<'a> = SearchPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        if key.kind != KeyEventKind::Press {
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return props
                    .weather
                    .and_then(WeatherOutcome::report)
                    .map(|report| Action::FavoriteAdd(report.identity()))
                    .into_iter()
                    .collect();
            }
            KeyCode::Enter => {
                // With the list open Enter picks a row; otherwise it is the search button
                if props.list_open() {
                    return vec![Action::SuggestionsPick(props.selected)];
                }
                return vec![Action::SearchSubmit];
            }
            KeyCode::Esc => {
                if props.list_open() {
                    return vec![Action::SuggestionsHide];
                }
                return Vec::new();
            }
            KeyCode::Down | KeyCode::Up => {
                if !props.list_open() {
                    return Vec::new();
                }
                let items = Self::rows(props.suggestions, props.query);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: props.selected,
                    is_focused: true,
                    style: Self::list_style(),
                    behavior: SelectListBehavior::default(),
                    on_select: Action::SuggestionsHighlight,
                    render_item: &|item| item.clone(),
                };
                return self
                    .list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect();
            }
            _ => {}
        }

        self.input
            .handle_event(event, Self::input_props(props.query, true))
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let list_rows = if props.list_open() {
            props.suggestions.len().min(MAX_LIST_ROWS) as u16 + 2
        } else {
            0
        };
        let [input_area, list_area, _, card_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(list_rows),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(area);

        self.input
            .render(frame, input_area, Self::input_props(props.query, props.is_focused));

        if props.list_open() {
            let items = Self::rows(props.suggestions, props.query);
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.selected,
                is_focused: props.is_focused,
                style: Self::list_style(),
                behavior: SelectListBehavior::default(),
                on_select: Action::SuggestionsHighlight,
                render_item: &|item| item.clone(),
            };
            self.list.render(frame, list_area, list_props);
        }

        let mut card = WeatherCard;
        card.render(
            frame,
            card_area,
            WeatherCardProps {
                outcome: props.weather,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use tui_dispatch::testing::*;

    use crate::state::WeatherReport;

    fn city(name: &str) -> CitySuggestion {
        CitySuggestion {
            name: name.into(),
            state: "Ohio".into(),
            country: "US".into(),
            lat: 39.9,
            lon: -82.9,
        }
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> EventKind {
        EventKind::Key(KeyEvent::new(code, modifiers))
    }

    fn actions(
        panel: &mut SearchPanel,
        event: EventKind,
        props: SearchPanelProps<'_>,
    ) -> Vec<Action> {
        panel.handle_event(&event, props).into_iter().collect()
    }

    #[test]
    fn test_enter_without_list_is_search_button() {
        let mut panel = SearchPanel::new();
        let props = SearchPanelProps {
            query: "Columbus",
            suggestions: &[],
            suggestions_visible: false,
            selected: 0,
            weather: None,
            is_focused: true,
        };
        let out = actions(&mut panel, press(KeyCode::Enter, KeyModifiers::NONE), props);
        out.assert_first(Action::SearchSubmit);
    }

    #[test]
    fn test_enter_with_list_picks_highlighted_row() {
        let mut panel = SearchPanel::new();
        let cities = [city("Columbus"), city("Cleveland")];
        let props = SearchPanelProps {
            query: "C",
            suggestions: &cities,
            suggestions_visible: true,
            selected: 1,
            weather: None,
            is_focused: true,
        };
        let out = actions(&mut panel, press(KeyCode::Enter, KeyModifiers::NONE), props);
        out.assert_count(1);
        out.assert_first(Action::SuggestionsPick(1));
    }

    #[test]
    fn test_ctrl_f_carries_card_identity() {
        let mut panel = SearchPanel::new();
        let outcome = WeatherOutcome::Report(WeatherReport {
            name: "Columbus".into(),
            temp: 12.0,
            description: "mist".into(),
            icon: "50d".into(),
            lat: Some(39.9),
            lon: Some(-82.9),
        });
        let props = SearchPanelProps {
            query: "Columbus",
            suggestions: &[],
            suggestions_visible: false,
            selected: 0,
            weather: Some(&outcome),
            is_focused: true,
        };
        let out = actions(
            &mut panel,
            press(KeyCode::Char('f'), KeyModifiers::CONTROL),
            props,
        );
        out.assert_first(Action::FavoriteAdd(crate::state::FavoriteCity {
            city_name: "Columbus".into(),
            lat: Some(39.9),
            lon: Some(-82.9),
        }));
    }

    #[test]
    fn test_ctrl_f_without_card_does_nothing() {
        let mut panel = SearchPanel::new();
        let outcome = WeatherOutcome::Error("Weather data not found".into());
        let props = SearchPanelProps {
            query: "x",
            suggestions: &[],
            suggestions_visible: false,
            selected: 0,
            weather: Some(&outcome),
            is_focused: true,
        };
        let out = actions(
            &mut panel,
            press(KeyCode::Char('f'), KeyModifiers::CONTROL),
            props,
        );
        out.assert_empty();
    }

    #[test]
    fn test_typing_changes_query() {
        let mut panel = SearchPanel::new();
        let props = SearchPanelProps {
            query: "",
            suggestions: &[],
            suggestions_visible: false,
            selected: 0,
            weather: None,
            is_focused: true,
        };
        let out = actions(&mut panel, press(KeyCode::Char('l'), KeyModifiers::NONE), props);
        out.assert_first(Action::SearchQueryChange("l".into()));
    }

    #[test]
    fn test_render_lists_every_suggestion() {
        let mut render = RenderHarness::new(60, 20);
        let mut panel = SearchPanel::new();
        let cities = [city("Columbus"), city("Cleveland"), city("Cincinnati")];

        let output = render.render_to_string_plain(|frame| {
            panel.render(
                frame,
                frame.area(),
                SearchPanelProps {
                    query: "C",
                    suggestions: &cities,
                    suggestions_visible: true,
                    selected: 0,
                    weather: None,
                    is_focused: true,
                },
            );
        });

        assert!(output.contains("Columbus, Ohio, US"));
        assert!(output.contains("Cleveland, Ohio, US"));
        assert!(output.contains("Cincinnati, Ohio, US"));
    }

    #[test]
    fn test_hidden_list_renders_no_rows() {
        let mut render = RenderHarness::new(60, 20);
        let mut panel = SearchPanel::new();
        let cities = [city("Columbus")];

        let output = render.render_to_string_plain(|frame| {
            panel.render(
                frame,
                frame.area(),
                SearchPanelProps {
                    query: "Columbus",
                    suggestions: &cities,
                    suggestions_visible: false,
                    selected: 0,
                    weather: None,
                    is_focused: true,
                },
            );
        });

        assert!(!output.contains("Ohio"));
    }
}
