use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use tui_dispatch::{DataResource, EventKind};

use super::Component;
use crate::action::Action;
use crate::conditions::WeatherCondition;
use crate::state::FavoriteCard;

/// Rows per card: borders + four content lines
pub const CARD_HEIGHT: u16 = 6;

const PLACEHOLDER: &str = "--";

/// Stacked favorite cards on the dashboard
#[derive(Default)]
pub struct FavoriteList;

pub struct FavoriteListProps<'a> {
    pub favorites: &'a DataResource<Vec<FavoriteCard>>,
    pub selected: usize,
    pub is_focused: bool,
}

impl FavoriteListProps<'_> {
    fn cards(&self) -> &[FavoriteCard] {
        self.favorites.data().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Component<Action> for FavoriteList {
    type Props<'a> = FavoriteListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let cards = props.cards();
        let selected = cards.get(props.selected);
        match key.code {
            KeyCode::Down | KeyCode::Char('j') if !cards.is_empty() => Some(
                Action::FavoriteSelect((props.selected + 1).min(cards.len() - 1)),
            ),
            KeyCode::Up | KeyCode::Char('k') if !cards.is_empty() => {
                Some(Action::FavoriteSelect(props.selected.saturating_sub(1)))
            }
            KeyCode::Char('r') => selected.map(|card| Action::FavoriteRefresh {
                city_name: card.city_name.clone(),
                lat: card.lat,
                lon: card.lon,
            }),
            KeyCode::Char('d') | KeyCode::Delete => {
                selected.map(|card| Action::FavoriteDelete(card.city_name.clone()))
            }
            KeyCode::Char('g') | KeyCode::F(5) => Some(Action::DashboardLoad),
            KeyCode::Char('/') => Some(Action::UiShowSearch),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match props.favorites {
            DataResource::Empty => {}
            DataResource::Loading => {
                render_centered(
                    frame,
                    area,
                    vec![Line::from(Span::styled(
                        "Loading favorites...",
                        Style::default().fg(Color::DarkGray),
                    ))],
                );
            }
            DataResource::Failed(error) => {
                render_centered(
                    frame,
                    area,
                    vec![
                        Line::from(Span::styled(
                            format!("Could not load dashboard: {error}"),
                            Style::default().fg(Color::Rgb(200, 100, 100)),
                        )),
                        Line::from(Span::styled(
                            "Press g to retry",
                            Style::default().fg(Color::DarkGray),
                        )),
                    ],
                );
            }
            DataResource::Loaded(cards) if cards.is_empty() => {
                render_centered(
                    frame,
                    area,
                    vec![
                        Line::from(Span::styled(
                            "No favorite cities yet",
                            Style::default().fg(Color::Gray),
                        )),
                        Line::from(Span::styled(
                            "Search with / and press Ctrl+F on a card",
                            Style::default().fg(Color::DarkGray),
                        )),
                    ],
                );
            }
            DataResource::Loaded(cards) => {
                render_cards(frame, area, cards, props.selected, props.is_focused)
            }
        }
    }
}

fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let height = lines.len() as u16;
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
}

/// First card index so the selected card stays on screen
fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return selected;
    }
    (selected + 1).saturating_sub(visible)
}

fn render_cards(
    frame: &mut Frame,
    area: Rect,
    cards: &[FavoriteCard],
    selected: usize,
    is_focused: bool,
) {
    let visible = ((area.height / CARD_HEIGHT) as usize).max(1);
    let offset = scroll_offset(selected, visible);

    let mut y = area.y;
    for (index, card) in cards.iter().enumerate().skip(offset).take(visible) {
        let height = CARD_HEIGHT.min(area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let card_area = Rect::new(area.x, y, area.width, height);
        render_card(frame, card_area, card, is_focused && index == selected);
        y += height;
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &FavoriteCard, is_selected: bool) {
    let border = if is_selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if is_selected {
        Line::from(format!(" {} ", card.city_name)).bold().yellow()
    } else {
        Line::from(format!(" {} ", card.city_name)).bold()
    };
    let block = Block::bordered().border_style(border).title(title);

    let dim = Style::default().fg(Color::DarkGray);
    let icon = match card.icon_src.as_deref() {
        Some(src) => Line::from(vec![
            Span::raw(WeatherCondition::from_icon_url(src).emoji()),
            Span::raw(" "),
            Span::styled(src.to_string(), dim),
        ]),
        None => Line::from(Span::styled(PLACEHOLDER, dim)),
    };
    let lines = vec![
        Line::from(card.temp_text.as_deref().unwrap_or(PLACEHOLDER).to_string()),
        Line::from(Span::styled(
            card.desc_text.as_deref().unwrap_or(PLACEHOLDER).to_string(),
            Style::default().fg(Color::Gray),
        )),
        icon,
        Line::from(Span::styled(
            format!("{}, {}", card.lat, card.lon),
            dim.add_modifier(Modifier::ITALIC),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
