use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

use super::Component;
use crate::action::Action;
use crate::conditions::WeatherCondition;
use crate::state::{WeatherOutcome, WeatherReport};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";

/// Borders + seven content rows
const CARD_ROWS: u16 = 9;

/// The single weather card (or error notice) on the search page
pub struct WeatherCard;

pub struct WeatherCardProps<'a> {
    pub outcome: Option<&'a WeatherOutcome>,
}

impl Component<Action> for WeatherCard {
    type Props<'a> = WeatherCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match props.outcome {
            None => render_hint(frame, area),
            Some(WeatherOutcome::Error(message)) => render_error(frame, area, message),
            Some(WeatherOutcome::Report(report)) => render_report(frame, area, report),
        }
    }
}

fn render_report(frame: &mut Frame, area: Rect, report: &WeatherReport) {
    let [card_area, _] =
        Layout::vertical([Constraint::Length(CARD_ROWS), Constraint::Min(0)]).areas(area);

    let block = Block::bordered()
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(format!(" {} ", report.title())).bold());

    let condition = WeatherCondition::from_icon(&report.icon);
    let lines = vec![
        Line::from(report.temperature_text()),
        Line::from(Span::styled(
            report.description_text(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(report.latitude_text()),
        Line::from(report.longitude_text()),
        Line::from(vec![
            Span::raw(condition.emoji()),
            Span::raw(" "),
            Span::styled(report.icon_url(), Style::default().fg(Color::DarkGray)),
        ]),
        Line::default(),
        Line::from(vec![
            Span::styled("\u{2665} ", Style::default().fg(Color::Red)),
            Span::styled("Ctrl+F", Style::default().fg(Color::Cyan).bold()),
            Span::styled(" add to favorites", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), card_area);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let [notice_area, _] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let block = Block::bordered().border_style(Style::default().fg(Color::Red));
    let line = Line::from(vec![
        Span::raw(ERROR_ICON),
        Span::raw(" "),
        Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Rgb(200, 100, 100))
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
        notice_area,
    );
}

fn render_hint(frame: &mut Frame, area: Rect) {
    let hint = Line::from(vec![
        Span::styled("Type a city, then ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
        Span::styled(" to look up its weather", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(hint), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn render(outcome: Option<&WeatherOutcome>) -> String {
        let mut render = RenderHarness::new(70, 12);
        let mut card = WeatherCard;
        render.render_to_string_plain(|frame| {
            card.render(frame, frame.area(), WeatherCardProps { outcome });
        })
    }

    #[test]
    fn test_report_fields_rendered() {
        let outcome = WeatherOutcome::Report(WeatherReport {
            name: "Lisbon".into(),
            temp: 21.5,
            description: "few clouds".into(),
            icon: "02d".into(),
            lat: Some(38.72),
            lon: Some(-9.14),
        });
        let output = render(Some(&outcome));

        assert!(output.contains("Weather in Lisbon"));
        assert!(output.contains("Temperature: 21.5 °C"));
        assert!(output.contains("Weather: few clouds"));
        assert!(output.contains("Latitude: 38.72"));
        assert!(output.contains("Longitude: -9.14"));
        assert!(output.contains("img/wn/02d.png"));
    }

    #[test]
    fn test_error_notice_has_no_card() {
        let outcome = WeatherOutcome::Error("Weather data not found".into());
        let output = render(Some(&outcome));

        assert!(output.contains("Weather data not found"));
        assert!(!output.contains("Weather in"));
        assert!(!output.contains("Temperature:"));
    }

    #[test]
    fn test_empty_panel_shows_hint() {
        assert!(render(None).contains("to look up its weather"));
    }
}
