use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::FlashMessage;

/// Server flash messages shown above the dashboard until they expire
pub struct FlashBar;

pub struct FlashBarProps<'a> {
    pub flashes: &'a [FlashMessage],
}

fn category_color(category: &str) -> Color {
    match category {
        "success" => Color::Green,
        "danger" | "error" => Color::Red,
        "warning" => Color::Yellow,
        _ => Color::Cyan,
    }
}

impl Component<Action> for FlashBar {
    type Props<'a> = FlashBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let lines: Vec<Line> = props
            .flashes
            .iter()
            .map(|flash| {
                let color = category_color(&flash.category);
                Line::from(vec![
                    Span::styled("\u{258c} ", Style::default().fg(color)),
                    Span::styled(flash.text.as_str(), Style::default().fg(color)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn test_render_each_flash() {
        let flashes = vec![
            FlashMessage {
                category: "success".into(),
                text: "Logged in".into(),
            },
            FlashMessage {
                category: "info".into(),
                text: "Welcome back".into(),
            },
        ];
        let mut render = RenderHarness::new(40, 2);
        let output = render.render_to_string_plain(|frame| {
            FlashBar.render(frame, frame.area(), FlashBarProps { flashes: &flashes });
        });
        assert!(output.contains("Logged in"));
        assert!(output.contains("Welcome back"));
    }

    #[test]
    fn test_unknown_category_uses_default_color() {
        assert_eq!(category_color("info"), Color::Cyan);
        assert_eq!(category_color("danger"), Color::Red);
    }
}
