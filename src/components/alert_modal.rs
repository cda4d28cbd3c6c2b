use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Borders, Paragraph, Wrap},
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, BorderStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, centered_rect,
};

use super::Component;
use crate::action::Action;

const MODAL_WIDTH: u16 = 48;
const MODAL_HEIGHT: u16 = 8;

/// Blocking message box; owns input until dismissed
pub struct AlertModal {
    modal: Modal,
}

pub struct AlertModalProps<'a> {
    pub message: &'a str,
    pub is_focused: bool,
}

impl Default for AlertModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl AlertModal {
    pub fn new() -> Self {
        Self::default()
    }
}

fn dismiss() -> Action {
    Action::NoticeAlertDismiss
}

fn modal_style() -> ModalStyle {
    ModalStyle {
        dim_factor: 0.6,
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(Color::DarkGray),
                focused_style: Some(Style::default().fg(Color::Red)),
            }),
            padding: Padding::all(1),
            bg: Some(Color::Rgb(35, 35, 45)),
            fg: None,
        },
    }
}

impl Component<Action> for AlertModal {
    type Props<'a> = AlertModalProps<'a>;

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
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Some(dismiss()),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let modal_area = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
        let message = props.message;
        let mut render_content = |frame: &mut Frame, inner: Rect| {
            let [text_area, footer_area] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

            let text = Paragraph::new(Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(text, text_area);

            let footer = Paragraph::new(Line::from(Span::styled(
                "Enter: OK",
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(footer, footer_area);
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: modal_style(),
                behavior: ModalBehavior {
                    close_on_esc: true,
                    close_on_backdrop: false,
                },
                on_close: dismiss,
                render_content: &mut render_content,
            },
        );
    }
}
