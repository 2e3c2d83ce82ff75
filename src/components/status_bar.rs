use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::{Command, Toast, ToastKind};
use crate::theme::ThemeColors;

const KEY_HINTS: &str = " a:add  /:find  ?:help  q:quit ";

/// Status bar: the latest toast, or a summary line with key hints.
pub struct StatusBarWidget<'a> {
    summary: &'a str,
    theme: &'a ThemeColors,
    toast: Option<&'a Toast>,
    back_to_top: Option<&'a str>,
    hits: Option<&'a mut Vec<(Rect, Command)>>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(summary: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            summary,
            theme,
            toast: None,
            back_to_top: None,
            hits: None,
        }
    }

    pub fn toast(mut self, toast: Option<&'a Toast>) -> Self {
        self.toast = toast;
        self
    }

    /// Show the clickable back-to-top hint with this label.
    pub fn back_to_top(mut self, label: &'a str) -> Self {
        self.back_to_top = Some(label);
        self
    }

    pub fn hits(mut self, hits: &'a mut Vec<(Rect, Command)>) -> Self {
        self.hits = Some(hits);
        self
    }

    fn toast_style(&self, kind: ToastKind) -> Style {
        match kind {
            ToastKind::Error => Style::default()
                .bg(self.theme.error_fg)
                .fg(self.theme.status_fg),
            ToastKind::Success => Style::default().fg(self.theme.success_fg),
            ToastKind::Info => Style::default().fg(self.theme.info_fg),
        }
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        buf.set_style(
            area,
            Style::default()
                .bg(self.theme.status_bg)
                .fg(self.theme.status_fg),
        );

        if let Some(toast) = self.toast {
            let style = self.toast_style(toast.kind);
            let message = format!(" {}", toast.message);
            let pad = width.saturating_sub(Span::raw(message.as_str()).width());
            let line = Line::from(Span::styled(format!("{}{}", message, " ".repeat(pad)), style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let hints_style = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);
        let hints = Span::styled(KEY_HINTS, hints_style);
        let hints_width = hints.width() as u16;
        let hints_x = area.x + area.width.saturating_sub(hints_width);
        buf.set_span(hints_x, area.y, &hints, hints_width.min(area.width));

        let mut right = hints_x;
        if let Some(label) = self.back_to_top {
            let span = Span::styled(
                format!(" ↑ {} (g) ", label),
                Style::default()
                    .fg(self.theme.accent_fg)
                    .add_modifier(Modifier::BOLD),
            );
            let span_width = span.width() as u16;
            if right >= area.x + span_width {
                right -= span_width;
                buf.set_span(right, area.y, &span, span_width);
                if let Some(hits) = self.hits {
                    hits.push((Rect::new(right, area.y, span_width, 1), Command::BackToTop));
                }
            }
        }

        let summary = Span::styled(
            format!(" {}", self.summary),
            Style::default().fg(self.theme.status_fg),
        );
        buf.set_span(area.x, area.y, &summary, right.saturating_sub(area.x));
    }
}
