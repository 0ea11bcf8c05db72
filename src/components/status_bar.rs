use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::TriageStats;
use crate::theme::ThemeColors;

const KEY_HINTS: &str = " k:keep  d:del  o:open  s:skip  ?:help ";

/// Status bar widget showing progress, session counters, and transient messages.
pub struct StatusBarWidget<'a> {
    remaining: usize,
    stats: TriageStats,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    strategy: Option<&'a str>,
    watcher_status: Option<&'a str>,
    store_changed: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(remaining: usize, stats: TriageStats, theme: &'a ThemeColors) -> Self {
        Self {
            remaining,
            stats,
            theme,
            status_message: None,
            is_error: false,
            strategy: None,
            watcher_status: None,
            store_changed: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn strategy(mut self, label: &'a str) -> Self {
        self.strategy = Some(label);
        self
    }

    pub fn watcher_status(mut self, status: &'a str) -> Self {
        self.watcher_status = Some(status);
        self
    }

    pub fn store_changed(mut self, changed: bool) -> Self {
        self.store_changed = changed;
        self
    }
}

/// Truncate to at most `width` characters.
fn fit(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        buf.set_style(area, Style::default().bg(self.theme.status_bg));

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };

            let display = format!("{:<width$}", fit(msg, width), width = width);
            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [remaining] [counters] [strategy] [watcher] ... [key_hints]
        let progress = format!(" {} left ", self.remaining);
        let counters = format!(
            "kept {}  deleted {}  skipped {}  opened {} ",
            self.stats.kept, self.stats.deleted, self.stats.skipped, self.stats.opened
        );

        let mut spans = vec![
            Span::styled(
                progress,
                Style::default()
                    .fg(self.theme.status_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(counters, Style::default().fg(self.theme.info_fg)),
        ];

        if let Some(strategy) = self.strategy {
            spans.push(Span::styled(
                format!("[{}] ", strategy),
                Style::default().fg(self.theme.dim_fg),
            ));
        }

        if let Some(status) = self.watcher_status {
            spans.push(Span::styled(
                format!("{} ", status),
                Style::default().fg(self.theme.dim_fg),
            ));
        }

        if self.store_changed {
            spans.push(Span::styled(
                "● changed ",
                Style::default()
                    .fg(self.theme.warning_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        let used: usize = spans.iter().map(|s| s.width()).sum();
        let hints_len = KEY_HINTS.chars().count();
        if used + hints_len <= width {
            spans.push(Span::raw(" ".repeat(width - used - hints_len)));
            spans.push(Span::styled(
                KEY_HINTS,
                Style::default()
                    .fg(self.theme.dim_fg)
                    .add_modifier(Modifier::DIM),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
