use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget, Wrap},
};

use crate::app::View;
use crate::theme::ThemeColors;

const PATH_SEPARATOR: &str = " › ";

/// The main panel: the bookmark under review, or a placeholder.
pub struct CardWidget<'a> {
    view: &'a View,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> CardWidget<'a> {
    pub fn new(view: &'a View, theme: &'a ThemeColors) -> Self {
        Self {
            view,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        match self.view {
            View::Loading => vec![Line::from(Span::styled(
                "Collecting bookmarks…",
                Style::default().fg(self.theme.dim_fg),
            ))],
            View::Done => vec![
                Line::from(Span::styled(
                    "All done.",
                    Style::default()
                        .fg(self.theme.success_fg)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "No bookmarks left in this pass. Press r to re-collect or q to quit.",
                    Style::default().fg(self.theme.dim_fg),
                )),
            ],
            View::Showing(bookmark) => {
                let path = if bookmark.path.is_empty() {
                    "(top level)".to_string()
                } else {
                    bookmark.path.join(PATH_SEPARATOR)
                };
                let title = if bookmark.title.is_empty() {
                    "(untitled)"
                } else {
                    bookmark.title.as_str()
                };
                vec![
                    Line::from(Span::styled(path, Style::default().fg(self.theme.path_fg))),
                    Line::from(""),
                    Line::from(Span::styled(
                        title,
                        Style::default()
                            .fg(self.theme.title_fg)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        bookmark.url.as_str(),
                        Style::default()
                            .fg(self.theme.url_fg)
                            .add_modifier(Modifier::UNDERLINED),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("id {}", bookmark.id),
                        Style::default()
                            .fg(self.theme.dim_fg)
                            .add_modifier(Modifier::DIM),
                    )),
                ]
            }
        }
    }
}

impl<'a> Widget for CardWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block.clone().unwrap_or_else(|| {
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border_fg))
        });
        let block = block
            .style(Style::default().bg(self.theme.card_bg))
            .padding(Padding::new(2, 2, 1, 1));

        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
