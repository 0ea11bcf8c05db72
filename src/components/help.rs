use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

/// A single keybinding entry for display.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

/// A category of keybindings.
struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const TRIAGE_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "k",
        description: "Keep (leave in browser, drop from this pass)",
    },
    KeyEntry {
        key: "d / Delete",
        description: "Delete from the bookmark file",
    },
    KeyEntry {
        key: "o / Enter",
        description: "Open in browser",
    },
    KeyEntry {
        key: "s / n / Space",
        description: "Skip to another bookmark",
    },
    KeyEntry {
        key: "r",
        description: "Re-collect all bookmarks",
    },
];

const DIALOG_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "y / Enter",
        description: "Confirm delete",
    },
    KeyEntry {
        key: "n / Esc",
        description: "Cancel",
    },
];

const GENERAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "w",
        description: "Toggle store watcher",
    },
    KeyEntry {
        key: "?",
        description: "Toggle this help",
    },
    KeyEntry {
        key: "j / k",
        description: "Scroll help",
    },
    KeyEntry {
        key: "q / Ctrl+C",
        description: "Quit",
    },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "Triage",
        entries: TRIAGE_KEYS,
    },
    KeyCategory {
        name: "Delete Confirmation",
        entries: DIALOG_KEYS,
    },
    KeyCategory {
        name: "General",
        entries: GENERAL_KEYS,
    },
];

/// Help overlay widget showing all keybindings.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
    scroll_offset: usize,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors, scroll_offset: usize) -> Self {
        Self {
            theme,
            scroll_offset,
        }
    }

    /// Build all the lines for the help content.
    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![Span::styled(
            " Keybinding Reference ",
            Style::default()
                .fg(self.theme.accent_fg)
                .add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::from(""));

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("── {} ", category.name),
                    Style::default()
                        .fg(self.theme.accent_fg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("─".repeat(40), Style::default().fg(self.theme.dim_fg)),
            ]));

            for entry in category.entries {
                let key_padded = format!("  {:<18}", entry.key);
                lines.push(Line::from(vec![
                    Span::styled(
                        key_padded,
                        Style::default()
                            .fg(self.theme.warning_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        entry.description.to_string(),
                        Style::default().fg(self.theme.title_fg),
                    ),
                ]));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(self.theme.dim_fg),
        )]));

        lines
    }

    /// Get total number of content lines (for scroll bounds).
    pub fn total_lines() -> usize {
        let mut count = 2; // title + blank
        for category in CATEGORIES {
            count += 1; // header
            count += category.entries.len();
            count += 1; // blank separator
        }
        count += 1; // footer
        count
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Center the overlay: 70% width, 80% height
        let overlay_width = (area.width as f32 * 0.70).min(72.0) as u16;
        let overlay_height = (area.height as f32 * 0.80).min(30.0) as u16;

        let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
        let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

        Clear.render(overlay_area, buf);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));

        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        let content_lines = self.build_content_lines();
        let visible_height = inner.height as usize;
        let scroll = self.scroll_offset;

        for (i, line) in content_lines
            .iter()
            .skip(scroll)
            .take(visible_height)
            .enumerate()
        {
            let line_y = inner.y + i as u16;
            buf.set_line(inner.x + 1, line_y, line, inner.width.saturating_sub(2));
        }

        // Scroll indicator when content overflows
        if content_lines.len() > visible_height && overlay_area.height > 0 {
            let total = content_lines.len();
            let indicator = format!(" {}/{} ", (scroll + 1).min(total), total);
            let ind_span = Span::styled(indicator, Style::default().fg(self.theme.dim_fg));
            let ind_x = overlay_area.x
                + overlay_area
                    .width
                    .saturating_sub(ind_span.width() as u16 + 1);
            let ind_y = overlay_area.y + overlay_area.height - 1;
            buf.set_span(ind_x, ind_y, &ind_span, ind_span.width() as u16);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_categories_have_entries() {
        for cat in CATEGORIES {
            assert!(
                !cat.entries.is_empty(),
                "Category '{}' has no entries",
                cat.name
            );
        }
    }

    #[test]
    fn content_lines_match_total() {
        let theme = crate::theme::dark_theme();
        let overlay = HelpOverlay::new(&theme, 0);
        assert_eq!(overlay.build_content_lines().len(), HelpOverlay::total_lines());
    }

    #[test]
    fn renders_keybindings() {
        let theme = crate::theme::dark_theme();
        let area = Rect::new(0, 0, 100, 40);
        let mut buf = Buffer::empty(area);
        HelpOverlay::new(&theme, 0).render(area, &mut buf);
        let content: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf.cell(pos).unwrap().symbol().to_string())
            .collect();
        assert!(content.contains("Keybinding Reference"));
        assert!(content.contains("Open in browser"));
    }
}
