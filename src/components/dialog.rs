use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{AppMode, DialogKind};
use crate::bookmarks::tree::FlatBookmark;
use crate::theme::ThemeColors;

/// Dialog widget that renders a centered modal overlay.
pub struct DialogWidget<'a> {
    mode: &'a AppMode,
    theme: &'a ThemeColors,
}

impl<'a> DialogWidget<'a> {
    pub fn new(mode: &'a AppMode, theme: &'a ThemeColors) -> Self {
        Self { mode, theme }
    }

    /// Calculate a centered rectangle within the given area.
    fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(x, y, w, h)
    }
}

impl<'a> Widget for DialogWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind = match &self.mode {
            AppMode::Dialog(kind) => kind,
            _ => return,
        };

        match kind {
            DialogKind::DeleteConfirm { bookmark } => {
                render_confirm_dialog(bookmark, self.theme, area, buf);
            }
            DialogKind::Error { message } => {
                render_error_dialog(message, self.theme, area, buf);
            }
        }
    }
}

/// Character count as a terminal width, saturating at `u16::MAX`.
fn clamp_width(chars: usize) -> u16 {
    u16::try_from(chars).unwrap_or(u16::MAX)
}

fn render_confirm_dialog(bookmark: &FlatBookmark, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let longest = bookmark.title.chars().count().max(bookmark.url.chars().count());
    let dialog_width = clamp_width(longest)
        .saturating_add(8)
        .max(40)
        .min(area.width.saturating_sub(4));
    let dialog_height = 7u16.min(area.height);
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(" Delete Bookmark ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error_fg))
        .style(Style::default().bg(theme.dialog_bg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let header = Line::from(Span::styled(
        "Delete this bookmark from the file?",
        Style::default()
            .fg(theme.warning_fg)
            .add_modifier(Modifier::BOLD),
    ));
    buf.set_line(inner.x, inner.y, &header, inner.width);

    let title = if bookmark.title.is_empty() {
        "(untitled)"
    } else {
        bookmark.title.as_str()
    };
    if inner.height > 2 {
        let line = Line::from(Span::styled(
            format!("  • {}", title),
            Style::default().fg(theme.title_fg),
        ));
        buf.set_line(inner.x, inner.y + 1, &line, inner.width);
        let url = Line::from(Span::styled(
            format!("    {}", bookmark.url),
            Style::default().fg(theme.url_fg),
        ));
        buf.set_line(inner.x, inner.y + 2, &url, inner.width);
    }

    let hint = "[y] Yes  [n/Esc] Cancel";
    let hint_style = Style::default()
        .fg(theme.dim_fg)
        .add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint, hint_style));
    buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
}

fn render_error_dialog(message: &str, theme: &ThemeColors, area: Rect, buf: &mut Buffer) {
    let dialog_width = clamp_width(message.chars().count())
        .saturating_add(6)
        .max(30)
        .min(area.width.saturating_sub(4));
    let dialog_height = 5;
    let rect = DialogWidget::centered_rect(dialog_width, dialog_height, area);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border_fg))
        .style(Style::default().bg(theme.dialog_bg))
        .padding(Padding::horizontal(1));

    let inner = block.inner(rect);
    block.render(rect, buf);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let msg_line = Line::from(Span::styled(message, Style::default().fg(theme.error_fg)));
    buf.set_line(inner.x, inner.y + inner.height / 2, &msg_line, inner.width);

    let hint = "[Enter/Esc] Dismiss";
    let hint_style = Style::default()
        .fg(theme.dim_fg)
        .add_modifier(Modifier::DIM);
    let hint_line = Line::from(Span::styled(hint, hint_style));
    if inner.height > 1 {
        buf.set_line(inner.x, inner.y + inner.height - 1, &hint_line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    #[test]
    fn test_confirm_dialog_renders() {
        let mode = AppMode::Dialog(DialogKind::DeleteConfirm {
            bookmark: FlatBookmark {
                id: "a1".into(),
                title: "Ratatui".into(),
                url: "https://ratatui.rs/".into(),
                path: vec![],
            },
        });
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(&mode, &tc).render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Delete Bookmark"));
        assert!(content.contains("Ratatui"));
        assert!(content.contains("https://ratatui.rs/"));
        assert!(content.contains("[y] Yes"));
    }

    #[test]
    fn test_confirm_dialog_untitled() {
        let mode = AppMode::Dialog(DialogKind::DeleteConfirm {
            bookmark: FlatBookmark {
                id: "a1".into(),
                title: String::new(),
                url: "https://x.example/".into(),
                path: vec![],
            },
        });
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(&mode, &tc).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("(untitled)"));
    }

    #[test]
    fn test_error_dialog_renders() {
        let mode = AppMode::Dialog(DialogKind::Error {
            message: "Permission denied".to_string(),
        });
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(&mode, &tc).render(area, &mut buf);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("Error"));
        assert!(content.contains("Permission denied"));
    }

    #[test]
    fn test_no_dialog_mode_noop() {
        let mode = AppMode::Normal;
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(&mode, &tc).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).trim().is_empty());
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let mode = AppMode::Dialog(DialogKind::Error {
            message: "x".to_string(),
        });
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(&mode, &tc).render(area, &mut buf);
    }

    #[test]
    fn test_confirm_dialog_huge_url() {
        for len in [65_530usize, 70_000] {
            let mode = AppMode::Dialog(DialogKind::DeleteConfirm {
                bookmark: FlatBookmark {
                    id: "big".into(),
                    title: "Inline image".into(),
                    url: format!("data:image/png;base64,{}", "A".repeat(len)),
                    path: vec![],
                },
            });
            let tc = theme::dark_theme();
            let area = Rect::new(0, 0, 80, 24);
            let mut buf = Buffer::empty(area);
            DialogWidget::new(&mode, &tc).render(area, &mut buf);
            let content = buffer_to_string(&buf, area);
            assert!(content.contains("Delete Bookmark"));
            assert!(content.contains("Inline image"));
        }
    }

    #[test]
    fn test_error_dialog_huge_message() {
        let mode = AppMode::Dialog(DialogKind::Error {
            message: "e".repeat(65_534),
        });
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogWidget::new(&mode, &tc).render(area, &mut buf);
        assert!(buffer_to_string(&buf, area).contains("Error"));
    }

    #[test]
    fn test_clamp_width() {
        assert_eq!(clamp_width(12), 12);
        assert_eq!(clamp_width(70_000), u16::MAX);
    }

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }
}
