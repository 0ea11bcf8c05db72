use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, AppMode};
use crate::components::card::CardWidget;
use crate::components::dialog::DialogWidget;
use crate::components::help::HelpOverlay;
use crate::components::status_bar::StatusBarWidget;

/// Render the application UI.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let store_name = app
        .store_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| app.store_path.display().to_string());
    let block = Block::default()
        .title(format!(" {} ", store_name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    frame.render_widget(
        CardWidget::new(&app.view, &app.theme).block(block),
        chunks[0],
    );

    let watcher = if app.watcher_active {
        "watch:on"
    } else {
        "watch:off"
    };
    let mut status = StatusBarWidget::new(app.remaining, app.stats, &app.theme)
        .strategy(app.strategy_label)
        .watcher_status(watcher)
        .store_changed(app.store_changed);
    if let Some((msg, _, is_error)) = &app.status_message {
        status = status.status_message(msg, *is_error);
    }
    frame.render_widget(status, chunks[1]);

    match &app.mode {
        AppMode::Dialog(_) => {
            frame.render_widget(DialogWidget::new(&app.mode, &app.theme), area);
        }
        AppMode::Help => {
            frame.render_widget(HelpOverlay::new(&app.theme, app.help_scroll), area);
        }
        AppMode::Normal => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DialogKind, View};
    use crate::bookmarks::tree::FlatBookmark;
    use crate::theme;
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::Path;

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut s = String::new();
        for y in 0..30 {
            for x in 0..100 {
                s.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            s.push('\n');
        }
        s
    }

    fn app() -> App {
        let mut app = App::new(Path::new("/tmp/places.json"), theme::dark_theme(), true);
        app.view = View::Showing(FlatBookmark {
            id: "7".into(),
            title: "Crates".into(),
            url: "https://crates.io/".into(),
            path: vec!["Rust".into()],
        });
        app.remaining = 9;
        app
    }

    #[test]
    fn renders_card_and_status() {
        let out = draw(&app());
        assert!(out.contains("places.json"));
        assert!(out.contains("Crates"));
        assert!(out.contains("9 left"));
    }

    #[test]
    fn renders_overlays() {
        let mut a = app();
        a.open_dialog(DialogKind::Error {
            message: "disk full".into(),
        });
        assert!(draw(&a).contains("disk full"));

        let mut a = app();
        a.toggle_help();
        assert!(draw(&a).contains("Keybinding Reference"));
    }
}
