use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode, DialogKind, View};
use crate::components::help::HelpOverlay;
use crate::protocol::{Inbound, Request};

/// Handle a key event, returning the request it asks the main loop to run.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Request> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return None;
    }

    match app.mode.clone() {
        AppMode::Help => {
            handle_help_key(app, key);
            None
        }
        AppMode::Dialog(kind) => handle_dialog_key(app, kind, key),
        AppMode::Normal => handle_normal_key(app, key),
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => app.toggle_help(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_help_down(HelpOverlay::total_lines()),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_help_up(),
        _ => {}
    }
}

fn handle_dialog_key(app: &mut App, kind: DialogKind, key: KeyEvent) -> Option<Request> {
    match kind {
        DialogKind::DeleteConfirm { bookmark } => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.close_dialog();
                Some(Request::Send(Inbound::Delete { id: bookmark.id }))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.close_dialog();
                None
            }
            _ => None,
        },
        DialogKind::Error { .. } => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.close_dialog();
            }
            None
        }
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> Option<Request> {
    match key.code {
        KeyCode::Char('q') => {
            app.quit();
            return None;
        }
        KeyCode::Char('?') => {
            app.toggle_help();
            return None;
        }
        KeyCode::Char('r') => return Some(Request::Send(Inbound::Collect)),
        KeyCode::Char('w') => {
            app.watcher_active = !app.watcher_active;
            let state = if app.watcher_active { "on" } else { "off" };
            app.set_status_message(format!("Store watcher {}", state));
            return None;
        }
        _ => {}
    }

    let current = match &app.view {
        View::Showing(bookmark) => bookmark.clone(),
        View::Done => {
            if is_triage_key(key.code) {
                app.set_status_message("Nothing left, press r to start over".to_string());
            }
            return None;
        }
        View::Loading => return None,
    };

    match key.code {
        KeyCode::Char('k') => Some(Request::Send(Inbound::Keep { id: current.id })),
        KeyCode::Char('d') | KeyCode::Delete => {
            if app.confirm_delete {
                app.open_dialog(DialogKind::DeleteConfirm { bookmark: current });
                None
            } else {
                Some(Request::Send(Inbound::Delete { id: current.id }))
            }
        }
        KeyCode::Char('o') | KeyCode::Enter => Some(Request::Open(current.url)),
        KeyCode::Char('s') | KeyCode::Char('n') | KeyCode::Char(' ') => {
            Some(Request::Send(Inbound::Skip))
        }
        _ => None,
    }
}

fn is_triage_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Char('k' | 'd' | 'o' | 's' | 'n' | ' ') | KeyCode::Delete | KeyCode::Enter
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookmarks::tree::FlatBookmark;
    use crate::theme;
    use std::path::Path;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn showing_app(confirm_delete: bool) -> App {
        let mut app = App::new(Path::new("/tmp/b.json"), theme::dark_theme(), confirm_delete);
        app.view = View::Showing(FlatBookmark {
            id: "a1".into(),
            title: "Rust".into(),
            url: "https://www.rust-lang.org/".into(),
            path: vec!["Menu".into()],
        });
        app
    }

    #[test]
    fn keep_sends_current_id() {
        let mut app = showing_app(true);
        assert_eq!(
            handle_key_event(&mut app, key(KeyCode::Char('k'))),
            Some(Request::Send(Inbound::Keep { id: "a1".into() }))
        );
    }

    #[test]
    fn skip_keys() {
        for code in [KeyCode::Char('s'), KeyCode::Char('n'), KeyCode::Char(' ')] {
            let mut app = showing_app(true);
            assert_eq!(
                handle_key_event(&mut app, key(code)),
                Some(Request::Send(Inbound::Skip))
            );
        }
    }

    #[test]
    fn open_requests_url() {
        let mut app = showing_app(true);
        assert_eq!(
            handle_key_event(&mut app, key(KeyCode::Enter)),
            Some(Request::Open("https://www.rust-lang.org/".into()))
        );
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut app = showing_app(true);
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('d'))), None);
        assert!(matches!(
            app.mode,
            AppMode::Dialog(DialogKind::DeleteConfirm { .. })
        ));
        assert_eq!(
            handle_key_event(&mut app, key(KeyCode::Char('y'))),
            Some(Request::Send(Inbound::Delete { id: "a1".into() }))
        );
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn delete_confirmation_can_be_cancelled() {
        let mut app = showing_app(true);
        handle_key_event(&mut app, key(KeyCode::Delete));
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Esc)), None);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn delete_without_confirmation() {
        let mut app = showing_app(false);
        assert_eq!(
            handle_key_event(&mut app, key(KeyCode::Char('d'))),
            Some(Request::Send(Inbound::Delete { id: "a1".into() }))
        );
    }

    #[test]
    fn dialog_swallows_normal_keys() {
        let mut app = showing_app(true);
        handle_key_event(&mut app, key(KeyCode::Char('d')));
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('k'))), None);
        assert!(!app.should_quit);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
    }

    #[test]
    fn error_dialog_dismissed_by_enter() {
        let mut app = showing_app(true);
        app.open_dialog(DialogKind::Error {
            message: "boom".into(),
        });
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Enter)), None);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn recollect_works_in_every_view() {
        for view in [View::Loading, View::Done] {
            let mut app = showing_app(true);
            app.view = view;
            assert_eq!(
                handle_key_event(&mut app, key(KeyCode::Char('r'))),
                Some(Request::Send(Inbound::Collect))
            );
        }
    }

    #[test]
    fn done_view_hints_to_recollect() {
        let mut app = showing_app(true);
        app.view = View::Done;
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('k'))), None);
        let (msg, _, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("press r"));
    }

    #[test]
    fn help_toggles_and_scrolls() {
        let mut app = showing_app(true);
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.mode, AppMode::Help);
        // 'k' scrolls inside help instead of keeping
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('j'))), None);
        assert_eq!(app.help_scroll, 1);
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('k'))), None);
        assert_eq!(app.help_scroll, 0);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn watcher_toggle() {
        let mut app = showing_app(true);
        app.watcher_active = true;
        handle_key_event(&mut app, key(KeyCode::Char('w')));
        assert!(!app.watcher_active);
    }

    #[test]
    fn quit_keys() {
        let mut app = showing_app(true);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = showing_app(true);
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }
}
