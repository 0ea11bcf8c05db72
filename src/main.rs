mod app;
mod bookmarks;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod logging;
mod protocol;
mod theme;
mod triage;
mod tui;
mod ui;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::bookmarks::store::JsonFileStore;
use crate::bookmarks::watcher::StoreWatcher;
use crate::config::{AppConfig, GeneralConfig, SelectionConfig, ThemeConfig, WatcherConfig};
use crate::event::{Event, EventHandler};
use crate::protocol::{Inbound, Request};
use crate::triage::Triage;
use crate::tui::{install_panic_hook, Tui};

/// Review your bookmarks one random pick at a time.
#[derive(Parser, Debug)]
#[command(name = "bmt", version, about)]
struct Cli {
    /// Bookmark file (JSON, browser export shape); defaults to the configured store
    file: Option<PathBuf>,

    /// Path to a config file (overrides default locations)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_parser = ["dark", "light", "custom"])]
    theme: Option<String>,

    /// Delete without asking for confirmation
    #[arg(long)]
    no_confirm: bool,

    /// Do not watch the bookmark file for outside changes
    #[arg(long)]
    no_watcher: bool,

    /// Seed for the random picker, for a reproducible order
    #[arg(long)]
    seed: Option<u64>,

    /// How the next bookmark is picked
    #[arg(long, value_parser = ["bounded", "rejection"])]
    strategy: Option<String>,

    /// Print every bookmark as a JSON line and exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    /// Partial config holding only what was given on the command line.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                bookmarks_file: self.file.as_ref().map(|p| p.display().to_string()),
                confirm_delete: self.no_confirm.then_some(false),
            },
            selection: SelectionConfig {
                strategy: self.strategy.clone(),
            },
            watcher: WatcherConfig {
                enabled: self.no_watcher.then_some(false),
                debounce_ms: None,
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            ..AppConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let requested = config.bookmarks_file();
    let path = requested.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", requested.display()))
    })?;

    if let Err(e) = logging::init(&config.log_directory(), config.log_level()) {
        eprintln!("bmt: logging disabled: {}", e);
    }
    tracing::info!(store = %path.display(), "starting");

    let store = JsonFileStore::new(&path);
    let own_writes = store.write_stamp();
    let mut triage = Triage::new(store, config.selection_strategy(), cli.seed);

    if cli.list {
        let mut out = std::io::stdout().lock();
        for bookmark in triage.collect().await? {
            serde_json::to_writer(&mut out, bookmark)?;
            writeln!(out)?;
        }
        return Ok(());
    }

    install_panic_hook();

    let mut tui = Tui::new()?;
    let theme = theme::resolve_theme(&config.theme);
    let mut app = App::new(&path, theme, config.confirm_delete());
    app.strategy_label = triage.strategy().label();
    let mut events = EventHandler::new(Duration::from_millis(16));

    let watcher = if config.watcher_enabled() {
        match StoreWatcher::new(
            &path,
            Duration::from_millis(config.debounce_ms()),
            own_writes,
            events.sender(),
        ) {
            Ok(watcher) => {
                app.watcher_active = true;
                Some(watcher)
            }
            Err(e) => {
                tracing::warn!(error = %e, "store watcher unavailable");
                app.set_error_message(format!("⚠ Watcher unavailable: {}", e));
                None
            }
        }
    } else {
        None
    };

    tui.terminal_mut().draw(|frame| ui::render(&app, frame))?;
    let reply = triage.handle(Inbound::Collect).await;
    app.finish(&Inbound::Collect, reply, triage.remaining());

    loop {
        tui.terminal_mut().draw(|frame| ui::render(&app, frame))?;

        match events.next().await? {
            Event::Key(key) => match handler::handle_key_event(&mut app, key) {
                Some(Request::Send(message)) => {
                    let reply = triage.handle(message.clone()).await;
                    app.finish(&message, reply, triage.remaining());
                }
                Some(Request::Open(url)) => {
                    let result = triage.open(&url).await;
                    app.finish_open(result);
                }
                None => {}
            },
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::StoreChanged(changed) => app.handle_store_changed(&changed),
        }

        // Sync watcher pause/resume state
        match watcher {
            Some(ref watcher) => {
                if app.watcher_active && !watcher.is_active() {
                    watcher.resume();
                } else if !app.watcher_active && watcher.is_active() {
                    watcher.pause();
                }
            }
            None => {
                if app.watcher_active {
                    app.watcher_active = false;
                    app.set_error_message("Store watcher is not running".to_string());
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!(
        kept = app.stats.kept,
        deleted = app.stats.deleted,
        skipped = app.stats.skipped,
        opened = app.stats.opened,
        "session finished"
    );
    tui.restore()?;
    Ok(())
}
