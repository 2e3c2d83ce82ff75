mod app;
mod bookmarks;
mod components;
mod config;
mod error;
mod event;
mod handler;
mod i18n;
mod input;
mod navigation;
mod navigator;
mod render;
mod schedule;
mod settings;
mod theme;
mod tui;
mod ui;
mod watcher;
mod websearch;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::sync::mpsc;

use crate::app::{App, AppOptions, Fetch};
use crate::bookmarks::chromium::ChromiumStore;
use crate::config::{AppConfig, GeneralConfig};
use crate::event::{Event, EventHandler};
use crate::navigator::SystemNavigator;
use crate::settings::SettingsStore;
use crate::tui::{install_panic_hook, Tui};
use crate::watcher::StoreWatcher;

/// A terminal new-tab page and bookmark manager.
#[derive(Parser, Debug)]
#[command(name = "bookmark_tui", version, about)]
struct Cli {
    /// Chromium `Bookmarks` file (auto-detected when omitted)
    bookmarks: Option<PathBuf>,

    /// Explicit config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON list of most-visited sites
    #[arg(long)]
    top_sites: Option<PathBuf>,

    /// Directory for settings and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Disable reloading when the bookmarks file changes
    #[arg(long)]
    no_watcher: bool,

    /// Disable mouse support
    #[arg(long)]
    no_mouse: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Flags expressed as a partial config, merged over the config files.
    fn overrides(&self) -> AppConfig {
        let path_string = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        AppConfig {
            general: GeneralConfig {
                bookmarks_file: path_string(&self.bookmarks),
                top_sites_file: path_string(&self.top_sites),
                data_dir: path_string(&self.data_dir),
                mouse: self.no_mouse.then_some(false),
                watch: self.no_watcher.then_some(false),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Route `log` output to a file; the terminal belongs to the UI.
fn init_logging(log_file: Option<&Path>, data_dir: &Path) {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None if std::env::var_os("RUST_LOG").is_some() => data_dir.join("bookmark-tui.log"),
        None => return,
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("cannot open log file {}: {}", path.display(), e);
            return;
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

/// Run a queued network request in the background and report back.
fn spawn_fetch(client: &reqwest::Client, fetch: Fetch, tx: &mpsc::UnboundedSender<Event>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match fetch {
            Fetch::Suggestions(query) => {
                let suggestions = websearch::fetch_suggestions(&client, &query)
                    .await
                    .unwrap_or_else(|e| {
                        log::warn!("suggestions for {:?} failed: {}", query, e);
                        Vec::new()
                    });
                let _ = tx.send(Event::Suggestions { query, suggestions });
            }
            Fetch::Favicon { host, url } => {
                let ok = match client.get(&url).send().await {
                    Ok(resp) => resp.status().is_success(),
                    Err(e) => {
                        log::debug!("favicon {} failed: {}", url, e);
                        false
                    }
                };
                let _ = tx.send(Event::Favicon { host, ok });
            }
        }
    });
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));
    let data_dir = config.data_dir();
    init_logging(cli.log_file.as_deref(), &data_dir);

    let bookmarks_path = config
        .bookmarks_file()
        .or_else(ChromiumStore::detect)
        .ok_or_else(|| {
            error::AppError::InvalidPath(
                "no Bookmarks file found; pass its path as an argument".into(),
            )
        })?;
    if !bookmarks_path.is_file() {
        return Err(error::AppError::InvalidPath(format!(
            "{} does not exist",
            bookmarks_path.display()
        )));
    }
    let top_sites = config.top_sites_file();
    let host = ChromiumStore::new(&bookmarks_path, top_sites.as_deref());
    log::info!("using bookmarks file {}", host.path().display());
    let settings_store = SettingsStore::open(&data_dir);
    let mouse_enabled = config.mouse_enabled();

    install_panic_hook();

    let mut tui = Tui::new(mouse_enabled)?;
    let mut app = App::new(
        host,
        SystemNavigator,
        settings_store,
        AppOptions::from_config(&config),
    );
    let mut events = EventHandler::new(Duration::from_millis(16));
    let event_tx = events.sender();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let _watcher = if config.watch_enabled() {
        match StoreWatcher::new(
            &bookmarks_path,
            Duration::from_millis(watcher::DEFAULT_DEBOUNCE_MS),
            event_tx.clone(),
        ) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                log::warn!("bookmark watcher unavailable: {}", e);
                None
            }
        }
    } else {
        None
    };

    app.reload();

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) if mouse_enabled => handler::handle_mouse_event(&mut app, mouse),
            Event::Mouse(_) => {}
            Event::Tick => app.on_tick(Instant::now()),
            Event::Resize(_, _) => {}
            Event::Suggestions { query, suggestions } => app.on_suggestions(&query, suggestions),
            Event::Favicon { host, ok } => app.on_favicon(&host, ok),
            Event::StoreChanged => app.on_store_changed(),
        }

        for fetch in app.take_fetches() {
            spawn_fetch(&client, fetch, &event_tx);
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
