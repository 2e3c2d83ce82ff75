use std::path::{Path, PathBuf};
use std::time::Duration;

use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use tokio::sync::mpsc;

use crate::event::Event;

/// Debounce interval for bookmark file changes, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Watches the bookmarks file and sends `Event::StoreChanged` when it
/// changes.
///
/// The parent directory is watched non-recursively so that replacing the
/// file by rename is still seen.
pub struct StoreWatcher {
    _debouncer: notify_debouncer_mini::Debouncer<notify::RecommendedWatcher>,
}

impl StoreWatcher {
    pub fn new(
        file: &Path,
        debounce_duration: Duration,
        event_tx: mpsc::UnboundedSender<Event>,
    ) -> notify::Result<Self> {
        let target = file.to_path_buf();
        let dir = file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut debouncer = new_debouncer(
            debounce_duration,
            move |result: Result<Vec<notify_debouncer_mini::DebouncedEvent>, notify::Error>| {
                match result {
                    Ok(events) => {
                        let touched = events
                            .iter()
                            .filter(|e| e.kind == DebouncedEventKind::Any)
                            .any(|e| is_target(&e.path, &target));
                        if touched {
                            let _ = event_tx.send(Event::StoreChanged);
                        }
                    }
                    Err(e) => log::warn!("bookmark watcher error: {}", e),
                }
            },
        )?;

        debouncer
            .watcher()
            .watch(&dir, notify::RecursiveMode::NonRecursive)?;
        log::info!("watching {}", file.display());

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Whether a changed path refers to the watched file.
pub fn is_target(path: &Path, target: &Path) -> bool {
    path.file_name().is_some() && path.file_name() == target.file_name()
}
