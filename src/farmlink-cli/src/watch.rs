//! Save folder change notifications
//!
//! The game rewrites several XML files in quick succession when saving, so
//! notifications are coalesced: after the first relevant event, further
//! relevant events arriving within the quiet period are folded into the same
//! rescan. A burst is capped so a steady trickle cannot postpone it forever.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

/// Whether a path is one of the game's XML save documents
pub fn is_save_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
}

/// Whether an event should trigger a rescan
pub fn is_relevant(event: &Event) -> bool {
    matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
        && event.paths.iter().any(|p| is_save_document(p))
}

/// Longest a burst may postpone its rescan, in quiet periods
const MAX_BURST_QUIET_PERIODS: u32 = 10;

/// Run `on_change` once per burst of relevant events until the channel closes
pub fn dispatch<F>(rx: &Receiver<notify::Result<Event>>, quiet: Duration, mut on_change: F)
where
    F: FnMut(),
{
    while let Ok(event) = rx.recv() {
        if !accept(event) {
            continue;
        }

        // Only relevant events extend the burst, and never past the deadline
        let deadline = Instant::now() + quiet * MAX_BURST_QUIET_PERIODS;
        let mut settles = Instant::now() + quiet;
        let mut coalesced = 0usize;
        loop {
            let now = Instant::now();
            let wait_until = settles.min(deadline);
            if now >= wait_until {
                break;
            }
            match rx.recv_timeout(wait_until - now) {
                Ok(event) => {
                    if accept(event) {
                        coalesced += 1;
                        settles = Instant::now() + quiet;
                    }
                }
                // Settled, or the watcher is gone
                Err(_) => break,
            }
        }
        if coalesced > 0 {
            tracing::debug!("Coalesced {} further notifications", coalesced);
        }

        on_change();
    }
}

/// Log an incoming notification, returning whether it calls for a rescan
fn accept(event: notify::Result<Event>) -> bool {
    match event {
        Ok(event) if is_relevant(&event) => {
            for path in &event.paths {
                tracing::info!("File changed: {}", path.display());
            }
            true
        }
        Ok(event) => {
            tracing::debug!("Ignoring {:?} on {:?}", event.kind, event.paths);
            false
        }
        Err(e) => {
            tracing::warn!("Watch error: {}", e);
            false
        }
    }
}

/// Watch `root` recursively, calling `on_change` after each burst of save writes
///
/// Blocks for as long as the watcher is alive.
pub fn watch<F>(root: &Path, quiet: Duration, on_change: F) -> Result<()>
where
    F: FnMut(),
{
    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx).context("Failed to create file watcher")?;
    watcher
        .watch(root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", root.display()))?;

    tracing::info!("Watching {} for save changes", root.display());
    dispatch(&rx, quiet, on_change);
    Ok(())
}
