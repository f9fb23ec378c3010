//! Reloading the rule file into a live policy

use crate::loader::{ConfigLoader, LoadSummary};
use crate::{ConfigError, Result};
use logic::{BiomeLookup, Policy};
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Default debounce window for file change events
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Pairs a loader with the policy it feeds
///
/// A reload publishes the new snapshot and drops cached decisions in one
/// step. If the file cannot be read or parsed the current rules stay active.
#[derive(Debug, Clone)]
pub struct Reloader<L> {
    loader: ConfigLoader,
    policy: Policy<L>,
}

impl<L: BiomeLookup> Reloader<L> {
    pub fn new(loader: ConfigLoader, policy: Policy<L>) -> Self {
        Reloader { loader, policy }
    }

    pub fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    pub fn policy(&self) -> &Policy<L> {
        &self.policy
    }

    /// Re-read the rule file and publish it
    pub fn reload(&self) -> Result<LoadSummary> {
        tracing::info!("Reloading Territorial configuration...");

        let snapshot = match self.loader.load() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::error!("Reload failed, keeping current rules: {}", err);
                return Err(err);
            }
        };

        let summary = LoadSummary::of(&snapshot.rules);
        self.policy.replace_snapshot(snapshot);
        tracing::info!("Configuration reloaded: {}", summary);
        Ok(summary)
    }
}

impl<L: BiomeLookup + Send + Sync + 'static> Reloader<L> {
    /// Reload whenever the rule file changes on disk
    ///
    /// The parent directory is watched so editors that replace the file on
    /// save are picked up too.
    pub fn watch(self, debounce: Duration) -> Result<RuleWatcher> {
        // Make sure there is something to watch
        self.loader.ensure_default()?;

        let path = self.loader.path().to_path_buf();
        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        let file_name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();

        let (tx, rx) = channel();
        let mut debouncer = new_debouncer(debounce, tx)?;
        debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!("Watching {} for changes", path.display());

        let handle = thread::Builder::new()
            .name("territorial-reload".into())
            .spawn(move || self.run(rx, file_name))
            .map_err(|e| ConfigError::io(&path, e))?;

        Ok(RuleWatcher {
            _debouncer: debouncer,
            handle: Some(handle),
        })
    }

    fn run(self, rx: Receiver<DebounceEventResult>, file_name: OsString) {
        for result in rx {
            match result {
                Ok(events) => {
                    let touched = events
                        .iter()
                        .any(|event| event.path.file_name() == Some(file_name.as_os_str()));
                    if touched {
                        // Errors are already logged; the old rules stay active
                        let _ = self.reload();
                    }
                }
                Err(err) => tracing::warn!("File watcher error: {}", err),
            }
        }
        tracing::debug!("Rule file watcher stopped");
    }
}

/// Handle for a running file watcher; dropping it stops watching
pub struct RuleWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    handle: Option<JoinHandle<()>>,
}

impl RuleWatcher {
    /// Stop watching and wait for the reload thread to exit
    pub fn stop(mut self) {
        let handle = self.handle.take();
        drop(self);
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for RuleWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleWatcher")
            .field("running", &self.handle.is_some())
            .finish()
    }
}
