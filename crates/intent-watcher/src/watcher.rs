//! The [`FsWatcher`] lifecycle and its background watch task.
//!
//! `start` canonicalizes the root, loads ignore rules top-down while
//! registering a non-recursive watch per surviving directory, then hands
//! ownership of the OS watcher, the ignore state, and the debouncer to a
//! single tokio task. The task multiplexes the data channel, the error
//! channel, and a cancellation token; `stop` cancels and waits for the
//! task to exit, which drops the OS watch handles. No events are delivered
//! after `stop` returns.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use intent_core::{new_file_event_id, FileChangeType, FileEvent};
use intent_engine::CorrelationEngine;

use crate::debounce::{Debouncer, DEFAULT_DEBOUNCE_WINDOW};
use crate::errors::{Result, WatcherError};
use crate::filter::should_watch;
use crate::ignores::IgnoreSet;

/// Configuration for a watcher instance.
///
/// Constructed per `start` and moved into the background task — there is
/// no shared mutable watcher state between instances.
#[derive(Clone, Debug)]
pub struct WatcherConfig {
    /// Project directory to observe recursively.
    pub root: PathBuf,
    /// Window inside which repeated notifications for one path collapse.
    pub debounce_window: Duration,
}

impl WatcherConfig {
    /// Config for `root` with the default debounce window.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
        }
    }
}

/// Watches a directory tree and pushes file events into the engine.
///
/// Lifecycle: created → started → stopped (terminal). Starting twice or
/// stopping before starting is not a supported transition.
pub struct FsWatcher {
    config: WatcherConfig,
    engine: Arc<CorrelationEngine>,
    running: Option<RunningWatch>,
}

struct RunningWatch {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl FsWatcher {
    /// Create a watcher that will feed `engine`. Does not touch the
    /// filesystem until [`start`](Self::start).
    #[must_use]
    pub fn new(config: WatcherConfig, engine: Arc<CorrelationEngine>) -> Self {
        Self {
            config,
            engine,
            running: None,
        }
    }

    /// Begin watching. Must be called within a tokio runtime.
    ///
    /// Canonicalizes the root (so later comparisons against agent-reported
    /// paths are consistent on case-insensitive filesystems), loads the
    /// root `.intentignore` plus each directory's `.gitignore` top-down,
    /// registers a watch per surviving directory, and spawns the
    /// background task.
    pub fn start(&mut self) -> Result<()> {
        if self.running.is_some() {
            warn!("watcher already started, ignoring");
            return Ok(());
        }

        let root = self
            .config
            .root
            .canonicalize()
            .map_err(|source| WatcherError::BadRoot {
                path: self.config.root.clone(),
                source,
            })?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
                match result {
                    Ok(event) => {
                        let _ = event_tx.send(event);
                    }
                    Err(err) => {
                        let _ = error_tx.send(err);
                    }
                }
            })?;

        let mut ignores = IgnoreSet::new();
        ignores.load_root(&root);

        // Top-down worklist: a directory's ignore rules are loaded before
        // its children are filtered.
        let mut directories = 0usize;
        let mut queue = VecDeque::from([root.clone()]);
        while let Some(dir) = queue.pop_front() {
            ignores.load_dir(&dir);
            watcher.watch(&dir, RecursiveMode::NonRecursive)?;
            directories += 1;

            for entry in std::fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                if entry.file_type()?.is_dir() && should_watch(&root, &path, true, &ignores) {
                    queue.push_back(path);
                }
            }
        }

        info!(root = %root.display(), directories, "watcher started");

        let cancel = CancellationToken::new();
        let task = WatchTask {
            root,
            watcher,
            ignores,
            debouncer: Debouncer::new(self.config.debounce_window),
            engine: Arc::clone(&self.engine),
            events: event_rx,
            errors: error_rx,
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(task.run());
        self.running = Some(RunningWatch {
            cancel,
            task: handle,
        });
        Ok(())
    }

    /// Stop watching: cancel the background task and wait for it to exit.
    ///
    /// The task owns the OS watcher; when it exits the watch handles are
    /// released. Never blocks indefinitely on in-flight events — the task
    /// observes cancellation at its next loop turn.
    pub async fn stop(&mut self) {
        if let Some(running) = self.running.take() {
            running.cancel.cancel();
            if let Err(err) = running.task.await {
                warn!(error = %err, "watch task panicked during shutdown");
            }
            info!("watcher stopped");
        }
    }
}

/// Everything the background task owns: the OS watcher, ignore state,
/// debounce state, and both notification channels.
struct WatchTask {
    root: PathBuf,
    watcher: RecommendedWatcher,
    ignores: IgnoreSet,
    debouncer: Debouncer,
    engine: Arc<CorrelationEngine>,
    events: mpsc::UnboundedReceiver<notify::Event>,
    errors: mpsc::UnboundedReceiver<notify::Error>,
    cancel: CancellationToken,
}

impl WatchTask {
    async fn run(mut self) {
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                Some(event) = self.events.recv() => self.handle_event(event),
                Some(err) = self.errors.recv() => {
                    warn!(error = %err, "filesystem notification error");
                }
                else => break,
            }
        }
        // Dropping self.watcher here releases the OS watch handles.
    }

    fn handle_event(&mut self, event: notify::Event) {
        for path in &event.paths {
            self.handle_path(&event.kind, path);
        }
    }

    fn handle_path(&mut self, kind: &EventKind, path: &Path) {
        let is_dir = path.is_dir();
        if !should_watch(&self.root, path, is_dir, &self.ignores) {
            trace!(path = %path.display(), "filtered notification");
            return;
        }

        if is_dir {
            // Newly created directories get a watch and contribute their
            // ignore rules; directories never produce file events.
            if matches!(kind, EventKind::Create(_)) {
                self.ignores.load_dir(path);
                if let Err(err) = self.watcher.watch(path, RecursiveMode::NonRecursive) {
                    warn!(path = %path.display(), error = %err, "failed to watch new directory");
                } else {
                    debug!(path = %path.display(), "watching new directory");
                }
            }
            return;
        }

        let Some(change_type) = map_change_type(kind) else {
            trace!(path = %path.display(), ?kind, "unmapped notification kind");
            return;
        };

        if !self.debouncer.should_emit(path) {
            trace!(path = %path.display(), "debounced");
            return;
        }

        let event = FileEvent {
            id: new_file_event_id(),
            path: path.to_string_lossy().into_owned(),
            change_type,
            timestamp: file_timestamp(path),
        };

        match self.engine.push_file_event(&event) {
            Ok(Some(record)) => {
                debug!(
                    path = %event.path,
                    session_id = %record.session_id,
                    "file change attributed to agent session"
                );
            }
            Ok(None) => {}
            // Degraded but continuing: a single missed event must not halt
            // observation of the rest of the tree.
            Err(err) => {
                warn!(path = %event.path, error = %err, "failed to push file event");
            }
        }
    }
}

/// Map a raw notification kind to a change type.
///
/// Kinds with no sensible mapping (access, metadata-only changes) return
/// `None` and produce no event.
fn map_change_type(kind: &EventKind) -> Option<FileChangeType> {
    match kind {
        EventKind::Create(_) => Some(FileChangeType::Create),
        EventKind::Modify(ModifyKind::Name(_)) => Some(FileChangeType::Rename),
        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => Some(FileChangeType::Modify),
        EventKind::Remove(_) => Some(FileChangeType::Delete),
        _ => None,
    }
}

/// The file's modification time if it can still be stat'd, otherwise the
/// detection time (covers delete/rename where the inode is gone).
fn file_timestamp(path: &Path) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_or_else(|_| Utc::now(), DateTime::<Utc>::from)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use intent_store::{EventKind as StoreEventKind, EventStore};
    use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode};
    use std::fs;

    fn test_engine() -> Arc<CorrelationEngine> {
        Arc::new(CorrelationEngine::with_store(
            EventStore::in_memory().unwrap(),
            Duration::from_secs(5),
        ))
    }

    async fn wait_for_file_events(engine: &CorrelationEngine, expected: i64) -> bool {
        for _ in 0..100 {
            let count = engine.store().count_events(StoreEventKind::File).unwrap();
            if count >= expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    #[test]
    fn maps_notification_kinds() {
        assert_eq!(
            map_change_type(&EventKind::Create(CreateKind::File)),
            Some(FileChangeType::Create)
        );
        assert_eq!(
            map_change_type(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(FileChangeType::Modify)
        );
        assert_eq!(
            map_change_type(&EventKind::Modify(ModifyKind::Name(RenameMode::Any))),
            Some(FileChangeType::Rename)
        );
        assert_eq!(
            map_change_type(&EventKind::Remove(RemoveKind::File)),
            Some(FileChangeType::Delete)
        );
    }

    #[test]
    fn permission_only_changes_are_dropped() {
        assert_eq!(
            map_change_type(&EventKind::Modify(ModifyKind::Metadata(
                MetadataKind::Permissions
            ))),
            None
        );
        assert_eq!(map_change_type(&EventKind::Access(notify::event::AccessKind::Any)), None);
    }

    #[test]
    fn file_timestamp_falls_back_to_now_for_missing_files() {
        let before = Utc::now();
        let ts = file_timestamp(Path::new("/definitely/not/a/real/file"));
        assert!(ts >= before);
    }

    #[test]
    fn start_fails_on_missing_root() {
        let engine = test_engine();
        let mut watcher = FsWatcher::new(WatcherConfig::new("/does/not/exist"), engine);
        // No runtime needed — canonicalization fails before spawning.
        let err = watcher.start().unwrap_err();
        assert!(matches!(err, WatcherError::BadRoot { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn emits_events_for_watched_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();

        let engine = test_engine();
        let mut watcher = FsWatcher::new(WatcherConfig::new(root), Arc::clone(&engine));
        watcher.start().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Excluded directory first, then a watched file.
        fs::write(root.join("node_modules/ignored.js"), "x").unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();

        assert!(wait_for_file_events(&engine, 1).await, "expected a file event");

        // Give the excluded-path notification time to (not) land.
        tokio::time::sleep(Duration::from_millis(300)).await;
        let count = engine.store().count_events(StoreEventKind::File).unwrap();
        assert_eq!(count, 1, "excluded paths must not produce events");

        let rows = engine
            .store()
            .query_unmatched(StoreEventKind::File, i64::MIN, i64::MAX)
            .unwrap();
        assert!(rows[0].file_path.ends_with("src/main.rs"));

        watcher.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn no_events_after_stop() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let engine = test_engine();
        let mut watcher = FsWatcher::new(WatcherConfig::new(root), Arc::clone(&engine));
        watcher.start().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        watcher.stop().await;

        fs::write(root.join("late.rs"), "x").unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(engine.store().count_events(StoreEventKind::File).unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn scoped_gitignore_excludes_only_its_subtree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("services/api")).unwrap();
        fs::create_dir_all(root.join("services/web/generated")).unwrap();
        fs::write(root.join("services/api/.gitignore"), "generated/\n").unwrap();
        fs::create_dir_all(root.join("services/api/generated")).unwrap();

        let engine = test_engine();
        let mut watcher = FsWatcher::new(WatcherConfig::new(root), Arc::clone(&engine));
        watcher.start().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        fs::write(root.join("services/api/generated/out.go"), "x").unwrap();
        fs::write(root.join("services/web/generated/out.go"), "x").unwrap();

        assert!(wait_for_file_events(&engine, 1).await);
        tokio::time::sleep(Duration::from_millis(300)).await;

        let rows = engine
            .store()
            .query_unmatched(StoreEventKind::File, i64::MIN, i64::MAX)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].file_path.contains("services/web/generated"));

        watcher.stop().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn watcher_feeds_correlation_end_to_end() {
        use intent_core::{AgentChangeType, AgentEvent};

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();

        let engine = test_engine();
        let mut watcher = FsWatcher::new(WatcherConfig::new(root), Arc::clone(&engine));
        watcher.start().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        assert!(wait_for_file_events(&engine, 1).await);

        // Agent side arrives second and wins the match.
        let agent = AgentEvent {
            id: "aev_e2e".into(),
            file_path: "src/main.rs".into(),
            change_type: AgentChangeType::Write,
            timestamp: Utc::now(),
            session_id: "s1".into(),
            exchange_id: "e1".into(),
            message_id: "m1".into(),
            agent_type: "claude-code".into(),
            agent_model: String::new(),
            actor_host: String::new(),
            actor_username: String::new(),
        };
        let record = engine.push_agent_event(&agent).unwrap();
        let record = record.expect("agent event should pair with the watched change");
        assert!(record.path.ends_with("src/main.rs"));
        assert_eq!(record.session_id, "s1");

        watcher.stop().await;
    }
}
