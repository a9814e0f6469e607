//! File system watcher for live preview.
//!
//! Watches the directory containing the source document and reports changes
//! to that one file. Editors often save by writing a temp file and renaming
//! it over the old one, so the directory is watched rather than the file.

use crate::error::{Error, Result};
use log::debug;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

/// File system events for the watched source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// The file was created or modified
    Changed,
    /// The file was deleted or renamed away
    Removed,
    /// The watcher encountered an error
    Error(String),
}

/// Watches one source document for changes.
#[derive(Debug)]
pub struct SourceWatcher {
    /// The internal notify watcher, absent for channel-only watchers
    _watcher: Option<RecommendedWatcher>,
    /// Receiver for source events
    receiver: Receiver<SourceEvent>,
}

impl SourceWatcher {
    /// Start watching `path`, polling at `poll_interval` on backends that poll.
    pub fn new(path: &Path, poll_interval: Duration) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| Error::Watch(format!("'{}' is not a file path", path.display())))?;
        let dir = watch_dir(path);

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| {
                Self::handle_event(result, &file_name, &tx);
            },
            Config::default().with_poll_interval(poll_interval),
        )
        .map_err(|e| Error::Watch(format!("Failed to create file watcher: {}", e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch(format!("Failed to watch {}: {}", dir.display(), e)))?;
        debug!("Watching {} for changes to {}", dir.display(), path.display());

        Ok(Self {
            _watcher: Some(watcher),
            receiver: rx,
        })
    }

    /// A watcher fed by an existing channel instead of the file system.
    pub fn from_receiver(receiver: Receiver<SourceEvent>) -> Self {
        Self {
            _watcher: None,
            receiver,
        }
    }

    /// Convert a raw notify event into source events for the watched file.
    fn handle_event(
        result: std::result::Result<Event, notify::Error>,
        file_name: &OsString,
        tx: &Sender<SourceEvent>,
    ) {
        match result {
            Ok(event) => {
                let touches_source = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == Some(file_name.as_os_str()));
                if !touches_source {
                    return;
                }

                let source_event = match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) => Some(SourceEvent::Changed),
                    EventKind::Remove(_) => Some(SourceEvent::Removed),
                    // Access and other events don't change content
                    _ => None,
                };

                if let Some(evt) = source_event {
                    let _ = tx.send(evt);
                }
            }
            Err(e) => {
                let _ = tx.send(SourceEvent::Error(e.to_string()));
            }
        }
    }

    /// Block until at least one event arrives, then drain everything pending.
    ///
    /// Returns `None` once the event channel has closed.
    pub fn wait(&self) -> Option<Vec<SourceEvent>> {
        let first = self.receiver.recv().ok()?;
        let mut events = vec![first];
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        Some(events)
    }
}

/// Directory to watch for `path`; a bare file name means the current directory.
fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> std::result::Result<Event, notify::Error> {
        Ok(Event::new(kind).add_path(PathBuf::from(path)))
    }

    #[test]
    fn test_handle_event_filters_to_source() {
        let (tx, rx) = channel();
        let name = OsString::from("doc.kdml");

        SourceWatcher::handle_event(
            event(EventKind::Modify(ModifyKind::Any), "/work/doc.kdml"),
            &name,
            &tx,
        );
        SourceWatcher::handle_event(
            event(EventKind::Modify(ModifyKind::Any), "/work/out.html"),
            &name,
            &tx,
        );
        SourceWatcher::handle_event(
            event(EventKind::Create(CreateKind::File), "/work/doc.kdml"),
            &name,
            &tx,
        );
        SourceWatcher::handle_event(
            event(EventKind::Remove(RemoveKind::File), "/work/doc.kdml"),
            &name,
            &tx,
        );
        drop(tx);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(
            events,
            vec![
                SourceEvent::Changed,
                SourceEvent::Changed,
                SourceEvent::Removed
            ]
        );
    }

    #[test]
    fn test_handle_event_passes_errors() {
        let (tx, rx) = channel();
        SourceWatcher::handle_event(
            Err(notify::Error::generic("boom")),
            &OsString::from("doc.kdml"),
            &tx,
        );
        assert!(matches!(rx.try_recv(), Ok(SourceEvent::Error(_))));
    }

    #[test]
    fn test_wait_drains_pending_events() {
        let (tx, rx) = channel();
        let watcher = SourceWatcher::from_receiver(rx);

        tx.send(SourceEvent::Changed).unwrap();
        tx.send(SourceEvent::Changed).unwrap();
        assert_eq!(watcher.wait().unwrap().len(), 2);

        drop(tx);
        assert!(watcher.wait().is_none());
    }

    #[test]
    fn test_watch_dir() {
        assert_eq!(watch_dir(Path::new("doc.kdml")), PathBuf::from("."));
        assert_eq!(watch_dir(Path::new("docs/doc.kdml")), PathBuf::from("docs"));
    }
}
