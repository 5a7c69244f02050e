//! Per-path write serialization
//!
//! A [`WriteRegistry`] hands out FIFO tickets per canonical file path.
//! A ticket becomes a [`WriteGuard`] once it reaches the head of its queue and
//! no reader holds the path; readers take a shared [`ReadGuard`] and wait
//! only while a write is in progress. All waits park on a single condition
//! variable and every guard or unredeemed ticket releases its claim on drop.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::{interrupted, timed_out, Result};

/// Ticket number reported for readers, which never hold a ticket
const READER_TICKET: u64 = 0;

#[derive(Debug, Default)]
struct PathState {
    queue: VecDeque<u64>,
    readers: usize,
    writing: bool,
}

impl PathState {
    fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.readers == 0 && !self.writing
    }
}

#[derive(Debug, Default)]
struct Shared {
    paths: Mutex<PathMap>,
    changed: Condvar,
    next_ticket: AtomicU64,
}

impl Shared {
    /// Drop the entry for `path` once nobody references it and wake waiters
    fn settle(&self, mut paths: MutexGuard<'_, PathMap>, path: &Path) {
        if paths.get(path).is_some_and(PathState::is_idle) {
            paths.remove(path);
        }
        drop(paths);
        self.changed.notify_all();
    }
}

/// Cooperative cancellation flag for a pending wait
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Registry of per-path write queues
///
/// Cloning is cheap; clones share the same queues.
#[derive(Debug, Clone, Default)]
pub struct WriteRegistry {
    shared: Arc<Shared>,
}

impl WriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the write queue for `path`.
    ///
    /// Tickets are numbered from a registry-wide counter, so across all
    /// paths a smaller number was always enqueued earlier.
    pub fn enqueue(&self, path: &Path) -> WriteTicket {
        let key = path_key(path);
        let mut paths = self.shared.paths.lock();
        let seq = self.shared.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let state = paths.entry(key.clone()).or_default();
        state.queue.push_back(seq);
        tracing::debug!(
            path = %key.display(),
            ticket = seq,
            queue_len = state.queue.len(),
            "enqueued writer"
        );
        drop(paths);

        WriteTicket {
            registry: self.clone(),
            path: key,
            seq,
            redeemed: false,
        }
    }

    /// Wait until no write to `path` is in progress, then hold it for reading
    pub fn read(&self, path: &Path) -> ReadGuard {
        let key = path_key(path);
        let mut paths = self.shared.paths.lock();
        while !claim_read(&mut paths, &key) {
            self.shared.changed.wait(&mut paths);
        }
        drop(paths);

        ReadGuard {
            registry: self.clone(),
            path: key,
        }
    }

    /// Like [`read`](Self::read), giving up after `timeout`
    ///
    /// # Errors
    ///
    /// `ERR_TIMEOUT` if a write is still in progress when `timeout` elapses.
    pub fn read_timeout(&self, path: &Path, timeout: Duration) -> Result<ReadGuard> {
        self.acquire_read(path, Some(Instant::now() + timeout), None)
    }

    /// Like [`read`](Self::read), until `token` is cancelled
    ///
    /// # Errors
    ///
    /// `ERR_INTERRUPTED` once [`cancel`](Self::cancel) is called on `token`.
    pub fn read_cancellable(&self, path: &Path, token: &CancelToken) -> Result<ReadGuard> {
        self.acquire_read(path, None, Some(token))
    }

    fn acquire_read(
        &self,
        path: &Path,
        deadline: Option<Instant>,
        token: Option<&CancelToken>,
    ) -> Result<ReadGuard> {
        let key = path_key(path);
        let mut paths = self.shared.paths.lock();
        loop {
            if token.is_some_and(CancelToken::is_cancelled) {
                tracing::debug!(path = %key.display(), "read wait cancelled");
                return Err(interrupted(&key));
            }

            if claim_read(&mut paths, &key) {
                break;
            }

            match deadline {
                Some(deadline) if Instant::now() >= deadline => {
                    return Err(timed_out(&key, READER_TICKET));
                }
                Some(deadline) => {
                    self.shared.changed.wait_until(&mut paths, deadline);
                }
                None => self.shared.changed.wait(&mut paths),
            }
        }
        drop(paths);

        Ok(ReadGuard {
            registry: self.clone(),
            path: key,
        })
    }

    /// Cancel every wait using `token`
    pub fn cancel(&self, token: &CancelToken) {
        token.cancelled.store(true, Ordering::SeqCst);
        // Take the lock so no waiter sits between its flag check and parking
        let paths = self.shared.paths.lock();
        drop(paths);
        self.shared.changed.notify_all();
    }

    /// Number of writers queued for `path`, the active one included
    pub fn queue_len(&self, path: &Path) -> usize {
        let key = path_key(path);
        self.shared
            .paths
            .lock()
            .get(&key)
            .map_or(0, |s| s.queue.len())
    }

    /// Number of readers currently holding `path`
    pub fn reader_count(&self, path: &Path) -> usize {
        let key = path_key(path);
        self.shared.paths.lock().get(&key).map_or(0, |s| s.readers)
    }

    /// Number of paths with queued writers or active readers
    pub fn tracked_paths(&self) -> usize {
        self.shared.paths.lock().len()
    }
}

/// A place in a path's write queue
///
/// Dropping an unredeemed ticket leaves the queue.
#[derive(Debug)]
pub struct WriteTicket {
    registry: WriteRegistry,
    path: PathBuf,
    seq: u64,
    redeemed: bool,
}

impl WriteTicket {
    /// Registry-wide ticket number
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until this ticket may write
    pub fn wait(self) -> WriteGuard {
        let shared = Arc::clone(&self.registry.shared);
        let mut paths = shared.paths.lock();
        while !claim_write(&mut paths, &self.path, self.seq) {
            shared.changed.wait(&mut paths);
        }
        drop(paths);
        self.into_guard()
    }

    /// Block until this ticket may write, giving up after `timeout`
    ///
    /// # Errors
    ///
    /// `ERR_TIMEOUT` if the ticket has not reached the head in time. The
    /// ticket leaves the queue either way.
    pub fn wait_timeout(self, timeout: Duration) -> Result<WriteGuard> {
        self.acquire(Some(Instant::now() + timeout), None)
    }

    /// Block until this ticket may write or `token` is cancelled
    ///
    /// # Errors
    ///
    /// `ERR_INTERRUPTED` once [`WriteRegistry::cancel`] is called on `token`.
    pub fn wait_cancellable(self, token: &CancelToken) -> Result<WriteGuard> {
        self.acquire(None, Some(token))
    }

    fn acquire(
        self,
        deadline: Option<Instant>,
        token: Option<&CancelToken>,
    ) -> Result<WriteGuard> {
        let shared = Arc::clone(&self.registry.shared);
        let mut paths = shared.paths.lock();
        loop {
            if token.is_some_and(CancelToken::is_cancelled) {
                tracing::debug!(ticket = self.seq, "write wait cancelled");
                drop(paths);
                return Err(interrupted(&self.path));
            }

            if claim_write(&mut paths, &self.path, self.seq) {
                break;
            }

            match deadline {
                Some(deadline) if Instant::now() >= deadline => {
                    tracing::debug!(ticket = self.seq, "write wait timed out");
                    drop(paths);
                    return Err(timed_out(&self.path, self.seq));
                }
                Some(deadline) => {
                    shared.changed.wait_until(&mut paths, deadline);
                }
                None => shared.changed.wait(&mut paths),
            }
        }
        drop(paths);
        Ok(self.into_guard())
    }

    fn into_guard(mut self) -> WriteGuard {
        self.redeemed = true;
        tracing::debug!(ticket = self.seq, path = %self.path.display(), "writer acquired");
        WriteGuard {
            registry: self.registry.clone(),
            path: std::mem::take(&mut self.path),
            seq: self.seq,
        }
    }
}

impl Drop for WriteTicket {
    fn drop(&mut self) {
        if self.redeemed {
            return;
        }
        let paths = {
            let mut paths = self.registry.shared.paths.lock();
            if let Some(state) = paths.get_mut(&self.path) {
                state.queue.retain(|t| *t != self.seq);
            }
            paths
        };
        self.registry.shared.settle(paths, &self.path);
    }
}

/// Exclusive write access to a path
#[derive(Debug)]
pub struct WriteGuard {
    registry: WriteRegistry,
    path: PathBuf,
    seq: u64,
}

impl WriteGuard {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Canonical path this guard holds
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        let paths = {
            let mut paths = self.registry.shared.paths.lock();
            if let Some(state) = paths.get_mut(&self.path) {
                state.writing = false;
                if state.queue.front() == Some(&self.seq) {
                    state.queue.pop_front();
                } else {
                    state.queue.retain(|t| *t != self.seq);
                }
            }
            paths
        };
        tracing::debug!(ticket = self.seq, "writer released");
        self.registry.shared.settle(paths, &self.path);
    }
}

/// Shared read access to a path
#[derive(Debug)]
pub struct ReadGuard {
    registry: WriteRegistry,
    path: PathBuf,
}

impl ReadGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ReadGuard {
    fn drop(&mut self) {
        let paths = {
            let mut paths = self.registry.shared.paths.lock();
            if let Some(state) = paths.get_mut(&self.path) {
                state.readers = state.readers.saturating_sub(1);
            }
            paths
        };
        self.registry.shared.settle(paths, &self.path);
    }
}

type PathMap = HashMap<PathBuf, PathState>;

/// Register a reader unless a write is in progress
fn claim_read(paths: &mut PathMap, key: &Path) -> bool {
    if paths.get(key).is_some_and(|s| s.writing) {
        return false;
    }
    paths.entry(key.to_path_buf()).or_default().readers += 1;
    true
}

/// Mark `key` as being written if `seq` is at the head and nobody reads
fn claim_write(paths: &mut PathMap, key: &Path, seq: u64) -> bool {
    match paths.get_mut(key) {
        Some(state)
            if state.queue.front() == Some(&seq) && state.readers == 0 && !state.writing =>
        {
            state.writing = true;
            true
        }
        _ => false,
    }
}

/// Key under which a path is queued.
///
/// Existing files are canonicalized; for a file not created yet the parent
/// directory is canonicalized instead, so both spellings share one queue.
fn path_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(dir) => dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|p| p.join(name))
            .unwrap_or_else(|_| absolute.clone()),
        _ => absolute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propline_core::ExErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_tickets_are_monotonic() {
        let registry = WriteRegistry::new();
        let a = registry.enqueue(Path::new("a.properties"));
        let b = registry.enqueue(Path::new("b.properties"));
        assert!(a.seq() < b.seq());
    }

    #[test]
    fn test_same_file_shares_queue() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("m.properties");
        std::fs::write(&file, "").unwrap();
        let registry = WriteRegistry::new();

        let _first = registry.enqueue(&file);
        let _second = registry.enqueue(&dir.path().join(".").join("m.properties"));

        assert_eq!(registry.queue_len(&file), 2);
    }

    #[test]
    fn test_dropped_ticket_leaves_queue() {
        let registry = WriteRegistry::new();
        let path = Path::new("dropped.properties");

        let ticket = registry.enqueue(path);
        assert_eq!(registry.queue_len(path), 1);
        drop(ticket);

        assert_eq!(registry.queue_len(path), 0);
        assert_eq!(registry.tracked_paths(), 0);
    }

    #[test]
    fn test_second_ticket_times_out_behind_first() {
        let registry = WriteRegistry::new();
        let path = Path::new("busy.properties");

        let first = registry.enqueue(path);
        let second = registry.enqueue(path);
        let _guard = first.wait();

        let err = second.wait_timeout(Duration::from_millis(20)).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Timeout);
        assert_eq!(registry.queue_len(path), 1);
    }

    #[test]
    fn test_writer_waits_for_reader() {
        let registry = WriteRegistry::new();
        let path = Path::new("read.properties");

        let reader = registry.read(path);
        let blocked = registry
            .enqueue(path)
            .wait_timeout(Duration::from_millis(10));
        assert!(blocked.is_err());
        drop(reader);

        let guard = registry
            .enqueue(path)
            .wait_timeout(Duration::from_millis(500))
            .unwrap();
        assert_eq!(registry.reader_count(path), 0);
        drop(guard);
        assert_eq!(registry.tracked_paths(), 0);
    }

    #[test]
    fn test_reader_times_out_during_write() {
        let registry = WriteRegistry::new();
        let path = Path::new("w.properties");

        let _guard = registry.enqueue(path).wait();

        let err = registry
            .read_timeout(path, Duration::from_millis(10))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Timeout);
    }

    #[test]
    fn test_cancelled_token_interrupts_wait() {
        let registry = WriteRegistry::new();
        let path = Path::new("c.properties");
        let token = CancelToken::new();

        let _guard = registry.enqueue(path).wait();
        let waiting = registry.enqueue(path);
        registry.cancel(&token);

        let err = waiting.wait_cancellable(&token).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Interrupted);
        assert_eq!(registry.queue_len(path), 1);
    }

    #[test]
    fn test_cancelled_token_interrupts_read() {
        let registry = WriteRegistry::new();
        let path = Path::new("rc.properties");
        let token = CancelToken::new();

        let guard = registry.enqueue(path).wait();
        registry.cancel(&token);

        let err = registry.read_cancellable(path, &token).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Interrupted);
        assert_eq!(registry.reader_count(path), 0);
        drop(guard);
        assert_eq!(registry.tracked_paths(), 0);
    }

    #[test]
    fn test_read_cancellable_proceeds_without_writer() {
        let registry = WriteRegistry::new();
        let path = Path::new("rf.properties");

        let reader = registry.read_cancellable(path, &CancelToken::new()).unwrap();
        assert_eq!(registry.reader_count(path), 1);
        drop(reader);
        assert_eq!(registry.tracked_paths(), 0);
    }
}
