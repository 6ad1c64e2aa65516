//! Counter state, allocation log, and the JSON file store behind them.
//!
//! One `Allocator` instance is shared by every handler. All mutations go
//! through short critical sections on a single mutex; the lock is never
//! held across an await, so slow Telegram calls happen between the
//! reserve and commit steps.

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::{fmt, fs};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::STEP;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// One issued, announced range together with the message that announced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub message_id: i32,
    pub from_num: i64,
    pub to_num: i64,
}

/// The persisted record. Field names are the on-disk JSON keys; the file
/// format predates this codebase and must stay readable across restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub global_number: i64,
    pub sent_messages: Vec<Allocation>,
}

impl Default for CounterState {
    fn default() -> Self {
        Self { global_number: 1, sent_messages: Vec::new() }
    }
}

/// Simple JSON file store, written in full on every mutation.
struct FileStore {
    path: PathBuf,
}

impl FileStore {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing file and unreadable JSON both fall back to the default
    /// state; the bot must come up even after a botched deploy.
    fn load(&self) -> CounterState {
        match fs::read_to_string(&self.path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(state) => state,
                Err(e) => {
                    log::warn!("state file {} is corrupt ({e}), starting fresh", self.path.display());
                    CounterState::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => CounterState::default(),
            Err(e) => {
                log::warn!("cannot read state file {} ({e}), starting fresh", self.path.display());
                CounterState::default()
            }
        }
    }

    /// Atomic-ish replace: write a sibling tmp file, then rename over.
    fn save(&self, state: &CounterState) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Outcome of validating an undo request against the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UndoCheck {
    /// Nothing has been allocated (or everything was already undone).
    Empty,
    /// The quoted message is not the newest log entry.
    NotLast,
    /// The quoted message matches the newest entry; deletion may proceed.
    Eligible,
}

/// Mutex-guarded counter plus log, mirrored to disk after every commit.
pub struct Allocator {
    state: Mutex<CounterState>,
    store: FileStore,
}

impl Allocator {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = FileStore::new(path);
        let state = store.load();
        log::info!(
            "state loaded: next number {:05}, {} allocation(s) on record",
            state.global_number,
            state.sent_messages.len()
        );
        Self { state: Mutex::new(state), store }
    }

    fn lock(&self) -> MutexGuard<'_, CounterState> {
        // A poisoned lock only means a handler panicked mid-section;
        // the state itself is still the best copy we have.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn persist(&self, state: &CounterState) {
        if let Err(e) = self.store.save(state) {
            log::error!("failed to persist state: {e}");
        }
    }

    /// Reserves the next range and advances the counter past it.
    ///
    /// The advance happens before the announcement is sent; a failed send
    /// must be followed by `rollback`. A crash in between loses the range
    /// for good, which is the accepted trade-off for never issuing the
    /// same range twice under concurrent requests.
    pub fn reserve(&self) -> (i64, i64) {
        let mut st = self.lock();
        let from = st.global_number;
        let to = from + STEP - 1;
        st.global_number = to + 1;
        (from, to)
    }

    /// Records a successfully announced range.
    pub fn commit(&self, message_id: i32, from: i64, to: i64) {
        let mut st = self.lock();
        st.sent_messages.push(Allocation { message_id, from_num: from, to_num: to });
        self.persist(&st);
    }

    /// Returns the counter to `from` after a failed send. The log was
    /// never touched, so there is nothing else to undo. Deliberately not
    /// persisted: `reserve` did not write either, so the file still holds
    /// the last committed snapshot and rewriting it would be a no-op.
    pub fn rollback(&self, from: i64) {
        let mut st = self.lock();
        st.global_number = from;
    }

    /// Moves the counter to an explicit value, history be damned.
    pub fn reset(&self, n: i64) {
        let mut st = self.lock();
        st.global_number = n;
        self.persist(&st);
    }

    /// Validates an undo request before any network call is made.
    pub fn check_undo(&self, reply_id: i32) -> UndoCheck {
        let st = self.lock();
        match st.sent_messages.last() {
            None => UndoCheck::Empty,
            Some(last) if last.message_id != reply_id => UndoCheck::NotLast,
            Some(_) => UndoCheck::Eligible,
        }
    }

    /// Pops the newest allocation and rewinds the counter to its start.
    ///
    /// Re-verifies the id because an allocation may have landed while the
    /// delete call was in flight; in that case nothing is changed and the
    /// caller reports a rejection.
    pub fn commit_undo(&self, reply_id: i32) -> bool {
        let mut st = self.lock();
        match st.sent_messages.last() {
            Some(last) if last.message_id == reply_id => {
                let from = last.from_num;
                st.sent_messages.pop();
                st.global_number = from;
                self.persist(&st);
                true
            }
            _ => false,
        }
    }

    /// Copy of the current state, mostly for logging and tests.
    pub fn snapshot(&self) -> CounterState {
        self.lock().clone()
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator").field("state", &self.snapshot()).finish()
    }
}
