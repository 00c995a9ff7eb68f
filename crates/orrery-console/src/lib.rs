//! Bounded, thread-safe status console for Orrery sessions.
//!
//! [`BoundedLog`] is a fixed-capacity FIFO of timestamped messages.
//! The worker thread appends status lines while foreground observers
//! snapshot the whole buffer at any time; every operation is
//! linearizable behind a single mutex, so a snapshot never sees a
//! partially-updated buffer.
//!
//! Each session owns its console explicitly — there is no process-wide
//! logger instance.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default retained-message capacity.
pub const DEFAULT_CAPACITY: usize = 100;

// ── LogLevel ─────────────────────────────────────────────────────

/// Severity / category of a console message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// General information.
    Info,
    /// Lifecycle and resource events.
    System,
    /// An operation completed successfully.
    Success,
    /// Something degraded but non-fatal.
    Warning,
    /// A failure.
    Error,
    /// Periodic worker status lines.
    Status,
    /// Echoed configuration parameters.
    Config,
}

impl LogLevel {
    /// Uppercase tag used in rendered lines.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::System => "SYSTEM",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Status => "STATUS",
            Self::Config => "CONFIG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ── LogEntry ─────────────────────────────────────────────────────

/// One immutable console record.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    /// Wall-clock time of the append.
    pub timestamp: SystemTime,
    /// Message category.
    pub level: LogLevel,
    /// Message text.
    pub text: String,
}

impl LogEntry {
    fn new(text: String, level: LogLevel) -> Self {
        Self {
            timestamp: SystemTime::now(),
            level,
            text,
        }
    }
}

/// Renders as `[HH:MM:SS] [LEVEL] text` (UTC wall clock).
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
        write!(f, "[{h:02}:{m:02}:{s:02}] [{}] {}", self.level, self.text)
    }
}

// ── ConsoleError ─────────────────────────────────────────────────

/// Errors from console construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleError {
    /// Capacity must be at least 1.
    ZeroCapacity,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "console capacity must be at least 1"),
        }
    }
}

impl Error for ConsoleError {}

// ── BoundedLog ───────────────────────────────────────────────────

/// A fixed-capacity, thread-safe FIFO of console messages.
///
/// Append order is preserved exactly as insertion order regardless of
/// which thread appended; when the buffer is full, each append evicts
/// exactly the oldest entry.
pub struct BoundedLog {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

// Compile-time assertion: BoundedLog must be Send + Sync (shared
// between the worker and foreground observers).
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<BoundedLog>();
};

impl BoundedLog {
    /// Create a console retaining up to `capacity` messages.
    pub fn new(capacity: usize) -> Result<Self, ConsoleError> {
        if capacity == 0 {
            return Err(ConsoleError::ZeroCapacity);
        }
        Ok(Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        })
    }

    /// Append a message, evicting the oldest entry if the buffer is
    /// full. Returns the full rendered snapshot including the new
    /// message.
    pub fn append(&self, text: impl Into<String>, level: LogLevel) -> String {
        let entry = LogEntry::new(text.into(), level);
        let mut entries = self.entries.lock().unwrap();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
        Self::render(&entries)
    }

    /// The current rendered contents, one line per entry.
    pub fn snapshot(&self) -> String {
        let entries = self.entries.lock().unwrap();
        Self::render(&entries)
    }

    /// Remove all entries atomically.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the console holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// The retained-message capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Texts of all retained entries, oldest first. Snapshot-consistent.
    pub fn texts(&self) -> Vec<String> {
        let entries = self.entries.lock().unwrap();
        entries.iter().map(|e| e.text.clone()).collect()
    }

    fn render(entries: &VecDeque<LogEntry>) -> String {
        let mut out = String::new();
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            // fmt::Write on String cannot fail.
            use fmt::Write;
            let _ = write!(out, "{entry}");
        }
        out
    }
}

impl Default for BoundedLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY).expect("default capacity is nonzero")
    }
}

impl fmt::Debug for BoundedLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedLog")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn zero_capacity_rejected() {
        match BoundedLog::new(0) {
            Err(ConsoleError::ZeroCapacity) => {}
            Ok(_) => panic!("capacity 0 should be rejected"),
        }
    }

    #[test]
    fn append_returns_snapshot() {
        let log = BoundedLog::new(10).unwrap();
        let snap = log.append("hello", LogLevel::Info);
        assert!(snap.ends_with("[INFO] hello"));
        assert_eq!(snap, log.snapshot());
    }

    #[test]
    fn eviction_is_fifo_one_per_append() {
        let log = BoundedLog::new(3).unwrap();
        for i in 0..5 {
            log.append(format!("msg{i}"), LogLevel::Info);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.texts(), vec!["msg2", "msg3", "msg4"]);
    }

    #[test]
    fn clear_then_snapshot_is_empty() {
        let log = BoundedLog::new(5).unwrap();
        log.append("a", LogLevel::System);
        log.append("b", LogLevel::Error);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.snapshot(), "");
    }

    #[test]
    fn lines_are_well_formed() {
        let log = BoundedLog::new(10).unwrap();
        log.append("first", LogLevel::System);
        log.append("second", LogLevel::Status);
        for line in log.snapshot().lines() {
            // "[HH:MM:SS] [LEVEL] text"
            assert_eq!(line.as_bytes()[0], b'[');
            assert_eq!(&line[9..11], "] ");
            let rest = &line[11..];
            assert!(rest.starts_with('['), "bad line: {line}");
            assert!(rest.contains("] "), "bad line: {line}");
        }
    }

    #[test]
    fn concurrent_appends_retain_min_of_n_and_capacity() {
        let log = Arc::new(BoundedLog::new(50).unwrap());
        let threads = 8;
        let per_thread = 20;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        log.append(format!("t{t}-{i}"), LogLevel::Info);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // 160 appends into capacity 50: exactly 50 retained.
        assert_eq!(log.len(), 50);

        // Per-thread order must be preserved within the retained window.
        let texts = log.texts();
        for t in 0..threads {
            let mine: Vec<_> = texts
                .iter()
                .filter(|s| s.starts_with(&format!("t{t}-")))
                .collect();
            let mut last = None;
            for s in mine {
                let i: usize = s.split('-').nth(1).unwrap().parse().unwrap();
                if let Some(prev) = last {
                    assert!(i > prev, "out-of-order entries for thread {t}");
                }
                last = Some(i);
            }
        }
    }

    #[test]
    fn concurrent_snapshots_never_torn() {
        let log = Arc::new(BoundedLog::new(100).unwrap());
        let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let writer = {
            let log = Arc::clone(&log);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut i = 0u64;
                while !stop.load(std::sync::atomic::Ordering::Acquire) {
                    log.append(format!("line {i}"), LogLevel::Status);
                    i += 1;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snap = log.snapshot();
                        for line in snap.lines() {
                            assert!(line.starts_with('['), "torn line: {line}");
                            assert!(line.contains("] [STATUS] line "), "torn line: {line}");
                        }
                    }
                })
            })
            .collect();

        for r in readers {
            r.join().unwrap();
        }
        stop.store(true, std::sync::atomic::Ordering::Release);
        writer.join().unwrap();
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any append sequence retains exactly the last `capacity`
        /// messages, in insertion order.
        #[test]
        fn retains_last_capacity_in_order(
            capacity in 1usize..16,
            messages in proptest::collection::vec("[a-z]{1,8}", 0..64),
        ) {
            let log = BoundedLog::new(capacity).unwrap();
            for m in &messages {
                log.append(m.clone(), LogLevel::Info);
            }
            let expected: Vec<_> = messages
                .iter()
                .rev()
                .take(capacity)
                .rev()
                .cloned()
                .collect();
            prop_assert_eq!(log.texts(), expected);
            prop_assert!(log.len() <= capacity);
        }
    }
}
