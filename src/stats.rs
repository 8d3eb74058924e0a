use std::{collections::BTreeMap, fmt, sync::Arc};

use itertools::Itertools;
use parking_lot::Mutex;

///
/// LogStats
///
/// Running totals for a stream of access-log entries: summed response size
/// and a count per HTTP status code. One instance per run.
///

#[derive(Clone, Debug, Default)]
pub struct LogStats {
    total_file_size: u64,
    lines: u64,
    status_counts: BTreeMap<u16, u64>,
}

impl LogStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status_code: u16, file_size: u64) {
        self.total_file_size = self.total_file_size.saturating_add(file_size);
        self.lines = self.lines.saturating_add(1);
        let count = self.status_counts.entry(status_code).or_default();
        *count = count.saturating_add(1);
    }

    pub const fn lines(&self) -> u64 {
        self.lines
    }

    pub const fn total_file_size(&self) -> u64 {
        self.total_file_size
    }

    pub fn count(&self, status_code: u16) -> u64 {
        self.status_counts.get(&status_code).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            total_file_size: self.total_file_size,
            lines: self.lines,
            status_counts: self
                .status_counts
                .iter()
                .map(|(&code, &count)| (code, count))
                .collect(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

///
/// Snapshot
///
/// Point-in-time copy of [`LogStats`]; status codes ascend.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    pub total_file_size: u64,
    pub lines: u64,
    pub status_counts: Vec<(u16, u64)>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total file size: {}", self.total_file_size)?;
        if !self.status_counts.is_empty() {
            let counts = self
                .status_counts
                .iter()
                .format_with("\n", |(code, count), f| f(&format_args!("{code}: {count}")));
            write!(f, "\n{counts}")?;
        }
        Ok(())
    }
}

/// Cloneable handle to one [`LogStats`], for a recorder and a reporter
/// living on different threads.
#[derive(Clone, Debug, Default)]
pub struct SharedLogStats {
    inner: Arc<Mutex<LogStats>>,
}

impl SharedLogStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, status_code: u16, file_size: u64) {
        self.inner.lock().record(status_code, file_size);
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// Returns the totals so far and starts over.
    pub fn take(&self) -> Snapshot {
        let mut stats = self.inner.lock();
        let snapshot = stats.snapshot();
        stats.reset();
        snapshot
    }
}

impl From<LogStats> for SharedLogStats {
    fn from(stats: LogStats) -> Self {
        Self {
            inner: Arc::new(Mutex::new(stats)),
        }
    }
}
