use std::{
    borrow::Cow,
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use once_cell::sync::Lazy;

/// Every timestamp in a trace is measured from this instant.
static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Microseconds elapsed on the monotonic clock since the process-wide trace epoch.
pub fn now_micros() -> u64 {
    micros_since_epoch(Instant::now())
}

/// Fixes the trace epoch if nobody did yet, so instants taken afterwards never predate it.
pub(crate) fn init_epoch() {
    Lazy::force(&EPOCH);
}

pub(crate) fn micros_since_epoch(instant: Instant) -> u64 {
    instant.saturating_duration_since(*EPOCH).as_micros() as u64
}

/// A small integer identifying the calling thread in traces.
///
/// Ids are handed out on first use, starting at 1, and are never reused within a process.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// One completed measurement, ready to be written into a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: Cow<'static, str>,
    start: u64,
    end: u64,
    thread: u64,
}

impl Event {
    /// `end` is clamped so that it never precedes `start`.
    pub fn new(name: impl Into<Cow<'static, str>>, start: u64, end: u64, thread: u64) -> Self {
        Self {
            name: name.into(),
            start,
            end: end.max(start),
            thread,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn thread(&self) -> u64 {
        self.thread
    }

    pub fn duration(&self) -> u64 {
        self.end - self.start
    }
}
