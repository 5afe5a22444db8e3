use std::{
    borrow::Cow,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};

use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{config::SessionConfig, trace, Event, Scope};

static GLOBAL: Lazy<Session> = Lazy::new(|| {
    register_exit_hook();
    Session::new()
});

/// What a finished session wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub output: PathBuf,
    /// Events written to the trace.
    pub events: u64,
    /// Events rejected by the scope filter.
    pub filtered: u64,
    /// Events that never reached any trace, counted over the lifetime of the session handle.
    pub dropped: u64,
}

struct ActiveSession {
    name: String,
    output: PathBuf,
    sink: BufWriter<File>,
    event_count: u64,
    filtered: u64,
    filter: Option<Regex>,
    quiet: bool,
}

/// Collects events from any number of threads into one trace file at a time.
///
/// A session is inactive until [`Session::begin`] opens a trace, and stays active until
/// [`Session::end`] (or drop) writes the footer. Events recorded while inactive are dropped
/// and counted, never written.
pub struct Session {
    state: Mutex<Option<ActiveSession>>,
    dropped: AtomicU64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
            dropped: AtomicU64::new(0),
        }
    }

    /// The process-wide session used by [`crate::open_scope`] and the profiling macros.
    ///
    /// An active global session is ended when the process exits.
    pub fn global() -> &'static Session {
        &GLOBAL
    }

    /// Opens `config.output` and starts a new trace in it.
    ///
    /// A session that is already active is ended first, so its trace is complete before
    /// the new one is created. On error the session is left inactive.
    pub fn begin(&self, config: &SessionConfig) -> std::io::Result<()> {
        let filter = config.compile_filter()?;

        let mut state = self.lock();
        if let Some(prior) = state.take() {
            self.finish(prior);
        }

        let sink = open_sink(&config.output)?;
        if !config.quiet {
            print_started(&config.name, &config.output);
        }
        *state = Some(ActiveSession {
            name: config.name.clone(),
            output: config.output.clone(),
            sink,
            event_count: 0,
            filtered: 0,
            filter,
            quiet: config.quiet,
        });
        Ok(())
    }

    /// Completes the trace and closes it. Returns `None` if no session was active.
    pub fn end(&self) -> Option<SessionSummary> {
        let mut state = self.lock();
        let active = state.take()?;
        Some(self.finish(active))
    }

    /// Appends `event` to the active trace.
    pub fn record(&self, event: Event) {
        let mut state = self.lock();
        let Some(active) = state.as_mut() else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        };

        if let Some(filter) = &active.filter {
            if !filter.is_match(event.name()) {
                active.filtered += 1;
                return;
            }
        }

        match trace::write_event(&mut active.sink, &event, active.event_count) {
            Ok(()) => active.event_count += 1,
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Starts measuring a scope that reports to this session.
    pub fn scope(&self, name: impl Into<Cow<'static, str>>) -> Scope<'_> {
        Scope::start(name, self)
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    pub fn name(&self) -> Option<String> {
        self.lock().as_ref().map(|a| a.name.clone())
    }

    /// Events written so far by the active session.
    pub fn event_count(&self) -> u64 {
        self.lock().as_ref().map_or(0, |a| a.event_count)
    }

    /// Events the active session's filter rejected so far.
    pub fn filtered_events(&self) -> u64 {
        self.lock().as_ref().map_or(0, |a| a.filtered)
    }

    /// Events that reached no trace, either because no session was active or because the
    /// write failed.
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(&self, mut active: ActiveSession) -> SessionSummary {
        let closed = trace::write_footer(&mut active.sink).and_then(|_| active.sink.flush());
        let summary = SessionSummary {
            name: active.name,
            output: active.output,
            events: active.event_count,
            filtered: active.filtered,
            dropped: self.dropped_events(),
        };

        match closed {
            Ok(()) if !active.quiet => print_saved(&summary),
            Ok(()) => {}
            Err(e) => eprintln!(
                "{}",
                format!(
                    "Failed to finalize trace {}: {}",
                    summary.output.display(),
                    e
                )
                .red()
            ),
        }
        summary
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.end();
    }
}

fn open_sink(path: &Path) -> std::io::Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut sink = BufWriter::new(File::create(path)?);
    trace::write_header(&mut sink)?;
    Ok(sink)
}

extern "C" fn end_global_session() {
    if let Some(session) = Lazy::get(&GLOBAL) {
        session.end();
    }
}

fn register_exit_hook() {
    // SAFETY: the hook only touches the already initialized global session.
    if unsafe { libc::atexit(end_global_session) } != 0 {
        eprintln!(
            "{}",
            "Unable to register the exit hook, call end_session() before exiting".yellow()
        );
    }
}

fn print_started(name: &str, output: &Path) {
    println!(
        "{}",
        format!(
            "Profiling session {} started, writing to {}",
            name,
            output.display()
        )
        .cyan()
    );
}

fn print_saved(summary: &SessionSummary) {
    println!(
        "{}",
        format!(
            "Trace of session {} with {} events saved to file: {}",
            summary.name,
            summary.events,
            summary.output.display()
        )
        .green()
    );
    if summary.dropped > 0 {
        println!(
            "{}",
            format!(
                "{} events did not reach a trace and were dropped",
                summary.dropped
            )
            .yellow()
        );
    }
}
