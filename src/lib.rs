//! An instrumentation profiler for multi-thread programs.
//!
//! Scopes are timed with RAII guards and written, as they finish, into a Chrome trace
//! file that `chrome://tracing` or <https://ui.perfetto.dev> can display.
//!
//! ```no_run
//! #[scopetrace::profile]
//! fn load() {
//!     scopetrace::profile_scope!("parse");
//! }
//!
//! scopetrace::begin_session("startup", scopetrace::DEFAULT_OUTPUT).unwrap();
//! load();
//! scopetrace::end_session();
//! ```

use std::{borrow::Cow, path::Path};

mod config;
mod event;
mod scope;
mod session;
mod stopwatch;
mod trace;
pub use config::{SessionConfig, DEFAULT_OUTPUT, FILTER_ENV, OUTPUT_ENV};
pub use event::{current_thread_id, now_micros, Event};
pub use scope::Scope;
pub use scopetrace_impl::profile;
pub use session::{Session, SessionSummary};
pub use stopwatch::Stopwatch;

/// Starts a session on the global handle, writing to `output`.
pub fn begin_session(name: &str, output: impl AsRef<Path>) -> std::io::Result<()> {
    Session::global().begin(&SessionConfig::new(name, output))
}

/// Starts a session on the global handle as described by `config`.
pub fn begin_session_with(config: &SessionConfig) -> std::io::Result<()> {
    Session::global().begin(config)
}

/// Ends the global session, if one is active.
pub fn end_session() {
    Session::global().end();
}

/// Starts a scope that reports to the global session.
pub fn open_scope(name: impl Into<Cow<'static, str>>) -> Scope<'static> {
    Session::global().scope(name)
}

/// Times the rest of the enclosing block on the global session.
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_scope = $crate::open_scope($name);
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {};
}
