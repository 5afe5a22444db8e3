use std::{
    io::{Error, ErrorKind},
    path::{Path, PathBuf},
};

use chrono::{Datelike, Local, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Output file used when the caller does not name one.
pub const DEFAULT_OUTPUT: &str = "results.json";

/// Overrides `output` when set.
pub const OUTPUT_ENV: &str = "SCOPETRACE_OUTPUT";
/// Overrides `filter` when set.
pub const FILTER_ENV: &str = "SCOPETRACE_FILTER";

/// How a profiling session is named, where it writes and which scopes it keeps.
///
/// Can be written by hand or loaded from the `[session]` table of a TOML file:
///
/// ```toml
/// [session]
/// name = "startup"
/// output = "target/startup.json"
/// filter = "^load_"
/// quiet = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub name: String,
    pub output: PathBuf,
    /// Only scopes whose name matches this regex are written.
    pub filter: Option<String>,
    /// Suppresses the start/saved console lines.
    pub quiet: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: "None".to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            filter: None,
            quiet: false,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    session: Option<SessionConfig>,
}

impl SessionConfig {
    pub fn new(name: impl Into<String>, output: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            output: output.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Writes to `target/trace/<date>/<hour>-<minute>-<name>.json`.
    pub fn timestamped(name: impl Into<String>) -> Self {
        let name = name.into();
        let local_time = Local::now();
        let output = format!(
            "target/trace/{}-{:02}-{:02}/{:02}-{:02}-{}.json",
            local_time.year(),
            local_time.month(),
            local_time.day(),
            local_time.hour(),
            local_time.minute(),
            name
        );
        Self::new(name, output)
    }

    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// A missing `[session]` table yields the default config.
    pub fn from_toml_str(contents: &str) -> std::io::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
        Ok(file.session.unwrap_or_default())
    }

    /// Applies `SCOPETRACE_OUTPUT` and `SCOPETRACE_FILTER` from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(output) = lookup(OUTPUT_ENV) {
            self.output = PathBuf::from(output);
        }
        if let Some(filter) = lookup(FILTER_ENV) {
            self.filter = Some(filter);
        }
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub(crate) fn compile_filter(&self) -> std::io::Result<Option<Regex>> {
        match &self.filter {
            Some(filter) => Regex::new(filter).map(Some).map_err(|e| {
                Error::new(
                    ErrorKind::InvalidInput,
                    format!("filter {filter} is not a valid regex expression: {e}"),
                )
            }),
            None => Ok(None),
        }
    }
}
