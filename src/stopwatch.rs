use std::time::{Duration, Instant};

/// Prints how long it lived when dropped, as `1234us (1.234ms)`.
///
/// Independent of any [`crate::Session`]; use it for quick timings that should not end up
/// in a trace.
pub struct Stopwatch {
    start: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        println!("{}", format_elapsed(self.elapsed()));
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let micros = elapsed.as_micros();
    format!("{}us ({}ms)", micros, micros as f64 / 1000.0)
}
