use std::{borrow::Cow, time::Instant};

use crate::{
    event::{current_thread_id, init_epoch, micros_since_epoch},
    Event, Session,
};

/// Measures one named region and reports it to a [`Session`] exactly once.
///
/// The measurement ends at the first call to [`Scope::stop`], or when the guard is dropped,
/// whichever comes first. Dropping covers early returns and panics alike.
#[must_use = "the scope ends as soon as this guard is dropped"]
pub struct Scope<'s> {
    name: Option<Cow<'static, str>>,
    session: &'s Session,
    start: Instant,
}

impl<'s> Scope<'s> {
    /// Starts the clock for a scope called `name`.
    pub fn start(name: impl Into<Cow<'static, str>>, session: &'s Session) -> Self {
        init_epoch();
        let name = Some(name.into());
        Self {
            name,
            session,
            start: Instant::now(),
        }
    }

    /// Ends the measurement and hands the event to the session. Later calls do nothing.
    pub fn stop(&mut self) {
        let Some(name) = self.name.take() else {
            return;
        };
        let end = Instant::now();

        let event = Event::new(
            name,
            micros_since_epoch(self.start),
            micros_since_epoch(end),
            current_thread_id(),
        );
        self.session.record(event);
    }

    pub fn is_stopped(&self) -> bool {
        self.name.is_none()
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        self.stop();
    }
}
