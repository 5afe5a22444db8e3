//! Chrome trace encoding.
//!
//! A trace document is a header, a comma separated list of complete (`"ph":"X"`) events
//! and a footer:
//!
//! ```text
//! {"otherDate": {},"traceEvents":[{"cat":"function","dur":12,"name":"load","ph":"X","pid":0,"tid":1,"ts":40}]}
//! ```
//!
//! The document is only complete once the footer is written.

use std::{borrow::Cow, io::Write};

use serde::Serialize;

use crate::Event;

const HEADER: &str = "{\"otherDate\": {},\"traceEvents\":[";
const FOOTER: &str = "]}";

#[derive(Serialize)]
struct TraceRecord<'a> {
    cat: &'static str,
    dur: u64,
    name: Cow<'a, str>,
    ph: &'static str,
    pid: u32,
    tid: u64,
    ts: u64,
}

impl<'a> From<&'a Event> for TraceRecord<'a> {
    fn from(event: &'a Event) -> Self {
        TraceRecord {
            cat: "function",
            dur: event.duration(),
            name: sanitize_name(event.name()),
            ph: "X",
            pid: 0,
            tid: event.thread(),
            ts: event.start(),
        }
    }
}

/// Double quotes in scope names become single quotes.
fn sanitize_name(name: &str) -> Cow<'_, str> {
    if name.contains('"') {
        Cow::Owned(name.replace('"', "'"))
    } else {
        Cow::Borrowed(name)
    }
}

pub(crate) fn write_header<W: Write>(w: &mut W) -> std::io::Result<()> {
    w.write_all(HEADER.as_bytes())
}

/// Writes `event` as the `index`-th event of the document; every event but the first is
/// preceded by a separator.
pub(crate) fn write_event<W: Write>(w: &mut W, event: &Event, index: u64) -> std::io::Result<()> {
    let mut buf = Vec::with_capacity(96 + event.name().len());
    if index > 0 {
        buf.push(b',');
    }
    serde_json::to_writer(&mut buf, &TraceRecord::from(event))?;
    // separator and record go out in a single write
    w.write_all(&buf)
}

pub(crate) fn write_footer<W: Write>(w: &mut W) -> std::io::Result<()> {
    w.write_all(FOOTER.as_bytes())
}
