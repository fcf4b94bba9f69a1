//! Background fetches.
//!
//! Each fetch runs on its own thread and reports back over a channel; the UI
//! thread applies completions in the order they arrive.

use crate::dashboard::FetchTicket;
use crate::error::Result;
use crate::source::ResultSource;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A finished fetch: the ticket it was issued for and the raw body or error.
pub type Completion = (FetchTicket, Result<String>);

/// Fetch from `source` on a new thread and send the result to `tx`.
///
/// A closed receiver means the UI is gone; the result is discarded.
pub fn spawn_fetch(
    source: Arc<dyn ResultSource>,
    ticket: FetchTicket,
    tx: Sender<Completion>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let body = source.fetch();
        let _ = tx.send((ticket, body));
    })
}
