//! Debounced search input.
//!
//! Rapid keystrokes are collapsed into a single filter pass once the input
//! has been quiet for the configured period.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Sending half: one call per keystroke.
#[derive(Debug, Clone)]
pub struct SearchInput {
    tx: mpsc::UnboundedSender<String>,
}

impl SearchInput {
    /// Record the current input value. Returns `false` once the debouncer has
    /// been dropped.
    pub fn push(&self, term: impl Into<String>) -> bool {
        self.tx.send(term.into()).is_ok()
    }
}

/// Receiving half: yields the latest term after each quiet period.
#[derive(Debug)]
pub struct Debouncer {
    rx: mpsc::UnboundedReceiver<String>,
    quiet: Duration,
}

/// Create a connected input/debouncer pair.
#[must_use]
pub fn debounced(quiet: Duration) -> (SearchInput, Debouncer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (SearchInput { tx }, Debouncer { rx, quiet })
}

impl Debouncer {
    #[must_use]
    pub const fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Wait for the next settled term.
    ///
    /// Returns `None` when every [`SearchInput`] is gone and nothing is
    /// pending. A term that is pending when the inputs close is still
    /// delivered.
    pub async fn next(&mut self) -> Option<String> {
        let mut latest = self.rx.recv().await?;
        let mut deadline = Instant::now() + self.quiet;
        loop {
            tokio::select! {
                () = sleep_until(deadline) => return Some(latest),
                next = self.rx.recv() => match next {
                    Some(term) => {
                        latest = term;
                        deadline = Instant::now() + self.quiet;
                    }
                    None => return Some(latest),
                },
            }
        }
    }
}
