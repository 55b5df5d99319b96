// src/query/debounce.rs

//! Debounced search input.
//!
//! Keystrokes are fed through [`SearchDebouncer::input`]. A background task
//! restarts its timer on every keystroke and commits the latest text once
//! the input has been quiet for the configured delay. Commits arrive on the
//! receiver returned by [`SearchDebouncer::spawn`]; the consumer applies
//! them as the active search term (which resets pagination).
//!
//! ```text
//! Idle --input--> Pending(text) --quiet for delay--> Committed(text)
//!                   ^      |
//!                   +input-+   (restarts the timer, drops the pending text)
//! ```

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Observable state of the debouncer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DebounceState {
    /// No input received yet
    #[default]
    Idle,
    /// Waiting for the input to quiesce
    Pending(String),
    /// Last committed text
    Committed(String),
}

/// Handle to a running debounce task.
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) stops the
/// task; a pending commit is discarded and never fires.
#[derive(Debug)]
pub struct SearchDebouncer {
    input_tx: mpsc::UnboundedSender<String>,
    state_rx: watch::Receiver<DebounceState>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Spawn a debouncer with its own cancellation token.
    pub fn spawn(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        Self::spawn_with_token(delay, CancellationToken::new())
    }

    /// Spawn a debouncer stopped by `cancel`, e.g. a view's teardown token.
    pub fn spawn_with_token(
        delay: Duration,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (commit_tx, commit_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(DebounceState::Idle);

        let task = tokio::spawn(run(delay, input_rx, commit_tx, state_tx, cancel.clone()));

        let debouncer = Self {
            input_tx,
            state_rx,
            cancel,
            task,
        };
        (debouncer, commit_rx)
    }

    /// Feed the current input text. Ignored after shutdown.
    pub fn input(&self, text: impl Into<String>) {
        if self.input_tx.send(text.into()).is_err() {
            log::debug!("Search input ignored: debouncer stopped");
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state_rx.borrow().clone()
    }

    /// Stop the task, discarding any pending commit.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.task.is_finished()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

async fn run(
    delay: Duration,
    mut input_rx: mpsc::UnboundedReceiver<String>,
    commit_tx: mpsc::UnboundedSender<String>,
    state_tx: watch::Sender<DebounceState>,
    cancel: CancellationToken,
) {
    loop {
        let mut latest = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            next = input_rx.recv() => match next {
                Some(text) => text,
                None => break,
            },
        };
        state_tx.send_replace(DebounceState::Pending(latest.clone()));

        // Restart the timer on every keystroke until the input goes quiet.
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                next = input_rx.recv() => match next {
                    Some(text) => {
                        latest = text;
                        state_tx.send_replace(DebounceState::Pending(latest.clone()));
                    }
                    None => return,
                },
                () = sleep(delay) => break,
            }
        }

        state_tx.send_replace(DebounceState::Committed(latest.clone()));
        if commit_tx.send(latest).is_err() {
            break;
        }
    }
    log::debug!("Search debouncer stopped");
}
