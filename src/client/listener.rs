//! Session signals raised by the HTTP client.
//!
//! The client reports 401/403 to a [`SessionListener`] before it returns the
//! corresponding error, so the caller can navigate (login page,
//! unauthorized view) at the point the response is seen.

use tokio::sync::mpsc;

/// A navigation-worthy session event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// 401: the credential was cleared, the user must log in again
    Expired,
    /// 403: the user is logged in but not allowed
    AccessDenied,
}

/// Receiver of session events.
pub trait SessionListener: Send + Sync {
    fn on_session_event(&self, event: SessionEvent);
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl SessionListener for NoopListener {
    fn on_session_event(&self, _event: SessionEvent) {}
}

/// Forward events to a channel, e.g. a UI event loop.
impl SessionListener for mpsc::UnboundedSender<SessionEvent> {
    fn on_session_event(&self, event: SessionEvent) {
        if self.send(event).is_err() {
            log::debug!("Session event {:?} dropped: listener gone", event);
        }
    }
}
