//! # Cart Events
//!
//! Push notifications from the store to whatever renders the cart.
//!
//! The store calls the emitter after every state change, with its lock
//! released, so an emitter may read the store again without deadlocking.

use crate::store::CartSnapshot;

/// Which request an error message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Checkout,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Fetch => write!(f, "fetch"),
            ErrorKind::Checkout => write!(f, "checkout"),
        }
    }
}

/// Trait for emitting cart events to the UI.
pub trait CartEventEmitter: Send + Sync {
    /// Emits the state after a change.
    fn emit_snapshot(&self, snapshot: &CartSnapshot);

    /// Emits the advisory message of a failed request.
    fn emit_error(&self, kind: ErrorKind, message: &str);
}

/// No-op event emitter.
pub struct NoOpEmitter;

impl CartEventEmitter for NoOpEmitter {
    fn emit_snapshot(&self, _snapshot: &CartSnapshot) {}
    fn emit_error(&self, _kind: ErrorKind, _message: &str) {}
}
