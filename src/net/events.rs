//! Credential-rejected event emitted by the pipeline on HTTP 401.
//!
//! DESIGN
//! ======
//! The pipeline never calls into the session. It emits one event per
//! rejected request, and whoever owns the invalidation policy subscribes.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::cell::RefCell;
use std::rc::Rc;

/// Details of one rejected request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRejected {
    pub url: String,
    /// Whether a credential header was attached to the rejected request.
    pub had_credential: bool,
}

type Listener = Rc<dyn Fn(&CredentialRejected)>;

#[derive(Default)]
pub struct CredentialRejections {
    listeners: RefCell<Vec<Listener>>,
}

impl CredentialRejections {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&CredentialRejected) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Deliver `event` to every listener.
    ///
    /// Listeners are snapshotted first so one may subscribe re-entrantly.
    pub fn emit(&self, event: &CredentialRejected) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl std::fmt::Debug for CredentialRejections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRejections")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
