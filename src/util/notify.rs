//! Notification sink for user-facing error messages.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

/// Fire-and-forget error surface.
pub trait Notifier {
    fn error(&self, message: &str);
}

/// Writes notifications to the log only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Pushes notifications into the reactive notice list rendered by the app.
#[cfg(feature = "csr")]
#[derive(Clone, Copy)]
pub struct SignalNotifier(pub leptos::prelude::RwSignal<crate::state::notice::NoticeState>);

#[cfg(feature = "csr")]
impl Notifier for SignalNotifier {
    fn error(&self, message: &str) {
        use leptos::prelude::Update;

        log::error!("{message}");
        self.0.update(|state| {
            state.push(message);
        });
    }
}
