//! Mailbox port — wake-ups driven by the alarm provider's e-mail alerts.

use std::future::Future;

use vsure_domain::error::VsureError;

/// Blocks until the watched mailbox reports a change.
///
/// The notifier owns a single long-lived session, hence `&mut self`.
pub trait MailboxNotifier {
    /// Wait for the next change notification.
    ///
    /// # Errors
    ///
    /// Returns [`VsureError::Mailbox`] when the session breaks; the caller
    /// is expected to stop listening.
    fn wait_for_change(&mut self) -> impl Future<Output = Result<(), VsureError>>;
}
