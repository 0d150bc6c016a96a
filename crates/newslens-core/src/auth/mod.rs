//! Authentication building blocks: the credential holder and the
//! process-wide login/logout notifier.

pub mod credential;
pub mod notifier;

pub use credential::{CredentialHolder, CredentialStore};
pub use notifier::{AuthBus, AuthListener, AuthSignal, ProcessAuthBus, Subscription};
