//! The session state machine: the owned [`Session`] value and the
//! [`SessionController`] that drives every transition on it.

pub mod controller;
pub mod model;

pub use controller::SessionController;
pub use model::{Session, Tab, TabLoadState};
