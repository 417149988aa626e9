//! Network layer - backend calls, login and log polling
//!
//! The Network actor receives commands from the App layer and sends back responses.

pub mod actor;
pub mod auth;
pub mod client;
pub mod poller;

#[cfg(test)]
pub(crate) mod fake;

pub use actor::NetworkActor;
pub use auth::{AuthClient, AuthError};
pub use client::{create_client, Backend, BackendError, HttpBackend};
pub use poller::{LogPoller, PollHandle, PollState};
