//! Authentication for the marketplace
//!
//! Holds at most one signed-in user, checked against the seeded accounts or
//! created locally on registration, and persisted through a [`SessionStore`].
//! There is no credential hashing or token issuance: this is a local stand-in
//! until a real identity backend exists.

mod accounts;
pub mod registration;
pub mod session;
pub mod store;

pub use registration::Registration;
pub use session::{Access, Session};
#[cfg(test)]
pub use store::MemoryStore;
pub use store::SessionStore;
