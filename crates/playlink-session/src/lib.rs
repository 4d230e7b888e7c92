//! Sign-in session management for Playlink.
//!
//! This crate owns the one piece of state a game keeps about its
//! game-services account:
//!
//! 1. **Identity**: who is signed in right now, if anyone
//!    ([`SessionManager::identity`])
//! 2. **Login preference**: whether the player wants to be signed in at
//!    all, persisted through a [`PreferenceStore`](playlink_store::PreferenceStore)
//! 3. **Pending UI flows**: which external screens were launched and are
//!    waiting for their result to come back
//!
//! Everything else (the actual sign-in protocol, achievements,
//! leaderboards) is forwarded to an [`AuthProvider`], and anything the
//! player has to see goes through the [`HostApp`].
//!
//! # How it fits in the stack
//!
//! ```text
//! Host app (above)  ← calls init(), forwards UI results, shows notices
//!     ↕
//! Session layer (this crate)  ← decides silent vs interactive sign-in
//!     ↕
//! Provider + Store (below)  ← platform SDK, durable preferences
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod host;
mod manager;
mod pending;
mod provider;
mod session;

pub use error::SessionError;
pub use host::HostApp;
pub use manager::SessionManager;
pub use pending::{PendingRequests, PendingUiRequest};
pub use provider::AuthProvider;
pub use session::{AuthOutcome, SessionConfig, SessionStatus, UiResult};
