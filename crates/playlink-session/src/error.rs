//! Error types for the session layer.

use playlink_store::StoreError;

/// Errors that can occur while talking to the provider or the store.
///
/// None of these escape the sign-in operations of
/// [`SessionManager`](crate::SessionManager): a failed silent sign-in
/// escalates to the interactive flow, and a failed interactive sign-in
/// becomes a notice for the player. They show up in provider
/// implementations, in logs, and in the few accessors that read the store.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Sign-in did not produce an identity: no cached credential, network
    /// trouble, revoked consent, a rejected result payload...
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Sign-in worked but the player profile could not be fetched.
    #[error("player profile unavailable: {0}")]
    ProfileUnavailable(String),

    /// Any other provider call failed (UI flow unavailable, achievement
    /// or leaderboard request rejected).
    #[error("provider request failed: {0}")]
    Provider(String),

    /// Reading or writing the login preference failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
