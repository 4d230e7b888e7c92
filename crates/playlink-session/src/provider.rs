//! The game-services provider abstraction.
//!
//! Playlink doesn't speak any platform's sign-in protocol itself. The
//! [`AuthProvider`] trait is the seam where a real SDK binding (or the
//! offline provider used in development and tests) plugs in.

use std::future::Future;

use playlink_protocol::{Identity, PlayerProfile, PopupAnchor, ResourceKey, UiFlow};

use crate::SessionError;

/// Capabilities of the external game-services platform.
///
/// The asynchronous methods return `impl Future + Send` so that
/// implementors can simply write `async fn`, and the session layer can
/// spawn provider work (sign-out) onto the Tokio runtime.
///
/// Fire-and-forget calls (`unlock_achievement`, `submit_score`, ...) are
/// synchronous: the platform queues them and syncs in the background.
/// Their `Result` only reports whether the request was accepted.
///
/// # Example
///
/// ```rust
/// use playlink_protocol::{
///     AccountId, FlowKind, Identity, PlayerProfile, PopupAnchor, ResourceKey,
///     UiFlow,
/// };
/// use playlink_session::{AuthProvider, SessionError};
///
/// /// Signs everyone in as the same account. Development only.
/// struct AlwaysSignedIn;
///
/// impl AuthProvider for AlwaysSignedIn {
///     type Payload = ();
///
///     fn cached_account(&self) -> Option<Identity> {
///         None
///     }
///
///     async fn silent_sign_in(&self) -> Result<Identity, SessionError> {
///         Ok(Identity::new(AccountId::from("dev")))
///     }
///
///     fn sign_in_flow(&self) -> UiFlow {
///         UiFlow::new(FlowKind::SignIn, "dev://sign-in")
///     }
///
///     fn sign_in_result(&self, _: ()) -> Result<Identity, SessionError> {
///         Ok(Identity::new(AccountId::from("dev")))
///     }
///
///     async fn sign_out(&self) -> Result<(), SessionError> {
///         Ok(())
///     }
///
///     async fn current_player(
///         &self,
///         identity: &Identity,
///     ) -> Result<PlayerProfile, SessionError> {
///         Ok(PlayerProfile {
///             player_id: identity.account_id.to_string(),
///             display_name: "Dev".into(),
///         })
///     }
///
///     fn configure_popups(&self, _: &Identity, _: PopupAnchor) {}
///
///     fn unlock_achievement(
///         &self,
///         _: &Identity,
///         _: &ResourceKey,
///     ) -> Result<(), SessionError> {
///         Ok(())
///     }
///
///     fn increment_achievement(
///         &self,
///         _: &Identity,
///         _: &ResourceKey,
///         _: u32,
///     ) -> Result<(), SessionError> {
///         Ok(())
///     }
///
///     fn submit_score(
///         &self,
///         _: &Identity,
///         _: &ResourceKey,
///         _: i64,
///     ) -> Result<(), SessionError> {
///         Ok(())
///     }
///
///     async fn achievements_flow(
///         &self,
///         _: &Identity,
///     ) -> Result<UiFlow, SessionError> {
///         Ok(UiFlow::new(FlowKind::Achievements, "dev://achievements"))
///     }
///
///     async fn leaderboard_flow(
///         &self,
///         _: &Identity,
///         key: &ResourceKey,
///     ) -> Result<UiFlow, SessionError> {
///         Ok(UiFlow::new(FlowKind::Leaderboard(key.clone()), "dev://lb"))
///     }
/// }
/// ```
pub trait AuthProvider: Send + Sync + 'static {
    /// Whatever the host receives when the interactive sign-in flow
    /// finishes (an intent, a redirect URL, a JSON blob...). Only the
    /// provider knows how to read it.
    type Payload: Send;

    /// The last account the platform remembers on this device, if any.
    /// Must not perform I/O.
    fn cached_account(&self) -> Option<Identity>;

    /// Tries to restore a session without showing any UI.
    ///
    /// # Returns
    /// - `Ok(Identity)`: signed in
    /// - `Err(SessionError::AuthFailed)`: for any reason at all; the
    ///   caller does not distinguish causes
    fn silent_sign_in(
        &self,
    ) -> impl Future<Output = Result<Identity, SessionError>> + Send;

    /// The UI flow that lets the player sign in interactively.
    fn sign_in_flow(&self) -> UiFlow;

    /// Extracts the sign-in result from the payload of a finished
    /// interactive flow.
    fn sign_in_result(
        &self,
        payload: Self::Payload,
    ) -> Result<Identity, SessionError>;

    /// Signs the current account out on the platform side.
    fn sign_out(&self) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Fetches the profile of the player behind `identity`.
    fn current_player(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<PlayerProfile, SessionError>> + Send;

    /// Tells the platform where to draw its popups for this account.
    fn configure_popups(&self, identity: &Identity, anchor: PopupAnchor);

    fn unlock_achievement(
        &self,
        identity: &Identity,
        achievement: &ResourceKey,
    ) -> Result<(), SessionError>;

    fn increment_achievement(
        &self,
        identity: &Identity,
        achievement: &ResourceKey,
        amount: u32,
    ) -> Result<(), SessionError>;

    fn submit_score(
        &self,
        identity: &Identity,
        leaderboard: &ResourceKey,
        score: i64,
    ) -> Result<(), SessionError>;

    /// The UI flow listing all achievements.
    fn achievements_flow(
        &self,
        identity: &Identity,
    ) -> impl Future<Output = Result<UiFlow, SessionError>> + Send;

    /// The UI flow showing one leaderboard.
    fn leaderboard_flow(
        &self,
        identity: &Identity,
        leaderboard: &ResourceKey,
    ) -> impl Future<Output = Result<UiFlow, SessionError>> + Send;
}
