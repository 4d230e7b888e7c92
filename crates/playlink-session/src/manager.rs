//! The session manager: owns the signed-in identity and the sign-in policy.
//!
//! Responsibilities:
//! - Deciding on startup whether to sign in at all (login preference)
//! - Trying silent sign-in first and falling back to the interactive flow
//! - Turning the interactive flow's result into an identity, a persisted
//!   decline, or a notice for the player
//! - Gating every achievement / leaderboard call on being signed in
//!
//! # Concurrency note
//!
//! All methods take `&self`. The identity lives in a `tokio::sync::watch`
//! channel, so it can be read (or subscribed to) while a sign-in attempt is
//! suspended on the provider, and every change is a single swap: readers
//! see the old identity or the new one, never anything in between. Locks
//! are never held across an `.await`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use playlink_protocol::{Identity, LoginPreference, RequestCode, ResourceKey, ResultCode, UiFlow};
use playlink_store::PreferenceStore;
use tokio::sync::watch;

use crate::{
    AuthOutcome, AuthProvider, HostApp, PendingRequests, SessionConfig, SessionError, SessionStatus,
    UiResult,
};

/// Manages the game-services session for one application.
///
/// Create one at startup, keep it in the application's root object (wrap
/// it in an `Arc` if tasks need it), and drive it from the host:
///
/// ```text
/// app start / foreground ──→ init() ──→ silent sign-in ──ok──→ [LoggedIn]
///                                           │
///                                           └─fail─→ interactive flow
///                                                         │
/// host receives UI result ──→ route_ui_result() ──────────┘
///                                 │
///                                 ├─ canceled ──→ Declined (persisted)
///                                 ├─ ok ────────→ [LoggedIn] + profile fetch
///                                 └─ error ─────→ notice
/// ```
pub struct SessionManager<P, S, H>
where
    P: AuthProvider,
    S: PreferenceStore,
    H: HostApp,
{
    provider: Arc<P>,
    store: S,
    host: H,
    config: SessionConfig,

    /// The one authoritative identity. `None` means logged out.
    identity: watch::Sender<Option<Identity>>,

    /// UI flows launched by this manager and not yet answered.
    pending: Mutex<PendingRequests>,

    /// Set while a silent sign-in is awaiting the provider.
    sign_in_running: AtomicBool,
}

impl<P, S, H> SessionManager<P, S, H>
where
    P: AuthProvider,
    S: PreferenceStore,
    H: HostApp,
{
    /// Creates a logged-out session manager.
    ///
    /// Nothing is read or attempted until [`init`](Self::init).
    pub fn new(provider: Arc<P>, store: S, host: H, config: SessionConfig) -> Self {
        let (identity, _) = watch::channel(None);
        Self {
            provider,
            store,
            host,
            config,
            identity,
            pending: Mutex::new(PendingRequests::new()),
            sign_in_running: AtomicBool::new(false),
        }
    }

    // =====================================================================
    // Sign-in
    // =====================================================================

    /// Startup / foreground entry point.
    ///
    /// - Fresh install (`Unset`): records `Enabled`, then continues.
    /// - `Declined`: does nothing.
    /// - `Enabled`: keeps a valid held identity; otherwise adopts the
    ///   provider's cached account if it is still valid; otherwise tries
    ///   silent sign-in (which falls back to the interactive flow).
    ///
    /// Popup anchoring is configured afterwards in every case (a no-op
    /// while logged out).
    pub async fn init(&self) -> AuthOutcome {
        let outcome = self.auto_sign_in().await;
        self.configure_popups();
        tracing::debug!(?outcome, status = %self.status(), "session init finished");
        outcome
    }

    async fn auto_sign_in(&self) -> AuthOutcome {
        let preference = match self.login_preference() {
            Ok(preference) => preference,
            Err(e) => {
                tracing::warn!(error = %e, "login preference unreadable, not signing in");
                return AuthOutcome::PreferenceUnavailable;
            }
        };

        if !preference.allows_auto_sign_in() {
            tracing::debug!("player declined sign-in before, not asking again");
            return AuthOutcome::OptedOut;
        }
        if preference == LoginPreference::Unset {
            self.write_preference(LoginPreference::Enabled);
        }

        if let Some(current) = self.identity() {
            if !current.is_expired() {
                return AuthOutcome::AlreadySignedIn;
            }
            tracing::info!(account = %current.account_id, "identity expired, refreshing");
        } else if let Some(cached) = self.provider.cached_account() {
            if !cached.is_expired() {
                tracing::info!(account = %cached.account_id, "restored cached account");
                self.replace_identity(Some(cached));
                return AuthOutcome::SignedIn;
            }
            tracing::info!(account = %cached.account_id, "cached account expired, refreshing");
        }

        self.silent_authenticate().await
    }

    /// Tries to sign in without UI; on any failure launches the
    /// interactive flow instead.
    ///
    /// Returns [`AuthOutcome::InProgress`] without touching the provider
    /// if another attempt is running or the sign-in flow is still open.
    pub async fn silent_authenticate(&self) -> AuthOutcome {
        let Some(_attempt) = self.begin_sign_in() else {
            tracing::debug!("sign-in already in progress");
            return AuthOutcome::InProgress;
        };

        match self.provider.silent_sign_in().await {
            Ok(identity) => {
                tracing::info!(account = %identity.account_id, "silent sign-in succeeded");
                self.replace_identity(Some(identity));
                AuthOutcome::SignedIn
            }
            Err(e) => {
                tracing::info!(error = %e, "silent sign-in failed, falling back to interactive");
                self.launch_sign_in_flow()
            }
        }
    }

    /// Launches the interactive sign-in flow through the host.
    ///
    /// The result must come back through
    /// [`route_ui_result`](Self::route_ui_result) or
    /// [`handle_auth_result`](Self::handle_auth_result).
    pub fn interactive_authenticate(&self) -> AuthOutcome {
        let Some(_attempt) = self.begin_sign_in() else {
            tracing::debug!("sign-in already in progress");
            return AuthOutcome::InProgress;
        };
        self.launch_sign_in_flow()
    }

    fn launch_sign_in_flow(&self) -> AuthOutcome {
        self.launch(self.provider.sign_in_flow());
        AuthOutcome::InteractiveLaunched
    }

    /// Consumes the result of the interactive sign-in flow.
    ///
    /// The host calls this only for results tagged with the sign-in
    /// request code; the code itself is not checked here.
    ///
    /// - `Canceled`: persists `Declined`. No identity is set.
    /// - Payload yields an identity: stores it, then fetches the player
    ///   profile. Success persists `Enabled`; failure shows the notice and
    ///   keeps the identity.
    /// - Payload yields nothing: shows the notice.
    pub async fn handle_auth_result(
        &self,
        payload: P::Payload,
        result_code: ResultCode,
    ) -> AuthOutcome {
        self.lock_pending().take(self.config.sign_in_request);

        if result_code.is_canceled() {
            tracing::info!("player cancelled sign-in, remembering the decline");
            self.write_preference(LoginPreference::Declined);
            return AuthOutcome::Declined;
        }

        let identity = match self.provider.sign_in_result(payload) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, ?result_code, "interactive sign-in failed");
                self.notify_sign_in_failure();
                return AuthOutcome::Failed;
            }
        };

        tracing::info!(account = %identity.account_id, "interactive sign-in succeeded");
        self.replace_identity(Some(identity.clone()));

        match self.provider.current_player(&identity).await {
            Ok(profile) => {
                tracing::info!(
                    player_id = %profile.player_id,
                    name = %profile.display_name,
                    "player profile loaded"
                );
                self.write_preference(LoginPreference::Enabled);
                AuthOutcome::SignedIn
            }
            Err(e) => {
                tracing::warn!(error = %e, "player profile fetch failed");
                self.notify_sign_in_failure();
                AuthOutcome::ProfileUnavailable
            }
        }
    }

    /// Single entry point for every UI result the host receives.
    ///
    /// Sign-in results go to [`handle_auth_result`](Self::handle_auth_result)
    /// (even if this process never launched the flow, since the platform may
    /// have restarted the app in between). Results of achievements and
    /// leaderboard screens consume their pending request. Anything else
    /// returns `None`.
    pub async fn route_ui_result(
        &self,
        request_code: RequestCode,
        payload: P::Payload,
        result_code: ResultCode,
    ) -> Option<UiResult> {
        if request_code == self.config.sign_in_request {
            let outcome = self.handle_auth_result(payload, result_code).await;
            return Some(UiResult::SignIn(outcome));
        }

        let request = self.lock_pending().take(request_code);
        match request {
            Some(request) => {
                tracing::debug!(
                    %request_code,
                    ?result_code,
                    open_ms = request.launched_at.elapsed().as_millis() as u64,
                    "ui flow closed"
                );
                Some(UiResult::Closed(request.kind))
            }
            None => {
                tracing::debug!(%request_code, "no pending ui request, ignoring result");
                None
            }
        }
    }

    /// Explicit, player-initiated sign-in (e.g. a "Sign in" button).
    ///
    /// Overrides an earlier decline, then behaves like the sign-in part
    /// of [`init`](Self::init). A sign-in flow still waiting for its
    /// result is abandoned first, so a result the host never delivered
    /// can't block the player.
    pub async fn request_sign_in(&self) -> AuthOutcome {
        self.write_preference(LoginPreference::Enabled);

        if let Some(stale) = self.lock_pending().take(self.config.sign_in_request) {
            tracing::info!(
                open_ms = stale.launched_at.elapsed().as_millis() as u64,
                "abandoning unanswered sign-in flow"
            );
        }

        if let Some(current) = self.identity() {
            if !current.is_expired() {
                return AuthOutcome::AlreadySignedIn;
            }
        }

        let outcome = self.silent_authenticate().await;
        self.configure_popups();
        outcome
    }

    /// Clears the identity immediately, then signs out on the provider in
    /// the background. The provider's answer is only logged.
    pub fn sign_out(&self) {
        if let Some(previous) = self.replace_identity(None) {
            tracing::info!(account = %previous.account_id, "signed out");
        }

        let provider = Arc::clone(&self.provider);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(e) = provider.sign_out().await {
                        tracing::debug!(error = %e, "provider sign-out failed");
                    }
                });
            }
            Err(_) => {
                tracing::warn!("no tokio runtime, provider sign-out skipped");
            }
        }
    }

    // =====================================================================
    // Gated pass-throughs
    // =====================================================================

    /// Unlocks the achievement the host knows as `name`.
    pub fn unlock_achievement(&self, name: &str) {
        let Some((identity, key)) = self.gate("unlock_achievement", name) else {
            return;
        };
        if let Err(e) = self.provider.unlock_achievement(&identity, &key) {
            tracing::warn!(achievement = name, error = %e, "unlock rejected");
        }
    }

    /// Adds `amount` steps to an incremental achievement.
    pub fn increment_achievement(&self, name: &str, amount: u32) {
        let Some((identity, key)) = self.gate("increment_achievement", name) else {
            return;
        };
        if let Err(e) = self.provider.increment_achievement(&identity, &key, amount) {
            tracing::warn!(achievement = name, amount, error = %e, "increment rejected");
        }
    }

    /// Submits `score` to the leaderboard the host knows as `name`.
    pub fn submit_score(&self, score: i64, name: &str) {
        let Some((identity, key)) = self.gate("submit_score", name) else {
            return;
        };
        if let Err(e) = self.provider.submit_score(&identity, &key, score) {
            tracing::warn!(leaderboard = name, score, error = %e, "score rejected");
        }
    }

    /// Opens the achievements screen. Returns the request code the
    /// result will come back with, or `None` if nothing was launched.
    pub async fn show_achievements(&self) -> Option<RequestCode> {
        let identity = self.signed_in_identity("show_achievements")?;
        match self.provider.achievements_flow(&identity).await {
            Ok(flow) => Some(self.launch(flow)),
            Err(e) => {
                tracing::warn!(error = %e, "achievements screen unavailable");
                None
            }
        }
    }

    /// Opens the leaderboard the host knows as `name`.
    pub async fn show_leaderboard(&self, name: &str) -> Option<RequestCode> {
        let (identity, key) = self.gate("show_leaderboard", name)?;
        match self.provider.leaderboard_flow(&identity, &key).await {
            Ok(flow) => Some(self.launch(flow)),
            Err(e) => {
                tracing::warn!(leaderboard = name, error = %e, "leaderboard screen unavailable");
                None
            }
        }
    }

    // =====================================================================
    // Preference
    // =====================================================================

    /// Reads the persisted login preference.
    ///
    /// # Errors
    /// Returns [`SessionError::Store`] if the store can't be read.
    pub fn login_preference(&self) -> Result<LoginPreference, SessionError> {
        let raw = self
            .store
            .get(&self.config.preference_namespace, &self.config.preference_key)?;
        Ok(LoginPreference::from_stored(raw.as_deref()))
    }

    /// Forgets the stored preference, so the next [`init`](Self::init)
    /// behaves like a fresh install.
    ///
    /// # Errors
    /// Returns [`SessionError::Store`] if the store can't be written.
    pub fn reset_login_preference(&self) -> Result<(), SessionError> {
        self.store
            .remove(&self.config.preference_namespace, &self.config.preference_key)?;
        tracing::info!("login preference reset");
        Ok(())
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// The current identity, if signed in.
    pub fn identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        if self.identity.borrow().is_some() {
            SessionStatus::LoggedIn
        } else {
            SessionStatus::LoggedOut
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.status() == SessionStatus::LoggedIn
    }

    /// A receiver that observes every identity change.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    /// Returns `true` if a flow launched with `request_code` is still
    /// waiting for its result.
    pub fn is_pending(&self, request_code: RequestCode) -> bool {
        self.lock_pending().contains(request_code)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Swaps in a new identity and returns the old one.
    fn replace_identity(&self, identity: Option<Identity>) -> Option<Identity> {
        self.identity.send_replace(identity)
    }

    fn configure_popups(&self) {
        if let Some(identity) = self.identity() {
            self.provider
                .configure_popups(&identity, self.config.popup_anchor);
        }
    }

    fn write_preference(&self, preference: LoginPreference) {
        let Some(value) = preference.as_stored() else {
            return;
        };
        match self.store.set(
            &self.config.preference_namespace,
            &self.config.preference_key,
            value,
        ) {
            Ok(()) => tracing::debug!(%preference, "login preference saved"),
            Err(e) => {
                tracing::warn!(%preference, error = %e, "failed to save login preference");
            }
        }
    }

    fn notify_sign_in_failure(&self) {
        self.host.show_notice(&self.config.sign_in_failure_notice);
    }

    /// Registers the flow as pending under its configured request code,
    /// then asks the host to launch it.
    fn launch(&self, flow: UiFlow) -> RequestCode {
        let request_code = self.config.request_code_for(&flow.kind);
        self.lock_pending().register(request_code, flow.kind.clone());
        tracing::debug!(%request_code, action = %flow.action, "launching ui flow");
        self.host.launch_flow(flow, request_code);
        request_code
    }

    fn signed_in_identity(&self, operation: &'static str) -> Option<Identity> {
        let identity = self.identity();
        if identity.is_none() {
            tracing::debug!(operation, "not signed in, ignoring");
        }
        identity
    }

    /// Identity plus resolved resource key, or `None` (logged) if either
    /// is missing. The identity is checked first so that nothing at all
    /// happens while logged out.
    fn gate(&self, operation: &'static str, name: &str) -> Option<(Identity, ResourceKey)> {
        let identity = self.signed_in_identity(operation)?;
        let Some(key) = self.host.resolve_resource(name).and_then(ResourceKey::new) else {
            tracing::debug!(operation, name, "unknown resource, ignoring");
            return None;
        };
        Some((identity, key))
    }

    /// Claims the single sign-in slot, or `None` if an attempt is running
    /// or the interactive flow is still waiting for its result.
    fn begin_sign_in(&self) -> Option<SignInAttempt<'_>> {
        if self.is_pending(self.config.sign_in_request) {
            return None;
        }
        self.sign_in_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(SignInAttempt {
            running: &self.sign_in_running,
        })
    }

    fn lock_pending(&self) -> MutexGuard<'_, PendingRequests> {
        // The registry holds no invariants a panic could break.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the sign-in slot when the attempt ends, however it ends.
struct SignInAttempt<'a> {
    running: &'a AtomicBool,
}

impl Drop for SignInAttempt<'_> {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

// =========================================================================
// Tests
// =========================================================================
