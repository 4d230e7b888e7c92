//! An in-process game-services provider for development and tests.
//!
//! `OfflineProvider` behaves like a real platform from the session
//! layer's point of view. It remembers the last account, issues
//! expiring identities, keeps achievement and leaderboard state, but
//! never leaves the process. Hosts use it on desktop builds and in CI,
//! where the real SDK isn't available.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use playlink_protocol::{
    AccountId, FlowKind, Identity, PlayerProfile, PopupAnchor, ResourceKey, UiFlow,
};
use playlink_session::{AuthProvider, SessionError};
use rand::Rng;

/// Knobs for simulating platform failures.
#[derive(Debug, Clone)]
pub struct OfflineBehavior {
    /// How long issued identities stay valid. `None` = forever.
    pub identity_ttl: Option<Duration>,

    /// Makes every player-profile fetch fail.
    pub profile_fails: bool,

    /// Makes achievements/leaderboard screens unavailable.
    pub flows_fail: bool,
}

impl Default for OfflineBehavior {
    fn default() -> Self {
        Self {
            identity_ttl: Some(Duration::from_secs(3600)),
            profile_fails: false,
            flows_fail: false,
        }
    }
}

/// What the simulated sign-in screen hands back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfflinePayload {
    /// The player picked an account with this display name.
    Accepted { display_name: String },
    /// The screen closed with an error.
    Rejected { status: i32 },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct AchievementState {
    unlocked: bool,
    steps: u32,
}

#[derive(Debug, Default)]
struct OfflineState {
    /// The account silent sign-in restores. Cleared by sign-out.
    remembered: Option<(AccountId, Option<String>)>,
    /// The last identity issued on this device, reported by
    /// `cached_account`. Cleared by sign-out.
    credential: Option<Identity>,
    achievements: HashMap<ResourceKey, AchievementState>,
    /// Best score per leaderboard.
    scores: HashMap<ResourceKey, i64>,
    popup_anchor: Option<PopupAnchor>,
}

/// See the [module docs](self).
#[derive(Debug, Default)]
pub struct OfflineProvider {
    behavior: OfflineBehavior,
    state: Mutex<OfflineState>,
}

impl OfflineProvider {
    /// A provider with no remembered account: the first silent sign-in
    /// fails and the interactive flow is needed.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: OfflineBehavior) -> Self {
        Self {
            behavior,
            state: Mutex::default(),
        }
    }

    /// Pretends a previous run already signed `account_id` in on this
    /// device: the account is cached and silent sign-in succeeds.
    pub fn remember(&self, account_id: AccountId, display_name: Option<String>) {
        let credential = self.issue(account_id.clone(), display_name.clone());
        let mut state = self.state();
        state.remembered = Some((account_id, display_name));
        state.credential = Some(credential);
    }

    /// Makes the cached credential stale, as if the app had been closed
    /// longer than its lifetime. Silent sign-in still works.
    pub fn expire_credential(&self) {
        if let Some(credential) = self.state().credential.as_mut() {
            credential.expires_at = Some(SystemTime::UNIX_EPOCH);
        }
    }

    /// The account silent sign-in would restore.
    pub fn remembered_account(&self) -> Option<AccountId> {
        self.state().remembered.as_ref().map(|(id, _)| id.clone())
    }

    pub fn is_unlocked(&self, achievement: &ResourceKey) -> bool {
        self.state()
            .achievements
            .get(achievement)
            .is_some_and(|a| a.unlocked)
    }

    pub fn steps(&self, achievement: &ResourceKey) -> u32 {
        self.state()
            .achievements
            .get(achievement)
            .map_or(0, |a| a.steps)
    }

    pub fn best_score(&self, leaderboard: &ResourceKey) -> Option<i64> {
        self.state().scores.get(leaderboard).copied()
    }

    pub fn popup_anchor(&self) -> Option<PopupAnchor> {
        self.state().popup_anchor
    }

    fn state(&self) -> MutexGuard<'_, OfflineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue(&self, account_id: AccountId, display_name: Option<String>) -> Identity {
        let mut identity = Identity::new(account_id);
        identity.display_name = display_name;
        if let Some(ttl) = self.behavior.identity_ttl {
            identity = identity.expiring_at(SystemTime::now() + ttl);
        }
        identity
    }

    fn flow(&self, kind: FlowKind, action: String) -> Result<UiFlow, SessionError> {
        if self.behavior.flows_fail {
            return Err(SessionError::Provider("offline games api disabled".into()));
        }
        Ok(UiFlow::new(kind, action))
    }
}

/// Random 16-hex-digit account id, shaped like the platform's.
fn generate_account_id() -> AccountId {
    let n: u64 = rand::rng().random();
    AccountId(format!("offline-{n:016x}"))
}

impl AuthProvider for OfflineProvider {
    type Payload = OfflinePayload;

    fn cached_account(&self) -> Option<Identity> {
        self.state().credential.clone()
    }

    async fn silent_sign_in(&self) -> Result<Identity, SessionError> {
        let remembered = self.state().remembered.clone();
        let Some((account_id, display_name)) = remembered else {
            return Err(SessionError::AuthFailed("sign-in required".into()));
        };
        let identity = self.issue(account_id, display_name);
        self.state().credential = Some(identity.clone());
        Ok(identity)
    }

    fn sign_in_flow(&self) -> UiFlow {
        UiFlow::new(FlowKind::SignIn, "offline://sign-in")
    }

    fn sign_in_result(&self, payload: OfflinePayload) -> Result<Identity, SessionError> {
        match payload {
            OfflinePayload::Accepted { display_name } => {
                let account_id = generate_account_id();
                let identity = self.issue(account_id.clone(), Some(display_name.clone()));
                let mut state = self.state();
                state.remembered = Some((account_id, Some(display_name)));
                state.credential = Some(identity.clone());
                Ok(identity)
            }
            OfflinePayload::Rejected { status } => Err(SessionError::AuthFailed(format!(
                "sign-in screen returned status {status}"
            ))),
        }
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        let mut state = self.state();
        state.remembered = None;
        state.credential = None;
        Ok(())
    }

    async fn current_player(&self, identity: &Identity) -> Result<PlayerProfile, SessionError> {
        if self.behavior.profile_fails {
            return Err(SessionError::ProfileUnavailable("offline profile disabled".into()));
        }
        Ok(PlayerProfile {
            player_id: identity.account_id.to_string(),
            display_name: identity
                .display_name
                .clone()
                .unwrap_or_else(|| "Player".to_string()),
        })
    }

    fn configure_popups(&self, _identity: &Identity, anchor: PopupAnchor) {
        self.state().popup_anchor = Some(anchor);
    }

    fn unlock_achievement(
        &self,
        _identity: &Identity,
        achievement: &ResourceKey,
    ) -> Result<(), SessionError> {
        self.state()
            .achievements
            .entry(achievement.clone())
            .or_default()
            .unlocked = true;
        Ok(())
    }

    fn increment_achievement(
        &self,
        _identity: &Identity,
        achievement: &ResourceKey,
        amount: u32,
    ) -> Result<(), SessionError> {
        let mut state = self.state();
        let entry = state.achievements.entry(achievement.clone()).or_default();
        entry.steps = entry.steps.saturating_add(amount);
        Ok(())
    }

    fn submit_score(
        &self,
        _identity: &Identity,
        leaderboard: &ResourceKey,
        score: i64,
    ) -> Result<(), SessionError> {
        let mut state = self.state();
        let best = state.scores.entry(leaderboard.clone()).or_insert(score);
        *best = (*best).max(score);
        Ok(())
    }

    async fn achievements_flow(&self, _identity: &Identity) -> Result<UiFlow, SessionError> {
        self.flow(FlowKind::Achievements, "offline://achievements".to_string())
    }

    async fn leaderboard_flow(
        &self,
        _identity: &Identity,
        leaderboard: &ResourceKey,
    ) -> Result<UiFlow, SessionError> {
        self.flow(
            FlowKind::Leaderboard(leaderboard.clone()),
            format!("offline://leaderboards/{leaderboard}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> ResourceKey {
        ResourceKey::new(s).unwrap()
    }

    fn someone() -> Identity {
        Identity::new(AccountId::from("offline-1"))
    }

    #[tokio::test]
    async fn test_silent_sign_in_without_remembered_account_fails() {
        let provider = OfflineProvider::new();

        let result = provider.silent_sign_in().await;

        assert!(matches!(result, Err(SessionError::AuthFailed(_))));
    }

    #[tokio::test]
    async fn test_silent_sign_in_restores_remembered_account() {
        let provider = OfflineProvider::new();
        provider.remember(AccountId::from("offline-7"), Some("Sam".into()));

        let identity = provider.silent_sign_in().await.unwrap();

        assert_eq!(identity.account_id, AccountId::from("offline-7"));
        assert_eq!(identity.display_name.as_deref(), Some("Sam"));
        assert!(!identity.is_expired());
    }

    #[test]
    fn test_sign_in_result_accepted_issues_and_remembers_account() {
        let provider = OfflineProvider::new();

        let identity = provider
            .sign_in_result(OfflinePayload::Accepted { display_name: "Sam".into() })
            .unwrap();

        assert!(identity.account_id.0.starts_with("offline-"));
        assert_eq!(identity.account_id.0.len(), "offline-".len() + 16);
        assert_eq!(provider.remembered_account(), Some(identity.account_id));
    }

    #[test]
    fn test_sign_in_result_rejected_fails() {
        let provider = OfflineProvider::new();

        let result = provider.sign_in_result(OfflinePayload::Rejected { status: 12501 });

        assert!(matches!(result, Err(SessionError::AuthFailed(msg)) if msg.contains("12501")));
        assert_eq!(provider.remembered_account(), None);
    }

    #[tokio::test]
    async fn test_sign_out_forgets_account() {
        let provider = OfflineProvider::new();
        provider.remember(AccountId::from("offline-7"), None);

        provider.sign_out().await.unwrap();

        assert!(provider.silent_sign_in().await.is_err());
        assert_eq!(provider.cached_account(), None);
    }

    #[test]
    fn test_cached_account_reports_last_issued_identity() {
        let provider = OfflineProvider::new();
        assert_eq!(provider.cached_account(), None);

        let identity = provider
            .sign_in_result(OfflinePayload::Accepted { display_name: "Sam".into() })
            .unwrap();

        assert_eq!(provider.cached_account(), Some(identity));
    }

    #[tokio::test]
    async fn test_expire_credential_then_silent_sign_in_refreshes_cache() {
        let provider = OfflineProvider::new();
        provider.remember(AccountId::from("offline-7"), None);

        provider.expire_credential();
        assert!(provider.cached_account().unwrap().is_expired());

        let fresh = provider.silent_sign_in().await.unwrap();

        assert!(!fresh.is_expired());
        assert_eq!(provider.cached_account(), Some(fresh));
    }

    #[test]
    fn test_identity_without_ttl_never_expires() {
        let provider = OfflineProvider::with_behavior(OfflineBehavior {
            identity_ttl: None,
            ..OfflineBehavior::default()
        });

        let identity = provider
            .sign_in_result(OfflinePayload::Accepted { display_name: "Sam".into() })
            .unwrap();

        assert_eq!(identity.expires_at, None);
    }

    #[test]
    fn test_achievement_progress_is_tracked() {
        let provider = OfflineProvider::new();
        let coins = key("coins");

        provider.increment_achievement(&someone(), &coins, 3).unwrap();
        provider.increment_achievement(&someone(), &coins, 4).unwrap();
        provider.unlock_achievement(&someone(), &key("first_win")).unwrap();

        assert_eq!(provider.steps(&coins), 7);
        assert!(provider.is_unlocked(&key("first_win")));
        assert!(!provider.is_unlocked(&coins));
    }

    #[test]
    fn test_submit_score_keeps_best() {
        let provider = OfflineProvider::new();
        let board = key("high_scores");

        provider.submit_score(&someone(), &board, 50).unwrap();
        provider.submit_score(&someone(), &board, 120).unwrap();
        provider.submit_score(&someone(), &board, 80).unwrap();

        assert_eq!(provider.best_score(&board), Some(120));
        assert_eq!(provider.best_score(&key("other")), None);
    }

    #[tokio::test]
    async fn test_flows_fail_when_disabled() {
        let provider = OfflineProvider::with_behavior(OfflineBehavior {
            flows_fail: true,
            ..OfflineBehavior::default()
        });

        assert!(provider.achievements_flow(&someone()).await.is_err());
        assert!(provider.leaderboard_flow(&someone(), &key("lb")).await.is_err());
    }

    #[tokio::test]
    async fn test_leaderboard_flow_targets_board() {
        let provider = OfflineProvider::new();

        let flow = provider.leaderboard_flow(&someone(), &key("lb_1")).await.unwrap();

        assert_eq!(flow.kind, FlowKind::Leaderboard(key("lb_1")));
        assert_eq!(flow.action, "offline://leaderboards/lb_1");
    }

    #[tokio::test]
    async fn test_current_player_uses_display_name() {
        let provider = OfflineProvider::new();
        let identity = someone().with_display_name("Robin");

        let profile = provider.current_player(&identity).await.unwrap();

        assert_eq!(profile.display_name, "Robin");
        assert_eq!(profile.player_id, "offline-1");
    }
}
