//! Session types: configuration, status, and the outcomes reported by
//! [`SessionManager`](crate::SessionManager) operations.

use playlink_protocol::{FlowKind, PopupAnchor, RequestCode};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the session layer.
///
/// The defaults match what a typical mobile game ships with. Hosts that
/// already use some of these request codes for their own screens, or
/// that localize the failure notice, override individual fields:
///
/// ```rust
/// use playlink_session::SessionConfig;
///
/// let config = SessionConfig {
///     sign_in_failure_notice: "Connexion impossible".into(),
///     ..SessionConfig::default()
/// };
/// assert_eq!(config.preference_namespace, "play_games");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Preference-store namespace holding the login preference.
    pub preference_namespace: String,

    /// Key of the login preference inside that namespace.
    pub preference_key: String,

    /// Correlation id for the interactive sign-in flow.
    pub sign_in_request: RequestCode,

    /// Correlation id for the achievements screen.
    pub achievements_request: RequestCode,

    /// Correlation id for leaderboard screens.
    pub leaderboard_request: RequestCode,

    /// Shown to the player when interactive sign-in or the follow-up
    /// profile fetch fails.
    pub sign_in_failure_notice: String,

    /// Where provider popups are anchored.
    pub popup_anchor: PopupAnchor,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preference_namespace: "play_games".to_string(),
            preference_key: "log_in_preference".to_string(),
            sign_in_request: RequestCode::SIGN_IN,
            achievements_request: RequestCode::ACHIEVEMENTS,
            leaderboard_request: RequestCode::LEADERBOARD,
            sign_in_failure_notice: "Unable to sign in to game services :("
                .to_string(),
            popup_anchor: PopupAnchor::TopCenter,
        }
    }
}

impl SessionConfig {
    /// The request code to use when launching a flow of this kind.
    pub fn request_code_for(&self, kind: &FlowKind) -> RequestCode {
        match kind {
            FlowKind::SignIn => self.sign_in_request,
            FlowKind::Achievements => self.achievements_request,
            FlowKind::Leaderboard(_) => self.leaderboard_request,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Whether an identity is currently held.
///
/// ```text
///   LoggedOut ──(silent or interactive sign-in)──→ LoggedIn
///       ↑                                              │
///       └──────────────────(sign_out)──────────────────┘
/// ```
///
/// A failed sign-in attempt leaves the status where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    LoggedOut,
    LoggedIn,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoggedOut => write!(f, "LoggedOut"),
            Self::LoggedIn => write!(f, "LoggedIn"),
        }
    }
}

// ---------------------------------------------------------------------------
// AuthOutcome
// ---------------------------------------------------------------------------

/// What a sign-in related operation ended up doing.
///
/// Purely informational: every failure has already been handled (by
/// escalating to the interactive flow, by persisting a decline, or by
/// showing a notice) when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// A new identity was obtained and stored.
    SignedIn,

    /// A valid identity was already available; nothing was attempted.
    AlreadySignedIn,

    /// Silent sign-in failed and the interactive flow was launched. The
    /// final result arrives later through the host.
    InteractiveLaunched,

    /// The player had previously declined; nothing was attempted.
    OptedOut,

    /// The player cancelled the interactive flow; the decline is now
    /// persisted.
    Declined,

    /// The interactive result carried no usable identity. The player saw
    /// a notice.
    Failed,

    /// Signed in, but the player profile could not be fetched. The
    /// identity is kept; the player saw a notice.
    ProfileUnavailable,

    /// Another sign-in attempt is already running or waiting for its UI
    /// result; this call did nothing.
    InProgress,

    /// The login preference could not be read, so no automatic sign-in
    /// was attempted.
    PreferenceUnavailable,
}

impl AuthOutcome {
    /// Returns `true` if the session is logged in after this outcome.
    pub fn is_signed_in(self) -> bool {
        matches!(
            self,
            Self::SignedIn | Self::AlreadySignedIn | Self::ProfileUnavailable
        )
    }
}

// ---------------------------------------------------------------------------
// UiResult
// ---------------------------------------------------------------------------

/// What happened to a UI result handed to
/// [`route_ui_result`](crate::SessionManager::route_ui_result).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiResult {
    /// It was the sign-in flow's result.
    SignIn(AuthOutcome),

    /// An achievements or leaderboard screen was closed. Nothing further
    /// to do; the pending request has been consumed.
    Closed(FlowKind),
}

#[cfg(test)]
mod tests {
    use super::*;
    use playlink_protocol::ResourceKey;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.preference_namespace, "play_games");
        assert_eq!(config.preference_key, "log_in_preference");
        assert_eq!(config.sign_in_request, RequestCode(69));
        assert_eq!(config.achievements_request, RequestCode(9003));
        assert_eq!(config.leaderboard_request, RequestCode(9004));
        assert_eq!(config.popup_anchor, PopupAnchor::TopCenter);
    }

    #[test]
    fn test_request_code_for_each_flow_kind() {
        let config = SessionConfig::default();
        let key = ResourceKey::new("lb").unwrap();

        assert_eq!(config.request_code_for(&FlowKind::SignIn), RequestCode(69));
        assert_eq!(
            config.request_code_for(&FlowKind::Achievements),
            RequestCode(9003)
        );
        assert_eq!(
            config.request_code_for(&FlowKind::Leaderboard(key)),
            RequestCode(9004)
        );
    }

    #[test]
    fn test_auth_outcome_is_signed_in() {
        assert!(AuthOutcome::SignedIn.is_signed_in());
        assert!(AuthOutcome::AlreadySignedIn.is_signed_in());
        assert!(AuthOutcome::ProfileUnavailable.is_signed_in());
        assert!(!AuthOutcome::InteractiveLaunched.is_signed_in());
        assert!(!AuthOutcome::Declined.is_signed_in());
        assert!(!AuthOutcome::InProgress.is_signed_in());
    }

    #[test]
    fn test_session_status_display() {
        assert_eq!(SessionStatus::LoggedIn.to_string(), "LoggedIn");
        assert_eq!(SessionStatus::LoggedOut.to_string(), "LoggedOut");
    }
}
