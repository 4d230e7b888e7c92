//! Core value types shared by the session layer, providers, and hosts.
//!
//! None of these types carry behaviour beyond small predicates and
//! conversions. They exist so that a request code can't be passed where a
//! result code is expected, and so that an empty resource string never
//! reaches a provider.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The provider's identifier for a signed-in account.
///
/// Newtype over `String` so it can't be confused with a resource key or a
/// player id. Serialized as the bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed-in account as issued by the game-services provider.
///
/// The session layer treats this as opaque: it only stores it, hands it
/// back to the provider, and asks whether it has expired. An `Identity` is
/// never mutated after construction; signing in again produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Which account this is.
    pub account_id: AccountId,

    /// Name shown in the provider's UI, when the provider shares it.
    pub display_name: Option<String>,

    /// When the underlying credential stops being valid.
    ///
    /// `None` means the provider did not say; such an identity never
    /// reports itself as expired.
    pub expires_at: Option<SystemTime>,
}

impl Identity {
    /// Creates a non-expiring identity with no display name.
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            display_name: None,
            expires_at: None,
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the expiry instant.
    pub fn expiring_at(mut self, at: SystemTime) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Returns `true` if the credential has expired as of now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }

    /// Returns `true` if the credential has expired as of `now`.
    ///
    /// Split out from [`is_expired`](Self::is_expired) so callers can test
    /// against a fixed clock.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        match self.expires_at {
            Some(at) => at <= now,
            None => false,
        }
    }
}

/// The player profile fetched after an interactive sign-in.
///
/// Fetching it is how the session layer confirms that the whole login
/// cycle worked; the contents are passed through to the host untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// LoginPreference
// ---------------------------------------------------------------------------

/// The persisted answer to "should we try to sign this user in?".
///
/// ```text
///   Unset ──(first init)──→ Enabled ──(user cancels sign-in)──→ Declined
///                              ↑                                   │
///                              └────────(explicit sign-in)─────────┘
/// ```
///
/// Stored as the strings `"true"` / `"false"`. `Unset` is the absence of a
/// stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoginPreference {
    /// Nothing stored yet (fresh install).
    #[default]
    Unset,

    /// Sign-in is wanted; the session layer may try silently on startup.
    Enabled,

    /// The user cancelled a sign-in flow. Never auto-attempt again until
    /// the preference is explicitly reset.
    Declined,
}

impl LoginPreference {
    /// Parses the raw stored string.
    ///
    /// Matching is case-insensitive. Anything that isn't `"true"` counts
    /// as a decline, so a corrupted value errs on the side of not nagging
    /// the user.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Unset,
            Some(value) if value.trim().eq_ignore_ascii_case("true") => Self::Enabled,
            Some(_) => Self::Declined,
        }
    }

    /// The string written to the store, or `None` for `Unset`.
    pub fn as_stored(self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Enabled => Some("true"),
            Self::Declined => Some("false"),
        }
    }

    /// Returns `true` if the session layer may start sign-in on its own.
    /// `Unset` counts, because the first `init` turns it into `Enabled`.
    pub fn allows_auto_sign_in(self) -> bool {
        !matches!(self, Self::Declined)
    }
}

impl fmt::Display for LoginPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => write!(f, "unset"),
            Self::Enabled => write!(f, "enabled"),
            Self::Declined => write!(f, "declined"),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / result codes
// ---------------------------------------------------------------------------

/// Correlation id attached to an external UI flow when it is launched.
///
/// The host hands the same code back together with the flow's result so
/// it can be routed to the right handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestCode(pub i32);

impl RequestCode {
    /// Interactive sign-in flow.
    pub const SIGN_IN: Self = Self(69);
    /// Achievements overview.
    pub const ACHIEVEMENTS: Self = Self(9003);
    /// A single leaderboard.
    pub const LEADERBOARD: Self = Self(9004);
}

impl fmt::Display for RequestCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rc-{}", self.0)
    }
}

/// How an external UI flow finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    /// The flow completed normally.
    Ok,
    /// The user backed out of the flow.
    Canceled,
    /// Any other platform-specific code.
    Other(i32),
}

impl ResultCode {
    /// Platform value for a completed flow.
    pub const RAW_OK: i32 = -1;
    /// Platform value for a cancelled flow.
    pub const RAW_CANCELED: i32 = 0;

    /// Converts the platform's integer result into a `ResultCode`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_OK => Self::Ok,
            Self::RAW_CANCELED => Self::Canceled,
            other => Self::Other(other),
        }
    }

    pub fn is_canceled(self) -> bool {
        matches!(self, Self::Canceled)
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// A provider-specific achievement or leaderboard key.
///
/// Obtained by resolving a human-readable name through the host. A key is
/// never empty: [`ResourceKey::new`] rejects blank strings, which is how
/// an unresolved name turns into a no-op instead of a bogus provider call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Wraps a resolved key, or returns `None` if it is blank.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// UI flows
// ---------------------------------------------------------------------------

/// Which external screen a [`UiFlow`] opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key")]
pub enum FlowKind {
    SignIn,
    Achievements,
    Leaderboard(ResourceKey),
}

/// A launchable external UI flow produced by the provider.
///
/// The session layer never looks inside `action`; it only passes the flow
/// to the host together with a [`RequestCode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiFlow {
    pub kind: FlowKind,

    /// Provider-specific launch target (an intent action, a URL, ...).
    pub action: String,
}

impl UiFlow {
    pub fn new(kind: FlowKind, action: impl Into<String>) -> Self {
        Self {
            kind,
            action: action.into(),
        }
    }
}

/// Where the provider should draw its "welcome back" / "achievement
/// unlocked" popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PopupAnchor {
    #[default]
    TopCenter,
    TopLeft,
    TopRight,
    BottomCenter,
    BottomLeft,
    BottomRight,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    // -- Identity -----------------------------------------------------------

    #[test]
    fn test_identity_without_expiry_never_expires() {
        let identity = Identity::new(AccountId::from("a"));

        assert!(!identity.is_expired());
        let far_future = SystemTime::UNIX_EPOCH + Duration::from_secs(u32::MAX as u64);
        assert!(!identity.is_expired_at(far_future));
    }

    #[test]
    fn test_identity_is_expired_at_boundary() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let identity = Identity::new(AccountId::from("a")).expiring_at(at);

        assert!(!identity.is_expired_at(at - Duration::from_secs(1)));
        assert!(identity.is_expired_at(at));
        assert!(identity.is_expired_at(at + Duration::from_secs(1)));
    }

    #[test]
    fn test_identity_past_expiry_is_expired_now() {
        let identity = Identity::new(AccountId::from("a"))
            .expiring_at(SystemTime::now() - Duration::from_secs(60));

        assert!(identity.is_expired());
    }

    #[test]
    fn test_account_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&AccountId::from("g-42")).unwrap();
        assert_eq!(json, "\"g-42\"");
    }

    // -- LoginPreference ----------------------------------------------------

    #[test]
    fn test_login_preference_from_stored_missing_is_unset() {
        assert_eq!(LoginPreference::from_stored(None), LoginPreference::Unset);
    }

    #[test]
    fn test_login_preference_from_stored_is_case_insensitive() {
        assert_eq!(
            LoginPreference::from_stored(Some("TRUE")),
            LoginPreference::Enabled
        );
        assert_eq!(
            LoginPreference::from_stored(Some("True")),
            LoginPreference::Enabled
        );
    }

    #[test]
    fn test_login_preference_from_stored_unknown_is_declined() {
        assert_eq!(
            LoginPreference::from_stored(Some("false")),
            LoginPreference::Declined
        );
        assert_eq!(
            LoginPreference::from_stored(Some("yes please")),
            LoginPreference::Declined
        );
    }

    #[test]
    fn test_login_preference_as_stored() {
        assert_eq!(LoginPreference::Unset.as_stored(), None);
        assert_eq!(LoginPreference::Enabled.as_stored(), Some("true"));
        assert_eq!(LoginPreference::Declined.as_stored(), Some("false"));
    }

    #[test]
    fn test_login_preference_allows_auto_sign_in() {
        assert!(LoginPreference::Unset.allows_auto_sign_in());
        assert!(LoginPreference::Enabled.allows_auto_sign_in());
        assert!(!LoginPreference::Declined.allows_auto_sign_in());
    }

    // -- Codes --------------------------------------------------------------

    #[test]
    fn test_result_code_from_raw() {
        assert_eq!(ResultCode::from_raw(-1), ResultCode::Ok);
        assert_eq!(ResultCode::from_raw(0), ResultCode::Canceled);
        assert_eq!(ResultCode::from_raw(10001), ResultCode::Other(10001));
        assert!(ResultCode::from_raw(0).is_canceled());
    }

    #[test]
    fn test_request_code_constants_are_distinct() {
        assert_ne!(RequestCode::SIGN_IN, RequestCode::ACHIEVEMENTS);
        assert_ne!(RequestCode::ACHIEVEMENTS, RequestCode::LEADERBOARD);
        assert_eq!(RequestCode::SIGN_IN.to_string(), "rc-69");
    }

    // -- Resources ----------------------------------------------------------

    #[test]
    fn test_resource_key_rejects_blank() {
        assert!(ResourceKey::new("").is_none());
        assert!(ResourceKey::new("   ").is_none());
        assert_eq!(
            ResourceKey::new("CgkI_achievement").unwrap().as_str(),
            "CgkI_achievement"
        );
    }

    #[test]
    fn test_flow_kind_json_format() {
        let key = ResourceKey::new("lb_1").unwrap();
        let json = serde_json::to_value(FlowKind::Leaderboard(key)).unwrap();

        assert_eq!(json["kind"], "Leaderboard");
        assert_eq!(json["key"], "lb_1");
    }

    #[test]
    fn test_popup_anchor_default_is_top_center() {
        assert_eq!(PopupAnchor::default(), PopupAnchor::TopCenter);
        assert_eq!(
            serde_json::to_string(&PopupAnchor::BottomLeft).unwrap(),
            "\"bottom_left\""
        );
    }
}
