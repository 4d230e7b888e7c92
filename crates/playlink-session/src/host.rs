//! The host application's side of the contract.

use playlink_protocol::{RequestCode, UiFlow};

/// What the session layer needs from the application embedding it.
///
/// In return the host promises to call
/// [`SessionManager::init`](crate::SessionManager::init) on startup and
/// whenever the app comes back to the foreground, and to hand every
/// result of a flow it launched here back through
/// [`SessionManager::route_ui_result`](crate::SessionManager::route_ui_result).
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
///
/// use playlink_protocol::{RequestCode, UiFlow};
/// use playlink_session::HostApp;
///
/// struct ConsoleHost {
///     resources: HashMap<String, String>,
/// }
///
/// impl HostApp for ConsoleHost {
///     fn launch_flow(&self, flow: UiFlow, request_code: RequestCode) {
///         println!("would open {} ({request_code})", flow.action);
///     }
///
///     fn show_notice(&self, message: &str) {
///         eprintln!("{message}");
///     }
///
///     fn resolve_resource(&self, name: &str) -> Option<String> {
///         self.resources.get(name).cloned()
///     }
/// }
/// ```
pub trait HostApp: Send + Sync + 'static {
    /// Starts an external UI flow. Its result must later come back tagged
    /// with `request_code`.
    fn launch_flow(&self, flow: UiFlow, request_code: RequestCode);

    /// Shows a short, dismissable message to the player.
    fn show_notice(&self, message: &str);

    /// Maps a human-readable achievement or leaderboard name to the
    /// provider's resource key. `None` or an empty string means unknown.
    fn resolve_resource(&self, name: &str) -> Option<String>;
}
