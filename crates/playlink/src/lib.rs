//! # Playlink
//!
//! Game-services integration for games: sign-in, achievements, and
//! leaderboards behind one session object.
//!
//! The game implements [`HostApp`](playlink_session::HostApp) (launch UI
//! flows, show notices, map names to resource keys) and plugs in an
//! [`AuthProvider`](playlink_session::AuthProvider) binding for its
//! platform. Playlink decides when to sign in silently, when to show the
//! sign-in screen, and when to stop asking.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use playlink::prelude::*;
//!
//! # struct MyHost;
//! # impl HostApp for MyHost {
//! #     fn launch_flow(&self, _: UiFlow, _: RequestCode) {}
//! #     fn show_notice(&self, _: &str) {}
//! #     fn resolve_resource(&self, _: &str) -> Option<String> { None }
//! # }
//! # async fn run() -> Result<(), PlaylinkError> {
//! playlink::init_logging();
//!
//! let services = GameServicesBuilder::new()
//!     .preference_file("data/prefs.json")
//!     .build(OfflineProvider::new(), MyHost)?;
//!
//! services.init().await;
//! services.unlock_achievement("first_win");
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;
mod offline;
mod services;

pub use error::PlaylinkError;
pub use logging::init_logging;
pub use offline::{OfflineBehavior, OfflinePayload, OfflineProvider};
pub use services::{GameServices, GameServicesBuilder};

pub mod prelude {
    //! Everything a host usually needs, in one import.

    pub use crate::{
        GameServices, GameServicesBuilder, OfflineBehavior, OfflinePayload, OfflineProvider,
        PlaylinkError,
    };
    pub use playlink_protocol::{
        AccountId, FlowKind, Identity, LoginPreference, PlayerProfile, PopupAnchor, RequestCode,
        ResourceKey, ResultCode, UiFlow,
    };
    pub use playlink_session::{
        AuthOutcome, AuthProvider, HostApp, SessionConfig, SessionError, SessionManager,
        SessionStatus, UiResult,
    };
    pub use playlink_store::{JsonFileStore, MemoryStore, PreferenceStore, StoreError};
}
