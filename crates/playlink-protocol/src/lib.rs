//! Shared vocabulary for Playlink.
//!
//! Every other crate in the workspace talks in terms of the types defined
//! here:
//!
//! - **Types** ([`Identity`], [`LoginPreference`], [`RequestCode`],
//!   [`ResultCode`], [`UiFlow`], etc.): the values that cross the boundary
//!   between the session layer, the game-services provider, and the host app.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how persisted values are
//!   turned into bytes and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! # Architecture
//!
//! ```text
//! Host app ──(UiFlow, ResultCode)──→ Session layer ──(Identity)──→ Provider
//!                                         │
//!                                         ▼
//!                              Store (LoginPreference)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    AccountId, FlowKind, Identity, LoginPreference, PlayerProfile, PopupAnchor, RequestCode,
    ResourceKey, ResultCode, UiFlow,
};
