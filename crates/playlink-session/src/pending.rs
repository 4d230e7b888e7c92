//! Registry of launched UI flows waiting for their result.

use std::collections::HashMap;
use std::time::Instant;

use playlink_protocol::{FlowKind, RequestCode};

/// One launched external UI flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUiRequest {
    pub request_code: RequestCode,
    pub kind: FlowKind,
    pub launched_at: Instant,
}

/// Launched flows keyed by request code.
///
/// At most one flow per code: launching the achievements screen twice
/// before the first result comes back leaves a single entry, since the
/// host can't tell the two results apart anyway.
#[derive(Debug, Default)]
pub struct PendingRequests {
    requests: HashMap<RequestCode, PendingUiRequest>,
}

impl PendingRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a launched flow, replacing any earlier one with the same
    /// code.
    pub fn register(&mut self, request_code: RequestCode, kind: FlowKind) {
        let previous = self.requests.insert(
            request_code,
            PendingUiRequest {
                request_code,
                kind,
                launched_at: Instant::now(),
            },
        );
        if previous.is_some() {
            tracing::debug!(%request_code, "replaced pending ui request");
        }
    }

    /// Removes and returns the flow registered under `request_code`.
    pub fn take(&mut self, request_code: RequestCode) -> Option<PendingUiRequest> {
        self.requests.remove(&request_code)
    }

    pub fn contains(&self, request_code: RequestCode) -> bool {
        self.requests.contains_key(&request_code)
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_take_returns_request() {
        let mut pending = PendingRequests::new();
        pending.register(RequestCode::SIGN_IN, FlowKind::SignIn);

        let taken = pending.take(RequestCode::SIGN_IN).expect("registered");

        assert_eq!(taken.request_code, RequestCode::SIGN_IN);
        assert_eq!(taken.kind, FlowKind::SignIn);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_take_unknown_returns_none() {
        let mut pending = PendingRequests::new();

        assert!(pending.take(RequestCode(1)).is_none());
    }

    #[test]
    fn test_take_consumes_request_once() {
        let mut pending = PendingRequests::new();
        pending.register(RequestCode::ACHIEVEMENTS, FlowKind::Achievements);

        assert!(pending.take(RequestCode::ACHIEVEMENTS).is_some());
        assert!(pending.take(RequestCode::ACHIEVEMENTS).is_none());
    }

    #[test]
    fn test_register_same_code_keeps_single_entry() {
        let mut pending = PendingRequests::new();
        pending.register(RequestCode::ACHIEVEMENTS, FlowKind::Achievements);
        pending.register(RequestCode::ACHIEVEMENTS, FlowKind::Achievements);

        assert!(pending.contains(RequestCode::ACHIEVEMENTS));
        assert!(pending.take(RequestCode::ACHIEVEMENTS).is_some());
        assert!(pending.is_empty());
    }
}
