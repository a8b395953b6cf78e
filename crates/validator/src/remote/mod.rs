//! Remote check channel
//!
//! Constraints that need the server queue a [`RemoteCheck`] on the
//! [`RemoteChannel`] during a validation pass. Nothing is spawned: checks
//! are futures kept in a `FuturesUnordered` and only make progress while the
//! owner awaits completions, which keeps the single-threaded model of the
//! form. Completions arrive in whatever order the transport answers.

#[cfg(feature = "http")]
mod http;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use parking_lot::Mutex;
use tracing::debug;

use crate::foundation::TransportError;

#[cfg(feature = "http")]
pub use http::HttpTransport;

/// Sends a check to the server and returns its boolean verdict.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Posts `body` to `route`. `Ok(true)` means valid.
    async fn send(&self, route: &str, body: &serde_json::Value) -> Result<bool, TransportError>;
}

/// A transport for forms without remote checks; every send fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransport;

#[async_trait]
impl RemoteTransport for NoTransport {
    async fn send(&self, route: &str, _body: &serde_json::Value) -> Result<bool, TransportError> {
        Err(TransportError::Unavailable(format!(
            "no transport configured for `{route}`"
        )))
    }
}

/// The last snapshot a constraint instance sent.
///
/// A check is issued only when the snapshot differs from the previous one.
#[derive(Debug, Clone, Default)]
pub struct DedupMemo(Arc<Mutex<Option<String>>>);

impl DedupMemo {
    /// Records `snapshot` and returns true if it differs from the last one.
    pub fn should_issue(&self, snapshot: &str) -> bool {
        let mut last = self.0.lock();
        if last.as_deref() == Some(snapshot) {
            return false;
        }
        *last = Some(snapshot.to_owned());
        true
    }

    /// Forgets `snapshot` if it is still the last one, so it is re-sent.
    pub fn rearm(&self, snapshot: &str) {
        let mut last = self.0.lock();
        if last.as_deref() == Some(snapshot) {
            *last = None;
        }
    }

    /// The last recorded snapshot.
    pub fn current(&self) -> Option<String> {
        self.0.lock().clone()
    }
}

/// One queued check.
#[derive(Debug, Clone)]
pub struct RemoteCheck {
    /// Route the body is posted to.
    pub route: String,
    /// Request body.
    pub body: serde_json::Value,
    /// Element that shows the verdict.
    pub target: String,
    /// Error source id the verdict is published under.
    pub source_id: String,
    /// Message shown on a negative verdict.
    pub message: String,
    dedup: Option<(DedupMemo, String)>,
}

impl RemoteCheck {
    /// Creates a check.
    pub fn new(route: &str, body: serde_json::Value, target: &str, source_id: &str, message: &str) -> Self {
        Self {
            route: route.to_owned(),
            body,
            target: target.to_owned(),
            source_id: source_id.to_owned(),
            message: message.to_owned(),
            dedup: None,
        }
    }

    /// Ties the check to the memo that let it through.
    #[must_use]
    pub fn deduplicated(mut self, memo: DedupMemo, snapshot: String) -> Self {
        self.dedup = Some((memo, snapshot));
        self
    }

    /// Lets the same snapshot through again.
    pub fn rearm(&self) {
        if let Some((memo, snapshot)) = &self.dedup {
            memo.rearm(snapshot);
        }
    }

    /// Errors to publish for a verdict.
    pub fn errors_for(&self, valid: bool) -> Vec<String> {
        if valid {
            Vec::new()
        } else {
            vec![self.message.clone()]
        }
    }
}

/// A finished check.
#[derive(Debug)]
pub struct RemoteCompletion {
    /// The check.
    pub check: RemoteCheck,
    /// The verdict, or why there is none.
    pub outcome: Result<bool, TransportError>,
}

/// In-flight remote checks.
pub struct RemoteChannel {
    transport: Arc<dyn RemoteTransport>,
    in_flight: FuturesUnordered<BoxFuture<'static, RemoteCompletion>>,
    issued: u64,
}

impl RemoteChannel {
    /// Creates a channel sending through `transport`.
    pub fn new(transport: Arc<dyn RemoteTransport>) -> Self {
        Self {
            transport,
            in_flight: FuturesUnordered::new(),
            issued: 0,
        }
    }

    /// Queues a check. It starts when completions are next awaited.
    pub fn dispatch(&mut self, check: RemoteCheck) {
        debug!(route = %check.route, source_id = %check.source_id, target = %check.target, "remote check dispatched");
        let transport = Arc::clone(&self.transport);
        self.in_flight.push(Box::pin(async move {
            let outcome = transport.send(&check.route, &check.body).await;
            RemoteCompletion { check, outcome }
        }));
        self.issued += 1;
    }

    /// Number of checks not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Total checks dispatched since creation.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// The next check to complete, or `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<RemoteCompletion> {
        self.in_flight.next().await
    }
}

impl fmt::Debug for RemoteChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteChannel")
            .field("in_flight", &self.in_flight.len())
            .field("issued", &self.issued)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Verdict(bool);

    #[async_trait]
    impl RemoteTransport for Verdict {
        async fn send(&self, _route: &str, _body: &serde_json::Value) -> Result<bool, TransportError> {
            Ok(self.0)
        }
    }

    #[test]
    fn memo_suppresses_identical_snapshots() {
        let memo = DedupMemo::default();
        assert!(memo.should_issue("a"));
        assert!(!memo.should_issue("a"));
        assert!(memo.should_issue("b"));
        assert!(memo.should_issue("a"));
    }

    #[test]
    fn rearm_only_forgets_the_current_snapshot() {
        let memo = DedupMemo::default();
        memo.should_issue("a");
        memo.should_issue("b");
        memo.rearm("a");
        assert_eq!(memo.current().as_deref(), Some("b"));
        memo.rearm("b");
        assert!(memo.should_issue("b"));
    }

    #[tokio::test]
    async fn completions_carry_their_check() {
        let mut channel = RemoteChannel::new(Arc::new(Verdict(false)));
        channel.dispatch(RemoteCheck::new("/check", json!({}), "email", "unique-entity-form-0", "taken"));
        assert_eq!(channel.in_flight(), 1);

        let completion = channel.next_completion().await.unwrap();
        assert_eq!(completion.check.target, "email");
        let verdict = completion.outcome.unwrap();
        assert_eq!(completion.check.errors_for(verdict), ["taken"]);
        assert!(channel.next_completion().await.is_none());
        assert_eq!(channel.issued(), 1);
    }

    #[tokio::test]
    async fn no_transport_fails_every_send() {
        let error = NoTransport.send("/check", &json!({})).await.unwrap_err();
        assert!(matches!(error, TransportError::Unavailable(_)));
    }
}
