//! Settle-all fan-out of provider updates.

use std::fmt;

use agent_provider::ProviderError;
use futures::future::{join_all, BoxFuture};
use serde::Serialize;
use tracing::warn;

use crate::report::FanOutSummary;

/// Kind of provider-side resource being updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Agent,
    Llm,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Agent => write!(f, "agent"),
            ResourceKind::Llm => write!(f, "llm"),
        }
    }
}

/// A provider update that did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub kind: ResourceKind,
    pub resource_id: String,
    pub error: String,
}

/// One pending provider update.
pub(crate) struct RemoteCall<'a> {
    kind: ResourceKind,
    resource_id: String,
    future: BoxFuture<'a, Result<(), ProviderError>>,
}

impl<'a> RemoteCall<'a> {
    pub(crate) fn new(
        kind: ResourceKind,
        resource_id: &str,
        future: BoxFuture<'a, Result<(), ProviderError>>,
    ) -> Self {
        Self {
            kind,
            resource_id: resource_id.to_string(),
            future,
        }
    }
}

/// Run every call concurrently and wait for all of them, successful or not.
///
/// A failed call never cancels its siblings.
pub(crate) async fn settle_all(calls: Vec<RemoteCall<'_>>) -> FanOutSummary {
    let total = calls.len();

    let outcomes = join_all(calls.into_iter().map(|call| async move {
        let result = call.future.await;
        (call.kind, call.resource_id, result)
    }))
    .await;

    let failures: Vec<RemoteFailure> = outcomes
        .into_iter()
        .filter_map(|(kind, resource_id, result)| match result {
            Ok(()) => None,
            Err(err) => {
                warn!(%kind, resource_id = %resource_id, error = %err, "Provider update failed");
                Some(RemoteFailure {
                    kind,
                    resource_id,
                    error: err.to_string(),
                })
            }
        })
        .collect();

    FanOutSummary {
        calls: total,
        failures,
    }
}
