//! Joint state of a write that spans the local store and the billing provider.
//!
//! Neither store takes part in a shared transaction, so no coordinated write is
//! simply a success or a failure. Every write returns a [`Synced`] value whose
//! [`SyncOutcome`] says which side holds the result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a coordinated write.
///
/// Serialised with an `outcome` tag and an optional `reason`:
///
/// ```
/// use backend::domain::SyncOutcome;
/// use serde_json::json;
///
/// let outcome = SyncOutcome::local_only("provider timed out");
/// assert_eq!(
///     serde_json::to_value(&outcome).unwrap(),
///     json!({ "outcome": "LocalOnly", "reason": "provider timed out" })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum SyncOutcome {
    /// Both stores hold the record.
    FullySynced,
    /// The local store holds the change; the provider does not.
    LocalOnly {
        /// Why the provider side did not complete.
        reason: String,
    },
    /// The provider holds the change; the local store does not reflect it.
    RemoteOnly {
        /// Why the local side did not complete.
        reason: String,
    },
    /// Neither store was changed.
    Failed {
        /// Why the operation was abandoned.
        reason: String,
    },
}

impl SyncOutcome {
    /// Build [`SyncOutcome::LocalOnly`].
    pub fn local_only(reason: impl Into<String>) -> Self {
        Self::LocalOnly {
            reason: reason.into(),
        }
    }

    /// Build [`SyncOutcome::RemoteOnly`].
    pub fn remote_only(reason: impl Into<String>) -> Self {
        Self::RemoteOnly {
            reason: reason.into(),
        }
    }

    /// Build [`SyncOutcome::Failed`].
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Whether both sides completed.
    #[must_use]
    pub const fn is_fully_synced(&self) -> bool {
        matches!(self, Self::FullySynced)
    }

    /// Stable tag, identical to the serialised `outcome` field.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FullySynced => "FullySynced",
            Self::LocalOnly { .. } => "LocalOnly",
            Self::RemoteOnly { .. } => "RemoteOnly",
            Self::Failed { .. } => "Failed",
        }
    }

    /// Reason attached to a partial or failed outcome.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::FullySynced => None,
            Self::LocalOnly { reason } | Self::RemoteOnly { reason } | Self::Failed { reason } => {
                Some(reason)
            }
        }
    }
}

/// A record together with the joint outcome that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    /// The record as the local store now knows it.
    pub record: T,
    /// Which side(s) hold the change.
    pub outcome: SyncOutcome,
    /// Payload the provider returned, when it answered.
    pub provider_payload: Option<Value>,
}

impl<T> Synced<T> {
    /// Both sides completed.
    pub fn fully_synced(record: T, provider_payload: Value) -> Self {
        Self {
            record,
            outcome: SyncOutcome::FullySynced,
            provider_payload: Some(provider_payload),
        }
    }

    /// Only the local side completed.
    pub fn local_only(record: T, reason: impl Into<String>) -> Self {
        Self {
            record,
            outcome: SyncOutcome::local_only(reason),
            provider_payload: None,
        }
    }

    /// Only the provider side completed.
    pub fn remote_only(record: T, reason: impl Into<String>, provider_payload: Value) -> Self {
        Self {
            record,
            outcome: SyncOutcome::remote_only(reason),
            provider_payload: Some(provider_payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(SyncOutcome::FullySynced, json!({ "outcome": "FullySynced" }))]
    #[case(SyncOutcome::remote_only("store down"), json!({ "outcome": "RemoteOnly", "reason": "store down" }))]
    #[case(SyncOutcome::failed("rejected"), json!({ "outcome": "Failed", "reason": "rejected" }))]
    fn serialises_with_outcome_tag(#[case] outcome: SyncOutcome, #[case] expected: Value) {
        assert_eq!(serde_json::to_value(&outcome).expect("json"), expected);
        assert_eq!(expected["outcome"], outcome.label());
    }

    #[test]
    fn reason_is_absent_only_when_fully_synced() {
        assert_eq!(SyncOutcome::FullySynced.reason(), None);
        assert_eq!(SyncOutcome::local_only("x").reason(), Some("x"));
    }
}
