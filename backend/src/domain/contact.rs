//! Billing contacts.
//!
//! A contact becomes usable as an invoice client only once the billing
//! provider has issued an id for it. Until then it is a [`ContactDraft`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::FieldViolation;
use super::provider_id::ProviderContactId;

/// Locally generated contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(Uuid);

impl ContactId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Legal classification of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonKind {
    /// A natural person.
    PersonEntity,
    /// A company or other legal entity.
    LegalEntity,
}

/// Tax identification document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    /// Document type code, e.g. `CC` or `NIT`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Document number.
    pub number: String,
}

/// Contact payload that has not been provisioned at the billing provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    /// Display or legal name.
    pub name: String,
    /// Tax identification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
    /// Person or legal entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind_of_person: Option<PersonKind>,
    /// Tax regime label as the provider spells it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regime: Option<String>,
    /// Mobile phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactDraft {
    /// Collect violations, prefixing field names with `prefix`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ContactDraft;
    ///
    /// let draft = ContactDraft {
    ///     name: " ".into(),
    ///     identification: None,
    ///     kind_of_person: None,
    ///     regime: None,
    ///     mobile: None,
    ///     email: Some("nobody".into()),
    /// };
    /// let fields: Vec<_> = draft.violations("client").into_iter().map(|v| v.field).collect();
    /// assert_eq!(fields, ["client.name", "client.email"]);
    /// ```
    #[must_use]
    pub fn violations(&self, prefix: &str) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.name.trim().is_empty() {
            violations.push(FieldViolation::new(
                format!("{prefix}.name"),
                "must not be empty",
            ));
        }
        if let Some(identification) = &self.identification {
            if identification.number.trim().is_empty() {
                violations.push(FieldViolation::new(
                    format!("{prefix}.identification.number"),
                    "must not be empty",
                ));
            }
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                violations.push(FieldViolation::new(
                    format!("{prefix}.email"),
                    "must be an email address",
                ));
            }
        }
        violations
    }
}

/// A contact known to both the billing provider and the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Local identifier.
    pub id: ContactId,
    /// Provider-issued identifier.
    pub provider_id: ProviderContactId,
    /// Contact fields as sent to the provider.
    pub details: ContactDraft,
    /// When the local copy was written.
    pub created_at: DateTime<Utc>,
}

/// Contact document returned by the billing provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteContact {
    /// Provider-issued identifier.
    pub provider_id: ProviderContactId,
    /// Raw provider payload.
    pub document: Value,
}
