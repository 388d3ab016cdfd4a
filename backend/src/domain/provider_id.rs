//! Identifiers issued by the remote billing provider.
//!
//! The local store keeps these as foreign, non-owning references: a local
//! record may point at a provider document, the provider never points back.

use serde::{Deserialize, Serialize};

/// Validation failure for provider identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderIdError {
    /// The identifier was empty after trimming.
    #[error("provider identifiers must not be empty")]
    Empty,
}

fn checked(raw: String) -> Result<String, ProviderIdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ProviderIdError::Empty);
    }
    if trimmed.len() == raw.len() {
        Ok(raw)
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Invoice identifier assigned by the billing provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderInvoiceId(String);

impl ProviderInvoiceId {
    /// Validate and wrap a provider invoice id.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ProviderInvoiceId;
    ///
    /// let id = ProviderInvoiceId::new(" 42 ").expect("non-empty");
    /// assert_eq!(id.as_str(), "42");
    /// assert!(ProviderInvoiceId::new("  ").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, ProviderIdError> {
        checked(raw.into()).map(Self)
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Contact identifier assigned by the billing provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderContactId(String);

impl ProviderContactId {
    /// Validate and wrap a provider contact id.
    pub fn new(raw: impl Into<String>) -> Result<Self, ProviderIdError> {
        checked(raw.into()).map(Self)
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_provider_id_conversions {
    ($($ty:ident),*) => {
        $(
            impl TryFrom<String> for $ty {
                type Error = ProviderIdError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::new(value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.0
                }
            }

            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )*
    };
}

impl_provider_id_conversions!(ProviderInvoiceId, ProviderContactId);
