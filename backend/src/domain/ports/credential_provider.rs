//! Port for the secret backend.
//!
//! Credentials are keyed by logical resource name and handed back as an opaque
//! [`SecretBag`]. Caching, if any, is layered on by whoever composes the
//! service. Coordinators receive already-resolved credentials, except for
//! reads that can be answered locally, which resolve on the provider path.

use async_trait::async_trait;

use crate::domain::{CredentialResource, SecretBag};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential provider adapters.
    pub enum CredentialProviderError {
        /// The secret backend could not produce the secret.
        Unavailable { resource: String, message: String } =>
            "credentials for {resource} unavailable: {message}",
        /// The secret exists but does not have the expected shape.
        Malformed { resource: String, message: String } =>
            "credentials for {resource} are malformed: {message}",
    }
}

/// Secret backend lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve the secrets for `resource`.
    async fn resolve(&self, resource: CredentialResource)
    -> Result<SecretBag, CredentialProviderError>;
}

/// Fixture provider returning static, obviously fake secrets.
///
/// Useful for wiring tests where credential handling is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialProvider;

#[async_trait]
impl CredentialProvider for FixtureCredentialProvider {
    async fn resolve(
        &self,
        resource: CredentialResource,
    ) -> Result<SecretBag, CredentialProviderError> {
        Ok(match resource {
            CredentialResource::BillingProvider => {
                SecretBag::from_pairs([("email", "fixture@example.com"), ("token", "fixture-token")])
            }
            CredentialResource::LocalStore => {
                SecretBag::from_pairs([("username", "fixture"), ("password", "fixture")])
            }
        })
    }
}
