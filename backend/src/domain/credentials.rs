//! Credentials passed explicitly into store and provider calls.
//!
//! A [`SecretBag`] is the opaque form a secret backend hands out; typed views
//! such as [`BillingCredentials`] pull the keys each consumer needs. Secret
//! values are zeroised on drop and never printed by `Debug`.

use std::collections::BTreeMap;

use serde_json::json;
use zeroize::Zeroizing;

use super::Error;
use super::ports::{CredentialProvider, CredentialProviderError};

/// Logical resource a credential set unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialResource {
    /// The local document store.
    LocalStore,
    /// The remote billing provider.
    BillingProvider,
}

impl CredentialResource {
    /// Name used to key the secret backend.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LocalStore => "local-store",
            Self::BillingProvider => "billing-provider",
        }
    }
}

impl std::fmt::Display for CredentialResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque string-keyed secret values.
#[derive(Clone, Default)]
pub struct SecretBag {
    values: BTreeMap<String, Zeroizing<String>>,
}

impl SecretBag {
    /// Build a bag from key/value pairs.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::SecretBag;
    ///
    /// let bag = SecretBag::from_pairs([("email", "ops@example.com"), ("token", "s3cr3t")]);
    /// assert_eq!(bag.get("email"), Some("ops@example.com"));
    /// assert!(!format!("{bag:?}").contains("s3cr3t"));
    /// ```
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), Zeroizing::new(value.into())))
                .collect(),
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|value| value.as_str())
    }

    fn require(&self, resource: CredentialResource, key: &str) -> Result<&str, CredentialProviderError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(CredentialProviderError::malformed(
                resource.name(),
                format!("missing `{key}`"),
            )),
        }
    }
}

impl std::fmt::Debug for SecretBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBag")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Basic-auth credentials for the billing provider.
#[derive(Clone)]
pub struct BillingCredentials {
    email: String,
    token: Zeroizing<String>,
}

impl BillingCredentials {
    /// Build credentials from their parts.
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: Zeroizing::new(token.into()),
        }
    }

    /// Extract `email` and `token` from a resolved bag.
    ///
    /// # Errors
    /// Returns [`CredentialProviderError::Malformed`] when either key is
    /// missing or blank.
    pub fn from_bag(bag: &SecretBag) -> Result<Self, CredentialProviderError> {
        let resource = CredentialResource::BillingProvider;
        Ok(Self::new(
            bag.require(resource, "email")?,
            bag.require(resource, "token")?,
        ))
    }

    /// Account email used as the basic-auth user.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// API token used as the basic-auth password.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for BillingCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingCredentials")
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Username and password for the local store.
#[derive(Clone)]
pub struct StoreCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl StoreCredentials {
    /// Extract `username` and `password` from a resolved bag.
    ///
    /// # Errors
    /// Returns [`CredentialProviderError::Malformed`] when either key is
    /// missing or blank.
    pub fn from_bag(bag: &SecretBag) -> Result<Self, CredentialProviderError> {
        let resource = CredentialResource::LocalStore;
        Ok(Self {
            username: bag.require(resource, "username")?.to_owned(),
            password: Zeroizing::new(bag.require(resource, "password")?.to_owned()),
        })
    }

    /// Store user.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Store password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Map a credential failure to a dependency error.
#[must_use]
pub fn map_credential_error(error: &CredentialProviderError) -> Error {
    let resource = match error {
        CredentialProviderError::Unavailable { resource, .. }
        | CredentialProviderError::Malformed { resource, .. } => resource.clone(),
    };
    Error::failed_dependency(format!("credential retrieval failed: {error}"))
        .with_details(json!({ "resource": resource }))
}

/// Resolve fresh billing credentials for one request.
///
/// # Errors
/// Returns [`crate::domain::ErrorCode::FailedDependency`] when the secret
/// backend cannot produce usable credentials.
pub async fn resolve_billing_credentials(
    provider: &dyn CredentialProvider,
) -> Result<BillingCredentials, Error> {
    let bag = provider
        .resolve(CredentialResource::BillingProvider)
        .await
        .map_err(|err| map_credential_error(&err))?;
    BillingCredentials::from_bag(&bag).map_err(|err| map_credential_error(&err))
}
