//! Secrets read from a directory of JSON files.
//!
//! Each resource lives in `<dir>/<resource>.json` as a flat JSON object of
//! string values, for example `billing-provider.json`:
//!
//! ```json
//! { "email": "ops@example.com", "token": "..." }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{CredentialProvider, CredentialProviderError};
use crate::domain::{CredentialResource, SecretBag};

/// Credential provider backed by a mounted secrets directory.
#[derive(Debug, Clone)]
pub struct DirectoryCredentialProvider {
    root: PathBuf,
}

impl DirectoryCredentialProvider {
    /// Read secrets from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the provider reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, resource: CredentialResource) -> Result<SecretBag, CredentialProviderError> {
        let file_name = format!("{}.json", resource.name());
        let unavailable = |message: String| {
            CredentialProviderError::unavailable(resource.name(), message)
        };

        let dir = Dir::open_ambient_dir(&self.root, ambient_authority()).map_err(|err| {
            unavailable(format!("open {}: {err}", self.root.display()))
        })?;
        let payload = Zeroizing::new(
            dir.read(Path::new(&file_name))
                .map_err(|err| unavailable(format!("read {file_name}: {err}")))?,
        );
        let values: BTreeMap<String, String> =
            serde_json::from_slice(payload.as_slice()).map_err(|err| {
                CredentialProviderError::malformed(
                    resource.name(),
                    format!("{file_name} must be a JSON object of strings: {err}"),
                )
            })?;
        debug!(resource = %resource, keys = values.len(), "credentials loaded");
        Ok(SecretBag::from_pairs(values))
    }
}

#[async_trait]
impl CredentialProvider for DirectoryCredentialProvider {
    async fn resolve(
        &self,
        resource: CredentialResource,
    ) -> Result<SecretBag, CredentialProviderError> {
        self.read(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn secrets() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn write(dir: &TempDir, name: &str, contents: &str) {
        std::fs::write(dir.path().join(name), contents).expect("write secret");
    }

    #[rstest]
    #[tokio::test]
    async fn reads_resource_file(secrets: TempDir) {
        write(
            &secrets,
            "billing-provider.json",
            r#"{ "email": "ops@example.com", "token": "t0k3n" }"#,
        );
        let provider = DirectoryCredentialProvider::new(secrets.path());

        let bag = provider
            .resolve(CredentialResource::BillingProvider)
            .await
            .expect("bag");

        assert_eq!(bag.get("email"), Some("ops@example.com"));
        assert_eq!(bag.get("token"), Some("t0k3n"));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_file_is_unavailable(secrets: TempDir) {
        let provider = DirectoryCredentialProvider::new(secrets.path());

        let err = provider
            .resolve(CredentialResource::LocalStore)
            .await
            .expect_err("no file");

        assert!(matches!(
            err,
            CredentialProviderError::Unavailable { ref resource, .. } if resource == "local-store"
        ));
    }

    #[rstest]
    #[case::not_json("email=ops")]
    #[case::not_an_object(r#"["ops"]"#)]
    #[case::non_string_value(r#"{ "port": 5432 }"#)]
    #[tokio::test]
    async fn unexpected_shapes_are_malformed(secrets: TempDir, #[case] contents: &str) {
        write(&secrets, "local-store.json", contents);
        let provider = DirectoryCredentialProvider::new(secrets.path());

        let err = provider
            .resolve(CredentialResource::LocalStore)
            .await
            .expect_err("malformed");

        assert!(matches!(err, CredentialProviderError::Malformed { .. }));
    }
}
