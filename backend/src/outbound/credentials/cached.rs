//! Time-bounded cache in front of another credential provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{CredentialProvider, CredentialProviderError};
use crate::domain::{CredentialResource, SecretBag};

struct CachedEntry {
    fetched_at: DateTime<Utc>,
    bag: SecretBag,
}

/// Caches resolved secrets per resource for a fixed time to live.
///
/// Failures are never cached; the next call retries the inner provider.
pub struct CachedCredentialProvider<P> {
    inner: P,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<CredentialResource, CachedEntry>>,
}

impl<P> CachedCredentialProvider<P> {
    /// Wrap `inner`, keeping entries for `ttl`.
    ///
    /// A TTL too large for `chrono` is clamped to its maximum.
    pub fn new(inner: P, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            inner,
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn is_fresh(&self, entry: &CachedEntry, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.fetched_at) < self.ttl
    }
}

#[async_trait]
impl<P> CredentialProvider for CachedCredentialProvider<P>
where
    P: CredentialProvider,
{
    async fn resolve(
        &self,
        resource: CredentialResource,
    ) -> Result<SecretBag, CredentialProviderError> {
        let now = self.clock.utc();
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&resource) {
                if self.is_fresh(entry, now) {
                    return Ok(entry.bag.clone());
                }
            }
        }

        let bag = self.inner.resolve(resource).await?;
        debug!(resource = %resource, "credential cache refreshed");
        self.entries.write().await.insert(
            resource,
            CachedEntry {
                fetched_at: now,
                bag: bag.clone(),
            },
        );
        Ok(bag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockCredentialProvider;
    use chrono::Local;
    use std::sync::Mutex;

    /// Clock advanced manually by the test.
    struct SteppingClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl SteppingClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(
                    DateTime::<Utc>::from_timestamp(1_767_225_600, 0).expect("timestamp"),
                ),
            }
        }

        fn advance(&self, seconds: i64) {
            let mut now = self.now.lock().expect("clock lock");
            *now += chrono::Duration::seconds(seconds);
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.now.lock().expect("clock lock")
        }
    }

    fn bag(token: &str) -> SecretBag {
        SecretBag::from_pairs([("email", "ops@example.com"), ("token", token)])
    }

    #[tokio::test]
    async fn serves_from_cache_within_ttl() {
        let mut inner = MockCredentialProvider::new();
        inner
            .expect_resolve()
            .times(1)
            .returning(|_| Ok(bag("first")));
        let clock = Arc::new(SteppingClock::new());
        let cache = CachedCredentialProvider::new(inner, Duration::from_secs(60), clock.clone());

        cache
            .resolve(CredentialResource::BillingProvider)
            .await
            .expect("first");
        clock.advance(59);
        let again = cache
            .resolve(CredentialResource::BillingProvider)
            .await
            .expect("cached");

        assert_eq!(again.get("token"), Some("first"));
    }

    #[tokio::test]
    async fn refreshes_after_ttl() {
        let mut inner = MockCredentialProvider::new();
        let mut calls = 0;
        inner.expect_resolve().times(2).returning(move |_| {
            calls += 1;
            Ok(bag(if calls == 1 { "first" } else { "second" }))
        });
        let clock = Arc::new(SteppingClock::new());
        let cache = CachedCredentialProvider::new(inner, Duration::from_secs(60), clock.clone());

        cache
            .resolve(CredentialResource::BillingProvider)
            .await
            .expect("first");
        clock.advance(60);
        let refreshed = cache
            .resolve(CredentialResource::BillingProvider)
            .await
            .expect("refreshed");

        assert_eq!(refreshed.get("token"), Some("second"));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mut inner = MockCredentialProvider::new();
        let mut calls = 0;
        inner.expect_resolve().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(CredentialProviderError::unavailable("billing-provider", "down"))
            } else {
                Ok(bag("recovered"))
            }
        });
        let cache = CachedCredentialProvider::new(
            inner,
            Duration::from_secs(60),
            Arc::new(SteppingClock::new()),
        );

        cache
            .resolve(CredentialResource::BillingProvider)
            .await
            .expect_err("first call fails");
        let bag = cache
            .resolve(CredentialResource::BillingProvider)
            .await
            .expect("second call succeeds");

        assert_eq!(bag.get("token"), Some("recovered"));
    }

    #[tokio::test]
    async fn zero_ttl_always_delegates() {
        let mut inner = MockCredentialProvider::new();
        inner
            .expect_resolve()
            .times(2)
            .returning(|_| Ok(bag("live")));
        let cache =
            CachedCredentialProvider::new(inner, Duration::ZERO, Arc::new(SteppingClock::new()));

        for _ in 0..2 {
            cache
                .resolve(CredentialResource::LocalStore)
                .await
                .expect("resolve");
        }
    }
}
