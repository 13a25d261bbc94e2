//! Identity gate in front of the diary.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::QueryCache;

/// Message an identity provider reports when a login is attempted over an
/// existing session.
pub const ALREADY_AUTHENTICATED: &str = "User is already authenticated";

const RELOGIN_DELAY: Duration = Duration::from_millis(300);

/// Authenticated principal. Opaque to the core: it gates access and keys the
/// query cache.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(principal: impl Into<String>) -> Result<Self> {
        let principal = principal.into().trim().to_string();
        if principal.is_empty() {
            return Err(Error::auth("Principal must not be empty"));
        }
        Ok(Self(principal))
    }

    pub fn principal(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Identity")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// External identity provider.
pub trait IdentityProvider: Send + Sync {
    /// Identity of an existing session, if any.
    fn current(&self) -> impl Future<Output = Result<Option<Identity>>> + Send;

    /// Start a session for `principal`.
    fn login(&self, principal: &str) -> impl Future<Output = Result<Identity>> + Send;

    /// End the current session. Succeeds when no session exists.
    fn clear(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Tracks the signed-in identity and keeps the query cache scoped to it.
#[derive(Debug)]
pub struct AuthGate<P> {
    provider: P,
    cache: Arc<QueryCache>,
    identity: Option<Identity>,
    relogin_delay: Duration,
}

impl<P: IdentityProvider> AuthGate<P> {
    pub const fn new(provider: P, cache: Arc<QueryCache>) -> Self {
        Self {
            provider,
            cache,
            identity: None,
            relogin_delay: RELOGIN_DELAY,
        }
    }

    #[must_use]
    pub const fn with_relogin_delay(mut self, delay: Duration) -> Self {
        self.relogin_delay = delay;
        self
    }

    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Pick up a session persisted by the provider.
    pub async fn restore(&mut self) -> Result<Option<&Identity>> {
        self.identity = self.provider.current().await?;
        Ok(self.identity.as_ref())
    }

    /// Log in, recovering from a leftover session the provider still holds.
    pub async fn sign_in(&mut self, principal: &str) -> Result<&Identity> {
        let identity = match self.provider.login(principal).await {
            Ok(identity) => identity,
            Err(Error::Auth(message)) if message.contains(ALREADY_AUTHENTICATED) => {
                tracing::warn!("Stale session detected, clearing before retrying login");
                self.provider.clear().await?;
                tokio::time::sleep(self.relogin_delay).await;
                self.provider.login(principal).await?
            }
            Err(error) => return Err(error),
        };

        if self.identity.as_ref().is_some_and(|current| current != &identity) {
            self.cache.clear();
        }
        tracing::info!("Signed in");
        Ok(&*self.identity.insert(identity))
    }

    /// End the session and drop every cached query.
    pub async fn sign_out(&mut self) -> Result<()> {
        self.provider.clear().await?;
        self.identity = None;
        self.cache.clear();
        tracing::info!("Signed out");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeProvider;
    use super::*;
    use crate::identity::EntryList;
    use crate::sync::{CachedValue, QueryKey};
    use pretty_assertions::assert_eq;

    fn gate(provider: FakeProvider) -> (AuthGate<FakeProvider>, Arc<QueryCache>) {
        let cache = Arc::new(QueryCache::new());
        let gate = AuthGate::new(provider, Arc::clone(&cache)).with_relogin_delay(Duration::ZERO);
        (gate, cache)
    }

    #[test]
    fn identity_rejects_blank_principal() {
        assert!(Identity::new("  ").is_err());
        assert_eq!(Identity::new(" alex ").unwrap().principal(), "alex");
    }

    #[test]
    fn identity_debug_redacts_principal() {
        let debug = format!("{:?}", Identity::new("secret-principal").unwrap());
        assert!(!debug.contains("secret-principal"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn sign_in_without_session() {
        let (mut gate, _) = gate(FakeProvider::default());

        let identity = gate.sign_in("alex").await.unwrap().clone();

        assert_eq!(identity.principal(), "alex");
        assert!(gate.is_authenticated());
        assert_eq!(gate.provider().logins(), 1);
        assert_eq!(gate.provider().clears(), 0);
    }

    #[tokio::test]
    async fn sign_in_recovers_from_stale_session() {
        let (mut gate, _) = gate(FakeProvider::with_session("old"));

        let identity = gate.sign_in("alex").await.unwrap().clone();

        assert_eq!(identity.principal(), "alex");
        assert_eq!(gate.provider().logins(), 2);
        assert_eq!(gate.provider().clears(), 1);
    }

    #[tokio::test]
    async fn restore_picks_up_existing_session() {
        let (mut gate, _) = gate(FakeProvider::with_session("alex"));
        assert!(!gate.is_authenticated());

        let restored = gate.restore().await.unwrap().cloned();

        assert_eq!(restored, Some(Identity::new("alex").unwrap()));
        assert!(gate.is_authenticated());
    }

    #[tokio::test]
    async fn sign_out_clears_cached_queries() {
        let (mut gate, cache) = gate(FakeProvider::default());
        let identity = gate.sign_in("alex").await.unwrap().clone();
        let key = QueryKey::entries(&identity);
        let ticket = cache.begin_fetch(&key);
        assert!(cache.complete_fetch(
            ticket,
            Ok(CachedValue::Entries(Arc::new(EntryList::default())))
        ));

        gate.sign_out().await.unwrap();

        assert!(!gate.is_authenticated());
        assert_eq!(cache.fresh(&key), None);
        assert_eq!(cache.snapshot(&key).value, None);
    }
}
