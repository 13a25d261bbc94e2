//! Identity persistence in the OS keychain.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use echoe_core::auth::{Identity, IdentityProvider, ALREADY_AUTHENTICATED};
use echoe_core::{Error, Result};

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "echoe-cli";
const DEFAULT_ACCOUNT: &str = "identity";

/// Identity provider that remembers the signed-in principal in the keychain.
#[derive(Debug, Clone)]
pub struct KeyringIdentityProvider {
    username: String,
}

impl Default for KeyringIdentityProvider {
    fn default() -> Self {
        Self::new(DEFAULT_ACCOUNT)
    }
}

impl KeyringIdentityProvider {
    pub fn new(account: &str) -> Self {
        Self {
            username: format!("principal:{account}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username).map_err(secure_storage_error)
    }

    #[cfg(not(test))]
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(raw) => Ok(Some(raw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(secure_storage_error(error)),
        }
    }

    #[cfg(test)]
    fn load(&self) -> Result<Option<String>> {
        let guard = Self::test_store().lock().map_err(secure_storage_error)?;
        Ok(guard.get(&self.username).cloned())
    }

    #[cfg(not(test))]
    fn store(&self, principal: &str) -> Result<()> {
        self.entry()?
            .set_password(principal)
            .map_err(secure_storage_error)
    }

    #[cfg(test)]
    fn store(&self, principal: &str) -> Result<()> {
        let mut guard = Self::test_store().lock().map_err(secure_storage_error)?;
        guard.insert(self.username.clone(), principal.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn remove(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(secure_storage_error(error)),
        }
    }

    #[cfg(test)]
    fn remove(&self) -> Result<()> {
        let mut guard = Self::test_store().lock().map_err(secure_storage_error)?;
        guard.remove(&self.username);
        Ok(())
    }
}

impl IdentityProvider for KeyringIdentityProvider {
    async fn current(&self) -> Result<Option<Identity>> {
        self.load()?.map(Identity::new).transpose()
    }

    async fn login(&self, principal: &str) -> Result<Identity> {
        let identity = Identity::new(principal)?;
        if self.load()?.is_some() {
            return Err(Error::auth(ALREADY_AUTHENTICATED));
        }
        self.store(identity.principal())?;
        Ok(identity)
    }

    async fn clear(&self) -> Result<()> {
        self.remove()
    }
}

fn secure_storage_error(error: impl std::fmt::Display) -> Error {
    Error::auth(format!("Secure storage error: {error}"))
}
