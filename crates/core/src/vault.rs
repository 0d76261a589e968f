use dsc_error::Result;
use dsc_spi::security::Vault;
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local vault used when no other vault is registered.
#[derive(Default)]
pub struct InMemoryVault {
    secrets: RwLock<HashMap<String, SecretString>>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Vault for InMemoryVault {
    fn resolve_secret(&self, key: &str) -> Option<SecretString> {
        self.secrets
            .read()
            .expect("vault lock poisoned")
            .get(key)
            .cloned()
    }

    fn store_secret(&self, key: &str, value: &str) -> Result<()> {
        self.secrets
            .write()
            .expect("vault lock poisoned")
            .insert(key.to_string(), SecretString::from(value.to_string()));
        Ok(())
    }

    fn delete_secret(&self, key: &str) -> Result<()> {
        self.secrets.write().expect("vault lock poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_store_resolve_delete() {
        let vault = InMemoryVault::new();
        assert!(vault.resolve_secret("api-key").is_none());

        vault.store_secret("api-key", "s3cr3t").unwrap();
        let secret = vault.resolve_secret("api-key").unwrap();
        assert_eq!(secret.expose_secret(), "s3cr3t");

        vault.delete_secret("api-key").unwrap();
        assert!(vault.resolve_secret("api-key").is_none());
    }
}
