use dsc_error::Result;
use secrecy::SecretString;

/// Secret storage. Values never leave the vault unwrapped.
pub trait Vault: Send + Sync {
    fn resolve_secret(&self, key: &str) -> Option<SecretString>;

    fn store_secret(&self, key: &str, value: &str) -> Result<()>;

    fn delete_secret(&self, key: &str) -> Result<()>;
}
