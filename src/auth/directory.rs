//! Credential directory: maps client identifiers to their expected access tokens.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ConfiguredClient;

/// Failure of the backing store behind a directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Backing store could not be reached. Only remote directories produce it.
    #[allow(dead_code)]
    #[error("Credential directory unavailable: {0}")]
    Unavailable(String),
}

/// Lookup of the access token expected for a client.
///
/// Implementations may suspend (remote stores) but hold no per-request state.
#[async_trait]
pub trait CredentialDirectory: Send + Sync {
    /// Return the expected token for `client_id`, or `None` if the client is unknown.
    async fn lookup(&self, client_id: &str) -> Result<Option<String>, DirectoryError>;
}

/// Client entry held by the static directory.
#[derive(Debug, Clone)]
pub struct ClientCredential {
    pub access_token: String,
    pub name: Option<String>,
}

/// Directory built once from configuration; immutable afterwards.
#[derive(Clone, Default)]
pub struct StaticDirectory {
    clients: Arc<HashMap<String, ClientCredential>>,
}

impl StaticDirectory {
    /// Create a directory from configured clients. Later duplicates replace earlier ones.
    pub fn new(configured: Vec<ConfiguredClient>) -> Self {
        let mut clients = HashMap::with_capacity(configured.len());

        for client in configured {
            let replaced = clients.insert(
                client.client_id.clone(),
                ClientCredential {
                    access_token: client.access_token,
                    name: client.name,
                },
            );
            if replaced.is_some() {
                tracing::warn!(client_id = %client.client_id, "Duplicate client_id in configuration, keeping last entry");
            }
        }

        Self {
            clients: Arc::new(clients),
        }
    }

    /// Configured client identifiers, sorted.
    pub fn client_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.clients.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn get(&self, client_id: &str) -> Option<&ClientCredential> {
        self.clients.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl CredentialDirectory for StaticDirectory {
    async fn lookup(&self, client_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self
            .clients
            .get(client_id)
            .map(|credential| credential.access_token.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, token: &str) -> ConfiguredClient {
        ConfiguredClient {
            client_id: id.to_string(),
            access_token: token.to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_static_lookup() {
        let directory = StaticDirectory::new(vec![client("abc", "tok-abc")]);

        let token = directory.lookup("abc").await.unwrap();
        assert_eq!(token.as_deref(), Some("tok-abc"));

        assert!(directory.lookup("zzz").await.unwrap().is_none());
        // Identifiers are case-sensitive
        assert!(directory.lookup("ABC").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_keeps_last() {
        let directory = StaticDirectory::new(vec![client("abc", "old"), client("abc", "new")]);

        assert_eq!(directory.len(), 1);
        assert_eq!(
            directory.lookup("abc").await.unwrap().as_deref(),
            Some("new")
        );
    }

    #[test]
    fn test_client_ids_sorted() {
        let directory = StaticDirectory::new(vec![client("b", "1"), client("a", "2")]);
        assert_eq!(directory.client_ids(), vec!["a", "b"]);
    }
}
