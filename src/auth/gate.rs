//! Access gate - decides whether a request may proceed.
//!
//! Two independent checks run in order:
//! - Master check: paths under a master prefix need `MASTER-TOKEN`
//! - Access check: paths under an access prefix need a known `client_id`
//!   and the matching `ACCESS-TOKEN`
//!
//! The master check short-circuits, so a path under both prefixes never
//! reaches the directory lookup with a bad master token.

use std::sync::Arc;

use axum::http::{HeaderMap, Uri};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::auth::{query_param, CredentialDirectory};
use crate::config::AuthConfig;
use crate::error::{GateError, GateResult};

pub const MASTER_TOKEN_HEADER: &str = "MASTER-TOKEN";
pub const ACCESS_TOKEN_HEADER: &str = "ACCESS-TOKEN";
pub const CLIENT_ID_PARAM: &str = "client_id";

/// Outcome of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Request proceeds to the next handler.
    Pass,
    /// Request is answered with a 401.
    Reject(GateError),
}

impl Decision {
    #[cfg(test)]
    pub fn is_pass(&self) -> bool {
        matches!(self, Decision::Pass)
    }
}

impl From<GateResult<()>> for Decision {
    fn from(result: GateResult<()>) -> Self {
        match result {
            Ok(()) => Decision::Pass,
            Err(e) => Decision::Reject(e),
        }
    }
}

/// Ordered set of protected path prefixes.
#[derive(Debug, Clone, Default)]
pub struct ProtectedPaths {
    prefixes: Vec<String>,
}

impl ProtectedPaths {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    /// True if `path` starts with any configured prefix.
    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

struct GateInner {
    master_token: String,
    master_paths: ProtectedPaths,
    access_paths: ProtectedPaths,
    directory: Arc<dyn CredentialDirectory>,
}

/// Stateless request gate. Cheap to clone; configuration is shared and read-only.
#[derive(Clone)]
pub struct AccessGate {
    inner: Arc<GateInner>,
}

impl AccessGate {
    /// Build a gate from the auth configuration and a credential directory.
    pub fn new(config: &AuthConfig, directory: Arc<dyn CredentialDirectory>) -> Self {
        Self {
            inner: Arc::new(GateInner {
                master_token: config.master_token.clone(),
                master_paths: ProtectedPaths::new(config.master_paths.clone()),
                access_paths: ProtectedPaths::new(config.access_token_paths.clone()),
                directory,
            }),
        }
    }

    pub fn requires_master(&self, path: &str) -> bool {
        self.inner.master_paths.matches(path)
    }

    pub fn requires_access(&self, path: &str) -> bool {
        self.inner.access_paths.matches(path)
    }

    /// Evaluate a request, given its URI and headers, against both checks.
    pub async fn evaluate(&self, uri: &Uri, headers: &HeaderMap) -> Decision {
        let path = uri.path();

        let result = match self.check_master(path, headers) {
            Ok(()) => {
                let client_id = query_param(uri, CLIENT_ID_PARAM);
                self.check_access(path, headers, client_id.as_deref()).await
            }
            Err(e) => Err(e),
        };

        result.into()
    }

    fn check_master(&self, path: &str, headers: &HeaderMap) -> GateResult<()> {
        if !self.requires_master(path) {
            return Ok(());
        }

        let presented = header_str(headers, MASTER_TOKEN_HEADER);
        match presented {
            Some(token) if tokens_match(token, &self.inner.master_token) => Ok(()),
            _ => {
                tracing::warn!(
                    path = %path,
                    token_fingerprint = ?presented.map(fingerprint),
                    "Rejected master token"
                );
                Err(GateError::MasterToken)
            }
        }
    }

    async fn check_access(
        &self,
        path: &str,
        headers: &HeaderMap,
        client_id: Option<&str>,
    ) -> GateResult<()> {
        if !self.requires_access(path) {
            return Ok(());
        }

        let Some(client_id) = client_id else {
            tracing::warn!(path = %path, "Missing client_id");
            return Err(GateError::UnknownClient);
        };

        let required = match self.inner.directory.lookup(client_id).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::warn!(path = %path, client_id = %client_id, "Unknown client_id");
                return Err(GateError::UnknownClient);
            }
            Err(e) => {
                tracing::error!(error = %e, client_id = %client_id, "Credential lookup failed");
                return Err(GateError::UnknownClient);
            }
        };

        let presented = header_str(headers, ACCESS_TOKEN_HEADER);
        match presented {
            Some(token) if tokens_match(token, &required) => Ok(()),
            _ => {
                tracing::warn!(
                    path = %path,
                    client_id = %client_id,
                    token_fingerprint = ?presented.map(fingerprint),
                    "Rejected access token"
                );
                Err(GateError::AccessToken)
            }
        }
    }
}

/// Header value as text; non-UTF-8 values count as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Exact comparison in constant time. Digests hide length differences.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.as_slice().ct_eq(b.as_slice()).into()
}

/// Short hex fingerprint of a token for log records.
fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..4])
}
