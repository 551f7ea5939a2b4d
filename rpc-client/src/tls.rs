//! Mutual-TLS setup for the management API
//!
//! The node service and its clients both hold certificates issued by a private
//! certificate authority. The client trusts that CA only and presents the
//! daemon certificate as its identity.

use reqwest::{Certificate, Client, Identity};
use std::path::Path;
use tracing::debug;

use crate::config::TlsPaths;
use crate::errors::TlsError;

const CERTIFICATE_MARKER: &str = "-----BEGIN CERTIFICATE-----";
const PRIVATE_KEY_MARKER: &str = "PRIVATE KEY-----";

/// PEM material read from disk and checked for the expected blocks
#[derive(Debug, Clone)]
pub struct TlsMaterial {
    pub ca_crt: Vec<u8>,
    pub crt: Vec<u8>,
    pub key: Vec<u8>,
}

impl TlsMaterial {
    /// Read all four files. The CA key is only checked, never sent anywhere.
    pub fn load(paths: &TlsPaths) -> Result<Self, TlsError> {
        let ca_crt = read_pem(&paths.ca_crt, CERTIFICATE_MARKER)?;
        read_pem(&paths.ca_key, PRIVATE_KEY_MARKER)?;
        let crt = read_pem(&paths.crt, CERTIFICATE_MARKER)?;
        let key = read_pem(&paths.key, PRIVATE_KEY_MARKER)?;

        debug!(
            "Loaded TLS material: ca {}, cert {}",
            paths.ca_crt.display(),
            paths.crt.display()
        );

        Ok(Self { ca_crt, crt, key })
    }

    /// Build the pooled HTTPS client. Hostname checks are off because the
    /// private CA does not issue certificates for the target hostname.
    pub fn build_client(&self) -> Result<Client, TlsError> {
        let ca = Certificate::from_pem(&self.ca_crt).map_err(|e| TlsError::ClientBuild {
            reason: format!("CA certificate: {}", e),
        })?;

        let mut identity_pem = self.crt.clone();
        identity_pem.push(b'\n');
        identity_pem.extend_from_slice(&self.key);
        let identity = Identity::from_pem(&identity_pem).map_err(|e| TlsError::ClientBuild {
            reason: format!("client identity: {}", e),
        })?;

        Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .add_root_certificate(ca)
            .identity(identity)
            .danger_accept_invalid_hostnames(true)
            .build()
            .map_err(|e| TlsError::ClientBuild {
                reason: e.to_string(),
            })
    }
}

fn read_pem(path: &Path, marker: &str) -> Result<Vec<u8>, TlsError> {
    let bytes = std::fs::read(path).map_err(|e| TlsError::MissingMaterial {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let text = String::from_utf8_lossy(&bytes);
    if !text.contains(marker) {
        return Err(TlsError::InvalidMaterial {
            path: path.display().to_string(),
            reason: format!("no '{}' block", marker.trim_matches('-')),
        });
    }

    Ok(bytes)
}
