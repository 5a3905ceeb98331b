use reqwest::{Client, header::HeaderMap};
use rustls_platform_verifier::BuilderVerifierExt;

use crate::error::ApiError;

/// Build the HTTP client used for every Jira call.
///
/// Jira is usually deployed with certificates issued by a corporate CA that is
/// installed system-wide, so server certificates are validated against the
/// OS trust store rather than bundled roots. No request timeout is set.
pub fn create_tls_client(headers: HeaderMap) -> Result<Client, ApiError> {
    // needed to use OS-provided CA certificates with Rustls
    let arc_crypto_provider = std::sync::Arc::new(rustls::crypto::ring::default_provider());
    let tls_config = rustls::ClientConfig::builder_with_provider(arc_crypto_provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ApiError::Client(format!("Failed to build client TLS config: {}", e)))?
        .with_platform_verifier()
        .with_no_client_auth();

    Client::builder()
        .use_preconfigured_tls(tls_config)
        .default_headers(headers)
        .build()
        .map_err(|e| ApiError::Client(format!("Failed to create HTTP client: {}", e)))
}
