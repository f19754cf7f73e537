//! Identity token verification.
//!
//! Clients sign in with Firebase Authentication and send the resulting ID
//! token as a bearer token. Tokens are RS256 JWTs signed with Google's
//! rotating keys.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, jwk::JwkSet};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use voyage_common::{AppError, AppResult, config::AuthConfig};

/// Identity asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// Provider user id (`sub`).
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Verifies bearer tokens.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a token and return the identity it asserts.
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity>;
}

/// Shared verifier handle.
pub type TokenVerifierService = Arc<dyn TokenVerifier>;

#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl From<FirebaseClaims> for VerifiedIdentity {
    fn from(claims: FirebaseClaims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified,
            name: claims.name,
            picture: claims.picture,
        }
    }
}

/// Minimum time between two fetches of the signing keys.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

fn find_key(keys: &JwkSet, kid: &str) -> AppResult<DecodingKey> {
    keys.find(kid)
        .ok_or(AppError::Unauthorized)
        .and_then(|jwk| DecodingKey::from_jwk(jwk).map_err(|_| AppError::Unauthorized))
}

/// Verifies Firebase ID tokens against Google's published keys.
#[derive(Clone)]
pub struct FirebaseTokenVerifier {
    project_id: String,
    jwks_url: String,
    cache_ttl: Duration,
    http_client: reqwest::Client,
    keys: Arc<RwLock<Option<CachedKeys>>>,
}

impl FirebaseTokenVerifier {
    /// Create a verifier for the configured project.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            project_id: config.firebase_project_id.clone(),
            jwks_url: config.jwks_url.clone(),
            cache_ttl: Duration::from_secs(config.jwks_cache_secs),
            http_client: reqwest::Client::new(),
            keys: Arc::new(RwLock::new(None)),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("https://securetoken.google.com/{}", self.project_id)]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);
        validation
    }

    async fn decoding_key(&self, kid: &str) -> AppResult<DecodingKey> {
        {
            let cache = self.keys.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.fetched_at.elapsed() < self.cache_ttl
                && cached.keys.find(kid).is_some()
            {
                return find_key(&cached.keys, kid);
            }
        }

        // Unknown kid or stale cache: keys may have rotated. Fetches are
        // serialized by the write lock and spaced by MIN_REFETCH_INTERVAL.
        let mut cache = self.keys.write().await;
        if let Some(cached) = cache.as_ref()
            && cached.fetched_at.elapsed() < MIN_REFETCH_INTERVAL.min(self.cache_ttl)
        {
            return find_key(&cached.keys, kid);
        }

        let keys = self.fetch_keys().await?;
        let key = find_key(&keys, kid);
        *cache = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });

        key
    }

    async fn fetch_keys(&self) -> AppResult<JwkSet> {
        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("JWKS request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalService(format!(
                "JWKS endpoint returned {status}"
            )));
        }

        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse JWKS: {e}")))?;

        tracing::debug!(count = keys.keys.len(), "Fetched identity signing keys");
        Ok(keys)
    }
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> AppResult<VerifiedIdentity> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "Malformed bearer token");
            AppError::Unauthorized
        })?;

        if header.alg != Algorithm::RS256 {
            return Err(AppError::Unauthorized);
        }
        let kid = header.kid.ok_or(AppError::Unauthorized)?;

        let key = self.decoding_key(&kid).await?;
        let data = decode::<FirebaseClaims>(token, &key, &self.validation()).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            AppError::Unauthorized
        })?;

        if data.claims.sub.is_empty() {
            return Err(AppError::Unauthorized);
        }

        Ok(data.claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    fn verifier() -> FirebaseTokenVerifier {
        FirebaseTokenVerifier::new(&AuthConfig {
            firebase_project_id: "voyage-dev".to_string(),
            // Unroutable; tests must not reach the network.
            jwks_url: "http://127.0.0.1:9/jwks".to_string(),
            jwks_cache_secs: 3600,
        })
    }

    #[tokio::test]
    async fn test_garbage_token_is_unauthorized() {
        let result = verifier().verify("not-a-jwt").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_hmac_token_is_unauthorized() {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some("k1".to_string());
        let token = encode(
            &header,
            &json!({ "sub": "u1", "aud": "voyage-dev", "exp": 4_102_444_800_u64 }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let result = verifier().verify(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    async fn seed(verifier: &FirebaseTokenVerifier, age: Duration) {
        let fetched_at = Instant::now().checked_sub(age).unwrap();
        *verifier.keys.write().await = Some(CachedKeys {
            keys: JwkSet { keys: Vec::new() },
            fetched_at,
        });
    }

    #[tokio::test]
    async fn test_unknown_kid_does_not_refetch_recent_keys() {
        let verifier = verifier();
        seed(&verifier, Duration::from_secs(5)).await;

        // A fetch would fail against the unroutable URL.
        for _ in 0..3 {
            let result = verifier.decoding_key("rotated-away").await;
            assert!(matches!(result, Err(AppError::Unauthorized)));
        }
    }

    #[tokio::test]
    async fn test_unknown_kid_refetches_after_interval() {
        let verifier = verifier();
        seed(&verifier, MIN_REFETCH_INTERVAL + Duration::from_secs(1)).await;

        let result = verifier.decoding_key("rotated-away").await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[test]
    fn test_claims_into_identity() {
        let claims: FirebaseClaims = serde_json::from_value(json!({
            "sub": "abc",
            "email": "ana@example.com",
            "email_verified": true,
            "name": "Ana"
        }))
        .unwrap();

        let identity: VerifiedIdentity = claims.into();
        assert_eq!(identity.uid, "abc");
        assert!(identity.email_verified);
        assert_eq!(identity.picture, None);
    }
}
