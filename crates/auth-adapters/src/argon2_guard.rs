use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use async_trait::async_trait;
use domains::{CredentialGuard, DomainError, PasswordDigest, Result};

/// Memory cost in KiB.
const M_COST: u32 = 19_456;
/// Iterations.
const T_COST: u32 = 2;
/// Lanes.
const P_COST: u32 = 1;

/// Hashes and verifies delete passwords with Argon2id.
///
/// Both directions are CPU-heavy, so they run on tokio's blocking pool
/// instead of the request workers.
#[derive(Clone)]
pub struct Argon2Guard {
    hasher: Argon2<'static>,
}

impl Argon2Guard {
    /// Guard with the fixed production work factor.
    pub fn new() -> Self {
        let params = Params::new(M_COST, T_COST, P_COST, None)
            .unwrap_or_else(|_| Params::default());
        Self::with_params(params)
    }

    /// Guard with custom cost parameters, e.g. cheap ones for tests.
    pub fn with_params(params: Params) -> Self {
        Self {
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2Guard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialGuard for Argon2Guard {
    async fn hash(&self, raw: &str) -> Result<PasswordDigest> {
        let hasher = self.hasher.clone();
        let raw = raw.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(raw.as_bytes(), &salt)
                .map(|hash| PasswordDigest::new(hash.to_string()))
        })
        .await
        .map_err(|e| DomainError::Internal(format!("hashing task failed: {e}")))?
        .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))
    }

    async fn verify(&self, raw: &str, digest: &PasswordDigest) -> bool {
        let raw = raw.to_owned();
        let stored = digest.as_str().to_owned();

        let checked = tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&stored) else {
                tracing::warn!("stored delete password is not a valid PHC string");
                return false;
            };
            // Cost parameters come from the stored hash itself.
            Argon2::default()
                .verify_password(raw.as_bytes(), &parsed)
                .is_ok()
        })
        .await;

        match checked {
            Ok(matched) => matched,
            Err(e) => {
                tracing::error!(error = %e, "verification task failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Argon2Guard {
        Argon2Guard::with_params(Params::new(1024, 1, 1, None).unwrap())
    }

    #[tokio::test]
    async fn digest_is_salted_phc() {
        let guard = cheap();
        let a = guard.hash("pw").await.unwrap();
        let b = guard.hash("pw").await.unwrap();
        assert!(a.as_str().starts_with("$argon2id$"));
        assert_ne!(a.as_str(), b.as_str());
    }

    #[tokio::test]
    async fn verify_matches_only_the_original() {
        let guard = cheap();
        let digest = guard.hash("correct horse").await.unwrap();
        assert!(guard.verify("correct horse", &digest).await);
        assert!(!guard.verify("correct hors", &digest).await);
        assert!(!guard.verify("", &digest).await);
    }

    #[tokio::test]
    async fn garbage_digest_is_a_mismatch() {
        let guard = cheap();
        assert!(!guard.verify("pw", &PasswordDigest::new("pw")).await);
    }

    #[tokio::test]
    async fn production_params_are_fixed() {
        let digest = Argon2Guard::new().hash("pw").await.unwrap();
        assert!(digest.as_str().contains("m=19456,t=2,p=1"));
    }
}
