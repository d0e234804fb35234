//! Stored credential digests.
//!
//! Passwords are never kept in plain text. A [`PasswordDigest`] is an
//! Argon2id hash in PHC string form (`$argon2id$v=19$m=…,t=…,p=1$<salt>$<hash>`)
//! so the parameters travel with the record. Verification rehashes with the
//! stored parameters; `password-hash` compares the outputs in constant time.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

const SALT_LEN: usize = 16;
const DECOY_PASSWORD: &str = "decoy credential for unknown accounts";

/// Failures while producing or decoding a stored digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordDigestError {
    #[error("digest is not a PHC string: {0}")]
    Malformed(String),
    #[error("unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl From<PasswordDigestError> for crate::domain::Error {
    fn from(err: PasswordDigestError) -> Self {
        crate::domain::Error::internal(err.to_string())
    }
}

/// Argon2id work factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory per hash, in KiB.
    pub memory_kib: u32,
    /// Passes over that memory.
    pub iterations: u32,
}

impl HashCost {
    /// Cost applied to every password hashed by the service.
    pub const DEFAULT: Self = Self {
        memory_kib: Params::DEFAULT_M_COST,
        iterations: Params::DEFAULT_T_COST,
    };

    /// Cheapest cost Argon2 accepts. Only for seeded fixtures.
    pub const MINIMAL: Self = Self {
        memory_kib: Params::MIN_M_COST,
        iterations: Params::MIN_T_COST,
    };

    fn params(self) -> Result<Params, PasswordDigestError> {
        Params::new(self.memory_kib, self.iterations, 1, None)
            .map_err(|err| PasswordDigestError::Hashing(err.to_string()))
    }
}

/// Argon2id password digest.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    phc: String,
}

impl PasswordDigest {
    /// Hash `password` with a fresh random salt and [`HashCost::DEFAULT`].
    ///
    /// # Examples
    /// ```
    /// use ordens::domain::PasswordDigest;
    ///
    /// let digest = PasswordDigest::hash("s3cret").expect("digest");
    /// assert!(digest.verify("s3cret"));
    /// assert!(!digest.verify("S3cret"));
    /// ```
    pub fn hash(password: &str) -> Result<Self, PasswordDigestError> {
        Self::hash_with(password, HashCost::DEFAULT)
    }

    /// Hash `password` with a fresh random salt and an explicit cost.
    pub fn hash_with(password: &str, cost: HashCost) -> Result<Self, PasswordDigestError> {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = SaltString::encode_b64(&salt)
            .map_err(|err| PasswordDigestError::Hashing(err.to_string()))?;

        let phc = hasher(cost.params()?)
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordDigestError::Hashing(err.to_string()))?
            .to_string();
        Ok(Self { phc })
    }

    /// Digest checked when a login names no known account, so a miss costs
    /// as much as a wrong password.
    pub fn decoy() -> Option<&'static Self> {
        static DECOY: OnceLock<Option<PasswordDigest>> = OnceLock::new();
        DECOY
            .get_or_init(|| Self::hash(DECOY_PASSWORD).ok())
            .as_ref()
    }

    /// Whether `password` produces this digest.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        PasswordHash::new(&self.phc).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
    }

    /// Work factors recorded in the digest.
    #[must_use]
    pub fn cost(&self) -> Option<HashCost> {
        let hash = PasswordHash::new(&self.phc).ok()?;
        let params = Params::try_from(&hash).ok()?;
        Some(HashCost {
            memory_kib: params.m_cost(),
            iterations: params.t_cost(),
        })
    }

    /// Encoded form suitable for storage.
    #[must_use]
    pub fn encode(&self) -> &str {
        &self.phc
    }
}

fn hasher(params: Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

impl FromStr for PasswordDigest {
    type Err = PasswordDigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hash =
            PasswordHash::new(s).map_err(|err| PasswordDigestError::Malformed(err.to_string()))?;
        if hash.algorithm != Algorithm::Argon2id.ident() {
            return Err(PasswordDigestError::UnsupportedAlgorithm(
                hash.algorithm.to_string(),
            ));
        }
        Params::try_from(&hash).map_err(|err| PasswordDigestError::Malformed(err.to_string()))?;
        Ok(Self { phc: s.to_owned() })
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("cost", &self.cost())
            .finish_non_exhaustive()
    }
}
