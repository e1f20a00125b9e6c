use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::Version;
use argon2::password_hash::SaltString;
use laiska_core::*;
use subtle::ConstantTimeEq;

/// Where the Argon2 salt comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Salting {
    /// The process-wide pepper is the salt for every account.
    /// Digests are deterministic and stored as bare hex.
    #[default]
    Pepper,
    /// Each digest gets a random salt and the pepper becomes the Argon2 secret.
    /// Stored as a PHC string (`$argon2id$v=19$...`).
    Random,
}

impl std::str::FromStr for Salting {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pepper" => Ok(Self::Pepper),
            "random" => Ok(Self::Random),
            other => Err(format!("unknown password salting mode: {}", other)),
        }
    }
}

/// Pepper-format digest that no password produces.
/// Logins for unknown accounts verify against it so they cost a full hash.
pub const DECOY_DIGEST: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Argon2id password hasher with fixed cost parameters.
pub struct Hasher {
    pepper: Vec<u8>,
    salting: Salting,
    params: Params,
}

impl Hasher {
    pub fn new(pepper: &[u8], salting: Salting) -> Result<Self, argon2::Error> {
        if pepper.len() < MIN_PEPPER_LEN {
            return Err(argon2::Error::SaltTooShort);
        }
        Ok(Self {
            pepper: pepper.to_vec(),
            salting,
            params: Params::new(
                ARGON2_MEMORY_COST,
                ARGON2_TIME_COST,
                ARGON2_PARALLELISM,
                Some(ARGON2_OUTPUT_LEN),
            )?,
        })
    }

    /// Renders the storable digest for `password`.
    pub fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        match self.salting {
            Salting::Pepper => Ok(self.peppered(password)?),
            Salting::Random => self
                .secreted()?
                .hash_password(password.as_bytes(), &salt()?)
                .map(|h| h.to_string()),
        }
    }

    /// Verifies against either stored format. PHC strings go through
    /// argon2's verifier; bare hex is recomputed and compared in constant time.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match stored.starts_with('$') {
            true => PasswordHash::new(stored)
                .ok()
                .zip(self.secreted().ok())
                .map(|(ref hash, argon)| argon.verify_password(password.as_bytes(), hash).is_ok())
                .unwrap_or(false),
            false => self
                .peppered(password)
                .map(|candidate| candidate.as_bytes().ct_eq(stored.as_bytes()).into())
                .unwrap_or(false),
        }
    }

    fn peppered(&self, password: &str) -> Result<String, argon2::Error> {
        let ref mut out = [0u8; ARGON2_OUTPUT_LEN];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
            .hash_password_into(password.as_bytes(), &self.pepper, out)?;
        Ok(hex::encode(out))
    }

    fn secreted(&self) -> Result<Argon2<'_>, argon2::Error> {
        Argon2::new_with_secret(
            &self.pepper,
            Algorithm::Argon2id,
            Version::V0x13,
            self.params.clone(),
        )
    }
}

fn salt() -> Result<SaltString, argon2::password_hash::Error> {
    use rand::Rng;
    let ref mut bytes = [0u8; RANDOM_SALT_LEN];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEPPER: &[u8] = b"pepper-for-tests";

    #[test]
    fn pepper_digest_is_deterministic_hex() {
        let hasher = Hasher::new(PEPPER, Salting::Pepper).unwrap();
        let a = hasher.hash("securepassword").unwrap();
        let b = hasher.hash("securepassword").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2 * ARGON2_OUTPUT_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn different_passwords_differ() {
        let hasher = Hasher::new(PEPPER, Salting::Pepper).unwrap();
        assert_ne!(
            hasher.hash("securepassword").unwrap(),
            hasher.hash("securepassword!").unwrap()
        );
    }

    #[test]
    fn different_peppers_differ() {
        let a = Hasher::new(PEPPER, Salting::Pepper).unwrap();
        let b = Hasher::new(b"another-pepper", Salting::Pepper).unwrap();
        assert_ne!(a.hash("pw").unwrap(), b.hash("pw").unwrap());
    }

    #[test]
    fn verify_accepts_only_the_password() {
        let hasher = Hasher::new(PEPPER, Salting::Pepper).unwrap();
        let stored = hasher.hash("securepassword").unwrap();
        assert!(hasher.verify("securepassword", &stored));
        assert!(!hasher.verify("invalid_password", &stored));
        assert!(!hasher.verify("securepassword", "deadbeef"));
    }

    #[test]
    fn random_salting_is_not_deterministic_but_verifies() {
        let hasher = Hasher::new(PEPPER, Salting::Random).unwrap();
        let a = hasher.hash("securepassword").unwrap();
        let b = hasher.hash("securepassword").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$v=19$m=65536,t=1,p=4$"));
        assert!(hasher.verify("securepassword", &a));
        assert!(hasher.verify("securepassword", &b));
        assert!(!hasher.verify("wrong", &a));
    }

    #[test]
    fn either_mode_verifies_either_format() {
        let pepper = Hasher::new(PEPPER, Salting::Pepper).unwrap();
        let random = Hasher::new(PEPPER, Salting::Random).unwrap();
        let old = pepper.hash("pw").unwrap();
        let new = random.hash("pw").unwrap();
        assert!(random.verify("pw", &old));
        assert!(pepper.verify("pw", &new));
    }

    #[test]
    fn malformed_digests_fail_closed() {
        let hasher = Hasher::new(PEPPER, Salting::Random).unwrap();
        assert!(!hasher.verify("pw", "zz$abcdef"));
        assert!(!hasher.verify("pw", "$argon2id$garbage"));
        assert!(!hasher.verify("pw", ""));
    }

    #[test]
    fn random_digest_needs_the_pepper() {
        let stored = Hasher::new(PEPPER, Salting::Random).unwrap().hash("pw").unwrap();
        let other = Hasher::new(b"another-pepper", Salting::Random).unwrap();
        assert!(!other.verify("pw", &stored));
    }

    #[test]
    fn decoy_never_verifies() {
        let hasher = Hasher::new(PEPPER, Salting::Pepper).unwrap();
        assert_eq!(DECOY_DIGEST.len(), 2 * ARGON2_OUTPUT_LEN);
        for password in ["", "securepassword", "0"] {
            assert!(!hasher.verify(password, DECOY_DIGEST));
        }
    }

    #[test]
    fn short_pepper_is_rejected() {
        assert!(Hasher::new(b"short", Salting::Pepper).is_err());
    }

    #[test]
    fn salting_parses() {
        assert_eq!("pepper".parse::<Salting>(), Ok(Salting::Pepper));
        assert_eq!(" Random ".parse::<Salting>(), Ok(Salting::Random));
        assert!("bcrypt".parse::<Salting>().is_err());
    }
}
