use super::*;
use jsonwebtoken::Algorithm;
use laiska_core::ID;
use laiska_records::User;

/// HMAC-signed session tokens under a single static key.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = jsonwebtoken::Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            validation,
        }
    }
    /// Signs a fresh token for `user`, valid for one hour.
    pub fn issue(&self, user: ID<User>) -> Result<String, jsonwebtoken::errors::Error> {
        self.encode(&Claims::new(user))
    }
    /// Accepts only HMAC-family signatures under the configured key
    /// whose `exp` has not passed.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
    }
    fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::new(Algorithm::HS256), claims, &self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> Crypto {
        Crypto::new(b"jwt-secret-for-tests")
    }

    #[test]
    fn issued_tokens_verify() {
        let user = ID::<User>::default();
        let token = crypto().issue(user).unwrap();
        let claims = crypto().verify(&token).unwrap();
        assert_eq!(claims.user().ok(), Some(user));
    }

    #[test]
    fn foreign_key_is_rejected() {
        let token = Crypto::new(b"some-other-secret").issue(ID::default()).unwrap();
        assert!(crypto().verify(&token).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = crypto().issue(ID::default()).unwrap();
        let at = token.rfind('.').unwrap() + 5;
        let flip = if &token[at..at + 1] == "A" { "B" } else { "A" };
        let forged = format!("{}{}{}", &token[..at], flip, &token[at + 1..]);
        assert!(crypto().verify(&forged).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(crypto().verify("invalid").is_err());
        assert!(crypto().verify("").is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let mut claims = Claims::new(ID::default());
        claims.iat -= 7200;
        claims.exp = laiska_core::now() - 1;
        let token = crypto().encode(&claims).unwrap();
        assert!(crypto().verify(&token).is_err());
    }

    #[test]
    fn other_hmac_widths_are_accepted() {
        let key = jsonwebtoken::EncodingKey::from_secret(b"jwt-secret-for-tests");
        let header = jsonwebtoken::Header::new(Algorithm::HS512);
        let token = jsonwebtoken::encode(&header, &Claims::new(ID::default()), &key).unwrap();
        assert!(crypto().verify(&token).is_ok());
    }

    #[test]
    fn missing_expiry_is_rejected() {
        let key = jsonwebtoken::EncodingKey::from_secret(b"jwt-secret-for-tests");
        let header = jsonwebtoken::Header::new(Algorithm::HS256);
        let body = serde_json::json!({
            "userUUID": ID::<User>::default(),
            "jti": uuid::Uuid::new_v4(),
            "iat": 0,
        });
        let token = jsonwebtoken::encode(&header, &body, &key).unwrap();
        assert!(crypto().verify(&token).is_err());
    }

    /// Swaps the header segment of a validly signed token.
    fn reheader(token: &str, header: &str) -> String {
        let (_, rest) = token.split_once('.').unwrap();
        format!("{}.{}", header, rest)
    }

    // {"alg":"none","typ":"JWT"}
    const NONE: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
    // {"alg":"RS256","typ":"JWT"}
    const RS256: &str = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9";

    #[test]
    fn unsigned_tokens_are_rejected() {
        let token = crypto().issue(ID::default()).unwrap();
        let forged = reheader(&token, NONE);
        let unsigned = format!("{}.", &forged[..forged.rfind('.').unwrap()]);
        assert!(crypto().verify(&forged).is_err());
        assert!(crypto().verify(&unsigned).is_err());
    }

    #[test]
    fn asymmetric_algorithms_are_rejected() {
        let token = crypto().issue(ID::default()).unwrap();
        assert!(crypto().verify(&reheader(&token, RS256)).is_err());
    }
}
