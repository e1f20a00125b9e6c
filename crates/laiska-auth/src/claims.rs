use laiska_core::*;
use laiska_records::User;

/// Token payload as it travels on the wire.
///
/// `usr` stays a string here; [`Claims::user`] is where it becomes typed,
/// so a signed token with a malformed subject is told apart from a forged one.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    #[serde(rename = "userUUID")]
    pub usr: String,
    pub jti: uuid::Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: ID<User>) -> Self {
        let now = laiska_core::now();
        Self {
            usr: user.to_string(),
            jti: uuid::Uuid::new_v4(),
            iat: now,
            exp: now + TOKEN_DURATION.as_secs() as i64,
        }
    }
    pub fn user(&self) -> Result<ID<User>, uuid::Error> {
        self.usr.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_one_hour_out() {
        let claims = Claims::new(ID::default());
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.exp > laiska_core::now());
    }

    #[test]
    fn user_round_trips() {
        let id = ID::<User>::default();
        assert_eq!(Claims::new(id).user().ok(), Some(id));
    }

    #[test]
    fn malformed_user_fails() {
        let mut claims = Claims::new(ID::default());
        claims.usr = "not-a-uuid".to_string();
        assert!(claims.user().is_err());
    }

    #[test]
    fn every_issuance_is_unique() {
        let id = ID::<User>::default();
        assert_ne!(Claims::new(id).jti, Claims::new(id).jti);
    }

    #[test]
    fn wire_name_is_user_uuid() {
        let json = serde_json::to_value(Claims::new(ID::default())).unwrap();
        assert!(json.get("userUUID").is_some());
        assert!(json.get("exp").is_some());
    }
}
