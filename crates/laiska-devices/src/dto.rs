use super::*;
use laiska_auth::ApiError;
use laiska_core::ID;
use laiska_records::Sensor;
use laiska_records::User;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterSensorRequest {
    #[serde(rename = "SensorUUID")]
    pub sensor: String,
    #[serde(rename = "SensorSecret")]
    pub secret: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl RegisterSensorRequest {
    pub fn validate(&self) -> Result<ID<Sensor>, ApiError> {
        if self.secret.is_empty() {
            return Err(ApiError::Validation("SensorSecret is required".to_string()));
        }
        if let Some(email) = self.owner() {
            laiska_auth::email(email)?;
        }
        sensor(&self.sensor)
    }
    /// The owner's address, with an empty string meaning none.
    pub fn owner(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

#[derive(Deserialize)]
pub struct SensorDataRequest {
    #[serde(rename = "sensorUUID")]
    pub sensor: String,
    #[serde(rename = "sensorType")]
    pub kind: String,
    #[serde(rename = "sensorName")]
    pub name: String,
    #[serde(rename = "unixTime")]
    pub time: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "userUUID")]
    pub user: Option<String>,
    pub value: f32,
}

impl SensorDataRequest {
    pub fn validate(&self) -> Result<ID<Sensor>, ApiError> {
        if self.kind.is_empty() {
            return Err(ApiError::Validation("sensorType is required".to_string()));
        }
        if self.name.is_empty() {
            return Err(ApiError::Validation("sensorName is required".to_string()));
        }
        if self.time <= 0 {
            return Err(ApiError::Validation("unixTime must be positive".to_string()));
        }
        if !self.value.is_finite() {
            return Err(ApiError::Validation("value must be a finite number".to_string()));
        }
        sensor(&self.sensor)
    }
    /// The asserted owner. An explicit user id wins over an email.
    pub fn claim(&self) -> Result<Option<Claim>, ApiError> {
        match (self.user.as_deref(), self.email.as_deref()) {
            (Some(id), _) if !id.is_empty() => id
                .parse::<ID<User>>()
                .map(Claim::Id)
                .map(Some)
                .map_err(|_| ApiError::Validation("could not parse user UUID".to_string())),
            (_, Some(email)) if !email.is_empty() => Ok(Some(Claim::Email(email.to_string()))),
            _ => Ok(None),
        }
    }
}

fn sensor(raw: &str) -> Result<ID<Sensor>, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::Validation("could not parse sensor UUID".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(body: serde_json::Value) -> SensorDataRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn registration_uses_capitalized_keys() {
        let req: RegisterSensorRequest = serde_json::from_value(serde_json::json!({
            "SensorUUID": "2ca3c5d2-059b-406c-ac9d-2100b4396390",
            "SensorSecret": "hunter2",
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.owner(), None);
    }

    #[test]
    fn registration_rejects_bad_uuid() {
        let req = RegisterSensorRequest {
            sensor: "nope".to_string(),
            secret: "hunter2".to_string(),
            email: Some(String::new()),
        };
        assert!(matches!(
            req.validate(),
            Err(ApiError::Validation(ref s)) if s == "could not parse sensor UUID"
        ));
    }

    #[test]
    fn reading_requires_positive_time() {
        let req = reading(serde_json::json!({
            "sensorUUID": "2ca3c5d2-059b-406c-ac9d-2100b4396390",
            "sensorType": "MH-Moisture",
            "sensorName": "fern",
            "unixTime": 0,
            "value": 1.5,
        }));
        assert!(req.validate().is_err());
    }

    #[test]
    fn claim_prefers_user_id() {
        let id = ID::<User>::default();
        let req = reading(serde_json::json!({
            "sensorUUID": "2ca3c5d2-059b-406c-ac9d-2100b4396390",
            "sensorType": "MH-Moisture",
            "sensorName": "fern",
            "unixTime": 1_700_000_000i64,
            "email": "alice@example.com",
            "userUUID": id.to_string(),
            "value": 1.5,
        }));
        assert_eq!(req.claim().unwrap(), Some(Claim::Id(id)));
    }

    #[test]
    fn empty_email_is_no_claim() {
        let req = reading(serde_json::json!({
            "sensorUUID": "2ca3c5d2-059b-406c-ac9d-2100b4396390",
            "sensorType": "MH-Moisture",
            "sensorName": "fern",
            "unixTime": 1_700_000_000i64,
            "email": "",
            "value": 1.5,
        }));
        assert_eq!(req.claim().unwrap(), None);
    }
}
