use laiska_auth::ApiError;
use laiska_core::*;
use laiska_records::Sensor;
use laiska_records::Sensors;
use laiska_records::User;
use laiska_records::Users;
use subtle::ConstantTimeEq;

/// Who the submitting device says the reading belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    Email(String),
    Id(ID<User>),
}

/// A sensor that proved its secret, and the user its reading is attributed to.
#[derive(Debug, Clone)]
pub struct Verified {
    sensor: Sensor,
    user: Option<ID<User>>,
}

impl Verified {
    pub fn sensor(&self) -> &Sensor {
        &self.sensor
    }
    pub fn user(&self) -> Option<ID<User>> {
        self.user
    }
}

/// Checks a device's shared secret and its claimed owner.
///
/// Owned sensors require the claim to resolve to the owner. Unowned sensors
/// accept any claim and attribute the reading to it if it resolves.
pub async fn authenticate<S>(
    store: &S,
    id: ID<Sensor>,
    secret: &str,
    claim: Option<Claim>,
) -> Result<Verified, ApiError>
where
    S: Users + Sensors + ?Sized,
{
    let sensor = store
        .sensor(id)
        .await?
        .ok_or_else(|| ApiError::Validation("sensor not found".to_string()))?;
    if !bool::from(sensor.secret().as_bytes().ct_eq(secret.as_bytes())) {
        log::debug!("wrong secret for sensor {}", id);
        return Err(ApiError::Unauthorized("unauthorized"));
    }
    let claimed = match claim {
        None => None,
        Some(claim) => resolve(store, claim).await?,
    };
    match sensor.owner() {
        None => Ok(Verified {
            sensor,
            user: claimed,
        }),
        Some(owner) if claimed == Some(owner) => Ok(Verified {
            sensor,
            user: claimed,
        }),
        Some(_) => {
            log::debug!("ownership mismatch for sensor {}", id);
            Err(ApiError::Unauthorized("unauthorized"))
        }
    }
}

async fn resolve<S>(store: &S, claim: Claim) -> Result<Option<ID<User>>, ApiError>
where
    S: Users + ?Sized,
{
    let user = match claim {
        Claim::Email(ref email) => store.user_by_email(email).await?,
        Claim::Id(id) => store.user_by_id(id).await?,
    };
    Ok(user.map(|u| u.id()))
}
