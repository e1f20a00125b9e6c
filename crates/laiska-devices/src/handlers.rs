use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::web;
use laiska_auth::Admin;
use laiska_auth::ApiError;
use laiska_auth::Auth;
use laiska_core::*;
use laiska_records::Reading;
use laiska_records::Sensor;
use laiska_records::Store;
use laiska_records::StoreError;
use std::collections::BTreeMap;

pub async fn register_sensor(
    _: Admin,
    store: web::Data<dyn Store>,
    req: web::Json<RegisterSensorRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = req.validate()?;
    let owner = match req.owner() {
        None => None,
        Some(email) => match store.user_by_email(email).await? {
            Some(user) => Some(user.id()),
            None => return Err(ApiError::Validation("user not found".to_string())),
        },
    };
    store
        .register(&Sensor::new(id, req.secret.clone(), owner))
        .await?;
    log::info!("registered sensor {}", id);
    Ok(HttpResponse::Created()
        .json(serde_json::json!({ "message": "sensor registered successfully" })))
}

pub async fn sensor_data(
    http: HttpRequest,
    store: web::Data<dyn Store>,
    req: web::Json<SensorDataRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = req.validate()?;
    let claim = req.claim()?;
    let secret = laiska_auth::header(&http, SENSOR_SECRET_HEADER).unwrap_or_default();
    let verified = authenticate(store.get_ref(), id, &secret, claim).await?;
    let SensorDataRequest {
        kind,
        name,
        time,
        value,
        ..
    } = req.into_inner();
    let reading = Reading::new(id, kind, name, time, value, verified.user());
    store.append(&reading).await?;
    log::debug!("stored reading from sensor {}", id);
    Ok(HttpResponse::Created()
        .json(serde_json::json!({ "message": "sensor data registered successfully" })))
}

/// Readings of every sensor the caller owns, keyed by sensor id.
pub async fn sensors(store: web::Data<dyn Store>, auth: Auth) -> Result<HttpResponse, ApiError> {
    let mut listing = BTreeMap::<String, Vec<Reading>>::new();
    for sensor in store.sensors_of(auth.user()).await? {
        let readings = store.readings(sensor.id(), auth.user()).await?;
        listing.insert(sensor.id().to_string(), readings);
    }
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn delete_sensor(
    _: Admin,
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path
        .parse::<ID<Sensor>>()
        .map_err(|_| ApiError::Validation("could not parse sensor UUID".to_string()))?;
    match store.delete_sensor(id).await {
        Ok(()) => {
            log::info!("deleted sensor {}", id);
            Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "sensor deleted" })))
        }
        Err(StoreError::Missing(_)) => Err(ApiError::NotFound("sensor not found")),
        Err(e) => Err(e.into()),
    }
}
