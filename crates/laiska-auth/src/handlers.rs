use super::*;
use actix_web::HttpResponse;
use actix_web::web;
use laiska_core::ID;
use laiska_core::Unique;
use laiska_records::Lease;
use laiska_records::Store;
use laiska_records::StoreError;
use laiska_records::User;

pub async fn signup(
    _: Admin,
    store: web::Data<dyn Store>,
    hasher: web::Data<Hasher>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let SignupRequest { email, password } = req.into_inner();
    let digest = web::block(move || hasher.hash(&password))
        .await
        .map_err(|e| {
            log::error!("hashing task failed: {}", e);
            ApiError::Internal("failed to create user")
        })?
        .map_err(|e| {
            log::error!("hashing failed: {}", e);
            ApiError::Internal("failed to create user")
        })?;
    let user = User::new(ID::default(), email, digest);
    store.create_user(&user).await?;
    log::info!("created user {}", user.id());
    Ok(HttpResponse::Created().json(serde_json::json!({ "message": "user created successfully" })))
}

pub async fn login(
    store: web::Data<dyn Store>,
    hasher: web::Data<Hasher>,
    crypto: web::Data<Crypto>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    let LoginRequest { email, password } = req.into_inner();
    let user = store.user_by_email(&email).await?;
    let stored = digest_of(user.as_ref());
    let matched = web::block(move || hasher.verify(&password, &stored))
        .await
        .map_err(|e| {
            log::error!("hashing task failed: {}", e);
            ApiError::Internal("internal error")
        })?;
    let user = match (user, matched) {
        (Some(user), true) => user,
        (Some(user), false) => {
            log::debug!("wrong password for user {}", user.id());
            return Err(ApiError::Unauthorized("invalid credentials"));
        }
        (None, _) => {
            log::debug!("login for unknown email");
            return Err(ApiError::Unauthorized("invalid credentials"));
        }
    };
    let token = crypto.issue(user.id()).map_err(|e| {
        log::error!("token signing failed: {}", e);
        ApiError::Internal("could not generate token")
    })?;
    store.record(&Lease::new(user.id(), &token)).await?;
    log::info!("user {} logged in", user.id());
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// The digest a login verifies against. Unknown accounts get the decoy
/// so both outcomes pay for one Argon2 pass.
fn digest_of(user: Option<&User>) -> String {
    user.map(|u| u.digest().to_owned())
        .unwrap_or_else(|| DECOY_DIGEST.to_owned())
}

pub async fn logout(store: web::Data<dyn Store>, auth: Auth) -> Result<HttpResponse, ApiError> {
    match store.revoke_all(auth.user()).await {
        Ok(n) => log::info!("user {} logged out, {} leases revoked", auth.user(), n),
        Err(StoreError::Missing(why)) => log::debug!("logout for user {}: {}", auth.user(), why),
        Err(e) => return Err(e.into()),
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "logged out" })))
}

pub async fn protected(_: Auth) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "protected resource" }))
}

pub async fn delete_user(
    _: Admin,
    store: web::Data<dyn Store>,
    req: web::Json<DeleteUserRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;
    match store.delete_user(&req.email).await {
        Ok(()) => {
            log::info!("deleted user and revoked their sessions");
            Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "user deleted" })))
        }
        Err(StoreError::Missing(_)) => Err(ApiError::NotFound("user not found")),
        Err(e) => Err(e.into()),
    }
}
