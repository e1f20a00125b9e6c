use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use laiska_core::*;
use laiska_records::Store;
use laiska_records::User;
use std::future::Future;
use std::future::Ready;
use std::pin::Pin;
use subtle::ConstantTimeEq;

/// Extractor for session-authenticated requests.
/// Runs [`validate`] against the raw `Authorization` header.
pub struct Auth(ID<User>);

impl Auth {
    pub fn user(&self) -> ID<User> {
        self.0
    }
}

impl FromRequest for Auth {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let crypto = req.app_data::<web::Data<Crypto>>().cloned();
        let store = req.app_data::<web::Data<dyn Store>>().cloned();
        let token = header(req, AUTHORIZATION_HEADER);
        Box::pin(async move {
            let crypto = crypto.ok_or(ApiError::Internal("token service not configured"))?;
            let store = store.ok_or(ApiError::Internal("store not configured"))?;
            validate(token.as_deref(), &crypto, store.get_ref())
                .await
                .map(Auth)
        })
    }
}

/// The single administrative shared secret.
pub struct AdminSecret(String);

impl AdminSecret {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }
    pub fn matches(&self, presented: &str) -> bool {
        !self.0.is_empty() && self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

/// Extractor gating administrative endpoints on the `ADMIN_SECRET` header.
pub struct Admin;

impl FromRequest for Admin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let admitted = req
            .app_data::<web::Data<AdminSecret>>()
            .zip(header(req, ADMIN_SECRET_HEADER))
            .map(|(secret, presented)| secret.matches(&presented))
            .unwrap_or(false);
        std::future::ready(match admitted {
            true => Ok(Admin),
            false => {
                log::debug!("rejected admin request to {}", req.path());
                Err(ApiError::Unauthorized("unauthorized"))
            }
        })
    }
}

/// Reads a header as an owned string, treating non-UTF-8 as absent.
pub fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_owned())
}
