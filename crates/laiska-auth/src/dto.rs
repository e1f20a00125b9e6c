use super::*;
use serde::Deserialize;
use serde::Serialize;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct DeleteUserRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        credentials(&self.email, &self.password)
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        credentials(&self.email, &self.password)
    }
}

impl DeleteUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        email(&self.email)
    }
}

fn credentials(address: &str, password: &str) -> Result<(), ApiError> {
    email(address)?;
    match password.is_empty() {
        true => Err(ApiError::Validation("password is required".to_string())),
        false => Ok(()),
    }
}

/// Syntactic check only: one `@`, a non-empty local part, a dotted domain.
pub fn email(address: &str) -> Result<(), ApiError> {
    let valid = address
        .split_once('@')
        .filter(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() > 1
                && domain.split('.').all(|label| !label.is_empty())
        })
        .is_some()
        && !address.chars().any(char::is_whitespace);
    match valid {
        true => Ok(()),
        false if address.is_empty() => Err(ApiError::Validation("email is required".to_string())),
        false => Err(ApiError::Validation("email is not a valid address".to_string())),
    }
}
