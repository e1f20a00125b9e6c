use super::*;
use laiska_core::ID;
use laiska_records::Leases;
use laiska_records::User;

/// Decides whether a presented token is acceptable right now.
///
/// Signature and expiry are checked before the lease lookup so that
/// malformed tokens never reach the store. A verified token without a
/// lease is rejected exactly like a forged one.
pub async fn validate<L>(
    token: Option<&str>,
    crypto: &Crypto,
    leases: &L,
) -> Result<ID<User>, ApiError>
where
    L: Leases + ?Sized,
{
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::Unauthorized("missing token"))?;
    let claims = crypto.verify(token).map_err(|e| {
        log::debug!("rejected token: {}", e);
        ApiError::Unauthorized("invalid token")
    })?;
    let user = claims
        .user()
        .map_err(|_| ApiError::Internal("could not parse user uuid from token"))?;
    match leases.exists(user, token).await? {
        true => Ok(user),
        false => {
            log::debug!("no lease for token of user {}", user);
            Err(ApiError::Unauthorized("invalid token"))
        }
    }
}
