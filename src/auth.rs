//! Bearer-token authentication. Every posts endpoint extracts an [`Identity`], so a request
//! without a valid `Authorization: Bearer <jwt>` header is rejected with a 401 before the
//! handler body runs.
use crate::twoface::{Cause, Describe, DescribeErr, ExternalError, TfError};
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use anyhow::anyhow;
use futures::future::{ready, Ready};
use jsonwebtoken::{dangerous_insecure_decode, decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
}

/// Verifies bearer tokens. Built once at startup and shared via app data.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey<'static>,
    /// Skip signature checks. Only for test environments.
    skip_signature_check: bool,
}

/// The claims postboard tokens carry: the subject is the user's id.
#[derive(Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    exp: u64,
}

impl TokenVerifier {
    pub fn new(secret: &str, disable_auth: bool) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()).into_static(),
            skip_signature_check: disable_auth,
        }
    }

    fn identity_from(&self, token: &str) -> Result<Identity, jsonwebtoken::errors::Error> {
        let data = if self.skip_signature_check {
            dangerous_insecure_decode::<Claims>(token)?
        } else {
            decode::<Claims>(token, &self.key, &Validation::default())?
        };
        Ok(Identity {
            user_id: data.claims.sub,
        })
    }
}

impl FromRequest for Identity {
    type Error = TfError;
    type Future = Ready<Result<Self, TfError>>;
    type Config = ();

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(identity(req))
    }
}

fn identity(req: &HttpRequest) -> Result<Identity, TfError> {
    guard!(let Some(verifier) = req.app_data::<web::Data<TokenVerifier>>() else {
        return Err(anyhow!("TokenVerifier missing from app data").describe(ExternalError::default()))
    });
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    guard!(let Some(header_value) = header_value else {
        return Err(anyhow!("no authorization header").describe(bad_token()))
    });
    guard!(let Some(token) = header_value.strip_prefix("Bearer ") else {
        return Err(anyhow!("authorization header is not a bearer token").describe(bad_token()))
    });
    verifier.identity_from(token).describe_err(bad_token())
}

pub fn bad_token() -> ExternalError {
    ExternalError::new(Cause::UserBadAuth, "No valid auth token")
}

/// Sign a token for the given user, for tests that need to act as somebody.
#[cfg(test)]
pub fn mint_token(secret: &str, user_id: Uuid) -> String {
    let exp = (chrono::offset::Utc::now() + chrono::Duration::hours(1)).timestamp() as u64;
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &Claims { sub: user_id, exp },
        &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("couldn't sign test token")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let verifier = TokenVerifier::new("s3cret", false);
        let token = mint_token("s3cret", user_id);
        let identity = verifier.identity_from(&token).unwrap();
        assert_eq!(identity.user_id, user_id);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let verifier = TokenVerifier::new("s3cret", false);
        let token = mint_token("a-different-secret", Uuid::new_v4());
        assert!(verifier.identity_from(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let verifier = TokenVerifier::new("s3cret", false);
        assert!(verifier.identity_from("not-a-jwt").is_err());
    }

    #[test]
    fn test_disabled_auth_skips_signature_check() {
        let user_id = Uuid::new_v4();
        let verifier = TokenVerifier::new("s3cret", true);
        let token = mint_token("a-different-secret", user_id);
        let identity = verifier.identity_from(&token).unwrap();
        assert_eq!(identity.user_id, user_id);
    }
}
