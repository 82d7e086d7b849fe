//! Bearer-token identity extractor.
//!
//! Tokens are issued by the external identity layer; this service only
//! verifies the signature and exposes the authenticated player id.

use actix_web::{dev::Payload, error::ErrorUnauthorized, FromRequest, HttpRequest, Result as ActixResult};
use futures_util::future::{ready, Ready};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use std::env;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct Claims {
    /// User id.
    sub: String,
    /// Player (profile) id — the identity every game rule keys on.
    pid: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Extracts and validates a Bearer-JWT, exposing user & player UUIDs.
#[derive(Debug, Clone)]
pub struct PlayerAuth {
    pub user_id: Uuid,
    pub player_id: Uuid,
}

impl FromRequest for PlayerAuth {
    type Error = actix_web::Error;
    type Future = Ready<ActixResult<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let res = (|| {
            // Expect:  Authorization: Bearer <JWT>
            let hdr = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| ErrorUnauthorized("missing Authorization header"))?;

            let token = hdr
                .strip_prefix("Bearer ")
                .ok_or_else(|| ErrorUnauthorized("malformed Authorization header"))?;

            let secret =
                env::var("JWT_SECRET").map_err(|_| ErrorUnauthorized("server mis-config"))?;
            let data = decode::<Claims>(
                token,
                &DecodingKey::from_secret(secret.as_bytes()),
                &Validation::default(),
            )
            .map_err(|_| ErrorUnauthorized("invalid / expired token"))?;

            let user_id =
                Uuid::parse_str(&data.claims.sub).map_err(|_| ErrorUnauthorized("bad sub"))?;
            let player_id =
                Uuid::parse_str(&data.claims.pid).map_err(|_| ErrorUnauthorized("bad pid"))?;

            Ok(PlayerAuth { user_id, player_id })
        })();

        ready(res)
    }
}
