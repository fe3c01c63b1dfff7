use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::user::Role;

/// Decoded session-token payload. Carries everything role checks need, so
/// protected handlers never have to consult the credential store.
#[derive(Clone, Deserialize, Serialize, Debug)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub sub: String,
    pub uid: i64,
    pub role: Role,
}

impl Claims {
    pub fn require_admin(&self) -> Result<(), Error> {
        match self.role {
            Role::Admin => Ok(()),
            Role::User => Err(Error::Forbidden),
        }
    }
}

pub async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(Error::NoCredentials)?;

    let mut header = auth_header.to_str()?.split_whitespace();
    let (_bearer, token) = (header.next(), header.next().unwrap_or_default());

    let token_data = state.user_controller.decode_jwt(token)?;

    request.extensions_mut().insert(token_data.claims);

    Ok(next.run(request).await)
}
