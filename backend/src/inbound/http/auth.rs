//! Bearer token extraction.
//!
//! Handlers take a [`CurrentActor`] argument to require authentication. The
//! extractor reads the `Authorization` header and resolves the token through
//! the [`Authenticator`](crate::domain::ports::Authenticator) port held in
//! [`HttpState`].

use std::ops::Deref;

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, Error};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "bearer ";

/// Pull the raw token out of an `Authorization` header value.
///
/// A value without the `Bearer` scheme is passed through unchanged so that
/// it fails verification rather than looking absent.
fn bearer_token(req: &HttpRequest) -> Option<String> {
    let raw = req.headers().get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match (raw.get(..BEARER_PREFIX.len()), raw.get(BEARER_PREFIX.len()..)) {
        (Some(scheme), Some(rest)) if scheme.eq_ignore_ascii_case(BEARER_PREFIX) => rest,
        _ => raw,
    };
    Some(token.trim().to_owned())
}

/// The authenticated caller of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentActor(pub Actor);

impl CurrentActor {
    pub fn into_inner(self) -> Actor {
        self.0
    }
}

impl Deref for CurrentActor {
    type Target = Actor;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CurrentActor {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = bearer_token(req);
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            state.authenticator.authenticate(token).await.map(CurrentActor)
        })
    }
}
