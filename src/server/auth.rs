// src/server/auth.rs

use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;
use warp::{reject::Reject, Filter, Rejection};

use crate::config::Credentials;

#[derive(Debug)]
pub struct Unauthorized;

impl Reject for Unauthorized {}

/// Split an `Authorization: Basic <base64(user:pass)>` header.
pub fn decode_basic(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Extracts the authenticated username or rejects with [`Unauthorized`].
pub fn with_basic_auth(
    credentials: Arc<Credentials>,
) -> impl Filter<Extract = (String,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let credentials = credentials.clone();
        async move {
            header
                .as_deref()
                .and_then(decode_basic)
                .filter(|(user, pass)| credentials.verify(user, pass))
                .map(|(user, _)| user)
                .ok_or_else(|| warp::reject::custom(Unauthorized))
        }
    })
}
