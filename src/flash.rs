//! One-shot notifications carried to the next rendered page.
//!
//! Pending messages travel in a signed `messages` cookie. The page that
//! renders them takes them out of the jar, which clears the cookie on the same
//! response, so each message is shown exactly once.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const FLASH_COOKIE: &str = "messages";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FlashClaims {
    messages: Vec<FlashMessage>,
    exp: usize,
}

/// Queues `message` behind whatever is already pending in the jar.
pub fn push(jar: CookieJar, secret: &str, message: FlashMessage) -> Result<CookieJar, AppError> {
    let mut messages = pending(&jar, secret);
    messages.push(message);

    let claims = FlashClaims {
        messages,
        exp: (Utc::now() + Duration::minutes(5)).timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    let cookie = Cookie::build((FLASH_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    Ok(jar.add(cookie))
}

/// Removes and returns the pending messages. Unreadable or expired cookies
/// yield nothing but are still cleared.
pub fn take(jar: CookieJar, secret: &str) -> (CookieJar, Vec<FlashMessage>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }

    let messages = pending(&jar, secret);
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, messages)
}

fn pending(jar: &CookieJar, secret: &str) -> Vec<FlashMessage> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };

    match decode::<FlashClaims>(
        cookie.value(),
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(data) => data.claims.messages,
        Err(e) => {
            tracing::debug!("Dropping unreadable flash cookie: {}", e);
            Vec::new()
        }
    }
}
