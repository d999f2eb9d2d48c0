use std::convert::Infallible;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    config::Config,
    db::user::{get_user_by_id, get_user_by_username},
    errors::AppError,
    models::{User, user::Claims},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "sessionid";
pub const LOGIN_URL: &str = "/login";

/// Who the current request is authenticated as, resolved once per request by
/// [`load_current_user`].
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<User>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Gate for HTML pages: anonymous requests are sent to the login page.
pub struct LoginRequired(pub User);

impl<S> FromRequestParts<S> for LoginRequired
where
    S: Send + Sync,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<CurrentUser>() {
            Some(CurrentUser(Some(user))) => Ok(Self(user.clone())),
            _ => {
                let target = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or_else(|| parts.uri.path());
                tracing::debug!("Anonymous request to {} redirected to login", target);
                Err(Redirect::to(&format!(
                    "{LOGIN_URL}?next={}",
                    urlencoding::encode(target)
                )))
            }
        }
    }
}

/// Resolves the bearer token or session cookie into a [`CurrentUser`]
/// extension. Anything that does not check out is treated as anonymous.
pub async fn load_current_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match session_token(request.headers()) {
        Some(token) => match resolve_user(&token, &state).await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::debug!("Ignoring session credential: {}", e);
                None
            }
        },
        None => None,
    };

    request.extensions_mut().insert(CurrentUser(user));
    next.run(request).await
}

/// Unsafe methods on the API need an authenticated caller when the server is
/// configured that way.
pub async fn require_api_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.api_write_requires_auth || request.method().is_safe() {
        return next.run(request).await;
    }

    match request.extensions().get::<CurrentUser>() {
        Some(CurrentUser(Some(_))) => next.run(request).await,
        _ => AppError::Unauthorized("Authentication credentials were not provided.".into())
            .into_response(),
    }
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

async fn resolve_user(token: &str, state: &AppState) -> Result<User, AppError> {
    let claims = decode_jwt(token, &state.config.jwt_secret)?;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::Unauthorized("Invalid user ID in token".into()))?;

    get_user_by_id(user_id, &state.db).await
}

pub fn generate_jwt(user: &User, config: &Config) -> Result<String, AppError> {
    let expiration = Duration::try_hours(config.session_ttl_hours)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AppError::EnvError("SESSION_TTL_HOURS is out of range".into()))?
        .timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(AppError::JwtError)
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

    Ok(token_data.claims)
}

/// Establishes a session for `user` on the outgoing response.
pub fn login(jar: CookieJar, user: &User, config: &Config) -> Result<CookieJar, AppError> {
    let token = generate_jwt(user, config)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!("Session started for {}", user.username);
    Ok(jar.add(cookie))
}

pub fn logout(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

pub fn verify_password(password_hash: &str, candidate: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

/// Looks up `username` and checks `password`; `None` for any mismatch.
pub async fn authenticate(
    username: &str,
    password: &str,
    state: &AppState,
) -> Result<Option<User>, AppError> {
    let user = get_user_by_username(username.trim(), &state.db).await?;
    Ok(user.filter(|user| verify_password(&user.password_hash, password)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 42,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_jwt_roundtrip_and_tamper() {
        let config = Config::new("sqlite::memory:", "secret");
        let token = generate_jwt(&user(), &config).unwrap();

        let claims = decode_jwt(&token, "secret").unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");

        assert!(matches!(
            decode_jwt(&token, "other-secret"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(decode_jwt("not-a-token", "secret").is_err());
    }

    #[test]
    fn test_expired_session_is_rejected() {
        let mut config = Config::new("sqlite::memory:", "secret");
        config.session_ttl_hours = -2;
        let token = generate_jwt(&user(), &config).unwrap();
        assert!(decode_jwt(&token, "secret").is_err());
    }

    #[test]
    fn test_oversized_session_ttl_is_an_error() {
        let mut config = Config::new("sqlite::memory:", "secret");
        config.session_ttl_hours = i64::MAX;
        assert!(matches!(
            generate_jwt(&user(), &config),
            Err(AppError::EnvError(_))
        ));
    }

    #[test]
    fn test_password_hashing() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "correct horse"));
        assert!(!verify_password(&hash, "wrong horse"));
        assert!(!verify_password("garbage", "correct horse"));
    }
}
