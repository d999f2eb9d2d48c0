use crate::errors::AppError;

// A century; anything longer overflows chrono once added to the current time.
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub session_ttl_hours: i64,
    pub api_write_requires_auth: bool,
    pub rate_limit_per_minute: u32,
}

impl Config {
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            jwt_secret: jwt_secret.into(),
            port: 8000,
            allowed_origins: vec!["http://localhost:8080".to_string()],
            // two weeks, same as a browser session cookie would usually last
            session_ttl_hours: 24 * 14,
            api_write_requires_auth: false,
            rate_limit_per_minute: 1000,
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::EnvError("JWT_SECRET must be set".into()))?;
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://lectures.db".to_string());

        let mut config = Config::new(database_url, jwt_secret);

        if let Some(port) = env_parse::<u16>("PORT")? {
            config.port = port;
        }
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            config.allowed_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(hours) = env_parse::<i64>("SESSION_TTL_HOURS")? {
            config.session_ttl_hours = session_ttl(hours)?;
        }
        if let Some(flag) = env_parse::<bool>("API_WRITE_REQUIRES_AUTH")? {
            config.api_write_requires_auth = flag;
        }
        if let Some(limit) = env_parse::<u32>("RATE_LIMIT_PER_MINUTE")? {
            config.rate_limit_per_minute = limit;
        }

        Ok(config)
    }
}

fn session_ttl(hours: i64) -> Result<i64, AppError> {
    if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(AppError::EnvError(format!(
            "Invalid SESSION_TTL_HOURS: must be between 1 and {MAX_SESSION_TTL_HOURS}"
        )))
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::EnvError(format!("Invalid {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ttl_bounds() {
        assert_eq!(session_ttl(1).unwrap(), 1);
        assert_eq!(session_ttl(336).unwrap(), 336);
        assert_eq!(
            session_ttl(MAX_SESSION_TTL_HOURS).unwrap(),
            MAX_SESSION_TTL_HOURS
        );

        for bad in [0, -5, MAX_SESSION_TTL_HOURS + 1, i64::MAX] {
            assert!(matches!(session_ttl(bad), Err(AppError::EnvError(_))));
        }
    }
}
