use std::{env, time::Duration};

use anyhow::Context;

pub const DEFAULT_USER_ID: i64 = 1608;
pub const DEFAULT_ERROR_TIMEOUT: Duration = Duration::from_millis(3000);

/// Session configuration handed to the store and the HTTP provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub user_id: i64,
    /// How long an error notification stays visible after it was last set.
    pub error_timeout: Duration,
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn new(api_url: impl Into<String>, user_id: i64) -> Self {
        let api_url: String = api_url.into();
        Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            user_id,
            error_timeout: DEFAULT_ERROR_TIMEOUT,
            request_timeout: None,
        }
    }

    pub fn with_error_timeout(mut self, timeout: Duration) -> Self {
        self.error_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Reads `TODOS_API_URL`, `TODOS_USER_ID`, `TODOS_ERROR_TIMEOUT_MS` and
    /// `TODOS_REQUEST_TIMEOUT_MS`, after loading `.env` if one exists.
    pub fn from_env() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let api_url = env::var("TODOS_API_URL").context("TODOS_API_URL must be set")?;
        let user_id = match optional_var("TODOS_USER_ID")? {
            Some(id) => id,
            None => DEFAULT_USER_ID,
        };

        let mut config = Config::new(api_url, user_id);
        if let Some(ms) = optional_var("TODOS_ERROR_TIMEOUT_MS")? {
            config = config.with_error_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = optional_var("TODOS_REQUEST_TIMEOUT_MS")? {
            config = config.with_request_timeout(Duration::from_millis(ms));
        }

        Ok(config)
    }
}

fn optional_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => {
            let parsed = value
                .trim()
                .parse()
                .with_context(|| format!("{name} is not a valid number: {value:?}"))?;
            Ok(Some(parsed))
        }
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("{name} could not be read")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("http://localhost:3000/", 42);

        assert_eq!(config.api_url, "http://localhost:3000");
        assert_eq!(config.user_id, 42);
        assert_eq!(config.error_timeout, Duration::from_millis(3000));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_builders() {
        let config = Config::new("http://localhost:3000", 1)
            .with_error_timeout(Duration::from_millis(500))
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.error_timeout, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }
}
