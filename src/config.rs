use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fixed-delay retry policy for collaborator calls.
///
/// Every failed attempt is followed by the same delay; there is no backoff
/// growth and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(anyhow!("Retry policy needs at least one attempt"));
        }
        Ok(Self { max_attempts, delay })
    }

    /// Policy that retries without sleeping, for tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Directory holding `extraction_prompt.txt` and `insights_prompt.txt`
    pub prompt_dir: PathBuf,
    pub retry: RetryPolicy,
    pub http_timeout_seconds: u64,
    pub http_connect_timeout_seconds: u64,
    /// Scratch directory for PDF tools
    pub temp_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            prompt_dir: PathBuf::from("prompts"),
            retry: RetryPolicy::default(),
            http_timeout_seconds: 10,
            http_connect_timeout_seconds: 5,
            temp_dir: "/tmp".to_string(),
        }
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid value for {}: '{}' ({})", name, raw, e)),
        _ => Ok(default),
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let max_attempts = env_or("W2_RETRY_MAX_ATTEMPTS", defaults.retry.max_attempts)?;
        let delay_ms = env_or("W2_RETRY_DELAY_MS", defaults.retry.delay.as_millis() as u64)?;
        let retry = RetryPolicy::new(max_attempts, Duration::from_millis(delay_ms))?;

        Ok(Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: non_empty_var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            prompt_dir: non_empty_var("W2_PROMPT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.prompt_dir),
            retry,
            http_timeout_seconds: env_or("W2_HTTP_TIMEOUT_SECONDS", defaults.http_timeout_seconds)?,
            http_connect_timeout_seconds: env_or(
                "W2_HTTP_CONNECT_TIMEOUT_SECONDS",
                defaults.http_connect_timeout_seconds,
            )?,
            temp_dir: non_empty_var("TEMP_DIR").unwrap_or(defaults.temp_dir),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }

    pub fn http_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http_connect_timeout_seconds)
    }
}
