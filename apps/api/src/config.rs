use crate::errors::AppError;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Read once at startup; a missing or malformed credential stops the process
/// before the listener is bound.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let google_api_key = require(&lookup, "GOOGLE_API_KEY")?;
        if google_api_key.chars().any(char::is_whitespace) {
            return Err(AppError::Configuration(
                "GOOGLE_API_KEY must not contain whitespace".to_string(),
            ));
        }

        Ok(Config {
            google_api_key,
            gemini_model: optional(&lookup, "GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_base: optional(&lookup, "GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            rust_log: optional(&lookup, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| {
        AppError::Configuration(format!("Required environment variable '{key}' is not set"))
    })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match optional(lookup, key) {
        Some(raw) => raw.parse::<T>().map_err(|_| {
            AppError::Configuration(format!("{key} has an invalid value: '{raw}'"))
        }),
        None => Ok(default),
    }
}
