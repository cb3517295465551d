use anyhow::{Context, Result};

const DEFAULT_EMAIL_FROM: &str = "Anonymous Feedback <onboarding@resend.dev>";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,
    /// Resend API key. When absent, codes are logged instead of emailed.
    pub resend_api_key: Option<String>,
    pub email_from: String,
    /// Gemini API key. When absent, suggestions come from the fallback pool.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub recruiter: RecruiterConfig,
    /// Marks the session cookie `Secure`. Enabled when `APP_ENV=production`.
    pub secure_cookies: bool,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone)]
pub struct RecruiterConfig {
    pub access_key: Option<String>,
    pub demo_username: String,
    pub demo_email: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            session_secret: require_env("SESSION_SECRET")?,
            resend_api_key: optional_env("RESEND_API_KEY"),
            email_from: optional_env("EMAIL_FROM")
                .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            gemini_api_key: optional_env("GOOGLE_GENERATIVE_AI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            recruiter: RecruiterConfig {
                access_key: optional_env("RECRUITER_ACCESS_KEY"),
                demo_username: optional_env("RECRUITER_DEMO_USERNAME")
                    .unwrap_or_else(|| "demo".to_string()),
                demo_email: optional_env("RECRUITER_DEMO_EMAIL")
                    .unwrap_or_else(|| "demo@example.com".to_string()),
            },
            secure_cookies: optional_env("APP_ENV").as_deref() == Some("production"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
