use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";

/// Application configuration loaded from environment variables.
/// Every variable is optional; vendor keys arrive per request, never from here.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    /// Single origin allowed by CORS.
    pub frontend_url: String,
    pub rust_log: String,
    pub openai_api_base: String,
    pub anthropic_api_base: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            port,
            frontend_url: or_default("FRONTEND_URL", DEFAULT_FRONTEND_URL),
            rust_log: or_default("RUST_LOG", "info"),
            openai_api_base: or_default("OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE),
            anthropic_api_base: or_default("ANTHROPIC_API_BASE", DEFAULT_ANTHROPIC_API_BASE),
        })
    }
}
