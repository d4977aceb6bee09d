// Study Relay - startup configuration
//
// Read once from the environment (after `.env` is loaded) and shared
// read-only through `AppState`.

use std::path::PathBuf;
use std::str::FromStr;

/// Gemini model used for every generation call.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Public Gemini API host. Tests swap this for a mock server.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PORT: u16 = 3000;
/// 50 MB — enough for lecture PDFs and slide decks.
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY (or GOOGLE_API_KEY) must be set")]
    MissingApiKey,

    #[error("invalid PORT '{0}'")]
    InvalidPort(String),

    #[error("invalid RELAY_VARIANT '{0}' (expected 'files' or 'text')")]
    InvalidVariant(String),
}

// ── Deployment variant ──────────────────────────────────────────────────────

/// Which flavour of the relay this process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// `/upload` mounted, action requests may reference uploaded files.
    #[default]
    Files,
    /// No `/upload` route; `explain` available.
    Text,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Files => "files",
            Variant::Text => "text",
        }
    }

    pub fn accepts_files(self) -> bool {
        matches!(self, Variant::Files)
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "files" | "file" => Ok(Variant::Files),
            "text" | "text-only" => Ok(Variant::Text),
            _ => Err(ConfigError::InvalidVariant(s.to_string())),
        }
    }
}

// ── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub port: u16,
    pub variant: Variant,
    pub model: String,
    pub api_base: String,
    /// Directory for request-scoped upload copies.
    pub scratch_dir: PathBuf,
    pub body_limit: usize,
}

impl Config {
    /// Config with defaults for everything except the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            port: DEFAULT_PORT,
            variant: Variant::default(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            scratch_dir: std::env::temp_dir(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup so parsing is testable
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);

        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }

        if let Some(variant) = lookup("RELAY_VARIANT").filter(|v| !v.is_empty()) {
            config.variant = variant.parse()?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.port, 3000);
        assert_eq!(config.variant, Variant::Files);
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn google_api_key_is_accepted_as_fallback() {
        let config = Config::from_lookup(lookup(&[("GOOGLE_API_KEY", "g")])).unwrap();
        assert_eq!(config.api_key, "g");
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = Config::from_lookup(lookup(&[("PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn port_and_variant_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("PORT", "8081"),
            ("RELAY_VARIANT", "TEXT"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.variant, Variant::Text);
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "k"), ("PORT", "abc")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "abc"));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!("stream".parse::<Variant>().is_err());
    }
}
