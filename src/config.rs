use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid { name: &'static str, value: String, reason: String },
}

/// Process configuration, read once at startup and handed to whoever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs the service in demo mode.
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Environment variables:
    /// - `OPENAI_API_KEY` (absent or blank: demo mode)
    /// - `OPENAI_API_BASE`, `OPENAI_MODEL`
    /// - `LLM_TEMPERATURE`, `LLM_MAX_TOKENS`, `LLM_TIMEOUT_SECS`
    /// - `PORT`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let api_key = lookup("OPENAI_API_KEY").map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let api_base = lookup("OPENAI_API_BASE")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);
        let model = lookup("OPENAI_MODEL").unwrap_or(defaults.model);

        let temperature = parse_var(&lookup, "LLM_TEMPERATURE", defaults.temperature)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::Invalid {
                name: "LLM_TEMPERATURE",
                value: temperature.to_string(),
                reason: "must be between 0 and 2".into(),
            });
        }
        let max_tokens = parse_var(&lookup, "LLM_MAX_TOKENS", defaults.max_tokens)?;
        let timeout_secs = parse_var(&lookup, "LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let port = parse_var(&lookup, "PORT", defaults.port)?;

        Ok(Self {
            api_key,
            api_base,
            model,
            temperature,
            max_tokens,
            timeout: Duration::from_secs(timeout_secs),
            port,
        })
    }

    pub fn demo_mode(&self) -> bool {
        self.api_key.is_none()
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// Show only enough of a secret to tell keys apart in logs.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(6).collect();
    format!("{visible}***")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_demo_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(cfg.demo_mode());
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.max_tokens, 500);
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn reads_overrides_and_trims_base_url() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_API_BASE", "http://localhost:9999/v1/"),
            ("LLM_MAX_TOKENS", "256"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("PORT", "3000"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.api_base, "http://localhost:9999/v1");
        assert_eq!(cfg.max_tokens, 256);
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.port, 3000);
    }

    #[test]
    fn blank_key_means_demo_mode() {
        let cfg = Config::from_lookup(lookup_from(&[("OPENAI_API_KEY", "   ")])).unwrap();
        assert!(cfg.demo_mode());
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(Config::from_lookup(lookup_from(&[("PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("LLM_TEMPERATURE", "3.5")])).is_err());
    }

    #[test]
    fn masks_secrets() {
        assert_eq!(mask_secret("sk-abcdefghijkl"), "sk-abc***");
        assert_eq!(mask_secret("ab"), "ab***");
    }
}
