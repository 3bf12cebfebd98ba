use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on a single model call.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Photos arrive inline as data URIs, so the body limit is well above axum's 2MB default.
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductAiConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub model: ModelConfig,
    pub google: GoogleConfig,
    pub http: HttpConfig,
}

/// Which backend answers generation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown GENAI_PROVIDER '{}', expected 'gemini' or 'mock'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub provider: ProviderKind,
    /// Model identifier for vision + structured JSON output (e.g., gemini-2.0-flash)
    pub text_model: String,
    pub request_timeout_secs: u64,
    pub temperature: Option<f32>,
}

impl ModelConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub api_key: Secret<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub max_body_bytes: usize,
    pub rate_limit_per_minute: u32,
    /// Origins allowed by CORS; empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Rate-limit on `x-forwarded-for` rather than the peer address.
    pub trust_forwarded_for: bool,
}

impl ProductAiConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let provider: ProviderKind = get_env("GENAI_PROVIDER", Some("gemini"), false)?.parse()?;

        // The mock backend never talks to Google, so a key is only mandatory for Gemini.
        let api_key = match provider {
            ProviderKind::Gemini => get_env("GOOGLE_API_KEY", None, is_prod)?,
            ProviderKind::Mock => get_env("GOOGLE_API_KEY", Some(""), false)?,
        };

        Ok(ProductAiConfig {
            common: common_config,
            model: ModelConfig {
                provider,
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                request_timeout_secs: parse_env(
                    "GENAI_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
                temperature: parse_optional_env("GENAI_TEMPERATURE")?,
            },
            google: GoogleConfig {
                api_key: Secret::new(api_key),
                api_base: get_env(
                    "GEMINI_API_BASE",
                    Some("https://generativelanguage.googleapis.com/v1beta"),
                    false,
                )?,
            },
            http: HttpConfig {
                max_body_bytes: parse_env("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
                rate_limit_per_minute: parse_env(
                    "RATE_LIMIT_PER_MINUTE",
                    DEFAULT_RATE_LIMIT_PER_MINUTE,
                )?,
                allowed_origins: env::var("ALLOWED_ORIGINS")
                    .map(|v| split_list(&v))
                    .unwrap_or_default(),
                trust_forwarded_for: parse_env("TRUST_FORWARDED_FOR", false)?,
            },
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => parse_value(key, &val),
        Err(_) => Ok(default),
    }
}

fn parse_optional_env<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => parse_value(key, &val).map(Some),
        _ => Ok(None),
    }
}

fn parse_value<T>(key: &str, val: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    val.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} has an invalid value '{}': {}", key, val, e))
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" mock ".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn split_list_drops_blank_entries() {
        assert_eq!(
            split_list("https://shop.example, ,https://admin.example,"),
            vec!["https://shop.example", "https://admin.example"]
        );
    }

    #[test]
    fn unparsable_values_are_config_errors() {
        assert_eq!(parse_value::<f32>("GENAI_TEMPERATURE", " 0.4 ").unwrap(), 0.4);
        assert!(matches!(
            parse_value::<f32>("GENAI_TEMPERATURE", "warm"),
            Err(AppError::ConfigError(_))
        ));
        assert!(parse_value::<bool>("TRUST_FORWARDED_FOR", "yes").is_err());
    }

    #[test]
    fn optional_setting_fails_on_garbage_and_skips_when_unset() {
        std::env::set_var("PRODUCT_AI_TEST_OPTIONAL_TEMPERATURE", "hot");
        let parsed = parse_optional_env::<f32>("PRODUCT_AI_TEST_OPTIONAL_TEMPERATURE");
        std::env::remove_var("PRODUCT_AI_TEST_OPTIONAL_TEMPERATURE");

        assert!(parsed.is_err());
        assert_eq!(
            parse_optional_env::<f32>("PRODUCT_AI_TEST_UNSET_TEMPERATURE").unwrap(),
            None
        );
    }

    #[test]
    fn request_timeout_is_in_seconds() {
        let model = ModelConfig {
            provider: ProviderKind::Mock,
            text_model: "gemini-2.0-flash".to_string(),
            request_timeout_secs: 45,
            temperature: None,
        };
        assert_eq!(model.request_timeout(), Duration::from_secs(45));
    }
}
