//! Maps model failures onto caller-facing HTTP errors.
//!
//! Typed provider errors are classified first. Anything else falls back to
//! inspecting the error text, which is best effort: provider wording that has
//! not been seen before lands in [`FailureKind::Unclassified`].

use crate::services::metrics;
use crate::services::providers::ProviderError;
use service_core::error::AppError;

pub const OVERLOADED_MESSAGE: &str =
    "The AI model is currently overloaded. Please try again in a few moments.";

/// Error text fragments recognised when the typed variant says nothing more specific.
const OVERLOAD_MARKER: &str = "503";
const INVALID_KEY_MARKER: &str = "API key not valid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Upstream temporarily unavailable; the caller should retry later.
    UpstreamOverload,
    /// Missing or rejected credentials on our side.
    Configuration,
    Unclassified,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UpstreamOverload => "upstream_overload",
            FailureKind::Configuration => "configuration",
            FailureKind::Unclassified => "unclassified",
        }
    }
}

/// Classify by error text alone.
pub fn classify_message(message: &str) -> FailureKind {
    if message.contains(OVERLOAD_MARKER) {
        FailureKind::UpstreamOverload
    } else if message.contains(INVALID_KEY_MARKER) {
        FailureKind::Configuration
    } else {
        FailureKind::Unclassified
    }
}

pub fn classify(error: &ProviderError) -> FailureKind {
    match error {
        ProviderError::Overloaded(_) | ProviderError::RateLimited(_) => FailureKind::UpstreamOverload,
        // An overload marker wins over everything else in the text.
        other if other.to_string().contains(OVERLOAD_MARKER) => FailureKind::UpstreamOverload,
        ProviderError::InvalidCredentials(_) | ProviderError::NotConfigured(_) => {
            FailureKind::Configuration
        }
        other => classify_message(&other.to_string()),
    }
}

/// Turn a dispatcher failure into the response the caller sees.
pub fn to_app_error(error: ProviderError) -> AppError {
    let kind = classify(&error);
    metrics::record_failure(kind.as_str());

    match kind {
        FailureKind::UpstreamOverload => {
            tracing::warn!(error = %error, "Model overloaded");
            AppError::ServiceUnavailable(OVERLOADED_MESSAGE.to_string())
        }
        FailureKind::Configuration => {
            tracing::error!(error = %error, "Model credentials are missing or invalid");
            AppError::ConfigError(anyhow::anyhow!(error))
        }
        FailureKind::Unclassified => {
            tracing::error!(error = %error, "Model call failed");
            AppError::UpstreamError(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn typed_overload_and_rate_limit_are_overload() {
        assert_eq!(
            classify(&ProviderError::Overloaded("busy".to_string())),
            FailureKind::UpstreamOverload
        );
        assert_eq!(
            classify(&ProviderError::RateLimited("quota".to_string())),
            FailureKind::UpstreamOverload
        );
    }

    #[test]
    fn any_error_mentioning_503_is_overload() {
        let error = ProviderError::ApiError(
            "Gemini API error 503 Service Unavailable: API key not valid".to_string(),
        );
        assert_eq!(classify(&error), FailureKind::UpstreamOverload);
    }

    #[test]
    fn invalid_key_text_is_configuration() {
        let error = ProviderError::ApiError("API key not valid. Please pass a valid API key.".to_string());
        assert_eq!(classify(&error), FailureKind::Configuration);
        assert_eq!(
            classify(&ProviderError::InvalidCredentials("rejected".to_string())),
            FailureKind::Configuration
        );
        assert_eq!(
            classify(&ProviderError::NotConfigured("no key".to_string())),
            FailureKind::Configuration
        );
    }

    #[test]
    fn everything_else_is_unclassified() {
        assert_eq!(
            classify(&ProviderError::ContentFiltered),
            FailureKind::Unclassified
        );
        assert_eq!(
            classify(&ProviderError::Timeout(Duration::from_secs(60))),
            FailureKind::Unclassified
        );
        assert_eq!(classify_message("connection reset"), FailureKind::Unclassified);
    }

    #[test]
    fn unclassified_message_is_passed_through() {
        let error = ProviderError::NetworkError("connection reset by peer".to_string());
        match to_app_error(error) {
            AppError::UpstreamError(msg) => assert_eq!(msg, "Network error: connection reset by peer"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn configuration_failure_maps_to_config_error() {
        let error = ProviderError::InvalidCredentials("rejected".to_string());
        assert!(matches!(to_app_error(error), AppError::ConfigError(_)));
    }
}
