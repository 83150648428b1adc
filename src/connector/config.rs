use reqwest::Url;

use crate::connector::{GeminiConfig, KeyPlacement, DEFAULT_ENDPOINT};
use crate::domain::DomainError;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";
pub const KEY_PLACEMENT_ENV: &str = "GEMINI_KEY_PLACEMENT";

/// Startup configuration, resolved once before any session exists.
///
/// | Variable               | Default                         | Purpose                      |
/// |------------------------|---------------------------------|------------------------------|
/// | `GEMINI_API_KEY`       | none, required unless mocking   | API key                      |
/// | `GEMINI_ENDPOINT`      | Gemini v1 `gemini-pro` endpoint | `generateContent` URL        |
/// | `GEMINI_KEY_PLACEMENT` | `query`                         | `query` or `header`          |
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` only in mock mode.
    pub gemini: Option<GeminiConfig>,
    pub mock: bool,
}

impl AppConfig {
    /// Validate raw settings. A missing or blank API key is fatal unless
    /// `mock` is set.
    pub fn resolve(
        api_key: Option<String>,
        endpoint: Option<String>,
        key_placement: Option<String>,
        mock: bool,
    ) -> Result<Self, DomainError> {
        if mock {
            return Ok(Self { gemini: None, mock });
        }

        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                DomainError::config(format!("{API_KEY_ENV} is not set (or pass --api-key)"))
            })?;

        let endpoint = endpoint
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let url = Url::parse(&endpoint)
            .map_err(|e| DomainError::config(format!("invalid endpoint '{endpoint}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::config(format!(
                "endpoint '{endpoint}' must use http or https"
            )));
        }

        let key_placement = match key_placement.as_deref() {
            None => KeyPlacement::default(),
            Some(raw) => KeyPlacement::parse(raw).ok_or_else(|| {
                DomainError::config(format!(
                    "invalid key placement '{raw}', expected 'query' or 'header'"
                ))
            })?,
        };

        let gemini = GeminiConfig::new(api_key)
            .with_endpoint(endpoint)
            .with_key_placement(key_placement);

        Ok(Self {
            gemini: Some(gemini),
            mock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_config_error() {
        let err = AppConfig::resolve(None, None, None, false).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains(API_KEY_ENV));

        let err = AppConfig::resolve(Some("   ".into()), None, None, false).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn mock_mode_needs_no_key() {
        let config = AppConfig::resolve(None, None, None, true).unwrap();
        assert!(config.mock);
        assert!(config.gemini.is_none());
    }

    #[test]
    fn defaults_apply() {
        let config = AppConfig::resolve(Some("k".into()), None, None, false).unwrap();
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key, "k");
        assert_eq!(gemini.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(gemini.key_placement, KeyPlacement::Query);
    }

    #[test]
    fn overrides_apply() {
        let config = AppConfig::resolve(
            Some("k".into()),
            Some("http://127.0.0.1:8080/generate".into()),
            Some("header".into()),
            false,
        )
        .unwrap();
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.endpoint, "http://127.0.0.1:8080/generate");
        assert_eq!(gemini.key_placement, KeyPlacement::Header);
    }

    #[test]
    fn rejects_bad_endpoint_and_placement() {
        assert!(AppConfig::resolve(Some("k".into()), Some("not a url".into()), None, false)
            .unwrap_err()
            .is_config());
        assert!(AppConfig::resolve(Some("k".into()), Some("ftp://host/x".into()), None, false)
            .unwrap_err()
            .is_config());
        assert!(AppConfig::resolve(Some("k".into()), None, Some("cookie".into()), false)
            .unwrap_err()
            .is_config());
    }
}
