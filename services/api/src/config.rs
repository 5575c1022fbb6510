//! Process configuration read from environment variables

use std::env;
use tracing::warn;

/// Server-level configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to listen on
    pub port: u16,
    /// Deployment environment (`development` or `production`)
    pub environment: String,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PORT`: listen port (default: 5000)
    /// - `APP_ENV`: deployment environment (default: `development`)
    /// - `FRONTEND_URL`: allowed CORS origin (default: `http://localhost:5173`)
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);

        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string());

        AppConfig {
            port,
            environment,
            frontend_url,
        }
    }
}

/// API credentials for the third-party data providers
///
/// Every key is optional: a missing key selects the documented fallback
/// data path rather than failing startup.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub coingecko_api_key: Option<String>,
    pub cryptopanic_api_key: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub humorapi_api_key: Option<String>,
    /// Sent as the HTTP-Referer to the AI completion provider
    pub frontend_url: String,
}

impl ProviderConfig {
    /// Create a new ProviderConfig from environment variables
    pub fn from_env() -> Self {
        let config = ProviderConfig {
            coingecko_api_key: env::var("COINGECKO_API_KEY").ok(),
            cryptopanic_api_key: env::var("CRYPTOPANIC_API_KEY").ok(),
            openrouter_api_key: env::var("OPENROUTER_API_KEY").ok(),
            humorapi_api_key: env::var("HUMORAPI_API_KEY").ok(),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        };

        if config.cryptopanic_api_key.is_none() {
            warn!("CRYPTOPANIC_API_KEY not set, news endpoint will serve fallback data");
        }
        if config.openrouter_api_key.is_none() {
            warn!("OPENROUTER_API_KEY not set, AI insights will serve canned content");
        }
        if config.humorapi_api_key.is_none() {
            warn!("HUMORAPI_API_KEY not set, memes endpoint will serve fallback data");
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_app_config_defaults() {
        unsafe {
            env::remove_var("PORT");
            env::remove_var("APP_ENV");
            env::remove_var("FRONTEND_URL");
        }

        let config = AppConfig::from_env();
        assert_eq!(config.port, 5000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.frontend_url, "http://localhost:5173");
    }

    #[test]
    #[serial]
    fn test_app_config_from_env() {
        unsafe {
            env::set_var("PORT", "8080");
            env::set_var("APP_ENV", "production");
        }

        let config = AppConfig::from_env();
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "production");

        unsafe {
            env::remove_var("PORT");
            env::remove_var("APP_ENV");
        }
    }

    #[test]
    #[serial]
    fn test_provider_config_missing_keys_are_none() {
        unsafe {
            env::remove_var("COINGECKO_API_KEY");
            env::remove_var("CRYPTOPANIC_API_KEY");
            env::remove_var("OPENROUTER_API_KEY");
            env::remove_var("HUMORAPI_API_KEY");
        }

        let config = ProviderConfig::from_env();
        assert!(config.coingecko_api_key.is_none());
        assert!(config.cryptopanic_api_key.is_none());
        assert!(config.openrouter_api_key.is_none());
        assert!(config.humorapi_api_key.is_none());
    }
}
