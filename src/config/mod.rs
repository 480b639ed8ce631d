use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_rate_limiting: bool,
    /// Budget for general /api traffic per window
    pub rate_limit_requests: u32,
    /// Budget for login/register/refresh per window
    pub auth_rate_limit_requests: u32,
    /// Budget for LLM-backed translation creation per window
    pub translate_rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Retries after the first attempt on rate-limit/transient errors
    pub retry_count: u32,
    pub retry_backoff_ms: u64,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_RATE_LIMITING") {
            self.api.enable_rate_limiting = v.parse().unwrap_or(self.api.enable_rate_limiting);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_REQUESTS") {
            self.api.rate_limit_requests = v.parse().unwrap_or(self.api.rate_limit_requests);
        }
        if let Ok(v) = env::var("API_AUTH_RATE_LIMIT_REQUESTS") {
            self.api.auth_rate_limit_requests = v.parse().unwrap_or(self.api.auth_rate_limit_requests);
        }
        if let Ok(v) = env::var("API_TRANSLATE_RATE_LIMIT_REQUESTS") {
            self.api.translate_rate_limit_requests =
                v.parse().unwrap_or(self.api.translate_rate_limit_requests);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_WINDOW_SECS") {
            self.api.rate_limit_window_secs = v.parse().unwrap_or(self.api.rate_limit_window_secs);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Translator overrides
        if let Ok(v) = env::var("OPENAI_API_KEY") {
            self.translator.api_key = v;
        }
        if let Ok(v) = env::var("TRANSLATOR_ENDPOINT") {
            self.translator.endpoint = v;
        }
        if let Ok(v) = env::var("TRANSLATOR_MODEL") {
            self.translator.model = v;
        }
        if let Ok(v) = env::var("TRANSLATOR_MAX_TOKENS") {
            self.translator.max_tokens = v.parse().unwrap_or(self.translator.max_tokens);
        }
        if let Ok(v) = env::var("TRANSLATOR_TEMPERATURE") {
            self.translator.temperature = v.parse().unwrap_or(self.translator.temperature);
        }
        if let Ok(v) = env::var("TRANSLATOR_RETRY_COUNT") {
            self.translator.retry_count = v.parse().unwrap_or(self.translator.retry_count);
        }
        if let Ok(v) = env::var("TRANSLATOR_RETRY_BACKOFF_MS") {
            self.translator.retry_backoff_ms = v.parse().unwrap_or(self.translator.retry_backoff_ms);
        }
        if let Ok(v) = env::var("TRANSLATOR_TIMEOUT_SECS") {
            self.translator.request_timeout_secs =
                v.parse().unwrap_or(self.translator.request_timeout_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                enable_rate_limiting: false,
                rate_limit_requests: 1000,
                auth_rate_limit_requests: 100,
                translate_rate_limit_requests: 200,
                rate_limit_window_secs: 60,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                // Local-only fallback; real deployments set JWT_SECRET
                jwt_secret: "kotoba-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                bcrypt_cost: 4,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:3001".to_string(),
                ],
            },
            translator: TranslatorConfig::defaults(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 120,
                auth_rate_limit_requests: 10,
                translate_rate_limit_requests: 30,
                rate_limit_window_secs: 60,
                max_request_size_bytes: 512 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                bcrypt_cost: 10,
                cors_origins: vec!["https://staging.kotoba.example.com".to_string()],
            },
            translator: TranslatorConfig::defaults(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 60,
                auth_rate_limit_requests: 5,
                translate_rate_limit_requests: 20,
                rate_limit_window_secs: 60,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                bcrypt_cost: 12,
                cors_origins: vec!["https://kotoba.example.com".to_string()],
            },
            translator: TranslatorConfig::defaults(),
        }
    }
}

impl TranslatorConfig {
    fn defaults() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            retry_count: 3,
            retry_backoff_ms: 500,
            request_timeout_secs: 60,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_disables_rate_limiting() {
        let config = AppConfig::development();
        assert!(!config.api.enable_rate_limiting);
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.security.bcrypt_cost, 4);
    }

    #[test]
    fn production_enables_rate_limiting() {
        let config = AppConfig::production();
        assert!(config.api.enable_rate_limiting);
        assert_eq!(config.api.auth_rate_limit_requests, 5);
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.bcrypt_cost, 12);
    }

    #[test]
    fn translator_defaults_are_bounded() {
        let t = TranslatorConfig::defaults();
        assert_eq!(t.retry_count, 3);
        assert!(t.retry_backoff_ms > 0);
    }
}
