pub mod site;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use site::{RedirectRule, SiteConfig, SiteRules};

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read site config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid site config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid response header '{0}'")]
    InvalidHeader(String),

    #[error("Invalid redirect rule '{from}' -> '{to}': {reason}")]
    InvalidRedirect {
        from: String,
        to: String,
        reason: &'static str,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub security: SecurityConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

/// Connection settings for the hosted backend.
///
/// Absent values are reported by the client factories, not at load time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: Option<String>,
    #[serde(skip_serializing)]
    pub anon_key: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

pub const BACKEND_URL_VAR: &str = "SUPABASE_URL";
pub const BACKEND_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (tests pass a map here)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let mut config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup);

        if let Some(path) = lookup("SITE_CONFIG_PATH").filter(|p| !p.trim().is_empty()) {
            config.site = SiteConfig::from_yaml_file(Path::new(&path))?;
        }

        // Compiling validates headers and redirects up front
        config.site.compile()?;

        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.backend.url = lookup(BACKEND_URL_VAR);
        self.backend.anon_key = lookup(BACKEND_ANON_KEY_VAR);

        if let Some(v) = lookup("JOBBOARD_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("API_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }
        if let Some(v) = lookup("BACKEND_REQUEST_TIMEOUT_SECS") {
            self.backend.request_timeout_secs = v.parse().unwrap_or(self.backend.request_timeout_secs);
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            backend: BackendConfig {
                request_timeout_secs: 30,
                ..Default::default()
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            site: SiteConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            backend: BackendConfig {
                request_timeout_secs: 10,
                ..Default::default()
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            site: SiteConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                enable_request_logging: false,
            },
            backend: BackendConfig {
                request_timeout_secs: 5,
                ..Default::default()
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: Vec::new(),
            },
            site: SiteConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_development() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert!(config.backend.url.is_none());
        assert!(config.backend.anon_key.is_none());
    }

    #[test]
    fn production_preset_disables_request_logging() {
        let config = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "prod")])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.server.enable_request_logging);
        assert_eq!(config.backend.request_timeout_secs, 5);
    }

    #[test]
    fn env_overrides_apply() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("PORT", "8080"),
            ("SECURITY_CORS_ORIGINS", "https://a.test, https://b.test,"),
            ("BACKEND_REQUEST_TIMEOUT_SECS", "not-a-number"),
        ]))
        .unwrap();

        assert_eq!(config.backend.url.as_deref(), Some("https://project.supabase.co"));
        assert_eq!(config.backend.anon_key.as_deref(), Some("anon"));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.cors_origins, vec!["https://a.test", "https://b.test"]);
        assert_eq!(config.backend.request_timeout_secs, 30);
    }

    #[test]
    fn jobboard_port_wins_over_port() {
        let config = AppConfig::from_lookup(lookup_from(&[("PORT", "8080"), ("JOBBOARD_PORT", "9090")])).unwrap();
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn missing_site_config_file_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("SITE_CONFIG_PATH", "/nonexistent/site.yaml")]));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn anon_key_is_never_serialized() {
        let config = AppConfig::from_lookup(lookup_from(&[("SUPABASE_ANON_KEY", "secret-key")])).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-key"));
    }
}
