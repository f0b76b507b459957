use axum::http::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ConfigError;

/// Site-level rules: remote images, response headers, redirects and build toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub image_domains: Vec<String>,
    pub headers: Vec<HeaderRule>,
    pub redirects: Vec<RedirectRule>,
    /// Largest remote image body the proxy will relay
    pub image_max_bytes: u64,
    pub build: BuildToggles,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRule {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    pub source: String,
    pub destination: String,
    #[serde(default = "default_permanent")]
    pub permanent: bool,
}

/// Carried for parity with the frontend build pipeline; no runtime effect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildToggles {
    pub ignore_build_errors: bool,
    pub ignore_lint_during_builds: bool,
}

fn default_permanent() -> bool {
    true
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            image_domains: vec![
                "images.unsplash.com".to_string(),
                "lh3.googleusercontent.com".to_string(),
            ],
            headers: vec![
                HeaderRule::new("X-Frame-Options", "DENY"),
                HeaderRule::new("X-Content-Type-Options", "nosniff"),
                HeaderRule::new("Referrer-Policy", "origin-when-cross-origin"),
            ],
            redirects: vec![RedirectRule {
                source: "/home".to_string(),
                destination: "/".to_string(),
                permanent: true,
            }],
            image_max_bytes: 10 * 1024 * 1024,
            build: BuildToggles {
                ignore_build_errors: false,
                ignore_lint_during_builds: true,
            },
        }
    }
}

impl HeaderRule {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| ConfigError::Yaml { path: display, source })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Validate and convert into the form the middleware applies per request
    pub fn compile(&self) -> Result<SiteRules, ConfigError> {
        let headers = self
            .headers
            .iter()
            .map(|rule| {
                let name = HeaderName::try_from(rule.name.as_str())
                    .map_err(|_| ConfigError::InvalidHeader(rule.name.clone()))?;
                let value = HeaderValue::try_from(rule.value.as_str())
                    .map_err(|_| ConfigError::InvalidHeader(rule.name.clone()))?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        for rule in &self.redirects {
            let reason = if !rule.source.starts_with('/') {
                Some("source must be an absolute path")
            } else if rule.destination.is_empty() {
                Some("destination must not be empty")
            } else if rule.source == rule.destination {
                Some("source and destination are identical")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(ConfigError::InvalidRedirect {
                    from: rule.source.clone(),
                    to: rule.destination.clone(),
                    reason,
                });
            }
        }

        Ok(SiteRules {
            headers,
            redirects: self.redirects.clone(),
        })
    }

    /// Whether a remote image host is on the configured allowlist
    pub fn image_host_allowed(&self, host: &str) -> bool {
        self.image_domains
            .iter()
            .any(|domain| domain.eq_ignore_ascii_case(host))
    }
}

/// Validated headers and redirects
#[derive(Debug, Clone)]
pub struct SiteRules {
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub redirects: Vec<RedirectRule>,
}

impl SiteRules {
    pub fn redirect_for(&self, path: &str) -> Option<&RedirectRule> {
        self.redirects.iter().find(|rule| rule.source == path)
    }
}
