//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.

use serde::Deserialize;

/// Server configuration composed from section configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// PostgreSQL database connection URL.
    pub database_url: String,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,

    /// OAuth provider configuration.
    pub oauth: OAuthConfig,

    /// Upstream API configuration.
    pub upstream: UpstreamConfig,

    /// Tenancy configuration.
    #[serde(default)]
    pub tenancy: TenancyConfig,
}

/// Session-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session and cached-profile duration in hours.
    /// Matches the bearer-token expiry assigned at login.
    #[serde(default = "default_session_duration_hours")]
    pub duration_hours: i64,

    /// Interval between session cleanup runs, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,
}

fn default_session_duration_hours() -> i64 {
    chalkline_platform_access::PROFILE_TTL_HOURS
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_secure_cookies() -> bool {
    true
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_hours: default_session_duration_hours(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            secure_cookies: default_secure_cookies(),
        }
    }
}

/// Configuration for the OAuth identity provider.
///
/// The provider is a plain OAuth2 authorization server; the user profile
/// is fetched from the upstream identity endpoint after the code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConfig {
    /// The provider's authorization endpoint.
    pub authorize_url: String,
    /// The provider's token endpoint.
    pub token_url: String,
    /// The OAuth2 client ID registered with the provider.
    pub client_id: String,
    /// The OAuth2 client secret.
    pub client_secret: String,
    /// The redirect URI for the OAuth2 callback.
    pub redirect_uri: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "openid,profile,email"
    #[serde(default = "default_scopes")]
    pub scopes: String,
}

fn default_scopes() -> String {
    "openid,profile,email".to_string()
}

impl OAuthConfig {
    /// Returns the OAuth2 scopes to request, parsed from the
    /// comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes.split(',').map(str::trim).collect()
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the upstream API serving identity, student auth,
    /// organization content, and the tenant directory.
    pub api_base_url: String,
}

/// Tenancy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TenancyConfig {
    /// Root domain the tenant subdomains hang off of.
    #[serde(default = "default_root_domain")]
    pub root_domain: String,

    /// Tenant label used when the request host has no recognizable
    /// subdomain (localhost, bare IPs, apex domains).
    #[serde(default = "default_fallback_subdomain")]
    pub fallback_subdomain: String,
}

fn default_root_domain() -> String {
    "chalkline.app".to_string()
}

fn default_fallback_subdomain() -> String {
    chalkline_tenancy::FALLBACK_SUBDOMAIN.to_string()
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            root_domain: default_root_domain(),
            fallback_subdomain: default_fallback_subdomain(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
