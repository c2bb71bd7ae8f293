//! Configuration module

use std::env;
use std::time::Duration;

use crate::constants;
use crate::error::{AppError, AppResult};
use crate::logic::connection::{
    check_page_host, select_endpoint, ConnectionError, Endpoint, ReconnectPolicy,
};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host the viewer is deployed under (`host` or `host:port`)
    pub page_host: String,

    /// Hostnames that count as local development hosts
    pub dev_hosts: Vec<String>,

    /// Unencrypted endpoint used on a development host
    pub dev_endpoint: String,

    /// Streaming path appended to the page host
    pub stream_path: String,

    /// Explicit event source URL; bypasses endpoint selection when set
    pub source_url: Option<String>,

    /// Event window capacity (N)
    pub window_capacity: usize,

    /// Max lines in the log panel
    pub feed_limit: usize,

    /// Base-map GeoJSON resource
    pub basemap_url: String,

    /// Fetch the base map once at startup instead of handing the URL to the renderer
    pub basemap_prefetch: bool,

    /// What the session does after the connection closes
    pub reconnect: ReconnectPolicy,

    /// Frame server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_host: constants::DEFAULT_PAGE_HOST.to_string(),
            dev_hosts: constants::DEFAULT_DEV_HOSTS.iter().map(|h| h.to_string()).collect(),
            dev_endpoint: constants::DEFAULT_DEV_ENDPOINT.to_string(),
            stream_path: constants::DEFAULT_STREAM_PATH.to_string(),
            source_url: None,
            window_capacity: constants::DEFAULT_WINDOW_CAPACITY,
            feed_limit: constants::DEFAULT_FEED_LIMIT,
            basemap_url: constants::DEFAULT_BASEMAP_URL.to_string(),
            basemap_prefetch: false,
            reconnect: ReconnectPolicy::Backoff {
                initial: Duration::from_millis(constants::DEFAULT_RECONNECT_INITIAL_MS),
                max: Duration::from_millis(constants::DEFAULT_RECONNECT_MAX_MS),
            },
            port: constants::DEFAULT_PORT,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let reconnect = match env::var("ATTACKMAP_RECONNECT")
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Ok("manual") | Ok("none") => ReconnectPolicy::Manual,
            _ => ReconnectPolicy::Backoff {
                initial: Duration::from_millis(
                    parse_var("ATTACKMAP_RECONNECT_INITIAL_MS")
                        .unwrap_or(constants::DEFAULT_RECONNECT_INITIAL_MS),
                ),
                max: Duration::from_millis(
                    parse_var("ATTACKMAP_RECONNECT_MAX_MS")
                        .unwrap_or(constants::DEFAULT_RECONNECT_MAX_MS),
                ),
            },
        };

        Self {
            page_host: env::var("ATTACKMAP_PAGE_HOST").unwrap_or(defaults.page_host),

            dev_hosts: env::var("ATTACKMAP_DEV_HOSTS")
                .map(|s| parse_list(&s))
                .unwrap_or(defaults.dev_hosts),

            dev_endpoint: env::var("ATTACKMAP_DEV_ENDPOINT").unwrap_or(defaults.dev_endpoint),

            stream_path: env::var("ATTACKMAP_STREAM_PATH").unwrap_or(defaults.stream_path),

            source_url: env::var("ATTACKMAP_SOURCE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),

            window_capacity: parse_var("ATTACKMAP_WINDOW_CAPACITY")
                .unwrap_or(defaults.window_capacity),

            feed_limit: parse_var("ATTACKMAP_FEED_LIMIT").unwrap_or(defaults.feed_limit),

            basemap_url: env::var("ATTACKMAP_BASEMAP_URL").unwrap_or(defaults.basemap_url),

            basemap_prefetch: env::var("ATTACKMAP_BASEMAP_PREFETCH")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.basemap_prefetch),

            reconnect,

            port: parse_var("PORT").unwrap_or(defaults.port),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.window_capacity == 0 {
            return Err(AppError::Config("window capacity must be at least 1".to_string()));
        }
        if self.feed_limit == 0 {
            return Err(AppError::Config("feed limit must be at least 1".to_string()));
        }
        check_page_host(self.page_host.trim()).map_err(|e| AppError::Config(e.to_string()))?;
        self.endpoint().map_err(|e| AppError::Config(e.to_string()))?;
        if let ReconnectPolicy::Backoff { initial, max } = self.reconnect {
            if initial.is_zero() || initial > max {
                return Err(AppError::Config(format!(
                    "reconnect backoff must satisfy 0 < initial ({:?}) <= max ({:?})",
                    initial, max
                )));
            }
        }
        Ok(())
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Event source endpoint: the explicit URL if configured, otherwise
    /// chosen from the page host
    pub fn endpoint(&self) -> Result<Endpoint, ConnectionError> {
        match &self.source_url {
            Some(url) => Endpoint::parse(url),
            None => select_endpoint(
                &self.page_host,
                &self.dev_hosts,
                &self.dev_endpoint,
                &self.stream_path,
            ),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes"
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
