//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Environment overrides are read in `config.rs`.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "attackmap";

// ============================================
// Event source
// ============================================

/// Host the viewer is served from when nothing else is configured
pub const DEFAULT_PAGE_HOST: &str = "localhost";

/// Hostnames treated as local development hosts
pub const DEFAULT_DEV_HOSTS: &[&str] = &["localhost"];

/// Unencrypted endpoint used on a development host
pub const DEFAULT_DEV_ENDPOINT: &str = "ws://localhost:8000/ws";

/// Streaming path on the deployed host
pub const DEFAULT_STREAM_PATH: &str = "/ws";

/// Reconnect backoff bounds (milliseconds)
pub const DEFAULT_RECONNECT_INITIAL_MS: u64 = 1_000;
pub const DEFAULT_RECONNECT_MAX_MS: u64 = 30_000;

/// Queued connection events before the oldest are skipped
pub const CONNECTION_EVENT_QUEUE: usize = 256;

// ============================================
// Window & panel
// ============================================

/// Strict limit on visible attacks
pub const DEFAULT_WINDOW_CAPACITY: usize = 30;

/// Max lines in the event log panel
pub const DEFAULT_FEED_LIMIT: usize = 30;

// ============================================
// Basemap
// ============================================

/// Natural Earth 1:110m country polygons
pub const DEFAULT_BASEMAP_URL: &str =
    "https://d2ad6b4ur7yvpq.cloudfront.net/naturalearth-3.3.0/ne_110m_admin_0_countries.geojson";

/// Basemap fetch timeout (seconds)
pub const BASEMAP_TIMEOUT_SECS: u64 = 15;

// ============================================
// Frame server
// ============================================

/// Default HTTP port for the frame server
pub const DEFAULT_PORT: u16 = 8090;
