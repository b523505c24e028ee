//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default repair backend base URL
pub const DEFAULT_BACKEND_URL: &str = crate::constants::api::DEFAULT_BACKEND_URL;

/// Default backend request timeout in seconds
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 15;

/// Default urgency level
pub const DEFAULT_URGENCY: &str = "standard";

/// Default geolocation acquisition timeout in seconds
pub const DEFAULT_POSITION_TIMEOUT_SECS: u64 = crate::constants::location::POSITION_TIMEOUT_SECS;

/// Default app server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default app server port
pub const DEFAULT_PORT: u16 = 7878;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "repairhub";
