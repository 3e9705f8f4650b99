pub mod auth;
pub mod connect;
pub mod preview;
pub mod push;
pub mod status;

/// How long to wait for an authorization flow abandoned in the browser.
pub const AUTH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(300);
