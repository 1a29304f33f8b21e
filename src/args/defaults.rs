pub(crate) const APP_BANNER: &str = concat!(
    "Tensile web stress test tool v",
    env!("CARGO_PKG_VERSION")
);

/// Sent with every request so target operators can identify the traffic.
pub(crate) const DEFAULT_USER_AGENT: &str = APP_BANNER;

pub(super) const DEFAULT_URL: &str = "http://localhost/";
pub(super) const DEFAULT_REQUESTS: &str = "50";
pub(super) const DEFAULT_CONCURRENT: &str = "5";
pub(super) const DEFAULT_MAX_ERROR: &str = "1";
pub(super) const DEFAULT_CPU: &str = "1";
