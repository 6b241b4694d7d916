use thiserror::Error;

/// Failures that abort a discovery run.
///
/// Everything else — per-event parse errors, click failures, evaluate
/// errors — is logged and ignored; the run keeps whatever it captured.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("invalid target URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("no Chromium-family browser found — install Chrome, Chromium, or Brave, or set CHROME_EXECUTABLE")]
    BrowserNotFound,

    #[error("browser launch failed: {0}")]
    BrowserLaunchFailed(String),

    #[error("failed to open page: {0}")]
    PageFailed(String),

    #[error("navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("network capture setup failed: {0}")]
    CaptureFailed(String),
}
