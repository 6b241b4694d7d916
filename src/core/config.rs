use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// DiscoveryConfig — hardcoded defaults with API_SCOUT_* env-var overrides
// ---------------------------------------------------------------------------

pub const ENV_CHROME_EXECUTABLE: &str = "CHROME_EXECUTABLE";

/// Timings and limits for one discovery run.
///
/// Defaults mirror the interaction model: generous navigation timeout,
/// a fixed post-load wait so late XHR traffic lands, a short click loop,
/// and a final settle window before the capture set is frozen.
#[derive(Clone, Debug)]
pub struct DiscoveryConfig {
    /// Hard cap on `Page.navigate` (default 60 s).
    pub nav_timeout: Duration,
    /// Fixed wait after navigation before interacting (default 5 000 ms).
    pub post_nav_wait: Duration,
    /// Network-idle heuristic: no new resource entries for this long.
    pub settle_quiet: Duration,
    /// Give up waiting for network idle after this long.
    pub settle_timeout: Duration,
    /// Click at most this many visible clickable elements (default 8).
    pub max_clicks: usize,
    /// Pause between clicks (default 500 ms, plus a little jitter).
    pub click_pause: Duration,
    /// Final wait after interaction so triggered traffic is captured.
    pub post_interaction_wait: Duration,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Plain HTTP reachability check before launching the browser.
    pub preflight: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            nav_timeout: Duration::from_secs(60),
            post_nav_wait: Duration::from_millis(5000),
            settle_quiet: Duration::from_millis(1500),
            settle_timeout: Duration::from_millis(8000),
            max_clicks: 8,
            click_pause: Duration::from_millis(500),
            post_interaction_wait: Duration::from_millis(3000),
            viewport_width: 1920,
            viewport_height: 1080,
            preflight: true,
        }
    }
}

impl DiscoveryConfig {
    /// Defaults with `API_SCOUT_*` environment overrides applied.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            nav_timeout: Duration::from_secs(env_u64(
                "API_SCOUT_NAV_TIMEOUT_SECS",
                d.nav_timeout.as_secs(),
            )),
            post_nav_wait: Duration::from_millis(env_u64(
                "API_SCOUT_POST_NAV_WAIT_MS",
                d.post_nav_wait.as_millis() as u64,
            )),
            settle_quiet: Duration::from_millis(env_u64(
                "API_SCOUT_SETTLE_QUIET_MS",
                d.settle_quiet.as_millis() as u64,
            )),
            settle_timeout: Duration::from_millis(env_u64(
                "API_SCOUT_SETTLE_TIMEOUT_MS",
                d.settle_timeout.as_millis() as u64,
            )),
            max_clicks: env_u64("API_SCOUT_MAX_CLICKS", d.max_clicks as u64) as usize,
            click_pause: Duration::from_millis(env_u64(
                "API_SCOUT_CLICK_PAUSE_MS",
                d.click_pause.as_millis() as u64,
            )),
            post_interaction_wait: Duration::from_millis(env_u64(
                "API_SCOUT_FINAL_WAIT_MS",
                d.post_interaction_wait.as_millis() as u64,
            )),
            ..d
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// Optional override for the Chromium-family browser executable.
///
/// Default behavior is auto-discovery (see `browser::manager`). This only
/// returns a value when `CHROME_EXECUTABLE` points at an existing path.
pub fn chrome_executable_override() -> Option<String> {
    let p = std::env::var(ENV_CHROME_EXECUTABLE).ok()?;
    let p = p.trim();
    if p.is_empty() {
        return None;
    }
    if Path::new(p).exists() {
        Some(p.to_string())
    } else {
        None
    }
}
