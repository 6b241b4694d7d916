//! Native browser management using `chromiumoxide`.
//!
//! Finds a usable Chromium-family executable, builds the headless launch
//! config, and owns the browser process plus its CDP event-handler task for
//! the duration of one discovery run.

use crate::core::config::{chrome_executable_override, DiscoveryConfig};
use crate::error::DiscoveryError;
use chromiumoxide::browser::BrowserConfig;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::path::Path;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Find a usable Chromium-family browser executable.
///
/// Resolution order:
/// 1. `CHROME_EXECUTABLE` env var (explicit override)
/// 2. PATH scan — finds package-manager installs on all platforms
/// 3. OS-specific well-known install paths
pub fn find_browser_executable() -> Option<String> {
    if let Some(p) = chrome_executable_override() {
        return Some(p);
    }

    if let Ok(path_var) = std::env::var("PATH") {
        let candidates = [
            "google-chrome",
            "chromium",
            "chromium-browser",
            "chrome",
            "brave-browser",
            "brave",
        ];
        for dir in std::env::split_paths(&path_var) {
            for exe in candidates {
                let full = dir.join(exe);
                if full.exists() {
                    return Some(full.to_string_lossy().to_string());
                }
            }
        }
    }

    #[cfg(target_os = "macos")]
    {
        let candidates = [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
        ];
        for c in candidates {
            if Path::new(c).exists() {
                return Some(c.to_string());
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        let candidates = [
            "/usr/bin/google-chrome",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/bin/brave-browser",
            "/usr/local/bin/chromium",
        ];
        for c in candidates {
            if Path::new(c).exists() {
                return Some(c.to_string());
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        let candidates = [
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\BraveSoftware\Brave-Browser\Application\brave.exe",
            r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
        ];
        for c in candidates {
            if Path::new(c).exists() {
                return Some(c.to_string());
            }
        }
    }

    None
}

/// `true` when a usable browser binary is present on this machine.
pub fn browser_available() -> bool {
    find_browser_executable().is_some()
}

/// Build a headless `BrowserConfig` for endpoint discovery.
///
/// Flag set combines CI-safety flags (`--no-sandbox`,
/// `--disable-dev-shm-usage`) with permissive networking so cross-origin XHR
/// and self-signed staging certs don't hide traffic from the capture
/// (`--disable-web-security`, `--ignore-certificate-errors`).
fn build_headless_config(exe: &str, cfg: &DiscoveryConfig) -> Result<BrowserConfig, DiscoveryError> {
    BrowserConfig::builder()
        .chrome_executable(exe)
        .viewport(Viewport {
            width: cfg.viewport_width,
            height: cfg.viewport_height,
            device_scale_factor: Some(1.0),
            emulating_mobile: false,
            is_landscape: true,
            has_touch: false,
        })
        .window_size(cfg.viewport_width, cfg.viewport_height)
        .arg("--disable-gpu")
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-web-security")
        .arg("--ignore-certificate-errors")
        .arg("--disable-extensions")
        .arg("--disable-background-networking")
        .arg("--disable-sync")
        .arg("--disable-translate")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--hide-scrollbars")
        .arg("--mute-audio")
        .build()
        .map_err(DiscoveryError::BrowserLaunchFailed)
}

/// One live headless browser plus the task draining its CDP event channel.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch(cfg: &DiscoveryConfig) -> Result<Self, DiscoveryError> {
        let exe = find_browser_executable().ok_or(DiscoveryError::BrowserNotFound)?;
        info!("🚀 Launching headless browser: {}", exe);

        let browser_config = build_headless_config(&exe, cfg)?;
        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| DiscoveryError::BrowserLaunchFailed(format!("{}: {}", exe, e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {}", e);
                }
            }
        });

        Ok(Self {
            browser,
            handler_task,
        })
    }

    pub async fn new_page(&self) -> Result<Page, DiscoveryError> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| DiscoveryError::PageFailed(e.to_string()))
    }

    /// Close the browser process and stop the handler task. Best effort —
    /// a close error is logged, never propagated.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close error (non-fatal): {}", e);
        }
        self.handler_task.abort();
    }
}
