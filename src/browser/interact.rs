//! In-page instrumentation and user-interaction simulation.
//!
//! The hook script is installed before navigation so `fetch` / `XHR` wrappers
//! are in place when application code first runs. Interaction is a fixed
//! sequence — click the first N visible clickable elements, then scroll to
//! half and full page height — whose only purpose is to shake loose extra
//! API traffic. Every failure in here is logged and ignored.

use crate::core::config::DiscoveryConfig;
use crate::core::types::HookedCall;
use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::Page;
use rand::distr::{Distribution, Uniform};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Wraps `window.fetch` and `XMLHttpRequest.prototype.open`, recording every
/// call into `window.__apiScoutCalls` for later harvest.
const HOOK_SCRIPT: &str = r#"
(function() {
    'use strict';
    if (window.__apiScoutInstalled) return;
    window.__apiScoutInstalled = true;
    window.__apiScoutCalls = [];

    var record = function(method, url) {
        try {
            window.__apiScoutCalls.push({
                method: String(method || 'GET').toUpperCase(),
                url: String(url)
            });
        } catch (e) {}
    };

    var originalFetch = window.fetch;
    window.fetch = function() {
        try {
            var input = arguments[0];
            var init = arguments[1] || {};
            var url = (input && input.url) ? input.url : String(input);
            record(init.method || (input && input.method) || 'GET', url);
        } catch (e) {}
        return originalFetch.apply(this, arguments);
    };

    var originalOpen = XMLHttpRequest.prototype.open;
    XMLHttpRequest.prototype.open = function(method, url) {
        record(method, url);
        return originalOpen.apply(this, arguments);
    };
})();
"#;

/// Clicks the `__IDX__`-th currently visible clickable element and reports
/// what happened as a JSON string (primitives survive `Runtime.evaluate`
/// without remote-object plumbing).
const CLICK_SCRIPT_TEMPLATE: &str = r#"
(function(i) {
    var els = Array.prototype.slice.call(
        document.querySelectorAll('button, a, [role="button"], .btn')
    );
    var visible = [];
    for (var k = 0; k < els.length; k++) {
        if (els[k].offsetParent !== null) visible.push(els[k]);
    }
    if (i >= visible.length) return JSON.stringify({ done: true });
    var el = visible[i];
    var label = (el.textContent || el.innerText || '').trim().slice(0, 60);
    try { el.click(); } catch (e) {}
    return JSON.stringify({ done: false, label: label });
})(__IDX__)
"#;

#[derive(Debug, Deserialize)]
struct ClickOutcome {
    done: bool,
    #[serde(default)]
    label: Option<String>,
}

/// Install the fetch/XHR hooks so they run on every new document.
pub async fn install_hooks(page: &Page) -> Result<()> {
    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(HOOK_SCRIPT))
        .await?;
    Ok(())
}

/// Read back everything the hooks recorded. Harvest failures yield an empty
/// list — CDP capture already saw the same traffic.
pub async fn harvest_hooked_calls(page: &Page) -> Vec<HookedCall> {
    let raw = match page
        .evaluate("JSON.stringify(window.__apiScoutCalls || [])")
        .await
    {
        Ok(result) => result.into_value::<String>().ok(),
        Err(e) => {
            warn!("Hook harvest error: {}", e);
            None
        }
    };
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<HookedCall>>(&raw) {
        Ok(calls) => calls,
        Err(e) => {
            warn!("Hook harvest parse error: {}", e);
            Vec::new()
        }
    }
}

/// Click up to `cfg.max_clicks` visible clickable elements with a short pause
/// between each, then scroll to half and full page height. Returns how many
/// elements were actually clicked.
pub async fn simulate_interaction(page: &Page, cfg: &DiscoveryConfig) -> usize {
    info!("💡 Simulating page interaction...");
    let mut clicked = 0usize;

    for i in 0..cfg.max_clicks {
        let script = CLICK_SCRIPT_TEMPLATE.replace("__IDX__", &i.to_string());
        let outcome = match page.evaluate(script).await {
            Ok(result) => result
                .into_value::<String>()
                .ok()
                .and_then(|s| serde_json::from_str::<ClickOutcome>(&s).ok()),
            Err(e) => {
                warn!("Click simulation error at element {}: {}", i, e);
                None
            }
        };

        match outcome {
            Some(o) if o.done => break,
            Some(o) => {
                clicked += 1;
                debug!("🖱️ Clicked: {}", o.label.as_deref().unwrap_or("<unnamed>"));
            }
            // Evaluate failed or returned garbage; try the next index anyway.
            None => {}
        }

        tokio::time::sleep(cfg.click_pause + Duration::from_millis(pause_jitter_ms())).await;
    }

    for script in [
        "window.scrollTo(0, document.body.scrollHeight / 2);",
        "window.scrollTo(0, document.body.scrollHeight);",
    ] {
        if let Err(e) = page.evaluate(script).await {
            warn!("Scroll simulation error: {}", e);
        }
        tokio::time::sleep(Duration::from_millis(1000)).await;
    }

    clicked
}

// Small human-ish jitter on top of the fixed click pause.
fn pause_jitter_ms() -> u64 {
    let mut rng = rand::rng();
    let dist = Uniform::new(0u64, 250).unwrap();
    dist.sample(&mut rng)
}

/// Wait until the page network goes idle (no new resource entries for
/// `quiet` consecutive time) or until `timeout` has elapsed.
///
/// Polls `performance.getEntriesByType("resource").length` every 250 ms — a
/// networkidle heuristic that needs no extra CDP domains and never errors.
pub async fn wait_until_stable(page: &Page, quiet: Duration, timeout: Duration) {
    let poll = Duration::from_millis(250);
    let start = std::time::Instant::now();
    let mut last_count: u64 = 0;
    let mut stable_since = std::time::Instant::now();

    loop {
        if start.elapsed() >= timeout {
            debug!("wait_until_stable: timeout after {:?}", timeout);
            return;
        }

        let count: u64 = page
            .evaluate("performance.getEntriesByType('resource').length")
            .await
            .ok()
            .and_then(|v| v.into_value::<serde_json::Value>().ok())
            .and_then(|j| j.as_u64())
            .unwrap_or(0);

        let ready: bool = page
            .evaluate("document.readyState")
            .await
            .ok()
            .and_then(|v| v.into_value::<serde_json::Value>().ok())
            .and_then(|j| j.as_str().map(|s| s == "complete"))
            .unwrap_or(false);

        if !ready || count != last_count {
            last_count = count;
            stable_since = std::time::Instant::now();
        } else if stable_since.elapsed() >= quiet {
            debug!(
                "wait_until_stable: idle after {:?} ({} resources)",
                start.elapsed(),
                count
            );
            return;
        }

        tokio::time::sleep(poll).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_template_substitutes_index() {
        let script = CLICK_SCRIPT_TEMPLATE.replace("__IDX__", "5");
        assert!(script.contains(")(5)"));
        assert!(!script.contains("__IDX__"));
    }

    #[test]
    fn click_outcome_parses_both_shapes() {
        let done: ClickOutcome = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(done.done);
        assert!(done.label.is_none());

        let hit: ClickOutcome =
            serde_json::from_str(r#"{"done":false,"label":"Sign in"}"#).unwrap();
        assert!(!hit.done);
        assert_eq!(hit.label.as_deref(), Some("Sign in"));
    }

    #[test]
    fn hook_script_is_idempotent_by_guard() {
        assert!(HOOK_SCRIPT.contains("__apiScoutInstalled"));
        assert!(HOOK_SCRIPT.contains("__apiScoutCalls"));
    }
}
