//! Heuristics for deciding whether an observed request looks like an API call.
//!
//! Deliberately shallow: substring prefixes, a version-segment regex, and a
//! static-asset extension blocklist. The point is recall — a path that is
//! neither a static asset nor the document root is worth reporting.

use aho_corasick::AhoCorasick;
use regex::Regex;
use std::sync::OnceLock;

// Third-party analytics/ad hosts. Their traffic is real network activity but
// never a load-test target, so it is dropped before classification.
const TRACKER_HOSTS: &[&str] = &[
    "doubleclick.net",
    "googlesyndication.com",
    "googletagmanager.com",
    "googletagservices.com",
    "adservice.google.",
    "google-analytics.com",
    "analytics.google.com",
    "amazon-adsystem.com",
    "ads.twitter.com",
    "ads.linkedin.com",
    "criteo.com",
    "taboola.com",
    "outbrain.com",
    "adnxs.com",
    "segment.io/v1",
    "segment.com/v1",
    "mixpanel.com/track",
    "hotjar.com",
    "mouseflow.com",
    "fullstory.com",
    "nr-data.net",
    "sentry.io",
    "connect.facebook.net",
    "cookielaw.org",
    "cookiebot.com",
    "onetrust.com",
];

static TRACKER_MATCHER: OnceLock<AhoCorasick> = OnceLock::new();

fn tracker_matcher() -> &'static AhoCorasick {
    TRACKER_MATCHER.get_or_init(|| {
        // Patterns are simple substrings; Aho-Corasick gives a linear-time scan.
        AhoCorasick::new(TRACKER_HOSTS).expect("valid tracker patterns")
    })
}

static VERSION_SEGMENT_RE: OnceLock<Regex> = OnceLock::new();
static STATIC_ASSET_RE: OnceLock<Regex> = OnceLock::new();

fn version_segment_re() -> &'static Regex {
    VERSION_SEGMENT_RE.get_or_init(|| Regex::new(r"/v\d+/").expect("valid version regex"))
}

fn static_asset_re() -> &'static Regex {
    STATIC_ASSET_RE.get_or_init(|| {
        Regex::new(r"(?i)\.(js|css|png|jpg|jpeg|gif|svg|ico|woff|woff2|ttf|eot)$")
            .expect("valid asset regex")
    })
}

/// `true` for URLs pointing at known analytics/ad infrastructure.
pub fn is_tracker_url(url: &str) -> bool {
    tracker_matcher().is_match(url)
}

/// `true` when the path ends in a static resource extension (.js, .png, ...).
pub fn is_static_asset(path: &str) -> bool {
    static_asset_re().is_match(path)
}

/// Classify a URL path as API-like.
///
/// Common API markers (`/api/`, `/v1/`, `/graphql`, `/rest/`, `/service/`)
/// qualify outright. Anything else qualifies as long as it is not a static
/// asset, not the bare root, and longer than one character — extensionless
/// paths on modern sites are usually routed to handlers, not files.
pub fn is_api_like(path: &str) -> bool {
    if path.contains("/api/")
        || version_segment_re().is_match(path)
        || path.contains("/graphql")
        || path.contains("/rest/")
        || path.contains("/service/")
    {
        return true;
    }

    !is_static_asset(path) && path != "/" && path.len() > 1
}
