//! Route classification: which requests the pipeline must leave alone.
//!
//! Both pipeline stages share one classifier parameterized by a per-stage
//! prefix list, so the two bypass sets cannot drift apart structurally.
//! The lists themselves differ on purpose: the language stage additionally
//! skips component bundles, which are fetched by client code that has no
//! use for a language header.

/// Reserved path that short-circuits with a JSON location body instead of
/// calling through to downstream content.
pub const GEO_DETECT_PATH: &str = "/api/geo-detect";

/// Prefixes neither stage touches: API routes, platform-internal
/// functions, generated build assets.
const BASE_BYPASS_PREFIXES: &[&str] = &["/api/", "/.netlify/", "/_next/"];

/// Prefixes the language stage additionally skips.
const LANGUAGE_BYPASS_PREFIXES: &[&str] = &["/api/", "/.netlify/", "/_next/", "/components/"];

/// Bypass rules for one pipeline stage.
#[derive(Debug, Clone, Copy)]
pub struct BypassRules {
    prefixes: &'static [&'static str],
}

/// Rules for the geolocation stage.
pub const GEO_BYPASS: BypassRules = BypassRules {
    prefixes: BASE_BYPASS_PREFIXES,
};

/// Rules for the language stage.
pub const LANGUAGE_BYPASS: BypassRules = BypassRules {
    prefixes: LANGUAGE_BYPASS_PREFIXES,
};

impl BypassRules {
    /// Whether a request path must pass through unmodified.
    ///
    /// A path is bypassed if it starts with any of the stage's prefixes,
    /// or if it contains a literal `.` (static-file heuristic).
    pub fn is_bypassed(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix)) || path.contains('.')
    }
}
