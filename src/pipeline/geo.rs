//! Geolocation resolution: upstream signal to a complete location context.
//!
//! The hosting edge platform attaches a coarse geolocation context to each
//! request before application code runs. That signal may be partially or
//! fully absent; this module resolves it into a `LocationContext` where
//! every field is always populated, falling back per field to a fixed
//! default location.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Name of the request header carrying the platform geolocation context.
///
/// The value is a JSON document with the shape of [`GeoSignal`]. A missing
/// or unparseable header is treated as a fully absent signal.
pub const GEO_SIGNAL_HEADER: &str = "x-edge-geo";

/// Raw upstream geolocation signal, as supplied by the edge platform.
///
/// Every field is optional; the platform populates whatever it knows.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GeoSignal {
    pub country: Option<CountrySignal>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub subdivision: Option<SubdivisionSignal>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CountrySignal {
    /// ISO 3166-1 alpha-2 code, uppercase.
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubdivisionSignal {
    /// Subdivision (state/region) code.
    pub code: Option<String>,
}

impl GeoSignal {
    /// Extract the geolocation signal from request headers.
    ///
    /// # Returns
    /// * `Some(GeoSignal)` if the header is present and parses as JSON
    /// * `None` if the header is missing, not valid UTF-8, or malformed —
    ///   callers treat all three identically (resolve to defaults)
    pub fn from_headers(headers: &HeaderMap) -> Option<GeoSignal> {
        let raw = headers.get(GEO_SIGNAL_HEADER)?.to_str().ok()?;
        match serde_json::from_str(raw) {
            Ok(signal) => Some(signal),
            Err(e) => {
                tracing::debug!("Unparseable {} header, using defaults: {}", GEO_SIGNAL_HEADER, e);
                None
            }
        }
    }
}

/// Fully-resolved location for one request.
///
/// Invariant: every field is always populated. Absence of upstream data is
/// resolved to the default location, never to a missing field; `is_default`
/// is the only trustworthy signal that defaults were used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    pub country: String,
    pub city: String,
    pub timezone: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    /// True iff the upstream country code was absent. Other fields do not
    /// participate in this flag: a single field decides whether the
    /// location is trusted as real.
    #[serde(rename = "isDefault")]
    pub is_default: bool,
}

/// Fallback values used whenever an upstream field is missing.
#[derive(Debug, Clone)]
pub struct DefaultLocation {
    pub country: &'static str,
    pub city: &'static str,
    pub timezone: &'static str,
    pub region: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for DefaultLocation {
    fn default() -> Self {
        Self {
            country: "BR",
            city: "Rio de Janeiro",
            timezone: "America/Sao_Paulo",
            region: "RJ",
            latitude: -22.9068,
            longitude: -43.2045,
        }
    }
}

/// Resolves upstream geolocation signals into complete location contexts.
///
/// The fallback table is injected at construction so tests can substitute
/// an alternate default location without process-wide side effects.
#[derive(Debug, Clone, Default)]
pub struct GeoResolver {
    defaults: DefaultLocation,
}

impl GeoResolver {
    /// Create a resolver with a specific fallback table.
    pub fn new(defaults: DefaultLocation) -> Self {
        Self { defaults }
    }

    /// Resolve an optional upstream signal into a complete context.
    ///
    /// Total function: always returns a fully populated `LocationContext`,
    /// however sparse the input. Fallback is per field, not all-or-nothing:
    /// a signal carrying only a city still contributes that city.
    ///
    /// # Arguments
    /// * `signal` - The upstream geolocation signal, if any was attached
    pub fn resolve(&self, signal: Option<&GeoSignal>) -> LocationContext {
        let country_code = signal
            .and_then(|s| s.country.as_ref())
            .and_then(|c| c.code.as_deref());

        LocationContext {
            is_default: country_code.is_none(),
            country: country_code.unwrap_or(self.defaults.country).to_string(),
            city: signal
                .and_then(|s| s.city.as_deref())
                .unwrap_or(self.defaults.city)
                .to_string(),
            timezone: signal
                .and_then(|s| s.timezone.as_deref())
                .unwrap_or(self.defaults.timezone)
                .to_string(),
            region: signal
                .and_then(|s| s.subdivision.as_ref())
                .and_then(|s| s.code.as_deref())
                .unwrap_or(self.defaults.region)
                .to_string(),
            latitude: signal
                .and_then(|s| s.latitude)
                .unwrap_or(self.defaults.latitude),
            longitude: signal
                .and_then(|s| s.longitude)
                .unwrap_or(self.defaults.longitude),
        }
    }
}
