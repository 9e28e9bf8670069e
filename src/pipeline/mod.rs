//! Request-enrichment pipeline: geolocation and language context.
//!
//! This module is the core of the service. Per request it derives a
//! complete [`LocationContext`] from the upstream geolocation signal and a
//! [`Language`] from the resolved country plus the `Accept-Language`
//! header, with deterministic fallbacks when signals are absent.
//!
//! # Architecture
//!
//! - `geo`: upstream signal extraction and location resolution
//! - `language`: language decision over country and header signals
//! - `routing`: shared bypass classification for both stages
//!
//! Language resolution depends on geo's country output. [`Enricher`]
//! makes that ordering structural: one call resolves both, so the stages
//! cannot run out of order under any request-handling topology.
//!
//! Everything here is pure and request-scoped. Resolvers hold only their
//! immutable decision tables; no state crosses requests.

mod geo;
mod language;
mod routing;

pub use geo::{
    CountrySignal, DefaultLocation, GeoResolver, GeoSignal, LocationContext, SubdivisionSignal,
    GEO_SIGNAL_HEADER,
};
pub use language::{Language, LanguageResolver, LanguageRules};
pub use routing::{BypassRules, GEO_BYPASS, GEO_DETECT_PATH, LANGUAGE_BYPASS};

/// Result of one enrichment call: both derivations together.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub location: LocationContext,
    pub language: Language,
}

/// Composes geo and language resolution into a single per-request call.
#[derive(Debug, Clone, Default)]
pub struct Enricher {
    geo: GeoResolver,
    language: LanguageResolver,
}

impl Enricher {
    /// Create an enricher with specific resolver tables.
    pub fn new(geo: GeoResolver, language: LanguageResolver) -> Self {
        Self { geo, language }
    }

    /// Resolve location and language for one request.
    ///
    /// The language decision reads the country resolved in this same call,
    /// never a cached prior value.
    pub fn enrich(&self, signal: Option<&GeoSignal>, accept_language: Option<&str>) -> Enrichment {
        let location = self.geo.resolve(signal);
        let language = self.language.resolve(&location.country, accept_language);
        Enrichment { location, language }
    }

    /// Resolve the location only, for the geo-detect fast path.
    pub fn locate(&self, signal: Option<&GeoSignal>) -> LocationContext {
        self.geo.resolve(signal)
    }
}
