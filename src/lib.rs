//! Edge request-enrichment service.
//!
//! A short chain of request interceptors that runs in front of every page
//! and asset request, deriving geolocation and language context before the
//! request reaches application code and propagating that context via
//! response headers (or, for the reserved geo-detect path, a JSON body).

pub mod config;
pub mod middleware;
pub mod pipeline;
pub mod server;

pub use pipeline::{Enricher, Enrichment, Language, LocationContext};
pub use server::{app, AppState};
