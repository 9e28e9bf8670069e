//! The edge middleware: runs the enrichment pipeline in front of every
//! request and exposes the results as response headers, or as a JSON body
//! on the reserved geo-detect path.
//!
//! No branch here is permitted to fail the request. Resolvers are total,
//! and a header value that cannot be represented is dropped with a
//! warning. Downstream errors propagate unchanged; the middleware only
//! decorates whatever response downstream produces.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use crate::pipeline::{
    GeoSignal, LocationContext, GEO_BYPASS, GEO_DETECT_PATH, LANGUAGE_BYPASS,
};
use crate::server::AppState;

/// Response header carrying the JSON-serialized location context.
pub const LOCATION_HEADER: &str = "x-user-location";

/// Response header carrying the detected language code.
pub const LANGUAGE_HEADER: &str = "x-detected-language";

/// Enrich one request.
///
/// Order per request: the reserved geo-detect path short-circuits first
/// (it sits under the bypassed `/api/` prefix, so it must be checked
/// before classification). Then bypass rules are applied per stage; if
/// both stages bypass, downstream is called and returned untouched.
/// Otherwise a single enrichment call resolves both signals, downstream
/// runs, and each non-bypassed stage attaches its header.
pub async fn enrich_request(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let path = req.uri().path();

    if path == GEO_DETECT_PATH {
        let location = state.enricher.locate(GeoSignal::from_headers(req.headers()).as_ref());
        debug!(country = %location.country, is_default = location.is_default, "geo-detect request");
        return geo_detect_response(&location);
    }

    let geo_bypassed = GEO_BYPASS.is_bypassed(path);
    let language_bypassed = LANGUAGE_BYPASS.is_bypassed(path);

    if geo_bypassed && language_bypassed {
        return next.run(req).await;
    }

    let signal = GeoSignal::from_headers(req.headers());
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_owned());

    let enrichment = state.enricher.enrich(signal.as_ref(), accept_language.as_deref());
    debug!(
        country = %enrichment.location.country,
        language = enrichment.language.code(),
        is_default = enrichment.location.is_default,
        "request enriched"
    );

    let mut response = next.run(req).await;

    if !geo_bypassed {
        attach_location_header(&mut response, &enrichment.location);
    }
    if !language_bypassed {
        response.headers_mut().insert(
            LANGUAGE_HEADER,
            HeaderValue::from_static(enrichment.language.code()),
        );
    }

    response
}

/// The one branch that never calls downstream: a JSON body with the
/// resolved location and a wildcard CORS header.
fn geo_detect_response(location: &LocationContext) -> Response {
    let mut response = (StatusCode::OK, Json(location)).into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

fn attach_location_header(response: &mut Response, location: &LocationContext) {
    // Serialization of LocationContext cannot fail; the header value can,
    // if an upstream city carries non-ASCII. The header is then skipped,
    // never the request failed.
    let json = match serde_json::to_string(location) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize location context: {}", e);
            return;
        }
    };
    match HeaderValue::from_str(&json) {
        Ok(value) => {
            response.headers_mut().insert(LOCATION_HEADER, value);
        }
        Err(_) => {
            warn!("Location context not representable as a header value, skipping");
        }
    }
}
