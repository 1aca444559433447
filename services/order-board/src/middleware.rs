//! Middleware for request logging and CORS

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::CorsConfig;
use crate::metrics::get_metrics;

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let client_ip = get_client_ip(&request);

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = duration.as_millis(),
        client_ip = %client_ip,
        "Request processed"
    );
    get_metrics().record_http_request(
        method.as_str(),
        uri.path(),
        status.as_u16(),
        duration.as_secs_f64(),
    );

    response
}

/// CORS layer factory
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new().max_age(std::time::Duration::from_secs(config.max_age_seconds));

    // Configure allowed origins
    if config.allowed_origins.iter().any(|origin| origin == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure allowed methods
    let methods: Result<Vec<Method>, _> = config
        .allowed_methods
        .iter()
        .map(|method| method.parse())
        .collect();

    if let Ok(methods) = methods {
        cors = cors.allow_methods(methods);
    }

    // Configure allowed headers
    let headers: Result<Vec<HeaderName>, _> = config
        .allowed_headers
        .iter()
        .map(|header| header.parse())
        .collect();

    if let Ok(headers) = headers {
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Extract client IP from proxy headers
fn get_client_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next());
    if let Some(first_ip) = forwarded {
        return first_ip.trim().to_string();
    }

    request
        .headers()
        .get("X-Real-IP")
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| "unknown".to_string(), str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_client_ip_from_forwarded_for() {
        let request = Request::builder()
            .header("X-Forwarded-For", "10.0.0.7, 172.16.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(get_client_ip(&request), "10.0.0.7");
    }

    #[test]
    fn test_client_ip_fallbacks() {
        let request = Request::builder()
            .header("X-Real-IP", "192.168.1.20")
            .body(Body::empty())
            .unwrap();
        assert_eq!(get_client_ip(&request), "192.168.1.20");

        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(get_client_ip(&request), "unknown");
    }
}
