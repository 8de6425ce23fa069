mod common;

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use common::{lazy_pool, send, test_jwt_config};
use edurapor::edurapor_config::{CorsConfig, PromotionConfig, RateLimitConfig};
use edurapor::router::init_router;
use edurapor::state::AppState;

fn strict_app() -> axum::Router {
    let state = AppState::new(
        lazy_pool(),
        test_jwt_config(),
        CorsConfig::default(),
        RateLimitConfig {
            enabled: true,
            per_second: 1,
            burst_size: 2,
        },
        PromotionConfig::default(),
    );
    init_router(state)
}

fn request_from(addr: &str) -> Request<Body> {
    let mut request = Request::builder()
        .method("GET")
        .uri("/api/homeroom/validate-semester-completion")
        .body(Body::empty())
        .unwrap();
    let addr: SocketAddr = addr.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

#[tokio::test]
async fn test_burst_exceeded_returns_too_many_requests() {
    let app = strict_app();

    let (first, _) = send(app.clone(), request_from("192.168.1.100:40000")).await;
    let (second, _) = send(app.clone(), request_from("192.168.1.100:40001")).await;
    let (third, body) = send(app, request_from("192.168.1.100:40002")).await;

    assert_eq!(first, StatusCode::UNAUTHORIZED);
    assert_eq!(second, StatusCode::UNAUTHORIZED);
    assert_eq!(third, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["message"].as_str().unwrap().contains("Too many requests"));
}

#[tokio::test]
async fn test_limits_are_tracked_per_ip() {
    let app = strict_app();

    for _ in 0..2 {
        send(app.clone(), request_from("10.0.0.1:5000")).await;
    }
    let (limited, _) = send(app.clone(), request_from("10.0.0.1:5000")).await;
    let (other, _) = send(app, request_from("10.0.0.2:5000")).await;

    assert_eq!(limited, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(other, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_requests_without_peer_address_are_not_limited() {
    let app = strict_app();

    for _ in 0..5 {
        let request = Request::builder()
            .method("GET")
            .uri("/api/homeroom/validate-semester-completion")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
