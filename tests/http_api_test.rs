//! HTTP 接口集成测试

#![cfg(feature = "http")]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use flare_naming_core::naming::{InMemoryRegistry, Instance, Service};
use flare_naming_core::sync::ReconciliationRequest;
use flare_naming_core::{Config, NamingRouter, NamingState};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

const PEER: &str = "10.0.0.2:8848";

fn create_test_config() -> Config {
    Config::from_toml_str(
        r#"
        [cluster]
        servers = ["10.0.0.1:8848", "10.0.0.2:8848"]
        queue_capacity = 8
        "#,
    )
    .expect("valid config")
}

fn create_test_router() -> (Router, mpsc::Receiver<ReconciliationRequest>) {
    let config = create_test_config();
    let registry = Arc::new(InMemoryRegistry::new());
    for (name, env) in [("svcA", "prod"), ("svcB", "staging"), ("svcC", "prod")] {
        registry
            .add_or_replace_service(
                Service::new(&config.naming.default_namespace, name)
                    .with_metadata("env", env)
                    .with_instance(Instance::new("10.0.0.1", 8080)),
            )
            .expect("store service");
    }

    let (state, rx) = NamingState::from_config(registry, &config);
    let router = NamingRouter::new(state, config.http.context_path.clone()).build();
    (router, rx)
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.oneshot(request).await.expect("infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
}

fn status_request(doms_status: &str, client_ip: &str) -> Request<Body> {
    let body = serde_urlencoded::to_string([("domsStatus", doms_status), ("clientIP", client_ip)])
        .expect("encodable form");
    Request::post("/nacos/v1/ns/service/status")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("valid request")
}

fn list_uri(selector: &str) -> String {
    let query = serde_urlencoded::to_string([
        ("pageNo", "1"),
        ("pageSize", "10"),
        ("selector", selector),
    ])
    .expect("encodable query");
    format!("/nacos/v1/ns/service/list?{}", query)
}

#[tokio::test]
async fn test_status_endpoint_enqueues_mismatch() {
    let (router, mut rx) = create_test_router();

    let payload = r#"{"namespaceId":"public","entries":{"svcA":"stale"}}"#;
    let (status, body) = send(router, status_request(payload, PEER)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let request = rx.try_recv().expect("one request queued");
    assert_eq!(request.service_name, "svcA");
    assert_eq!(request.peer_checksum, "stale");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_status_endpoint_malformed_payload() {
    let (router, mut rx) = create_test_router();

    let (status, body) = send(router, status_request("{broken", PEER)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "fail");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_status_endpoint_unknown_peer() {
    let (router, mut rx) = create_test_router();

    let (status, body) = send(router, status_request("svcA@@stale", "192.168.0.9:8848")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).expect("json error body");
    assert_eq!(error["code"], "UNKNOWN_PEER");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_list_endpoint_with_selector() {
    let (router, _rx) = create_test_router();

    let uri = list_uri(r#"{"type":"label","expression":"SERVICE.metadata.env = 'prod'"}"#);
    let (status, body) = send(router, Request::get(uri).body(Body::empty()).expect("request")).await;

    assert_eq!(status, StatusCode::OK);
    let page: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(page["count"], 2);
    assert_eq!(page["doms"], serde_json::json!(["svcA", "svcC"]));
}

#[tokio::test]
async fn test_list_endpoint_unknown_selector_type() {
    let (router, _rx) = create_test_router();

    let uri = list_uri(r#"{"type":"range"}"#);
    let (status, _) = send(router, Request::get(uri).body(Body::empty()).expect("request")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checksum_endpoint() {
    let (router, _rx) = create_test_router();

    let request = Request::put("/nacos/v1/ns/service/checksum?serviceName=svcA")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(router.clone(), request).await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(value["checksum"].as_str().map(str::len), Some(64));

    let request = Request::put("/nacos/v1/ns/service/checksum?serviceName=missing")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(router, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_detail_and_search_endpoints() {
    let (router, _rx) = create_test_router();

    let request = Request::get("/nacos/v1/ns/service?serviceName=svcB")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(router.clone(), request).await;
    assert_eq!(status, StatusCode::OK);
    let detail: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(detail["name"], "svcB");
    assert_eq!(detail["namespaceId"], "public");
    assert_eq!(detail["metadata"]["env"], "staging");
    assert_eq!(detail["selector"]["type"], "none");

    let request = Request::get("/nacos/v1/ns/service/search?expr=svc%5BAC%5D")
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(router, request).await;
    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(value["doms"], serde_json::json!(["svcA", "svcC"]));
}

#[tokio::test]
async fn test_server_list_comes_from_config() {
    let (router, mut rx) = create_test_router();

    let (status, body) = send(router.clone(), status_request("svcA@@stale", "10.0.0.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert_eq!(rx.try_recv().expect("queued").peer_address, "10.0.0.1");

    let (status, _) = send(router, status_request("svcA@@stale", "10.0.0.3:8848")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_queue_capacity_comes_from_config() {
    let (router, mut rx) = create_test_router();

    let payload = "svcA@@x@@@svcB@@x@@@svcC@@x";
    for _ in 0..4 {
        let (status, _) = send(router.clone(), status_request(payload, PEER)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let mut queued = 0;
    while rx.try_recv().is_ok() {
        queued += 1;
    }
    assert_eq!(queued, 8);
}
