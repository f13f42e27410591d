//! HTTP transport tests driven through the axum `Router` with `oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use entity_router::http::{build_router, AppState, X_REQUEST_ID};

mod common;

fn router() -> Router {
    let app = common::sample_app();
    build_router(&app.config, AppState::from(&app))
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_single_key_entity() {
    let (status, body) = get(router(), "/Customers(2)").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "Id": 2, "Name": "Grace" }));
}

#[tokio::test]
async fn test_whole_collection() {
    let (status, body) = get(router(), "/Orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_composite_key_entity() {
    let (status, body) = get(router(), "/ComplexKeyTypes(SectionNumber=4,SectionSpot=7)").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "SectionNumber": 4, "SectionSpot": 7 }));
}

#[tokio::test]
async fn test_operation_overloads() {
    let (status, body) = get(router(), "/ComplexKeyTypes/BestComplexKeyType(value=3,multiplier=4)").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "SectionNumber": 12, "SectionSpot": 12 }));

    let (status, body) = get(router(), "/ComplexKeyTypes/BestComplexKeyType(something='lots')").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "SectionNumber": 9, "SectionSpot": 9 }));

    let (_, body) = get(router(), "/ComplexKeyTypes/BestComplexKeyType(something=%27little%27)").await;
    assert_eq!(body, json!({ "SectionNumber": 3, "SectionSpot": 3 }));

    let (_, body) = get(router(), "/ComplexKeyTypes/BestComplexKeyType(something='other')").await;
    assert_eq!(body, json!({ "SectionNumber": -1, "SectionSpot": -1 }));
}

#[tokio::test]
async fn test_unroutable_is_404() {
    let (status, body) = get(router(), "/Unknowns(1)").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "Unroutable");

    let (status, body) = get(router(), "/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "Unroutable");
}

#[tokio::test]
async fn test_undecodable_path_is_json_400() {
    let (status, body) = get(router(), "/Customers(%FF)").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "InvalidPath");
}

#[tokio::test]
async fn test_missing_entity_is_handler_404() {
    let (status, body) = get(router(), "/Customers(42)").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NotFound");
    assert_eq!(body["error"]["message"], "not found: Customers(42)");
}

#[tokio::test]
async fn test_route_listing() {
    let (status, body) = get(router(), "/$routes").await;
    assert_eq!(status, StatusCode::OK);
    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 7);
    assert_eq!(routes[1]["template"], "Customers({id})");
    assert_eq!(routes[1]["handler"], "CustomersHandler.Get(int32)");
}

#[tokio::test]
async fn test_request_id_assigned_and_propagated() {
    let response = router()
        .oneshot(Request::builder().uri("/Customers(1)").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key(X_REQUEST_ID));

    let response = router()
        .oneshot(
            Request::builder()
                .uri("/Customers(1)")
                .header(X_REQUEST_ID, "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[X_REQUEST_ID], "req-123");
}
