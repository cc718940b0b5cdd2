//! Route table of the reservation site

use crate::{
    error::AppError,
    handlers::{health::handle_health, reservations},
    models::request::ApiResponse,
    AppState,
};
use axum::{
    extract::State,
    http::Uri,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/photo-types", get(reservations::handle_photo_types))
        .route("/api/months", get(reservations::handle_months))
        .route("/api/reservations", post(reservations::handle_create_reservation))
        .fallback(handle_not_found)
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "message": "소중한 가족과 함께하는 특별한 순간을 아름답게 담아드립니다",
        "endpoints": {
            "health": "/health",
            "photo_types": "/api/photo-types",
            "months": "/api/months",
            "reservations": "/api/reservations"
        }
    })))
}

async fn handle_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("no route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use axum::http::StatusCode;
    use crate::models::StoreSchema;
    use crate::services::{ReservationService, UNEXPECTED_ERROR_MESSAGE};
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn setup_app(store: &MemoryStore) -> Router {
        let service = ReservationService::with_schema(Arc::new(store.clone()), StoreSchema::StudioReservation);
        create_routes().with_state(AppState::new(service))
    }

    fn reservation_body() -> Value {
        json!({
            "name": "윤서아",
            "phone": "010-7777-8888",
            "photo_types": ["family", "remind"],
            "shooting_month": "2026-12",
            "privacy_consent": true
        })
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_reservation() {
        let store = MemoryStore::new();
        let app = setup_app(&store);

        let response = app
            .oneshot(post_json("/api/reservations", reservation_body().to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"][0]["id"], json!(1));
        assert_eq!(body["data"][0]["photo_types"], json!(["family", "remind"]));
        assert_eq!(store.insert_count(), 1);
    }

    #[tokio::test]
    async fn test_store_rejection_envelope() {
        let store = MemoryStore::new();
        store.fail_next(StoreError::rejected("duplicate key"));
        let app = setup_app(&store);

        let response = app
            .oneshot(post_json("/api/reservations", reservation_body().to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            read_json(response).await,
            json!({"success": false, "error": "duplicate key"})
        );
    }

    #[tokio::test]
    async fn test_unexpected_failure_envelope() {
        let store = MemoryStore::new();
        store.fail_next(StoreError::Unexpected("pool poisoned".to_string()));
        let app = setup_app(&store);

        let response = app
            .oneshot(post_json("/api/reservations", reservation_body().to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body["error"], json!(UNEXPECTED_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_missing_consent_is_unprocessable() {
        let store = MemoryStore::new();
        let app = setup_app(&store);
        let mut body = reservation_body();
        body["privacy_consent"] = json!(false);

        let response = app
            .oneshot(post_json("/api/reservations", body.to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("개인정보 수집 및 이용에 동의해주세요."));
        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_envelope() {
        let store = MemoryStore::new();

        let mut unknown_type = reservation_body();
        unknown_type["photo_types"] = json!(["wedding"]);
        let mut bad_month = reservation_body();
        bad_month["shooting_month"] = json!("2026-1");

        for body in [
            "{not json".to_string(),
            unknown_type.to_string(),
            bad_month.to_string(),
        ] {
            let response = setup_app(&store)
                .oneshot(post_json("/api/reservations", body))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = read_json(response).await;
            assert_eq!(body["success"], json!(false));
            assert!(body["error"].is_string());
        }

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/reservations")
            .body(Body::from(reservation_body().to_string()))
            .unwrap();
        let response = setup_app(&store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        assert_eq!(store.insert_count(), 0);
    }

    #[tokio::test]
    async fn test_catalog_endpoints() {
        let store = MemoryStore::new();

        let request = Request::builder().uri("/api/photo-types").body(Body::empty()).unwrap();
        let response = setup_app(&store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["data"].as_array().map(|a| a.len()), Some(4));
        assert_eq!(body["data"][1], json!({"id": "largefamily", "label": "대가족사진 (6인 이상)"}));

        let request = Request::builder().uri("/api/months").body(Body::empty()).unwrap();
        let response = setup_app(&store).oneshot(request).await.unwrap();
        let body = read_json(response).await;
        assert_eq!(body["data"].as_array().map(|a| a.len()), Some(12));
    }

    #[tokio::test]
    async fn test_health_and_unknown_route() {
        let store = MemoryStore::new();

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = setup_app(&store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["data"]["store"], json!("memory"));
        assert_eq!(body["data"]["table"], json!("studio_reservation"));

        let request = Request::builder().uri("/api/items").body(Body::empty()).unwrap();
        let response = setup_app(&store).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            read_json(response).await,
            json!({"success": false, "error": "Not found: no route for /api/items", "status": 404})
        );
    }
}
