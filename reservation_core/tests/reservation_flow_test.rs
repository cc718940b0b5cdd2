use axum::{extract::Path, http::StatusCode, routing::post, Json, Router};
use parking_lot::Mutex;
use reservation_core::{
    config::{AppConfig, StoreBackend},
    create_app_with_config,
    form::{FieldUpdate, FormController, HttpGateway, SubmitOutcome, SUBMIT_RETRY_MESSAGE},
    AppState, PhotoType, StoreSchema,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

const RESET_DELAY: Duration = Duration::from_millis(100);

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Stands in for the hosted REST endpoint. Rejects a second row with the same phone.
async fn spawn_postgrest_stub() -> (String, Arc<Mutex<Vec<(String, Value)>>>) {
    let rows: Arc<Mutex<Vec<(String, Value)>>> = Arc::new(Mutex::new(Vec::new()));
    let rows_in_handler = rows.clone();

    let router = Router::new().route(
        "/rest/v1/:table",
        post(move |Path(table): Path<String>, Json(body): Json<Value>| {
            let rows = rows_in_handler.clone();
            async move {
                let row = body[0].clone();
                let mut rows = rows.lock();
                if rows.iter().any(|(_, r)| r["phone"] == row["phone"]) {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({
                            "code": "23505",
                            "message": "duplicate key value violates unique constraint \"studio_reservation_phone_key\""
                        })),
                    );
                }
                let mut inserted = row.clone();
                inserted["id"] = json!(rows.len() + 1);
                rows.push((table, row));
                (StatusCode::CREATED, Json(json!([inserted])))
            }
        }),
    );

    (serve(router).await, rows)
}

async fn spawn_site(config: AppConfig) -> String {
    let state = AppState::from_config(&config).unwrap();
    serve(create_app_with_config(state, &config)).await
}

fn fill(controller: &FormController, phone: &str) {
    let month = controller.month_options()[0].value;
    controller.update(FieldUpdate::Name("오세린".to_string()));
    controller.update(FieldUpdate::Phone(phone.to_string()));
    controller.update(FieldUpdate::TogglePhotoType(PhotoType::Family));
    controller.update(FieldUpdate::TogglePhotoType(PhotoType::LargeFamily));
    controller.update(FieldUpdate::ShootingMonth(Some(month)));
    controller.update(FieldUpdate::PrivacyConsent(true));
}

#[tokio::test]
async fn test_form_to_hosted_table_round_trip() {
    let (store_url, rows) = spawn_postgrest_stub().await;

    let mut config = AppConfig::default();
    config.store.url = store_url;
    config.store.anon_key = "public-anon-key".to_string();
    let site = spawn_site(config).await;

    let controller = FormController::new(Arc::new(HttpGateway::new(&site)), RESET_DELAY);
    fill(&controller, "010-1000-2000");

    assert_eq!(controller.submit().await, SubmitOutcome::Submitted);
    assert!(controller.snapshot().is_submitted);

    {
        let rows = rows.lock();
        assert_eq!(rows.len(), 1);
        let (table, row) = &rows[0];
        assert_eq!(table, "studio_reservation");
        assert_eq!(row["photo_types"], json!(["family", "largefamily"]));
        assert_eq!(row["privacy_consent"], json!(true));
        assert_eq!(row["shooting_month"], json!(controller.month_options()[0].value.to_string()));
    }

    tokio::time::sleep(RESET_DELAY * 3).await;
    let state = controller.snapshot();
    assert!(!state.is_submitted);
    assert!(state.fields.name.is_empty());
    assert!(state.fields.photo_types.is_empty());
}

#[tokio::test]
async fn test_duplicate_is_reported_inline() {
    let (store_url, rows) = spawn_postgrest_stub().await;

    let mut config = AppConfig::default();
    config.store.url = store_url;
    config.store.anon_key = "public-anon-key".to_string();
    let site = spawn_site(config).await;

    let first = FormController::new(Arc::new(HttpGateway::new(&site)), RESET_DELAY);
    fill(&first, "010-4000-5000");
    assert_eq!(first.submit().await, SubmitOutcome::Submitted);

    let second = FormController::new(Arc::new(HttpGateway::new(&site)), RESET_DELAY);
    fill(&second, "010-4000-5000");
    let outcome = second.submit().await;

    match outcome {
        SubmitOutcome::Failed(message) => assert!(message.starts_with("duplicate key value")),
        other => panic!("expected failure, got {:?}", other),
    }
    let state = second.snapshot();
    assert!(!state.is_submitting);
    assert_eq!(state.fields.phone, "010-4000-5000");
    assert_eq!(rows.lock().len(), 1);
}

#[tokio::test]
async fn test_legacy_layout_through_http() {
    let (store_url, rows) = spawn_postgrest_stub().await;

    let mut config = AppConfig::default();
    config.store.url = store_url;
    config.store.anon_key = "public-anon-key".to_string();
    config.store.schema = StoreSchema::Reservations;
    let site = spawn_site(config).await;

    let controller = FormController::new(Arc::new(HttpGateway::new(&site)), RESET_DELAY);
    fill(&controller, "010-6000-7000");
    assert_eq!(controller.submit().await, SubmitOutcome::Submitted);

    let rows = rows.lock();
    let (table, row) = &rows[0];
    assert_eq!(table, "reservations");
    assert_eq!(row["shooting_type"], json!(["family", "largefamily"]));
    assert!(row.get("photo_types").is_none());
}

#[tokio::test]
async fn test_unreachable_site_asks_for_retry() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let controller = FormController::new(
        Arc::new(HttpGateway::new(format!("http://{}", addr))),
        RESET_DELAY,
    );
    fill(&controller, "010-8000-9000");

    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Failed(SUBMIT_RETRY_MESSAGE.to_string())
    );
    assert_eq!(
        controller.snapshot().submit_error.as_deref(),
        Some(SUBMIT_RETRY_MESSAGE)
    );
}

#[tokio::test]
async fn test_memory_backend_site() {
    let mut config = AppConfig::default();
    config.store.backend = StoreBackend::Memory;
    let site = spawn_site(config).await;

    let controller = FormController::new(Arc::new(HttpGateway::new(&site)), RESET_DELAY);
    fill(&controller, "010-1212-3434");

    assert_eq!(controller.submit().await, SubmitOutcome::Submitted);
}
