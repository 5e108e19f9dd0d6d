//! REST integration test macro for storage backends.
//!
//! The `rest_integration_tests!` macro generates HTTP-level tests that validate
//! a repository through full REST round-trips:
//! JSON → HTTP request → extractor → handler → repository → HTTP response → JSON.

/// Generate a REST integration test suite for a storage backend.
///
/// `$factory` must produce an `impl InvoiceRepository + 'static`. It may
/// contain `.await`.
///
/// # Generated Tests
///
/// ## CRUD
/// - `test_rest_create`: POST 201, fields echoed, timestamps equal
/// - `test_rest_create_minimal`: optional fields come back null
/// - `test_rest_get` / `test_rest_get_not_found` / `test_rest_get_non_integer_id`
/// - `test_rest_list` / `test_rest_list_empty`
/// - `test_rest_delete`: DELETE 200 then GET 404, second DELETE 404
///
/// ## Validation
/// - `test_rest_create_empty_body`: every required field reported
/// - `test_rest_create_invalid_status`, `test_rest_create_title_boundary`,
///   `test_rest_create_invalid_due_date`, `test_rest_create_wrong_types`
/// - `test_rest_create_rejection_stores_nothing`
/// - `test_rest_create_malformed_json`: 400
///
/// ## Filters
/// - `test_rest_filter_status`, `test_rest_filter_may_window`,
///   `test_rest_filter_invalid_date` (empty list), `test_rest_filter_repeated_key`
///   (last value wins), `test_rest_filter_empty_params`
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use invoice_api::core::service::InvoiceRepository;
            use serde_json::{Value, json};
            use std::sync::Arc;

            async fn make_server() -> TestServer {
                let repository = $factory;
                let repository: Arc<dyn InvoiceRepository> = Arc::new(repository);
                storage_harness::integration::test_server(repository)
            }

            async fn create(server: &TestServer, payload: Value) -> Value {
                let response = server.post("/api/invoices").json(&payload).await;
                response.assert_status(StatusCode::CREATED);
                response.json::<Value>()
            }

            async fn seed_filter_fixture(server: &TestServer) {
                let rows = [
                    ("INV-001", "paid", Value::from("2024-04-30")),
                    ("INV-002", "paid", Value::from("2024-05-15")),
                    ("INV-003", "sent", Value::from("2024-05-31 17:30:00")),
                    ("INV-004", "overdue", Value::from("2024-06-01")),
                    ("INV-005", "paid", Value::Null),
                ];
                for (number, status, due_date) in rows {
                    create(
                        server,
                        payload_with(json!({
                            "invoice_number": number,
                            "status": status,
                            "due_date": due_date
                        })),
                    )
                    .await;
                }
            }

            // ==============================================================
            // CRUD - Create
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create() {
                let server = make_server().await;

                let body = create(&server, valid_payload()).await;

                assert!(body["id"].as_i64().is_some());
                assert_eq!(body["invoice_number"], "INV-001");
                assert_eq!(body["customer_name"], "John Doe");
                assert_eq!(body["title"], "Monthly Service");
                assert_eq!(body["description"], "Services for May");
                assert_eq!(body["status"], "draft");
                assert_eq!(body["due_date"], "2024-05-31T00:00:00");
                assert!(body["created_at"].is_string());
                assert_eq!(body["created_at"], body["updated_at"]);
            }

            #[tokio::test]
            async fn test_rest_create_minimal() {
                let server = make_server().await;

                let body = create(
                    &server,
                    json!({
                        "invoice_number": "INV-010",
                        "customer_name": "Acme Corporation",
                        "title": "Consulting Hours",
                        "status": "sent"
                    }),
                )
                .await;

                assert_eq!(body["description"], Value::Null);
                assert_eq!(body["due_date"], Value::Null);
                assert_eq!(body["status"], "sent");
            }

            #[tokio::test]
            async fn test_rest_create_multibyte_title_at_limit() {
                let server = make_server().await;
                let title = "é".repeat(255);

                let body = create(&server, payload_with(json!({ "title": title }))).await;
                assert_eq!(body["title"].as_str().map(|t| t.chars().count()), Some(255));
            }

            // ==============================================================
            // CRUD - Get
            // ==============================================================

            #[tokio::test]
            async fn test_rest_get() {
                let server = make_server().await;
                let created = create(&server, valid_payload()).await;
                let id = created["id"].as_i64().unwrap();

                let response = server.get(&format!("/api/invoices/{}", id)).await;
                response.assert_status_ok();
                assert_eq!(response.json::<Value>(), created);
            }

            #[tokio::test]
            async fn test_rest_get_not_found() {
                let server = make_server().await;

                let response = server.get("/api/invoices/9999").await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body = response.json::<Value>();
                assert_eq!(body["message"], "Invoice with id '9999' not found");
            }

            #[tokio::test]
            async fn test_rest_get_non_integer_id() {
                let server = make_server().await;

                let response = server.get("/api/invoices/abc").await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // CRUD - List
            // ==============================================================

            #[tokio::test]
            async fn test_rest_list_empty() {
                let server = make_server().await;

                let response = server.get("/api/invoices").await;
                response.assert_status_ok();
                assert_eq!(response.json::<Value>(), json!({ "data": [] }));
            }

            #[tokio::test]
            async fn test_rest_list() {
                let server = make_server().await;
                for number in ["INV-001", "INV-002", "INV-003"] {
                    create(&server, payload_with(json!({ "invoice_number": number }))).await;
                }

                let response = server.get("/api/invoices").await;
                response.assert_status_ok();

                let body = response.json::<Value>();
                assert_eq!(body_numbers(&body), vec!["INV-001", "INV-002", "INV-003"]);
            }

            // ==============================================================
            // CRUD - Delete
            // ==============================================================

            #[tokio::test]
            async fn test_rest_delete() {
                let server = make_server().await;
                let created = create(&server, valid_payload()).await;
                let id = created["id"].as_i64().unwrap();
                let path = format!("/api/invoices/{}", id);

                let response = server.delete(&path).await;
                response.assert_status_ok();
                assert_eq!(
                    response.json::<Value>(),
                    json!({ "message": "Invoice deleted successfully", "id": id })
                );

                server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
                server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
            }

            // ==============================================================
            // Validation
            // ==============================================================

            #[tokio::test]
            async fn test_rest_create_empty_body() {
                let server = make_server().await;

                let response = server.post("/api/invoices").json(&json!({})).await;
                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

                let body = response.json::<Value>();
                assert_eq!(body["message"], "The given data was invalid.");
                for field in ["invoice_number", "customer_name", "title", "status"] {
                    assert!(body["errors"][field].is_array(), "missing error for {}", field);
                }
                assert_eq!(
                    body["errors"]["invoice_number"][0],
                    "The invoice number field is required."
                );
                assert!(body["errors"].get("description").is_none());
                assert!(body["errors"].get("due_date").is_none());
            }

            #[tokio::test]
            async fn test_rest_create_invalid_status() {
                let server = make_server().await;

                let response = server
                    .post("/api/invoices")
                    .json(&payload_with(json!({ "status": "bogus" })))
                    .await;
                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

                let body = response.json::<Value>();
                assert_eq!(body["errors"]["status"][0], "The selected status is invalid.");
                assert_eq!(body["errors"].as_object().map(|e| e.len()), Some(1));
            }

            #[tokio::test]
            async fn test_rest_create_title_boundary() {
                let server = make_server().await;

                create(&server, payload_with(json!({ "title": "a".repeat(255) }))).await;

                let response = server
                    .post("/api/invoices")
                    .json(&payload_with(json!({ "title": "a".repeat(256) })))
                    .await;
                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(
                    response.json::<Value>()["errors"]["title"][0],
                    "The title field must not be greater than 255 characters."
                );
            }

            #[tokio::test]
            async fn test_rest_create_invalid_due_date() {
                let server = make_server().await;

                let response = server
                    .post("/api/invoices")
                    .json(&payload_with(json!({ "due_date": "not-a-date" })))
                    .await;
                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(
                    response.json::<Value>()["errors"]["due_date"][0],
                    "The due date field must be a valid date."
                );
            }

            #[tokio::test]
            async fn test_rest_create_wrong_types() {
                let server = make_server().await;

                let response = server
                    .post("/api/invoices")
                    .json(&payload_with(json!({ "customer_name": 42, "description": 7 })))
                    .await;
                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

                let body = response.json::<Value>();
                assert_eq!(
                    body["errors"]["customer_name"][0],
                    "The customer name field must be a string."
                );
                assert!(body["errors"]["description"].is_array());
            }

            #[tokio::test]
            async fn test_rest_create_rejection_stores_nothing() {
                let server = make_server().await;

                server
                    .post("/api/invoices")
                    .json(&payload_without("title"))
                    .await
                    .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

                let body = server.get("/api/invoices").await.json::<Value>();
                assert_eq!(body, json!({ "data": [] }));
            }

            #[tokio::test]
            async fn test_rest_create_malformed_json() {
                let server = make_server().await;

                let response = server
                    .post("/api/invoices")
                    .text("{\"invoice_number\": ")
                    .content_type("application/json")
                    .await;
                response.assert_status(StatusCode::BAD_REQUEST);
            }

            // ==============================================================
            // Filters
            // ==============================================================

            #[tokio::test]
            async fn test_rest_filter_status() {
                let server = make_server().await;
                seed_filter_fixture(&server).await;

                let response = server.get("/api/invoices?status=paid").await;
                response.assert_status_ok();

                let body = response.json::<Value>();
                assert_eq!(body_numbers(&body), vec!["INV-001", "INV-002", "INV-005"]);
            }

            #[tokio::test]
            async fn test_rest_filter_may_window() {
                let server = make_server().await;
                seed_filter_fixture(&server).await;

                let response = server
                    .get("/api/invoices?due_date_from=2024-05-01&due_date_to=2024-05-31")
                    .await;
                response.assert_status_ok();

                let body = response.json::<Value>();
                assert_eq!(body_numbers(&body), vec!["INV-002", "INV-003"]);
            }

            #[tokio::test]
            async fn test_rest_filter_unknown_status() {
                let server = make_server().await;
                seed_filter_fixture(&server).await;

                let body = server
                    .get("/api/invoices?status=refunded")
                    .await
                    .json::<Value>();
                assert_eq!(body, json!({ "data": [] }));
            }

            #[tokio::test]
            async fn test_rest_filter_invalid_date() {
                let server = make_server().await;

                seed_filter_fixture(&server).await;

                let response = server.get("/api/invoices?due_date_from=soon").await;
                response.assert_status_ok();
                assert_eq!(response.json::<Value>(), json!({ "data": [] }));
            }

            #[tokio::test]
            async fn test_rest_filter_repeated_key() {
                let server = make_server().await;
                seed_filter_fixture(&server).await;
                create(
                    &server,
                    payload_with(json!({ "invoice_number": "INV-006", "status": "draft" })),
                )
                .await;

                let response = server.get("/api/invoices?status=paid&status=draft").await;
                response.assert_status_ok();

                let body = response.json::<Value>();
                assert_eq!(body_numbers(&body), vec!["INV-006"]);
            }

            #[tokio::test]
            async fn test_rest_filter_empty_params() {
                let server = make_server().await;
                seed_filter_fixture(&server).await;

                let body = server
                    .get("/api/invoices?status=&due_date_from=&due_date_to=")
                    .await
                    .json::<Value>();
                assert_eq!(body_numbers(&body).len(), 5);
            }
        }
    };
}
