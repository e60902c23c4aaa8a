//! Integration tests for EditionGuardClient against a stubbed API
//!
//! Every test mounts wiremock expectations on a local server and points the
//! client's base URL at it.

use editionguard::api::{to_params, BookListEntry, ClientConfig, EditionGuardClient, Params, TransactionUpdate};
use editionguard::{DrmType, EditionGuardError};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<<>>\n%%EOF\n";

const EPUB_BYTES: &[u8] = include_bytes!("fixtures/minimal.epub");

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

async fn setup() -> (MockServer, EditionGuardClient) {
    let server = MockServer::start().await;
    let client = client_for(&server, ClientConfig::builder());
    (server, client)
}

fn client_for(server: &MockServer, builder: editionguard::api::ClientConfigBuilder) -> EditionGuardClient {
    let config = builder
        .api_token(TOKEN)
        .base_url(format!("{}/api/v2/", server.uri()))
        .build();
    EditionGuardClient::with_config(config).unwrap()
}

fn params(value: Value) -> Params {
    to_params(&value).unwrap()
}

// ── Read operations ─────────────────────────────────────────────

#[tokio::test]
async fn get_book_returns_decoded_json() {
    let (server, client) = setup().await;
    let body = json!({ "id": 7, "title": "Dune", "drm": 2, "resource_id": "urn:uuid:abc" });

    Mock::given(method("GET"))
        .and(path("/api/v2/book/7"))
        .and(header("Authorization", "Token test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.get_book(7).await.unwrap(), body);
}

#[tokio::test]
async fn list_operations_pass_optional_query() {
    let (server, client) = setup().await;
    let body = json!({ "count": 1, "results": [{ "id": "x" }] });

    for endpoint in ["book", "transaction", "master_link", "download"] {
        Mock::given(method("GET"))
            .and(path(format!("/api/v2/{}", endpoint)))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;
    }

    let optional = params(json!({ "page": 2 }));
    assert_eq!(client.get_books(&optional).await.unwrap(), body);
    assert_eq!(client.get_transactions(&optional).await.unwrap(), body);
    assert_eq!(client.get_master_links(&optional).await.unwrap(), body);
    assert_eq!(client.download(&optional).await.unwrap(), body);
}

#[tokio::test]
async fn single_item_reads_hit_their_paths() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/transaction/tx-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "tx-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/master_link/ml-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ml-1" })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.get_transaction("tx-1").await.unwrap(), json!({ "id": "tx-1" }));
    assert_eq!(client.get_master_link("ml-1").await.unwrap(), json!({ "id": "ml-1" }));
}

#[tokio::test]
async fn non_success_status_is_surfaced_with_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/book/99"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"detail":"Not found."}"#))
        .mount(&server)
        .await;

    let err = client.get_book(99).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.body(), Some(r#"{"detail":"Not found."}"#));
    match err {
        EditionGuardError::Status { status, endpoint, .. } => {
            assert_eq!(status, 404);
            assert_eq!(endpoint, "book/99");
        }
        other => panic!("expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/book"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.get_books(&Params::new()).await.unwrap_err();
    assert!(matches!(err, EditionGuardError::Decode { .. }));
    assert_eq!(err.body(), Some("<html>maintenance</html>"));
}

#[tokio::test]
async fn empty_success_body_decodes_to_null() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/download"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert_eq!(client.download(&Params::new()).await.unwrap(), Value::Null);
}

// ── Book uploads ────────────────────────────────────────────────

#[tokio::test]
async fn save_book_sends_multipart_with_sniffed_file_name() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/book"))
        .and(query_param("title", "Dune"))
        .and(query_param("drm", "2"))
        .and(body_string_contains(r#"name="resource""#))
        .and(body_string_contains(r#"filename="book.pdf""#))
        .and(body_string_contains("%PDF-1.4"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 12 })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.save_book("Dune", PDF_BYTES, &Params::new()).await.unwrap();
    assert_eq!(result, json!({ "id": 12 }));
}

#[tokio::test]
async fn save_book_names_epub_upload_from_its_content() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/book"))
        .and(query_param("title", "Dune"))
        .and(query_param("drm", "2"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 15 })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.save_book("Dune", EPUB_BYTES, &Params::new()).await.unwrap();
    assert_eq!(result, json!({ "id": 15 }));

    // Zip headers make the body invalid UTF-8, so inspect the raw bytes.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert!(contains(body, br#"name="resource""#));
    assert!(contains(body, br#"filename="book.epub""#));
    assert!(contains(body, EPUB_BYTES));
}

#[tokio::test]
async fn save_book_caller_params_override_defaults() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/book"))
        .and(query_param("title", "Dune"))
        .and(query_param("drm", "1"))
        .and(query_param("expiry_days", "30"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 13 })))
        .expect(1)
        .mount(&server)
        .await;

    let optional = params(json!({ "drm": DrmType::AdobeLegacy, "expiry_days": 30 }));
    let result = client.save_book("Dune", PDF_BYTES.to_vec(), &optional).await.unwrap();
    assert_eq!(result, json!({ "id": 13 }));
}

#[tokio::test]
async fn save_book_unknown_payload_has_no_extension() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/book"))
        .and(body_string_contains(r#"filename="book""#))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 14 })))
        .expect(1)
        .mount(&server)
        .await;

    client.save_book("Notes", b"".to_vec(), &Params::new()).await.unwrap();
}

#[tokio::test]
async fn update_book_patches_with_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v2/book/12"))
        .and(query_param("title", "Dune (2nd ed.)"))
        .and(query_param("drm", "2"))
        .and(body_string_contains(r#"filename="book.pdf""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 12, "title": "Dune (2nd ed.)" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .update_book(12, "Dune (2nd ed.)", PDF_BYTES, &Params::new())
        .await
        .unwrap();
    assert_eq!(result["title"], json!("Dune (2nd ed.)"));
}

#[tokio::test]
async fn generate_book_links_sends_count() {
    let (server, client) = setup().await;
    let body = json!(["https://example.com/a", "https://example.com/b"]);

    Mock::given(method("POST"))
        .and(path("/api/v2/book/12/generate_links"))
        .and(query_param("links_count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.generate_book_links(12, 2).await.unwrap(), body);
}

// ── Deletes and deliveries ──────────────────────────────────────

#[tokio::test]
async fn deletes_report_true_on_no_content() {
    let (server, client) = setup().await;

    for endpoint in ["book/3", "transaction/tx-3", "master_link/ml-3"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/api/v2/{}", endpoint)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
    }

    assert!(client.delete_book(3).await.unwrap());
    assert!(client.delete_transaction("tx-3").await.unwrap());
    assert!(client.delete_master_link("ml-3").await.unwrap());
}

#[tokio::test]
async fn deletes_report_false_on_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"detail":"Not found."}"#))
        .mount(&server)
        .await;

    assert!(!client.delete_book(404).await.unwrap());
    assert!(!client.delete_transaction("missing").await.unwrap());
    assert!(!client.delete_master_link("missing").await.unwrap());
}

#[tokio::test]
async fn deliver_book_link_merges_optional() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/deliver-book-link"))
        .and(query_param("resource_id", "urn:uuid:abc"))
        .and(query_param("email", "reader@example.com"))
        .and(query_param("full_name", "Jane Reader"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "sent" })))
        .expect(1)
        .mount(&server)
        .await;

    let optional = params(json!({ "full_name": "Jane Reader" }));
    assert!(client
        .deliver_book_link("urn:uuid:abc", "reader@example.com", &optional)
        .await
        .unwrap());
}

#[tokio::test]
async fn deliver_book_links_flattens_book_list() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/deliver-book-links"))
        .and(query_param("email", "reader@example.com"))
        .and(query_param("book_list[0][resource_id]", "urn:uuid:abc"))
        .and(query_param("book_list[0][quantity]", "3"))
        .and(query_param("book_list[1][resource_id]", "urn:uuid:def"))
        .and(query_param("book_list[1][quantity]", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let books = vec![
        BookListEntry::new("urn:uuid:abc", 3),
        BookListEntry::new("urn:uuid:def", 1),
    ];
    assert!(client
        .deliver_book_links(&books, "reader@example.com", &Params::new())
        .await
        .unwrap());
}

#[tokio::test]
async fn delivery_rejection_reports_false() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/deliver-book-link"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "email": ["Enter a valid email address."] })))
        .mount(&server)
        .await;

    assert!(!client
        .deliver_book_link("urn:uuid:abc", "not-an-email", &Params::new())
        .await
        .unwrap());
}

// ── Transactions and master links ───────────────────────────────

#[tokio::test]
async fn create_transaction_sends_resource_id() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/transaction"))
        .and(query_param("resource_id", "urn:uuid:abc"))
        .and(query_param("show_instructions", "0"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "tx-9", "download_link": "https://example.com/dl" })))
        .expect(1)
        .mount(&server)
        .await;

    let optional = params(json!({ "show_instructions": false }));
    let result = client.create_transaction("urn:uuid:abc", &optional).await.unwrap();
    assert_eq!(result["id"], json!("tx-9"));
}

#[tokio::test]
async fn update_transaction_sends_every_field() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/v2/transaction/tx-9"))
        .and(query_param("resource_id", "urn:uuid:abc"))
        .and(query_param("show_instructions", "1"))
        .and(query_param("watermark_name", "Jane Reader"))
        .and(query_param("watermark_email", ""))
        .and(query_param("watermark_phone", ""))
        .and(query_param("watermark_place_begin", "1"))
        .and(query_param("watermark_place_end", "0"))
        .and(query_param("watermark_place_random", "0"))
        .and(query_param("watermark_place_random_count", ""))
        .and(query_param("uses_remaining", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "tx-9", "uses_remaining": 3 })))
        .expect(1)
        .mount(&server)
        .await;

    let update = TransactionUpdate {
        resource_id: "urn:uuid:abc".to_string(),
        show_instructions: true,
        watermark_name: "Jane Reader".to_string(),
        watermark_place_begin: true,
        uses_remaining: "3".to_string(),
        ..TransactionUpdate::default()
    };

    let result = client.update_transaction("tx-9", &update, &Params::new()).await.unwrap();
    assert_eq!(result["uses_remaining"], json!(3));
}

#[tokio::test]
async fn master_link_create_and_update() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/master_link"))
        .and(query_param("resource_id", "urn:uuid:abc"))
        .and(query_param("uses_remaining", "10"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "ml-1" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v2/master_link/ml-1"))
        .and(query_param("resource_id", "urn:uuid:def"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "ml-1", "resource_id": "urn:uuid:def" })))
        .expect(1)
        .mount(&server)
        .await;

    let optional = params(json!({ "uses_remaining": 10 }));
    let created = client.create_master_link("urn:uuid:abc", &optional).await.unwrap();
    assert_eq!(created["id"], json!("ml-1"));

    let updated = client
        .update_master_link("ml-1", "urn:uuid:def", &Params::new())
        .await
        .unwrap();
    assert_eq!(updated["resource_id"], json!("urn:uuid:def"));
}

// ── Auth and transport ──────────────────────────────────────────

#[tokio::test]
async fn rotated_token_is_used_on_next_call() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/book/1"))
        .and(header("Authorization", "Token test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/book/1"))
        .and(header("Authorization", "Token rotated-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "rotated": true })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.get_book(1).await.unwrap(), json!({ "id": 1 }));

    client.set_api_token("rotated-token").await;
    assert_eq!(client.api_token().await, "rotated-token");
    assert_eq!(client.get_book(1).await.unwrap(), json!({ "id": 1, "rotated": true }));
}

#[tokio::test]
async fn rejected_token_is_an_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid token." })))
        .mount(&server)
        .await;

    let err = client.get_master_links(&Params::new()).await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let config = ClientConfig::builder()
        .api_token(TOKEN)
        .base_url("http://127.0.0.1:1/api/v2/")
        .timeout(Duration::from_secs(5))
        .build();
    let client = EditionGuardClient::with_config(config).unwrap();

    let err = client.get_book(1).await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {:?}", err);
    assert_eq!(err.status(), None);

    let err = client.delete_book(1).await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {:?}", err);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    let client = client_for(&server, ClientConfig::builder().timeout(Duration::from_millis(100)));

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = client.get_books(&Params::new()).await.unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {:?}", err);
}
