use std::time::{Duration, Instant};

use time::macros::date;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crpt_api_client::error::CrptError;
use crpt_api_client::transport::{HttpTransport, Transport};
use crpt_api_client::types::{DocType, Document, Product};
use crpt_api_client::{CrptClient, DocumentSubmitter, RateLimitConfig, Signature};

const CREATE_PATH: &str = "/api/v3/lk/documents/create";

fn build_client(server: &MockServer, limit: u32, window: Duration) -> CrptClient {
    let transport = HttpTransport::builder()
        .base_url(server.uri())
        .build()
        .unwrap();
    let config = RateLimitConfig::new(limit, window).unwrap();
    DocumentSubmitter::with_transport(transport, config).unwrap()
}

fn sample_document() -> Document {
    Document {
        description: Some("shoes batch".to_string()),
        doc_id: "doc-100".to_string(),
        doc_status: "DRAFT".to_string(),
        doc_type: DocType::LpIntroduceGoods,
        import_request: false,
        owner_inn: "7700000000".to_string(),
        participant_inn: "7700000001".to_string(),
        producer_inn: "7700000002".to_string(),
        production_date: date!(2024 - 02 - 20),
        production_type: "OWN_PRODUCTION".to_string(),
        products: vec![Product {
            certificate_document: None,
            certificate_document_date: None,
            certificate_document_number: None,
            owner_inn: "7700000000".to_string(),
            producer_inn: "7700000002".to_string(),
            production_date: date!(2024 - 02 - 20),
            tnved_code: "6403990000".to_string(),
            uit_code: Some("0104600439931256".to_string()),
            uitu_code: None,
        }],
        reg_date: date!(2024 - 02 - 21),
        reg_number: None,
    }
}

#[tokio::test]
async fn test_submit_document_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .and(header("content-type", "application/json; charset=UTF-8"))
        .and(header("accept", "application/json"))
        .and(header("signature", "c2lnbmF0dXJl"))
        .and(body_partial_json(serde_json::json!({
            "doc_id": "doc-100",
            "doc_type": "LP_INTRODUCE_GOODS",
            "production_date": "2024-02-20",
            "products": [{ "tnved_code": "6403990000" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": "b2ef5c9e-6b39-4f4b-9a8a-6d1c4a1d2f10"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, 5, Duration::from_secs(60));
    let response = client
        .submit(&sample_document(), &Signature::new("c2lnbmF0dXJl"))
        .await
        .unwrap();

    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["value"], "b2ef5c9e-6b39-4f4b-9a8a-6d1c4a1d2f10");
    assert_eq!(client.limiter().budget().await, 4);
}

#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, 5, Duration::from_secs(60));
    let error = client
        .submit(&sample_document(), &Signature::new("sig"))
        .await
        .unwrap_err();

    assert!(error.is_transport_failure());
    match error {
        CrptError::Api(api_error) => {
            assert_eq!(api_error.status, 500);
            assert_eq!(api_error.body, "Internal Server Error");
            assert!(api_error.is_server_error());
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_submission_waits_for_next_window() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let client = build_client(&server, 1, Duration::from_millis(300));
    let start = Instant::now();

    let first = client.submit(&sample_document(), &Signature::new("sig")).await;
    assert!(matches!(first, Err(CrptError::Api(_))));

    let second = client.submit(&sample_document(), &Signature::new("sig")).await;
    assert!(matches!(second, Err(CrptError::Api(_))));
    assert!(start.elapsed() >= Duration::from_millis(250));
}

#[tokio::test]
async fn test_unreachable_registry_is_transport_failure() {
    // Nothing listens on the discard port.
    let transport = HttpTransport::builder()
        .base_url("http://127.0.0.1:9")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let result = transport.send(b"{}".to_vec(), &Signature::new("sig")).await;
    let error = result.unwrap_err();
    assert!(error.is_transport_failure());
    assert_eq!(error.status(), None);
}

#[tokio::test]
async fn test_invalid_signature_header_is_rejected_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = build_client(&server, 5, Duration::from_secs(60));
    let result = client
        .submit(&sample_document(), &Signature::new("line\nbreak"))
        .await;

    assert!(matches!(result, Err(CrptError::InvalidRequest(_))));
    assert_eq!(client.limiter().budget().await, 5);
}
