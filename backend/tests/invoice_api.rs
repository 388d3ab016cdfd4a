//! End-to-end invoice flows through the real handlers and sync service.
//!
//! The local store and billing provider are in-memory doubles, so these tests
//! pin the HTTP contract and the cross-store ordering without a database.

#[path = "invoice_api/doubles.rs"]
mod doubles;

use std::sync::Arc;

use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test as actix_test, web};
use backend::Trace;
use backend::domain::InvoiceSyncService;
use backend::domain::ports::{FixtureCredentialProvider, InvoiceCommand, InvoiceQuery};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{cors, invoices, json_config};
use doubles::{InMemoryContacts, InMemoryInvoices, ProviderCall, ScriptedProvider};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

struct Harness {
    invoices: Arc<InMemoryInvoices>,
    contacts: Arc<InMemoryContacts>,
    provider: Arc<ScriptedProvider>,
}

impl Harness {
    fn with_provider(provider: ScriptedProvider) -> Self {
        Self {
            invoices: Arc::new(InMemoryInvoices::default()),
            contacts: Arc::new(InMemoryContacts::default()),
            provider: Arc::new(provider),
        }
    }

    fn state(&self) -> web::Data<HttpState> {
        let service = Arc::new(InvoiceSyncService::new(
            Arc::clone(&self.invoices),
            Arc::clone(&self.contacts),
            Arc::clone(&self.provider),
            Arc::new(DefaultClock),
        ));
        let command: Arc<dyn InvoiceCommand> = service.clone();
        let query: Arc<dyn InvoiceQuery> = service;
        web::Data::new(HttpState::new(
            Arc::new(FixtureCredentialProvider),
            command,
            query,
        ))
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, header::HeaderMap, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(self.state())
                .app_data(json_config())
                .wrap(cors::cors_headers())
                .wrap(Trace)
                .service(
                    web::scope("/api/v1")
                        .configure(invoices::configure)
                        .configure(cors::configure_preflight),
                ),
        )
        .await;

        let request = actix_test::TestRequest::default().method(method).uri(uri);
        let request = match body {
            Some(body) => request.set_json(body),
            None => request,
        };
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = actix_test::read_body(response).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };
        (status, headers, body)
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::with_provider(ScriptedProvider::default())
}

fn invoice_payload(client: Value, quantity: u32, total: u32) -> Value {
    json!({
        "client": client,
        "items": [{ "name": "Consulting", "quantity": quantity, "price": 10 }],
        "payments": [{ "date": "2026-01-20", "amount": total, "paymentMethod": "transfer" }],
        "date": "2026-01-15",
        "total": total,
    })
}

#[rstest]
#[actix_web::test]
async fn create_then_read_back_from_local_store(harness: Harness) {
    let (status, _, created) = harness
        .send(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(json!("7"), 2, 20)),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["outcome"], "FullySynced");
    assert_eq!(created["invoice"]["total"], 20.0);
    assert_eq!(created["invoice"]["providerId"], "101");
    assert_eq!(created["invoice"]["providerNumber"], "FE-101");
    assert_eq!(created["provider"]["id"], "101");

    let id = created["invoice"]["id"].as_str().expect("local id");
    let (status, _, fetched) = harness
        .send(Method::GET, &format!("/api/v1/invoices/{id}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["source"], "local");
    assert_eq!(fetched["invoice"]["providerId"], "101");
    assert_eq!(fetched["invoice"]["items"][0]["quantity"], 2);
    assert_eq!(fetched["invoice"]["dueDate"], "2026-01-15");
}

#[rstest]
#[actix_web::test]
async fn provider_outage_keeps_the_local_invoice() {
    let harness = Harness::with_provider(ScriptedProvider::failing());

    let (status, _, created) = harness
        .send(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(json!("7"), 2, 20)),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["outcome"], "LocalOnly");
    assert!(
        created["reason"]
            .as_str()
            .is_some_and(|reason| reason.contains("billing provider create failed"))
    );
    assert_eq!(created["invoice"]["providerId"], Value::Null);

    let id = created["invoice"]["id"].as_str().expect("local id");
    let (status, _, fetched) = harness
        .send(Method::GET, &format!("/api/v1/invoices/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["source"], "local");

    let (status, _, listing) = harness.send(Method::GET, "/api/v1/invoices", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["outcome"], "LocalOnly");
    assert_eq!(listing["localInvoices"].as_array().map(Vec::len), Some(1));
    assert_eq!(listing["remoteInvoices"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn embedded_client_is_provisioned_before_the_invoice(harness: Harness) {
    let client = json!({ "name": "Acme Ltda", "email": "billing@acme.test" });

    let (status, _, created) = harness
        .send(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(client, 2, 20)),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["invoice"]["client"], "C-101");
    assert_eq!(
        harness.provider.calls(),
        vec![
            ProviderCall::CreateContact("Acme Ltda".to_owned()),
            ProviderCall::CreateInvoice,
        ]
    );
    let contacts = harness.contacts.snapshot();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].provider_id.as_str(), "C-101");
}

#[rstest]
#[actix_web::test]
async fn invalid_payload_touches_neither_store(harness: Harness) {
    let (status, _, body) = harness
        .send(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(json!("7"), 2, 25)),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert!(harness.invoices.snapshot().is_empty());
    assert!(harness.provider.calls().is_empty());
}

#[rstest]
#[actix_web::test]
async fn oversized_price_is_rejected_as_bad_request(harness: Harness) {
    let payload = json!({
        "client": "7",
        "items": [{ "name": "x", "quantity": 2, "price": "79228162514264337593543950335" }],
        "date": "2026-01-15",
        "total": "1",
    });

    let (status, _, body) = harness
        .send(Method::POST, "/api/v1/invoices", Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["violations"][0]["field"], "items[0].price");
    assert_eq!(
        body["details"]["violations"][0]["message"],
        "amount out of range"
    );
    assert!(harness.invoices.snapshot().is_empty());
    assert!(harness.provider.calls().is_empty());
}

#[rstest]
#[actix_web::test]
async fn update_and_delete_follow_the_provider_link(harness: Harness) {
    let (_, _, created) = harness
        .send(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(json!("7"), 2, 20)),
        )
        .await;
    let id = created["invoice"]["id"].as_str().expect("local id").to_owned();
    let uri = format!("/api/v1/invoices/{id}");

    let (status, _, updated) = harness
        .send(Method::PUT, &uri, Some(invoice_payload(json!("7"), 3, 30)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["outcome"], "FullySynced");
    assert_eq!(updated["invoice"]["total"], 30.0);
    assert_eq!(updated["invoice"]["providerId"], "101");
    assert_eq!(
        harness.provider.document("101").expect("provider copy")["total"],
        "30"
    );

    let (status, _, deleted) = harness.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["outcome"], "FullySynced");
    assert!(harness.invoices.snapshot().is_empty());
    assert!(harness.provider.document("101").is_none());

    let (status, _, _) = harness.send(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn delete_reports_local_only_when_provider_fails(harness: Harness) {
    let (_, _, created) = harness
        .send(
            Method::POST,
            "/api/v1/invoices",
            Some(invoice_payload(json!("7"), 2, 20)),
        )
        .await;
    let id = created["invoice"]["id"].as_str().expect("local id").to_owned();
    harness.provider.set_failing(true);

    let (status, _, deleted) = harness
        .send(Method::DELETE, &format!("/api/v1/invoices/{id}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["outcome"], "LocalOnly");
    assert!(harness.invoices.snapshot().is_empty());
    assert!(harness.provider.document("101").is_some());
}

#[rstest]
#[actix_web::test]
async fn provider_only_invoice_is_served_remotely(harness: Harness) {
    harness
        .provider
        .seed("555", json!({ "id": "555", "numberTemplate": { "fullNumber": "FE-555" } }));

    let (status, _, body) = harness.send(Method::GET, "/api/v1/invoices/555", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "remote");
    assert_eq!(body["providerId"], "555");
    assert_eq!(body["provider"]["numberTemplate"]["fullNumber"], "FE-555");
}

#[rstest]
#[actix_web::test]
async fn error_responses_carry_cors_and_trace_headers(harness: Harness) {
    let (status, headers, _) = harness
        .send(Method::GET, "/api/v1/invoices/missing", None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    assert!(headers.contains_key("trace-id"));
}

#[rstest]
#[actix_web::test]
async fn preflight_is_answered_without_a_handler(harness: Harness) {
    let (status, headers, _) = harness
        .send(Method::OPTIONS, "/api/v1/invoices/anything", None)
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        headers
            .get("access-control-allow-methods")
            .and_then(|value| value.to_str().ok()),
        Some("GET, POST, PUT, DELETE, OPTIONS")
    );
    assert!(harness.provider.calls().is_empty());
}
