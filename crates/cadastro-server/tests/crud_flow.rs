// SPDX-License-Identifier: Apache-2.0

use cadastro_server::{build_router, ApiConfig, AppState};
use cadastro_store::RegistryStore;
use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_server() -> (std::net::SocketAddr, tempfile::TempDir) {
    let dir = tempdir().expect("tempdir");
    let store = RegistryStore::open(&dir.path().join("cadastro.sqlite")).expect("open store");
    let app = build_router(AppState::new(store, ApiConfig::default()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    (addr, dir)
}

async fn send(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: Option<&Value>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let payload = body.map(Value::to_string).unwrap_or_default();
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    stream.write_all(req.as_bytes()).await.expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, raw_body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), raw_body.to_string())
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("json body")
}

fn supplier_payload(cnpj: &str) -> Value {
    json!({
        "name": "Acme Ltda",
        "cnpj": cnpj,
        "address": "Rua A, 1",
        "phone": "11999998888",
        "email": "acme@example.com",
        "contact_name": "Maria"
    })
}

fn product_payload(name: &str, barcode: Option<&str>) -> Value {
    json!({
        "name": name,
        "barcode": barcode,
        "description": "Pacote 5kg",
        "quantity": 10,
        "category": "Alimentos",
        "expires_on": null,
        "image_ref": null
    })
}

#[tokio::test]
async fn crud_round_trip_returns_documented_statuses_and_shapes() {
    let (addr, _dir) = spawn_server().await;

    let (status, _, body) = send(addr, "GET", "/v1/version", None).await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body)["data"]["api_version"], "v1");

    // Supplier create, then the CNPJ collision.
    let (status, _, body) = send(
        addr,
        "POST",
        "/v1/suppliers",
        Some(&supplier_payload("11.444.777/0001-61")),
    )
    .await;
    assert_eq!(status, 201);
    let supplier = parse(&body);
    assert_eq!(supplier["data"]["cnpj"], "11.444.777/0001-61");
    assert_eq!(supplier["data"]["phone"], "(11) 99999-8888");
    let supplier_id = supplier["data"]["id"].as_i64().expect("supplier id");

    let (status, _, body) = send(
        addr,
        "POST",
        "/v1/suppliers",
        Some(&supplier_payload("11444777000161")),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(parse(&body)["error"]["code"], "DuplicateIdentifier");

    // Invalid check digit is a 400, classified as InvalidIdentifier.
    let (status, _, body) = send(
        addr,
        "POST",
        "/v1/suppliers",
        Some(&supplier_payload("11.444.777/0001-62")),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(parse(&body)["error"]["code"], "InvalidIdentifier");

    // Products: one with a barcode, a collision, one without.
    let (status, _, body) = send(
        addr,
        "POST",
        "/v1/products",
        Some(&product_payload("Arroz", Some("7891000100103"))),
    )
    .await;
    assert_eq!(status, 201);
    let product_id = parse(&body)["data"]["id"].as_i64().expect("product id");

    let (status, _, body) = send(
        addr,
        "POST",
        "/v1/products",
        Some(&product_payload("Feijao", Some("7891000100103"))),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(parse(&body)["error"]["code"], "DuplicateIdentifier");

    let (status, _, _) = send(
        addr,
        "POST",
        "/v1/products",
        Some(&product_payload("Feijao", None)),
    )
    .await;
    assert_eq!(status, 201);

    // Association lifecycle: create, duplicate, list.
    let link = json!({"supplier_id": supplier_id, "product_id": product_id});
    let (status, _, _) = send(addr, "POST", "/v1/associations", Some(&link)).await;
    assert_eq!(status, 201);

    let (status, _, body) = send(addr, "POST", "/v1/associations", Some(&link)).await;
    assert_eq!(status, 409);
    assert_eq!(parse(&body)["error"]["code"], "DuplicateAssociation");

    let (status, _, body) = send(
        addr,
        "GET",
        &format!("/v1/suppliers/{supplier_id}/products"),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body)["data"]["items"][0]["name"], "Arroz");

    // Deleting the supplier cascades to its associations.
    let (status, _, _) = send(
        addr,
        "DELETE",
        &format!("/v1/suppliers/{supplier_id}"),
        None,
    )
    .await;
    assert_eq!(status, 204);

    let (status, _, body) = send(addr, "GET", "/v1/associations", None).await;
    assert_eq!(status, 200);
    let listed = parse(&body);
    assert_eq!(listed["data"]["stats"]["returned"], 0);
    assert!(listed["data"]["items"].as_array().expect("items").is_empty());

    // The supplier is gone, so relinking reports NotFound.
    let (status, _, body) = send(addr, "POST", "/v1/associations", Some(&link)).await;
    assert_eq!(status, 404);
    assert_eq!(parse(&body)["error"]["code"], "NotFound");
}

#[tokio::test]
async fn update_endpoints_enforce_identifier_rules() {
    let (addr, _dir) = spawn_server().await;

    let (_, _, body) = send(
        addr,
        "POST",
        "/v1/suppliers",
        Some(&supplier_payload("11.444.777/0001-61")),
    )
    .await;
    let first = parse(&body)["data"]["id"].as_i64().expect("id");

    let mut second_payload = supplier_payload("11.222.333/0001-81");
    second_payload["name"] = json!("Beta SA");
    let (_, _, body) = send(addr, "POST", "/v1/suppliers", Some(&second_payload)).await;
    let second = parse(&body)["data"]["id"].as_i64().expect("id");

    // Renaming without touching the CNPJ is fine.
    let (status, _, body) = send(
        addr,
        "PUT",
        &format!("/v1/suppliers/{first}"),
        Some(&json!({"name": "Acme Renamed"})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(parse(&body)["data"]["name"], "Acme Renamed");

    // Moving onto the other supplier's CNPJ is a conflict.
    let (status, _, body) = send(
        addr,
        "PUT",
        &format!("/v1/suppliers/{second}"),
        Some(&json!({"cnpj": "11.444.777/0001-61"})),
    )
    .await;
    assert_eq!(status, 409);
    assert_eq!(parse(&body)["error"]["code"], "DuplicateIdentifier");

    // Unknown id is NotFound, non-numeric id is InvalidPayload.
    let (status, _, _) = send(
        addr,
        "PUT",
        "/v1/suppliers/9999",
        Some(&json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _, body) = send(addr, "GET", "/v1/suppliers/abc", None).await;
    assert_eq!(status, 400);
    assert_eq!(parse(&body)["error"]["code"], "InvalidPayload");

    // A body with nothing to change is rejected instead of echoing the row.
    let (status, _, body) = send(
        addr,
        "PUT",
        &format!("/v1/suppliers/{first}"),
        Some(&json!({})),
    )
    .await;
    assert_eq!(status, 400);
    let err = parse(&body);
    assert_eq!(err["error"]["code"], "InvalidPayload");
    assert_eq!(err["error"]["details"]["field_errors"][0]["field"], "body");

    let (_, _, body) = send(
        addr,
        "POST",
        "/v1/products",
        Some(&product_payload("Arroz", None)),
    )
    .await;
    let product = parse(&body)["data"]["id"].as_i64().expect("id");
    let (status, _, _) = send(
        addr,
        "PUT",
        &format!("/v1/products/{product}"),
        Some(&json!({})),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn payload_validation_reports_field_errors() {
    let (addr, _dir) = spawn_server().await;

    let (status, _, body) = send(
        addr,
        "POST",
        "/v1/products",
        Some(&json!({
            "name": "Arroz",
            "description": "Pacote",
            "quantity": -2,
            "category": "Alimentos"
        })),
    )
    .await;
    assert_eq!(status, 400);
    let err = parse(&body);
    assert_eq!(err["error"]["code"], "InvalidPayload");
    assert_eq!(
        err["error"]["details"]["field_errors"][0]["field"],
        "quantity"
    );

    // Unknown fields are rejected by the strict payload contract.
    let (status, _, _) = send(
        addr,
        "POST",
        "/v1/products",
        Some(&json!({
            "name": "Arroz",
            "description": "Pacote",
            "category": "Alimentos",
            "price": 10
        })),
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn request_id_is_propagated_or_generated() {
    let (addr, _dir) = spawn_server().await;

    let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
    let req = format!(
        "GET /v1/version HTTP/1.1\r\nHost: {addr}\r\nx-request-id: req-reuse-me\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(req.as_bytes()).await.expect("write");
    let mut response = String::new();
    stream.read_to_string(&mut response).await.expect("read");
    assert!(response.to_ascii_lowercase().contains("x-request-id: req-reuse-me"));

    let (_, head, _) = send(addr, "GET", "/v1/categories", None).await;
    assert!(head.to_ascii_lowercase().contains("x-request-id: req-"));
}

#[tokio::test]
async fn healthz_carries_a_request_id() {
    let (addr, _dir) = spawn_server().await;
    let (status, head, body) = send(addr, "GET", "/healthz", None).await;
    assert_eq!(status, 200);
    assert!(head.to_ascii_lowercase().contains("x-request-id: req-"));
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn stalled_requests_are_cut_off_with_408() {
    let dir = tempdir().expect("tempdir");
    let store = RegistryStore::open(&dir.path().join("cadastro.sqlite")).expect("open store");
    let config = ApiConfig {
        request_timeout: std::time::Duration::from_millis(50),
        ..ApiConfig::default()
    };
    let state = AppState::new(store, config);
    let app = build_router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    // Holding the store lock stalls any handler that needs it, so the
    // deadline fires deterministically.
    let _guard = state.store.lock().await;
    let (status, _, body) = send(addr, "GET", "/v1/suppliers", None).await;
    assert_eq!(status, 408);
    let err = parse(&body);
    assert_eq!(err["error"]["code"], "Timeout");
    assert_eq!(err["error"]["details"]["timeout_ms"], 50);
}

#[tokio::test]
async fn categories_endpoint_serves_the_closed_label_set() {
    let (addr, _dir) = spawn_server().await;
    let (status, _, body) = send(addr, "GET", "/v1/categories", None).await;
    assert_eq!(status, 200);
    let labels = parse(&body);
    let items = labels["data"]["items"].as_array().expect("items");
    assert!(items.iter().any(|v| v == "Alimentos"));
    assert!(items.iter().any(|v| v == "Outros"));
}
