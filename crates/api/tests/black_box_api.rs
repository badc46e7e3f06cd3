use std::collections::HashMap;

use reqwest::StatusCode;
use serde_json::{Value, json};

use stockroom_infra::StockroomConfig;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    dir: tempfile::TempDir,
}

impl TestServer {
    async fn spawn(extra: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("failed to create data dir");
        let mut vars: HashMap<String, String> = HashMap::from([
            ("STOCKROOM_DATA_DIR".to_string(), dir.path().display().to_string()),
            ("STOCKROOM_USERNAME".to_string(), "keeper".to_string()),
            ("STOCKROOM_PASSWORD".to_string(), "s3cret".to_string()),
            ("STOCKROOM_VIEWER_USERNAME".to_string(), "floor".to_string()),
            ("STOCKROOM_VIEWER_PASSWORD".to_string(), "look".to_string()),
        ]);
        for (k, v) in extra {
            vars.insert(k.to_string(), v.to_string());
        }
        let config = StockroomConfig::from_lookup(|key| vars.get(key).cloned()).expect("valid config");

        // Same router as prod, bound to an ephemeral port.
        let app = stockroom_api::app::build_app(&config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle, dir }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, client: &reqwest::Client, username: &str, password: &str) -> String {
        let res = client
            .post(self.url("/session/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn get_json(client: &reqwest::Client, url: String, token: &str) -> (StatusCode, Value) {
    let res = client.get(url).bearer_auth(token).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

async fn post_json(client: &reqwest::Client, url: String, token: &str, body: Value) -> (StatusCode, Value) {
    let res = client.post(url).bearer_auth(token).json(&body).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::spawn(&[]).await;
    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_live_session() {
    let server = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/parts")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/parts"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(server.url("/session/login"))
        .json(&json!({ "username": "keeper", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let token = server.login(&client, "keeper", "s3cret").await;
    let (status, _) = get_json(&client, server.url("/parts"), &token).await;
    assert_eq!(status, StatusCode::OK);

    let res = client
        .post(server.url("/session/logout"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(server.url("/parts")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn viewers_can_read_but_not_write() {
    let server = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();
    let viewer = server.login(&client, "floor", "look").await;

    let (status, _) = get_json(&client, server.url("/reports/to-order"), &viewer).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        &client,
        server.url("/parts"),
        &viewer,
        json!({ "part_number": "P1", "quantity": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, _) = post_json(
        &client,
        server.url("/parts/issue"),
        &viewer,
        json!({ "part_number": "P1", "quantity": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn read_only_mode_downgrades_the_editor() {
    let server = TestServer::spawn(&[("STOCKROOM_READ_ONLY", "true")]).await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "keeper", "s3cret").await;

    let (status, _) = post_json(
        &client,
        server.url("/parts"),
        &token,
        json!({ "part_number": "P1", "quantity": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn restock_issue_and_reports_flow_through_the_csv_files() {
    let server = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "keeper", "s3cret").await;

    let (status, body) = post_json(
        &client,
        server.url("/parts"),
        &token,
        json!({
            "part_number": "P1",
            "part_name": "Bolt",
            "quantity": "10",
            "min_stock": 5,
            "unit": "pcs",
            "machine": "M1",
            "note": ""
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["part"]["quantity"], 10);
    assert_eq!(body["part"]["low_stock"], false);
    assert_eq!(body["transaction"]["action"], "Add");

    let (status, body) = post_json(
        &client,
        server.url("/parts/issue"),
        &token,
        json!({ "part_number": "P1", "quantity": 6 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["part"]["quantity"], 4);
    assert_eq!(body["part"]["low_stock"], true);

    // Rejected issue: 409, nothing written.
    let (status, body) = post_json(
        &client,
        server.url("/parts/issue"),
        &token,
        json!({ "part_number": "P1", "quantity": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["available"], 4);

    let (status, body) = get_json(&client, server.url("/parts/lookup?part_number=P1"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 4);

    let (status, body) = get_json(&client, server.url("/reports/to-order"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["part_number"], "P1");

    let (status, body) = get_json(&client, server.url("/reports/top-issued"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["total_issued"], 6);
    assert!(body[0]["last_issued_date"].is_string());

    let (status, body) = get_json(&client, server.url("/parts/search?keyword=%20bol%20"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get_json(&client, server.url("/parts/search?keyword="), &token).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = get_json(&client, server.url("/parts/autofill"), &token).await;
    assert_eq!(body[0]["part_name"], "Bolt");

    let catalog = std::fs::read_to_string(server.dir.path().join("inventory.csv")).unwrap();
    assert!(catalog.contains("P1,Bolt,4,5,pcs,M1,"));
    let log = std::fs::read_to_string(server.dir.path().join("transactions.csv")).unwrap();
    assert_eq!(log.lines().count(), 3);
}

#[tokio::test]
async fn invalid_input_and_unknown_parts_are_rejected() {
    let server = TestServer::spawn(&[]).await;
    let client = reqwest::Client::new();
    let token = server.login(&client, "keeper", "s3cret").await;

    let (status, body) = post_json(
        &client,
        server.url("/parts"),
        &token,
        json!({ "part_number": "P1", "quantity": "ten" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = post_json(
        &client,
        server.url("/parts"),
        &token,
        json!({ "part_number": "  ", "quantity": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &client,
        server.url("/parts/issue"),
        &token,
        json!({ "part_number": "P1", "quantity": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &client,
        server.url("/parts/issue"),
        &token,
        json!({ "part_number": "P9", "quantity": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = get_json(&client, server.url("/parts/lookup?part_name=Nothing"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert!(!server.dir.path().join("transactions.csv").exists());
}
