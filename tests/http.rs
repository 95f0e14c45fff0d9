use pet_diary::{router, AppState, DiaryStore, FileStore};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Deserialize)]
struct Record {
    id: i64,
    date: String,
    food: Option<f64>,
    weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartPoint {
    id: i64,
    date: String,
    food: Option<f64>,
    weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    show_charts: bool,
    points: Vec<ChartPoint>,
}

#[derive(Debug, Deserialize)]
struct AvatarPayload {
    avatar: String,
}

/// A diary server bound to an ephemeral port, backed by its own data dir.
struct TestServer {
    base_url: String,
    data_dir: PathBuf,
    task: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let data_dir = scratch_dir();
        let backend = FileStore::open(&data_dir).expect("open data dir");
        let state = AppState::new("Lolo", DiaryStore::open(Arc::new(backend)));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let addr = listener.local_addr().expect("listener address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router(state)).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            data_dir,
            task,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

fn scratch_dir() -> PathBuf {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    std::env::temp_dir().join(format!(
        "pet_diary_http_{}_{}",
        std::process::id(),
        NEXT.fetch_add(1, Ordering::SeqCst)
    ))
}

async fn add(client: &Client, server: &TestServer, body: serde_json::Value) -> reqwest::Response {
    client
        .post(server.url("/api/records"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn history(client: &Client, server: &TestServer) -> Vec<Record> {
    client
        .get(server.url("/api/records"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_duplicate_date_is_rejected() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = add(&client, &server, serde_json::json!({ "date": "2001-01-01", "weight": "4.5" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Record = response.json().await.unwrap();
    assert_eq!(created.weight, Some(4.5));
    assert_eq!(created.food, None);

    let response = add(&client, &server, serde_json::json!({ "date": "2001-01-01", "weight": "4.6" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let matching: Vec<Record> = history(&client, &server)
        .await
        .into_iter()
        .filter(|record| record.date == "2001-01-01")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, created.id);
    assert_eq!(matching[0].weight, Some(4.5));
}

#[tokio::test]
async fn http_history_and_chart_orders() {
    let server = TestServer::start().await;
    let client = Client::new();

    let later: Record = add(&client, &server, serde_json::json!({ "date": "2002-01-03", "food": "55" }))
        .await
        .json()
        .await
        .unwrap();
    let earlier: Record = add(&client, &server, serde_json::json!({ "date": "2002-01-01", "weight": 4.2 }))
        .await
        .json()
        .await
        .unwrap();
    let skipped: Record = add(&client, &server, serde_json::json!({ "date": "2002-01-02", "treats": "3" }))
        .await
        .json()
        .await
        .unwrap();

    let dates: Vec<String> = history(&client, &server)
        .await
        .into_iter()
        .filter(|record| record.date.starts_with("2002-"))
        .map(|record| record.date)
        .collect();
    assert_eq!(dates, ["2002-01-03", "2002-01-02", "2002-01-01"]);

    let chart: ChartResponse = client
        .get(server.url("/api/chart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(chart.show_charts);
    assert!(chart.points.iter().all(|point| point.id != skipped.id));

    let ours: Vec<&ChartPoint> = chart
        .points
        .iter()
        .filter(|point| point.id == later.id || point.id == earlier.id)
        .collect();
    assert_eq!(ours.len(), 2);
    assert_eq!(ours[0].id, earlier.id);
    assert_eq!(ours[0].date, "01/01");
    assert_eq!(ours[0].food, None);
    assert_eq!(ours[1].date, "01/03");
    assert_eq!(ours[1].food, Some(55.0));
    assert_eq!(ours[1].weight, None);
}

#[tokio::test]
async fn http_delete_is_idempotent_and_frees_the_date() {
    let server = TestServer::start().await;
    let client = Client::new();

    let created: Record = add(&client, &server, serde_json::json!({ "date": "2003-06-01", "food": 40 }))
        .await
        .json()
        .await
        .unwrap();
    let before = history(&client, &server).await.len();

    let response = client
        .delete(server.url(&format!("/api/records/{}", i64::MAX)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(history(&client, &server).await.len(), before);

    let response = client
        .delete(server.url(&format!("/api/records/{}", created.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(history(&client, &server).await.len(), before - 1);

    let response = add(&client, &server, serde_json::json!({ "date": "2003-06-01", "food": 45 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn http_negative_value_is_bad_request() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = add(&client, &server, serde_json::json!({ "date": "2004-02-02", "weight": -1 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(history(&client, &server)
        .await
        .iter()
        .all(|record| record.date != "2004-02-02"));
}

#[tokio::test]
async fn http_avatar_upload_replaces_default() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client
        .post(server.url("/api/avatar/upload"))
        .header("content-type", "text/plain")
        .body("not an image")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let uploaded: AvatarPayload = client
        .post(server.url("/api/avatar/upload"))
        .header("content-type", "image/png")
        .body(vec![0x89, b'P', b'N', b'G'])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(uploaded.avatar, "data:image/png;base64,iVBORw==");

    let current: AvatarPayload = client
        .get(server.url("/api/avatar"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current.avatar, uploaded.avatar);
}

#[tokio::test]
async fn http_index_renders_page() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client.get(server.url("/")).send().await.unwrap();
    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("Lolo's Diary"));
    assert!(body.contains("id=\"entry-form\""));
}

#[tokio::test]
async fn http_put_avatar_then_get() {
    let server = TestServer::start().await;
    let client = Client::new();

    let response = client
        .put(server.url("/api/avatar"))
        .json(&serde_json::json!({ "avatar": "data:image/gif;base64,R0lGODlh" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let current: AvatarPayload = client
        .get(server.url("/api/avatar"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current.avatar, "data:image/gif;base64,R0lGODlh");

    let saved = std::fs::read_to_string(server.data_dir.join("diary_avatar")).unwrap();
    assert_eq!(saved, "data:image/gif;base64,R0lGODlh");
}

#[tokio::test]
async fn http_put_blank_avatar_is_bad_request() {
    let server = TestServer::start().await;
    let client = Client::new();

    let before: AvatarPayload = client
        .get(server.url("/api/avatar"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let response = client
        .put(server.url("/api/avatar"))
        .json(&serde_json::json!({ "avatar": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after: AvatarPayload = client
        .get(server.url("/api/avatar"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after.avatar, before.avatar);
}
