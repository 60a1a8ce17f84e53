use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct ChartResponse {
    generation: u64,
    labels: Vec<String>,
    values: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ImportResponse {
    imported: usize,
    total: usize,
    html: String,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn write_fixtures() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut dir = std::env::temp_dir();
    dir.push(format!("diary_viewer_http_{}_{}", std::process::id(), nanos));
    std::fs::create_dir_all(&dir).unwrap();

    let files = [
        (
            "manifest.json",
            json!({ "files": ["2025-08.json", "missing.json", "2025-09.json"] }),
        ),
        (
            "2025-08.json",
            json!({ "entries": [{ "date": "2025-08-30", "weight": 41.9, "walks": 2 }] }),
        ),
        (
            "2025-09.json",
            json!({ "entries": [
                { "date": "2025-09-01", "weight": 42.5, "energy": "high" },
                { "date": "2025-09-05", "weight": null, "notes": "<b>lazy</b> day" },
                { "notes": "undated" }
            ] }),
        ),
        ("schema.json", json!({ "title": "Dog diary entry" })),
    ];
    for (name, body) in files {
        std::fs::write(dir.join(name), serde_json::to_vec_pretty(&body).unwrap()).unwrap();
    }
    dir
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/chart")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_dir = write_fixtures();
    let child = Command::new(env!("CARGO_BIN_EXE_diary_viewer"))
        .env("PORT", port.to_string())
        .env("DIARY_DATA_SOURCE", data_dir)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn view_dates(client: &Client, base_url: &str, query: &str) -> Vec<String> {
    let body: Value = client
        .get(format!("{base_url}/api/entries?{query}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["date"].as_str().unwrap().to_string())
        .collect()
}

async fn chart(client: &Client, base_url: &str) -> ChartResponse {
    client
        .get(format!("{base_url}/api/chart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_view_filters_and_sorts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let september = view_dates(&client, &server.base_url, "month=2025-09&sort=asc").await;
    assert_eq!(september, vec!["2025-09-01", "2025-09-05"]);

    let newest_first = view_dates(&client, &server.base_url, "sort=desc").await;
    assert!(newest_first.windows(2).all(|pair| pair[0] >= pair[1]));
    assert!(newest_first.contains(&"2025-08-30".to_string()));

    let unpadded = view_dates(&client, &server.base_url, "month=2025-9").await;
    assert!(unpadded.is_empty());

    let fragment = client
        .get(format!("{}/entries?month=1999", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(fragment.contains("No entries for this view."));
}

#[tokio::test]
async fn http_index_renders_cards_and_schema() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client
        .get(format!("{}/?month=2025-09&sort=asc", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("9/1/2025"));
    assert!(page.contains("Energy: high"));
    assert!(page.contains("&lt;b&gt;lazy&lt;/b&gt; day"));
    assert!(!page.contains("undated"));
    assert!(page.contains("Dog diary entry"));

    let schema: Value = client
        .get(format!("{}/api/schema", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(schema, json!({ "title": "Dog diary entry" }));
}

#[tokio::test]
async fn http_download_exports_current_view() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/download?month=2025-09&sort=desc", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()["content-type"], "application/json");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"dog-diary.json\""
    );

    let text = response.text().await.unwrap();
    assert!(text.starts_with("{\n  \"entries\": ["));
    let body: Value = serde_json::from_str(&text).unwrap();
    let dates: Vec<&str> = body["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-09-05", "2025-09-01"]);
}

#[tokio::test]
async fn http_invalid_upload_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = view_dates(&client, &server.base_url, "sort=asc").await;
    let chart_before = chart(&client, &server.base_url).await;

    for body in ["{ definitely not json", r#"{"files": ["2025-09.json"]}"#] {
        let response = client
            .post(format!("{}/api/import", server.base_url))
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(response.text().await.unwrap().starts_with("Invalid JSON"));
    }

    assert_eq!(view_dates(&client, &server.base_url, "sort=asc").await, before);
    assert_eq!(chart(&client, &server.base_url).await.generation, chart_before.generation);
}

#[tokio::test]
async fn http_oversized_upload_is_rejected_as_invalid_json() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = view_dates(&client, &server.base_url, "sort=asc").await;

    let padding = " ".repeat(diary_viewer::app::UPLOAD_LIMIT_BYTES);
    let body = format!(r#"{{"entries":[{{"date":"2025-06-01"}}]}}{padding}"#);
    let response = client
        .post(format!("{}/api/import", server.base_url))
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().starts_with("Invalid JSON"));

    assert_eq!(view_dates(&client, &server.base_url, "sort=asc").await, before);
}

#[tokio::test]
async fn http_upload_prepends_and_redraws_chart() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let chart_before = chart(&client, &server.base_url).await;
    assert_eq!(chart_before.labels.len(), chart_before.values.len());

    let response: ImportResponse = client
        .post(format!("{}/api/import?month=2025-07&sort=asc", server.base_url))
        .body(r#"{"entries":[{"date":"2025-07-15","medsGiven":true,"weight":40.2}]}"#)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response.imported, 1);
    assert!(response.total >= 5);
    assert_eq!(response.html.matches("<article").count(), 1);
    assert!(response.html.contains("Meds ✓"));

    let july = view_dates(&client, &server.base_url, "month=2025-07").await;
    assert_eq!(july, vec!["2025-07-15"]);

    let chart_after = chart(&client, &server.base_url).await;
    assert_eq!(chart_after.generation, chart_before.generation + 1);
    assert_eq!(chart_after.values.len(), chart_before.values.len() + 1);
    assert_eq!(chart_after.labels.first().map(String::as_str), Some("2025-07-15"));
    assert_eq!(chart_after.values.first().copied(), Some(40.2));

    let svg = client
        .get(format!("{}/chart.svg", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(svg.headers()["content-type"], "image/svg+xml");
    let svg = svg.text().await.unwrap();
    assert_eq!(svg.matches("<circle").count(), chart_after.values.len());
}
