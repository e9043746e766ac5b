use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use lesson_shop::Shop;
use lesson_shop::backend::HttpBackend;
use reqwest::Client;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// What the mock backend has been asked to do so far.
#[derive(Debug, Default)]
pub struct Recorded {
    pub orders: Vec<Value>,
    pub space_updates: Vec<(String, Value)>,
}

#[derive(Debug)]
struct MockData {
    lessons: Vec<Value>,
    order_response: Value,
    fail_orders: bool,
    recorded: Recorded,
}

/// Mock catalog/order service, shared between the server task and the test.
#[derive(Debug, Clone)]
pub struct MockBackend {
    data: Arc<Mutex<MockData>>,
}

impl MockBackend {
    pub fn new(lessons: Vec<Value>) -> Self {
        Self {
            data: Arc::new(Mutex::new(MockData {
                lessons,
                order_response: json!({"acknowledged": true}),
                fail_orders: false,
                recorded: Recorded::default(),
            })),
        }
    }

    pub fn with_order_response(self, body: Value) -> Self {
        self.data.lock().unwrap().order_response = body;
        self
    }

    pub fn with_failing_orders(self) -> Self {
        self.data.lock().unwrap().fail_orders = true;
        self
    }

    pub fn orders(&self) -> Vec<Value> {
        self.data.lock().unwrap().recorded.orders.clone()
    }

    pub fn space_updates(&self) -> Vec<(String, Value)> {
        self.data.lock().unwrap().recorded.space_updates.clone()
    }

    fn router(self) -> Router {
        Router::new()
            .route("/lessons", get(lessons_handler))
            .route("/lessons/{subject}", put(update_spaces_handler))
            .route("/search", get(search_handler))
            .route("/orders", post(create_order_handler))
            .with_state(self)
    }

    /// Serves the mock on an ephemeral port and returns its base url.
    pub async fn spawn(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.clone().router();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{addr}")
    }
}

async fn lessons_handler(State(mock): State<MockBackend>) -> impl IntoResponse {
    let lessons = mock.data.lock().unwrap().lessons.clone();
    Json(lessons)
}

async fn search_handler(
    State(mock): State<MockBackend>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let lessons = mock.data.lock().unwrap().lessons.clone();
    let query = params.get("q").map(|q| q.to_lowercase()).unwrap_or_default();
    if query.is_empty() {
        return Json(lessons);
    }

    let matches: Vec<Value> = lessons
        .into_iter()
        .filter(|l| {
            ["subject", "location"].iter().any(|field| {
                l.get(field)
                    .and_then(Value::as_str)
                    .is_some_and(|s| s.to_lowercase().contains(&query))
            })
        })
        .collect();
    Json(matches)
}

async fn create_order_handler(
    State(mock): State<MockBackend>,
    Json(order): Json<Value>,
) -> impl IntoResponse {
    let mut data = mock.data.lock().unwrap();
    if data.fail_orders {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})));
    }
    data.recorded.orders.push(order);
    (StatusCode::CREATED, Json(data.order_response.clone()))
}

async fn update_spaces_handler(
    State(mock): State<MockBackend>,
    Path(subject): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut data = mock.data.lock().unwrap();
    let exists = data
        .lessons
        .iter()
        .any(|l| l.get("subject").and_then(Value::as_str) == Some(subject.as_str()));
    data.recorded.space_updates.push((subject, body));

    if exists { StatusCode::OK } else { StatusCode::NOT_FOUND }
}

pub fn lesson(subject: &str, location: &str, price: f64, spaces: u32) -> Value {
    json!({
        "subject": subject,
        "location": location,
        "price": price,
        "spaces": spaces,
        "image": format!("images/{}.png", subject.to_lowercase()),
    })
}

/// Talks to the mock directly, whatever proxy the environment names.
pub fn http_shop(base_url: &str) -> Shop<HttpBackend> {
    let client = Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let backend = HttpBackend::with_client(base_url, client).unwrap();
    Shop::new(backend)
}

/// A base url nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
