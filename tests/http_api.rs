mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{ensure_logging, seeded_glob};
use winoom::inter::{self, REQUEST_ID_HEADER};

fn app() -> Router {
    inter::router(seeded_glob())
}

async fn call(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_owned()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn as_json(text: &str) -> Value {
    serde_json::from_str(text).unwrap()
}

fn john() -> Value {
    json!({"ID": 979, "name": "John Doe", "class": "4/B", "status": "Active"})
}

fn jane() -> Value {
    json!({"ID": 486, "name": "Jane Smith", "class": "2/A", "status": "Active"})
}

#[tokio::test]
async fn list_seeded_students() {
    ensure_logging();
    let (status, body) = call(&app(), Method::GET, "/api/students", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([john()]));
}

#[tokio::test]
async fn append_then_list() {
    ensure_logging();
    let app = app();

    let batch = json!([jane()]).to_string();
    let (status, body) = call(&app, Method::POST, "/api/students", &batch).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([john(), jane()]));

    // Same batch again changes nothing.
    let (_, body) = call(&app, Method::POST, "/api/students", &batch).await;
    assert_eq!(as_json(&body), json!([john(), jane()]));

    let (_, body) = call(&app, Method::GET, "/api/students", "").await;
    assert_eq!(as_json(&body), json!([john(), jane()]));
}

#[tokio::test]
async fn single_object_body() {
    let app = app();
    let event = json!({"title": "Sports Day", "date": "2025-05-20"});
    let (status, body) = call(&app, Method::POST, "/api/events", &event.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body).as_array().unwrap().last(), Some(&event));
}

#[tokio::test]
async fn missing_field_rejected() {
    ensure_logging();
    let app = app();

    let bad = json!([jane(), {"ID": 12, "name": "Ali Veli", "class": "3/C"}]).to_string();
    let (status, body) = call(&app, Method::POST, "/api/students", &bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("students"), "{}", body);
    assert!(body.contains("status"), "{}", body);

    let (_, body) = call(&app, Method::GET, "/api/students", "").await;
    assert_eq!(as_json(&body), json!([john()]));
}

#[tokio::test]
async fn undecodable_bodies() {
    let app = app();
    for body in ["", "not json", "[1, 2]", "\"books\""] {
        let (status, _) = call(&app, Method::POST, "/api/books", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", body);
    }
}

#[tokio::test]
async fn unknown_entity() {
    let (status, body) = call(&app(), Method::GET, "/api/classrooms", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("classrooms"));
}

#[tokio::test]
async fn csv_upload() {
    ensure_logging();
    let app = app();

    let csv = "ID,name,class,status\n486,Jane Smith,2/A,Active\n979,John Doe,4/B,Active\n";
    let (status, body) = call(&app, Method::POST, "/api/students/upload", csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(as_json(&body), json!([john(), jane()]));

    let csv = "ID,name,class,status\n12,Ali Veli,3/C,\n";
    let (status, body) = call(&app, Method::POST, "/api/students/upload", csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("status"));

    // No status column at all: nothing from the upload lands.
    let csv = "ID,name,class\n12,Ali Veli,3/C\n13,Ayse Kaya,1/A\n";
    let (status, body) = call(&app, Method::POST, "/api/students/upload", csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("status"), "{}", body);

    let (_, body) = call(&app, Method::GET, "/api/students", "").await;
    assert_eq!(as_json(&body), json!([john(), jane()]));
}

#[tokio::test]
async fn role_nav() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/api/roles/Advisor/nav", "").await;
    assert_eq!(status, StatusCode::OK);
    let v = as_json(&body);
    assert_eq!(v["role"], json!("Advisor"));
    assert!(v["nav"].as_array().unwrap().contains(&json!({"label": "Teachers", "path": "/teachers"})));
    assert!(v["dashboard"].as_array().unwrap().contains(&json!("teachers")));

    let (status, _) = call(&app, Method::GET, "/api/roles/Janitor/nav", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn message() {
    let (status, body) = call(&app(), Method::GET, "/api/message", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(as_json(&body)["message"].is_string());
}

#[tokio::test]
async fn request_id_echoed() {
    let req = Request::builder()
        .uri("/api/books")
        .header(REQUEST_ID_HEADER, "abc-123")
        .body(Body::empty())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");

    let req = Request::builder().uri("/api/books").body(Body::empty()).unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert!(resp.headers().get(REQUEST_ID_HEADER).is_none());
}
