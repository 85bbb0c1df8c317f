use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};

fn cors() -> CorsLayer { CorsLayer::very_permissive() }

struct TestApp {
    base_url: String,
    static_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}

const INDEX_HTML: &str = "<!doctype html><title>Employees</title><table id=\"employeeTable\"></table>";

async fn start_server() -> anyhow::Result<TestApp> {
    // Each test gets its own in-memory database and front-end directory
    let db = models::db::connect_in_memory().await?;

    let static_dir = std::env::temp_dir().join(format!("employee-frontend-{}", Uuid::new_v4()));
    std::fs::create_dir_all(&static_dir)?;
    std::fs::write(static_dir.join("index.html"), INDEX_HTML)?;

    let state = ServerState::new(db);
    let app: Router = routes::build_router(state, cors(), &static_dir.to_string_lossy());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, static_dir })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("reqwest client")
}

fn ann() -> Value {
    json!({"firstName": "Ann", "lastName": "Lee", "email": "a@x.com", "department": "Eng"})
}

async fn create(app: &TestApp, body: &Value) -> anyhow::Result<Value> {
    let res = client().post(format!("{}/api/employee", app.base_url)).json(body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_create_returns_created_with_location() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().post(format!("{}/api/employee", app.base_url)).json(&ann()).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let location = res.headers().get("location").expect("location header").to_str()?.to_string();
    let body = res.json::<Value>().await?;
    let id = body["employeeId"].as_i64().expect("employeeId");
    assert!(id > 0);
    assert_eq!(location, format!("/api/employee/{}", id));
    assert_eq!(body["firstName"], "Ann");
    assert_eq!(body["lastName"], "Lee");
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["department"], "Eng");

    // Location points at the created resource
    let res = client().get(format!("{}{}", app.base_url, location)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, body);
    Ok(())
}

#[tokio::test]
async fn e2e_create_ignores_body_id() -> anyhow::Result<()> {
    let app = start_server().await?;
    let mut body = ann();
    body["employeeId"] = json!(777);
    let created = create(&app, &body).await?;
    assert_ne!(created["employeeId"], json!(777));

    let res = client().get(format!("{}/api/employee/777", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_create_over_long_first_name_is_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let mut body = ann();
    body["firstName"] = json!("a".repeat(51));

    let res = client().post(format!("{}/api/employee", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err = res.json::<Value>().await?;
    assert_eq!(err["status"], 400);
    assert_eq!(err["title"], "Validation Error");

    let list = client().get(format!("{}/api/employee", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_create_missing_required_field_is_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/api/employee", app.base_url))
        .json(&json!({"lastName": "Lee", "email": "a@x.com"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_create_without_department() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, &json!({"firstName": "Bo", "lastName": "Kim", "email": "b@x.com"})).await?;
    assert_eq!(created["department"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn e2e_list_returns_all() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/api/employee", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));

    let a = create(&app, &ann()).await?;
    let b = create(&app, &json!({"firstName": "Bo", "lastName": "Kim", "email": "b@x.com", "department": "Ops"})).await?;

    let list = client().get(format!("{}/api/employee", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(list.len(), 2);
    assert!(list.contains(&a));
    assert!(list.contains(&b));
    Ok(())
}

#[tokio::test]
async fn e2e_get_never_issued_is_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/api/employee/4242", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let err = res.json::<Value>().await?;
    assert_eq!(err["status"], 404);
    Ok(())
}

#[tokio::test]
async fn e2e_non_numeric_id_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/api/employee/abc", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err = json_error(res).await?;
    assert_eq!(err["status"], 400);
    assert_eq!(err["detail"], "id must be an integer");

    let res = client().delete(format!("{}/api/employee/abc", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(json_error(res).await?["status"], 400);
    Ok(())
}

/// Error bodies are JSON even when the framework rejects the request
async fn json_error(res: reqwest::Response) -> anyhow::Result<Value> {
    let content_type = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "content-type was {content_type}");
    let body = res.json::<Value>().await?;
    assert!(body["title"].is_string());
    assert!(body["detail"].is_string());
    Ok(body)
}

#[tokio::test]
async fn e2e_malformed_json_is_bad_request_with_json_body() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/api/employee", app.base_url))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err = json_error(res).await?;
    assert_eq!(err["status"], 400);
    assert!(!err["detail"].as_str().unwrap_or_default().contains("key must be a string"));
    Ok(())
}

#[tokio::test]
async fn e2e_wrongly_typed_json_is_unprocessable_with_json_body() -> anyhow::Result<()> {
    let app = start_server().await?;
    let body = json!({"firstName": 5, "lastName": "Lee", "email": "a@x.com"});
    let res = client().post(format!("{}/api/employee", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    let err = json_error(res).await?;
    assert_eq!(err["status"], 422);
    assert!(!err["detail"].as_str().unwrap_or_default().contains("invalid type"));

    let created = create(&app, &ann()).await?;
    let id = created["employeeId"].as_i64().expect("employeeId");
    let res = client()
        .put(format!("{}/api/employee/{}", app.base_url, id))
        .json(&json!({"employeeId": "one", "firstName": "Ann", "lastName": "Lee", "email": "a@x.com"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_error(res).await?["status"], 422);

    let list = client().get(format!("{}/api/employee", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(list, vec![created]);
    Ok(())
}

#[tokio::test]
async fn e2e_missing_content_type_is_rejected_with_json_body() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client()
        .post(format!("{}/api/employee", app.base_url))
        .body(ann().to_string())
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json_error(res).await?["status"], 415);
    Ok(())
}

#[tokio::test]
async fn e2e_update_replaces_record() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, &ann()).await?;
    let id = created["employeeId"].as_i64().expect("employeeId");

    let updated = json!({"employeeId": id, "firstName": "Anne", "lastName": "Leigh", "email": "anne@x.com", "department": "Ops"});
    let res = client().put(format!("{}/api/employee/{}", app.base_url, id)).json(&updated).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    let found = client().get(format!("{}/api/employee/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(found, updated);
    Ok(())
}

#[tokio::test]
async fn e2e_update_id_mismatch_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, &ann()).await?;
    let id = created["employeeId"].as_i64().expect("employeeId");

    let body = json!({"employeeId": id + 1, "firstName": "Zed", "lastName": "Lee", "email": "a@x.com", "department": "Eng"});
    let res = client().put(format!("{}/api/employee/{}", app.base_url, id)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let found = client().get(format!("{}/api/employee/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(found, created);
    Ok(())
}

#[tokio::test]
async fn e2e_update_without_body_id_is_bad_request() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, &ann()).await?;
    let id = created["employeeId"].as_i64().expect("employeeId");

    let res = client().put(format!("{}/api/employee/{}", app.base_url, id)).json(&ann()).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_update_missing_is_not_found() -> anyhow::Result<()> {
    let app = start_server().await?;
    let body = json!({"employeeId": 99, "firstName": "Ann", "lastName": "Lee", "email": "a@x.com"});
    let res = client().put(format!("{}/api/employee/99", app.base_url)).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    // no row is created by a failed update
    let list = client().get(format!("{}/api/employee", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test]
async fn e2e_delete_twice() -> anyhow::Result<()> {
    let app = start_server().await?;
    let created = create(&app, &ann()).await?;
    let id = created["employeeId"].as_i64().expect("employeeId");
    let url = format!("{}/api/employee/{}", app.base_url, id);

    let res = client().delete(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NO_CONTENT);

    let res = client().delete(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = client().get(&url).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_document() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(format!("{}/api-docs/openapi.json", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let doc = res.json::<Value>().await?;
    assert_eq!(doc["info"]["title"], "Employee API");
    assert!(doc["paths"]["/api/employee"].is_object());
    assert!(doc["paths"]["/api/employee/{id}"].is_object());
    Ok(())
}

#[tokio::test]
async fn e2e_front_end_is_served_with_fallback() -> anyhow::Result<()> {
    let app = start_server().await?;

    let res = client().get(format!("{}/index.html", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, INDEX_HTML);

    let res = client().get(format!("{}/some/client/route", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, INDEX_HTML);
    Ok(())
}
