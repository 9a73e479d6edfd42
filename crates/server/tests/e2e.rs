use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::user_record::repo::SeaOrmUserRecordRepository;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, ServerState};

struct TestApp {
    base_url: String,
}

/// Real server on an ephemeral port backed by Postgres; `None` when no database is configured.
async fn start_server() -> anyhow::Result<Option<TestApp>> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(None); }
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests. Provide .env.test or env var.");
        return Ok(None);
    }

    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await { eprintln!("migrations notice: {}", e); }

    let state = ServerState::new(Arc::new(SeaOrmUserRecordRepository::new(db)));
    let app: Router = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(Some(TestApp { base_url }))
}

fn company(role: &str, tag: &str) -> serde_json::Value {
    json!({
        "company_name": format!("E2E {tag}"),
        "role": role,
        "inn": format!("inn-{tag}"),
        "bik": format!("bik-{tag}"),
        "kpp": format!("kpp-{tag}"),
        "payment_account": format!("acc-{tag}"),
        "legal_address": "Samara, Kuibysheva 10",
        "country": "RU",
        "contact_number": format!("+7{tag}"),
    })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_user_record_lifecycle() -> anyhow::Result<()> {
    let Some(app) = start_server().await? else { return Ok(()) };
    let c = reqwest::Client::new();
    let tag = Uuid::new_v4().simple().to_string()[..16].to_string();

    let res = c.post(format!("{}/users", app.base_url)).json(&company("MAKER", &tag)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<serde_json::Value>().await?;
    let id = created["id"].as_i64().unwrap_or_default();

    let res = c.post(format!("{}/users", app.base_url)).json(&company("DEALER", &tag)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "INN already exists");

    let res = c.patch(format!("{}/users/{}", app.base_url, id))
        .json(&json!({"company_name": "E2E renamed", "inn": created["inn"]}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(format!("{}/users/role/MAKER", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let makers = res.json::<Vec<serde_json::Value>>().await?;
    assert!(makers.iter().any(|m| m["id"] == id && m["company_name"] == "E2E renamed"));

    let res = c.delete(format!("{}/users/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c.get(format!("{}/users/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}
