// Router-level tests: public reads, lead intake end to end, and the portal
// role guard.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use heritage_homes::app_state::AppState;
use heritage_homes::config::{Config, DatabaseConfig, PortalConfig, ServerConfig, SiteConfig};
use heritage_homes::database::Database;
use heritage_homes::mail::LogMailer;
use heritage_homes::models::{CommunityForm, LeadSource};
use heritage_homes::store;
use heritage_homes::web::create_router;

fn test_config() -> Config {
    Config {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        site: SiteConfig {
            base_url: "http://localhost:3000".to_string(),
            media_root: "media".to_string(),
        },
        portal: PortalConfig {
            staff_token: Some("staff-token".to_string()),
            admin_token: Some("admin-token".to_string()),
        },
    }
}

async fn test_state() -> AppState {
    let db = Database::in_memory().await.unwrap();
    db.init().await.unwrap();
    AppState::from_parts(Arc::new(db), Arc::new(LogMailer), test_config())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn portal_json(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn contact_submission_creates_lead_without_recipients() {
    let state = test_state().await;
    let app = create_router(state.clone());

    let response = app
        .oneshot(post_form(
            "/contact",
            "name=Jane+Doe&email=jane%40example.com&message=Interested+in+Eastwood+Estates",
        ))
        .await
        .unwrap();
    // success even though no notification recipients are configured
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], json!(true));

    let leads = store::leads::list(&state.db, &Default::default(), None).await.unwrap();
    assert_eq!(leads.total, 1);
    assert_eq!(leads.items[0].name, "Jane Doe");
    assert_eq!(leads.items[0].message, "Interested in Eastwood Estates");
    assert_eq!(leads.items[0].source, LeadSource::Global);
    assert_eq!(leads.items[0].page_url, "http://localhost:3000/contact");
}

#[tokio::test]
async fn invalid_contact_submission_reports_field_errors() {
    let state = test_state().await;
    let app = create_router(state.clone());

    let response = app
        .oneshot(post_form("/contact", "name=&email=nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["fields"]["name"].is_string());
    assert!(body["fields"]["email"].is_string());

    let leads = store::leads::list(&state.db, &Default::default(), None).await.unwrap();
    assert_eq!(leads.total, 0);
}

#[tokio::test]
async fn community_inquiry_tags_source_and_target() {
    let state = test_state().await;
    store::communities::create(
        &state.db,
        &CommunityForm {
            name: "Eastwood Estates".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let app = create_router(state.clone());

    let response = app
        .oneshot(post_form(
            "/communities/eastwood-estates/inquire",
            "name=Jane+Doe&email=jane%40example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let leads = store::leads::list(&state.db, &Default::default(), None).await.unwrap();
    assert_eq!(leads.items[0].source, LeadSource::Community);
    assert!(leads.items[0].target.is_some());
    assert!(leads.items[0].page_url.ends_with("/communities/eastwood-estates"));
}

#[tokio::test]
async fn malformed_list_filters_are_ignored() {
    let state = test_state().await;
    for name in ["Aspen", "Birch"] {
        store::communities::create(
            &state.db,
            &CommunityForm {
                name: name.to_string(),
                city: "Attleboro".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(get("/homes?beds=abc&max_price=lots&status=for-sale"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/communities?status=nonsense&city=attle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], json!(2));
}

#[tokio::test]
async fn unknown_slugs_return_not_found() {
    let state = test_state().await;
    let app = create_router(state);
    for uri in ["/communities/nope", "/plans/nope", "/homes/nope"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn homepage_highlights_fall_back_without_featured_rows() {
    let state = test_state().await;
    store::communities::create(
        &state.db,
        &CommunityForm {
            name: "Eastwood Estates".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let app = create_router(state);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["featured_communities"].as_array().unwrap().len(), 1);
    assert!(body["featured_plans"].as_array().unwrap().is_empty());
    assert_eq!(
        body["site"]["settings"]["site_name"],
        json!("Heritage Realty & Custom Homes")
    );
    assert_eq!(body["site"]["announcement"], Value::Null);
}

#[tokio::test]
async fn portal_requires_a_known_token() {
    let state = test_state().await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(get("/portal/communities"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(portal_json("GET", "/portal/communities", Some("wrong"), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(portal_json(
            "GET",
            "/portal/communities",
            Some("staff-token"),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_management_is_superuser_only() {
    let state = test_state().await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(portal_json("GET", "/portal/users", Some("staff-token"), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(portal_json(
            "POST",
            "/portal/users",
            Some("admin-token"),
            &json!({"username": "msmith", "role": "staff"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(portal_json("GET", "/portal/users", Some("admin-token"), &json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn portal_crud_round_trip_and_conflicts() {
    let state = test_state().await;
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(portal_json(
            "POST",
            "/portal/communities",
            Some("staff-token"),
            &json!({"name": "Eastwood Estates", "city": "Attleboro", "state": "MA"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["community"]["slug"], json!("eastwood-estates"));

    // a second community slugifying to the same value is a save conflict
    let response = app
        .clone()
        .oneshot(portal_json(
            "POST",
            "/portal/communities",
            Some("staff-token"),
            &json!({"name": "Eastwood Estates"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(portal_json(
            "PUT",
            "/portal/settings",
            Some("staff-token"),
            &json!({"site_name": "Heritage RCH", "lead_recipients": "a@x.com; b@x.com\nc@x.com ,, "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["settings"]["site_name"], json!("Heritage RCH"));
}

#[tokio::test]
async fn sitemap_lists_catalog_urls() {
    let state = test_state().await;
    store::communities::create(
        &state.db,
        &CommunityForm {
            name: "Eastwood Estates".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let app = create_router(state);

    let response = app.oneshot(get("/sitemap.xml")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/xml"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let xml = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(xml.contains("<loc>http://localhost:3000/communities/eastwood-estates</loc>"));
    assert!(xml.contains("<loc>http://localhost:3000/contact</loc>"));
    assert!(xml.contains("<lastmod>"));
}
