// Site pages: homepage highlights, gallery, and the contact/lead intake.

use axum::{
    extract::{Form, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    app_state::AppState,
    database::Database,
    error::AppResult,
    mail,
    models::{GalleryCategory, LeadForm, LeadSource, OwnerRef},
    store,
};

/// Settings-or-default plus the current announcement, injected into every
/// rendered page the way the original site does through a context processor.
pub async fn site_context(db: &Database) -> AppResult<Value> {
    let settings = store::site::settings_or_default(db).await?;
    let announcement = store::site::current_announcement(db).await?;
    Ok(json!({
        "settings": settings,
        "announcement": announcement,
    }))
}

/// Homepage: up to three highlights per catalog type, featured rows first.
pub async fn home_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let communities = store::communities::featured(&state.db).await?;
    let plans = store::plans::featured(&state.db).await?;
    let homes = store::homes::featured(&state.db).await?;
    Ok(Json(json!({
        "featured_communities": communities,
        "featured_plans": plans,
        "featured_homes": homes,
        "site": site_context(&state.db).await?,
    })))
}

#[derive(Debug, Default, Deserialize)]
pub struct GalleryParams {
    pub category: Option<String>,
}

pub async fn gallery_handler(
    State(state): State<AppState>,
    Query(params): Query<GalleryParams>,
) -> AppResult<Json<Value>> {
    // unrecognized categories fall back to the full gallery
    let category = params.category.as_deref().and_then(GalleryCategory::parse);
    let items = store::gallery::list(&state.db, category).await?;
    Ok(Json(json!({
        "items": items,
        "category": category,
        "site": site_context(&state.db).await?,
    })))
}

/// Shared lead intake: validate, persist, then best-effort notify. The
/// success response only depends on the row being written.
pub async fn submit_lead(
    state: &AppState,
    form: &LeadForm,
    source: LeadSource,
    page_url: &str,
    target: Option<OwnerRef>,
) -> AppResult<Json<Value>> {
    let lead = store::leads::create(&state.db, form, source, page_url, target).await?;

    let settings = store::site::settings_or_default(&state.db).await?;
    mail::notify_lead(state.mailer.as_ref(), &settings, &lead).await;

    Ok(Json(json!({
        "ok": true,
        "lead_id": lead.id,
        "message": "Thanks! We'll be in touch shortly.",
    })))
}

pub async fn contact_handler(
    State(state): State<AppState>,
    Form(form): Form<LeadForm>,
) -> AppResult<Json<Value>> {
    let page_url = format!("{}/contact", state.config.site.base_url.trim_end_matches('/'));
    submit_lead(&state, &form, LeadSource::Global, &page_url, None).await
}
