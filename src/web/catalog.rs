// Public catalog read views: list and detail routes for communities, floor
// plans, and available homes, plus the page-specific lead forms.

use axum::{
    extract::{Form, Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    models::{CommunityStatus, HomeStatus, LeadForm, LeadSource, OwnerKind, OwnerRef},
    store,
    store::communities::CommunityFilter,
    store::homes::HomeFilter,
    store::plans::PlanFilter,
};

use super::pages::submit_lead;

#[derive(Debug, Default, Deserialize)]
pub struct CommunityListParams {
    pub status: Option<String>,
    pub city: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

pub async fn community_list_handler(
    State(state): State<AppState>,
    Query(params): Query<CommunityListParams>,
) -> AppResult<Json<Value>> {
    let filter = CommunityFilter::parse(
        params.status.as_deref(),
        params.city.as_deref(),
        params.q.as_deref(),
    );
    let page = store::parse_digits(params.page.as_deref());
    let result = store::communities::list(&state.db, &filter, page).await?;
    Ok(Json(json!({
        "communities": result.items,
        "page": result.page,
        "pages": result.pages,
        "total": result.total,
        "status_choices": status_choices_community(),
    })))
}

pub async fn community_detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let community = store::communities::get_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no community matches '{}'", slug)))?;
    let owner = OwnerRef::new(OwnerKind::Community, community.id);
    let amenities = store::amenities::for_community(&state.db, community.id).await?;
    let photos = store::media::photos_for(&state.db, owner).await?;
    let attachments = store::media::attachments_for(&state.db, owner).await?;
    let plans = store::plans::for_community(&state.db, community.id).await?;
    let availability = store::plans::availability_for_community(&state.db, community.id).await?;
    let homes = store::homes::for_community(&state.db, community.id).await?;
    Ok(Json(json!({
        "community": community,
        "amenities": amenities,
        "photos": photos,
        "attachments": attachments,
        "plans": plans,
        "plan_availability": availability,
        "homes": homes,
    })))
}

pub async fn community_inquire_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<LeadForm>,
) -> AppResult<Json<Value>> {
    let community = store::communities::get_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no community matches '{}'", slug)))?;
    let page_url = format!(
        "{}/communities/{}",
        state.config.site.base_url.trim_end_matches('/'),
        community.slug
    );
    submit_lead(
        &state,
        &form,
        LeadSource::Community,
        &page_url,
        Some(OwnerRef::new(OwnerKind::Community, community.id)),
    )
    .await
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanListParams {
    pub beds: Option<String>,
    pub min_sqft: Option<String>,
    pub max_sqft: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

pub async fn plan_list_handler(
    State(state): State<AppState>,
    Query(params): Query<PlanListParams>,
) -> AppResult<Json<Value>> {
    let filter = PlanFilter::parse(
        params.beds.as_deref(),
        params.min_sqft.as_deref(),
        params.max_sqft.as_deref(),
        params.q.as_deref(),
    );
    let page = store::parse_digits(params.page.as_deref());
    let result = store::plans::list(&state.db, &filter, page).await?;
    Ok(Json(json!({
        "plans": result.items,
        "page": result.page,
        "pages": result.pages,
        "total": result.total,
    })))
}

pub async fn plan_detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let plan = store::plans::get_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no floor plan matches '{}'", slug)))?;
    let owner = OwnerRef::new(OwnerKind::Plan, plan.id);
    let photos = store::media::photos_for(&state.db, owner).await?;
    let attachments = store::media::attachments_for(&state.db, owner).await?;
    let communities = store::communities::offering_plan(&state.db, plan.id).await?;
    let availability = store::plans::availability_for_plan(&state.db, plan.id).await?;
    let homes = store::homes::for_plan(&state.db, plan.id).await?;
    Ok(Json(json!({
        "plan": plan,
        "photos": photos,
        "attachments": attachments,
        "communities": communities,
        "plan_availability": availability,
        "homes": homes,
    })))
}

pub async fn plan_inquire_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<LeadForm>,
) -> AppResult<Json<Value>> {
    let plan = store::plans::get_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no floor plan matches '{}'", slug)))?;
    let page_url = format!(
        "{}/plans/{}",
        state.config.site.base_url.trim_end_matches('/'),
        plan.slug
    );
    submit_lead(
        &state,
        &form,
        LeadSource::Plan,
        &page_url,
        Some(OwnerRef::new(OwnerKind::Plan, plan.id)),
    )
    .await
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeListParams {
    pub status: Option<String>,
    pub beds: Option<String>,
    pub max_price: Option<String>,
    pub city: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

pub async fn home_list_handler(
    State(state): State<AppState>,
    Query(params): Query<HomeListParams>,
) -> AppResult<Json<Value>> {
    let filter = HomeFilter::parse(
        params.status.as_deref(),
        params.beds.as_deref(),
        params.max_price.as_deref(),
        params.city.as_deref(),
        params.q.as_deref(),
    );
    let page = store::parse_digits(params.page.as_deref());
    let result = store::homes::list(&state.db, &filter, page).await?;
    Ok(Json(json!({
        "homes": result.items,
        "page": result.page,
        "pages": result.pages,
        "total": result.total,
        "status_choices": status_choices_home(),
    })))
}

pub async fn home_detail_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Value>> {
    let home = store::homes::get_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no home matches '{}'", slug)))?;
    let owner = OwnerRef::new(OwnerKind::Home, home.id);
    let photos = store::media::photos_for(&state.db, owner).await?;
    let attachments = store::media::attachments_for(&state.db, owner).await?;
    let community = store::communities::get(&state.db, home.community_id).await?;
    let plan = match home.plan_id {
        Some(plan_id) => store::plans::get(&state.db, plan_id).await?,
        None => None,
    };
    Ok(Json(json!({
        "home": home,
        "full_address": home.full_address(),
        "photos": photos,
        "attachments": attachments,
        "community": community,
        "plan": plan,
    })))
}

pub async fn home_inquire_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Form(form): Form<LeadForm>,
) -> AppResult<Json<Value>> {
    let home = store::homes::get_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no home matches '{}'", slug)))?;
    let page_url = format!(
        "{}/homes/{}",
        state.config.site.base_url.trim_end_matches('/'),
        home.slug
    );
    submit_lead(
        &state,
        &form,
        LeadSource::Home,
        &page_url,
        Some(OwnerRef::new(OwnerKind::Home, home.id)),
    )
    .await
}

fn status_choices_community() -> Vec<&'static str> {
    [
        CommunityStatus::Coming,
        CommunityStatus::Active,
        CommunityStatus::Closing,
        CommunityStatus::SoldOut,
    ]
    .iter()
    .map(|s| s.as_str())
    .collect()
}

fn status_choices_home() -> Vec<&'static str> {
    [
        HomeStatus::Coming,
        HomeStatus::Uc,
        HomeStatus::Active,
        HomeStatus::Pending,
        HomeStatus::Sold,
    ]
    .iter()
    .map(|s| s.as_str())
    .collect()
}
