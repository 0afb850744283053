// Staff portal: authenticated JSON CRUD over the catalog, media, site
// content, leads, and (superuser only) portal user accounts.

use axum::{
    extract::{Path, Query, State},
    middleware,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    models::{
        AnnouncementForm, AttachmentForm, AvailableHomeForm, CommunityForm, FloorPlanForm,
        GalleryItemForm, OwnerKind, OwnerRef, PhotoForm, PlanAvailabilityForm, PortalUserForm,
        SiteSettingsForm,
    },
    store,
    store::leads::LeadFilter,
};

use super::auth;

fn owner_from_path(kind: &str, id: i64) -> AppResult<OwnerRef> {
    let kind = OwnerKind::parse(kind)
        .ok_or_else(|| AppError::Validation(format!("unknown owner kind '{}'", kind)))?;
    Ok(OwnerRef::new(kind, id))
}

async fn dashboard_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let communities = store::communities::all(&state.db).await?.len();
    let plans = store::plans::all(&state.db).await?.len();
    let homes = store::homes::all(&state.db).await?.len();
    let leads = store::leads::list(&state.db, &LeadFilter::default(), None).await?;
    Ok(Json(json!({
        "communities": communities,
        "plans": plans,
        "homes": homes,
        "leads": leads.total,
    })))
}

// Communities

async fn community_list_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let communities = store::communities::all(&state.db).await?;
    Ok(Json(json!({"communities": communities})))
}

async fn community_create_handler(
    State(state): State<AppState>,
    Json(form): Json<CommunityForm>,
) -> AppResult<Json<Value>> {
    let community = store::communities::create(&state.db, &form).await?;
    Ok(Json(json!({"community": community})))
}

async fn community_get_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let community = store::communities::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("community {} not found", id)))?;
    let amenities = store::amenities::for_community(&state.db, id).await?;
    Ok(Json(json!({"community": community, "amenities": amenities})))
}

async fn community_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<CommunityForm>,
) -> AppResult<Json<Value>> {
    let community = store::communities::update(&state.db, id, &form).await?;
    Ok(Json(json!({"community": community})))
}

async fn community_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::communities::delete(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

#[derive(Debug, Deserialize)]
struct AmenitySetForm {
    amenity_ids: Vec<i64>,
}

async fn community_amenities_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<AmenitySetForm>,
) -> AppResult<Json<Value>> {
    if store::communities::get(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!("community {} not found", id)));
    }
    store::amenities::set_for_community(&state.db, id, &form.amenity_ids).await?;
    let amenities = store::amenities::for_community(&state.db, id).await?;
    Ok(Json(json!({"amenities": amenities})))
}

// Floor plans and series

async fn plan_list_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let plans = store::plans::all(&state.db).await?;
    Ok(Json(json!({"plans": plans})))
}

async fn plan_create_handler(
    State(state): State<AppState>,
    Json(form): Json<FloorPlanForm>,
) -> AppResult<Json<Value>> {
    let plan = store::plans::create(&state.db, &form).await?;
    Ok(Json(json!({"plan": plan})))
}

async fn plan_get_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let plan = store::plans::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("floor plan {} not found", id)))?;
    let availability = store::plans::availability_for_plan(&state.db, id).await?;
    Ok(Json(json!({"plan": plan, "plan_availability": availability})))
}

async fn plan_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<FloorPlanForm>,
) -> AppResult<Json<Value>> {
    let plan = store::plans::update(&state.db, id, &form).await?;
    Ok(Json(json!({"plan": plan})))
}

async fn plan_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::plans::delete(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

#[derive(Debug, Deserialize)]
struct NameForm {
    name: String,
}

async fn series_list_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let series = store::plans::series_all(&state.db).await?;
    Ok(Json(json!({"series": series})))
}

async fn series_create_handler(
    State(state): State<AppState>,
    Json(form): Json<NameForm>,
) -> AppResult<Json<Value>> {
    let series = store::plans::series_create(&state.db, &form.name).await?;
    Ok(Json(json!({"series": series})))
}

async fn series_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::plans::series_delete(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

#[derive(Debug, Default, Deserialize)]
struct AvailabilityQuery {
    community_id: Option<i64>,
    plan_id: Option<i64>,
}

async fn availability_list_handler(
    State(state): State<AppState>,
    Query(params): Query<AvailabilityQuery>,
) -> AppResult<Json<Value>> {
    let rows = match (params.community_id, params.plan_id) {
        (Some(community_id), _) => {
            store::plans::availability_for_community(&state.db, community_id).await?
        }
        (None, Some(plan_id)) => store::plans::availability_for_plan(&state.db, plan_id).await?,
        (None, None) => {
            return Err(AppError::Validation(
                "community_id or plan_id is required".to_string(),
            ))
        }
    };
    Ok(Json(json!({"plan_availability": rows})))
}

async fn availability_create_handler(
    State(state): State<AppState>,
    Json(form): Json<PlanAvailabilityForm>,
) -> AppResult<Json<Value>> {
    let row = store::plans::availability_create(&state.db, &form).await?;
    Ok(Json(json!({"plan_availability": row})))
}

async fn availability_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<PlanAvailabilityForm>,
) -> AppResult<Json<Value>> {
    let row = store::plans::availability_update(&state.db, id, &form).await?;
    Ok(Json(json!({"plan_availability": row})))
}

async fn availability_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::plans::availability_delete(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

// Available homes

async fn home_list_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let homes = store::homes::all(&state.db).await?;
    Ok(Json(json!({"homes": homes})))
}

async fn home_create_handler(
    State(state): State<AppState>,
    Json(form): Json<AvailableHomeForm>,
) -> AppResult<Json<Value>> {
    let home = store::homes::create(&state.db, &form).await?;
    Ok(Json(json!({"home": home})))
}

async fn home_get_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let home = store::homes::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("home {} not found", id)))?;
    Ok(Json(json!({"home": home})))
}

async fn home_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<AvailableHomeForm>,
) -> AppResult<Json<Value>> {
    let home = store::homes::update(&state.db, id, &form).await?;
    Ok(Json(json!({"home": home})))
}

async fn home_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::homes::delete(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

// Amenities

async fn amenity_list_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let amenities = store::amenities::all(&state.db).await?;
    Ok(Json(json!({"amenities": amenities})))
}

async fn amenity_create_handler(
    State(state): State<AppState>,
    Json(form): Json<NameForm>,
) -> AppResult<Json<Value>> {
    let amenity = store::amenities::create(&state.db, &form.name).await?;
    Ok(Json(json!({"amenity": amenity})))
}

async fn amenity_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::amenities::delete(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

// Photos and attachments, scoped by owner

async fn photo_list_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> AppResult<Json<Value>> {
    let owner = owner_from_path(&kind, id)?;
    let photos = store::media::photos_for(&state.db, owner).await?;
    // a stale owner reference is reported, not fatal
    let owner_row = store::media::resolve_owner(&state.db, owner).await?;
    Ok(Json(json!({
        "photos": photos,
        "owner_missing": owner_row.is_none(),
        "owner": owner_row,
    })))
}

async fn photo_create_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Json(form): Json<PhotoForm>,
) -> AppResult<Json<Value>> {
    let owner = owner_from_path(&kind, id)?;
    let photo = store::media::add_photo(&state.db, owner, &form).await?;
    Ok(Json(json!({"photo": photo})))
}

async fn photo_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<PhotoForm>,
) -> AppResult<Json<Value>> {
    let photo = store::media::update_photo(&state.db, id, &form).await?;
    Ok(Json(json!({"photo": photo})))
}

async fn photo_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::media::delete_photo(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

async fn attachment_list_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
) -> AppResult<Json<Value>> {
    let owner = owner_from_path(&kind, id)?;
    let attachments = store::media::attachments_for(&state.db, owner).await?;
    Ok(Json(json!({"attachments": attachments})))
}

async fn attachment_create_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Json(form): Json<AttachmentForm>,
) -> AppResult<Json<Value>> {
    let owner = owner_from_path(&kind, id)?;
    let attachment = store::media::add_attachment(&state.db, owner, &form).await?;
    Ok(Json(json!({"attachment": attachment})))
}

async fn attachment_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::media::delete_attachment(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

// Gallery

async fn gallery_list_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let items = store::gallery::list(&state.db, None).await?;
    Ok(Json(json!({"items": items})))
}

async fn gallery_create_handler(
    State(state): State<AppState>,
    Json(form): Json<GalleryItemForm>,
) -> AppResult<Json<Value>> {
    let item = store::gallery::create(&state.db, &form).await?;
    Ok(Json(json!({"item": item})))
}

async fn gallery_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<GalleryItemForm>,
) -> AppResult<Json<Value>> {
    let item = store::gallery::update(&state.db, id, &form).await?;
    Ok(Json(json!({"item": item})))
}

async fn gallery_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::gallery::delete(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

// Announcements and site settings

async fn announcement_list_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let announcements = store::site::announcements(&state.db).await?;
    Ok(Json(json!({"announcements": announcements})))
}

async fn announcement_create_handler(
    State(state): State<AppState>,
    Json(form): Json<AnnouncementForm>,
) -> AppResult<Json<Value>> {
    let announcement = store::site::create_announcement(&state.db, &form).await?;
    Ok(Json(json!({"announcement": announcement})))
}

async fn announcement_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<AnnouncementForm>,
) -> AppResult<Json<Value>> {
    let announcement = store::site::update_announcement(&state.db, id, &form).await?;
    Ok(Json(json!({"announcement": announcement})))
}

async fn announcement_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::site::delete_announcement(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

async fn settings_get_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let settings = store::site::settings(&state.db).await?;
    Ok(Json(json!({"settings": settings})))
}

async fn settings_update_handler(
    State(state): State<AppState>,
    Json(form): Json<SiteSettingsForm>,
) -> AppResult<Json<Value>> {
    let settings = store::site::update_settings(&state.db, &form).await?;
    Ok(Json(json!({"settings": settings})))
}

// Leads (read-only)

#[derive(Debug, Default, Deserialize)]
struct LeadListParams {
    source: Option<String>,
    since: Option<String>,
    until: Option<String>,
    page: Option<String>,
}

async fn lead_list_handler(
    State(state): State<AppState>,
    Query(params): Query<LeadListParams>,
) -> AppResult<Json<Value>> {
    let filter = LeadFilter::parse(
        params.source.as_deref(),
        params.since.as_deref(),
        params.until.as_deref(),
    );
    let page = store::parse_digits(params.page.as_deref());
    let result = store::leads::list(&state.db, &filter, page).await?;
    Ok(Json(json!({
        "leads": result.items,
        "page": result.page,
        "pages": result.pages,
        "total": result.total,
    })))
}

async fn lead_get_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let lead = store::leads::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("lead {} not found", id)))?;
    let target = match lead.target {
        Some(target) => store::media::resolve_owner(&state.db, target).await?,
        None => None,
    };
    Ok(Json(json!({"lead": lead, "target": target})))
}

// Portal users (superuser only)

async fn user_list_handler(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let users = store::users::all(&state.db).await?;
    Ok(Json(json!({"users": users})))
}

async fn user_create_handler(
    State(state): State<AppState>,
    Json(form): Json<PortalUserForm>,
) -> AppResult<Json<Value>> {
    let user = store::users::create(&state.db, &form).await?;
    Ok(Json(json!({"user": user})))
}

async fn user_get_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let user = store::users::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("portal user {} not found", id)))?;
    Ok(Json(json!({"user": user})))
}

async fn user_update_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<PortalUserForm>,
) -> AppResult<Json<Value>> {
    let user = store::users::update(&state.db, id, &form).await?;
    Ok(Json(json!({"user": user})))
}

async fn user_delete_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    store::users::delete(&state.db, id).await?;
    Ok(Json(json!({"deleted": true})))
}

/// Assemble the portal router. Every route requires staff access; user
/// management additionally requires the superuser role.
pub fn router(state: AppState) -> Router<AppState> {
    let users = Router::new()
        .route("/users", get(user_list_handler).post(user_create_handler))
        .route(
            "/users/{id}",
            get(user_get_handler)
                .put(user_update_handler)
                .delete(user_delete_handler),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_superuser,
        ));

    Router::new()
        .route("/", get(dashboard_handler))
        .route(
            "/communities",
            get(community_list_handler).post(community_create_handler),
        )
        .route(
            "/communities/{id}",
            get(community_get_handler)
                .put(community_update_handler)
                .delete(community_delete_handler),
        )
        .route("/communities/{id}/amenities", put(community_amenities_handler))
        .route("/plans", get(plan_list_handler).post(plan_create_handler))
        .route(
            "/plans/{id}",
            get(plan_get_handler)
                .put(plan_update_handler)
                .delete(plan_delete_handler),
        )
        .route(
            "/plan-series",
            get(series_list_handler).post(series_create_handler),
        )
        .route("/plan-series/{id}", axum::routing::delete(series_delete_handler))
        .route(
            "/plan-availability",
            get(availability_list_handler).post(availability_create_handler),
        )
        .route(
            "/plan-availability/{id}",
            put(availability_update_handler).delete(availability_delete_handler),
        )
        .route("/homes", get(home_list_handler).post(home_create_handler))
        .route(
            "/homes/{id}",
            get(home_get_handler)
                .put(home_update_handler)
                .delete(home_delete_handler),
        )
        .route(
            "/amenities",
            get(amenity_list_handler).post(amenity_create_handler),
        )
        .route("/amenities/{id}", axum::routing::delete(amenity_delete_handler))
        .route(
            "/media/{kind}/{id}/photos",
            get(photo_list_handler).post(photo_create_handler),
        )
        .route(
            "/photos/{id}",
            put(photo_update_handler).delete(photo_delete_handler),
        )
        .route(
            "/media/{kind}/{id}/attachments",
            get(attachment_list_handler).post(attachment_create_handler),
        )
        .route(
            "/attachments/{id}",
            axum::routing::delete(attachment_delete_handler),
        )
        .route(
            "/gallery",
            get(gallery_list_handler).post(gallery_create_handler),
        )
        .route(
            "/gallery/{id}",
            put(gallery_update_handler).delete(gallery_delete_handler),
        )
        .route(
            "/announcements",
            get(announcement_list_handler).post(announcement_create_handler),
        )
        .route(
            "/announcements/{id}",
            put(announcement_update_handler).delete(announcement_delete_handler),
        )
        .route(
            "/settings",
            get(settings_get_handler).put(settings_update_handler),
        )
        .route("/leads", get(lead_list_handler))
        .route("/leads/{id}", get(lead_get_handler))
        .merge(users)
        .layer(middleware::from_fn_with_state(state, auth::require_staff))
}
