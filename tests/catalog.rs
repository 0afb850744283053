// Store-level tests for the catalog domain: slug rules, featured selection,
// filter contracts, generic media ownership, and the settings singleton.

use heritage_homes::database::Database;
use heritage_homes::error::AppError;
use heritage_homes::models::{
    AvailableHomeForm, CommunityForm, FloorPlanForm, HomeStatus, LeadForm, LeadSource, OwnerKind,
    OwnerRef, PhotoForm, PlanAvailabilityForm, SiteSettingsForm,
};
use heritage_homes::store;
use heritage_homes::store::communities::CommunityFilter;
use heritage_homes::store::homes::HomeFilter;
use heritage_homes::store::plans::PlanFilter;

async fn test_db() -> Database {
    let db = Database::in_memory().await.unwrap();
    db.init().await.unwrap();
    db
}

fn community_named(name: &str) -> CommunityForm {
    CommunityForm {
        name: name.to_string(),
        city: "Attleboro".to_string(),
        state: "MA".to_string(),
        ..Default::default()
    }
}

fn home_in(community_id: i64, address_1: &str) -> AvailableHomeForm {
    AvailableHomeForm {
        community_id,
        address_1: address_1.to_string(),
        city: "Attleboro".to_string(),
        state: "MA".to_string(),
        postal_code: "02703".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn community_slug_is_derived_and_immutable() {
    let db = test_db().await;
    let community = store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();
    assert_eq!(community.slug, "eastwood-estates");

    let mut form = community_named("Renamed Estates");
    form.slug = "should-be-ignored".to_string();
    let updated = store::communities::update(&db, community.id, &form).await.unwrap();
    assert_eq!(updated.name, "Renamed Estates");
    assert_eq!(updated.slug, "eastwood-estates");
}

#[tokio::test]
async fn colliding_slug_fails_without_side_effects() {
    let db = test_db().await;
    store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();

    let mut dup = community_named("Eastwood  Estates!");
    let err = store::communities::create(&db, &dup).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);

    // explicit duplicate slug fails the same way
    dup = community_named("Different Name");
    dup.slug = "eastwood-estates".to_string();
    let err = store::communities::create(&db, &dup).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    assert_eq!(store::communities::all(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn home_slug_falls_back_to_lot_then_placeholder() {
    let db = test_db().await;
    let community = store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();

    let with_address = store::homes::create(&db, &home_in(community.id, "12 Eastwood Way"))
        .await
        .unwrap();
    assert_eq!(with_address.slug, "12-eastwood-way-attleboro-ma-02703");

    let lot_only = store::homes::create(
        &db,
        &AvailableHomeForm {
            community_id: community.id,
            lot_number: "7".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(lot_only.slug, "lot-7");

    let bare = store::homes::create(
        &db,
        &AvailableHomeForm {
            community_id: community.id,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(bare.slug.starts_with("home-"));
    assert!(!bare.slug.is_empty());
}

#[tokio::test]
async fn featured_selection_orders_by_rank_then_name() {
    let db = test_db().await;
    let ranked = [
        ("Cypress", 3),
        ("Birch", 1),
        ("Dogwood", 4),
        ("Aspen", 1),
        ("Elm", 5),
    ];
    for (name, rank) in ranked {
        let mut form = community_named(name);
        form.is_featured = true;
        form.featured_rank = rank;
        store::communities::create(&db, &form).await.unwrap();
    }

    let featured = store::communities::featured(&db).await.unwrap();
    let names: Vec<&str> = featured.iter().map(|c| c.name.as_str()).collect();
    // rank ascending, name ascending among the rank-1 tie
    assert_eq!(names, vec!["Aspen", "Birch", "Cypress"]);
}

#[tokio::test]
async fn featured_selection_falls_back_when_nothing_is_flagged() {
    let db = test_db().await;
    for name in ["Cedar", "Alder", "Briar", "Dune"] {
        store::communities::create(&db, &community_named(name)).await.unwrap();
    }

    let featured = store::communities::featured(&db).await.unwrap();
    assert_eq!(featured.len(), 3);
    let names: Vec<&str> = featured.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alder", "Briar", "Cedar"]);

    // an empty table is the only case that yields an empty selection
    assert!(store::plans::featured(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn home_filters_are_monotonic_and_tolerant() {
    let db = test_db().await;
    let community = store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();

    for (addr, beds, price, status) in [
        ("1 Main St", 3, 450000.0, Some(HomeStatus::Active)),
        ("2 Main St", 4, 650000.0, Some(HomeStatus::Active)),
        ("3 Oak Ave", 5, 850000.0, Some(HomeStatus::Sold)),
    ] {
        let mut form = home_in(community.id, addr);
        form.beds = beds;
        form.price = Some(price);
        form.status = status;
        store::homes::create(&db, &form).await.unwrap();
    }

    let unfiltered = store::homes::list(&db, &HomeFilter::default(), None).await.unwrap();
    assert_eq!(unfiltered.total, 3);

    let by_status = HomeFilter::parse(Some("active"), None, None, None, None);
    let filtered = store::homes::list(&db, &by_status, None).await.unwrap();
    assert_eq!(filtered.total, 2);

    // each added filter can only narrow the result set
    let narrowed = HomeFilter::parse(Some("active"), Some("4"), Some("700000"), None, None);
    let result = store::homes::list(&db, &narrowed, None).await.unwrap();
    assert_eq!(result.total, 1);
    assert!(result.total <= filtered.total);

    // malformed numerics and unknown statuses behave as if absent
    let tolerant = HomeFilter::parse(Some("for-sale"), Some("abc"), Some("cheap"), None, None);
    let result = store::homes::list(&db, &tolerant, None).await.unwrap();
    assert_eq!(result.total, 3);
}

#[tokio::test]
async fn plan_filters_bound_square_footage() {
    let db = test_db().await;
    for (name, min, max) in [("Aspen", 1500, 1900), ("Birch", 1800, 2400), ("Cedar", 2600, 3100)] {
        store::plans::create(
            &db,
            &FloorPlanForm {
                name: name.to_string(),
                beds: 3,
                sq_ft_min: Some(min),
                sq_ft_max: Some(max),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let filter = PlanFilter::parse(None, Some("1600"), Some("2500"), None);
    let result = store::plans::list(&db, &filter, None).await.unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].name, "Birch");

    let free_text = PlanFilter::parse(None, None, None, Some("ced"));
    let result = store::plans::list(&db, &free_text, None).await.unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].name, "Cedar");
}

#[tokio::test]
async fn community_list_pages_at_twelve() {
    let db = test_db().await;
    for i in 0..15 {
        store::communities::create(&db, &community_named(&format!("Community {:02}", i)))
            .await
            .unwrap();
    }
    let first = store::communities::list(&db, &CommunityFilter::default(), Some(1))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 12);
    assert_eq!(first.total, 15);
    assert_eq!(first.pages, 2);

    let second = store::communities::list(&db, &CommunityFilter::default(), Some(2))
        .await
        .unwrap();
    assert_eq!(second.items.len(), 3);
}

#[tokio::test]
async fn deleting_a_home_cascades_its_media() {
    let db = test_db().await;
    let community = store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();
    let home = store::homes::create(&db, &home_in(community.id, "12 Eastwood Way"))
        .await
        .unwrap();
    let owner = OwnerRef::new(OwnerKind::Home, home.id);

    for (image, order) in [("photos/front.jpg", 2), ("photos/kitchen.jpg", 1)] {
        store::media::add_photo(
            &db,
            owner,
            &PhotoForm {
                image: image.to_string(),
                sort_order: order,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    // stable (sort_order, id) ordering
    let photos = store::media::photos_for(&db, owner).await.unwrap();
    assert_eq!(photos.len(), 2);
    assert_eq!(photos[0].image, "photos/kitchen.jpg");

    store::homes::delete(&db, home.id).await.unwrap();
    assert!(store::media::photos_for(&db, owner).await.unwrap().is_empty());
    assert!(store::media::resolve_owner(&db, owner).await.unwrap().is_none());
}

#[tokio::test]
async fn community_deletion_is_blocked_by_homes() {
    let db = test_db().await;
    let community = store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();
    let home = store::homes::create(&db, &home_in(community.id, "12 Eastwood Way"))
        .await
        .unwrap();

    let err = store::communities::delete(&db, community.id).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(store::communities::get(&db, community.id).await.unwrap().is_some());

    store::homes::delete(&db, home.id).await.unwrap();
    store::communities::delete(&db, community.id).await.unwrap();
    assert!(store::communities::get(&db, community.id).await.unwrap().is_none());
}

#[tokio::test]
async fn plan_deletion_clears_home_references() {
    let db = test_db().await;
    let community = store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();
    let plan = store::plans::create(
        &db,
        &FloorPlanForm {
            name: "Harborview".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let mut form = home_in(community.id, "12 Eastwood Way");
    form.plan_id = Some(plan.id);
    let home = store::homes::create(&db, &form).await.unwrap();
    assert_eq!(home.plan_id, Some(plan.id));

    store::plans::delete(&db, plan.id).await.unwrap();
    let home = store::homes::get(&db, home.id).await.unwrap().unwrap();
    assert_eq!(home.plan_id, None);
}

#[tokio::test]
async fn plan_availability_pair_is_unique() {
    let db = test_db().await;
    let community = store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();
    let plan = store::plans::create(
        &db,
        &FloorPlanForm {
            name: "Harborview".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let form = PlanAvailabilityForm {
        plan_id: plan.id,
        community_id: community.id,
        is_available: true,
        base_price_override: Some(499000.0),
        notes: String::new(),
    };
    store::plans::availability_create(&db, &form).await.unwrap();
    let err = store::plans::availability_create(&db, &form).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let offered = store::plans::for_community(&db, community.id).await.unwrap();
    assert_eq!(offered.len(), 1);
    assert_eq!(offered[0].id, plan.id);
}

#[tokio::test]
async fn lead_rows_keep_message_and_lose_deleted_targets() {
    let db = test_db().await;
    let community = store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();
    let form = LeadForm {
        name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        message: "Interested in Eastwood Estates".to_string(),
        ..Default::default()
    };
    let lead = store::leads::create(
        &db,
        &form,
        LeadSource::Community,
        "http://localhost:3000/communities/eastwood-estates",
        Some(OwnerRef::new(OwnerKind::Community, community.id)),
    )
    .await
    .unwrap();
    assert_eq!(lead.message, "Interested in Eastwood Estates");

    store::communities::delete(&db, community.id).await.unwrap();
    let lead = store::leads::get(&db, lead.id).await.unwrap().unwrap();
    assert_eq!(lead.target, None);
    assert_eq!(lead.message, "Interested in Eastwood Estates");
}

#[tokio::test]
async fn invalid_lead_submissions_are_not_persisted() {
    let db = test_db().await;
    let form = LeadForm {
        name: String::new(),
        email: "not-an-email".to_string(),
        ..Default::default()
    };
    let err = store::leads::create(&db, &form, LeadSource::Global, "", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FieldErrors(_)));

    let page = store::leads::list(&db, &Default::default(), None).await.unwrap();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn settings_stay_a_single_logical_row() {
    let db = test_db().await;
    assert!(store::site::settings(&db).await.unwrap().is_none());

    let defaults = store::site::settings_or_default(&db).await.unwrap();
    assert_eq!(defaults.site_name, "Heritage Realty & Custom Homes");

    let mut form = SiteSettingsForm {
        site_name: "Heritage RCH".to_string(),
        lead_recipients: "a@x.com; b@x.com".to_string(),
        ..Default::default()
    };
    let first = store::site::update_settings(&db, &form).await.unwrap();
    form.site_name = "Heritage Realty".to_string();
    let second = store::site::update_settings(&db, &form).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.site_name, "Heritage Realty");
    assert_eq!(second.recipient_list(), vec!["a@x.com", "b@x.com"]);
}

#[tokio::test]
async fn current_announcement_is_latest_active() {
    let db = test_db().await;
    assert!(store::site::current_announcement(&db).await.unwrap().is_none());

    let first = store::site::create_announcement(
        &db,
        &heritage_homes::models::AnnouncementForm {
            title: "Spring open house".to_string(),
            is_active: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let second = store::site::create_announcement(
        &db,
        &heritage_homes::models::AnnouncementForm {
            title: "New phase released".to_string(),
            is_active: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // same update timestamp resolves to the newest row
    let current = store::site::current_announcement(&db).await.unwrap().unwrap();
    assert_eq!(current.id, second.id);

    // deactivating the newest row falls back to the remaining active one
    let mut form = heritage_homes::models::AnnouncementForm {
        title: "New phase released".to_string(),
        is_active: false,
        ..Default::default()
    };
    store::site::update_announcement(&db, second.id, &form).await.unwrap();
    let current = store::site::current_announcement(&db).await.unwrap().unwrap();
    assert_eq!(current.id, first.id);

    // deactivating everything is a valid state
    form.title = "Spring open house".to_string();
    store::site::update_announcement(&db, first.id, &form).await.unwrap();
    assert!(store::site::current_announcement(&db).await.unwrap().is_none());
}

#[tokio::test]
async fn file_backed_database_initializes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heritage.db");
    let url = format!("sqlite:{}", path.display());
    let db = Database::new(&url, 2).await.unwrap();
    db.init().await.unwrap();
    // init is idempotent
    db.init().await.unwrap();
    store::communities::create(&db, &community_named("Eastwood Estates"))
        .await
        .unwrap();
    assert_eq!(store::communities::all(&db).await.unwrap().len(), 1);
}
