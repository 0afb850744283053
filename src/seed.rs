// Demo data for portal testing: a community, a plan offered there, and one
// available home. Safe to run repeatedly.

use crate::database::Database;
use crate::error::AppResult;
use crate::models::{
    AvailableHomeForm, CommunityForm, CommunityStatus, FloorPlanForm, HomeStatus,
    PlanAvailabilityForm,
};
use crate::store;

const AMENITIES: &[&str] = &["Walking Trails", "Playground", "Sidewalks", "Open Space"];

pub async fn seed_demo_data(db: &Database) -> AppResult<()> {
    let mut amenity_ids = Vec::new();
    let existing = store::amenities::all(db).await?;
    for name in AMENITIES {
        match existing.iter().find(|a| a.name == *name) {
            Some(amenity) => amenity_ids.push(amenity.id),
            None => amenity_ids.push(store::amenities::create(db, name).await?.id),
        }
    }

    let community = match store::communities::get_by_slug(db, "eastwood-estates").await? {
        Some(community) => community,
        None => {
            store::communities::create(
                db,
                &CommunityForm {
                    slug: "eastwood-estates".to_string(),
                    name: "Eastwood Estates".to_string(),
                    city: "Attleboro".to_string(),
                    state: "MA".to_string(),
                    status: Some(CommunityStatus::Active),
                    description: "A charming community near local amenities.".to_string(),
                    ..Default::default()
                },
            )
            .await?
        }
    };
    store::amenities::set_for_community(db, community.id, &amenity_ids).await?;

    let plan = match store::plans::get_by_slug(db, "harborview").await? {
        Some(plan) => plan,
        None => {
            store::plans::create(
                db,
                &FloorPlanForm {
                    slug: "harborview".to_string(),
                    name: "Harborview".to_string(),
                    beds: 3,
                    baths: 2.5,
                    garage_cars: 2,
                    sq_ft_min: Some(1800),
                    sq_ft_max: Some(2200),
                    ..Default::default()
                },
            )
            .await?
        }
    };
    let offered = store::plans::availability_for_plan(db, plan.id).await?;
    if !offered.iter().any(|a| a.community_id == community.id) {
        store::plans::availability_create(
            db,
            &PlanAvailabilityForm {
                plan_id: plan.id,
                community_id: community.id,
                is_available: true,
                base_price_override: None,
                notes: String::new(),
            },
        )
        .await?;
    }

    if store::homes::get_by_slug(db, "lot-12-eastwood").await?.is_none() {
        store::homes::create(
            db,
            &AvailableHomeForm {
                community_id: community.id,
                plan_id: Some(plan.id),
                slug: "lot-12-eastwood".to_string(),
                lot_number: "12".to_string(),
                address_1: "12 Eastwood Way".to_string(),
                city: "Attleboro".to_string(),
                state: "MA".to_string(),
                postal_code: "02703".to_string(),
                beds: 3,
                baths: 2.5,
                garage_cars: 2,
                sq_ft: Some(1950),
                price: Some(689000.0),
                status: Some(HomeStatus::Uc),
                description: "Under construction, ready soon.".to_string(),
                ..Default::default()
            },
        )
        .await?;
    }

    Ok(())
}
