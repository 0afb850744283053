use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{FloorPlan, FloorPlanForm, OwnerKind, PlanAvailability, PlanAvailabilityForm, PlanSeries};
use crate::slug::derive_slug;

use super::{bind_args, non_blank, normalize_page, parse_digits, Page, SqlArg, PAGE_SIZE};

const COLUMNS: &str = "id, slug, name, series_id, beds, baths, garage_cars, sq_ft_min, \
     sq_ft_max, base_price, description, is_featured, featured_rank, created, updated";

fn from_row(row: &SqliteRow) -> FloorPlan {
    FloorPlan {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        series_id: row.get("series_id"),
        beds: row.get("beds"),
        baths: row.get("baths"),
        garage_cars: row.get("garage_cars"),
        sq_ft_min: row.get("sq_ft_min"),
        sq_ft_max: row.get("sq_ft_max"),
        base_price: row.get("base_price"),
        description: row.get("description"),
        is_featured: row.get::<i64, _>("is_featured") != 0,
        featured_rank: row.get("featured_rank"),
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

fn availability_from_row(row: &SqliteRow) -> PlanAvailability {
    PlanAvailability {
        id: row.get("id"),
        plan_id: row.get("plan_id"),
        community_id: row.get("community_id"),
        is_available: row.get::<i64, _>("is_available") != 0,
        base_price_override: row.get("base_price_override"),
        notes: row.get("notes"),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    pub min_beds: Option<i64>,
    pub min_sqft: Option<i64>,
    pub max_sqft: Option<i64>,
    pub q: Option<String>,
}

impl PlanFilter {
    /// Numeric params are honored only when the raw input is a plain digit
    /// run; anything else applies no constraint.
    pub fn parse(
        beds: Option<&str>,
        min_sqft: Option<&str>,
        max_sqft: Option<&str>,
        q: Option<&str>,
    ) -> Self {
        Self {
            min_beds: parse_digits(beds),
            min_sqft: parse_digits(min_sqft),
            max_sqft: parse_digits(max_sqft),
            q: non_blank(q),
        }
    }

    fn where_clause(&self) -> (String, Vec<SqlArg>) {
        let mut sql = String::new();
        let mut args = Vec::new();
        if let Some(beds) = self.min_beds {
            sql.push_str(" AND beds >= ?");
            args.push(SqlArg::Int(beds));
        }
        if let Some(min_sqft) = self.min_sqft {
            sql.push_str(" AND sq_ft_min >= ?");
            args.push(SqlArg::Int(min_sqft));
        }
        if let Some(max_sqft) = self.max_sqft {
            sql.push_str(" AND sq_ft_max <= ?");
            args.push(SqlArg::Int(max_sqft));
        }
        if let Some(q) = &self.q {
            sql.push_str(" AND (name LIKE '%' || ? || '%' OR description LIKE '%' || ? || '%')");
            args.push(SqlArg::Text(q.clone()));
            args.push(SqlArg::Text(q.clone()));
        }
        (sql, args)
    }
}

pub async fn list(db: &Database, filter: &PlanFilter, page: Option<i64>) -> AppResult<Page<FloorPlan>> {
    let page = normalize_page(page);
    let (where_sql, args) = filter.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM floor_plans WHERE 1=1{}", where_sql);
    let total: i64 = bind_args(sqlx::query(&count_sql), &args)
        .fetch_one(db.pool())
        .await?
        .get(0);

    let list_sql = format!(
        "SELECT {} FROM floor_plans WHERE 1=1{} ORDER BY name ASC LIMIT ? OFFSET ?",
        COLUMNS, where_sql
    );
    let rows = bind_args(sqlx::query(&list_sql), &args)
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(db.pool())
        .await?;

    Ok(Page::new(rows.iter().map(from_row).collect(), page, total))
}

pub async fn all(db: &Database) -> AppResult<Vec<FloorPlan>> {
    let sql = format!("SELECT {} FROM floor_plans ORDER BY name ASC", COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

pub async fn get(db: &Database, id: i64) -> AppResult<Option<FloorPlan>> {
    let sql = format!("SELECT {} FROM floor_plans WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn get_by_slug(db: &Database, slug: &str) -> AppResult<Option<FloorPlan>> {
    let sql = format!("SELECT {} FROM floor_plans WHERE slug = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(slug).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn featured(db: &Database) -> AppResult<Vec<FloorPlan>> {
    let sql = format!(
        "SELECT {} FROM floor_plans WHERE is_featured = 1 \
         ORDER BY featured_rank ASC, name ASC LIMIT 3",
        COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(db.pool()).await?;
    if !rows.is_empty() {
        return Ok(rows.iter().map(from_row).collect());
    }
    let fallback = format!("SELECT {} FROM floor_plans ORDER BY name ASC LIMIT 3", COLUMNS);
    let rows = sqlx::query(&fallback).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

/// Plans offered in a community, through the availability table.
pub async fn for_community(db: &Database, community_id: i64) -> AppResult<Vec<FloorPlan>> {
    let sql = format!(
        "SELECT {} FROM floor_plans WHERE id IN \
         (SELECT plan_id FROM plan_availability WHERE community_id = ? AND is_available = 1) \
         ORDER BY name ASC",
        COLUMNS
    );
    let rows = sqlx::query(&sql).bind(community_id).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

pub async fn create(db: &Database, form: &FloorPlanForm) -> AppResult<FloorPlan> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let slug = derive_slug(&form.slug, &form.name, "plan");
    let now = Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO floor_plans \
         (slug, name, series_id, beds, baths, garage_cars, sq_ft_min, sq_ft_max, base_price, \
          description, is_featured, featured_rank, created, updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&slug)
    .bind(&form.name)
    .bind(form.series_id)
    .bind(form.beds)
    .bind(form.baths)
    .bind(form.garage_cars)
    .bind(form.sq_ft_min)
    .bind(form.sq_ft_max)
    .bind(form.base_price)
    .bind(&form.description)
    .bind(form.is_featured as i64)
    .bind(form.featured_rank)
    .bind(now)
    .bind(now)
    .execute(db.pool())
    .await?;

    let id = result.last_insert_rowid();
    get(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("floor plan {} missing after insert", id)))
}

pub async fn update(db: &Database, id: i64, form: &FloorPlanForm) -> AppResult<FloorPlan> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let now = Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE floor_plans SET name = ?, series_id = ?, beds = ?, baths = ?, garage_cars = ?, \
         sq_ft_min = ?, sq_ft_max = ?, base_price = ?, description = ?, is_featured = ?, \
         featured_rank = ?, updated = ? WHERE id = ?",
    )
    .bind(&form.name)
    .bind(form.series_id)
    .bind(form.beds)
    .bind(form.baths)
    .bind(form.garage_cars)
    .bind(form.sq_ft_min)
    .bind(form.sq_ft_max)
    .bind(form.base_price)
    .bind(&form.description)
    .bind(form.is_featured as i64)
    .bind(form.featured_rank)
    .bind(now)
    .bind(id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("floor plan {} not found", id)));
    }
    get(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("floor plan {} missing after update", id)))
}

/// Plan deletion keeps referencing homes but clears their plan pointer, then
/// removes the plan with its media and availability rows.
pub async fn delete(db: &Database, id: i64) -> AppResult<()> {
    let kind = OwnerKind::Plan.as_str();
    let mut tx = db.begin().await?;
    sqlx::query("UPDATE available_homes SET plan_id = NULL WHERE plan_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM plan_availability WHERE plan_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM photos WHERE owner_kind = ? AND owner_id = ?")
        .bind(kind)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM attachments WHERE owner_kind = ? AND owner_id = ?")
        .bind(kind)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE leads SET target_kind = NULL, target_id = NULL \
                 WHERE target_kind = ? AND target_id = ?")
        .bind(kind)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM floor_plans WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Plan series

pub async fn series_all(db: &Database) -> AppResult<Vec<PlanSeries>> {
    let rows = sqlx::query("SELECT id, name FROM plan_series ORDER BY name ASC")
        .fetch_all(db.pool())
        .await?;
    Ok(rows
        .iter()
        .map(|row| PlanSeries {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

pub async fn series_create(db: &Database, name: &str) -> AppResult<PlanSeries> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let result = sqlx::query("INSERT INTO plan_series (name) VALUES (?)")
        .bind(name.trim())
        .execute(db.pool())
        .await?;
    Ok(PlanSeries {
        id: result.last_insert_rowid(),
        name: name.trim().to_string(),
    })
}

pub async fn series_delete(db: &Database, id: i64) -> AppResult<()> {
    let mut tx = db.begin().await?;
    sqlx::query("UPDATE floor_plans SET series_id = NULL WHERE series_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM plan_series WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Plan availability (through-table between plans and communities)

pub async fn availability_for_community(
    db: &Database,
    community_id: i64,
) -> AppResult<Vec<PlanAvailability>> {
    let rows = sqlx::query(
        "SELECT id, plan_id, community_id, is_available, base_price_override, notes \
         FROM plan_availability WHERE community_id = ? ORDER BY id ASC",
    )
    .bind(community_id)
    .fetch_all(db.pool())
    .await?;
    Ok(rows.iter().map(availability_from_row).collect())
}

pub async fn availability_for_plan(db: &Database, plan_id: i64) -> AppResult<Vec<PlanAvailability>> {
    let rows = sqlx::query(
        "SELECT id, plan_id, community_id, is_available, base_price_override, notes \
         FROM plan_availability WHERE plan_id = ? ORDER BY id ASC",
    )
    .bind(plan_id)
    .fetch_all(db.pool())
    .await?;
    Ok(rows.iter().map(availability_from_row).collect())
}

/// At most one availability row per (plan, community) pair; a second insert
/// for the same pair fails as a conflict.
pub async fn availability_create(
    db: &Database,
    form: &PlanAvailabilityForm,
) -> AppResult<PlanAvailability> {
    if get(db, form.plan_id).await?.is_none() {
        return Err(AppError::Validation(format!("floor plan {} does not exist", form.plan_id)));
    }
    if super::communities::get(db, form.community_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "community {} does not exist",
            form.community_id
        )));
    }
    let result = sqlx::query(
        "INSERT INTO plan_availability (plan_id, community_id, is_available, base_price_override, notes) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(form.plan_id)
    .bind(form.community_id)
    .bind(form.is_available as i64)
    .bind(form.base_price_override)
    .bind(&form.notes)
    .execute(db.pool())
    .await?;

    Ok(PlanAvailability {
        id: result.last_insert_rowid(),
        plan_id: form.plan_id,
        community_id: form.community_id,
        is_available: form.is_available,
        base_price_override: form.base_price_override,
        notes: form.notes.clone(),
    })
}

pub async fn availability_update(
    db: &Database,
    id: i64,
    form: &PlanAvailabilityForm,
) -> AppResult<PlanAvailability> {
    let result = sqlx::query(
        "UPDATE plan_availability SET is_available = ?, base_price_override = ?, notes = ? \
         WHERE id = ?",
    )
    .bind(form.is_available as i64)
    .bind(form.base_price_override)
    .bind(&form.notes)
    .bind(id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("plan availability {} not found", id)));
    }
    let row = sqlx::query(
        "SELECT id, plan_id, community_id, is_available, base_price_override, notes \
         FROM plan_availability WHERE id = ?",
    )
    .bind(id)
    .fetch_one(db.pool())
    .await?;
    Ok(availability_from_row(&row))
}

pub async fn availability_delete(db: &Database, id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM plan_availability WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await?;
    Ok(())
}
