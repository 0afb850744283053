use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Community, CommunityForm, CommunityStatus, OwnerKind};
use crate::slug::derive_slug;

use super::{bind_args, non_blank, normalize_page, Page, SqlArg, PAGE_SIZE};

const COLUMNS: &str = "id, slug, name, tagline, city, state, county, latitude, longitude, \
     status, description, is_featured, featured_rank, created, updated";

fn from_row(row: &SqliteRow) -> Community {
    Community {
        id: row.get("id"),
        slug: row.get("slug"),
        name: row.get("name"),
        tagline: row.get("tagline"),
        city: row.get("city"),
        state: row.get("state"),
        county: row.get("county"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        status: CommunityStatus::parse(row.get::<String, _>("status").as_str())
            .unwrap_or(CommunityStatus::Active),
        description: row.get("description"),
        is_featured: row.get::<i64, _>("is_featured") != 0,
        featured_rank: row.get("featured_rank"),
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

/// Composed community list filter. Unrecognized status values and blank
/// params apply no constraint at all.
#[derive(Debug, Clone, Default)]
pub struct CommunityFilter {
    pub status: Option<CommunityStatus>,
    pub city: Option<String>,
    pub q: Option<String>,
}

impl CommunityFilter {
    pub fn parse(status: Option<&str>, city: Option<&str>, q: Option<&str>) -> Self {
        Self {
            status: status.and_then(CommunityStatus::parse),
            city: non_blank(city),
            q: non_blank(q),
        }
    }

    fn where_clause(&self) -> (String, Vec<SqlArg>) {
        let mut sql = String::new();
        let mut args = Vec::new();
        if let Some(status) = self.status {
            sql.push_str(" AND status = ?");
            args.push(SqlArg::Text(status.as_str().to_string()));
        }
        if let Some(city) = &self.city {
            sql.push_str(" AND city LIKE '%' || ? || '%'");
            args.push(SqlArg::Text(city.clone()));
        }
        if let Some(q) = &self.q {
            sql.push_str(" AND (name LIKE '%' || ? || '%' OR description LIKE '%' || ? || '%')");
            args.push(SqlArg::Text(q.clone()));
            args.push(SqlArg::Text(q.clone()));
        }
        (sql, args)
    }
}

pub async fn list(
    db: &Database,
    filter: &CommunityFilter,
    page: Option<i64>,
) -> AppResult<Page<Community>> {
    let page = normalize_page(page);
    let (where_sql, args) = filter.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM communities WHERE 1=1{}", where_sql);
    let total: i64 = bind_args(sqlx::query(&count_sql), &args)
        .fetch_one(db.pool())
        .await?
        .get(0);

    let list_sql = format!(
        "SELECT {} FROM communities WHERE 1=1{} ORDER BY name ASC LIMIT ? OFFSET ?",
        COLUMNS, where_sql
    );
    let rows = bind_args(sqlx::query(&list_sql), &args)
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(db.pool())
        .await?;

    let items = rows.iter().map(from_row).collect();
    Ok(Page::new(items, page, total))
}

pub async fn all(db: &Database) -> AppResult<Vec<Community>> {
    let sql = format!("SELECT {} FROM communities ORDER BY name ASC", COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

/// Communities a floor plan is offered in, through the availability table.
pub async fn offering_plan(db: &Database, plan_id: i64) -> AppResult<Vec<Community>> {
    let sql = format!(
        "SELECT {} FROM communities WHERE id IN \
         (SELECT community_id FROM plan_availability WHERE plan_id = ? AND is_available = 1) \
         ORDER BY name ASC",
        COLUMNS
    );
    let rows = sqlx::query(&sql).bind(plan_id).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

pub async fn get(db: &Database, id: i64) -> AppResult<Option<Community>> {
    let sql = format!("SELECT {} FROM communities WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn get_by_slug(db: &Database, slug: &str) -> AppResult<Option<Community>> {
    let sql = format!("SELECT {} FROM communities WHERE slug = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(slug).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(from_row))
}

/// Homepage highlight set: up to three featured communities by (rank, name),
/// falling back to the first three by name when nothing is flagged.
pub async fn featured(db: &Database) -> AppResult<Vec<Community>> {
    let sql = format!(
        "SELECT {} FROM communities WHERE is_featured = 1 \
         ORDER BY featured_rank ASC, name ASC LIMIT 3",
        COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(db.pool()).await?;
    if !rows.is_empty() {
        return Ok(rows.iter().map(from_row).collect());
    }
    let fallback = format!("SELECT {} FROM communities ORDER BY name ASC LIMIT 3", COLUMNS);
    let rows = sqlx::query(&fallback).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

pub async fn create(db: &Database, form: &CommunityForm) -> AppResult<Community> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let slug = derive_slug(&form.slug, &form.name, "community");
    let status = form.status.unwrap_or(CommunityStatus::Active);
    let now = Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO communities \
         (slug, name, tagline, city, state, county, latitude, longitude, status, description, \
          is_featured, featured_rank, created, updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&slug)
    .bind(&form.name)
    .bind(&form.tagline)
    .bind(&form.city)
    .bind(&form.state)
    .bind(&form.county)
    .bind(form.latitude)
    .bind(form.longitude)
    .bind(status.as_str())
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
        .ok_or_else(|| AppError::Internal(format!("community {} missing after insert", id)))
}

/// Update every mutable field. The stored slug is kept as-is: slugs never
/// change once assigned.
pub async fn update(db: &Database, id: i64, form: &CommunityForm) -> AppResult<Community> {
    if form.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let status = form.status.unwrap_or(CommunityStatus::Active);
    let now = Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE communities SET name = ?, tagline = ?, city = ?, state = ?, county = ?, \
         latitude = ?, longitude = ?, status = ?, description = ?, is_featured = ?, \
         featured_rank = ?, updated = ? WHERE id = ?",
    )
    .bind(&form.name)
    .bind(&form.tagline)
    .bind(&form.city)
    .bind(&form.state)
    .bind(&form.county)
    .bind(form.latitude)
    .bind(form.longitude)
    .bind(status.as_str())
    .bind(&form.description)
    .bind(form.is_featured as i64)
    .bind(form.featured_rank)
    .bind(now)
    .bind(id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("community {} not found", id)));
    }
    get(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("community {} missing after update", id)))
}

/// Deletion is blocked while available homes still reference the community;
/// otherwise the community goes away together with its photos, attachments,
/// amenity links, and plan availability rows, and any leads pointing at it
/// keep the row but lose the reference.
pub async fn delete(db: &Database, id: i64) -> AppResult<()> {
    let homes: i64 = sqlx::query("SELECT COUNT(*) FROM available_homes WHERE community_id = ?")
        .bind(id)
        .fetch_one(db.pool())
        .await?
        .get(0);
    if homes > 0 {
        return Err(AppError::Validation(format!(
            "community has {} available home(s); delete or reassign them first",
            homes
        )));
    }

    let kind = OwnerKind::Community.as_str();
    let mut tx = db.begin().await?;
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
    sqlx::query("DELETE FROM community_amenities WHERE community_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM plan_availability WHERE community_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE leads SET target_kind = NULL, target_id = NULL \
                 WHERE target_kind = ? AND target_id = ?")
        .bind(kind)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM communities WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
