use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{AvailableHome, AvailableHomeForm, HomeStatus, OwnerKind};
use crate::slug::derive_slug;

use super::{bind_args, non_blank, normalize_page, parse_digits, parse_number, Page, SqlArg, PAGE_SIZE};

const COLUMNS: &str = "id, community_id, plan_id, slug, lot_number, mls_number, address_1, \
     address_2, city, state, postal_code, beds, baths, garage_cars, sq_ft, year_built, price, \
     ready_date, status, description, is_featured, featured_rank, created, updated";

fn from_row(row: &SqliteRow) -> AvailableHome {
    AvailableHome {
        id: row.get("id"),
        community_id: row.get("community_id"),
        plan_id: row.get("plan_id"),
        slug: row.get("slug"),
        lot_number: row.get("lot_number"),
        mls_number: row.get("mls_number"),
        address_1: row.get("address_1"),
        address_2: row.get("address_2"),
        city: row.get("city"),
        state: row.get("state"),
        postal_code: row.get("postal_code"),
        beds: row.get("beds"),
        baths: row.get("baths"),
        garage_cars: row.get("garage_cars"),
        sq_ft: row.get("sq_ft"),
        year_built: row.get("year_built"),
        price: row.get("price"),
        ready_date: row.get("ready_date"),
        status: HomeStatus::parse(row.get::<String, _>("status").as_str())
            .unwrap_or(HomeStatus::Coming),
        description: row.get("description"),
        is_featured: row.get::<i64, _>("is_featured") != 0,
        featured_rank: row.get("featured_rank"),
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

#[derive(Debug, Clone, Default)]
pub struct HomeFilter {
    pub status: Option<HomeStatus>,
    pub min_beds: Option<i64>,
    pub max_price: Option<f64>,
    pub city: Option<String>,
    pub q: Option<String>,
}

impl HomeFilter {
    pub fn parse(
        status: Option<&str>,
        beds: Option<&str>,
        max_price: Option<&str>,
        city: Option<&str>,
        q: Option<&str>,
    ) -> Self {
        Self {
            status: status.and_then(HomeStatus::parse),
            min_beds: parse_digits(beds),
            max_price: parse_number(max_price),
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
        if let Some(beds) = self.min_beds {
            sql.push_str(" AND beds >= ?");
            args.push(SqlArg::Int(beds));
        }
        if let Some(max_price) = self.max_price {
            sql.push_str(" AND price <= ?");
            args.push(SqlArg::Real(max_price));
        }
        if let Some(city) = &self.city {
            sql.push_str(" AND city LIKE '%' || ? || '%'");
            args.push(SqlArg::Text(city.clone()));
        }
        if let Some(q) = &self.q {
            sql.push_str(" AND (address_1 LIKE '%' || ? || '%' OR description LIKE '%' || ? || '%')");
            args.push(SqlArg::Text(q.clone()));
            args.push(SqlArg::Text(q.clone()));
        }
        (sql, args)
    }
}

pub async fn list(db: &Database, filter: &HomeFilter, page: Option<i64>) -> AppResult<Page<AvailableHome>> {
    let page = normalize_page(page);
    let (where_sql, args) = filter.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM available_homes WHERE 1=1{}", where_sql);
    let total: i64 = bind_args(sqlx::query(&count_sql), &args)
        .fetch_one(db.pool())
        .await?
        .get(0);

    let list_sql = format!(
        "SELECT {} FROM available_homes WHERE 1=1{} ORDER BY created DESC, id DESC LIMIT ? OFFSET ?",
        COLUMNS, where_sql
    );
    let rows = bind_args(sqlx::query(&list_sql), &args)
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(db.pool())
        .await?;

    Ok(Page::new(rows.iter().map(from_row).collect(), page, total))
}

pub async fn all(db: &Database) -> AppResult<Vec<AvailableHome>> {
    let sql = format!("SELECT {} FROM available_homes ORDER BY created DESC, id DESC", COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

pub async fn get(db: &Database, id: i64) -> AppResult<Option<AvailableHome>> {
    let sql = format!("SELECT {} FROM available_homes WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn get_by_slug(db: &Database, slug: &str) -> AppResult<Option<AvailableHome>> {
    let sql = format!("SELECT {} FROM available_homes WHERE slug = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(slug).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn for_community(db: &Database, community_id: i64) -> AppResult<Vec<AvailableHome>> {
    let sql = format!(
        "SELECT {} FROM available_homes WHERE community_id = ? ORDER BY created DESC, id DESC",
        COLUMNS
    );
    let rows = sqlx::query(&sql).bind(community_id).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

pub async fn for_plan(db: &Database, plan_id: i64) -> AppResult<Vec<AvailableHome>> {
    let sql = format!(
        "SELECT {} FROM available_homes WHERE plan_id = ? ORDER BY created DESC, id DESC",
        COLUMNS
    );
    let rows = sqlx::query(&sql).bind(plan_id).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

/// Featured homes order by (rank, newest); fallback is simply the newest
/// three homes.
pub async fn featured(db: &Database) -> AppResult<Vec<AvailableHome>> {
    let sql = format!(
        "SELECT {} FROM available_homes WHERE is_featured = 1 \
         ORDER BY featured_rank ASC, created DESC LIMIT 3",
        COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(db.pool()).await?;
    if !rows.is_empty() {
        return Ok(rows.iter().map(from_row).collect());
    }
    let fallback = format!(
        "SELECT {} FROM available_homes ORDER BY created DESC, id DESC LIMIT 3",
        COLUMNS
    );
    let rows = sqlx::query(&fallback).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

pub async fn create(db: &Database, form: &AvailableHomeForm) -> AppResult<AvailableHome> {
    if super::communities::get(db, form.community_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "community {} does not exist",
            form.community_id
        )));
    }
    let slug = derive_slug(&form.slug, &form.slug_source(), "home");
    let status = form.status.unwrap_or(HomeStatus::Coming);
    let now = Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO available_homes \
         (community_id, plan_id, slug, lot_number, mls_number, address_1, address_2, city, state, \
          postal_code, beds, baths, garage_cars, sq_ft, year_built, price, ready_date, status, \
          description, is_featured, featured_rank, created, updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(form.community_id)
    .bind(form.plan_id)
    .bind(&slug)
    .bind(&form.lot_number)
    .bind(&form.mls_number)
    .bind(&form.address_1)
    .bind(&form.address_2)
    .bind(&form.city)
    .bind(&form.state)
    .bind(&form.postal_code)
    .bind(form.beds)
    .bind(form.baths)
    .bind(form.garage_cars)
    .bind(form.sq_ft)
    .bind(form.year_built)
    .bind(form.price)
    .bind(&form.ready_date)
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
        .ok_or_else(|| AppError::Internal(format!("home {} missing after insert", id)))
}

pub async fn update(db: &Database, id: i64, form: &AvailableHomeForm) -> AppResult<AvailableHome> {
    if super::communities::get(db, form.community_id).await?.is_none() {
        return Err(AppError::Validation(format!(
            "community {} does not exist",
            form.community_id
        )));
    }
    let status = form.status.unwrap_or(HomeStatus::Coming);
    let now = Utc::now().timestamp();

    let result = sqlx::query(
        "UPDATE available_homes SET community_id = ?, plan_id = ?, lot_number = ?, mls_number = ?, \
         address_1 = ?, address_2 = ?, city = ?, state = ?, postal_code = ?, beds = ?, baths = ?, \
         garage_cars = ?, sq_ft = ?, year_built = ?, price = ?, ready_date = ?, status = ?, \
         description = ?, is_featured = ?, featured_rank = ?, updated = ? WHERE id = ?",
    )
    .bind(form.community_id)
    .bind(form.plan_id)
    .bind(&form.lot_number)
    .bind(&form.mls_number)
    .bind(&form.address_1)
    .bind(&form.address_2)
    .bind(&form.city)
    .bind(&form.state)
    .bind(&form.postal_code)
    .bind(form.beds)
    .bind(form.baths)
    .bind(form.garage_cars)
    .bind(form.sq_ft)
    .bind(form.year_built)
    .bind(form.price)
    .bind(&form.ready_date)
    .bind(status.as_str())
    .bind(&form.description)
    .bind(form.is_featured as i64)
    .bind(form.featured_rank)
    .bind(now)
    .bind(id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("home {} not found", id)));
    }
    get(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("home {} missing after update", id)))
}

/// Removing a home takes its photos and attachments with it and clears any
/// lead references, all in one transaction.
pub async fn delete(db: &Database, id: i64) -> AppResult<()> {
    let kind = OwnerKind::Home.as_str();
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
    sqlx::query("UPDATE leads SET target_kind = NULL, target_id = NULL \
                 WHERE target_kind = ? AND target_id = ?")
        .bind(kind)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM available_homes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
