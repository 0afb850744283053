use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{PortalUser, PortalUserForm, StaffRole};

fn from_row(row: &SqliteRow) -> PortalUser {
    PortalUser {
        id: row.get("id"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        email: row.get("email"),
        role: StaffRole::parse(row.get::<String, _>("role").as_str()).unwrap_or(StaffRole::Staff),
        is_active: row.get::<i64, _>("is_active") != 0,
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

const COLUMNS: &str = "id, username, display_name, email, role, is_active, created, updated";

pub async fn all(db: &Database) -> AppResult<Vec<PortalUser>> {
    let sql = format!("SELECT {} FROM portal_users ORDER BY username ASC", COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(from_row).collect())
}

pub async fn get(db: &Database, id: i64) -> AppResult<Option<PortalUser>> {
    let sql = format!("SELECT {} FROM portal_users WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn create(db: &Database, form: &PortalUserForm) -> AppResult<PortalUser> {
    if form.username.trim().is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO portal_users (username, display_name, email, role, is_active, created, updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(form.username.trim())
    .bind(&form.display_name)
    .bind(&form.email)
    .bind(form.role.as_str())
    .bind(form.is_active as i64)
    .bind(now)
    .bind(now)
    .execute(db.pool())
    .await?;

    let id = result.last_insert_rowid();
    get(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("portal user {} missing after insert", id)))
}

pub async fn update(db: &Database, id: i64, form: &PortalUserForm) -> AppResult<PortalUser> {
    if form.username.trim().is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE portal_users SET username = ?, display_name = ?, email = ?, role = ?, \
         is_active = ?, updated = ? WHERE id = ?",
    )
    .bind(form.username.trim())
    .bind(&form.display_name)
    .bind(&form.email)
    .bind(form.role.as_str())
    .bind(form.is_active as i64)
    .bind(now)
    .bind(id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("portal user {} not found", id)));
    }
    get(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("portal user {} missing after update", id)))
}

pub async fn delete(db: &Database, id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM portal_users WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await?;
    Ok(())
}
