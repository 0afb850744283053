use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{GalleryCategory, GalleryItem, GalleryItemForm, OwnerKind, OwnerRef};

fn from_row(row: &SqliteRow) -> GalleryItem {
    let link = match (
        row.get::<Option<String>, _>("link_kind"),
        row.get::<Option<i64>, _>("link_id"),
    ) {
        (Some(kind), Some(id)) => OwnerKind::parse(&kind).map(|k| OwnerRef::new(k, id)),
        _ => None,
    };
    GalleryItem {
        id: row.get("id"),
        category: GalleryCategory::parse(row.get::<String, _>("category").as_str())
            .unwrap_or(GalleryCategory::Other),
        title: row.get("title"),
        image: row.get("image"),
        caption: row.get("caption"),
        sort_order: row.get("sort_order"),
        link,
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

const COLUMNS: &str =
    "id, category, title, image, caption, sort_order, link_kind, link_id, created, updated";

/// Gallery listing in (sort_order, id) order, optionally narrowed to one
/// category.
pub async fn list(db: &Database, category: Option<GalleryCategory>) -> AppResult<Vec<GalleryItem>> {
    let rows = match category {
        Some(category) => {
            let sql = format!(
                "SELECT {} FROM gallery_items WHERE category = ? ORDER BY sort_order ASC, id ASC",
                COLUMNS
            );
            sqlx::query(&sql)
                .bind(category.as_str())
                .fetch_all(db.pool())
                .await?
        }
        None => {
            let sql = format!(
                "SELECT {} FROM gallery_items ORDER BY sort_order ASC, id ASC",
                COLUMNS
            );
            sqlx::query(&sql).fetch_all(db.pool()).await?
        }
    };
    Ok(rows.iter().map(from_row).collect())
}

pub async fn get(db: &Database, id: i64) -> AppResult<Option<GalleryItem>> {
    let sql = format!("SELECT {} FROM gallery_items WHERE id = ?", COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(from_row))
}

pub async fn create(db: &Database, form: &GalleryItemForm) -> AppResult<GalleryItem> {
    if form.image.trim().is_empty() {
        return Err(AppError::Validation("image is required".to_string()));
    }
    let link = form.link();
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO gallery_items \
         (category, title, image, caption, sort_order, link_kind, link_id, created, updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(form.category.as_str())
    .bind(&form.title)
    .bind(&form.image)
    .bind(&form.caption)
    .bind(form.sort_order)
    .bind(link.map(|l| l.kind.as_str()))
    .bind(link.map(|l| l.id))
    .bind(now)
    .bind(now)
    .execute(db.pool())
    .await?;

    let id = result.last_insert_rowid();
    get(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("gallery item {} missing after insert", id)))
}

pub async fn update(db: &Database, id: i64, form: &GalleryItemForm) -> AppResult<GalleryItem> {
    let link = form.link();
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE gallery_items SET category = ?, title = ?, image = ?, caption = ?, \
         sort_order = ?, link_kind = ?, link_id = ?, updated = ? WHERE id = ?",
    )
    .bind(form.category.as_str())
    .bind(&form.title)
    .bind(&form.image)
    .bind(&form.caption)
    .bind(form.sort_order)
    .bind(link.map(|l| l.kind.as_str()))
    .bind(link.map(|l| l.id))
    .bind(now)
    .bind(id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("gallery item {} not found", id)));
    }
    get(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("gallery item {} missing after update", id)))
}

/// Gallery items own photos generically like catalog entities do, so the
/// delete cascades the same way.
pub async fn delete(db: &Database, id: i64) -> AppResult<()> {
    let kind = OwnerKind::GalleryItem.as_str();
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
    sqlx::query("DELETE FROM gallery_items WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
