use chrono::Utc;
use serde_json::{json, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Attachment, AttachmentForm, OwnerKind, OwnerRef, Photo, PhotoForm};

fn photo_from_row(row: &SqliteRow) -> Photo {
    let kind = OwnerKind::parse(row.get::<String, _>("owner_kind").as_str())
        .unwrap_or(OwnerKind::Community);
    Photo {
        id: row.get("id"),
        owner: OwnerRef::new(kind, row.get("owner_id")),
        image: row.get("image"),
        caption: row.get("caption"),
        sort_order: row.get("sort_order"),
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

fn attachment_from_row(row: &SqliteRow) -> Attachment {
    let kind = OwnerKind::parse(row.get::<String, _>("owner_kind").as_str())
        .unwrap_or(OwnerKind::Community);
    Attachment {
        id: row.get("id"),
        owner: OwnerRef::new(kind, row.get("owner_id")),
        title: row.get("title"),
        file: row.get("file"),
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

/// Photos of one owner, exact (kind, id) match, stable (sort_order, id)
/// ordering.
pub async fn photos_for(db: &Database, owner: OwnerRef) -> AppResult<Vec<Photo>> {
    let rows = sqlx::query(
        "SELECT id, owner_kind, owner_id, image, caption, sort_order, created, updated \
         FROM photos WHERE owner_kind = ? AND owner_id = ? ORDER BY sort_order ASC, id ASC",
    )
    .bind(owner.kind.as_str())
    .bind(owner.id)
    .fetch_all(db.pool())
    .await?;
    Ok(rows.iter().map(photo_from_row).collect())
}

pub async fn get_photo(db: &Database, id: i64) -> AppResult<Option<Photo>> {
    let row = sqlx::query(
        "SELECT id, owner_kind, owner_id, image, caption, sort_order, created, updated \
         FROM photos WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?;
    Ok(row.as_ref().map(photo_from_row))
}

pub async fn add_photo(db: &Database, owner: OwnerRef, form: &PhotoForm) -> AppResult<Photo> {
    if form.image.trim().is_empty() {
        return Err(AppError::Validation("image is required".to_string()));
    }
    if resolve_owner(db, owner).await?.is_none() {
        return Err(AppError::Validation(format!(
            "{} {} does not exist",
            owner.kind.as_str(),
            owner.id
        )));
    }
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO photos (owner_kind, owner_id, image, caption, sort_order, created, updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(owner.kind.as_str())
    .bind(owner.id)
    .bind(&form.image)
    .bind(&form.caption)
    .bind(form.sort_order)
    .bind(now)
    .bind(now)
    .execute(db.pool())
    .await?;

    Ok(Photo {
        id: result.last_insert_rowid(),
        owner,
        image: form.image.clone(),
        caption: form.caption.clone(),
        sort_order: form.sort_order,
        created: now,
        updated: now,
    })
}

pub async fn update_photo(db: &Database, id: i64, form: &PhotoForm) -> AppResult<Photo> {
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE photos SET image = ?, caption = ?, sort_order = ?, updated = ? WHERE id = ?",
    )
    .bind(&form.image)
    .bind(&form.caption)
    .bind(form.sort_order)
    .bind(now)
    .bind(id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("photo {} not found", id)));
    }
    get_photo(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("photo {} missing after update", id)))
}

pub async fn delete_photo(db: &Database, id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM photos WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await?;
    Ok(())
}

pub async fn attachments_for(db: &Database, owner: OwnerRef) -> AppResult<Vec<Attachment>> {
    let rows = sqlx::query(
        "SELECT id, owner_kind, owner_id, title, file, created, updated \
         FROM attachments WHERE owner_kind = ? AND owner_id = ? ORDER BY id ASC",
    )
    .bind(owner.kind.as_str())
    .bind(owner.id)
    .fetch_all(db.pool())
    .await?;
    Ok(rows.iter().map(attachment_from_row).collect())
}

pub async fn get_attachment(db: &Database, id: i64) -> AppResult<Option<Attachment>> {
    let row = sqlx::query(
        "SELECT id, owner_kind, owner_id, title, file, created, updated \
         FROM attachments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?;
    Ok(row.as_ref().map(attachment_from_row))
}

pub async fn add_attachment(
    db: &Database,
    owner: OwnerRef,
    form: &AttachmentForm,
) -> AppResult<Attachment> {
    if form.file.trim().is_empty() {
        return Err(AppError::Validation("file is required".to_string()));
    }
    if resolve_owner(db, owner).await?.is_none() {
        return Err(AppError::Validation(format!(
            "{} {} does not exist",
            owner.kind.as_str(),
            owner.id
        )));
    }
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO attachments (owner_kind, owner_id, title, file, created, updated) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(owner.kind.as_str())
    .bind(owner.id)
    .bind(&form.title)
    .bind(&form.file)
    .bind(now)
    .bind(now)
    .execute(db.pool())
    .await?;

    Ok(Attachment {
        id: result.last_insert_rowid(),
        owner,
        title: form.title.clone(),
        file: form.file.clone(),
        created: now,
        updated: now,
    })
}

pub async fn delete_attachment(db: &Database, id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM attachments WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await?;
    Ok(())
}

/// Resolve the owning row behind a generic reference. `Ok(None)` means the
/// reference is stale (the owner is gone) — callers treat that as a
/// data-integrity warning, not a failure.
pub async fn resolve_owner(db: &Database, owner: OwnerRef) -> AppResult<Option<Value>> {
    let summary = match owner.kind {
        OwnerKind::Community => super::communities::get(db, owner.id)
            .await?
            .map(|c| json!({"kind": "community", "id": c.id, "name": c.name, "slug": c.slug})),
        OwnerKind::Plan => super::plans::get(db, owner.id)
            .await?
            .map(|p| json!({"kind": "plan", "id": p.id, "name": p.name, "slug": p.slug})),
        OwnerKind::Home => super::homes::get(db, owner.id)
            .await?
            .map(|h| {
                json!({"kind": "home", "id": h.id, "name": h.full_address(), "slug": h.slug})
            }),
        OwnerKind::GalleryItem => super::gallery::get(db, owner.id)
            .await?
            .map(|g| json!({"kind": "gallery_item", "id": g.id, "name": g.title})),
    };
    Ok(summary)
}
