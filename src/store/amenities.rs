use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::Amenity;

pub async fn all(db: &Database) -> AppResult<Vec<Amenity>> {
    let rows = sqlx::query("SELECT id, name FROM amenities ORDER BY name ASC")
        .fetch_all(db.pool())
        .await?;
    Ok(rows
        .iter()
        .map(|row| Amenity {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

/// Amenities attached to one community, by name.
pub async fn for_community(db: &Database, community_id: i64) -> AppResult<Vec<Amenity>> {
    let rows = sqlx::query(
        "SELECT a.id, a.name FROM amenities a \
         JOIN community_amenities ca ON ca.amenity_id = a.id \
         WHERE ca.community_id = ? ORDER BY a.name ASC",
    )
    .bind(community_id)
    .fetch_all(db.pool())
    .await?;
    Ok(rows
        .iter()
        .map(|row| Amenity {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

/// Name uniqueness is enforced at write time by the schema; duplicates come
/// back as conflicts.
pub async fn create(db: &Database, name: &str) -> AppResult<Amenity> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let result = sqlx::query("INSERT INTO amenities (name) VALUES (?)")
        .bind(name.trim())
        .execute(db.pool())
        .await?;
    Ok(Amenity {
        id: result.last_insert_rowid(),
        name: name.trim().to_string(),
    })
}

pub async fn delete(db: &Database, id: i64) -> AppResult<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM community_amenities WHERE amenity_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM amenities WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Replace a community's amenity set wholesale, the way the portal form
/// submits it.
pub async fn set_for_community(
    db: &Database,
    community_id: i64,
    amenity_ids: &[i64],
) -> AppResult<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM community_amenities WHERE community_id = ?")
        .bind(community_id)
        .execute(&mut *tx)
        .await?;
    for amenity_id in amenity_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO community_amenities (community_id, amenity_id) VALUES (?, ?)",
        )
        .bind(community_id)
        .bind(amenity_id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
