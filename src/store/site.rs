use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Announcement, AnnouncementForm, SiteSettings, SiteSettingsForm};

fn settings_from_row(row: &SqliteRow) -> SiteSettings {
    SiteSettings {
        id: row.get("id"),
        site_name: row.get("site_name"),
        primary_phone: row.get("primary_phone"),
        primary_phone_link: row.get("primary_phone_link"),
        primary_email: row.get("primary_email"),
        address_line1: row.get("address_line1"),
        address_line2: row.get("address_line2"),
        city: row.get("city"),
        state: row.get("state"),
        postal_code: row.get("postal_code"),
        lead_recipients: row.get("lead_recipients"),
        hero_headline: row.get("hero_headline"),
        hero_subheadline: row.get("hero_subheadline"),
        cta_heading: row.get("cta_heading"),
        cta_body: row.get("cta_body"),
        cta_phone_label: row.get("cta_phone_label"),
        communities_intro: row.get("communities_intro"),
        plans_intro: row.get("plans_intro"),
        homes_intro: row.get("homes_intro"),
        updated: row.get("updated"),
    }
}

fn announcement_from_row(row: &SqliteRow) -> Announcement {
    Announcement {
        id: row.get("id"),
        title: row.get("title"),
        message: row.get("message"),
        button_label: row.get("button_label"),
        button_url: row.get("button_url"),
        is_active: row.get::<i64, _>("is_active") != 0,
        created: row.get("created"),
        updated: row.get("updated"),
    }
}

const SETTINGS_COLUMNS: &str = "id, site_name, primary_phone, primary_phone_link, primary_email, \
     address_line1, address_line2, city, state, postal_code, lead_recipients, hero_headline, \
     hero_subheadline, cta_heading, cta_body, cta_phone_label, communities_intro, plans_intro, \
     homes_intro, updated";

/// The single logical settings row, when one has been created.
pub async fn settings(db: &Database) -> AppResult<Option<SiteSettings>> {
    let sql = format!(
        "SELECT {} FROM site_settings ORDER BY id ASC LIMIT 1",
        SETTINGS_COLUMNS
    );
    let row = sqlx::query(&sql).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(settings_from_row))
}

/// Settings for rendering: absence of the row maps to the explicit default
/// value instead of leaking an optional into every template.
pub async fn settings_or_default(db: &Database) -> AppResult<SiteSettings> {
    Ok(settings(db).await?.unwrap_or_default())
}

/// Write the settings. Updates the first row in place, or creates it when
/// the table is still empty, so there is never more than one logical row.
pub async fn update_settings(db: &Database, form: &SiteSettingsForm) -> AppResult<SiteSettings> {
    let now = Utc::now().timestamp();
    match settings(db).await? {
        Some(existing) => {
            sqlx::query(
                "UPDATE site_settings SET site_name = ?, primary_phone = ?, primary_phone_link = ?, \
                 primary_email = ?, address_line1 = ?, address_line2 = ?, city = ?, state = ?, \
                 postal_code = ?, lead_recipients = ?, hero_headline = ?, hero_subheadline = ?, \
                 cta_heading = ?, cta_body = ?, cta_phone_label = ?, communities_intro = ?, \
                 plans_intro = ?, homes_intro = ?, updated = ? WHERE id = ?",
            )
            .bind(&form.site_name)
            .bind(&form.primary_phone)
            .bind(&form.primary_phone_link)
            .bind(&form.primary_email)
            .bind(&form.address_line1)
            .bind(&form.address_line2)
            .bind(&form.city)
            .bind(&form.state)
            .bind(&form.postal_code)
            .bind(&form.lead_recipients)
            .bind(&form.hero_headline)
            .bind(&form.hero_subheadline)
            .bind(&form.cta_heading)
            .bind(&form.cta_body)
            .bind(&form.cta_phone_label)
            .bind(&form.communities_intro)
            .bind(&form.plans_intro)
            .bind(&form.homes_intro)
            .bind(now)
            .bind(existing.id)
            .execute(db.pool())
            .await?;
        }
        None => {
            sqlx::query(
                "INSERT INTO site_settings (site_name, primary_phone, primary_phone_link, \
                 primary_email, address_line1, address_line2, city, state, postal_code, \
                 lead_recipients, hero_headline, hero_subheadline, cta_heading, cta_body, \
                 cta_phone_label, communities_intro, plans_intro, homes_intro, updated) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&form.site_name)
            .bind(&form.primary_phone)
            .bind(&form.primary_phone_link)
            .bind(&form.primary_email)
            .bind(&form.address_line1)
            .bind(&form.address_line2)
            .bind(&form.city)
            .bind(&form.state)
            .bind(&form.postal_code)
            .bind(&form.lead_recipients)
            .bind(&form.hero_headline)
            .bind(&form.hero_subheadline)
            .bind(&form.cta_heading)
            .bind(&form.cta_body)
            .bind(&form.cta_phone_label)
            .bind(&form.communities_intro)
            .bind(&form.plans_intro)
            .bind(&form.homes_intro)
            .bind(now)
            .execute(db.pool())
            .await?;
        }
    }
    settings(db)
        .await?
        .ok_or_else(|| AppError::Internal("site settings missing after write".to_string()))
}

const ANNOUNCEMENT_COLUMNS: &str =
    "id, title, message, button_label, button_url, is_active, created, updated";

/// The banner currently shown: most recently updated active row, or nothing.
pub async fn current_announcement(db: &Database) -> AppResult<Option<Announcement>> {
    let sql = format!(
        "SELECT {} FROM announcements WHERE is_active = 1 \
         ORDER BY updated DESC, id DESC LIMIT 1",
        ANNOUNCEMENT_COLUMNS
    );
    let row = sqlx::query(&sql).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(announcement_from_row))
}

pub async fn announcements(db: &Database) -> AppResult<Vec<Announcement>> {
    let sql = format!(
        "SELECT {} FROM announcements ORDER BY updated DESC, id DESC",
        ANNOUNCEMENT_COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(db.pool()).await?;
    Ok(rows.iter().map(announcement_from_row).collect())
}

pub async fn get_announcement(db: &Database, id: i64) -> AppResult<Option<Announcement>> {
    let sql = format!("SELECT {} FROM announcements WHERE id = ?", ANNOUNCEMENT_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(db.pool()).await?;
    Ok(row.as_ref().map(announcement_from_row))
}

pub async fn create_announcement(db: &Database, form: &AnnouncementForm) -> AppResult<Announcement> {
    if form.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO announcements (title, message, button_label, button_url, is_active, created, updated) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&form.title)
    .bind(&form.message)
    .bind(&form.button_label)
    .bind(&form.button_url)
    .bind(form.is_active as i64)
    .bind(now)
    .bind(now)
    .execute(db.pool())
    .await?;

    let id = result.last_insert_rowid();
    get_announcement(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("announcement {} missing after insert", id)))
}

pub async fn update_announcement(
    db: &Database,
    id: i64,
    form: &AnnouncementForm,
) -> AppResult<Announcement> {
    if form.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE announcements SET title = ?, message = ?, button_label = ?, button_url = ?, \
         is_active = ?, updated = ? WHERE id = ?",
    )
    .bind(&form.title)
    .bind(&form.message)
    .bind(&form.button_label)
    .bind(&form.button_url)
    .bind(form.is_active as i64)
    .bind(now)
    .bind(id)
    .execute(db.pool())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("announcement {} not found", id)));
    }
    get_announcement(db, id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("announcement {} missing after update", id)))
}

pub async fn delete_announcement(db: &Database, id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM announcements WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await?;
    Ok(())
}
