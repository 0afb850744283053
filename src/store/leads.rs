use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Lead, LeadForm, LeadSource, OwnerKind, OwnerRef};

use super::{bind_args, normalize_page, parse_digits, Page, SqlArg, PAGE_SIZE};

fn from_row(row: &SqliteRow) -> Lead {
    let target = match (
        row.get::<Option<String>, _>("target_kind"),
        row.get::<Option<i64>, _>("target_id"),
    ) {
        (Some(kind), Some(id)) => OwnerKind::parse(&kind).map(|k| OwnerRef::new(k, id)),
        _ => None,
    };
    Lead {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        message: row.get("message"),
        source: LeadSource::parse(row.get::<String, _>("source").as_str())
            .unwrap_or(LeadSource::Global),
        page_url: row.get("page_url"),
        target,
        created: row.get("created"),
    }
}

/// Persist a validated contact submission. Leads are append-only; there is no
/// update path.
pub async fn create(
    db: &Database,
    form: &LeadForm,
    source: LeadSource,
    page_url: &str,
    target: Option<OwnerRef>,
) -> AppResult<Lead> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Err(AppError::FieldErrors(errors));
    }
    let now = Utc::now().timestamp();
    let result = sqlx::query(
        "INSERT INTO leads (name, email, phone, message, source, page_url, target_kind, target_id, created) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(form.name.trim())
    .bind(form.email.trim())
    .bind(&form.phone)
    .bind(&form.message)
    .bind(source.as_str())
    .bind(page_url)
    .bind(target.map(|t| t.kind.as_str()))
    .bind(target.map(|t| t.id))
    .bind(now)
    .execute(db.pool())
    .await?;

    Ok(Lead {
        id: result.last_insert_rowid(),
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.clone(),
        message: form.message.clone(),
        source,
        page_url: page_url.to_string(),
        target,
        created: now,
    })
}

/// Portal lead listing, newest first, with optional source and unix-time
/// bounds. Like the public filters, malformed values apply no constraint.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub source: Option<LeadSource>,
    pub since: Option<i64>,
    pub until: Option<i64>,
}

impl LeadFilter {
    pub fn parse(source: Option<&str>, since: Option<&str>, until: Option<&str>) -> Self {
        Self {
            source: source.and_then(LeadSource::parse),
            since: parse_digits(since),
            until: parse_digits(until),
        }
    }

    fn where_clause(&self) -> (String, Vec<SqlArg>) {
        let mut sql = String::new();
        let mut args = Vec::new();
        if let Some(source) = self.source {
            sql.push_str(" AND source = ?");
            args.push(SqlArg::Text(source.as_str().to_string()));
        }
        if let Some(since) = self.since {
            sql.push_str(" AND created >= ?");
            args.push(SqlArg::Int(since));
        }
        if let Some(until) = self.until {
            sql.push_str(" AND created <= ?");
            args.push(SqlArg::Int(until));
        }
        (sql, args)
    }
}

pub async fn list(db: &Database, filter: &LeadFilter, page: Option<i64>) -> AppResult<Page<Lead>> {
    let page = normalize_page(page);
    let (where_sql, args) = filter.where_clause();

    let count_sql = format!("SELECT COUNT(*) FROM leads WHERE 1=1{}", where_sql);
    let total: i64 = bind_args(sqlx::query(&count_sql), &args)
        .fetch_one(db.pool())
        .await?
        .get(0);

    let list_sql = format!(
        "SELECT id, name, email, phone, message, source, page_url, target_kind, target_id, created \
         FROM leads WHERE 1=1{} ORDER BY created DESC, id DESC LIMIT ? OFFSET ?",
        where_sql
    );
    let rows = bind_args(sqlx::query(&list_sql), &args)
        .bind(PAGE_SIZE)
        .bind((page - 1) * PAGE_SIZE)
        .fetch_all(db.pool())
        .await?;

    Ok(Page::new(rows.iter().map(from_row).collect(), page, total))
}

pub async fn get(db: &Database, id: i64) -> AppResult<Option<Lead>> {
    let row = sqlx::query(
        "SELECT id, name, email, phone, message, source, page_url, target_kind, target_id, created \
         FROM leads WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db.pool())
    .await?;
    Ok(row.as_ref().map(from_row))
}
