use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Async catalog database over a SQLite connection pool.
pub struct Database {
    pool: SqlitePool,
}

// One statement per table or index; executed in order on startup.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS amenities (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS plan_series (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS communities (
        id INTEGER PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        tagline TEXT NOT NULL DEFAULT '',
        city TEXT NOT NULL DEFAULT '',
        state TEXT NOT NULL DEFAULT '',
        county TEXT NOT NULL DEFAULT '',
        latitude REAL,
        longitude REAL,
        status TEXT NOT NULL DEFAULT 'active',
        description TEXT NOT NULL DEFAULT '',
        is_featured INTEGER NOT NULL DEFAULT 0,
        featured_rank INTEGER NOT NULL DEFAULT 0,
        created INTEGER NOT NULL,
        updated INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS community_amenities (
        community_id INTEGER NOT NULL,
        amenity_id INTEGER NOT NULL,
        UNIQUE(community_id, amenity_id)
    )",
    "CREATE TABLE IF NOT EXISTS floor_plans (
        id INTEGER PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        series_id INTEGER,
        beds INTEGER NOT NULL DEFAULT 0,
        baths REAL NOT NULL DEFAULT 0,
        garage_cars INTEGER NOT NULL DEFAULT 0,
        sq_ft_min INTEGER,
        sq_ft_max INTEGER,
        base_price REAL,
        description TEXT NOT NULL DEFAULT '',
        is_featured INTEGER NOT NULL DEFAULT 0,
        featured_rank INTEGER NOT NULL DEFAULT 0,
        created INTEGER NOT NULL,
        updated INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS plan_availability (
        id INTEGER PRIMARY KEY,
        plan_id INTEGER NOT NULL,
        community_id INTEGER NOT NULL,
        is_available INTEGER NOT NULL DEFAULT 1,
        base_price_override REAL,
        notes TEXT NOT NULL DEFAULT '',
        UNIQUE(plan_id, community_id)
    )",
    "CREATE TABLE IF NOT EXISTS available_homes (
        id INTEGER PRIMARY KEY,
        community_id INTEGER NOT NULL,
        plan_id INTEGER,
        slug TEXT NOT NULL UNIQUE,
        lot_number TEXT NOT NULL DEFAULT '',
        mls_number TEXT NOT NULL DEFAULT '',
        address_1 TEXT NOT NULL DEFAULT '',
        address_2 TEXT NOT NULL DEFAULT '',
        city TEXT NOT NULL DEFAULT '',
        state TEXT NOT NULL DEFAULT '',
        postal_code TEXT NOT NULL DEFAULT '',
        beds INTEGER NOT NULL DEFAULT 0,
        baths REAL NOT NULL DEFAULT 0,
        garage_cars INTEGER NOT NULL DEFAULT 0,
        sq_ft INTEGER,
        year_built INTEGER,
        price REAL,
        ready_date TEXT,
        status TEXT NOT NULL DEFAULT 'coming',
        description TEXT NOT NULL DEFAULT '',
        is_featured INTEGER NOT NULL DEFAULT 0,
        featured_rank INTEGER NOT NULL DEFAULT 0,
        created INTEGER NOT NULL,
        updated INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS photos (
        id INTEGER PRIMARY KEY,
        owner_kind TEXT NOT NULL,
        owner_id INTEGER NOT NULL,
        image TEXT NOT NULL,
        caption TEXT NOT NULL DEFAULT '',
        sort_order INTEGER NOT NULL DEFAULT 0,
        created INTEGER NOT NULL,
        updated INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS attachments (
        id INTEGER PRIMARY KEY,
        owner_kind TEXT NOT NULL,
        owner_id INTEGER NOT NULL,
        title TEXT NOT NULL DEFAULT '',
        file TEXT NOT NULL,
        created INTEGER NOT NULL,
        updated INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS gallery_items (
        id INTEGER PRIMARY KEY,
        category TEXT NOT NULL,
        title TEXT NOT NULL DEFAULT '',
        image TEXT NOT NULL,
        caption TEXT NOT NULL DEFAULT '',
        sort_order INTEGER NOT NULL DEFAULT 0,
        link_kind TEXT,
        link_id INTEGER,
        created INTEGER NOT NULL,
        updated INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS leads (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL DEFAULT '',
        message TEXT NOT NULL DEFAULT '',
        source TEXT NOT NULL DEFAULT 'global',
        page_url TEXT NOT NULL DEFAULT '',
        target_kind TEXT,
        target_id INTEGER,
        created INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS site_settings (
        id INTEGER PRIMARY KEY,
        site_name TEXT NOT NULL DEFAULT '',
        primary_phone TEXT NOT NULL DEFAULT '',
        primary_phone_link TEXT NOT NULL DEFAULT '',
        primary_email TEXT NOT NULL DEFAULT '',
        address_line1 TEXT NOT NULL DEFAULT '',
        address_line2 TEXT NOT NULL DEFAULT '',
        city TEXT NOT NULL DEFAULT '',
        state TEXT NOT NULL DEFAULT '',
        postal_code TEXT NOT NULL DEFAULT '',
        lead_recipients TEXT NOT NULL DEFAULT '',
        hero_headline TEXT NOT NULL DEFAULT '',
        hero_subheadline TEXT NOT NULL DEFAULT '',
        cta_heading TEXT NOT NULL DEFAULT '',
        cta_body TEXT NOT NULL DEFAULT '',
        cta_phone_label TEXT NOT NULL DEFAULT '',
        communities_intro TEXT NOT NULL DEFAULT '',
        plans_intro TEXT NOT NULL DEFAULT '',
        homes_intro TEXT NOT NULL DEFAULT '',
        updated INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS announcements (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        message TEXT NOT NULL DEFAULT '',
        button_label TEXT NOT NULL DEFAULT '',
        button_url TEXT NOT NULL DEFAULT '',
        is_active INTEGER NOT NULL DEFAULT 0,
        created INTEGER NOT NULL,
        updated INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS portal_users (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL DEFAULT 'staff',
        is_active INTEGER NOT NULL DEFAULT 1,
        created INTEGER NOT NULL,
        updated INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_communities_status ON communities(status)",
    "CREATE INDEX IF NOT EXISTS idx_communities_featured ON communities(is_featured)",
    "CREATE INDEX IF NOT EXISTS idx_plans_featured ON floor_plans(is_featured)",
    "CREATE INDEX IF NOT EXISTS idx_homes_featured ON available_homes(is_featured)",
    "CREATE INDEX IF NOT EXISTS idx_homes_community ON available_homes(community_id)",
    "CREATE INDEX IF NOT EXISTS idx_homes_plan ON available_homes(plan_id)",
    "CREATE INDEX IF NOT EXISTS idx_photos_owner ON photos(owner_kind, owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_attachments_owner ON attachments(owner_kind, owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_gallery_category ON gallery_items(category)",
    "CREATE INDEX IF NOT EXISTS idx_leads_created ON leads(created)",
];

impl Database {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Database { pool })
    }

    /// Single-connection in-memory database, used by tests and local tooling.
    /// One connection keeps every query on the same in-memory instance.
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:", 1).await
    }

    pub async fn init(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // Begin a transaction - caller is responsible for commit/rollback
    pub async fn begin(&self) -> Result<sqlx::Transaction<'_, sqlx::Sqlite>> {
        Ok(self.pool.begin().await?)
    }
}
