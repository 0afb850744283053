use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub portal: PortalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute origin used to build page URLs and sitemap entries.
    pub base_url: String,
    /// Directory served under /media.
    pub media_root: String,
}

/// Bearer tokens accepted by the staff portal. The authentication provider
/// proper is an external system; these are the opaque values it hands out.
/// An unset token disables the corresponding access level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    pub staff_token: Option<String>,
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:data/heritage_homes.db".to_string()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            site: SiteConfig {
                base_url: env::var("SITE_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
                media_root: env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
            },
            portal: PortalConfig {
                staff_token: env::var("PORTAL_STAFF_TOKEN").ok().filter(|t| !t.is_empty()),
                admin_token: env::var("PORTAL_ADMIN_TOKEN").ok().filter(|t| !t.is_empty()),
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
