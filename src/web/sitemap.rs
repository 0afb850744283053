// Sitemap endpoint: every catalog detail URL with its last-modified date,
// plus the fixed static pages.

use axum::{extract::State, http::header, response::IntoResponse};
use chrono::DateTime;

use crate::{app_state::AppState, error::AppResult, store};

const STATIC_PAGES: &[&str] = &["", "about", "custom-homes", "gallery", "contact"];

fn lastmod(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", loc));
    if let Some(date) = lastmod {
        if !date.is_empty() {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", date));
        }
    }
    xml.push_str("  </url>\n");
}

pub async fn sitemap_handler(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let base = state.config.site.base_url.trim_end_matches('/').to_string();

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for page in STATIC_PAGES {
        let loc = if page.is_empty() {
            format!("{}/", base)
        } else {
            format!("{}/{}", base, page)
        };
        push_url(&mut xml, &loc, None);
    }

    for community in store::communities::all(&state.db).await? {
        let loc = format!("{}/communities/{}", base, community.slug);
        push_url(&mut xml, &loc, Some(&lastmod(community.updated)));
    }
    for plan in store::plans::all(&state.db).await? {
        let loc = format!("{}/plans/{}", base, plan.slug);
        push_url(&mut xml, &loc, Some(&lastmod(plan.updated)));
    }
    for home in store::homes::all(&state.db).await? {
        let loc = format!("{}/homes/{}", base, home.slug);
        push_url(&mut xml, &loc, Some(&lastmod(home.updated)));
    }

    xml.push_str("</urlset>\n");
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}
