// Query/filter contracts over the catalog database. One module per entity
// family; all SQL lives here.

pub mod amenities;
pub mod communities;
pub mod gallery;
pub mod homes;
pub mod leads;
pub mod media;
pub mod plans;
pub mod site;
pub mod users;

use serde::Serialize;
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

/// Fixed page size for every public list view.
pub const PAGE_SIZE: i64 = 12;

/// One page of list results plus the counts the list templates render.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub total: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: i64, total: i64) -> Self {
        let pages = if total == 0 {
            1
        } else {
            (total + PAGE_SIZE - 1) / PAGE_SIZE
        };
        Self {
            items,
            page,
            total,
            pages,
        }
    }
}

/// Clamp a 1-based page number parsed from the query string.
pub(crate) fn normalize_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Bind value for dynamically composed WHERE clauses.
#[derive(Debug, Clone)]
pub(crate) enum SqlArg {
    Text(String),
    Int(i64),
    Real(f64),
}

/// Bind accumulated filter arguments onto a query in clause order.
pub(crate) fn bind_args<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    args: &'q [SqlArg],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlArg::Text(s) => query.bind(s.as_str()),
            SqlArg::Int(i) => query.bind(*i),
            SqlArg::Real(f) => query.bind(*f),
        };
    }
    query
}

/// Tolerant integer parse for public filter params: accepted only when the
/// whole input is a run of ASCII digits, otherwise treated as absent.
pub(crate) fn parse_digits(input: Option<&str>) -> Option<i64> {
    let s = input?.trim();
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Tolerant float parse; non-numeric input is treated as absent.
pub(crate) fn parse_number(input: Option<&str>) -> Option<f64> {
    input?.trim().parse().ok()
}

/// Free-text params: blank means absent.
pub(crate) fn non_blank(input: Option<&str>) -> Option<String> {
    let s = input?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_parse_ignores_malformed_input() {
        assert_eq!(parse_digits(Some("3")), Some(3));
        assert_eq!(parse_digits(Some(" 4 ")), Some(4));
        assert_eq!(parse_digits(Some("abc")), None);
        assert_eq!(parse_digits(Some("-3")), None);
        assert_eq!(parse_digits(Some("3.5")), None);
        assert_eq!(parse_digits(Some("")), None);
        assert_eq!(parse_digits(None), None);
    }

    #[test]
    fn number_parse_ignores_malformed_input() {
        assert_eq!(parse_number(Some("450000")), Some(450000.0));
        assert_eq!(parse_number(Some("449999.99")), Some(449999.99));
        assert_eq!(parse_number(Some("lots")), None);
    }

    #[test]
    fn page_math_rounds_up() {
        let p = Page::<i64>::new(vec![], 1, 25);
        assert_eq!(p.pages, 3);
        let empty = Page::<i64>::new(vec![], 1, 0);
        assert_eq!(empty.pages, 1);
        assert_eq!(normalize_page(Some(0)), 1);
        assert_eq!(normalize_page(None), 1);
        assert_eq!(normalize_page(Some(4)), 4);
    }
}
