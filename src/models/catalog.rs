// Catalog entities: communities, floor plans, available homes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityStatus {
    Coming,
    Active,
    Closing,
    SoldOut,
}

impl CommunityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommunityStatus::Coming => "coming",
            CommunityStatus::Active => "active",
            CommunityStatus::Closing => "closing",
            CommunityStatus::SoldOut => "sold_out",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "coming" => Some(CommunityStatus::Coming),
            "active" => Some(CommunityStatus::Active),
            "closing" => Some(CommunityStatus::Closing),
            "sold_out" => Some(CommunityStatus::SoldOut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeStatus {
    Coming,
    Uc,
    Active,
    Pending,
    Sold,
}

impl HomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HomeStatus::Coming => "coming",
            HomeStatus::Uc => "uc",
            HomeStatus::Active => "active",
            HomeStatus::Pending => "pending",
            HomeStatus::Sold => "sold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "coming" => Some(HomeStatus::Coming),
            "uc" => Some(HomeStatus::Uc),
            "active" => Some(HomeStatus::Active),
            "pending" => Some(HomeStatus::Pending),
            "sold" => Some(HomeStatus::Sold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amenity {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSeries {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Community {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub tagline: String,
    pub city: String,
    pub state: String,
    pub county: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: CommunityStatus,
    pub description: String,
    pub is_featured: bool,
    pub featured_rank: i64,
    pub created: i64,
    pub updated: i64,
}

/// Mutable community fields as submitted by the staff portal. An empty slug
/// means "derive one from the name" on create; on update the stored slug is
/// kept regardless.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommunityForm {
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub status: Option<CommunityStatus>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_rank: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorPlan {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub series_id: Option<i64>,
    pub beds: i64,
    pub baths: f64,
    pub garage_cars: i64,
    pub sq_ft_min: Option<i64>,
    pub sq_ft_max: Option<i64>,
    pub base_price: Option<f64>,
    pub description: String,
    pub is_featured: bool,
    pub featured_rank: i64,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FloorPlanForm {
    #[serde(default)]
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub series_id: Option<i64>,
    #[serde(default)]
    pub beds: i64,
    #[serde(default)]
    pub baths: f64,
    #[serde(default)]
    pub garage_cars: i64,
    #[serde(default)]
    pub sq_ft_min: Option<i64>,
    #[serde(default)]
    pub sq_ft_max: Option<i64>,
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_rank: i64,
}

/// Availability of a floor plan inside a community. At most one row per
/// (plan, community) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanAvailability {
    pub id: i64,
    pub plan_id: i64,
    pub community_id: i64,
    pub is_available: bool,
    pub base_price_override: Option<f64>,
    pub notes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanAvailabilityForm {
    pub plan_id: i64,
    pub community_id: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub base_price_override: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableHome {
    pub id: i64,
    pub community_id: i64,
    pub plan_id: Option<i64>,
    pub slug: String,
    pub lot_number: String,
    pub mls_number: String,
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub beds: i64,
    pub baths: f64,
    pub garage_cars: i64,
    pub sq_ft: Option<i64>,
    pub year_built: Option<i64>,
    pub price: Option<f64>,
    pub ready_date: Option<String>,
    pub status: HomeStatus,
    pub description: String,
    pub is_featured: bool,
    pub featured_rank: i64,
    pub created: i64,
    pub updated: i64,
}

impl AvailableHome {
    /// "address_1, city state postal" with empty parts skipped; empty string
    /// when no address component is set.
    pub fn full_address(&self) -> String {
        full_address(&self.address_1, &self.city, &self.state, &self.postal_code)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableHomeForm {
    pub community_id: i64,
    #[serde(default)]
    pub plan_id: Option<i64>,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub lot_number: String,
    #[serde(default)]
    pub mls_number: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub beds: i64,
    #[serde(default)]
    pub baths: f64,
    #[serde(default)]
    pub garage_cars: i64,
    #[serde(default)]
    pub sq_ft: Option<i64>,
    #[serde(default)]
    pub year_built: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub ready_date: Option<String>,
    #[serde(default)]
    pub status: Option<HomeStatus>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub featured_rank: i64,
}

impl AvailableHomeForm {
    pub fn full_address(&self) -> String {
        full_address(&self.address_1, &self.city, &self.state, &self.postal_code)
    }

    /// Source text for slug derivation: the assembled address, then the lot
    /// number when no address is set.
    pub fn slug_source(&self) -> String {
        let addr = self.full_address();
        if !addr.is_empty() {
            return addr;
        }
        if !self.lot_number.is_empty() {
            return format!("lot-{}", self.lot_number);
        }
        String::new()
    }
}

fn full_address(address_1: &str, city: &str, state: &str, postal_code: &str) -> String {
    let city_line = [city, state, postal_code]
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    [address_1, city_line.as_str()]
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_rejects_unknown_values() {
        assert_eq!(CommunityStatus::parse("active"), Some(CommunityStatus::Active));
        assert_eq!(CommunityStatus::parse("sold_out"), Some(CommunityStatus::SoldOut));
        assert_eq!(CommunityStatus::parse("Active"), None);
        assert_eq!(HomeStatus::parse("uc"), Some(HomeStatus::Uc));
        assert_eq!(HomeStatus::parse("under_construction"), None);
    }

    #[test]
    fn full_address_skips_empty_parts() {
        let form = AvailableHomeForm {
            address_1: "12 Eastwood Way".into(),
            city: "Attleboro".into(),
            state: "MA".into(),
            postal_code: "02703".into(),
            ..Default::default()
        };
        assert_eq!(form.full_address(), "12 Eastwood Way, Attleboro MA 02703");

        let bare = AvailableHomeForm {
            city: "Attleboro".into(),
            ..Default::default()
        };
        assert_eq!(bare.full_address(), "Attleboro");
        assert_eq!(AvailableHomeForm::default().full_address(), "");
    }

    #[test]
    fn slug_source_prefers_address_then_lot() {
        let with_addr = AvailableHomeForm {
            address_1: "12 Eastwood Way".into(),
            lot_number: "12".into(),
            ..Default::default()
        };
        assert_eq!(with_addr.slug_source(), "12 Eastwood Way");

        let lot_only = AvailableHomeForm {
            lot_number: "12".into(),
            ..Default::default()
        };
        assert_eq!(lot_only.slug_source(), "lot-12");
        assert_eq!(AvailableHomeForm::default().slug_source(), "");
    }
}
