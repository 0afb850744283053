// Catalog domain records and enums.

pub mod accounts;
pub mod catalog;
pub mod lead;
pub mod media;
pub mod site;

pub use accounts::{PortalUser, PortalUserForm, StaffRole};
pub use catalog::{
    Amenity, AvailableHome, AvailableHomeForm, Community, CommunityForm, CommunityStatus,
    FloorPlan, FloorPlanForm, HomeStatus, PlanAvailability, PlanAvailabilityForm, PlanSeries,
};
pub use lead::{Lead, LeadForm, LeadSource};
pub use media::{
    Attachment, AttachmentForm, GalleryCategory, GalleryItem, GalleryItemForm, Photo, PhotoForm,
};
pub use site::{Announcement, AnnouncementForm, SiteSettings, SiteSettingsForm};

use serde::{Deserialize, Serialize};

/// The finite set of entity kinds a photo, attachment, or lead can point at.
///
/// This is the discriminator half of the generic (kind, id) reference pair;
/// keeping it a closed enum makes owner handling exhaustive at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Community,
    Plan,
    Home,
    GalleryItem,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::Community => "community",
            OwnerKind::Plan => "plan",
            OwnerKind::Home => "home",
            OwnerKind::GalleryItem => "gallery_item",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "community" => Some(OwnerKind::Community),
            "plan" => Some(OwnerKind::Plan),
            "home" => Some(OwnerKind::Home),
            "gallery_item" => Some(OwnerKind::GalleryItem),
            _ => None,
        }
    }
}

/// Typed (kind, id) pair naming the owning row of a photo or attachment, or
/// the target a lead was submitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRef {
    pub kind: OwnerKind,
    pub id: i64,
}

impl OwnerRef {
    pub fn new(kind: OwnerKind, id: i64) -> Self {
        Self { kind, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_kind_round_trips_through_str() {
        for kind in [
            OwnerKind::Community,
            OwnerKind::Plan,
            OwnerKind::Home,
            OwnerKind::GalleryItem,
        ] {
            assert_eq!(OwnerKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(OwnerKind::parse("amenity"), None);
    }
}
