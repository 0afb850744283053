// Photos, attachments, and gallery items. Photos and attachments hang off an
// owning entity through the generic (kind, id) pair.

use serde::{Deserialize, Serialize};

use super::{OwnerKind, OwnerRef};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub owner: OwnerRef,
    pub image: String,
    pub caption: String,
    pub sort_order: i64,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoForm {
    pub image: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub owner: OwnerRef,
    pub title: String,
    pub file: String,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentForm {
    #[serde(default)]
    pub title: String,
    pub file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryCategory {
    Exterior,
    Kitchen,
    Bathroom,
    Fireplace,
    Stairs,
    Other,
}

impl GalleryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryCategory::Exterior => "exterior",
            GalleryCategory::Kitchen => "kitchen",
            GalleryCategory::Bathroom => "bathroom",
            GalleryCategory::Fireplace => "fireplace",
            GalleryCategory::Stairs => "stairs",
            GalleryCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exterior" => Some(GalleryCategory::Exterior),
            "kitchen" => Some(GalleryCategory::Kitchen),
            "bathroom" => Some(GalleryCategory::Bathroom),
            "fireplace" => Some(GalleryCategory::Fireplace),
            "stairs" => Some(GalleryCategory::Stairs),
            "other" => Some(GalleryCategory::Other),
            _ => None,
        }
    }
}

/// Standalone gallery image, optionally linked to the catalog entity it shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: i64,
    pub category: GalleryCategory,
    pub title: String,
    pub image: String,
    pub caption: String,
    pub sort_order: i64,
    pub link: Option<OwnerRef>,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GalleryItemForm {
    pub category: GalleryCategory,
    #[serde(default)]
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub link_kind: Option<OwnerKind>,
    #[serde(default)]
    pub link_id: Option<i64>,
}

impl GalleryItemForm {
    /// A link is only meaningful when both halves of the pair are present.
    pub fn link(&self) -> Option<OwnerRef> {
        match (self.link_kind, self.link_id) {
            (Some(kind), Some(id)) => Some(OwnerRef::new(kind, id)),
            _ => None,
        }
    }
}
