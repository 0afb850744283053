// Portal user accounts. Authentication itself lives outside this crate; these
// rows back the superuser-gated user management screens.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Staff,
    Superuser,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Staff => "staff",
            StaffRole::Superuser => "superuser",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "staff" => Some(StaffRole::Staff),
            "superuser" => Some(StaffRole::Superuser),
            _ => None,
        }
    }

    /// Whether a holder of this role may use routes gated at `required`.
    pub fn allows(&self, required: StaffRole) -> bool {
        match required {
            StaffRole::Staff => true,
            StaffRole::Superuser => matches!(self, StaffRole::Superuser),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub role: StaffRole,
    pub is_active: bool,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortalUserForm {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    pub role: StaffRole,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superuser_routes_reject_staff() {
        assert!(StaffRole::Staff.allows(StaffRole::Staff));
        assert!(StaffRole::Superuser.allows(StaffRole::Staff));
        assert!(!StaffRole::Staff.allows(StaffRole::Superuser));
        assert!(StaffRole::Superuser.allows(StaffRole::Superuser));
    }
}
