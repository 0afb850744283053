// Captured contact-form submissions. Leads are written once and never
// mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::OwnerRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Global,
    Community,
    Plan,
    Home,
    Other,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Global => "global",
            LeadSource::Community => "community",
            LeadSource::Plan => "plan",
            LeadSource::Home => "home",
            LeadSource::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "global" => Some(LeadSource::Global),
            "community" => Some(LeadSource::Community),
            "plan" => Some(LeadSource::Plan),
            "home" => Some(LeadSource::Home),
            "other" => Some(LeadSource::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub source: LeadSource,
    pub page_url: String,
    pub target: Option<OwnerRef>,
    pub created: i64,
}

/// Public contact submission. Name and a valid email are required; phone and
/// message are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl LeadForm {
    /// Field-level validation: returns a map of field name to error message,
    /// empty when the submission is acceptable.
    pub fn validate(&self) -> BTreeMap<&'static str, &'static str> {
        let mut errors = BTreeMap::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "This field is required.");
        }
        if self.email.trim().is_empty() {
            errors.insert("email", "This field is required.");
        } else if !is_valid_email(self.email.trim()) {
            errors.insert("email", "Enter a valid email address.");
        }
        errors
    }
}

/// Syntactic email check: one `@`, non-empty local part, domain with at least
/// one dot and no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+site@mail.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@.com"));
    }

    #[test]
    fn validate_reports_per_field_errors() {
        let form = LeadForm {
            email: "not-an-email".into(),
            ..Default::default()
        };
        let errors = form.validate();
        assert_eq!(errors.get("name"), Some(&"This field is required."));
        assert_eq!(errors.get("email"), Some(&"Enter a valid email address."));

        let ok = LeadForm {
            name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            ..Default::default()
        };
        assert!(ok.validate().is_empty());
    }
}
