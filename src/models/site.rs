// Site-wide configuration: the settings singleton and announcements.

use serde::{Deserialize, Serialize};

/// Global site content: contact details, hero and CTA copy, page intros, and
/// the lead notification recipients. One logical row; loaded as "first row or
/// default" since nothing at the schema level enforces singleness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    pub id: i64,
    pub site_name: String,
    pub primary_phone: String,
    pub primary_phone_link: String,
    pub primary_email: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Free text: one or more addresses separated by commas, semicolons, or
    /// new lines.
    pub lead_recipients: String,
    pub hero_headline: String,
    pub hero_subheadline: String,
    pub cta_heading: String,
    pub cta_body: String,
    pub cta_phone_label: String,
    pub communities_intro: String,
    pub plans_intro: String,
    pub homes_intro: String,
    pub updated: i64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            id: 0,
            site_name: "Heritage Realty & Custom Homes".to_string(),
            primary_phone: String::new(),
            primary_phone_link: String::new(),
            primary_email: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            lead_recipients: String::new(),
            hero_headline: String::new(),
            hero_subheadline: String::new(),
            cta_heading: String::new(),
            cta_body: String::new(),
            cta_phone_label: String::new(),
            communities_intro: String::new(),
            plans_intro: String::new(),
            homes_intro: String::new(),
            updated: 0,
        }
    }
}

impl SiteSettings {
    /// Notification target set parsed out of `lead_recipients`: semicolons
    /// and newlines count as commas, carriage returns are dropped, segments
    /// are trimmed, empties discarded.
    pub fn recipient_list(&self) -> Vec<String> {
        parse_recipients(&self.lead_recipients)
    }
}

pub fn parse_recipients(raw: &str) -> Vec<String> {
    raw.replace('\r', "")
        .replace([';', '\n'], ",")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSettingsForm {
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub primary_phone: String,
    #[serde(default)]
    pub primary_phone_link: String,
    #[serde(default)]
    pub primary_email: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub lead_recipients: String,
    #[serde(default)]
    pub hero_headline: String,
    #[serde(default)]
    pub hero_subheadline: String,
    #[serde(default)]
    pub cta_heading: String,
    #[serde(default)]
    pub cta_body: String,
    #[serde(default)]
    pub cta_phone_label: String,
    #[serde(default)]
    pub communities_intro: String,
    #[serde(default)]
    pub plans_intro: String,
    #[serde(default)]
    pub homes_intro: String,
}

/// Site-wide banner. The one shown is the most recently updated active row;
/// having none is a normal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub button_label: String,
    pub button_url: String,
    pub is_active: bool,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnouncementForm {
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub button_label: String,
    #[serde(default)]
    pub button_url: String,
    #[serde(default)]
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipients_split_on_mixed_delimiters() {
        let parsed = parse_recipients("a@x.com; b@x.com\nc@x.com ,, ");
        assert_eq!(parsed, vec!["a@x.com", "b@x.com", "c@x.com"]);
    }

    #[test]
    fn recipients_strip_carriage_returns() {
        let parsed = parse_recipients("a@x.com\r\nb@x.com\r");
        assert_eq!(parsed, vec!["a@x.com", "b@x.com"]);
    }

    #[test]
    fn empty_input_yields_no_recipients() {
        assert!(parse_recipients("").is_empty());
        assert!(parse_recipients(" ;, \n ").is_empty());
    }
}
