// Outbound mail seam. Actual delivery belongs to an external gateway; the
// default implementation just records the message in the log.

use async_trait::async_trait;

use crate::models::{Lead, SiteSettings};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> anyhow::Result<()>;
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!(
            recipients = recipients.join(", "),
            subject,
            body_len = body.len(),
            "outbound mail"
        );
        Ok(())
    }
}

/// Best-effort lead notification. Recipients come from the settings row; an
/// empty set skips delivery silently, and delivery failures are swallowed so
/// the submitter still sees success.
pub async fn notify_lead(mailer: &dyn Mailer, settings: &SiteSettings, lead: &Lead) {
    let recipients = settings.recipient_list();
    if recipients.is_empty() {
        return;
    }
    let subject = format!("New website lead: {}", lead.name);
    let body = format!(
        "From: {}\nEmail: {}\nPhone: {}\nPage: {}\n\n{}",
        lead.name, lead.email, lead.phone, lead.page_url, lead.message
    );
    if let Err(err) = mailer.send(&recipients, &subject, &body).await {
        tracing::warn!("lead notification delivery failed: {}", err);
    }
}
