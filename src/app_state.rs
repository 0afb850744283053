use std::sync::Arc;

use crate::{
    config::Config,
    database::Database,
    mail::{LogMailer, Mailer},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db = Database::new(&config.database.url, config.database.max_connections).await?;
        db.init().await?;
        Ok(Self {
            db: Arc::new(db),
            mailer: Arc::new(LogMailer),
            config,
        })
    }

    /// Assemble a state from prebuilt parts; used by tests and tooling that
    /// bring their own database or mail gateway.
    pub fn from_parts(db: Arc<Database>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        Self { db, mailer, config }
    }
}
