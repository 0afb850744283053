// Seed a few demo records for local portal testing.

use heritage_homes::{config::Config, database::Database, seed::seed_demo_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let db = Database::new(&config.database.url, config.database.max_connections).await?;
    db.init().await?;

    seed_demo_data(&db)
        .await
        .map_err(|err| anyhow::anyhow!("seeding failed: {}", err))?;

    println!("Seeded demo data.");
    Ok(())
}
