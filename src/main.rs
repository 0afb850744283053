// Heritage Homes server - public catalog plus staff portal

use std::net::SocketAddr;

use tokio::net::TcpListener;

use heritage_homes::{app_state::AppState, config::Config, web::create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state (database pool + schema)
    let app_state = AppState::new(config.clone()).await?;

    // Build application router
    let app = create_router(app_state);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    println!("🏠 Heritage Homes server starting on http://{}", addr);
    println!("  GET  /communities, /plans, /homes        - catalog lists");
    println!("  GET  /communities/{{slug}} (plans, homes)  - detail pages");
    println!("  POST /contact                            - lead intake");
    println!("  GET  /sitemap.xml                        - sitemap");
    println!("  /portal/*                                - staff portal (token required)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
