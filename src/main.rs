use std::env;
use std::time::Duration;

use billing_service::infrastructure::inventory_client::HttpInventoryAuthority;
use billing_service::{build_server, create_pool, run_migrations};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let inventory_url =
        env::var("INVENTORY_SERVICE_URL").expect("INVENTORY_SERVICE_URL must be set");
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .expect("PORT must be a valid number");
    let timeout_secs: u64 = env::var("INVENTORY_TIMEOUT_SECS")
        .unwrap_or_else(|_| "3".to_string())
        .parse()
        .expect("INVENTORY_TIMEOUT_SECS must be a valid number");

    let pool = create_pool(&database_url);
    run_migrations(&pool);

    let authority =
        HttpInventoryAuthority::new(inventory_url, Duration::from_secs(timeout_secs))
            .expect("Failed to build inventory authority client");

    log::info!("Starting server at http://{}:{}", host, port);

    build_server(pool, authority, &host, port)?.await
}
