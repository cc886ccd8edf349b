pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::coordinator::LineItemCoordinator;
use infrastructure::inventory_client::HttpInventoryAuthority;
use infrastructure::ledger_repo::DieselLedgerStore;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Shared handler state: the ledger store for plain bill CRUD, and the
/// coordinator for every line-item mutation (line items are never written
/// through the store directly — each transition must be paired with an
/// inventory-authority call).
pub struct AppState {
    pub ledger: DieselLedgerStore,
    pub coordinator: Arc<LineItemCoordinator<DieselLedgerStore, HttpInventoryAuthority>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::bills::create_bill,
        handlers::bills::get_bill,
        handlers::bills::list_bills,
        handlers::bills::delete_bill,
        handlers::line_items::items_for_bill,
        handlers::line_items::add_line_item,
        handlers::line_items::update_line_item_quantity,
        handlers::line_items::remove_line_item,
    ),
    tags(
        (name = "bills", description = "Customer bill management"),
        (name = "line-items", description = "Inventory-coordinated line item operations"),
    )
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    authority: HttpInventoryAuthority,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let ledger = DieselLedgerStore::new(pool);
    let coordinator = Arc::new(LineItemCoordinator::new(ledger.clone(), authority));
    let state = web::Data::new(AppState { ledger, coordinator });

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .service(
                web::scope("/bills")
                    .route("", web::post().to(handlers::bills::create_bill))
                    .route("", web::get().to(handlers::bills::list_bills))
                    .route("/{id}", web::get().to(handlers::bills::get_bill))
                    .route("/{id}", web::delete().to(handlers::bills::delete_bill))
                    .route(
                        "/{id}/items",
                        web::get().to(handlers::line_items::items_for_bill),
                    ),
            )
            .service(
                web::scope("/line-items")
                    .route("", web::post().to(handlers::line_items::add_line_item))
                    .route(
                        "/{id}/quantity",
                        web::patch().to(handlers::line_items::update_line_item_quantity),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(handlers::line_items::remove_line_item),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
