pub mod inventory_client;
pub mod ledger_repo;
pub mod models;
