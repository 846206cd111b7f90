//! Migration runner for the bulletin database.
//!
//! Wraps the sea-orm-migration CLI around this crate's migration list, so
//! `migrator up|down|status|fresh` all operate on the notices schema. The
//! target database comes from `DATABASE_URL` (a local `.env` is honored).

use bulletin_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    cli::run_cli(Migrator).await;
}
