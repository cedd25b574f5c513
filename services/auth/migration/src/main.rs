use sea_orm_migration::prelude::*;

use kataforge_auth_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
