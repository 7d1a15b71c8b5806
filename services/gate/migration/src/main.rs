use sea_orm_migration::prelude::*;

use photofind_gate_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
