use clap::{Parser, ValueEnum};
use sea_orm::Database;
use sea_orm_migration::prelude::*;

use migration::Migrator;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// Apply pending migrations.
    Up,
    /// Roll back every migration.
    Down,
    /// Drop everything and re-apply.
    Fresh,
    /// Print applied and pending migrations.
    Status,
}

#[derive(Debug, Parser)]
#[command(name = "migration", about = "Manage the expenses schema")]
struct Args {
    #[arg(value_enum, default_value_t = Action::Up)]
    action: Action,
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./expenses.db?mode=rwc")]
    database_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let db = Database::connect(&args.database_url).await?;

    match args.action {
        Action::Up => Migrator::up(&db, None).await?,
        Action::Down => Migrator::down(&db, None).await?,
        Action::Fresh => Migrator::fresh(&db).await?,
        Action::Status => Migrator::status(&db).await?,
    }

    Ok(())
}
