use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let Some(db) = connect_with_retry(&settings.database).await else {
        tracing::error!(
            "exceeded max retries ({}) connecting to the database",
            settings.database.max_retries
        );
        std::process::exit(1);
    };

    let engine = engine::Engine::builder().database(db).build().await?;
    let options = server::ServerOptions {
        allowed_origins: settings.server.allowed_origins,
    };

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    server::run_with_listener(engine, options, listener).await?;

    Ok(())
}

/// Connects and migrates, retrying with a fixed delay. Returns `None` once
/// every attempt has failed.
async fn connect_with_retry(config: &settings::Database) -> Option<DatabaseConnection> {
    for attempt in 1..=config.max_retries {
        match connect(&config.url).await {
            Ok(db) => {
                tracing::info!("database connected");
                return Some(db);
            }
            Err(err) => {
                tracing::warn!(
                    "database connection attempt {attempt}/{} failed: {err}",
                    config.max_retries
                );
                if attempt < config.max_retries {
                    tokio::time::sleep(config.retry_delay()).await;
                }
            }
        }
    }
    None
}

async fn connect(url: &str) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
