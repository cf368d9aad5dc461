use figment::providers::{Format, Toml};
use figment::Figment;
use referral_db_migration::Migrator;
use sea_orm_migration::sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use serde::Deserialize;

#[derive(Deserialize)]
struct MigrationConfig {
    database_url: String,
}

#[tokio::main]
async fn main() {
    let config: MigrationConfig = Figment::new()
        .merge(Toml::file("Config.toml"))
        .extract()
        .expect("Config.toml with a database_url entry is required");

    let db = Database::connect(&config.database_url)
        .await
        .expect("Could not connect to database");

    Migrator::up(&db, None).await.expect("Migration failed");
}
