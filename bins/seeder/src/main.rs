//! Database seeder for Tally.
//!
//! Creates the initial login from `SEED_USERNAME` and `SEED_PASSWORD`. After
//! that, credentials only change through the change-credentials endpoint.
//!
//! Usage: SEED_USERNAME=me SEED_PASSWORD=secret cargo run --bin seeder

use anyhow::{Context, bail};
use sea_orm_migration::MigratorTrait;
use tally_core::auth::{HashCost, hash_password, validate_password};
use tally_db::{PoolOptions, UserRepository, connect, migration::Migrator};
use tally_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    let username = std::env::var("SEED_USERNAME").context("SEED_USERNAME must be set")?;
    let password = std::env::var("SEED_PASSWORD").context("SEED_PASSWORD must be set")?;

    let username = username.trim().to_string();
    if username.is_empty() {
        bail!("SEED_USERNAME cannot be empty");
    }
    validate_password(&password).context("SEED_PASSWORD rejected")?;

    println!("Connecting to database...");
    let db = connect(&config.database.url, PoolOptions::default()).await?;
    Migrator::up(&db, None).await?;

    let users = UserRepository::new(db);
    if users.find_by_username(&username).await?.is_some() {
        println!("  User {username} already exists, skipping...");
        return Ok(());
    }

    println!("Seeding user {username}...");
    let hash = hash_password(&password, HashCost::from(&config.auth))?;
    users.create(&username, &hash).await?;

    println!("Seeding complete!");
    Ok(())
}
