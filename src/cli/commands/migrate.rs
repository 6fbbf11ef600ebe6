use anyhow::{Context, Result};

use crate::database::manager::DatabaseManager;

pub async fn run() -> Result<()> {
    DatabaseManager::run_migrations()
        .await
        .context("migration failed")?;
    println!("Migrations applied");
    Ok(())
}
