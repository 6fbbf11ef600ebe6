use anyhow::{bail, Context, Result};

use crate::services::{AccountError, AccountService};

/// Create a staff account directly against the database. Kept off the HTTP
/// surface so no routed endpoint can mint administrators.
pub async fn create_admin(email: &str, username: &str, password: &str) -> Result<()> {
    let service = AccountService::new()
        .await
        .context("failed to connect to database")?;

    match service.create_admin(email, username, password).await {
        Ok(user) => {
            println!("Created staff account {} ({})", user.email, user.id);
            Ok(())
        }
        Err(AccountError::Validation(field_errors)) => {
            for (field, message) in &field_errors {
                eprintln!("  {}: {}", field, message);
            }
            bail!("validation failed");
        }
        Err(e) => Err(e.into()),
    }
}
