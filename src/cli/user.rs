//! CLI `user` commands: issue and list bearer-token users.

use anyhow::Result;

use crate::auth;
use crate::config::AgaryConfig;

/// Create a user and print their token. The token is not recoverable later.
pub fn create(config: &AgaryConfig, name: &str) -> Result<()> {
    let conn = super::open_configured_database(config)?;
    let issued = auth::create_user(&conn, name)?;

    println!("Created user '{}' ({})", issued.user.name, issued.user.id);
    println!();
    println!("Bearer token (shown once, store it now):");
    println!("  {}", issued.token);
    Ok(())
}

pub fn list(config: &AgaryConfig) -> Result<()> {
    let conn = super::open_configured_database(config)?;
    let users = auth::list_users(&conn)?;

    if users.is_empty() {
        println!("No users yet. Create one with `agary user create <name>`.");
        return Ok(());
    }

    println!("{:<38} {:<24} CREATED", "ID", "NAME");
    for user in users {
        println!("{:<38} {:<24} {}", user.id, user.name, user.created_at);
    }
    Ok(())
}
