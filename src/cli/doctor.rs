//! CLI `doctor` command: database diagnostics and provider configuration.

use anyhow::{Context, Result};

use crate::config::AgaryConfig;
use crate::db;

/// Run database diagnostics and print a health report.
pub fn doctor(config: &AgaryConfig) -> Result<()> {
    let db_path = config.resolved_db_path();

    if !db_path.exists() {
        println!("Database: not found at {}", db_path.display());
        println!("Run `agary serve` or `agary user create <name>` to initialize.");
        return Ok(());
    }

    let file_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(&db_path).context("failed to open database (may be corrupt)")?;
    let report = db::check_database_health(&conn).context("failed to run health check")?;

    println!("Agary Health Report");
    println!("===================");
    println!();
    println!("Database:          {}", db_path.display());
    println!("File size:         {}", format_bytes(file_size));
    println!("Schema version:    {}", report.schema_version);
    println!("sqlite-vec:        {}", report.sqlite_vec_version);
    println!();
    println!("Providers:");
    println!(
        "  Research:        {} ({})",
        config.research.model,
        key_status(config.research.api_key.as_deref())
    );
    println!(
        "  Assistant:       {} / {} ({})",
        config.assistant.chat_model,
        config.assistant.embedding_model,
        key_status(config.assistant.api_key.as_deref())
    );
    println!();
    println!("Embedding model:");
    println!("  Stored:          {}", report.embedding_model.as_deref().unwrap_or("(not set)"));
    println!("  Configured:      {}", config.assistant.embedding_model);
    if let Some(stored) = &report.embedding_model {
        if stored != &config.assistant.embedding_model {
            println!("  WARNING: model mismatch! Existing vectors were made with another model.");
        } else {
            println!("  Status:          OK (match)");
        }
    }
    println!();
    println!("Row counts:");
    println!("  Users:           {}", report.user_count);
    println!("  Contacts:        {}", report.contact_count);
    println!("  Embedded:        {}", report.embedded_count);
    println!("  Enriched:        {}", report.enriched_count);
    if report.embedded_count < report.contact_count {
        println!(
            "  {} contacts have no embedding. Run `agary embed` to backfill.",
            report.contact_count - report.embedded_count
        );
    }
    println!();
    if report.integrity_ok {
        println!("Integrity check:   PASSED");
    } else {
        println!("Integrity check:   FAILED ({})", report.integrity_details);
        println!();
        println!("Recovery: restore from a backup, e.g. cp backup.db {}", db_path.display());
    }

    Ok(())
}

fn key_status(key: Option<&str>) -> &'static str {
    match key {
        Some(_) => "API key set",
        None => "no API key",
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
