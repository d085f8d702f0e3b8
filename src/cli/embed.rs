//! CLI `embed` command: backfill search vectors for every contact missing one.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::AgaryConfig;
use crate::contacts::{self, search};
use crate::db;
use crate::providers;

pub async fn embed(config: &AgaryConfig) -> Result<()> {
    let Some(assistant) = providers::create_assistant_provider(&config.assistant)? else {
        println!("No OpenAI API key configured. Set OPENAI_API_KEY or [assistant].api_key.");
        return Ok(());
    };

    let conn = super::open_configured_database(config)?;
    let total = search::count_missing_embeddings(&conn)?;
    if total == 0 {
        println!("Every contact already has an embedding.");
        return Ok(());
    }

    println!(
        "Embedding {total} contacts with model '{}'...",
        assistant.embedding_model()
    );

    let shared = db::shared(conn);
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} ({eta})")
            .context("invalid progress template")?
            .progress_chars("##-"),
    );

    let batch = config.network.backfill_batch.max(1);
    let mut done = 0;
    while done < total {
        let stored = contacts::embed_missing(&shared, assistant.as_ref(), None, batch)
            .await
            .context("embedding batch failed")?;
        if stored == 0 {
            break;
        }
        done += stored;
        pb.inc(stored as u64);
    }

    pb.finish_and_clear();
    println!("Embedded {done} contacts.");
    Ok(())
}
