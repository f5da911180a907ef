//! `crowdwiz history`: Inspect the conversation log.

use crowdwiz_config::AppConfig;

pub async fn run(limit: usize, clear: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = crowdwiz_store::build_from_config(&config.store).await?;

    if clear {
        let removed = store.count().await?;
        store.clear().await?;
        println!("Removed {removed} turns from the {} store.", store.name());
        return Ok(());
    }

    let records = store.recent(limit).await?;
    if records.is_empty() {
        println!("No interview turns stored ({} backend).", store.name());
        return Ok(());
    }

    let total = store.count().await?;
    println!("Showing {} of {total} turns, newest first\n", records.len());

    for record in records {
        println!(
            "#{} [{}]",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M:%S")
        );
        println!("  You: {}", record.user_prompt);
        println!("  Wizard: {}\n", record.ai_response);
    }

    Ok(())
}
