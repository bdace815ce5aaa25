//! Insight command

use anyhow::Result;
use khata_core::db::Database;
use khata_core::insights::InsightEngine;
use khata_core::KhataConfig;

pub fn cmd_insights(
    db: &Database,
    config: &KhataConfig,
    username: &str,
    book_name: &str,
    json: bool,
) -> Result<()> {
    let raw = db.book_transactions(username, book_name)?;
    let engine = InsightEngine::with_config(config.insight_config());
    let insights = engine.generate(&raw);

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!("💡 Insights for '{}'", book_name);
    println!();
    for line in &insights {
        println!("  • {}", line);
    }

    Ok(())
}
