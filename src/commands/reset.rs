use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use std::io::IsTerminal;

use super::index::open_table;
use crate::config::Config;
use crate::db::connection::is_in_memory;

/// `rfhub reset`: empty the keyword database, keeping its tables
pub async fn cmd_reset(config: &Config, assume_yes: bool) -> Result<()> {
    if is_in_memory(&config.database.url) {
        println!("Database is in memory; nothing to reset");
        return Ok(());
    }

    if !assume_yes {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!("Refusing to reset without confirmation. Re-run with --yes");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Remove all collections and keywords from {}?",
                config.database.url
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Reset cancelled");
            return Ok(());
        }
    }

    let table = open_table(config).await?;
    let (collections, keywords) = table.counts().await?;
    table.reset().await?;
    println!(
        "{} Removed {} collections and {} keywords",
        style("✓").green(),
        collections,
        keywords
    );
    Ok(())
}
