//! Inspect command handler
//!
//! Prints the totals of one save folder without contacting the server.

use anyhow::{Context, Result};
use farmlink::Save;
use std::path::Path;

pub fn handle(folder: &Path) -> Result<()> {
    let save = Save::load(folder)
        .with_context(|| format!("Failed to read save in {}", folder.display()))?;

    let mut resources = farmlink::inspect(&save)
        .with_context(|| format!("Failed to total storage of {}", save.name))?;
    resources.sort_by(|a, b| a.kind.cmp(&b.kind));

    println!("Save:     {}", save.name);
    println!("Player:   {}", save.player_name);
    println!("Map:      {}", save.map_id);
    println!("Location: {}", save.identity);
    println!();

    if resources.is_empty() {
        println!("No stored or sold fill types");
        return Ok(());
    }

    let width = resources.iter().map(|r| r.kind.len()).max().unwrap_or(0);
    for resource in &resources {
        println!("  {:<width$}  {:>14.3}", resource.kind, resource.amount, width = width);
    }

    Ok(())
}
