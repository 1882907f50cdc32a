//! Status command handler

use anyhow::Result;

use studydeck_core::{Catalog, Config};

use crate::output::{Output, OutputFormat};

/// Show where the catalog lives and what it holds
pub fn show(catalog: &Catalog, config: &Config, output: &Output) -> Result<()> {
    let storage = catalog.storage_stats();
    let counts = catalog.stats();
    let location = catalog.store().path();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "document": location,
                    "bind_addr": config.bind_addr,
                    "storage": storage,
                    "counts": counts,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", location.display());
        }
        OutputFormat::Human => {
            println!("StudyDeck Status");
            println!("================");
            println!();
            println!("Storage:");
            println!("  Document: {}", location.display());
            if storage.document_exists {
                println!("  Size:     {}", storage.size_human());
            } else {
                println!("  Size:     (not created yet)");
            }
            println!();
            println!("Server:");
            println!("  Bind:     {}", config.bind_addr);
            println!();
            println!("Contents:");
            println!("  Categories: {}", counts.categories);
            println!("  Subtopics:  {}", counts.subtopics);
            println!("  Sets:       {}", counts.sets);
            println!("  Flashcards: {}", counts.flashcards);
        }
    }

    Ok(())
}
