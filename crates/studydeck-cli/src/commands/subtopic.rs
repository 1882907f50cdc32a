//! Subtopic command handlers

use anyhow::{Context, Result};

use studydeck_core::Catalog;

use crate::output::Output;

/// List subtopic summaries of a category
pub fn list(catalog: &Catalog, category_id: String, output: &Output) -> Result<()> {
    let subtopics = catalog.list_subtopics(&category_id)?;
    output.print_subtopics(&subtopics);
    Ok(())
}

/// Create a subtopic inside a category
pub fn add(catalog: &Catalog, category_id: String, name: String, output: &Output) -> Result<()> {
    let subtopic = catalog
        .add_subtopic(&category_id, Some(&name))
        .context("Failed to create subtopic")?;

    output.print_created("subtopic", &subtopic.id, &subtopic.name, &subtopic);
    Ok(())
}
