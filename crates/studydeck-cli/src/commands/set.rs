//! Study set command handlers

use anyhow::{Context, Result};

use studydeck_core::Catalog;

use crate::output::Output;

/// List the study sets of a subtopic
pub fn list(
    catalog: &Catalog,
    category_id: String,
    subtopic_id: String,
    output: &Output,
) -> Result<()> {
    let sets = catalog.list_sets(&category_id, &subtopic_id)?;
    output.print_sets(&sets);
    Ok(())
}

/// Create a study set inside a subtopic
pub fn add(
    catalog: &Catalog,
    category_id: String,
    subtopic_id: String,
    name: String,
    output: &Output,
) -> Result<()> {
    let set = catalog
        .add_set(&category_id, &subtopic_id, Some(&name))
        .context("Failed to create study set")?;

    output.print_created("study set", &set.id, &set.name, &set);
    Ok(())
}
