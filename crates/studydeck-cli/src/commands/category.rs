//! Category command handlers

use anyhow::{Context, Result};

use studydeck_core::Catalog;

use crate::output::Output;

/// List category summaries
pub fn list(catalog: &Catalog, output: &Output) -> Result<()> {
    output.print_categories(&catalog.list_categories());
    Ok(())
}

/// Create a category
pub fn add(catalog: &Catalog, name: String, output: &Output) -> Result<()> {
    let category = catalog
        .add_category(Some(&name))
        .context("Failed to create category")?;

    output.print_created("category", &category.id, &category.name, &category);
    Ok(())
}
