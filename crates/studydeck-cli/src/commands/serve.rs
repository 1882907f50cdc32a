//! Serve command handler

use std::sync::Arc;

use anyhow::Result;

use studydeck_core::{Catalog, Config};

use crate::server;

/// Run the HTTP API until interrupted
pub async fn run(catalog: Catalog, config: &Config, bind: Option<String>) -> Result<()> {
    let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    server::serve(Arc::new(catalog), &addr).await
}
