pub mod init_config;
pub mod ranges;
pub mod simulate;

use std::path::Path;

use anyhow::{Context, Result};

use revealkit_core::{PageDocument, PageLayout, Viewport};

/// Load a layout file into a fresh document
pub fn load_page(path: &Path) -> Result<(PageDocument, Viewport)> {
    let layout = PageLayout::load(path)
        .with_context(|| format!("Failed to load page layout {}", path.display()))?;
    let doc = PageDocument::from_layout(&layout)?;
    Ok((doc, layout.viewport))
}
