use std::path::Path;

use anyhow::Result;

use revealkit_core::{AppConfig, Document, FrameInput, Page, ScrollInput};

/// Distance between frames while walking down the page
const WALK_STEP: f64 = 50.0;

pub fn run(config: &AppConfig, layout: &Path) -> Result<()> {
    let (mut doc, viewport) = super::load_page(layout)?;
    let mut page = Page::init(&mut doc, config);

    if page.section_names().is_empty() {
        println!("No animated sections found in {}", layout.display());
        return Ok(());
    }

    // Sections bind their scroll ranges on entry, so walk the whole page first
    let limit = (doc.scroll_height() - viewport.height).max(0.0);
    let mut y = 0.0;
    loop {
        page.frame(&mut doc, FrameInput::new(0.0, ScrollInput::Jump(y), viewport));
        if y >= limit {
            break;
        }
        y = (y + WALK_STEP).min(limit);
    }

    println!(
        "Viewport {}x{}, scrollable to {}px\n",
        viewport.width, viewport.height, limit
    );
    for range in page.ranges(&doc, &viewport) {
        if range.range.is_empty() {
            println!("  {:<18} at {:>8.1}", range.name, range.range.start);
        } else {
            println!(
                "  {:<18} {:>8.1} -> {:>8.1}  ({:.1}px)",
                range.name,
                range.range.start,
                range.range.end,
                range.range.len()
            );
        }
    }

    Ok(())
}
