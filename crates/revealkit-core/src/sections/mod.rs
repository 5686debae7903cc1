mod about;
mod hero;
mod intro;
mod services;
mod trust;

pub use about::AboutHeroController;
pub use hero::HeroController;
pub use intro::IntroController;
pub use services::ServicesController;
pub use trust::TrustController;

use serde::Serialize;
use tracing::debug;

use crate::dom::{Document, ElementId};
use crate::trigger::EntryEvent;
use crate::viewport::{ScrollRange, Viewport};

/// Lifecycle of one page section; it only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    /// Not attached yet
    #[default]
    Idle,
    /// Waiting for the entry trigger
    Armed,
    /// Entrance timeline playing or scroll bindings just attached
    Entered,
    /// Entrance finished; scroll bindings keep running
    Steady,
}

/// Everything a controller reads for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Seconds since the page was initialized
    pub time: f64,
    /// Seconds since the previous frame
    pub dt: f64,
    pub scroll_y: f64,
    pub viewport: Viewport,
}

/// A named scroll range, for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedRange {
    pub name: String,
    pub range: ScrollRange,
}

/// Per-section reveal controller
///
/// Built with the section's `attach` constructor, which returns `None` when
/// a required element is missing so nothing gets registered for it.
pub trait SectionController {
    fn name(&self) -> &'static str;

    fn state(&self) -> SectionState;

    /// Advance one frame; returns the entry event on the frame the section
    /// first enters the viewport
    fn update(&mut self, doc: &mut dyn Document, frame: &Frame) -> Option<EntryEvent>;

    /// Scroll ranges this section currently reacts to
    fn ranges(&self, _doc: &dyn Document, _viewport: &Viewport) -> Vec<NamedRange> {
        Vec::new()
    }
}

/// Look up an element the section cannot work without
pub(crate) fn require(doc: &dyn Document, section: &str, selector: &str) -> Option<ElementId> {
    let found = doc.query(selector);
    if found.is_none() {
        debug!(section, selector, "Required element missing, section skipped");
    }
    found
}

/// Like `require` for a selector that must match at least one element
pub(crate) fn require_all(doc: &dyn Document, section: &str, selector: &str) -> Option<Vec<ElementId>> {
    let found = doc.query_all(selector);
    if found.is_empty() {
        debug!(section, selector, "No matching elements, section skipped");
        return None;
    }
    Some(found)
}

pub(crate) fn named(name: impl Into<String>, range: Option<ScrollRange>) -> Option<NamedRange> {
    range.map(|range| NamedRange {
        name: name.into(),
        range,
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::dom::{Bounds, PageDocument};
    use crate::viewport::Viewport;

    use super::Frame;

    pub const VIEW: Viewport = Viewport {
        width: 1440.0,
        height: 900.0,
    };

    pub fn frame(time: f64, dt: f64, scroll_y: f64) -> Frame {
        Frame {
            time,
            dt,
            scroll_y,
            viewport: VIEW,
        }
    }

    pub fn block(top: f64, height: f64) -> Bounds {
        Bounds::new(top, 0.0, VIEW.width, height)
    }

    /// Step `frames` frames of `dt` at a fixed scroll position
    pub fn run(
        controller: &mut dyn super::SectionController,
        doc: &mut PageDocument,
        start: f64,
        frames: usize,
        dt: f64,
        scroll_y: f64,
    ) -> f64 {
        let mut time = start;
        for _ in 0..frames {
            time += dt;
            controller.update(doc, &frame(time, dt, scroll_y));
        }
        time
    }
}
