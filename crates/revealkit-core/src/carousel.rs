//! Pinned multi-panel carousel
//!
//! The container is pinned for a scroll range which is cut into N-1 equal
//! slices for N panels. Panel `i` (from 1) slides in from the right across
//! slice `i-1`; panel 0 is already in place.

use tracing::debug;

use crate::dom::{Document, ElementId, Property};
use crate::motion::{Easing, ScrubBinding, Timeline, Tween};
use crate::pin::Pin;
use crate::viewport::{ScrollRange, Viewport};

/// Fractions of the pin range that panel `index` is bound to
///
/// `None` for panel 0, out-of-range indices, and carousels with fewer
/// than two panels.
pub fn panel_window(index: usize, panels: usize) -> Option<(f64, f64)> {
    if panels < 2 || index == 0 || index >= panels {
        return None;
    }
    let slices = (panels - 1) as f64;
    Some(((index - 1) as f64 / slices, index as f64 / slices))
}

/// Split `range` into `panels - 1` contiguous equal sub-ranges
pub fn partition(range: ScrollRange, panels: usize) -> Vec<ScrollRange> {
    let mut slices: Vec<ScrollRange> = (1..panels)
        .filter_map(|i| panel_window(i, panels))
        .map(|(from, to)| range.slice(from, to))
        .collect();
    // Close the last slice exactly on the range end
    if let Some(last) = slices.last_mut() {
        last.end = range.end;
    }
    slices
}

/// Pinned container plus one scrub binding per sliding panel
#[derive(Debug, Clone)]
pub struct PinnedCarousel {
    pin: Pin,
    panels: Vec<ElementId>,
    bindings: Vec<(usize, ScrubBinding)>,
}

impl PinnedCarousel {
    /// Park panels 1.. off to the right and bind each to its slice of `span`
    pub fn new(
        doc: &mut dyn Document,
        pin: Pin,
        panels: Vec<ElementId>,
        lag: f64,
    ) -> Self {
        let span = *pin.span();
        let mut bindings = Vec::new();

        for (index, &panel) in panels.iter().enumerate() {
            let Some((from, to)) = panel_window(index, panels.len()) else {
                continue;
            };
            doc.set_style(panel, Property::XPercent, 100.0);
            let timeline = Timeline::builder()
                .ease(Easing::Linear)
                .then(Tween::from_to(
                    [panel],
                    &[(Property::XPercent, 100.0)],
                    &[(Property::XPercent, 0.0)],
                ))
                .build(doc);
            let binding = ScrubBinding::new(span.sliced(from, to), timeline).smoothing(lag);
            bindings.push((index, binding));
        }
        debug!(panels = panels.len(), slices = bindings.len(), "Pinned carousel attached");

        Self {
            pin,
            panels,
            bindings,
        }
    }

    pub fn panels(&self) -> &[ElementId] {
        &self.panels
    }

    pub fn pin(&self) -> &Pin {
        &self.pin
    }

    /// Resolved pin range and each sliding panel's sub-range
    pub fn ranges(
        &self,
        doc: &dyn Document,
        viewport: &Viewport,
    ) -> Option<(ScrollRange, Vec<(usize, ScrollRange)>)> {
        let pin_range = self.pin.range(doc, viewport)?;
        let slices = self
            .bindings
            .iter()
            .filter_map(|(index, binding)| binding.range(doc, viewport).map(|r| (*index, r)))
            .collect();
        Some((pin_range, slices))
    }

    pub fn update(&mut self, doc: &mut dyn Document, scroll_y: f64, viewport: &Viewport, dt: f64) {
        self.pin.update(doc, scroll_y, viewport);
        for (_, binding) in &mut self.bindings {
            binding.update(doc, scroll_y, viewport, dt);
        }
    }
}
