//! Pinning: hold an element still on screen while a scroll range elapses

use crate::dom::{Document, ElementId, Property};
use crate::viewport::{ScrollRange, ScrollSpan, Viewport};

/// Keeps `element` fixed in the viewport for the duration of `span`
///
/// The element is compensated through `Property::PinY`: inside the range it
/// moves down exactly as far as the page scrolled past the start, outside
/// it holds the clamped offset.
#[derive(Debug, Clone)]
pub struct Pin {
    element: ElementId,
    span: ScrollSpan,
    offset: Option<f64>,
}

impl Pin {
    pub fn new(element: ElementId, span: ScrollSpan) -> Self {
        Self {
            element,
            span,
            offset: None,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn span(&self) -> &ScrollSpan {
        &self.span
    }

    pub fn range(&self, doc: &dyn Document, viewport: &Viewport) -> Option<ScrollRange> {
        self.span.resolve(doc, viewport)
    }

    pub fn is_pinned(&self, doc: &dyn Document, scroll_y: f64, viewport: &Viewport) -> bool {
        self.range(doc, viewport)
            .map(|r| r.contains(scroll_y))
            .unwrap_or(false)
    }

    /// Write the compensation offset when it changes; returns the new value
    pub fn update(&mut self, doc: &mut dyn Document, scroll_y: f64, viewport: &Viewport) -> Option<f64> {
        let range = self.span.resolve(doc, viewport)?;
        let offset = (scroll_y - range.start).clamp(0.0, range.len().max(0.0));
        if self.offset == Some(offset) {
            return None;
        }
        self.offset = Some(offset);
        doc.set_style(self.element, Property::PinY, offset);
        Some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Bounds, PageDocument};
    use crate::viewport::{Anchor, EndAnchor};

    #[test]
    fn test_pin_offset_tracks_scroll_inside_range() {
        let view = Viewport::new(1200.0, 800.0);
        let mut doc = PageDocument::new();
        let section = doc.push("services", Bounds::new(1000.0, 0.0, 1200.0, 2800.0), None);
        let wrapper = doc.push("services__wrapper", Bounds::new(1000.0, 0.0, 1200.0, 800.0), Some(section));
        let span = ScrollSpan::new(section, Anchor::TOP_TOP, EndAnchor::At(Anchor::BOTTOM_BOTTOM));
        let mut pin = Pin::new(wrapper, span);

        assert_eq!(pin.update(&mut doc, 0.0, &view), Some(0.0));
        assert_eq!(pin.update(&mut doc, 500.0, &view), None);
        assert!(!pin.is_pinned(&doc, 500.0, &view));

        assert_eq!(pin.update(&mut doc, 1500.0, &view), Some(500.0));
        assert!(pin.is_pinned(&doc, 1500.0, &view));
        assert_eq!(doc.style(wrapper, Property::PinY), 500.0);

        // Range is [1000, 3000]; past the end the offset holds at 2000
        pin.update(&mut doc, 3600.0, &view);
        assert_eq!(doc.style(wrapper, Property::PinY), 2000.0);
    }

    #[test]
    fn test_range_follows_layout_changes() {
        let view = Viewport::new(1200.0, 800.0);
        let mut doc = PageDocument::new();
        let section = doc.push("services", Bounds::new(1000.0, 0.0, 1200.0, 2800.0), None);
        let wrapper = doc.push("services__wrapper", Bounds::new(1000.0, 0.0, 1200.0, 800.0), Some(section));
        let span = ScrollSpan::new(section, Anchor::TOP_TOP, EndAnchor::At(Anchor::BOTTOM_BOTTOM));
        let mut pin = Pin::new(wrapper, span);
        assert_eq!(pin.range(&doc, &view), Some(ScrollRange::new(1000.0, 3000.0)));

        // Content above grew by 200 px and the section got taller
        doc.set_bounds(section, Bounds::new(1200.0, 0.0, 1200.0, 3000.0));
        assert_eq!(pin.range(&doc, &view), Some(ScrollRange::new(1200.0, 3400.0)));
        assert_eq!(pin.update(&mut doc, 1500.0, &view), Some(300.0));

        // A shorter viewport moves the "bottom bottom" end
        let short = Viewport::new(1200.0, 600.0);
        assert_eq!(pin.range(&doc, &short), Some(ScrollRange::new(1200.0, 3600.0)));
    }
}
