//! Viewport geometry: visibility ratios and scroll anchors
//!
//! Scroll positions are document offsets of the viewport's top edge. An
//! anchor such as `"top 80%"` names a point on the trigger element and a
//! point on the viewport; it resolves to the scroll position at which the
//! two points meet.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dom::{Bounds, Document, ElementId};
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> f64 {
    1440.0
}

fn default_height() -> f64 {
    900.0
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Fraction of `bounds` visible in a viewport scrolled to `scroll_y`
///
/// Zero-height elements count as fully visible while their top edge is
/// inside the viewport.
pub fn intersection_ratio(bounds: &Bounds, scroll_y: f64, viewport: &Viewport) -> f64 {
    let view_top = scroll_y;
    let view_bottom = scroll_y + viewport.height;

    if bounds.height <= 0.0 {
        return if bounds.top >= view_top && bounds.top <= view_bottom {
            1.0
        } else {
            0.0
        };
    }

    let visible = bounds.bottom().min(view_bottom) - bounds.top.max(view_top);
    (visible.max(0.0) / bounds.height).clamp(0.0, 1.0)
}

/// A point along an element or the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    /// Percentage of the height
    Percent(f64),
    /// Pixels from the top
    Px(f64),
}

impl Edge {
    fn offset_in(&self, height: f64) -> f64 {
        match *self {
            Edge::Top => 0.0,
            Edge::Center => height / 2.0,
            Edge::Bottom => height,
            Edge::Percent(p) => height * p / 100.0,
            Edge::Px(px) => px,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Edge::Top => write!(f, "top"),
            Edge::Center => write!(f, "center"),
            Edge::Bottom => write!(f, "bottom"),
            Edge::Percent(p) => write!(f, "{}%", p),
            Edge::Px(px) => write!(f, "{}px", px),
        }
    }
}

/// `<element-edge>[+=px|-=px] <viewport-edge>[+=px|-=px]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub element: Edge,
    pub element_offset: f64,
    pub viewport: Edge,
    pub viewport_offset: f64,
}

impl Anchor {
    pub const TOP_TOP: Anchor = Anchor::new(Edge::Top, Edge::Top);
    pub const BOTTOM_TOP: Anchor = Anchor::new(Edge::Bottom, Edge::Top);
    pub const BOTTOM_BOTTOM: Anchor = Anchor::new(Edge::Bottom, Edge::Bottom);

    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self {
            element,
            element_offset: 0.0,
            viewport,
            viewport_offset: 0.0,
        }
    }

    /// Scroll position at which the element point meets the viewport point
    pub fn resolve(&self, bounds: &Bounds, viewport: &Viewport) -> f64 {
        let element_point = bounds.top + self.element.offset_in(bounds.height) + self.element_offset;
        let viewport_point = self.viewport.offset_in(viewport.height) + self.viewport_offset;
        element_point - viewport_point
    }
}

fn parse_side(token: &str, whole: &str) -> Result<(Edge, f64), Error> {
    let invalid = || Error::InvalidAnchor(whole.to_string());

    let (edge, offset) = match token.find("+=").or_else(|| token.find("-=")) {
        Some(pos) => {
            let sign = if token[pos..].starts_with('-') { -1.0 } else { 1.0 };
            let amount = token[pos + 2..]
                .trim_end_matches("px")
                .parse::<f64>()
                .map_err(|_| invalid())?;
            (&token[..pos], sign * amount)
        }
        None => (token, 0.0),
    };

    let edge = match edge {
        "top" => Edge::Top,
        "center" => Edge::Center,
        "bottom" => Edge::Bottom,
        other => {
            if let Some(p) = other.strip_suffix('%') {
                Edge::Percent(p.parse().map_err(|_| invalid())?)
            } else {
                Edge::Px(other.trim_end_matches("px").parse().map_err(|_| invalid())?)
            }
        }
    };
    Ok((edge, offset))
}

impl FromStr for Anchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(element), viewport, None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::InvalidAnchor(s.to_string()));
        };
        let (element, element_offset) = parse_side(element, s)?;
        // A lone element side is measured against the viewport top
        let (viewport, viewport_offset) = match viewport {
            Some(token) => parse_side(token, s)?,
            None => (Edge::Top, 0.0),
        };
        Ok(Self {
            element,
            element_offset,
            viewport,
            viewport_offset,
        })
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |f: &mut fmt::Formatter<'_>, edge: &Edge, offset: f64| -> fmt::Result {
            write!(f, "{}", edge)?;
            if offset > 0.0 {
                write!(f, "+={}", offset)?;
            } else if offset < 0.0 {
                write!(f, "-={}", -offset)?;
            }
            Ok(())
        };
        side(f, &self.element, self.element_offset)?;
        write!(f, " ")?;
        side(f, &self.viewport, self.viewport_offset)
    }
}

/// End of a scroll span: another anchor, or a distance past the start
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndAnchor {
    At(Anchor),
    /// `+=N`: N px after the resolved start
    After(f64),
}

impl FromStr for EndAnchor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(distance) = trimmed.strip_prefix("+=") {
            return distance
                .trim_end_matches("px")
                .parse()
                .map(EndAnchor::After)
                .map_err(|_| Error::InvalidAnchor(s.to_string()));
        }
        trimmed.parse().map(EndAnchor::At)
    }
}

/// Concrete scroll interval, `start <= end` not required by callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollRange {
    pub start: f64,
    pub end: f64,
}

impl ScrollRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }

    pub fn contains(&self, scroll: f64) -> bool {
        scroll >= self.start && scroll <= self.end
    }

    /// Sub-range covering fractions [from, to] of this range
    pub fn slice(&self, from: f64, to: f64) -> ScrollRange {
        ScrollRange::new(self.start + self.len() * from, self.start + self.len() * to)
    }
}

/// Trigger element plus start/end anchors, resolved against the live layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpan {
    pub trigger: ElementId,
    pub start: Anchor,
    pub end: EndAnchor,
    /// Fractions of the resolved range this span actually covers
    pub window: (f64, f64),
}

impl ScrollSpan {
    pub fn new(trigger: ElementId, start: Anchor, end: EndAnchor) -> Self {
        Self {
            trigger,
            start,
            end,
            window: (0.0, 1.0),
        }
    }

    /// The part of this span between fractions `from` and `to`
    pub fn sliced(mut self, from: f64, to: f64) -> Self {
        let (lo, hi) = self.window;
        let width = hi - lo;
        self.window = (lo + width * from, lo + width * to);
        self
    }

    /// Resolve to a concrete range; `None` if the trigger has no layout box
    pub fn resolve(&self, doc: &dyn Document, viewport: &Viewport) -> Option<ScrollRange> {
        let bounds = doc.bounds(self.trigger)?;
        let start = self.start.resolve(&bounds, viewport);
        let end = match self.end {
            EndAnchor::At(anchor) => anchor.resolve(&bounds, viewport),
            EndAnchor::After(distance) => start + distance,
        };
        let range = ScrollRange::new(start, end);
        if self.window == (0.0, 1.0) {
            Some(range)
        } else {
            Some(range.slice(self.window.0, self.window.1))
        }
    }
}
