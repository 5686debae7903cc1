//! L4 Atomic Layer: Tween descriptions and per-property tracks
//!
//! A `Tween` is what callers write: targets, values, duration, easing. When
//! it is placed on a timeline it expands into one `Track` per
//! (target, property) pair, each knowing its own offset and end values.

use crate::dom::{Document, ElementId, Property};

use super::easing::Easing;
use super::timing::{lerp, progress};

/// Duration used when a tween does not set one
pub const DEFAULT_DURATION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// Animate from the given values to the element's current values
    From,
    /// Animate from the element's current values to the given values
    To,
    /// Animate between explicit values
    FromTo,
}

/// Animation of one or more elements' properties
#[derive(Debug, Clone)]
pub struct Tween {
    pub(crate) kind: TweenKind,
    pub(crate) targets: Vec<ElementId>,
    pub(crate) from: Vec<(Property, f64)>,
    pub(crate) to: Vec<(Property, f64)>,
    pub(crate) duration: f64,
    pub(crate) ease: Option<Easing>,
    pub(crate) stagger: f64,
}

impl Tween {
    fn new(kind: TweenKind, targets: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            kind,
            targets: targets.into_iter().collect(),
            from: Vec::new(),
            to: Vec::new(),
            duration: DEFAULT_DURATION,
            ease: None,
            stagger: 0.0,
        }
    }

    pub fn from(targets: impl IntoIterator<Item = ElementId>, values: &[(Property, f64)]) -> Self {
        let mut tween = Self::new(TweenKind::From, targets);
        tween.from = values.to_vec();
        tween
    }

    pub fn to(targets: impl IntoIterator<Item = ElementId>, values: &[(Property, f64)]) -> Self {
        let mut tween = Self::new(TweenKind::To, targets);
        tween.to = values.to_vec();
        tween
    }

    /// Properties missing from `from` start at the element's current value
    pub fn from_to(
        targets: impl IntoIterator<Item = ElementId>,
        from: &[(Property, f64)],
        to: &[(Property, f64)],
    ) -> Self {
        let mut tween = Self::new(TweenKind::FromTo, targets);
        tween.from = from.to_vec();
        tween.to = to.to_vec();
        tween
    }

    pub fn duration(mut self, secs: f64) -> Self {
        self.duration = secs.max(0.0);
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Offset each successive target's start by `each` seconds
    pub fn stagger(mut self, each: f64) -> Self {
        self.stagger = each;
        self
    }

    /// Time from the first target's start to the last target's end
    pub fn span(&self) -> f64 {
        let staggered = self.targets.len().saturating_sub(1) as f64 * self.stagger.max(0.0);
        staggered + self.duration
    }

    /// Expand into tracks; `From` end values are read from the document now
    pub(crate) fn into_tracks(self, doc: &dyn Document, default_ease: Easing) -> Vec<Track> {
        let ease = self.ease.unwrap_or(default_ease);
        let mut tracks = Vec::new();

        for (index, target) in self.targets.iter().copied().enumerate() {
            let offset = index as f64 * self.stagger.max(0.0);
            let mut push = |property: Property, from: Option<f64>, to: f64| {
                tracks.push(Track {
                    target,
                    property,
                    from,
                    to,
                    offset,
                    duration: self.duration,
                    ease,
                    rendered: false,
                });
            };

            match self.kind {
                TweenKind::From => {
                    for &(property, value) in &self.from {
                        push(property, Some(value), doc.style(target, property));
                    }
                }
                TweenKind::To => {
                    for &(property, value) in &self.to {
                        push(property, None, value);
                    }
                }
                TweenKind::FromTo => {
                    for &(property, value) in &self.to {
                        let from = self
                            .from
                            .iter()
                            .find(|(p, _)| *p == property)
                            .map(|(_, v)| *v);
                        push(property, from, value);
                    }
                }
            }
        }
        tracks
    }
}

/// One property of one element animating between two values
#[derive(Debug, Clone)]
pub struct Track {
    pub target: ElementId,
    pub property: Property,
    /// `None` until first render, when the current value is captured
    from: Option<f64>,
    pub to: f64,
    /// Start relative to the owning timeline entry
    pub offset: f64,
    pub duration: f64,
    pub ease: Easing,
    rendered: bool,
}

impl Track {
    pub fn from_value(&self) -> Option<f64> {
        self.from
    }

    pub fn has_rendered(&self) -> bool {
        self.rendered
    }

    /// End relative to the owning entry
    pub fn end(&self) -> f64 {
        self.offset + self.duration
    }

    /// Write the value at `local` seconds into the owning entry
    ///
    /// A track without a start value takes the element's current one.
    pub fn render(&mut self, local: f64, doc: &mut dyn Document) {
        let from = *self
            .from
            .get_or_insert_with(|| doc.style(self.target, self.property));
        let t = progress(local, self.offset, self.duration);
        doc.set_style(self.target, self.property, lerp(from, self.to, self.ease.apply(t)));
        self.rendered = true;
    }

    /// Write the start value without marking the track as started
    pub(crate) fn render_start(&self, doc: &mut dyn Document) {
        if let Some(from) = self.from {
            doc.set_style(self.target, self.property, from);
        }
    }
}
