//! L3 Molecular Layer: Scroll-scrub bindings
//!
//! A binding ties a timeline's progress to the scroll position inside a
//! range. The mapping itself is the pure `scrub_value`; `ScrubBinding` adds
//! per-frame bookkeeping: optional smoothing, writing only while in range,
//! and the persist/reset choice on exit.

use crate::dom::Document;
use crate::viewport::{ScrollRange, ScrollSpan, Viewport};

use super::easing::Easing;
use super::timeline::Timeline;
use super::timing::{inverse_lerp, lerp};

const SETTLE_EPSILON: f64 = 1e-4;

/// Progress of `scroll` through `range`, clamped to [0, 1]
#[inline]
pub fn scrub_progress(scroll: f64, range: &ScrollRange) -> f64 {
    inverse_lerp(range.start, range.end, scroll)
}

/// Property value for a scroll position
///
/// `from` at `range.start`, `to` at `range.end`, eased in between and
/// clamped outside.
#[inline]
pub fn scrub_value(scroll: f64, range: &ScrollRange, from: f64, to: f64, ease: Easing) -> f64 {
    lerp(from, to, ease.apply(scrub_progress(scroll, range)))
}

/// What a binding does once scroll leaves its range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitBehavior {
    /// Keep the clamped boundary value
    #[default]
    Persist,
    /// Put every property back at its start value
    Reset,
}

/// Continuous scroll-to-progress mapping driving a timeline
#[derive(Debug, Clone)]
pub struct ScrubBinding {
    span: ScrollSpan,
    timeline: Timeline,
    /// Seconds for the displayed progress to catch up; 0 follows scroll exactly
    lag: f64,
    on_exit: ExitBehavior,
    progress: f64,
    in_range: bool,
    started: bool,
}

impl ScrubBinding {
    pub fn new(span: ScrollSpan, timeline: Timeline) -> Self {
        Self {
            span,
            timeline,
            lag: 0.0,
            on_exit: ExitBehavior::Persist,
            progress: 0.0,
            in_range: false,
            started: false,
        }
    }

    pub fn smoothing(mut self, lag_secs: f64) -> Self {
        self.lag = lag_secs.max(0.0);
        self
    }

    pub fn on_exit(mut self, behavior: ExitBehavior) -> Self {
        self.on_exit = behavior;
        self
    }

    pub fn span(&self) -> &ScrollSpan {
        &self.span
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn range(&self, doc: &dyn Document, viewport: &Viewport) -> Option<ScrollRange> {
        self.span.resolve(doc, viewport)
    }

    /// Evaluate for this frame; returns the progress written, if any
    pub fn update(
        &mut self,
        doc: &mut dyn Document,
        scroll_y: f64,
        viewport: &Viewport,
        dt: f64,
    ) -> Option<f64> {
        let range = self.span.resolve(doc, viewport)?;
        let target = scrub_progress(scroll_y, &range);
        let in_range = range.contains(scroll_y);
        let exiting = self.in_range && !in_range;
        self.in_range = in_range;

        // A reset binding holds its start state everywhere outside the range
        if self.on_exit == ExitBehavior::Reset && !in_range {
            if exiting && self.started {
                self.progress = 0.0;
                self.timeline.seek(0.0, doc);
                return Some(self.progress);
            }
            return None;
        }

        if !self.started {
            // Nothing differs from the start state until scroll moves past it
            if target <= 0.0 {
                return None;
            }
            self.started = true;
            // Arriving from below the range shows the end state right away
            if !in_range || self.lag <= 0.0 {
                self.progress = target;
                self.timeline.seek_progress(target, doc);
                return Some(target);
            }
        } else {
            let settling = (self.progress - target).abs() > SETTLE_EPSILON;
            if !(in_range || exiting || settling) {
                return None;
            }
        }

        self.progress = if self.lag <= 0.0 {
            target
        } else {
            let step = self.progress + (target - self.progress) * (dt / self.lag).min(1.0);
            if (target - step).abs() <= SETTLE_EPSILON {
                target
            } else {
                step
            }
        };
        self.timeline.seek_progress(self.progress, doc);
        Some(self.progress)
    }
}
