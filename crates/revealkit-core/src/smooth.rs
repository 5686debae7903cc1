//! Inertial page scrolling
//!
//! Wheel and touch input move a target position; the visible scroll
//! position eases toward it over a fixed duration. Every trigger and scrub
//! binding reads the eased position, so they all see one consistent value
//! per frame.

use crate::config::SmoothScrollConfig;
use crate::motion::timing::{is_complete, lerp, progress};
use crate::motion::Easing;

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveScroll {
    /// Clock time the animation started
    start: f64,
    from: f64,
    to: f64,
    duration: f64,
    easing: Easing,
}

/// Smooth scroll controller
///
/// Feed input through `on_wheel`/`on_touch` (or `scroll_to`), then call
/// `update()` once per frame to get the position to render with.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    animation: Option<ActiveScroll>,
    config: SmoothScrollConfig,
    /// Current eased scroll position
    current: f64,
    /// Input accumulated since the last frame
    pending_delta: f64,
    /// Frame clock in seconds
    clock: f64,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(SmoothScrollConfig::default())
    }
}

impl SmoothScroll {
    pub fn new(config: SmoothScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
            pending_delta: 0.0,
            clock: 0.0,
        }
    }

    pub fn config(&self) -> &SmoothScrollConfig {
        &self.config
    }

    fn is_smooth(&self) -> bool {
        self.config.enabled && self.config.duration_secs > 0.0
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether the next frame can still move the page
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0.0
    }

    /// Position the current animation is heading to
    pub fn target_scroll(&self) -> f64 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current)
    }

    #[inline]
    pub fn current_scroll(&self) -> f64 {
        self.current
    }

    /// Jump without animating
    pub fn set_scroll(&mut self, scroll: f64) {
        self.animation = None;
        self.current = scroll.max(0.0);
        self.pending_delta = 0.0;
    }

    /// Animate to an absolute position, clamped to `[0, limit]`
    pub fn scroll_to(&mut self, target: f64, limit: f64) {
        let target = target.clamp(0.0, limit.max(0.0));

        if !self.is_smooth() {
            self.current = target;
            self.animation = None;
            return;
        }
        if self.current == target {
            self.animation = None;
            return;
        }
        self.start_animation(target);
    }

    /// Wheel input in px, scaled by the wheel multiplier
    pub fn on_wheel(&mut self, delta: f64, limit: f64) {
        self.scroll_by(delta * self.config.wheel_multiplier, limit);
    }

    /// Touch drag in px, scaled by the touch multiplier
    pub fn on_touch(&mut self, delta: f64, limit: f64) {
        self.scroll_by(delta * self.config.touch_multiplier, limit);
    }

    /// Move by `delta` px; several calls within one frame are batched
    pub fn scroll_by(&mut self, delta: f64, limit: f64) {
        if !self.is_smooth() {
            self.current = (self.current + delta).clamp(0.0, limit.max(0.0));
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    fn start_animation(&mut self, to: f64) {
        self.animation = Some(ActiveScroll {
            start: self.clock,
            from: self.current,
            to,
            duration: self.config.duration_secs,
            easing: self.config.easing,
        });
    }

    /// Advance the clock by `dt` seconds and return the eased position
    pub fn update(&mut self, dt: f64, limit: f64) -> f64 {
        let limit = limit.max(0.0);

        if self.pending_delta != 0.0 {
            let target = (self.target_scroll() + self.pending_delta).clamp(0.0, limit);
            self.pending_delta = 0.0;
            if target != self.current {
                self.start_animation(target);
            }
        }

        self.clock += dt.max(0.0);

        if let Some(anim) = &self.animation {
            if is_complete(self.clock, anim.start, anim.duration) {
                self.current = anim.to.min(limit);
                self.animation = None;
            } else {
                let t = progress(self.clock, anim.start, anim.duration);
                self.current = lerp(anim.from, anim.to, anim.easing.apply(t)).min(limit);
            }
        }

        self.current
    }
}
