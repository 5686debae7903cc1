//! Hero background slideshow driven by class changes
//!
//! The stylesheet animates `.active` and `.exiting`; this module only
//! schedules when each class is added or removed.

use tracing::{debug, trace, warn};

use crate::config::SliderConfig;
use crate::dom::{Document, ElementId};

pub const SLIDE_SELECTOR: &str = ".hero__bg-slide";
pub const ACTIVE_CLASS: &str = "active";
pub const EXITING_CLASS: &str = "exiting";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlideAction {
    /// Move on to the next slide and reschedule
    Advance,
    Activate(usize),
    ClearExiting(usize),
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: f64,
    seq: u64,
    action: SlideAction,
}

/// Rotating background slides on the frame clock
#[derive(Debug, Clone)]
pub struct HeroSlider {
    slides: Vec<ElementId>,
    current: usize,
    interval: f64,
    enter_delay: f64,
    exit: f64,
    timers: Vec<Timer>,
    seq: u64,
}

impl HeroSlider {
    /// Activate the first slide; `None` when the page has no slides or the
    /// interval is zero
    pub fn attach(doc: &mut dyn Document, config: &SliderConfig, now: f64) -> Option<Self> {
        if config.interval_ms == 0 {
            warn!("Hero slider interval is 0 ms, slider skipped");
            return None;
        }
        let slides = doc.query_all(SLIDE_SELECTOR);
        let Some(&first) = slides.first() else {
            debug!("No hero slides, slider skipped");
            return None;
        };
        doc.add_class(first, ACTIVE_CLASS);

        let mut slider = Self {
            slides,
            current: 0,
            interval: config.interval_ms as f64 / 1000.0,
            enter_delay: config.enter_delay_ms as f64 / 1000.0,
            exit: config.exit_ms as f64 / 1000.0,
            timers: Vec::new(),
            seq: 0,
        };
        slider.schedule(now + slider.interval, SlideAction::Advance);
        debug!(slides = slider.slides.len(), "Hero slider attached");
        Some(slider)
    }

    pub fn slides(&self) -> &[ElementId] {
        &self.slides
    }

    /// Index of the slide most recently told to become active
    pub fn current(&self) -> usize {
        self.current
    }

    fn schedule(&mut self, due: f64, action: SlideAction) {
        self.seq += 1;
        self.timers.push(Timer {
            due,
            seq: self.seq,
            action,
        });
    }

    fn next_due(&self, now: f64) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)
    }

    /// Run every timer due by `now`, oldest first
    pub fn update(&mut self, doc: &mut dyn Document, now: f64) {
        while let Some(index) = self.next_due(now) {
            let timer = self.timers.swap_remove(index);
            self.fire(doc, timer);
        }
    }

    fn fire(&mut self, doc: &mut dyn Document, timer: Timer) {
        match timer.action {
            SlideAction::Advance => {
                let prev = self.current;
                let next = (prev + 1) % self.slides.len();
                doc.add_class(self.slides[prev], EXITING_CLASS);
                doc.remove_class(self.slides[prev], ACTIVE_CLASS);
                self.current = next;
                trace!(from = prev, to = next, "Hero slide change");

                self.schedule(timer.due + self.enter_delay, SlideAction::Activate(next));
                self.schedule(timer.due + self.exit, SlideAction::ClearExiting(prev));
                self.schedule(timer.due + self.interval, SlideAction::Advance);
            }
            SlideAction::Activate(index) => {
                doc.add_class(self.slides[index], ACTIVE_CLASS);
                doc.remove_class(self.slides[index], EXITING_CLASS);
            }
            SlideAction::ClearExiting(index) => {
                doc.remove_class(self.slides[index], EXITING_CLASS);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Bounds, PageDocument};

    fn page(slides: usize) -> (PageDocument, Vec<ElementId>) {
        let mut doc = PageDocument::new();
        let hero = doc.push("hero", Bounds::new(0.0, 0.0, 1440.0, 900.0), None);
        let ids = (0..slides)
            .map(|_| doc.push("hero__bg-slide", Bounds::new(0.0, 0.0, 1440.0, 900.0), Some(hero)))
            .collect();
        (doc, ids)
    }

    #[test]
    fn test_no_slides_is_a_noop() {
        let (mut doc, _) = page(0);
        assert!(HeroSlider::attach(&mut doc, &SliderConfig::default(), 0.0).is_none());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let (mut doc, s) = page(2);
        let config = SliderConfig {
            interval_ms: 0,
            ..Default::default()
        };
        assert!(HeroSlider::attach(&mut doc, &config, 0.0).is_none());
        assert!(!doc.has_class(s[0], ACTIVE_CLASS));
    }

    #[test]
    fn test_class_schedule() {
        let (mut doc, s) = page(3);
        let mut slider = HeroSlider::attach(&mut doc, &SliderConfig::default(), 0.0).unwrap();
        assert!(doc.has_class(s[0], ACTIVE_CLASS));

        slider.update(&mut doc, 2.99);
        assert!(doc.has_class(s[0], ACTIVE_CLASS));

        slider.update(&mut doc, 3.0);
        assert!(doc.has_class(s[0], EXITING_CLASS));
        assert!(!doc.has_class(s[0], ACTIVE_CLASS));
        assert!(!doc.has_class(s[1], ACTIVE_CLASS));

        slider.update(&mut doc, 3.06);
        assert!(doc.has_class(s[1], ACTIVE_CLASS));
        assert!(doc.has_class(s[0], EXITING_CLASS));

        // Second change at 6 s also clears the first slide's exit state
        slider.update(&mut doc, 6.06);
        assert!(!doc.has_class(s[0], EXITING_CLASS));
        assert!(doc.has_class(s[1], EXITING_CLASS));
        assert!(doc.has_class(s[2], ACTIVE_CLASS));
        assert_eq!(slider.current(), 2);
    }

    #[test]
    fn test_index_wraps_after_long_gap() {
        let (mut doc, s) = page(2);
        let mut slider = HeroSlider::attach(&mut doc, &SliderConfig::default(), 0.0).unwrap();

        // Four changes land in one update: 0 -> 1 -> 0 -> 1 -> 0
        slider.update(&mut doc, 12.5);
        assert_eq!(slider.current(), 0);
        assert!(doc.has_class(s[0], ACTIVE_CLASS));
        assert!(!doc.has_class(s[0], EXITING_CLASS));
        assert!(!doc.has_class(s[1], ACTIVE_CLASS));
        assert!(doc.has_class(s[1], EXITING_CLASS));
    }
}
