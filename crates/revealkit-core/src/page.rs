//! Page runtime: attaches every section once and drives them frame by frame

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::config::AppConfig;
use crate::dom::Document;
use crate::sections::{
    AboutHeroController, Frame, HeroController, IntroController, NamedRange, SectionController,
    SectionState, ServicesController, TrustController,
};
use crate::slider::HeroSlider;
use crate::smooth::SmoothScroll;
use crate::trigger::{EntryEvent, EntrySubscriptions, SubscriptionId};
use crate::viewport::Viewport;

/// Scroll input arriving with a frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScrollInput {
    /// No new input
    #[default]
    Hold,
    /// Native scroll position, applied as is
    Jump(f64),
    /// Programmatic smooth scroll to a position
    To(f64),
    /// Wheel delta in px
    Wheel(f64),
    /// Touch drag delta in px
    Touch(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub dt: f64,
    pub scroll: ScrollInput,
    pub viewport: Viewport,
}

impl FrameInput {
    pub fn new(dt: f64, scroll: ScrollInput, viewport: Viewport) -> Self {
        Self { dt, scroll, viewport }
    }
}

/// A section that entered the viewport this frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionEntry {
    pub section: &'static str,
    #[serde(flatten)]
    pub event: EntryEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame: u64,
    pub time: f64,
    pub scroll_y: f64,
    pub entries: Vec<SectionEntry>,
}

/// Everything animated on one page load
pub struct Page {
    sections: Vec<Box<dyn SectionController>>,
    slider: Option<HeroSlider>,
    smooth: SmoothScroll,
    subscriptions: EntrySubscriptions,
    time: f64,
    frames: u64,
}

impl Page {
    /// Attach every section whose elements are present
    pub fn init(doc: &mut dyn Document, config: &AppConfig) -> Self {
        let mut sections: Vec<Box<dyn SectionController>> = Vec::new();

        if let Some(hero) = HeroController::attach(doc, &config.hero) {
            sections.push(Box::new(hero));
        }
        if let Some(about) = AboutHeroController::attach(doc, &config.about) {
            sections.push(Box::new(about));
        }
        if let Some(intro) = IntroController::attach(doc, &config.intro) {
            sections.push(Box::new(intro));
        }
        if let Some(trust) = TrustController::attach(doc, &config.trust) {
            sections.push(Box::new(trust));
        }
        if let Some(services) = ServicesController::attach(doc, &config.services) {
            sections.push(Box::new(services));
        }

        let slider = HeroSlider::attach(doc, &config.slider, 0.0);
        let names: Vec<&str> = sections.iter().map(|s| s.name()).collect();
        info!(
            sections = ?names,
            slider = slider.is_some(),
            smooth_scroll = config.smooth_scroll.enabled,
            "Page initialized"
        );

        Self {
            sections,
            slider,
            smooth: SmoothScroll::new(config.smooth_scroll.clone()),
            subscriptions: EntrySubscriptions::new(),
            time: 0.0,
            frames: 0,
        }
    }

    /// Run `callback` once, the first time `section` enters the viewport
    pub fn on_section_enter<F>(&mut self, section: &str, callback: F) -> SubscriptionId
    where
        F: FnOnce(&EntryEvent) + 'static,
    {
        self.subscriptions.subscribe(section, callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    pub fn section_names(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.name()).collect()
    }

    pub fn states(&self) -> Vec<(&'static str, SectionState)> {
        self.sections.iter().map(|s| (s.name(), s.state())).collect()
    }

    pub fn state(&self, section: &str) -> Option<SectionState> {
        self.sections
            .iter()
            .find(|s| s.name() == section)
            .map(|s| s.state())
    }

    pub fn has_slider(&self) -> bool {
        self.slider.is_some()
    }

    pub fn scroll_y(&self) -> f64 {
        self.smooth.current_scroll()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Whether smooth scrolling still has motion queued
    pub fn is_scrolling(&self) -> bool {
        self.smooth.needs_update()
    }

    /// Scroll ranges every attached section currently reacts to
    pub fn ranges(&self, doc: &dyn Document, viewport: &Viewport) -> Vec<NamedRange> {
        self.sections
            .iter()
            .flat_map(|s| s.ranges(doc, viewport))
            .collect()
    }

    /// Advance the whole page by one frame
    pub fn frame(&mut self, doc: &mut dyn Document, input: FrameInput) -> FrameReport {
        let limit = (doc.scroll_height() - input.viewport.height).max(0.0);
        match input.scroll {
            ScrollInput::Hold => {}
            ScrollInput::Jump(y) => self.smooth.set_scroll(y.min(limit)),
            ScrollInput::To(y) => self.smooth.scroll_to(y, limit),
            ScrollInput::Wheel(delta) => self.smooth.on_wheel(delta, limit),
            ScrollInput::Touch(delta) => self.smooth.on_touch(delta, limit),
        }
        let scroll_y = self.smooth.update(input.dt, limit);

        let dt = input.dt.max(0.0);
        self.time += dt;
        self.frames += 1;

        if let Some(slider) = &mut self.slider {
            slider.update(doc, self.time);
        }

        let frame = Frame {
            time: self.time,
            dt,
            scroll_y,
            viewport: input.viewport,
        };
        let mut entries = Vec::new();
        for section in &mut self.sections {
            let Some(event) = section.update(doc, &frame) else {
                continue;
            };
            let notified = self.subscriptions.dispatch(section.name(), &event);
            debug!(
                section = section.name(),
                ratio = event.ratio,
                scroll_y,
                notified,
                "Section entered"
            );
            entries.push(SectionEntry {
                section: section.name(),
                event,
            });
        }
        trace!(frame = self.frames, time = self.time, scroll_y, "Frame done");

        FrameReport {
            frame: self.frames,
            time: self.time,
            scroll_y,
            entries,
        }
    }
}
