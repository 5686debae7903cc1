//! Trust figures: hidden on load, revealed with a stagger once scrolled to

use tracing::{debug, warn};

use crate::config::TrustConfig;
use crate::dom::{Document, ElementId, Property};
use crate::motion::{PlayState, Timeline, Tween};
use crate::trigger::{EntryEvent, TriggerCondition, ViewportTrigger};
use crate::viewport::{Anchor, ScrollRange, Viewport};

use super::{named, require, require_all, Frame, NamedRange, SectionController, SectionState};

const NAME: &str = "trust";
const ITEMS: &str = ".trust__number, .trust__label, .trust__locations, .trust__description";

#[derive(Debug, Clone)]
pub struct TrustController {
    section: ElementId,
    items: Vec<ElementId>,
    start: Anchor,
    trigger: ViewportTrigger,
    state: SectionState,
    config: TrustConfig,
    reveal: Option<Timeline>,
}

impl TrustController {
    pub fn attach(doc: &mut dyn Document, config: &TrustConfig) -> Option<Self> {
        let section = require(doc, NAME, ".trust")?;
        let items = require_all(doc, NAME, ITEMS)?;
        let start: Anchor = match config.start.parse() {
            Ok(anchor) => anchor,
            Err(e) => {
                warn!(section = NAME, error = %e, "Invalid start anchor, section skipped");
                return None;
            }
        };

        for &item in &items {
            doc.set_style(item, Property::Opacity, 0.0);
            doc.set_style(item, Property::Y, config.rise);
        }

        Some(Self {
            section,
            items,
            start,
            trigger: ViewportTrigger::new(section, TriggerCondition::Scroll(start)),
            state: SectionState::Armed,
            config: config.clone(),
            reveal: None,
        })
    }

    pub fn items(&self) -> &[ElementId] {
        &self.items
    }

    pub fn reveal(&self) -> Option<&Timeline> {
        self.reveal.as_ref()
    }
}

impl SectionController for TrustController {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> SectionState {
        self.state
    }

    fn update(&mut self, doc: &mut dyn Document, frame: &Frame) -> Option<EntryEvent> {
        if self.state == SectionState::Armed {
            let entered = self.trigger.poll(doc, frame.scroll_y, &frame.viewport, frame.time)?;
            let timeline = Timeline::builder()
                .then(
                    Tween::to(self.items.iter().copied(), &[(Property::Opacity, 1.0), (Property::Y, 0.0)])
                        .duration(self.config.duration_secs)
                        .stagger(self.config.stagger_secs)
                        .ease(self.config.ease),
                )
                .build(doc);
            debug!(section = NAME, items = self.items.len(), "Staggered reveal started");
            self.reveal = Some(timeline);
            self.state = SectionState::Entered;
            return Some(entered);
        }

        if let Some(reveal) = &mut self.reveal {
            if reveal.advance(frame.dt, doc) == PlayState::Finished
                && self.state == SectionState::Entered
            {
                self.state = SectionState::Steady;
            }
        }
        None
    }

    fn ranges(&self, doc: &dyn Document, viewport: &Viewport) -> Vec<NamedRange> {
        let at = doc
            .bounds(self.section)
            .map(|b| self.start.resolve(&b, viewport))
            .map(|y| ScrollRange::new(y, y));
        named("trust.start", at).into_iter().collect()
    }
}
