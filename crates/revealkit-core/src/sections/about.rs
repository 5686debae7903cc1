//! About page hero: title, intro and image fade up on load

use tracing::debug;

use crate::config::AboutConfig;
use crate::dom::{Document, ElementId, Property};
use crate::motion::{PlayState, Position, Timeline, Tween};
use crate::trigger::EntryEvent;
use crate::viewport::intersection_ratio;

use super::{require, Frame, SectionController, SectionState};

const NAME: &str = "about-hero";

/// Optional parts and the distance each rises from
const PARTS: [(&str, f64); 3] = [
    (".about-hero__title", 40.0),
    (".about-hero__intro", 30.0),
    (".about-hero__image", 40.0),
];

#[derive(Debug, Clone)]
pub struct AboutHeroController {
    hero: ElementId,
    state: SectionState,
    announced: bool,
    entrance: Timeline,
}

impl AboutHeroController {
    pub fn attach(doc: &mut dyn Document, config: &AboutConfig) -> Option<Self> {
        let hero = require(doc, NAME, ".about-hero")?;

        let mut builder = Timeline::builder().ease(config.ease);
        for (index, (selector, rise)) in PARTS.iter().enumerate() {
            let Some(part) = doc.query(selector) else {
                continue;
            };
            let delay = config.delays_secs.get(index).copied().unwrap_or(0.0);
            builder.push(
                Tween::from([part], &[(Property::Opacity, 0.0), (Property::Y, *rise)])
                    .duration(config.duration_secs),
                Position::At(delay),
            );
        }
        let entrance = builder.build(doc);
        debug!(section = NAME, parts = entrance.entries().len(), "Entrance timeline built");

        Some(Self {
            hero,
            state: SectionState::Entered,
            announced: false,
            entrance,
        })
    }

    pub fn entrance(&self) -> &Timeline {
        &self.entrance
    }
}

impl SectionController for AboutHeroController {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> SectionState {
        self.state
    }

    fn update(&mut self, doc: &mut dyn Document, frame: &Frame) -> Option<EntryEvent> {
        if self.entrance.advance(frame.dt, doc) == PlayState::Finished
            && self.state == SectionState::Entered
        {
            self.state = SectionState::Steady;
        }

        if self.announced {
            return None;
        }
        self.announced = true;
        let ratio = doc
            .bounds(self.hero)
            .map(|b| intersection_ratio(&b, frame.scroll_y, &frame.viewport))
            .unwrap_or(0.0);
        Some(EntryEvent {
            target: self.hero,
            ratio,
            scroll_y: frame.scroll_y,
            time: frame.time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PageDocument;
    use crate::sections::testing::{block, run};

    #[test]
    fn test_missing_hero_is_skipped() {
        let mut doc = PageDocument::new();
        let title = doc.push("about-hero__title", block(100.0, 80.0), None);
        assert!(AboutHeroController::attach(&mut doc, &AboutConfig::default()).is_none());
        assert!(doc.inline_styles(title).is_empty());
    }

    #[test]
    fn test_parts_fade_up_in_order() {
        let mut doc = PageDocument::new();
        let hero = doc.push("about-hero", block(0.0, 900.0), None);
        let title = doc.push("about-hero__title", block(100.0, 80.0), Some(hero));
        let intro = doc.push("about-hero__intro", block(200.0, 120.0), Some(hero));
        let image = doc.push("about-hero__image", block(350.0, 500.0), Some(hero));

        let mut about = AboutHeroController::attach(&mut doc, &AboutConfig::default()).unwrap();
        let starts: Vec<f64> = about.entrance().entries().iter().map(|e| e.start).collect();
        assert_eq!(starts, vec![0.5, 0.8, 1.1]);
        assert_eq!(doc.style(intro, Property::Y), 30.0);
        assert_eq!(doc.style(image, Property::Opacity), 0.0);

        // At 1.0 s the title is moving, the image has not started
        run(&mut about, &mut doc, 0.0, 50, 0.02, 0.0);
        assert!(doc.style(title, Property::Opacity) > 0.0);
        assert_eq!(doc.style(image, Property::Opacity), 0.0);

        run(&mut about, &mut doc, 1.0, 60, 0.02, 0.0);
        assert_eq!(about.state(), SectionState::Steady);
        for part in [title, intro, image] {
            assert_eq!(doc.style(part, Property::Opacity), 1.0);
            assert_eq!(doc.style(part, Property::Y), 0.0);
        }
    }

    #[test]
    fn test_optional_parts_may_be_absent() {
        let mut doc = PageDocument::new();
        let hero = doc.push("about-hero", block(0.0, 900.0), None);
        doc.push("about-hero__intro", block(200.0, 120.0), Some(hero));

        let mut about = AboutHeroController::attach(&mut doc, &AboutConfig::default()).unwrap();
        assert_eq!(about.entrance().entries().len(), 1);
        assert_eq!(about.entrance().entries()[0].start, 0.8);
        run(&mut about, &mut doc, 0.0, 100, 0.02, 0.0);
        assert_eq!(about.state(), SectionState::Steady);
    }
}
