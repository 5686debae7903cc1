//! Hero: entrance sequence on load plus scroll parallax

use tracing::debug;

use crate::config::HeroConfig;
use crate::dom::{Document, ElementId, Property};
use crate::motion::{Easing, PlayState, Position, ScrubBinding, Timeline, Tween};
use crate::trigger::EntryEvent;
use crate::viewport::{intersection_ratio, Anchor, EndAnchor, ScrollSpan, Viewport};

use super::{named, require, Frame, NamedRange, SectionController, SectionState};

const NAME: &str = "hero";

/// Horizontal distance the side services slide in from
const SERVICE_SHIFT: f64 = 40.0;
const TITLE_RISE: f64 = 60.0;

#[derive(Debug, Clone)]
pub struct HeroController {
    hero: ElementId,
    state: SectionState,
    announced: bool,
    entrance: Timeline,
    parallax: Vec<(&'static str, ScrubBinding)>,
}

impl HeroController {
    pub fn attach(doc: &mut dyn Document, config: &HeroConfig) -> Option<Self> {
        let hero = require(doc, NAME, ".hero")?;
        let left = require(doc, NAME, ".hero__service-left")?;
        let center = require(doc, NAME, ".hero__service-center")?;
        let right = require(doc, NAME, ".hero__service-right")?;
        let title = require(doc, NAME, ".hero__title")?;
        let ctas = require(doc, NAME, ".hero__ctas")?;

        let overlap = Position::End(-config.service_overlap_secs);
        let entrance = Timeline::builder()
            .delay(config.delay_secs)
            .ease(config.ease)
            .then(
                Tween::from([left], &[(Property::Opacity, 0.0), (Property::X, -SERVICE_SHIFT)])
                    .duration(1.0),
            )
            .at(
                Tween::from([center], &[(Property::Opacity, 0.0), (Property::Y, 0.0)]).duration(1.0),
                overlap,
            )
            .at(
                Tween::from([right], &[(Property::Opacity, 0.0), (Property::X, SERVICE_SHIFT)])
                    .duration(1.0),
                overlap,
            )
            .at(
                Tween::from([title], &[(Property::Opacity, 0.0), (Property::Y, TITLE_RISE)])
                    .duration(1.4),
                Position::End(-config.title_overlap_secs),
            )
            .at(
                Tween::from([ctas], &[(Property::Opacity, 0.0), (Property::Y, 0.0)]).duration(0.8),
                Position::End(-config.ctas_overlap_secs),
            )
            .build(doc);

        let span = ScrollSpan::new(hero, Anchor::TOP_TOP, EndAnchor::At(Anchor::BOTTOM_TOP));
        let lag = config.scrub_lag_secs;
        let parallax = vec![
            (
                "hero.title",
                parallax(
                    doc,
                    span,
                    Tween::to(
                        [title],
                        &[(Property::Y, config.title_shift), (Property::Scale, config.title_scale)],
                    ),
                    lag,
                ),
            ),
            (
                "hero.services",
                parallax(
                    doc,
                    span,
                    Tween::to([left, center, right], &[(Property::Y, config.services_shift)]),
                    lag,
                ),
            ),
            (
                "hero.ctas",
                parallax(doc, span, Tween::to([ctas], &[(Property::Y, config.ctas_shift)]), lag),
            ),
        ];

        debug!(
            section = NAME,
            duration = entrance.duration(),
            "Entrance timeline built"
        );
        Some(Self {
            hero,
            state: SectionState::Entered,
            announced: false,
            entrance,
            parallax,
        })
    }

    pub fn entrance(&self) -> &Timeline {
        &self.entrance
    }
}

fn parallax(doc: &mut dyn Document, span: ScrollSpan, tween: Tween, lag: f64) -> ScrubBinding {
    let timeline = Timeline::builder().ease(Easing::Linear).then(tween).build(doc);
    ScrubBinding::new(span, timeline).smoothing(lag)
}

impl SectionController for HeroController {
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
            debug!(section = NAME, "Entrance finished");
        }
        for (_, binding) in &mut self.parallax {
            binding.update(doc, frame.scroll_y, &frame.viewport, frame.dt);
        }

        // Visible on load, so it reports its entry on the first frame
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

    fn ranges(&self, doc: &dyn Document, viewport: &Viewport) -> Vec<NamedRange> {
        self.parallax
            .iter()
            .filter_map(|(name, binding)| named(*name, binding.range(doc, viewport)))
            .collect()
    }
}
