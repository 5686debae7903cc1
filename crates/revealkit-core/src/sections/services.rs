//! Services: pinned wrapper with cards sliding in one after another

use tracing::debug;

use crate::carousel::PinnedCarousel;
use crate::config::ServicesConfig;
use crate::dom::{Document, ElementId};
use crate::pin::Pin;
use crate::trigger::{EntryEvent, ViewportTrigger};
use crate::viewport::{Anchor, EndAnchor, ScrollSpan, Viewport};

use super::{named, require, require_all, Frame, NamedRange, SectionController, SectionState};

const NAME: &str = "services";

#[derive(Debug, Clone)]
pub struct ServicesController {
    section: ElementId,
    wrapper: ElementId,
    cards: Vec<ElementId>,
    trigger: ViewportTrigger,
    state: SectionState,
    lag: f64,
    carousel: Option<PinnedCarousel>,
}

impl ServicesController {
    pub fn attach(doc: &mut dyn Document, config: &ServicesConfig) -> Option<Self> {
        let section = require(doc, NAME, ".services")?;
        let wrapper = require(doc, NAME, ".services__wrapper")?;
        let cards = require_all(doc, NAME, ".service-card")?;

        Some(Self {
            section,
            wrapper,
            cards,
            trigger: ViewportTrigger::visibility(section, config.threshold),
            state: SectionState::Armed,
            lag: config.scrub_lag_secs,
            carousel: None,
        })
    }

    pub fn carousel(&self) -> Option<&PinnedCarousel> {
        self.carousel.as_ref()
    }
}

impl SectionController for ServicesController {
    fn name(&self) -> &'static str {
        NAME
    }

    fn state(&self) -> SectionState {
        self.state
    }

    fn update(&mut self, doc: &mut dyn Document, frame: &Frame) -> Option<EntryEvent> {
        let mut entered = None;
        match self.state {
            SectionState::Armed => {
                entered = self.trigger.poll(doc, frame.scroll_y, &frame.viewport, frame.time);
                if entered.is_some() {
                    let span = ScrollSpan::new(
                        self.section,
                        Anchor::TOP_TOP,
                        EndAnchor::At(Anchor::BOTTOM_BOTTOM),
                    );
                    let pin = Pin::new(self.wrapper, span);
                    self.carousel = Some(PinnedCarousel::new(doc, pin, self.cards.clone(), self.lag));
                    self.state = SectionState::Entered;
                    debug!(section = NAME, cards = self.cards.len(), "Card carousel pinned");
                }
            }
            SectionState::Entered => self.state = SectionState::Steady,
            SectionState::Idle | SectionState::Steady => {}
        }

        if let Some(carousel) = &mut self.carousel {
            carousel.update(doc, frame.scroll_y, &frame.viewport, frame.dt);
        }
        entered
    }

    fn ranges(&self, doc: &dyn Document, viewport: &Viewport) -> Vec<NamedRange> {
        let Some((pin, slices)) = self.carousel.as_ref().and_then(|c| c.ranges(doc, viewport)) else {
            return Vec::new();
        };
        named("services.pin", Some(pin))
            .into_iter()
            .chain(
                slices
                    .into_iter()
                    .filter_map(|(index, range)| named(format!("services.card{}", index), Some(range))),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{PageDocument, Property};
    use crate::sections::testing::{block, frame, VIEW};

    fn page(cards: usize) -> (PageDocument, ElementId, Vec<ElementId>) {
        let mut doc = PageDocument::new();
        let section = doc.push("services", block(3000.0, 3600.0), None);
        let wrapper = doc.push("services__wrapper", block(3000.0, 900.0), Some(section));
        let cards = (0..cards)
            .map(|_| doc.push("service-card", block(3000.0, 900.0), Some(wrapper)))
            .collect();
        (doc, wrapper, cards)
    }

    fn no_lag() -> ServicesConfig {
        ServicesConfig {
            scrub_lag_secs: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_cards_registers_nothing() {
        let (mut doc, _, _) = page(0);
        assert!(ServicesController::attach(&mut doc, &ServicesConfig::default()).is_none());
    }

    #[test]
    fn test_cards_untouched_until_entry() {
        let (mut doc, _, cards) = page(4);
        let mut services = ServicesController::attach(&mut doc, &no_lag()).unwrap();

        // 10% of 3600 px is 360 px: the top must reach 540 px down the viewport
        assert!(services.update(&mut doc, &frame(0.0, 0.016, 2459.0)).is_none());
        assert!(services.carousel().is_none());
        assert!(doc.inline_styles(cards[1]).is_empty());

        assert!(services.update(&mut doc, &frame(0.1, 0.016, 2460.0)).is_some());
        assert_eq!(services.state(), SectionState::Entered);
        assert_eq!(doc.style(cards[0], Property::XPercent), 0.0);
        for card in &cards[1..] {
            assert_eq!(doc.style(*card, Property::XPercent), 100.0);
        }
    }

    #[test]
    fn test_cards_follow_their_slices() {
        let (mut doc, wrapper, cards) = page(4);
        let mut services = ServicesController::attach(&mut doc, &no_lag()).unwrap();
        services.update(&mut doc, &frame(0.0, 0.016, 2800.0));
        services.update(&mut doc, &frame(0.1, 0.016, 2800.0));
        assert_eq!(services.state(), SectionState::Steady);

        // Pin range [3000, 5700] in three 900 px slices
        let ranges = services.ranges(&doc, &VIEW);
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[0].name, "services.pin");
        assert_eq!(ranges[0].range.start, 3000.0);
        assert_eq!(ranges[0].range.end, 5700.0);
        assert_eq!(ranges[2].name, "services.card2");
        assert!((ranges[2].range.start - 3900.0).abs() < 1e-9);
        assert!((ranges[2].range.end - 4800.0).abs() < 1e-9);

        services.update(&mut doc, &frame(0.2, 0.016, 4350.0));
        assert_eq!(doc.style(cards[1], Property::XPercent), 0.0);
        assert!((doc.style(cards[2], Property::XPercent) - 50.0).abs() < 1e-9);
        assert_eq!(doc.style(cards[3], Property::XPercent), 100.0);
        assert_eq!(doc.style(wrapper, Property::PinY), 1350.0);
    }

    #[test]
    fn test_single_card_pins_without_slices() {
        let (mut doc, _, cards) = page(1);
        let mut services = ServicesController::attach(&mut doc, &no_lag()).unwrap();
        services.update(&mut doc, &frame(0.0, 0.016, 3000.0));
        assert_eq!(services.ranges(&doc, &VIEW).len(), 1);
        assert_eq!(doc.style(cards[0], Property::XPercent), 0.0);
    }
}
