//! Intro: word-by-word text reveal, pinned and scrubbed by scroll

use tracing::debug;

use crate::config::IntroConfig;
use crate::dom::{Document, ElementId, Property};
use crate::motion::{Position, ScrubBinding, Timeline, Tween};
use crate::pin::Pin;
use crate::trigger::{EntryEvent, ViewportTrigger};
use crate::viewport::{Anchor, EndAnchor, ScrollSpan, Viewport};

use super::{named, require, Frame, NamedRange, SectionController, SectionState};

const NAME: &str = "intro";

#[derive(Debug, Clone)]
pub struct IntroController {
    section: ElementId,
    words: Vec<ElementId>,
    images: Vec<ElementId>,
    trigger: ViewportTrigger,
    state: SectionState,
    config: IntroConfig,
    pin: Option<Pin>,
    reveal: Option<ScrubBinding>,
}

impl IntroController {
    pub fn attach(doc: &mut dyn Document, config: &IntroConfig) -> Option<Self> {
        let section = require(doc, NAME, ".intro")?;
        let text = require(doc, NAME, ".intro__text")?;
        let words = doc.split_words(text);
        let images = doc.query_all(".intro__image");

        Some(Self {
            section,
            words,
            images,
            trigger: ViewportTrigger::visibility(section, config.threshold),
            state: SectionState::Armed,
            config: config.clone(),
            pin: None,
            reveal: None,
        })
    }

    pub fn words(&self) -> &[ElementId] {
        &self.words
    }

    /// Word index each image is revealed alongside
    pub fn image_marks(&self) -> Vec<usize> {
        let total = self.words.len() as f64;
        self.config
            .image_marks
            .iter()
            .map(|mark| (total * mark).floor() as usize)
            .collect()
    }

    pub fn reveal(&self) -> Option<&ScrubBinding> {
        self.reveal.as_ref()
    }

    fn build(&mut self, doc: &mut dyn Document) {
        let marks = self.image_marks();
        let mut builder = Timeline::builder();

        for (index, &word) in self.words.iter().enumerate() {
            builder.push(
                Tween::to([word], &[(Property::Opacity, 1.0), (Property::Y, 0.0)])
                    .duration(self.config.word_duration_secs)
                    .ease(self.config.ease),
                Position::default(),
            );
            for (image_index, &mark) in marks.iter().enumerate() {
                let Some(&image) = self.images.get(image_index) else {
                    continue;
                };
                if mark == index {
                    builder.push(
                        Tween::to([image], &[(Property::Y, 0.0), (Property::Opacity, 1.0)])
                            .duration(self.config.image_duration_secs)
                            .ease(self.config.ease),
                        Position::PreviousStart(0.0),
                    );
                }
            }
        }

        let distance = self.words.len() as f64 * self.config.px_per_word;
        let span = ScrollSpan::new(self.section, Anchor::TOP_TOP, EndAnchor::After(distance));
        let timeline = builder.build(doc);
        debug!(
            section = NAME,
            words = self.words.len(),
            images = self.images.len(),
            distance,
            "Word reveal bound to scroll"
        );

        self.pin = Some(Pin::new(self.section, span));
        self.reveal = Some(ScrubBinding::new(span, timeline).smoothing(self.config.scrub_lag_secs));
    }
}

impl SectionController for IntroController {
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
                    self.build(doc);
                    self.state = SectionState::Entered;
                }
            }
            SectionState::Entered => self.state = SectionState::Steady,
            SectionState::Idle | SectionState::Steady => {}
        }

        if let Some(pin) = &mut self.pin {
            pin.update(doc, frame.scroll_y, &frame.viewport);
        }
        if let Some(reveal) = &mut self.reveal {
            reveal.update(doc, frame.scroll_y, &frame.viewport, frame.dt);
        }
        entered
    }

    fn ranges(&self, doc: &dyn Document, viewport: &Viewport) -> Vec<NamedRange> {
        self.reveal
            .iter()
            .filter_map(|reveal| named("intro.reveal", reveal.range(doc, viewport)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PageDocument;
    use crate::sections::testing::{block, frame, run, VIEW};
    use std::collections::BTreeMap;

    const TEXT: &str = "we design and build digital products that people love to use every single day \
                        across web and mobile at scale";

    fn page() -> (PageDocument, ElementId, ElementId, Vec<ElementId>) {
        let mut doc = PageDocument::new();
        doc.add_rule(
            ".intro__text .word",
            BTreeMap::from([(Property::Opacity, 0.2), (Property::Y, 20.0)]),
        );
        doc.add_rule(
            ".intro__image",
            BTreeMap::from([(Property::Opacity, 0.0), (Property::Y, 80.0)]),
        );
        let intro = doc.push("intro", block(1800.0, 900.0), None);
        let text = doc.push("intro__text", block(1900.0, 400.0), Some(intro));
        doc.set_text(text, TEXT);
        let images = (0..4)
            .map(|_| doc.push("intro__image", block(2300.0, 200.0), Some(intro)))
            .collect();
        (doc, intro, text, images)
    }

    fn no_lag() -> IntroConfig {
        IntroConfig {
            scrub_lag_secs: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_text_registers_nothing() {
        let mut doc = PageDocument::new();
        doc.push("intro", block(1800.0, 900.0), None);
        assert!(IntroController::attach(&mut doc, &IntroConfig::default()).is_none());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_never_scrolled_into_view_never_builds() {
        let (mut doc, _, _, images) = page();
        let mut intro = IntroController::attach(&mut doc, &IntroConfig::default()).unwrap();
        assert_eq!(intro.words().len(), 20);
        assert_eq!(intro.state(), SectionState::Armed);

        run(&mut intro, &mut doc, 0.0, 120, 0.016, 0.0);
        assert_eq!(intro.state(), SectionState::Armed);
        assert!(intro.reveal().is_none());
        assert!(intro.ranges(&doc, &VIEW).is_empty());
        for word in intro.words() {
            assert!(doc.inline_styles(*word).is_empty());
        }
        assert!(doc.inline_styles(images[0]).is_empty());
    }

    #[test]
    fn test_half_visible_then_gone_does_not_fire() {
        let (mut doc, _, _, _) = page();
        let config = IntroConfig {
            threshold: 0.75,
            ..Default::default()
        };
        let mut intro = IntroController::attach(&mut doc, &config).unwrap();

        // 0% -> 50% -> 0% of the section visible
        for scroll in [0.0, 1100.0, 1350.0, 1100.0, 0.0] {
            assert!(intro.update(&mut doc, &frame(0.0, 0.016, scroll)).is_none());
        }
        assert_eq!(intro.state(), SectionState::Armed);
    }

    #[test]
    fn test_entry_fires_once_and_builds() {
        let (mut doc, intro_el, _, _) = page();
        let mut intro = IntroController::attach(&mut doc, &IntroConfig::default()).unwrap();

        // A third of the 900 px section is visible at 1200
        assert!(intro.update(&mut doc, &frame(0.1, 0.016, 1100.0)).is_none());
        let event = intro.update(&mut doc, &frame(0.2, 0.016, 1200.0)).unwrap();
        assert_eq!(event.target, intro_el);
        assert_eq!(intro.state(), SectionState::Entered);

        intro.update(&mut doc, &frame(0.3, 0.016, 1200.0));
        assert_eq!(intro.state(), SectionState::Steady);

        // Leaving and coming back does not build again
        for scroll in [0.0, 1500.0, 0.0, 1500.0] {
            assert!(intro.update(&mut doc, &frame(0.4, 0.016, scroll)).is_none());
        }

        let ranges = intro.ranges(&doc, &VIEW);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].range.start, 1800.0);
        assert_eq!(ranges[0].range.end, 1800.0 + 20.0 * 100.0);
    }

    #[test]
    fn test_images_start_with_their_words() {
        let (mut doc, _, _, _) = page();
        let mut intro = IntroController::attach(&mut doc, &IntroConfig::default()).unwrap();
        assert_eq!(intro.image_marks(), vec![2, 6, 10, 14]);
        intro.update(&mut doc, &frame(0.0, 0.016, 1500.0));

        let entries = intro.reveal().unwrap().timeline().entries();
        assert_eq!(entries.len(), 24);
        // Word 2 is entry 2, its image directly follows with the same start
        assert_eq!(entries[3].start, entries[2].start);
        assert_eq!(entries[3].span, 2.0);
        // The image extends the timeline, so word 3 waits for it
        assert_eq!(entries[4].start, entries[3].end());
    }

    #[test]
    fn test_scrub_reveals_words_and_pins() {
        let (mut doc, intro_el, _, images) = page();
        let mut intro = IntroController::attach(&mut doc, &no_lag()).unwrap();
        let words = intro.words().to_vec();
        assert_eq!(doc.style(words[0], Property::Opacity), 0.2);

        intro.update(&mut doc, &frame(0.0, 0.016, 1200.0));
        // Entered above the pin range: nothing moves yet
        assert_eq!(doc.style(words[0], Property::Opacity), 0.2);

        intro.update(&mut doc, &frame(0.1, 0.016, 2800.0));
        assert_eq!(doc.style(intro_el, Property::PinY), 1000.0);
        assert_eq!(doc.style(words[0], Property::Opacity), 1.0);
        assert_eq!(doc.style(words[0], Property::Y), 0.0);
        assert_eq!(doc.style(words[19], Property::Opacity), 0.2);

        intro.update(&mut doc, &frame(0.2, 0.016, 3800.0));
        for word in &words {
            assert_eq!(doc.style(*word, Property::Opacity), 1.0);
        }
        for image in &images {
            assert_eq!(doc.style(*image, Property::Opacity), 1.0);
            assert_eq!(doc.style(*image, Property::Y), 0.0);
        }
        assert_eq!(doc.style(intro_el, Property::PinY), 2000.0);

        // Scrolling back up rewinds the words
        intro.update(&mut doc, &frame(0.3, 0.016, 1800.0));
        assert_eq!(doc.style(words[19], Property::Opacity), 0.2);
        assert_eq!(doc.style(images[3], Property::Opacity), 0.0);
    }
}
