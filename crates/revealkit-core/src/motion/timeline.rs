//! L3 Molecular Layer: Timelines of time-offset tweens
//!
//! Tweens are placed one after another with positions relative to the
//! timeline's end or to the previous entry, so overlaps like `-=0.8` read
//! the way page authors write them. A timeline either plays forward on the
//! frame clock or is seeked by a scrub binding.

use std::fmt;
use std::str::FromStr;

use crate::dom::Document;
use crate::error::Error;

use super::easing::Easing;
use super::tween::{Track, Tween, TweenKind};

/// Where an entry starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// End of the timeline so far, plus an offset (`+=N`, `-=N`, or nothing)
    End(f64),
    /// Start of the previous entry, plus an offset (`<`, `<N`)
    PreviousStart(f64),
    /// End of the previous entry, plus an offset (`>`, `>N`)
    PreviousEnd(f64),
    /// Absolute time in seconds
    At(f64),
}

impl Default for Position {
    fn default() -> Self {
        Position::End(0.0)
    }
}

impl FromStr for Position {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || Error::InvalidPosition(s.to_string());
        let offset = |rest: &str| -> Result<f64, Error> {
            if rest.is_empty() {
                Ok(0.0)
            } else {
                rest.trim_start_matches('+').parse().map_err(|_| invalid())
            }
        };

        if s.is_empty() {
            return Ok(Position::End(0.0));
        }
        if let Some(rest) = s.strip_prefix("+=") {
            return rest.parse().map(Position::End).map_err(|_| invalid());
        }
        if let Some(rest) = s.strip_prefix("-=") {
            return rest.parse::<f64>().map(|v| Position::End(-v)).map_err(|_| invalid());
        }
        if let Some(rest) = s.strip_prefix('<') {
            return offset(rest).map(Position::PreviousStart);
        }
        if let Some(rest) = s.strip_prefix('>') {
            return offset(rest).map(Position::PreviousEnd);
        }
        s.parse().map(Position::At).map_err(|_| invalid())
    }
}

impl From<f64> for Position {
    fn from(at: f64) -> Self {
        Position::At(at)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Position::End(o) if o < 0.0 => write!(f, "-={}", -o),
            Position::End(o) => write!(f, "+={}", o),
            Position::PreviousStart(o) => write!(f, "<{}", o),
            Position::PreviousEnd(o) => write!(f, ">{}", o),
            Position::At(t) => write!(f, "{}", t),
        }
    }
}

/// One placed tween
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub start: f64,
    pub span: f64,
    tracks: Vec<Track>,
    done: bool,
}

impl TimelineEntry {
    pub fn end(&self) -> f64 {
        self.start + self.span
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    fn render(&mut self, time: f64, doc: &mut dyn Document) {
        let local = time - self.start;
        for track in &mut self.tracks {
            track.render(local, doc);
        }
    }
}

/// Collects tweens and resolves their positions
#[derive(Debug, Clone)]
pub struct TimelineBuilder {
    pending: Vec<(Tween, Position)>,
    delay: f64,
    ease: Easing,
}

impl Default for TimelineBuilder {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            delay: 0.0,
            ease: Easing::Power(1, super::easing::EaseDirection::Out),
        }
    }
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait before playback starts; ignored when seeking
    pub fn delay(mut self, secs: f64) -> Self {
        self.delay = secs.max(0.0);
        self
    }

    /// Easing for tweens that do not set their own
    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    /// Append at the end of the timeline
    pub fn then(self, tween: Tween) -> Self {
        self.at(tween, Position::End(0.0))
    }

    pub fn at(mut self, tween: Tween, position: Position) -> Self {
        self.pending.push((tween, position));
        self
    }

    /// Append in place; for loops that add entries conditionally
    pub fn push(&mut self, tween: Tween, position: Position) {
        self.pending.push((tween, position));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Resolve positions and render `from` tweens' start values
    pub fn build(self, doc: &mut dyn Document) -> Timeline {
        let mut entries: Vec<TimelineEntry> = Vec::with_capacity(self.pending.len());
        let mut end: f64 = 0.0;

        for (tween, position) in self.pending {
            let (prev_start, prev_end) = entries
                .last()
                .map(|e| (e.start, e.end()))
                .unwrap_or((0.0, 0.0));
            let start = match position {
                Position::End(offset) => end + offset,
                Position::PreviousStart(offset) => prev_start + offset,
                Position::PreviousEnd(offset) => prev_end + offset,
                Position::At(at) => at,
            }
            .max(0.0);

            let immediate = tween.kind == TweenKind::From;
            let span = tween.span();
            let tracks = tween.into_tracks(doc, self.ease);
            if immediate {
                for track in &tracks {
                    track.render_start(doc);
                }
            }

            let entry = TimelineEntry {
                start,
                span,
                tracks,
                done: false,
            };
            end = end.max(entry.end());
            entries.push(entry);
        }

        Timeline {
            entries,
            delay: self.delay,
            elapsed: 0.0,
            playhead: 0.0,
            state: PlayState::Playing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Finished,
}

/// Resolved, playable sequence of tweens
#[derive(Debug, Clone)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    delay: f64,
    elapsed: f64,
    playhead: f64,
    state: PlayState,
}

impl Timeline {
    pub fn builder() -> TimelineBuilder {
        TimelineBuilder::new()
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Length without the start delay
    pub fn duration(&self) -> f64 {
        self.entries.iter().map(TimelineEntry::end).fold(0.0, f64::max)
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn playhead(&self) -> f64 {
        self.playhead
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlayState::Finished
    }

    /// Move the playhead forward by `dt` seconds and render started entries
    ///
    /// Playback never runs backwards; each entry renders its final value
    /// once and is then left alone.
    pub fn advance(&mut self, dt: f64, doc: &mut dyn Document) -> PlayState {
        if self.state == PlayState::Finished {
            return self.state;
        }
        self.elapsed += dt.max(0.0);
        let time = self.elapsed - self.delay;
        if time < 0.0 {
            return self.state;
        }
        self.playhead = time.min(self.duration());

        for entry in &mut self.entries {
            if entry.done || entry.start > time {
                continue;
            }
            entry.render(time, doc);
            if time >= entry.end() {
                entry.done = true;
            }
        }

        if self.entries.iter().all(|e| e.done) {
            self.state = PlayState::Finished;
        }
        self.state
    }

    /// Jump to `time` in either direction and render every affected entry
    ///
    /// Entries that have not started yet are put back at their start values
    /// if they were rendered before.
    pub fn seek(&mut self, time: f64, doc: &mut dyn Document) {
        let time = time.clamp(0.0, self.duration());
        self.playhead = time;
        for entry in &mut self.entries {
            if entry.start <= time {
                entry.render(time, doc);
            } else {
                for track in &entry.tracks {
                    if track.has_rendered() {
                        track.render_start(doc);
                    }
                }
            }
        }
    }

    /// Seek to a fraction of the duration
    pub fn seek_progress(&mut self, progress: f64, doc: &mut dyn Document) {
        let duration = self.duration();
        self.seek(progress.clamp(0.0, 1.0) * duration, doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Bounds, ElementId, PageDocument, Property};

    fn doc_with(n: usize) -> (PageDocument, Vec<ElementId>) {
        let mut doc = PageDocument::new();
        let ids = (0..n)
            .map(|i| doc.push(&format!("el-{}", i), Bounds::default(), None))
            .collect();
        (doc, ids)
    }

    #[test]
    fn test_parse_positions() {
        assert_eq!("-=0.8".parse::<Position>().unwrap(), Position::End(-0.8));
        assert_eq!("+=1".parse::<Position>().unwrap(), Position::End(1.0));
        assert_eq!("<".parse::<Position>().unwrap(), Position::PreviousStart(0.0));
        assert_eq!("<0.2".parse::<Position>().unwrap(), Position::PreviousStart(0.2));
        assert_eq!(">-0.1".parse::<Position>().unwrap(), Position::PreviousEnd(-0.1));
        assert_eq!("1.5".parse::<Position>().unwrap(), Position::At(1.5));
        assert_eq!("".parse::<Position>().unwrap(), Position::End(0.0));
        assert!("soon".parse::<Position>().is_err());
        assert!("-=x".parse::<Position>().is_err());
    }

    #[test]
    fn test_resolves_negative_overlaps() {
        let (mut doc, ids) = doc_with(5);
        let fade = |id: ElementId, d: f64| Tween::from([id], &[(Property::Opacity, 0.0)]).duration(d);

        let tl = Timeline::builder()
            .then(fade(ids[0], 1.0))
            .at(fade(ids[1], 1.0), Position::End(-0.8))
            .at(fade(ids[2], 1.0), Position::End(-0.8))
            .at(fade(ids[3], 1.4), Position::End(-0.5))
            .at(fade(ids[4], 0.8), Position::End(-0.6))
            .build(&mut doc);

        let starts: Vec<f64> = tl.entries().iter().map(|e| e.start).collect();
        let expected = [0.0, 0.2, 0.4, 0.9, 1.7];
        for (got, want) in starts.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{:?}", starts);
        }
        assert!((tl.duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_previous_start_and_clamping() {
        let (mut doc, ids) = doc_with(3);
        let tl = Timeline::builder()
            .then(Tween::to([ids[0]], &[(Property::Y, 0.0)]).duration(0.5))
            .then(Tween::to([ids[1]], &[(Property::Y, 0.0)]).duration(0.5))
            .at(Tween::to([ids[2]], &[(Property::Y, 0.0)]).duration(2.0), Position::PreviousStart(0.0))
            .at(Tween::to([ids[0]], &[(Property::X, 1.0)]), Position::End(-10.0))
            .build(&mut doc);

        assert_eq!(tl.entries()[2].start, 0.5);
        assert_eq!(tl.entries()[3].start, 0.0);
        assert!((tl.duration() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_tweens_render_immediately_and_play_forward() {
        let (mut doc, ids) = doc_with(1);
        let mut tl = Timeline::builder()
            .delay(0.5)
            .ease(Easing::Linear)
            .then(Tween::from([ids[0]], &[(Property::Opacity, 0.0), (Property::X, -40.0)]).duration(1.0))
            .build(&mut doc);

        assert_eq!(doc.style(ids[0], Property::Opacity), 0.0);
        assert_eq!(doc.style(ids[0], Property::X), -40.0);

        // Still inside the delay
        tl.advance(0.25, &mut doc);
        assert_eq!(doc.style(ids[0], Property::Opacity), 0.0);

        tl.advance(0.75, &mut doc);
        assert!((doc.style(ids[0], Property::Opacity) - 0.5).abs() < 1e-9);
        assert!((doc.style(ids[0], Property::X) + 20.0).abs() < 1e-9);

        assert_eq!(tl.advance(5.0, &mut doc), PlayState::Finished);
        assert_eq!(doc.style(ids[0], Property::Opacity), 1.0);
        assert_eq!(doc.style(ids[0], Property::X), 0.0);
    }

    #[test]
    fn test_finished_timeline_leaves_styles_alone() {
        let (mut doc, ids) = doc_with(1);
        let mut tl = Timeline::builder()
            .then(Tween::to([ids[0]], &[(Property::Y, -100.0)]).duration(0.2))
            .build(&mut doc);
        tl.advance(1.0, &mut doc);
        assert!(tl.is_finished());

        doc.set_style(ids[0], Property::Y, 5.0);
        tl.advance(1.0, &mut doc);
        assert_eq!(doc.style(ids[0], Property::Y), 5.0);
    }

    #[test]
    fn test_seek_both_directions_restores_start_values() {
        let (mut doc, ids) = doc_with(2);
        doc.set_style(ids[0], Property::Opacity, 0.0);
        doc.set_style(ids[1], Property::Opacity, 0.0);
        let mut tl = Timeline::builder()
            .ease(Easing::Linear)
            .then(Tween::to([ids[0]], &[(Property::Opacity, 1.0)]).duration(1.0))
            .then(Tween::to([ids[1]], &[(Property::Opacity, 1.0)]).duration(1.0))
            .build(&mut doc);

        tl.seek_progress(1.0, &mut doc);
        assert_eq!(doc.style(ids[1], Property::Opacity), 1.0);

        tl.seek(0.5, &mut doc);
        assert!((doc.style(ids[0], Property::Opacity) - 0.5).abs() < 1e-9);
        assert_eq!(doc.style(ids[1], Property::Opacity), 0.0);
        assert!((tl.playhead() - 0.5).abs() < 1e-9);
    }
}
