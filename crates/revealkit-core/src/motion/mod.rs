//! Animation primitives for scroll-driven pages
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves (`power3.out`, `expo.inOut`, ...)
//! - `timing` - Progress and interpolation helpers on the frame clock
//! - `tween` - Tween descriptions and their per-property tracks
//!
//! ## L3 Molecular Layer
//! - `timeline` - Offset-based sequences of tweens
//! - `scrub` - Scroll-position bindings driving a timeline
//!
//! # Usage
//!
//! ```ignore
//! use revealkit_core::motion::{Easing, Position, Timeline, Tween};
//!
//! let mut timeline = Timeline::builder()
//!     .delay(0.5)
//!     .ease(Easing::POWER3_OUT)
//!     .then(Tween::from([left], &[(Property::Opacity, 0.0), (Property::X, -40.0)]).duration(1.0))
//!     .at(Tween::from([right], &[(Property::Opacity, 0.0)]).duration(1.0), "-=0.8".parse()?)
//!     .build(&mut doc);
//!
//! // Each frame
//! timeline.advance(dt, &mut doc);
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod timing;
pub mod tween;

// L3 Molecular Layer
pub mod scrub;
pub mod timeline;

pub use easing::{EaseDirection, Easing};
pub use scrub::{scrub_progress, scrub_value, ExitBehavior, ScrubBinding};
pub use timeline::{PlayState, Position, Timeline, TimelineBuilder, TimelineEntry};
pub use tween::{Track, Tween, TweenKind};
