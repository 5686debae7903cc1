pub mod config;
pub mod error;
pub mod dom;
pub mod viewport;
pub mod motion;
pub mod trigger;
pub mod pin;
pub mod carousel;
pub mod smooth;
pub mod slider;
pub mod sections;
pub mod page;

pub use config::AppConfig;
pub use dom::{Bounds, Document, ElementId, PageDocument, PageLayout, Property};
pub use error::{Error, Result};
pub use page::{FrameInput, FrameReport, Page, ScrollInput, SectionEntry};
pub use sections::{NamedRange, SectionState};
pub use viewport::{Anchor, ScrollRange, Viewport};
