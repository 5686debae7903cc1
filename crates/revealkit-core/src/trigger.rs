//! One-shot viewport-entry triggers
//!
//! A trigger watches one element and reports its first entry into the
//! viewport, then goes quiet for the rest of the page's life. Entry is
//! either a visibility ratio reaching a threshold (intersection semantics)
//! or the scroll position passing an anchor such as `"top 80%"`.

use serde::Serialize;
use tracing::debug;

use crate::dom::{Document, ElementId};
use crate::viewport::{intersection_ratio, Anchor, Viewport};

/// When a trigger counts the element as entered
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerCondition {
    /// Visible fraction of the element reaches `threshold`
    Visibility { threshold: f64 },
    /// Scroll position reaches the anchor's resolved offset
    Scroll(Anchor),
}

/// Notification delivered once per trigger
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryEvent {
    pub target: ElementId,
    /// Visible fraction of the target at the moment of entry
    pub ratio: f64,
    pub scroll_y: f64,
    pub time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerState {
    Armed,
    Fired,
}

/// Viewport-entry detector that fires at most once
#[derive(Debug, Clone)]
pub struct ViewportTrigger {
    target: ElementId,
    condition: TriggerCondition,
    state: TriggerState,
}

impl ViewportTrigger {
    pub fn new(target: ElementId, condition: TriggerCondition) -> Self {
        Self {
            target,
            condition,
            state: TriggerState::Armed,
        }
    }

    pub fn visibility(target: ElementId, threshold: f64) -> Self {
        Self::new(target, TriggerCondition::Visibility { threshold })
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn condition(&self) -> TriggerCondition {
        self.condition
    }

    pub fn has_fired(&self) -> bool {
        self.state == TriggerState::Fired
    }

    /// Evaluate against the current frame
    ///
    /// Returns the entry event on the first frame the condition holds and
    /// `None` on every frame before and after.
    pub fn poll(
        &mut self,
        doc: &dyn Document,
        scroll_y: f64,
        viewport: &Viewport,
        time: f64,
    ) -> Option<EntryEvent> {
        if self.state == TriggerState::Fired {
            return None;
        }
        let bounds = doc.bounds(self.target)?;
        let ratio = intersection_ratio(&bounds, scroll_y, viewport);

        let entered = match self.condition {
            TriggerCondition::Visibility { threshold } => ratio > 0.0 && ratio >= threshold,
            TriggerCondition::Scroll(anchor) => scroll_y >= anchor.resolve(&bounds, viewport),
        };
        if !entered {
            return None;
        }

        self.state = TriggerState::Fired;
        debug!(target_el = %self.target, ratio, scroll_y, "Viewport trigger fired");
        Some(EntryEvent {
            target: self.target,
            ratio,
            scroll_y,
            time,
        })
    }
}

/// Callback that can run at most once
pub struct OnceCallback<F>(Option<F>);

impl<F> OnceCallback<F> {
    pub fn new(callback: F) -> Self {
        Self(Some(callback))
    }

    /// Invoke the callback if it has not run yet; returns whether it ran
    pub fn call<A>(&mut self, arg: A) -> bool
    where
        F: FnOnce(A),
    {
        match self.0.take() {
            Some(callback) => {
                callback(arg);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }
}

/// Token returned by [`EntrySubscriptions::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type EntryCallback = Box<dyn FnOnce(&EntryEvent)>;

/// Host-side listeners for section entry; each unsubscribes itself after
/// its first notification
#[derive(Default)]
pub struct EntrySubscriptions {
    next_id: u64,
    listeners: Vec<(SubscriptionId, String, OnceCallback<EntryCallback>)>,
}

impl EntrySubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, section: impl Into<String>, callback: F) -> SubscriptionId
    where
        F: FnOnce(&EntryEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let callback: EntryCallback = Box::new(callback);
        self.listeners
            .push((id, section.into(), OnceCallback::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _, _)| *listener != id);
        self.listeners.len() != before
    }

    /// Notify every listener for `section`, then drop them
    pub fn dispatch(&mut self, section: &str, event: &EntryEvent) -> usize {
        let mut delivered = 0;
        for (_, name, callback) in self.listeners.iter_mut() {
            if name.as_str() == section && callback.call(event) {
                delivered += 1;
            }
        }
        self.listeners.retain(|(_, _, callback)| callback.is_pending());
        delivered
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
