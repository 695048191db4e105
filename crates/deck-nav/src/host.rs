#![forbid(unsafe_code)]

//! Host abstraction: scrolling, intersection observation, and key capture.
//!
//! This is the boundary between the navigation engine and the environment
//! that actually owns the viewport. A browser binding forwards to
//! `scrollIntoView` and `IntersectionObserver`; [`VirtualViewport`] simulates
//! both deterministically.
//!
//! Every host operation is fire-and-forget. Nothing here reports errors or
//! completion.
//!
//! [`VirtualViewport`]: crate::viewport::VirtualViewport

use std::sync::mpsc;
use std::time::Duration;

use deck_core::event::Event;

use crate::config::DeckConfig;
use crate::registry::SectionId;

/// How the host should move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollBehavior {
    /// Animate to the target.
    #[default]
    Smooth,
    /// Jump to the target.
    Instant,
}

/// Request to align a section's leading edge with the viewport's leading edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    /// Section to bring into view.
    pub section: SectionId,
    /// Its registry position.
    pub index: usize,
    /// Animation behavior.
    pub behavior: ScrollBehavior,
}

/// One section's visibility crossing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Section whose visibility changed.
    pub section: SectionId,
    /// `true` when at least the threshold fraction is visible.
    pub is_intersecting: bool,
    /// Visible fraction of the section, in [0, 1].
    pub ratio: f32,
}

impl IntersectionEntry {
    /// Entry for a section that crossed into visibility.
    pub const fn entering(section: SectionId, ratio: f32) -> Self {
        Self {
            section,
            is_intersecting: true,
            ratio,
        }
    }

    /// Entry for a section that dropped below the threshold.
    pub const fn leaving(section: SectionId, ratio: f32) -> Self {
        Self {
            section,
            is_intersecting: false,
            ratio,
        }
    }
}

/// Entries delivered together in one animation frame, in delivery order.
pub type IntersectionBatch = Vec<IntersectionEntry>;

/// Sending half of the intersection channel, handed to the host by
/// [`ViewportHost::observe`].
#[derive(Debug, Clone)]
pub struct IntersectionSink {
    sender: mpsc::Sender<IntersectionBatch>,
}

impl IntersectionSink {
    /// Create a connected sink/receiver pair.
    pub fn channel() -> (Self, mpsc::Receiver<IntersectionBatch>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }

    /// Deliver a batch. Empty batches are dropped.
    ///
    /// Returns `false` once the observer has disconnected; hosts should stop
    /// observing at that point.
    pub fn deliver(&self, batch: IntersectionBatch) -> bool {
        if batch.is_empty() {
            return true;
        }
        self.sender.send(batch).is_ok()
    }
}

/// The environment that owns the viewport.
pub trait ViewportHost {
    /// Apply host-side settings (scroll duration, easing) before observation
    /// starts.
    ///
    /// Called once by [`Deck::mount`]. Browser hosts animate natively and
    /// ignore this.
    ///
    /// [`Deck::mount`]: crate::deck::Deck::mount
    fn configure(&mut self, _config: &DeckConfig) {}

    /// Scroll so the requested section's leading edge meets the viewport's.
    ///
    /// A new request interrupts any in-flight animation.
    fn scroll_into_view(&mut self, request: ScrollRequest);

    /// Start observing `sections`, delivering crossings of `threshold` to `sink`.
    ///
    /// Like the browser primitive, the first delivery reports every section's
    /// current state.
    fn observe(&mut self, sections: &[SectionId], threshold: f32, sink: IntersectionSink);

    /// Stop all intersection observation.
    fn disconnect(&mut self);

    /// Install (`true`) or remove (`false`) the global key listener.
    fn set_key_capture(&mut self, enabled: bool);

    /// Native handling for an event the deck did not consume.
    fn default_action(&mut self, _event: &Event) {}

    /// Advance host time by one frame.
    ///
    /// Browser hosts animate and observe natively and ignore this.
    fn tick(&mut self, _dt: Duration) {}
}

impl<H: ViewportHost + ?Sized> ViewportHost for &mut H {
    fn configure(&mut self, config: &DeckConfig) {
        (**self).configure(config);
    }

    fn scroll_into_view(&mut self, request: ScrollRequest) {
        (**self).scroll_into_view(request);
    }

    fn observe(&mut self, sections: &[SectionId], threshold: f32, sink: IntersectionSink) {
        (**self).observe(sections, threshold, sink);
    }

    fn disconnect(&mut self) {
        (**self).disconnect();
    }

    fn set_key_capture(&mut self, enabled: bool) {
        (**self).set_key_capture(enabled);
    }

    fn default_action(&mut self, event: &Event) {
        (**self).default_action(event);
    }

    fn tick(&mut self, dt: Duration) {
        (**self).tick(dt);
    }
}
