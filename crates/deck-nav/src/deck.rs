#![forbid(unsafe_code)]

//! A mounted deck session.
//!
//! [`Deck::mount`] builds the registry, connects the observer, and installs
//! the key listener against a [`ViewportHost`]. Dropping the deck (or calling
//! [`Deck::unmount`]) disconnects the observer and removes the key listener
//! exactly once, including when the owning scope unwinds.
//!
//! # Example
//!
//! ```
//! use deck_core::event::{Event, KeyCode, KeyEvent};
//! use deck_nav::{Deck, DeckConfig, VirtualViewport};
//! use std::time::Duration;
//!
//! let host = VirtualViewport::full_page_deck(800, 5);
//! let mut deck = Deck::mount(0..5u64, host, DeckConfig::default());
//!
//! deck.handle_event(&Event::Key(KeyEvent::new(KeyCode::Right)));
//! assert_eq!(deck.active_index(), 1);
//!
//! for _ in 0..40 {
//!     deck.frame(Duration::from_millis(16));
//! }
//! assert!(deck.is_entered(1));
//! ```

use std::time::Duration;

use crate::config::DeckConfig;
use crate::controller::{NavPhase, NavigationController};
use crate::host::ViewportHost;
use crate::input::{InputDispatcher, KeyMap, Propagation};
use crate::observer::{ObserverReport, ViewportObserver};
use crate::registry::{SectionId, SectionRegistry};
use deck_core::event::Event;

/// A deck mounted on a host.
#[derive(Debug)]
pub struct Deck<H: ViewportHost> {
    controller: NavigationController,
    observer: ViewportObserver,
    input: InputDispatcher,
    host: H,
    config: DeckConfig,
    span: tracing::Span,
    mounted: bool,
}

impl<H: ViewportHost> Deck<H> {
    /// Mount a deck over `handles` (duplicates are dropped, order kept).
    ///
    /// Out-of-range config values are clamped. The host receives the clamped
    /// config through [`ViewportHost::configure`] before observation starts.
    pub fn mount<I>(handles: I, mut host: H, config: DeckConfig) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SectionId>,
    {
        let config = config.validated();
        let registry = SectionRegistry::from_handles(handles);
        let span = tracing::info_span!("deck.mount", sections = registry.count());
        let guard = span.enter();

        host.configure(&config);
        let controller = NavigationController::new(registry).with_behavior(config.scroll_behavior());
        let observer = ViewportObserver::connect(&mut host, &controller, config.visibility_threshold);
        let input = InputDispatcher::install(&mut host, KeyMap::from_bindings(&config.keys));
        tracing::info!(
            sections = controller.count(),
            threshold = config.visibility_threshold,
            "deck mounted"
        );

        drop(guard);
        Self {
            controller,
            observer,
            input,
            host,
            config,
            span,
            mounted: true,
        }
    }

    /// Mount with [`DeckConfig::default`].
    pub fn with_defaults<I>(handles: I, host: H) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SectionId>,
    {
        Self::mount(handles, host, DeckConfig::default())
    }

    /// Route one input event.
    ///
    /// Bound navigation keys are consumed. Everything else goes to the host's
    /// default action.
    pub fn handle_event(&mut self, event: &Event) -> Propagation {
        let propagation = self
            .input
            .dispatch(event, &mut self.controller, &mut self.host);
        if propagation == Propagation::Continue {
            self.host.default_action(event);
        }
        propagation
    }

    /// Advance one section.
    pub fn go_next(&mut self) {
        self.controller.go_next(&mut self.host);
    }

    /// Go back one section, re-snapping at the first.
    pub fn go_prev(&mut self) {
        self.controller.go_prev(&mut self.host);
    }

    /// Jump to `index`. Ignored if it does not exist.
    pub fn scroll_to(&mut self, index: usize) {
        self.controller.scroll_to(index, &mut self.host);
    }

    /// Advance the host by one frame and apply whatever it reported.
    pub fn frame(&mut self, dt: Duration) -> ObserverReport {
        self.host.tick(dt);
        self.pump()
    }

    /// Apply pending intersection batches without advancing the host.
    pub fn pump(&mut self) -> ObserverReport {
        let report = self.observer.pump(&mut self.controller);
        if !report.newly_entered.is_empty() {
            tracing::debug!(entered = ?report.newly_entered, "sections entered");
        }
        report
    }

    pub fn active_index(&self) -> usize {
        self.controller.active_index()
    }

    pub fn count(&self) -> usize {
        self.controller.count()
    }

    pub fn phase(&self) -> NavPhase {
        self.controller.phase()
    }

    /// Whether the section at `index` has entered. `false` for unknown indices.
    pub fn is_entered(&self, index: usize) -> bool {
        self.sections().get(index).is_some_and(|s| s.is_entered())
    }

    pub fn sections(&self) -> &SectionRegistry {
        self.controller.registry()
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tear the session down now instead of at drop.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if !std::mem::take(&mut self.mounted) {
            return;
        }
        let _guard = self.span.enter();
        self.observer.disconnect(&mut self.host);
        self.input.remove(&mut self.host);
        tracing::info!(
            active = self.controller.active_index(),
            panicking = std::thread::panicking(),
            "deck unmounted"
        );
    }
}

impl<H: ViewportHost> Drop for Deck<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ScrollBehavior;
    use crate::viewport::VirtualViewport;
    use deck_core::animation::Easing;
    use deck_core::event::{KeyCode, KeyEvent};

    const FRAME: Duration = Duration::from_millis(16);

    fn right() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Right))
    }

    #[test]
    fn mount_wires_everything() {
        let deck = Deck::with_defaults(0..3u64, VirtualViewport::full_page_deck(100, 3));
        assert!(deck.is_mounted());
        assert!(deck.host().is_observing());
        assert!(deck.host().key_capture_enabled());
        assert_eq!(deck.count(), 3);
        assert_eq!(deck.active_index(), 0);
    }

    #[test]
    fn mount_dedupes_handles() {
        let deck = Deck::with_defaults([4u64, 4, 5], VirtualViewport::new(100));
        assert_eq!(deck.count(), 2);
    }

    #[test]
    fn unmount_releases_host() {
        let mut host = VirtualViewport::full_page_deck(100, 3);
        let deck = Deck::with_defaults(0..3u64, &mut host);
        deck.unmount();
        assert!(!host.is_observing());
        assert!(!host.key_capture_enabled());
    }

    #[test]
    fn first_frame_enters_first_section() {
        let mut deck = Deck::with_defaults(0..3u64, VirtualViewport::full_page_deck(100, 3));
        let report = deck.frame(FRAME);
        assert_eq!(report.newly_entered, vec![0]);
        assert!(deck.is_entered(0));
        assert!(!deck.is_entered(1));
    }

    #[test]
    fn key_navigation_settles_after_animation() {
        let mut deck = Deck::with_defaults(0..3u64, VirtualViewport::full_page_deck(100, 3));
        assert_eq!(deck.handle_event(&right()), Propagation::Consumed);
        assert_eq!(deck.phase(), NavPhase::Scrolling { target: 1 });
        for _ in 0..40 {
            deck.frame(FRAME);
        }
        assert_eq!(deck.active_index(), 1);
        assert_eq!(deck.phase(), NavPhase::Idle);
        assert_eq!(deck.host().offset(), 100);
    }

    #[test]
    fn unbound_keys_reach_host() {
        let mut deck = Deck::with_defaults(
            0..3u64,
            VirtualViewport::full_page_deck(100, 3).with_line_step(25),
        );
        let down = Event::Key(KeyEvent::new(KeyCode::Down));
        assert_eq!(deck.handle_event(&down), Propagation::Continue);
        assert_eq!(deck.host().offset(), 25);
    }

    #[test]
    fn config_controls_scroll_behavior() {
        let config = DeckConfig {
            smooth_scroll: false,
            ..DeckConfig::default()
        };
        let mut deck = Deck::mount(0..3u64, VirtualViewport::full_page_deck(100, 3), config);
        deck.go_next();
        assert_eq!(deck.host().requests()[0].behavior, ScrollBehavior::Instant);
        assert_eq!(deck.host().offset(), 100);
    }

    #[test]
    fn mount_configures_host_animation() {
        let config = DeckConfig {
            scroll_duration_ms: 32,
            easing: Easing::Linear,
            ..DeckConfig::default()
        };
        let mut deck = Deck::mount(0..3u64, VirtualViewport::full_page_deck(100, 3), config);
        assert_eq!(deck.host().scroll_duration(), Duration::from_millis(32));
        deck.go_next();
        deck.frame(FRAME);
        assert_eq!(deck.host().offset(), 50, "linear, halfway after one frame");
        deck.frame(FRAME);
        assert_eq!(deck.host().offset(), 100);
        assert!(!deck.host().is_animating());
    }

    #[test]
    fn mount_clamps_config() {
        let config = DeckConfig {
            visibility_threshold: 3.0,
            ..DeckConfig::default()
        };
        let deck = Deck::mount(0..1u64, VirtualViewport::new(10), config);
        assert_eq!(deck.config().visibility_threshold, 1.0);
    }
}
