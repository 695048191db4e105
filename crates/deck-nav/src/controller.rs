#![forbid(unsafe_code)]

//! Authoritative active-section state and navigation commands.
//!
//! # State machine
//!
//! ```text
//!            scroll_to(i)         i reported or already visible
//!   Idle ───────────────────▶ Scrolling(i) ───────────────▶ Idle
//!                               │    ▲
//!                               └────┘ scroll_to(j) / report k ≠ i
//! ```
//!
//! A target that is already on screen never produces a crossing, so the
//! observer also settles the phase whenever the target's last reported state
//! is visible.
//!
//! Two writers update the active index. Commands write optimistically at
//! request time; the observer writes later, when the host reports what is
//! actually on screen. Whichever write happens last wins. Nothing sequences
//! them, so an observer report for an intermediate section can briefly pull
//! the index away from a command's target while a smooth scroll passes over
//! it.

use crate::host::{ScrollBehavior, ScrollRequest, ViewportHost};
use crate::registry::{Section, SectionRegistry};

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavPhase {
    /// No command-initiated scroll is outstanding.
    #[default]
    Idle,
    /// A scroll toward `target` was requested and not yet observed.
    Scrolling {
        /// Registry position the last command asked for.
        target: usize,
    },
}

/// Owns the registry and the active index.
#[derive(Debug, Clone)]
pub struct NavigationController {
    registry: SectionRegistry,
    active_index: usize,
    phase: NavPhase,
    behavior: ScrollBehavior,
}

impl NavigationController {
    /// Create a controller at index 0 in the idle phase.
    pub fn new(registry: SectionRegistry) -> Self {
        Self {
            registry,
            active_index: 0,
            phase: NavPhase::Idle,
            behavior: ScrollBehavior::Smooth,
        }
    }

    /// Set the behavior attached to every scroll request (builder).
    #[must_use]
    pub fn with_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut SectionRegistry {
        &mut self.registry
    }

    pub fn count(&self) -> usize {
        self.registry.count()
    }

    /// Current slide. Always `< count()` when sections exist, `0` otherwise.
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The section at the active index, if any.
    pub fn active_section(&self) -> Option<&Section> {
        self.registry.get(self.active_index)
    }

    pub fn phase(&self) -> NavPhase {
        self.phase
    }

    pub fn behavior(&self) -> ScrollBehavior {
        self.behavior
    }

    /// Jump to `index`.
    ///
    /// Ignored when the index does not exist. Otherwise the active index is
    /// updated immediately and a scroll request is issued, even if `index`
    /// is already active.
    pub fn scroll_to<H: ViewportHost + ?Sized>(&mut self, index: usize, host: &mut H) {
        let Some(section) = self.registry.get(index) else {
            tracing::trace!(index, count = self.count(), "scroll_to ignored: no such section");
            return;
        };
        let request = ScrollRequest {
            section: section.id(),
            index,
            behavior: self.behavior,
        };
        tracing::debug!(from = self.active_index, to = index, "scroll_to");
        self.active_index = index;
        self.phase = NavPhase::Scrolling { target: index };
        host.scroll_into_view(request);
    }

    /// Advance one section. No-op at the last section.
    pub fn go_next<H: ViewportHost + ?Sized>(&mut self, host: &mut H) {
        let Some(last) = self.count().checked_sub(1) else {
            tracing::trace!("go_next ignored: no sections");
            return;
        };
        let target = (self.active_index + 1).min(last);
        if target == self.active_index {
            tracing::trace!(index = target, "go_next at last section");
            return;
        }
        self.scroll_to(target, host);
    }

    /// Go back one section. At the first section, re-snaps to it.
    pub fn go_prev<H: ViewportHost + ?Sized>(&mut self, host: &mut H) {
        match self.active_index.checked_sub(1) {
            Some(target) => self.scroll_to(target, host),
            None => self.scroll_to(0, host),
        }
    }

    /// Apply an observer report that section `index` is on screen.
    pub(crate) fn observe_visible(&mut self, index: usize) {
        if index >= self.count() {
            return;
        }
        match self.phase {
            NavPhase::Scrolling { target } if target == index => {
                self.phase = NavPhase::Idle;
            }
            NavPhase::Scrolling { target } => {
                tracing::debug!(target, observed = index, "observer overrides pending scroll");
            }
            NavPhase::Idle => {}
        }
        self.active_index = index;
    }

    /// Return to idle if the pending target is currently visible.
    pub(crate) fn settle(&mut self) {
        if let NavPhase::Scrolling { target } = self.phase
            && self.registry.get(target).is_some_and(Section::is_visible)
        {
            tracing::debug!(target, "pending scroll settled on visible target");
            self.phase = NavPhase::Idle;
        }
    }
}
