#![forbid(unsafe_code)]

//! Slide deck navigation engine, public facade.
//!
//! This crate re-exports the stable surface of `deck-core` and `deck-nav`
//! and offers a prelude for mounting a deck against a host.
//!
//! ```
//! use deck::prelude::*;
//! use std::time::Duration;
//!
//! let mut deck = Deck::with_defaults(0..17u64, VirtualViewport::full_page_deck(900, 17));
//! deck.frame(Duration::from_millis(16));
//!
//! let next = Event::Key(KeyEvent::new(KeyCode::PageDown));
//! assert_eq!(deck.handle_event(&next), Propagation::Consumed);
//! assert_eq!(deck.active_index(), 1);
//! ```

// --- Core re-exports -------------------------------------------------------

pub use deck_core::animation::{Animation, Easing, EasingFn, ScrollTween};
pub use deck_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseEvent, MouseEventKind,
};
pub use deck_core::geometry::Span;

// --- Navigation re-exports -------------------------------------------------

pub use deck_nav::{
    ConfigError, Deck, DeckConfig, InputDispatcher, IntersectionBatch, IntersectionEntry,
    IntersectionSink, KeyBindings, KeyMap, NavCommand, NavPhase, NavigationController,
    ObserverReport, Propagation, Registered, ScrollBehavior, ScrollRequest, Section, SectionId,
    SectionRegistry, ViewportHost, ViewportObserver, VirtualViewport,
};

pub mod prelude {
    pub use crate::{
        Deck, DeckConfig, Event, KeyCode, KeyEvent, NavPhase, Propagation, ScrollRequest,
        SectionId, ViewportHost, VirtualViewport,
    };

    pub use crate::{core, nav};
}

pub use deck_core as core;
pub use deck_nav as nav;
