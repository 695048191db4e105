#![forbid(unsafe_code)]

//! Navigation engine for full-viewport slide decks.
//!
//! # Role in the deck engine
//! `deck-nav` keeps one authoritative "current slide" index consistent
//! across three input sources: free scrolling (reported by the host's
//! intersection machinery), discrete commands (next, previous, jump), and
//! keyboard shortcuts.
//!
//! # Primary responsibilities
//! - **SectionRegistry**: ordered, deduplicated section handles.
//! - **ViewportObserver**: drains intersection batches and marks sections entered.
//! - **NavigationController**: owns the active index and issues scroll requests.
//! - **InputDispatcher**: maps key events to navigation commands.
//! - **Deck**: mounts all of the above against a [`ViewportHost`] and tears
//!   it down on every exit path.
//!
//! # How it fits in the system
//! Hosts implement [`ViewportHost`]. A browser binding forwards to
//! `scrollIntoView` and `IntersectionObserver`; [`VirtualViewport`] is a
//! deterministic headless host used by tests and terminal front ends.

pub mod config;
pub mod controller;
pub mod deck;
pub mod host;
pub mod input;
pub mod observer;
pub mod registry;
pub mod viewport;

pub use config::{ConfigError, DeckConfig, KeyBindings};
pub use controller::{NavPhase, NavigationController};
pub use deck::Deck;
pub use host::{
    IntersectionBatch, IntersectionEntry, IntersectionSink, ScrollBehavior, ScrollRequest,
    ViewportHost,
};
pub use input::{InputDispatcher, KeyMap, NavCommand, Propagation};
pub use observer::{ObserverReport, ViewportObserver};
pub use registry::{Registered, Section, SectionId, SectionRegistry};
pub use viewport::{REQUEST_LOG_CAPACITY, VirtualViewport};
