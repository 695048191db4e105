// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: input events, scroll geometry, and easing.
//!
//! # Role in the deck engine
//! `deck-core` is the vocabulary layer. It owns the canonical event types
//! that hosts translate their native input into, the one-dimensional
//! geometry used to decide how much of a section sits inside the viewport,
//! and the tween used to animate smooth scrolls.
//!
//! # Primary responsibilities
//! - **Event**: canonical input events (keys, mouse wheel, resize).
//! - **Key names**: parsing of DOM `KeyboardEvent.key` identities.
//! - **Span**: extents along the scroll axis and intersection ratios.
//! - **Animation**: easing functions and [`animation::ScrollTween`].
//!
//! # How it fits in the system
//! `deck-nav` consumes these types to drive the navigation controller, the
//! viewport observer, and the headless viewport. Nothing here holds
//! navigation state.

pub mod animation;
pub mod event;
pub mod geometry;
