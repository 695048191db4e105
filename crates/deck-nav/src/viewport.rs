#![forbid(unsafe_code)]

//! Deterministic headless viewport.
//!
//! [`VirtualViewport`] is a host-driven [`ViewportHost`]:
//! - **Host-driven time**: nothing moves until [`ViewportHost::tick`] is called.
//! - **Stacked layout**: sections are laid out top to bottom in push order.
//! - **No threads**: intersection batches are computed at the end of each
//!   frame and pushed into the sink synchronously.
//!
//! Units are whatever the embedding uses (pixels, terminal rows). Offsets
//! are clamped to `[0, content_len - height]`.

use std::time::Duration;

use deck_core::animation::{Animation, EasingFn, ScrollTween, ease_in_out};
use deck_core::event::{Event, KeyCode, MouseEventKind};
use deck_core::geometry::Span;

use crate::config::DeckConfig;
use crate::host::{
    IntersectionBatch, IntersectionEntry, IntersectionSink, ScrollBehavior, ScrollRequest,
    ViewportHost,
};
use crate::registry::SectionId;

const DEFAULT_LINE_STEP: u32 = 40;
const WHEEL_LINES: u32 = 3;

/// Scroll requests kept by [`VirtualViewport::requests`]; older ones are dropped.
pub const REQUEST_LOG_CAPACITY: usize = 256;

#[derive(Debug)]
struct Observation {
    threshold: f32,
    sink: IntersectionSink,
    /// Observed sections with their last reported state, `None` until the first pass.
    targets: Vec<(SectionId, Option<bool>)>,
}

/// A simulated scroll container.
#[derive(Debug)]
pub struct VirtualViewport {
    height: u32,
    layout: Vec<(SectionId, Span)>,
    offset: u32,
    tween: Option<ScrollTween>,
    scroll_duration: Duration,
    easing: EasingFn,
    line_step: u32,
    observation: Option<Observation>,
    key_capture: bool,
    requests: Vec<ScrollRequest>,
    elapsed: Duration,
}

impl VirtualViewport {
    /// Create an empty viewport `height` units tall.
    pub fn new(height: u32) -> Self {
        Self {
            height,
            layout: Vec::new(),
            offset: 0,
            tween: None,
            scroll_duration: Duration::from_millis(crate::config::DEFAULT_SCROLL_DURATION_MS),
            easing: ease_in_out,
            line_step: DEFAULT_LINE_STEP,
            observation: None,
            key_capture: false,
            requests: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Create a viewport that animates with the configured duration and easing.
    pub fn with_config(height: u32, config: &DeckConfig) -> Self {
        let mut viewport = Self::new(height);
        viewport.configure(config);
        viewport
    }

    /// Set smooth-scroll duration and easing (builder).
    #[must_use]
    pub fn with_scroll_animation(mut self, duration: Duration, easing: EasingFn) -> Self {
        self.scroll_duration = duration;
        self.easing = easing;
        self
    }

    /// Set the distance of one arrow-key scroll (builder).
    #[must_use]
    pub fn with_line_step(mut self, step: u32) -> Self {
        self.line_step = step;
        self
    }

    /// Create a viewport holding `count` sections, each exactly one viewport tall.
    pub fn full_page_deck(height: u32, count: u64) -> Self {
        let mut viewport = Self::new(height);
        for id in 0..count {
            viewport.push_section(SectionId::new(id), height);
        }
        viewport
    }

    /// Append a section below the existing ones.
    pub fn push_section(&mut self, id: SectionId, extent: u32) {
        if self.span_of(id).is_some() {
            tracing::trace!(section = id.get(), "section already laid out");
            return;
        }
        let start = self.content_len();
        self.layout.push((id, Span::new(start, extent)));
    }

    /// Layout of a section in document coordinates.
    pub fn span_of(&self, id: SectionId) -> Option<Span> {
        self.layout
            .iter()
            .find_map(|&(sid, span)| (sid == id).then_some(span))
    }

    /// Total content length.
    pub fn content_len(&self) -> u32 {
        self.layout.last().map_or(0, |(_, span)| span.end())
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current scroll offset (top edge of the viewport).
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Largest reachable offset.
    pub fn max_offset(&self) -> u32 {
        self.content_len().saturating_sub(self.height)
    }

    /// The visible extent.
    pub fn visible_span(&self) -> Span {
        Span::new(self.offset, self.height)
    }

    /// Visible fraction of a laid-out section.
    pub fn visible_ratio(&self, id: SectionId) -> Option<f32> {
        let viewport = self.visible_span();
        self.span_of(id).map(|span| span.visible_ratio(&viewport))
    }

    /// Smooth-scroll duration.
    pub fn scroll_duration(&self) -> Duration {
        self.scroll_duration
    }

    /// Whether a smooth scroll is in flight.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// The most recent scroll requests, oldest first, up to
    /// [`REQUEST_LOG_CAPACITY`].
    pub fn requests(&self) -> &[ScrollRequest] {
        &self.requests
    }

    /// Take the request log, leaving it empty.
    pub fn take_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn key_capture_enabled(&self) -> bool {
        self.key_capture
    }

    pub fn is_observing(&self) -> bool {
        self.observation.is_some()
    }

    /// Total time advanced through [`ViewportHost::tick`].
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Scroll by `delta` as a user would, cancelling any animation.
    pub fn scroll_by(&mut self, delta: i64) {
        let target = (i64::from(self.offset) + delta).clamp(0, i64::from(self.max_offset()));
        self.scroll_to_offset(u32::try_from(target).unwrap_or(0));
    }

    /// Jump to `offset`, cancelling any animation.
    pub fn scroll_to_offset(&mut self, offset: u32) {
        self.tween = None;
        self.offset = offset.min(self.max_offset());
    }

    /// Resize the viewport. The offset is re-clamped.
    pub fn set_height(&mut self, height: u32) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    fn advance_animation(&mut self, dt: Duration) {
        let Some(tween) = self.tween.as_mut() else {
            return;
        };
        tween.tick(dt);
        let position = tween.position();
        if tween.is_complete() {
            self.tween = None;
        }
        self.offset = position.min(self.max_offset());
    }

    /// Compute and deliver crossings for the current offset.
    fn intersection_pass(&mut self) {
        let viewport = self.visible_span();
        let Some(observation) = self.observation.as_mut() else {
            return;
        };
        let mut batch = IntersectionBatch::new();
        // Document order.
        for &(id, span) in &self.layout {
            let Some((_, last)) = observation.targets.iter_mut().find(|(sid, _)| *sid == id) else {
                continue;
            };
            let ratio = span.visible_ratio(&viewport);
            let visible = ratio >= observation.threshold;
            if *last != Some(visible) {
                *last = Some(visible);
                batch.push(IntersectionEntry {
                    section: id,
                    is_intersecting: visible,
                    ratio,
                });
            }
        }
        if !observation.sink.deliver(batch) {
            tracing::trace!("observer gone; dropping observation");
            self.observation = None;
        }
    }

    fn page_step(&self) -> i64 {
        i64::from(self.height)
    }

    fn log_request(&mut self, request: ScrollRequest) {
        if self.requests.len() >= REQUEST_LOG_CAPACITY {
            let excess = self.requests.len() + 1 - REQUEST_LOG_CAPACITY;
            self.requests.drain(..excess);
        }
        self.requests.push(request);
    }
}

impl ViewportHost for VirtualViewport {
    fn configure(&mut self, config: &DeckConfig) {
        self.scroll_duration = config.scroll_duration();
        self.easing = config.easing.function();
    }

    fn scroll_into_view(&mut self, request: ScrollRequest) {
        self.log_request(request);
        let Some(span) = self.span_of(request.section) else {
            tracing::trace!(section = request.section.get(), "scroll request for unknown section");
            return;
        };
        let target = span.start.min(self.max_offset());
        let smooth = request.behavior == ScrollBehavior::Smooth && !self.scroll_duration.is_zero();
        if smooth && target != self.offset {
            // Restart from wherever the previous animation left off.
            self.tween =
                Some(ScrollTween::new(self.offset, target, self.scroll_duration).easing(self.easing));
        } else {
            self.tween = None;
            self.offset = target;
        }
    }

    fn observe(&mut self, sections: &[SectionId], threshold: f32, sink: IntersectionSink) {
        self.observation = Some(Observation {
            threshold,
            sink,
            targets: sections.iter().map(|&id| (id, None)).collect(),
        });
        // The first report lands at the end of the next frame, as in a browser.
    }

    fn disconnect(&mut self) {
        self.observation = None;
    }

    fn set_key_capture(&mut self, enabled: bool) {
        self.key_capture = enabled;
    }

    fn default_action(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.is_down() => match key.code {
                KeyCode::Down => self.scroll_by(i64::from(self.line_step)),
                KeyCode::Up => self.scroll_by(-i64::from(self.line_step)),
                KeyCode::PageDown => self.scroll_by(self.page_step()),
                KeyCode::PageUp => self.scroll_by(-self.page_step()),
                KeyCode::Char(' ') if key.shift() => self.scroll_by(-self.page_step()),
                KeyCode::Char(' ') => self.scroll_by(self.page_step()),
                KeyCode::Home => self.scroll_to_offset(0),
                KeyCode::End => self.scroll_to_offset(self.max_offset()),
                _ => {}
            },
            Event::Key(_) => {}
            Event::Mouse(mouse) => {
                let wheel = i64::from(self.line_step.saturating_mul(WHEEL_LINES));
                match mouse.kind {
                    MouseEventKind::ScrollDown => self.scroll_by(wheel),
                    MouseEventKind::ScrollUp => self.scroll_by(-wheel),
                    MouseEventKind::Moved => {}
                }
            }
            Event::Resize { height, .. } => self.set_height(u32::from(*height)),
        }
    }

    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.advance_animation(dt);
        self.intersection_pass();
    }
}
