#![forbid(unsafe_code)]

//! Scroll animation primitives.
//!
//! Smooth scrolls are driven by a [`ScrollTween`] that interpolates the
//! viewport offset over a fixed duration. Tweens are host-driven: nothing
//! here reads a clock, the host calls [`Animation::tick`] once per frame.

use std::time::Duration;

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Constant velocity.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic, slow start.
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic, slow end.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic, slow start and end. Closest to a browser's `behavior: "smooth"`.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic, slow start.
#[inline]
pub fn ease_in_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic, slow end.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Named easing curves, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    EaseInCubic,
    EaseOutCubic,
}

impl Easing {
    /// Every curve, in declaration order.
    pub const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
    ];

    /// The snake_case name used in config files and environment variables.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease_in",
            Self::EaseOut => "ease_out",
            Self::EaseInOut => "ease_in_out",
            Self::EaseInCubic => "ease_in_cubic",
            Self::EaseOutCubic => "ease_out_cubic",
        }
    }

    /// Look up a curve by its snake_case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// The function implementing this curve.
    #[must_use]
    pub const fn function(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
            Self::EaseInCubic => ease_in_cubic,
            Self::EaseOutCubic => ease_out_cubic,
        }
    }
}

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current eased progress, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Restart from the beginning.
    fn reset(&mut self);
}

/// Interpolates a scroll offset from `from` to `to`.
///
/// A zero duration completes on construction, which is how instant scrolls
/// are expressed.
#[derive(Debug, Clone, Copy)]
pub struct ScrollTween {
    from: u32,
    to: u32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl ScrollTween {
    /// Create a tween over `duration` using [`ease_in_out`].
    pub fn new(from: u32, to: u32, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
            easing: ease_in_out,
        }
    }

    /// Set the easing function (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Starting offset.
    pub const fn from(&self) -> u32 {
        self.from
    }

    /// Target offset.
    pub const fn target(&self) -> u32 {
        self.to
    }

    /// Linear progress before easing.
    fn raw_progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Current interpolated offset. Equals [`target`](Self::target) once complete.
    pub fn position(&self) -> u32 {
        if self.is_complete() {
            return self.to;
        }
        let from = f64::from(self.from);
        let delta = f64::from(self.to) - from;
        let pos = from + delta * f64::from(self.value());
        pos.round().clamp(0.0, f64::from(u32::MAX)) as u32
    }
}

impl Animation for ScrollTween {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
