#![forbid(unsafe_code)]

//! Deck configuration.
//!
//! All tunables for a mounted deck live in one [`DeckConfig`] that can be
//! built in code, loaded from TOML, or read from `DECK_*` environment
//! variables.
//!
//! ```toml
//! # deck.toml
//! visibility_threshold = 0.3
//! scroll_duration_ms = 450
//! smooth_scroll = true
//! easing = "ease_in_out"
//!
//! [keys]
//! next = ["ArrowRight", "PageDown"]
//! prev = ["ArrowLeft", "PageUp"]
//! ```
//!
//! TOML loading is strict: out-of-range values come back as
//! [`ConfigError::Validation`]. Environment loading is lenient and clamps
//! through [`DeckConfig::validated`].

use std::path::Path;
use std::time::Duration;

use deck_core::animation::Easing;
use deck_core::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::host::ScrollBehavior;

/// Default fraction of a section that must be inside the viewport.
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.3;

/// Smallest accepted visibility threshold.
pub const MIN_VISIBILITY_THRESHOLD: f32 = 0.01;

/// Default smooth-scroll duration in milliseconds.
pub const DEFAULT_SCROLL_DURATION_MS: u64 = 450;

/// Longest accepted smooth-scroll duration in milliseconds.
pub const MAX_SCROLL_DURATION_MS: u64 = 5_000;

/// Top-level deck configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Fraction of a section, in `[0.01, 1]`, that must be visible to count as entered.
    pub visibility_threshold: f32,

    /// Smooth-scroll duration. Zero scrolls instantly.
    ///
    /// Consumed by the host through [`ViewportHost::configure`]; browser hosts
    /// animate natively and ignore it.
    ///
    /// [`ViewportHost::configure`]: crate::host::ViewportHost::configure
    pub scroll_duration_ms: u64,

    /// Request smooth scrolling from the host.
    pub smooth_scroll: bool,

    /// Easing curve for hosts that animate scrolls themselves, passed
    /// through [`ViewportHost::configure`](crate::host::ViewportHost::configure).
    #[serde(with = "easing_serde")]
    pub easing: Easing,

    /// Key names bound to navigation commands.
    pub keys: KeyBindings,
}

/// DOM key names bound to each navigation command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Keys that advance to the next section.
    pub next: Vec<String>,
    /// Keys that go back to the previous section.
    pub prev: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: vec!["ArrowRight".into(), "PageDown".into()],
            prev: vec!["ArrowLeft".into(), "PageUp".into()],
        }
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
            smooth_scroll: true,
            easing: Easing::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl DeckConfig {
    /// Load from a TOML string, rejecting out-of-range values.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load config from environment variables.
    ///
    /// Reads:
    /// - `DECK_VISIBILITY_THRESHOLD`: fraction in [0.01, 1]
    /// - `DECK_SCROLL_MS`: smooth-scroll duration in milliseconds
    /// - `DECK_SMOOTH_SCROLL`: `"0"`/`"false"` to scroll instantly
    /// - `DECK_EASING`: easing curve name
    ///
    /// Unparseable values are ignored and the rest is clamped.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("DECK_VISIBILITY_THRESHOLD")
            && let Ok(threshold) = val.trim().parse::<f32>()
        {
            config.visibility_threshold = threshold;
        }

        if let Some(val) = lookup("DECK_SCROLL_MS")
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.scroll_duration_ms = ms;
        }

        if let Some(val) = lookup("DECK_SMOOTH_SCROLL") {
            let val = val.trim();
            config.smooth_scroll = !(val == "0" || val.eq_ignore_ascii_case("false"));
        }

        if let Some(val) = lookup("DECK_EASING")
            && let Some(easing) = Easing::from_name(val.trim())
        {
            config.easing = easing;
        }

        config.validated()
    }

    /// Clamp values to safe ranges.
    ///
    /// - `visibility_threshold` clamped to `[0.01, 1.0]` (NaN resets to the default)
    /// - `scroll_duration_ms` clamped to `0..=5000`
    ///
    /// ```
    /// use deck_nav::DeckConfig;
    ///
    /// let config = DeckConfig {
    ///     visibility_threshold: 4.0,
    ///     scroll_duration_ms: 60_000,
    ///     ..DeckConfig::default()
    /// }
    /// .validated();
    ///
    /// assert_eq!(config.visibility_threshold, 1.0);
    /// assert_eq!(config.scroll_duration_ms, 5_000);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.visibility_threshold = if self.visibility_threshold.is_nan() {
            DEFAULT_VISIBILITY_THRESHOLD
        } else {
            self.visibility_threshold.clamp(MIN_VISIBILITY_THRESHOLD, 1.0)
        };
        self.scroll_duration_ms = self.scroll_duration_ms.min(MAX_SCROLL_DURATION_MS);
        self
    }

    /// List every out-of-range value. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let threshold = self.visibility_threshold;
        if !(MIN_VISIBILITY_THRESHOLD..=1.0).contains(&threshold) {
            errors.push(format!(
                "visibility_threshold must be in [{MIN_VISIBILITY_THRESHOLD}, 1], got {threshold}"
            ));
        }

        if self.scroll_duration_ms > MAX_SCROLL_DURATION_MS {
            errors.push(format!(
                "scroll_duration_ms must be <= {MAX_SCROLL_DURATION_MS}, got {}",
                self.scroll_duration_ms
            ));
        }

        for (field, names) in [("keys.next", &self.keys.next), ("keys.prev", &self.keys.prev)] {
            for name in names {
                if KeyCode::from_key_name(name).is_none() {
                    errors.push(format!("{field}: unknown key name {name:?}"));
                }
            }
        }

        let prev: Vec<KeyCode> = self
            .keys
            .prev
            .iter()
            .filter_map(|name| KeyCode::from_key_name(name))
            .collect();
        for name in &self.keys.next {
            if KeyCode::from_key_name(name).is_some_and(|code| prev.contains(&code)) {
                errors.push(format!("key {name:?} is bound to both next and prev"));
            }
        }

        errors
    }

    /// Check if every value is within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Smooth-scroll duration.
    #[must_use]
    pub fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_duration_ms)
    }

    /// Behavior attached to every scroll request.
    #[must_use]
    pub fn scroll_behavior(&self) -> ScrollBehavior {
        if self.smooth_scroll && self.scroll_duration_ms > 0 {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Instant
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a deck configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Serde helpers for Easing
// ---------------------------------------------------------------------------

mod easing_serde {
    use deck_core::animation::Easing;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<S: Serializer>(easing: &Easing, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(easing.name())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Easing, D::Error> {
        let name = String::deserialize(d)?;
        Easing::from_name(&name).ok_or_else(|| {
            de::Error::custom(format!(
                "unknown easing {name:?}, expected one of: {}",
                Easing::ALL.map(Easing::name).join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = DeckConfig::default();
        assert_eq!(config.visibility_threshold, 0.3);
        assert_eq!(config.scroll_duration_ms, 450);
        assert!(config.smooth_scroll);
        assert_eq!(config.easing, Easing::EaseInOut);
        assert_eq!(config.keys.next, vec!["ArrowRight", "PageDown"]);
        assert_eq!(config.keys.prev, vec!["ArrowLeft", "PageUp"]);
        assert!(config.is_valid());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(DeckConfig::from_toml_str("").unwrap(), DeckConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = DeckConfig::from_toml_str(
            r#"
            scroll_duration_ms = 0
            easing = "linear"

            [keys]
            next = ["ArrowDown"]
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll_duration_ms, 0);
        assert_eq!(config.easing, Easing::Linear);
        assert_eq!(config.keys.next, vec!["ArrowDown"]);
        assert_eq!(config.keys.prev, vec!["ArrowLeft", "PageUp"]);
        assert_eq!(config.visibility_threshold, 0.3);
    }

    #[test]
    fn toml_rejects_out_of_range_threshold() {
        let err = DeckConfig::from_toml_str("visibility_threshold = 0.0").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("visibility_threshold"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn toml_rejects_unknown_easing() {
        let err = DeckConfig::from_toml_str(r#"easing = "bounce""#).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("bounce"));
    }

    #[test]
    fn toml_rejects_unknown_key_names() {
        let err = DeckConfig::from_toml_str(
            r#"
            [keys]
            next = ["ArrowRight", "Hyper"]
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Hyper"), "{err}");
    }

    #[test]
    fn validate_catches_conflicting_bindings() {
        let mut config = DeckConfig::default();
        config.keys.prev.push("PageDown".into());
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("both"));
    }

    #[test]
    fn validate_catches_conflicts_between_aliases() {
        let config = DeckConfig {
            keys: KeyBindings {
                next: vec!["Esc".into()],
                prev: vec!["Escape".into()],
            },
            ..DeckConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert!(errors[0].contains("\"Esc\""));
    }

    #[test]
    fn toml_threshold_bounds_match_clamping() {
        let err = DeckConfig::from_toml_str("visibility_threshold = 0.005").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err}");

        let config = DeckConfig::from_toml_str("visibility_threshold = 0.01").unwrap();
        assert_eq!(config.clone().validated(), config);

        let clamped = DeckConfig {
            visibility_threshold: 0.005,
            ..DeckConfig::default()
        }
        .validated();
        assert!(clamped.is_valid());
    }

    #[test]
    fn validate_collects_every_problem() {
        let config = DeckConfig {
            visibility_threshold: 1.5,
            scroll_duration_ms: 9_000,
            ..DeckConfig::default()
        };
        assert_eq!(config.validate().len(), 2);
    }

    #[test]
    fn validated_clamps() {
        let config = DeckConfig {
            visibility_threshold: -1.0,
            scroll_duration_ms: u64::MAX,
            ..DeckConfig::default()
        }
        .validated();
        assert_eq!(config.visibility_threshold, MIN_VISIBILITY_THRESHOLD);
        assert_eq!(config.scroll_duration_ms, MAX_SCROLL_DURATION_MS);
        assert!(config.is_valid());
    }

    #[test]
    fn validated_resets_nan_threshold() {
        let config = DeckConfig {
            visibility_threshold: f32::NAN,
            ..DeckConfig::default()
        }
        .validated();
        assert_eq!(config.visibility_threshold, DEFAULT_VISIBILITY_THRESHOLD);
    }

    #[test]
    fn env_overrides() {
        let config = DeckConfig::from_lookup(lookup(&[
            ("DECK_VISIBILITY_THRESHOLD", "0.5"),
            ("DECK_SCROLL_MS", "200"),
            ("DECK_SMOOTH_SCROLL", "false"),
            ("DECK_EASING", "ease_out_cubic"),
        ]));
        assert_eq!(config.visibility_threshold, 0.5);
        assert_eq!(config.scroll_duration_ms, 200);
        assert!(!config.smooth_scroll);
        assert_eq!(config.easing, Easing::EaseOutCubic);
    }

    #[test]
    fn env_ignores_garbage_and_clamps() {
        let config = DeckConfig::from_lookup(lookup(&[
            ("DECK_VISIBILITY_THRESHOLD", "lots"),
            ("DECK_SCROLL_MS", "999999"),
            ("DECK_EASING", "wobble"),
        ]));
        assert_eq!(config.visibility_threshold, 0.3);
        assert_eq!(config.scroll_duration_ms, MAX_SCROLL_DURATION_MS);
        assert_eq!(config.easing, Easing::EaseInOut);
    }

    #[test]
    fn smooth_scroll_env_truthy_values() {
        let config = DeckConfig::from_lookup(lookup(&[("DECK_SMOOTH_SCROLL", "1")]));
        assert!(config.smooth_scroll);
    }

    #[test]
    fn scroll_behavior_follows_flags() {
        assert_eq!(DeckConfig::default().scroll_behavior(), ScrollBehavior::Smooth);
        let instant = DeckConfig {
            scroll_duration_ms: 0,
            ..DeckConfig::default()
        };
        assert_eq!(instant.scroll_behavior(), ScrollBehavior::Instant);
        let off = DeckConfig {
            smooth_scroll: false,
            ..DeckConfig::default()
        };
        assert_eq!(off.scroll_behavior(), ScrollBehavior::Instant);
    }

    #[test]
    fn toml_serialization_uses_easing_names() {
        let text = toml::to_string(&DeckConfig::default()).unwrap();
        assert!(text.contains(r#"easing = "ease_in_out""#), "{text}");
        assert_eq!(DeckConfig::from_toml_str(&text).unwrap(), DeckConfig::default());
    }

    #[test]
    fn file_loading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.toml");
        std::fs::write(&path, "scroll_duration_ms = 120\n").unwrap();
        let config = DeckConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.scroll_duration_ms, 120);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DeckConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
