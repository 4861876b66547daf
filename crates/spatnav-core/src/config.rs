#![forbid(unsafe_code)]

//! Navigator tuning knobs.
//!
//! Defaults reproduce the hand-tuned constants of the selection heuristics.
//! A config can be deserialized from JSON (missing fields keep their
//! defaults) and then overridden through `SPATNAV_*` environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `SPATNAV_RAY_STEP` | [`NavConfig::ray_step`] |
//! | `SPATNAV_MAX_RAY_OVERSCAN` | [`NavConfig::max_ray_overscan`] |
//! | `SPATNAV_ALIGNMENT_TOLERANCE` | [`NavConfig::alignment_tolerance`] |
//! | `SPATNAV_DISTANCE_BAND` | [`NavConfig::distance_band`] |
//! | `SPATNAV_HIGHLIGHT_PADDING` | [`NavConfig::highlight_padding`] |
//! | `SPATNAV_ACTIVATION_DELAY_MS` | [`NavConfig::activation_delay_ms`] |
//! | `SPATNAV_SETTLE_DELAY_MS` | [`NavConfig::settle_delay_ms`] |
//! | `SPATNAV_REENTRANCY` | [`NavConfig::reentrancy`] |
//!
//! Unparsable environment values are logged and ignored.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{ConfigError, Result};

/// What happens when a deferred task is scheduled while another task of
/// the same kind is still pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reentrancy {
    /// The pending task is cancelled; the newest request runs.
    #[default]
    LastWins,
    /// The new request is dropped; the pending task runs.
    FirstWins,
    /// Both run, in due order.
    Unguarded,
}

impl Reentrancy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastWins => "last-wins",
            Self::FirstWins => "first-wins",
            Self::Unguarded => "unguarded",
        }
    }
}

impl std::str::FromStr for Reentrancy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "last-wins" => Ok(Self::LastWins),
            "first-wins" => Ok(Self::FirstWins),
            "unguarded" => Ok(Self::Unguarded),
            _ => Err(ConfigError::UnknownPolicy {
                value: s.to_string(),
            }),
        }
    }
}

/// Configuration for ray search, arbitration, highlight and task delays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Distance between ray samples, in layout units.
    pub ray_step: f32,
    /// Hard bound on how far past the viewport edge a ray may travel.
    pub max_ray_overscan: f32,
    /// Cross-axis offset under which the ray hit always wins.
    pub alignment_tolerance: f32,
    /// Distance gap under which two candidates count as equally far.
    pub distance_band: f32,
    /// Outward padding of the highlight around the active element.
    pub highlight_padding: f32,
    /// Delay between `select()` and the activation it triggers.
    pub activation_delay_ms: u64,
    /// Delay between a scope change and default re-selection.
    pub settle_delay_ms: u64,
    pub reentrancy: Reentrancy,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            ray_step: 5.0,
            max_ray_overscan: 4096.0,
            alignment_tolerance: 3.0,
            distance_band: 50.0,
            highlight_padding: 8.0,
            activation_delay_ms: 150,
            settle_delay_ms: 300,
            reentrancy: Reentrancy::LastWins,
        }
    }
}

impl NavConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SPATNAV_*` overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `SPATNAV_*` overrides read through `lookup`.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
            let raw = raw?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(message = "config.env.ignored", key, value = %raw);
                    None
                }
            }
        }

        if let Some(v) = parsed("SPATNAV_RAY_STEP", lookup("SPATNAV_RAY_STEP")) {
            self.ray_step = v;
        }
        if let Some(v) = parsed("SPATNAV_MAX_RAY_OVERSCAN", lookup("SPATNAV_MAX_RAY_OVERSCAN")) {
            self.max_ray_overscan = v;
        }
        if let Some(v) = parsed(
            "SPATNAV_ALIGNMENT_TOLERANCE",
            lookup("SPATNAV_ALIGNMENT_TOLERANCE"),
        ) {
            self.alignment_tolerance = v;
        }
        if let Some(v) = parsed("SPATNAV_DISTANCE_BAND", lookup("SPATNAV_DISTANCE_BAND")) {
            self.distance_band = v;
        }
        if let Some(v) = parsed(
            "SPATNAV_HIGHLIGHT_PADDING",
            lookup("SPATNAV_HIGHLIGHT_PADDING"),
        ) {
            self.highlight_padding = v;
        }
        if let Some(v) = parsed(
            "SPATNAV_ACTIVATION_DELAY_MS",
            lookup("SPATNAV_ACTIVATION_DELAY_MS"),
        ) {
            self.activation_delay_ms = v;
        }
        if let Some(v) = parsed("SPATNAV_SETTLE_DELAY_MS", lookup("SPATNAV_SETTLE_DELAY_MS")) {
            self.settle_delay_ms = v;
        }
        if let Some(v) = parsed("SPATNAV_REENTRANCY", lookup("SPATNAV_REENTRANCY")) {
            self.reentrancy = v;
        }
        self
    }

    /// Reject values that would make the heuristics meaningless or the ray
    /// walk unbounded.
    pub fn validate(&self) -> Result<()> {
        if !self.ray_step.is_finite() || self.ray_step <= 0.0 {
            return Err(ConfigError::invalid("ray_step", "must be a positive number"));
        }
        if !self.max_ray_overscan.is_finite() || self.max_ray_overscan < 0.0 {
            return Err(ConfigError::invalid(
                "max_ray_overscan",
                "must be a finite, non-negative number",
            ));
        }
        for (field, value) in [
            ("alignment_tolerance", self.alignment_tolerance),
            ("distance_band", self.distance_band),
            ("highlight_padding", self.highlight_padding),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, "must be a finite, non-negative number"));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.activation_delay_ms)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
