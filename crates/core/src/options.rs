//! Processing options and scene-boundary validation

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Environment mode for the build process.
///
/// Development mode enables the `ultrafast_dev` fast-encode path and is
/// folded into multi-scene cache keys so dev and production artifacts for
/// the same input never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    /// Read the mode from the `VIDPACK_MODE` environment variable.
    ///
    /// Anything other than `development` (including unset) is production.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var("VIDPACK_MODE") {
            Ok(v) if v.eq_ignore_ascii_case("development") => Self::Development,
            _ => Self::Production,
        }
    }

    /// Stable string form used for cache-key derivation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Options for the single-clip pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClipOptions {
    /// Playback speed multiplier; the output is time-scaled by `1/speed`.
    pub speed: f64,
    /// Use the fast/lossy encode profile instead of lossless.
    pub ultrafast: bool,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            ultrafast: false,
        }
    }
}

impl ClipOptions {
    /// Validate option values before any engine invocation.
    pub fn validate(&self) -> Result<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(Error::configuration(format!(
                "speed must be a positive finite number, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}

/// Options for the multi-scene pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneOptions {
    /// Ordered scene boundaries; required, validated before processing.
    pub scenes: Vec<SceneSpec>,
    /// Use the fast/lossy profile, effective only in development mode.
    pub ultrafast_dev: bool,
}

/// A single caller-declared scene boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneSpec {
    /// End time in seconds; may be unset on the last scene only,
    /// meaning "to end of input".
    pub end: Option<f64>,
    /// Playback speed for this scene; defaults to 1.
    pub speed: Option<f64>,
}

/// A validated scene range with its resolved start time.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBounds {
    /// Start time in seconds (0 for the first scene, previous end otherwise).
    pub start: f64,
    /// End time in seconds; `None` means end of input (last scene only).
    pub end: Option<f64>,
    /// Playback speed multiplier for this scene.
    pub speed: f64,
}

/// Validate a scene boundary spec and resolve per-scene start times.
///
/// Enforced before any engine call: the sequence of end times must be
/// strictly increasing and positive, and only the final scene may leave
/// `end` unset. Violations are fatal configuration errors.
pub fn validate_scenes(specs: &[SceneSpec]) -> Result<Vec<SceneBounds>> {
    if specs.is_empty() {
        return Err(Error::scene_boundaries("at least one scene is required"));
    }

    let mut bounds = Vec::with_capacity(specs.len());
    let mut cursor = 0.0_f64;

    for (i, spec) in specs.iter().enumerate() {
        let last = i == specs.len() - 1;
        let speed = spec.speed.unwrap_or(1.0);
        if !(speed.is_finite() && speed > 0.0) {
            return Err(Error::scene_boundaries(format!(
                "scene {i}: speed must be a positive finite number, got {speed}"
            )));
        }

        let end = match spec.end {
            Some(end) => {
                if !(end.is_finite() && end > cursor) {
                    return Err(Error::scene_boundaries(format!(
                        "scene {i}: end {end} must be greater than {cursor}"
                    )));
                }
                Some(end)
            }
            None if last => None,
            None => {
                return Err(Error::scene_boundaries(format!(
                    "scene {i}: only the last scene may omit `end`"
                )));
            }
        };

        bounds.push(SceneBounds {
            start: cursor,
            end,
            speed,
        });
        if let Some(end) = end {
            cursor = end;
        }
    }

    Ok(bounds)
}
