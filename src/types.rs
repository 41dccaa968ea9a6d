// Strong typing over raw numbers. Newtypes for timestamps, points, and config sections.
// Every config field carries a serde default so JS can pass a partial object.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Timestamp in microseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    /// Convert a host clock reading (`performance.now()`, milliseconds) to a timestamp.
    /// Negative and non-finite readings collapse to zero.
    pub fn from_millis_f64(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            Timestamp((ms * 1000.0).round() as u64)
        } else {
            Timestamp(0)
        }
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn saturating_add_micros(&self, us: u64) -> Self {
        Timestamp(self.0.saturating_add(us))
    }

    /// Microseconds elapsed since `earlier` (zero if `earlier` is in the future).
    pub fn micros_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// A 2D coordinate shared by targets and pointer samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Visual states the core toggles on target elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Highlight {
    /// Live best candidate while the pointer is moving.
    OnTarget,
    /// The affordance is currently offered for this target.
    Bubbled,
    /// The pointer is hovering the affordance offered for this target.
    BubbledHover,
}

impl Highlight {
    pub const ALL: [Highlight; 3] = [
        Highlight::OnTarget,
        Highlight::Bubbled,
        Highlight::BubbledHover,
    ];

    /// Class-style name handed to the UI glue.
    pub fn name(&self) -> &'static str {
        match self {
            Highlight::OnTarget => "on-target",
            Highlight::Bubbled => "intent-bubbled",
            Highlight::BubbledHover => "intent-bubbled-hover",
        }
    }
}

/// Which samples of the window span the motion vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MotionAnchor {
    /// First and last sample of the whole window.
    #[default]
    Window,
    /// The two most recent samples only.
    RecentPair,
}

/// Engine configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub sampler: SamplerSettings,
    #[serde(default)]
    pub predictor: PredictorSettings,
    #[serde(default)]
    pub affordance: AffordanceSettings,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        self.sampler.validate()?;
        self.predictor.validate()?;
        self.affordance.validate()
    }
}

/// Motion sampler timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerSettings {
    /// Minimum spacing between accepted raw move events (microseconds).
    #[serde(default = "default_sample_interval")]
    pub sample_interval_us: u64,
    /// Report cadence for sample batches (microseconds).
    #[serde(default = "default_report_interval")]
    pub report_interval_us: u64,
    /// Distance under which two samples count as the same position.
    /// 0.0 means exact coordinate equality.
    #[serde(default)]
    pub stop_tolerance: f64,
}

fn default_sample_interval() -> u64 {
    10_000 // 10ms
}

fn default_report_interval() -> u64 {
    100_000 // 100ms
}

impl Default for SamplerSettings {
    fn default() -> Self {
        SamplerSettings {
            sample_interval_us: default_sample_interval(),
            report_interval_us: default_report_interval(),
            stop_tolerance: 0.0,
        }
    }
}

impl SamplerSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sample_interval_us == 0 {
            return Err(EngineError::InvalidConfig(
                "sample_interval_us must be positive".to_string(),
            ));
        }
        if self.report_interval_us == 0 {
            return Err(EngineError::InvalidConfig(
                "report_interval_us must be positive".to_string(),
            ));
        }
        if !self.stop_tolerance.is_finite() || self.stop_tolerance < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "stop_tolerance must be a non-negative number, got {}",
                self.stop_tolerance
            )));
        }
        Ok(())
    }
}

/// Candidate predictor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorSettings {
    /// Upper bound (exclusive, degrees) on the alignment angle for a candidate.
    #[serde(default = "default_max_alignment")]
    pub max_alignment_deg: f64,
    #[serde(default)]
    pub anchor: MotionAnchor,
}

fn default_max_alignment() -> f64 {
    5.0
}

impl Default for PredictorSettings {
    fn default() -> Self {
        PredictorSettings {
            max_alignment_deg: default_max_alignment(),
            anchor: MotionAnchor::Window,
        }
    }
}

impl PredictorSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        let deg = self.max_alignment_deg;
        if !(deg > 0.0 && deg <= 180.0) {
            return Err(EngineError::InvalidConfig(format!(
                "max_alignment_deg must be in (0, 180], got {}",
                deg
            )));
        }
        Ok(())
    }
}

/// Affordance placement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordanceSettings {
    /// Distance from the pointer, toward the target, at which the affordance pops.
    #[serde(default = "default_pop_distance")]
    pub pop_distance: f64,
}

fn default_pop_distance() -> f64 {
    50.0
}

impl Default for AffordanceSettings {
    fn default() -> Self {
        AffordanceSettings {
            pop_distance: default_pop_distance(),
        }
    }
}

impl AffordanceSettings {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.pop_distance.is_finite() || self.pop_distance < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "pop_distance must be a non-negative number, got {}",
                self.pop_distance
            )));
        }
        Ok(())
    }
}
