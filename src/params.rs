//! Parameter metadata for the detection engine
//!
//! This module describes every tunable of [`EngineConfig`], enabling:
//! - Grid search optimization
//! - Parameter documentation
//! - Automatic configuration UI generation
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use hspd::prelude::*;
//!
//! // Get parameter metadata for the engine
//! for param in EngineConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//!
//! // Override a single parameter
//! let mut params = HashMap::new();
//! params.insert("min_confidence", 70.0);
//! let config = EngineConfig::with_params(&params).unwrap();
//! assert_eq!(config.min_confidence, 70);
//! ```

use std::collections::HashMap;

use crate::{
  detectors::{DedupeStrategy, WindowGeometry, DEDUPE_DISTANCE, SHOULDER_SIMILARITY},
  EngineConfig, PatternError, Period, Ratio, Result,
};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Ratio value (0.0..=1.0)
  Ratio,
  /// Period value (positive integer)
  Period,
  /// Count value (non-negative integer)
  Count,
}

/// Metadata for a single engine parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "shoulder_similarity")
  pub name: &'static str,
  /// Parameter type
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Ratio parameter
  pub const fn ratio(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Ratio, default, range, description }
  }

  /// Create a new ParamMeta for a Period parameter
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Create a new ParamMeta for a Count parameter
  pub const fn count(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Count, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(PatternError::OutOfRange { field: self.name, value, min, max });
    }
    match self.param_type {
      ParamType::Ratio => Ok(()),
      ParamType::Period => {
        if value < 1.0 || value.fract() != 0.0 {
          return Err(PatternError::InvalidValue("Period must be a positive integer"));
        }
        Ok(())
      },
      ParamType::Count => {
        if value < 0.0 || value.fract() != 0.0 {
          return Err(PatternError::InvalidValue("Count must be a non-negative integer"));
        }
        Ok(())
      },
    }
  }
}

// ============================================================
// PARAMETERIZED DETECTOR TRAIT
// ============================================================

/// Trait for configurations that support parameterization
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Creation of configurations with custom parameter values
/// - Grid search optimization
pub trait ParameterizedDetector: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a configuration with parameters from a HashMap
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;

  /// Returns the pattern ID string
  fn pattern_id_str() -> &'static str;
}

const COMPACT: WindowGeometry = WindowGeometry::compact();

static ENGINE_PARAMS: [ParamMeta; 7] = [
  ParamMeta::ratio(
    "shoulder_similarity",
    SHOULDER_SIMILARITY,
    (0.01, 0.10, 0.01),
    "Max relative shoulder difference for the similarity bonus",
  ),
  ParamMeta::period(
    "dedupe_distance",
    DEDUPE_DISTANCE as f64,
    (1.0, 15.0, 1.0),
    "Centers closer than this collapse into one detection",
  ),
  ParamMeta::count(
    "min_confidence",
    0.0,
    (0.0, 90.0, 10.0),
    "Patterns must score strictly above this",
  ),
  ParamMeta::count(
    "head_half_width",
    COMPACT.head_half_width as f64,
    (1.0, 5.0, 1.0),
    "Head window covers center +/- this many bars",
  ),
  ParamMeta::count(
    "shoulder_gap",
    COMPACT.shoulder_gap as f64,
    (2.0, 10.0, 1.0),
    "Bars from the center to the inner edge of each shoulder window",
  ),
  ParamMeta::count(
    "shoulder_span",
    COMPACT.shoulder_span as f64,
    (1.0, 10.0, 1.0),
    "Index span of each shoulder window",
  ),
  ParamMeta::count(
    "margin",
    COMPACT.margin as f64,
    (0.0, 30.0, 1.0),
    "Bars excluded from the center range at each end of the series",
  ),
];

impl ParameterizedDetector for EngineConfig {
  fn param_meta() -> &'static [ParamMeta] {
    &ENGINE_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    for meta in Self::param_meta() {
      if let Some(&value) = params.get(meta.name) {
        meta.validate(value)?;
      }
    }

    let count = |key: &str, default: usize| params.get(key).map_or(default, |&v| v as usize);

    let config = EngineConfig {
      geometry: WindowGeometry {
        head_half_width: count("head_half_width", COMPACT.head_half_width),
        shoulder_gap: count("shoulder_gap", COMPACT.shoulder_gap),
        shoulder_span: count("shoulder_span", COMPACT.shoulder_span),
        margin: count("margin", COMPACT.margin),
      },
      shoulder_similarity: get_ratio(params, "shoulder_similarity", SHOULDER_SIMILARITY)?,
      dedupe_distance: get_period(params, "dedupe_distance", DEDUPE_DISTANCE)?,
      dedupe_strategy: DedupeStrategy::default(),
      min_confidence: count("min_confidence", 0) as u8,
      ..EngineConfig::default()
    };
    config.validate()?;
    Ok(config)
  }

  fn pattern_id_str() -> &'static str {
    "HEAD_AND_SHOULDERS"
  }
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a Ratio from params with default fallback
pub fn get_ratio(params: &HashMap<&str, f64>, key: &str, default: f64) -> Result<Ratio> {
  let value = params.get(key).copied().unwrap_or(default);
  Ratio::new(value)
}

/// Helper to get a Period from params with default fallback
pub fn get_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Period> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  Period::new(value as usize)
}

// ============================================================
// TESTS
// ============================================================
