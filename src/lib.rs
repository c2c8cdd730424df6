//! # HSPD - Head & Shoulders Pattern Detector
//!
//! Sliding-window detection of the Head & Shoulders chart pattern over OHLCV series.
//!
//! ## Quick Start
//!
//! ```rust
//! use hspd::prelude::*;
//!
//! // Define your OHLCV data
//! struct Bar { o: f64, h: f64, l: f64, c: f64, v: f64 }
//!
//! impl OHLCV for Bar {
//!     fn open(&self) -> f64 { self.o }
//!     fn high(&self) -> f64 { self.h }
//!     fn low(&self) -> f64 { self.l }
//!     fn close(&self) -> f64 { self.c }
//!     fn volume(&self) -> Option<f64> { Some(self.v) }
//! }
//!
//! // Create engine with the reference configuration
//! let engine = EngineBuilder::new().build().unwrap();
//!
//! // Scan your data
//! let bars: Vec<Bar> = vec![];
//! let patterns = engine.detect(&bars);
//! assert!(patterns.is_empty());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod detectors;
pub mod params;

pub mod prelude {
    pub use crate::{
        // Stages
        detectors::*,
        // Parameters
        params::{get_period, get_ratio, ParamMeta, ParamType, ParameterizedDetector},
        // Parallel
        scan_parallel,
        // Reports
        AnalysisReport,
        // Types
        Direction,
        // Engine
        EngineBuilder,
        EngineConfig,
        // Core traits
        OHLCVExt,
        Pattern,
        PatternEngine,
        // Errors
        PatternError,
        PatternKind,
        Period,
        PricePoint,
        Ratio,
        Result,
        ScanError,
        ScanResult,
        SeriesSummary,
        Signal,
        Strength,
        OHLCV,
    };
}

// ============================================================
// ERRORS
// ============================================================

pub type Result<T> = std::result::Result<T, PatternError>;

/// Errors from configuration and opt-in data validation.
///
/// Detection itself never fails: no match is an empty result.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    #[error("{field} = {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid OHLCV at index {index}: {reason}")]
    InvalidOHLCV { index: usize, reason: &'static str },
}

// ============================================================
// VALIDATED TYPES
// ============================================================

/// Normalized value in range 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Ratio(f64);

impl Ratio {
    /// Create a new Ratio, validating the value is in [0.0, 1.0]
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || value.is_infinite() {
            return Err(PatternError::InvalidValue(
                "Ratio cannot be NaN or infinite",
            ));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(PatternError::OutOfRange {
                field: "Ratio",
                value,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self(value))
    }

    /// Create a Ratio from a compile-time constant (library internal use)
    #[doc(hidden)]
    pub const fn new_const(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Ratio {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Ratio {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = f64::deserialize(d)?;
        Ratio::new(value).map_err(serde::de::Error::custom)
    }
}

/// Period (must be > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period(usize);

impl Period {
    /// Create a new Period, validating value is > 0
    pub fn new(value: usize) -> Result<Self> {
        if value == 0 {
            return Err(PatternError::InvalidValue("Period must be > 0"));
        }
        Ok(Self(value))
    }

    #[doc(hidden)]
    pub const fn new_const(value: usize) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }
}

impl serde::Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(s)
    }
}

impl<'de> serde::Deserialize<'de> for Period {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let value = usize::deserialize(d)?;
        Period::new(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================
// OHLCV TRAITS
// ============================================================

/// Core OHLCV data trait.
///
/// Series are addressed by index only; `date` is carried for the caller's
/// benefit and never consulted by detection.
pub trait OHLCV {
    fn open(&self) -> f64;
    fn high(&self) -> f64;
    fn low(&self) -> f64;
    fn close(&self) -> f64;

    /// Traded volume, if the data source reports it
    fn volume(&self) -> Option<f64> {
        None
    }

    fn date(&self) -> Option<NaiveDate> {
        None
    }
}

/// Extension trait with computed properties for OHLCV data
pub trait OHLCVExt: OHLCV {
    #[inline]
    fn range(&self) -> f64 {
        self.high() - self.low()
    }

    /// Validate OHLCV data consistency
    fn validate(&self) -> Result<()> {
        let prices = [self.open(), self.high(), self.low(), self.close()];
        if prices.iter().any(|p| p.is_nan()) {
            return Err(PatternError::InvalidOHLCV {
                index: 0,
                reason: "NaN in OHLCV",
            });
        }
        if prices.iter().any(|p| p.is_infinite()) {
            return Err(PatternError::InvalidOHLCV {
                index: 0,
                reason: "Infinite value in OHLCV",
            });
        }
        if self.range() < 0.0 {
            return Err(PatternError::InvalidOHLCV {
                index: 0,
                reason: "high < low",
            });
        }
        if self.close() <= 0.0 {
            return Err(PatternError::InvalidOHLCV {
                index: 0,
                reason: "non-positive close",
            });
        }
        if self.volume().is_some_and(|v| v.is_nan() || v < 0.0) {
            return Err(PatternError::InvalidOHLCV {
                index: 0,
                reason: "negative or NaN volume",
            });
        }
        Ok(())
    }
}

impl<T: OHLCV> OHLCVExt for T {}

/// One sample of a price series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl PricePoint {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date: Some(date),
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// Undated point with all four prices equal to `close`
    pub fn from_close(close: f64) -> Self {
        Self {
            date: None,
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }
}

impl OHLCV for PricePoint {
    fn open(&self) -> f64 {
        self.open
    }

    fn high(&self) -> f64 {
        self.high
    }

    fn low(&self) -> f64 {
        self.low
    }

    fn close(&self) -> f64 {
        self.close
    }

    fn volume(&self) -> Option<f64> {
        self.volume
    }

    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

// ============================================================
// PATTERN - result of detection (Copy, no allocations)
// ============================================================

/// Direction/bias of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Bullish,
    Neutral,
    Bearish,
}

impl Direction {
    #[inline]
    pub fn is_bullish(self) -> bool {
        matches!(self, Direction::Bullish)
    }

    #[inline]
    pub fn is_bearish(self) -> bool {
        matches!(self, Direction::Bearish)
    }
}

/// Pattern type, decided by the trend leading into the center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    /// Formed after a rise
    #[serde(rename = "Head & Shoulders Top")]
    Top,
    /// Formed after a fall or flat stretch
    #[serde(rename = "Head & Shoulders Bottom")]
    Bottom,
}

impl PatternKind {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            PatternKind::Top => "Head & Shoulders Top",
            PatternKind::Bottom => "Head & Shoulders Bottom",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directional reading of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "Bearish Reversal")]
    BearishReversal,
    #[serde(rename = "Continuation Pattern")]
    ContinuationPattern,
}

impl Signal {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::BearishReversal => "Bearish Reversal",
            Signal::ContinuationPattern => "Continuation Pattern",
        }
    }

    /// Price bias the signal implies
    #[inline]
    pub fn direction(self) -> Direction {
        match self {
            Signal::BearishReversal => Direction::Bearish,
            Signal::ContinuationPattern => Direction::Neutral,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far the head clears the higher shoulder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// Classify `(head - max(left, right)) / head`
    pub fn from_dominance(ratio: f64) -> Self {
        use crate::detectors::helpers::{MODERATE_DOMINANCE, WEAK_DOMINANCE};
        match ratio {
            r if r > MODERATE_DOMINANCE => Strength::Strong,
            r if r > WEAK_DOMINANCE => Strength::Moderate,
            _ => Strength::Weak,
        }
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Strength::Weak => "Weak",
            Strength::Moderate => "Moderate",
            Strength::Strong => "Strong",
        }
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected Head & Shoulders pattern. Self-describing: rendering it needs
/// no lookups against the source series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(rename = "pattern_type")]
    pub kind: PatternKind,
    pub left_shoulder_price: f64,
    pub head_price: f64,
    pub right_shoulder_price: f64,
    /// Heuristic score, 60..=95 for every emitted pattern
    pub confidence: u8,
    pub signal: Signal,
    pub strength: Strength,
    pub center_index: usize,
    /// Left shoulder index
    pub start_index: usize,
    /// Right shoulder index
    pub end_index: usize,
}

// ============================================================
// REPORTS
// ============================================================

/// Latest price move of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub current_price: f64,
    /// Close before the last one, 0 for a single-bar series
    pub previous_price: f64,
    pub price_change: f64,
    /// Percent change, 0 when there is no previous close
    pub price_change_pct: f64,
}

impl SeriesSummary {
    /// `None` for an empty series
    pub fn from_bars<T: OHLCV>(bars: &[T]) -> Option<Self> {
        let current_price = bars.last()?.close();
        let previous_price = match bars.len() {
            0 | 1 => 0.0,
            n => bars[n - 2].close(),
        };
        let price_change = current_price - previous_price;
        let price_change_pct = if previous_price != 0.0 {
            price_change / previous_price * 100.0
        } else {
            0.0
        };
        Some(Self {
            current_price,
            previous_price,
            price_change,
            price_change_pct,
        })
    }
}

/// Everything a reporting layer needs for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub summary: Option<SeriesSummary>,
    pub patterns: Vec<Pattern>,
}

// ============================================================
// PATTERN ENGINE
// ============================================================

use detectors::*;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub geometry: WindowGeometry,
    pub shoulder_similarity: Ratio,
    pub dedupe_distance: Period,
    pub dedupe_strategy: DedupeStrategy,
    /// Patterns must score strictly above this. 0 keeps everything.
    pub min_confidence: u8,
    /// Evaluate center indices on the rayon pool
    pub parallel: bool,
    /// Reject NaN/infinite/inverted bars in `scan` and `analyze`
    pub validate_data: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            geometry: WindowGeometry::default(),
            shoulder_similarity: Ratio::new_const(SHOULDER_SIMILARITY),
            dedupe_distance: Period::new_const(DEDUPE_DISTANCE),
            dedupe_strategy: DedupeStrategy::default(),
            min_confidence: 0,
            parallel: false,
            validate_data: false,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if self.min_confidence > 100 {
            return Err(PatternError::OutOfRange {
                field: "min_confidence",
                value: self.min_confidence as f64,
                min: 0.0,
                max: 100.0,
            });
        }
        Ok(())
    }
}

/// Main pattern detection engine. Holds only configuration, so one engine
/// can serve any number of series and threads.
#[derive(Debug, Clone)]
pub struct PatternEngine {
    scorer: PatternScorer,
    config: EngineConfig,
}

impl Default for PatternEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            scorer: PatternScorer::new(config.shoulder_similarity),
            config,
        }
    }
}

impl PatternEngine {
    /// Build an engine from a (possibly deserialized) configuration
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scorer: PatternScorer::new(config.shoulder_similarity),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ===========================================
    // LOW-LEVEL: Primitives
    // ===========================================

    /// Peak triples found by the window sweep, before scoring.
    pub fn candidates<T: OHLCV>(&self, bars: &[T]) -> Vec<Candidate> {
        let Some(bars) = validate_series(bars) else {
            return Vec::new();
        };
        let prices = closes(bars);
        if self.config.parallel {
            scan_par(&prices, &self.config.geometry)
        } else {
            scan(&prices, &self.config.geometry)
        }
    }

    /// Score a single candidate against the confidence gate.
    pub fn score<T: OHLCV>(&self, candidate: &Candidate, bars: &[T]) -> Option<Pattern> {
        self.scorer
            .score_candidate(candidate, bars)
            .filter(|p| p.confidence > self.config.min_confidence)
    }

    // ===========================================
    // HIGH-LEVEL: Batch processing
    // ===========================================

    /// Detect Head & Shoulders patterns, ordered by center index.
    ///
    /// Total over its input: a short series, unresolved windows or failed
    /// gates all end in an empty list.
    pub fn detect<T: OHLCV>(&self, bars: &[T]) -> Vec<Pattern> {
        if validate_series(bars).is_none() {
            tracing::debug!(
                "series of {} bars below minimum {}, skipping",
                bars.len(),
                MIN_SERIES_LEN
            );
            return Vec::new();
        }

        let candidates = self.candidates(bars);
        let scored: Vec<Pattern> = candidates
            .iter()
            .filter_map(|c| self.score(c, bars))
            .collect();
        let patterns = dedupe_with(
            &scored,
            self.config.dedupe_distance.get(),
            self.config.dedupe_strategy,
        );

        tracing::debug!(
            "scanned {} bars: {} candidates, {} scored, {} after dedupe",
            bars.len(),
            candidates.len(),
            scored.len(),
            patterns.len()
        );
        for p in &patterns {
            tracing::trace!(
                "{} at {} ({}..={}): confidence {}, {}, {}",
                p.kind,
                p.center_index,
                p.start_index,
                p.end_index,
                p.confidence,
                p.strength,
                p.signal
            );
        }

        patterns
    }

    /// Like [`detect`](Self::detect), validating bars first when configured to.
    pub fn scan<T: OHLCV>(&self, bars: &[T]) -> Result<Vec<Pattern>> {
        if self.config.validate_data {
            self.validate_bars(bars)?;
        }
        Ok(self.detect(bars))
    }

    /// Patterns plus the latest price move, tagged with `symbol`.
    pub fn analyze<T: OHLCV>(&self, symbol: &str, bars: &[T]) -> Result<AnalysisReport> {
        let patterns = self.scan(bars)?;
        tracing::debug!("[{}] {} patterns found", symbol, patterns.len());
        Ok(AnalysisReport {
            symbol: symbol.to_string(),
            summary: SeriesSummary::from_bars(bars),
            patterns,
        })
    }

    // ===========================================
    // Internal helpers
    // ===========================================

    fn validate_bars<T: OHLCV>(&self, bars: &[T]) -> Result<()> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate().map_err(|e| match e {
                PatternError::InvalidOHLCV { reason, .. } => {
                    tracing::warn!("rejecting bar {}: {}", i, reason);
                    PatternError::InvalidOHLCV { index: i, reason }
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

// ============================================================
// BUILDER
// ============================================================

/// Builder for creating PatternEngine instances
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Set the window placement
    pub fn geometry(mut self, geometry: WindowGeometry) -> Self {
        self.config.geometry = geometry;
        self
    }

    /// Set the shoulder similarity threshold
    pub fn shoulder_similarity(mut self, threshold: Ratio) -> Self {
        self.config.shoulder_similarity = threshold;
        self
    }

    /// Set the center distance under which detections collapse
    pub fn dedupe_distance(mut self, distance: Period) -> Self {
        self.config.dedupe_distance = distance;
        self
    }

    /// Choose which detection survives a cluster
    pub fn dedupe_strategy(mut self, strategy: DedupeStrategy) -> Self {
        self.config.dedupe_strategy = strategy;
        self
    }

    /// Keep only patterns scoring strictly above `confidence`
    pub fn min_confidence(mut self, confidence: u8) -> Self {
        self.config.min_confidence = confidence;
        self
    }

    /// Enable/disable parallel center evaluation
    pub fn parallel(mut self, enable: bool) -> Self {
        self.config.parallel = enable;
        self
    }

    /// Enable/disable data validation
    pub fn validate_data(mut self, enable: bool) -> Self {
        self.config.validate_data = enable;
        self
    }

    /// Build the engine
    pub fn build(self) -> Result<PatternEngine> {
        PatternEngine::from_config(self.config)
    }
}

// ============================================================
// PARALLEL SCANNING
// ============================================================

use rayon::prelude::*;

/// Result of scanning a single instrument
#[derive(Debug)]
pub struct ScanResult {
    pub symbol: String,
    pub patterns: Vec<Pattern>,
}

/// Error from scanning a single instrument
#[derive(Debug)]
pub struct ScanError {
    pub symbol: String,
    pub error: PatternError,
}

/// Parallel scanning of multiple instruments
pub fn scan_parallel<'a, T, I>(
    engine: &PatternEngine,
    instruments: I,
) -> (Vec<ScanResult>, Vec<ScanError>)
where
    T: OHLCV + Sync + 'a,
    I: IntoParallelIterator<Item = (&'a str, &'a [T])>,
{
    let results: Vec<_> = instruments
        .into_par_iter()
        .map(|(symbol, bars)| {
            engine
                .scan(bars)
                .map(|patterns| ScanResult {
                    symbol: symbol.to_string(),
                    patterns,
                })
                .map_err(|error| ScanError {
                    symbol: symbol.to_string(),
                    error,
                })
        })
        .collect();

    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(r) => successes.push(r),
            Err(e) => errors.push(e),
        }
    }

    (successes, errors)
}

// ============================================================
// TESTS
// ============================================================
