// Mood Input Builder
//
// Packages one contributor's observation. Never fails: confidence is clamped,
// weight is floored at zero, and the mood token is resolved later at fusion time.

use crate::types::{Confidence, MoodInput, MoodSource};
use chrono::{DateTime, Utc};
use moodsync_common::time;
use serde::Deserialize;

/// Weight applied when the caller does not supply one
pub const DEFAULT_WEIGHT: f64 = 1.0;

impl MoodInput {
    /// Build an input with explicit weight and source, stamped with the current time
    pub fn build(
        mood: impl Into<String>,
        confidence: Confidence,
        weight: f64,
        source: MoodSource,
    ) -> Self {
        Self {
            mood: mood.into(),
            confidence: clamp_confidence(confidence),
            weight: sanitize_weight(weight),
            source,
            timestamp: time::now(),
        }
    }

    /// Build a manual input with the default weight
    pub fn new(mood: impl Into<String>, confidence: Confidence) -> Self {
        Self::build(mood, confidence, DEFAULT_WEIGHT, MoodSource::default())
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = sanitize_weight(weight);
        self
    }

    pub fn with_source(mut self, source: MoodSource) -> Self {
        self.source = source;
        self
    }

    /// Confidence × weight, this input's share of the fused centroid
    pub fn effective_weight(&self) -> f64 {
        self.confidence * self.weight
    }
}

/// Wire shape accepted from JSON callers
///
/// Extra fields (user ids, device metadata) are ignored.
#[derive(Debug, Deserialize)]
struct RawMoodInput {
    mood: String,
    confidence: f64,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default)]
    source: MoodSource,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

impl<'de> Deserialize<'de> for MoodInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawMoodInput::deserialize(deserializer)?;
        let mut input = MoodInput::build(raw.mood, raw.confidence, raw.weight, raw.source);
        if let Some(timestamp) = raw.timestamp {
            input.timestamp = timestamp;
        }
        Ok(input)
    }
}

/// Clamp to [0, 1]; NaN counts as no confidence
fn clamp_confidence(confidence: Confidence) -> Confidence {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Negative or non-finite weights become 0 (non-participating)
fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}
