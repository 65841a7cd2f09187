// Fusion Engine - Confidence-Weighted Centroid
//
// Algorithm (2+ inputs):
// 1. Resolve each input's mood token to a catalog point
// 2. Effective weight = confidence × weight, scaled so the largest is 1
// 3. Fused vector = Σ(eff_i × point_i) / Σ(eff_i)
//    All-zero effective weights fall back to the unweighted mean at floor confidence
// 4. Confidence = weight-weighted mean of input confidences, clamped to [floor, ceiling]
// 5. Label = nearest catalog mood of the fused vector
//
// Never panics and never returns Err: every path ends in a FusionResult.

use crate::catalog::{self, CatalogEntry, NEUTRAL_KEY};
use crate::classifier;
use crate::types::{AffectivePoint, Confidence, FusionOutcome, FusionResult, MoodInput};
use moodsync_common::{Error, FusionSettings, Result};
use serde::Deserialize;
use serde_json::Value;

/// Lowest confidence a fused or error result reports
///
/// Chosen empirically; revalidate before reusing with another weighting scheme.
pub const CONFIDENCE_FLOOR: Confidence = 0.1;

/// Highest confidence a fused result reports
pub const CONFIDENCE_CEILING: Confidence = 1.0;

/// Confidence of the neutral reading returned for an empty input list
pub const EMPTY_INPUT_CONFIDENCE: Confidence = 1.0;

/// Mood fusion engine
///
/// Holds only the confidence bounds, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodFuser {
    confidence_floor: Confidence,
    confidence_ceiling: Confidence,
}

impl Default for MoodFuser {
    fn default() -> Self {
        Self {
            confidence_floor: CONFIDENCE_FLOOR,
            confidence_ceiling: CONFIDENCE_CEILING,
        }
    }
}

impl MoodFuser {
    /// Create a fuser with custom confidence bounds
    ///
    /// # Errors
    /// `Error::Config` if either bound is outside [0, 1] or floor > ceiling
    pub fn new(confidence_floor: Confidence, confidence_ceiling: Confidence) -> Result<Self> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(confidence_floor) || !in_unit(confidence_ceiling) {
            return Err(Error::Config(format!(
                "confidence bounds must lie in [0, 1] (floor = {}, ceiling = {})",
                confidence_floor, confidence_ceiling
            )));
        }
        if confidence_floor > confidence_ceiling {
            return Err(Error::Config(format!(
                "confidence floor {} exceeds ceiling {}",
                confidence_floor, confidence_ceiling
            )));
        }
        Ok(Self {
            confidence_floor,
            confidence_ceiling,
        })
    }

    /// Create a fuser from the `[fusion]` config section, unset values taking the defaults
    pub fn from_settings(settings: &FusionSettings) -> Result<Self> {
        Self::new(
            settings.confidence_floor.unwrap_or(CONFIDENCE_FLOOR),
            settings.confidence_ceiling.unwrap_or(CONFIDENCE_CEILING),
        )
    }

    pub fn confidence_floor(&self) -> Confidence {
        self.confidence_floor
    }

    pub fn confidence_ceiling(&self) -> Confidence {
        self.confidence_ceiling
    }

    /// Fuse an ordered list of mood inputs into one affective estimate
    ///
    /// - no inputs: neutral default at full confidence
    /// - one input: catalog point of its mood, its own confidence
    /// - two or more: weighted centroid, labelled by the classifier
    pub fn fuse(&self, inputs: &[MoodInput]) -> FusionResult {
        match inputs {
            [] => default_result(),
            [single] => single_result(single),
            _ => self.fuse_weighted(inputs),
        }
    }

    /// Fuse a dynamically typed input list
    ///
    /// Anything other than an array of mood input objects produces an
    /// error-tagged result instead of failing.
    pub fn fuse_json(&self, value: &Value) -> FusionResult {
        let Value::Array(items) = value else {
            return self.error_result(format!(
                "inputs must be an array of mood inputs, got {}",
                json_type_name(value)
            ));
        };

        let mut inputs = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match MoodInput::deserialize(item) {
                Ok(input) => inputs.push(input),
                Err(e) => {
                    return self.error_result(format!("input {} is not a valid mood input: {}", index, e));
                }
            }
        }

        self.fuse(&inputs)
    }

    fn fuse_weighted(&self, inputs: &[MoodInput]) -> FusionResult {
        let resolved: Vec<&'static CatalogEntry> =
            inputs.iter().map(|input| catalog::lookup(&input.mood)).collect();

        let effective_weights: Vec<f64> = inputs.iter().map(MoodInput::effective_weight).collect();

        let (vector, confidence) = if let Some(scaled) = scale_to_unit(&effective_weights) {
            let vector = weighted_centroid(&resolved, &scaled);
            (vector, self.aggregate_confidence(inputs))
        } else {
            tracing::debug!(
                "All {} inputs have zero effective weight, using unweighted mean",
                inputs.len()
            );
            (unweighted_mean(&resolved), self.confidence_floor)
        };

        let classification = classifier::classify(&vector);
        let contributing_moods: Vec<String> = resolved.iter().map(|e| e.key.to_string()).collect();

        tracing::debug!(
            "Fused {} inputs {:?} → ({:.3}, {:.3}) {} at confidence {:.2}",
            inputs.len(),
            contributing_moods,
            vector.valence,
            vector.arousal,
            classification.label,
            confidence
        );

        FusionResult {
            vector,
            label: classification.label.to_string(),
            confidence,
            outcome: FusionOutcome::Fusion { contributing_moods },
        }
    }

    /// Weight-weighted mean of input confidences, clamped to the configured bounds
    fn aggregate_confidence(&self, inputs: &[MoodInput]) -> Confidence {
        let weights: Vec<f64> = inputs.iter().map(|i| i.weight).collect();
        let Some(scaled) = scale_to_unit(&weights) else {
            return self.confidence_floor;
        };

        let total_weight: f64 = scaled.iter().sum();
        let weighted: f64 = scaled.iter().zip(inputs).map(|(w, i)| w * i.confidence).sum();
        (weighted / total_weight).clamp(self.confidence_floor, self.confidence_ceiling)
    }

    fn error_result(&self, message: String) -> FusionResult {
        tracing::warn!("Malformed fusion call: {}", message);
        FusionResult {
            vector: AffectivePoint::ORIGIN,
            label: neutral_label().to_string(),
            confidence: self.confidence_floor,
            outcome: FusionOutcome::Error { error: message },
        }
    }
}

/// Fuse with the default confidence bounds
pub fn fuse(inputs: &[MoodInput]) -> FusionResult {
    MoodFuser::default().fuse(inputs)
}

/// Fuse a JSON value with the default confidence bounds
pub fn fuse_json(value: &Value) -> FusionResult {
    MoodFuser::default().fuse_json(value)
}

fn default_result() -> FusionResult {
    FusionResult {
        vector: AffectivePoint::ORIGIN,
        label: neutral_label().to_string(),
        confidence: EMPTY_INPUT_CONFIDENCE,
        outcome: FusionOutcome::Default,
    }
}

fn single_result(input: &MoodInput) -> FusionResult {
    let entry = catalog::lookup(&input.mood);
    FusionResult {
        vector: entry.point,
        label: entry.label.to_string(),
        confidence: input.confidence,
        outcome: FusionOutcome::Single,
    }
}

/// Divide every weight by the largest one so each term is at most 1
///
/// Keeps the sums finite for any finite weights. `None` when no weight is positive.
fn scale_to_unit(weights: &[f64]) -> Option<Vec<f64>> {
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        Some(weights.iter().map(|w| w / max).collect())
    } else {
        None
    }
}

fn weighted_centroid(points: &[&CatalogEntry], weights: &[f64]) -> AffectivePoint {
    let total: f64 = weights.iter().sum();
    let (valence, arousal) = points
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(v, a), (entry, w)| {
            (v + w * entry.point.valence, a + w * entry.point.arousal)
        });
    AffectivePoint::new(valence / total, arousal / total)
}

fn unweighted_mean(points: &[&CatalogEntry]) -> AffectivePoint {
    let n = points.len() as f64;
    let (valence, arousal) = points
        .iter()
        .fold((0.0, 0.0), |(v, a), entry| (v + entry.point.valence, a + entry.point.arousal));
    AffectivePoint::new(valence / n, arousal / n)
}

fn neutral_label() -> &'static str {
    catalog::vector_of(NEUTRAL_KEY).label
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FusionSource, MoodSource};
    use serde_json::json;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_empty_input_is_neutral_default() {
        let result = fuse(&[]);
        assert_eq!(result.source(), FusionSource::Default);
        assert_eq!(result.label, "Neutral");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.vector, AffectivePoint::ORIGIN);
        assert!(result.error().is_none());
    }

    #[test]
    fn test_single_input_passes_through() {
        let result = fuse(&[MoodInput::new("joyful", 0.42)]);
        assert_eq!(result.source(), FusionSource::Single);
        assert_eq!(result.label, "Happy");
        assert_eq!(result.confidence, 0.42);
        assert_eq!(result.vector, catalog::vector_of("happy").point);
        assert!(result.contributing_moods().is_none());
    }

    #[test]
    fn test_single_zero_confidence_is_not_floored() {
        let result = fuse(&[MoodInput::new("sad", 0.0)]);
        assert_eq!(result.source(), FusionSource::Single);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_single_unknown_mood_is_neutral() {
        let result = fuse(&[MoodInput::new("totallyfakemood", 0.8)]);
        assert_eq!(result.source(), FusionSource::Single);
        assert_eq!(result.label, "Neutral");
        assert_eq!(result.vector, AffectivePoint::ORIGIN);
    }

    #[test]
    fn test_calm_plus_excited() {
        let inputs = vec![MoodInput::new("calm", 0.9), MoodInput::new("excited", 0.8)];
        let result = fuse(&inputs);

        assert_eq!(result.source(), FusionSource::Fusion);
        assert!(result.vector.valence > 0.5, "valence {}", result.vector.valence);
        assert!(result.vector.arousal > -0.4 && result.vector.arousal < 0.9);
        assert_eq!(
            result.contributing_moods().unwrap(),
            &["calm".to_string(), "excited".to_string()]
        );

        // (0.9 × 0.6 + 0.8 × 0.8) / 1.7
        assert!((result.vector.valence - 1.18 / 1.7).abs() < EPSILON);
        // (0.9 × -0.4 + 0.8 × 0.9) / 1.7
        assert!((result.vector.arousal - 0.36 / 1.7).abs() < EPSILON);
        assert!((result.confidence - 0.85).abs() < EPSILON);
    }

    #[test]
    fn test_weights_shift_the_centroid() {
        let even = fuse(&[MoodInput::new("happy", 1.0), MoodInput::new("sad", 1.0)]);
        let happy_heavy = fuse(&[
            MoodInput::new("happy", 1.0).with_weight(3.0),
            MoodInput::new("sad", 1.0),
        ]);

        assert!((even.vector.valence - 0.05).abs() < EPSILON);
        assert!(happy_heavy.vector.valence > even.vector.valence);
        // (3 × 0.8 + 1 × -0.7) / 4
        assert!((happy_heavy.vector.valence - 0.425).abs() < EPSILON);
    }

    #[test]
    fn test_zero_weight_input_is_counted_but_ignored() {
        let result = fuse(&[
            MoodInput::new("angry", 1.0).with_weight(0.0),
            MoodInput::new("calm", 0.6),
        ]);

        let calm = catalog::vector_of("calm").point;
        assert!(result.vector.distance(&calm) < EPSILON);
        assert_eq!(result.label, "Calm");
        assert_eq!(result.contributing_moods().unwrap().len(), 2);
        assert!((result.confidence - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_all_zero_effective_weight_uses_unweighted_mean() {
        let result = fuse(&[
            MoodInput::new("happy", 0.0),
            MoodInput::new("sad", 0.0),
            MoodInput::new("calm", 0.9).with_weight(0.0),
        ]);

        assert_eq!(result.source(), FusionSource::Fusion);
        assert_eq!(result.confidence, CONFIDENCE_FLOOR);
        assert!((result.vector.valence - (0.8 - 0.7 + 0.6) / 3.0).abs() < EPSILON);
        assert!((result.vector.arousal - (0.5 - 0.4 - 0.4) / 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_huge_weights_stay_finite() {
        let result = fuse(&[
            MoodInput::new("sad", 1.0).with_weight(f64::MAX),
            MoodInput::new("sad", 1.0).with_weight(f64::MAX),
        ]);
        assert!(result.vector.in_range(), "vector {:?}", result.vector);
        assert!(result.confidence >= CONFIDENCE_FLOOR && result.confidence <= CONFIDENCE_CEILING);
        assert_eq!(result.label, "Sad");

        let result = fuse(&[
            MoodInput::new("happy", 0.9).with_weight(1e308),
            MoodInput::new("happy", 0.8).with_weight(1e308),
            MoodInput::new("happy", 0.7).with_weight(1e308),
        ]);
        assert!(result.vector.distance(&catalog::vector_of("happy").point) < EPSILON);
        assert!((result.confidence - 0.8).abs() < EPSILON);
        assert_eq!(result.label, "Happy");
    }

    #[test]
    fn test_huge_and_tiny_weights_mix() {
        // The tiny weight is negligible next to the huge one
        let result = fuse(&[
            MoodInput::new("angry", 1.0).with_weight(f64::MAX),
            MoodInput::new("calm", 1.0).with_weight(1e-300),
        ]);
        assert!(result.vector.distance(&catalog::vector_of("angry").point) < EPSILON);
        assert_eq!(result.label, "Angry");
    }

    #[test]
    fn test_low_confidence_is_floored() {
        let result = fuse(&[MoodInput::new("tired", 0.02), MoodInput::new("bored", 0.04)]);
        assert_eq!(result.confidence, CONFIDENCE_FLOOR);
        assert!(result.vector.in_range());
    }

    #[test]
    fn test_neutral_convergence() {
        let inputs: Vec<MoodInput> = (0..3).map(|_| MoodInput::new("neutral", 1.0)).collect();
        let result = fuse(&inputs);
        assert!(result.vector.distance(&AffectivePoint::ORIGIN) < 0.1);
        assert_eq!(result.label, "Neutral");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_custom_bounds_apply() {
        let fuser = MoodFuser::new(0.3, 0.9).unwrap();
        let high = fuser.fuse(&[MoodInput::new("happy", 1.0), MoodInput::new("excited", 1.0)]);
        assert_eq!(high.confidence, 0.9);

        let low = fuser.fuse(&[MoodInput::new("happy", 0.1), MoodInput::new("excited", 0.1)]);
        assert_eq!(low.confidence, 0.3);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        assert!(matches!(MoodFuser::new(0.6, 0.4), Err(Error::Config(_))));
        assert!(matches!(MoodFuser::new(-0.1, 1.0), Err(Error::Config(_))));
        assert!(matches!(MoodFuser::new(0.1, 1.5), Err(Error::Config(_))));
        assert!(matches!(MoodFuser::new(f64::NAN, 1.0), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_settings_fills_defaults() {
        let fuser = MoodFuser::from_settings(&FusionSettings {
            confidence_floor: Some(0.2),
            confidence_ceiling: None,
        })
        .unwrap();
        assert_eq!(fuser.confidence_floor(), 0.2);
        assert_eq!(fuser.confidence_ceiling(), CONFIDENCE_CEILING);

        assert_eq!(
            MoodFuser::from_settings(&FusionSettings::default()).unwrap(),
            MoodFuser::default()
        );
    }

    #[test]
    fn test_fuse_json_rejects_non_array() {
        let result = fuse_json(&json!("not a sequence"));
        assert_eq!(result.source(), FusionSource::Error);
        assert_eq!(result.label, "Neutral");
        assert_eq!(result.confidence, CONFIDENCE_FLOOR);
        assert_eq!(result.vector, AffectivePoint::ORIGIN);
        assert!(result.error().unwrap().contains("a string"));
    }

    #[test]
    fn test_fuse_json_rejects_bad_element() {
        let result = fuse_json(&json!([{"mood": "happy", "confidence": 0.5}, 42]));
        assert_eq!(result.source(), FusionSource::Error);
        assert!(result.error().unwrap().starts_with("input 1"));
    }

    #[test]
    fn test_fuse_json_valid_array() {
        let result = fuse_json(&json!([
            {"mood": "calm", "confidence": 0.9, "source": "voice"},
            {"mood": "🤩", "confidence": 0.8, "source": "face"}
        ]));
        assert_eq!(result.source(), FusionSource::Fusion);
        assert_eq!(
            result.contributing_moods().unwrap(),
            &["calm".to_string(), "excited".to_string()]
        );
    }

    #[test]
    fn test_fuse_json_tolerates_extra_fields() {
        let result = fuse_json(&json!([
            {"mood": "happy", "confidence": 0.9, "userId": "u1"},
            {"mood": "calm", "confidence": 0.5}
        ]));
        assert_eq!(result.source(), FusionSource::Fusion);
        assert!(result.error().is_none());
        assert_eq!(
            result.contributing_moods().unwrap(),
            &["happy".to_string(), "calm".to_string()]
        );
    }

    #[test]
    fn test_fuse_json_empty_array_is_default() {
        let result = fuse_json(&json!([]));
        assert_eq!(result.source(), FusionSource::Default);
    }

    #[test]
    fn test_sources_do_not_affect_math() {
        let a = fuse(&[
            MoodInput::new("happy", 0.7).with_source(MoodSource::Voice),
            MoodInput::new("anxious", 0.5).with_source(MoodSource::Face),
        ]);
        let b = fuse(&[MoodInput::new("happy", 0.7), MoodInput::new("anxious", 0.5)]);
        assert_eq!(a.vector, b.vector);
        assert_eq!(a.confidence, b.confidence);
    }
}
