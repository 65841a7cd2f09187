// Mood Fusion Types
//
// Affective space: Russell's circumplex, valence (x) and arousal (y), both in [-1, 1]
// Flow: MoodInput (per contributor) → fuse → FusionResult (one per call)

use chrono::{DateTime, Utc};
use moodsync_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source confidence score (0.0-1.0)
pub type Confidence = f64;

/// Position in valence/arousal space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffectivePoint {
    pub valence: f64,
    pub arousal: f64,
}

impl AffectivePoint {
    /// The neutral origin (0, 0)
    pub const ORIGIN: AffectivePoint = AffectivePoint {
        valence: 0.0,
        arousal: 0.0,
    };

    pub const fn new(valence: f64, arousal: f64) -> Self {
        Self { valence, arousal }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &AffectivePoint) -> f64 {
        let dv = self.valence - other.valence;
        let da = self.arousal - other.arousal;
        (dv * dv + da * da).sqrt()
    }

    /// True when both components lie within [-1, 1]
    pub fn in_range(&self) -> bool {
        (-1.0..=1.0).contains(&self.valence) && (-1.0..=1.0).contains(&self.arousal)
    }
}

impl Default for AffectivePoint {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// Contributor that produced a mood observation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodSource {
    /// User picked the mood in the UI
    #[default]
    Manual,
    /// Inferred from speech
    Voice,
    /// Inferred from facial expression
    Face,
    /// Inferred from free text
    Text,
    /// Supplied by an external API client
    Api,
}

impl MoodSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Voice => "voice",
            Self::Face => "face",
            Self::Text => "text",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for MoodSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "voice" => Ok(Self::Voice),
            "face" => Ok(Self::Face),
            "text" => Ok(Self::Text),
            "api" => Ok(Self::Api),
            other => Err(Error::InvalidInput(format!(
                "unknown mood source '{}' (expected manual, voice, face, text or api)",
                other
            ))),
        }
    }
}

/// One contributor's observation
///
/// Build through [`MoodInput::build`] or [`MoodInput::new`] so that
/// confidence and weight are clamped. The mood token is kept raw and only
/// resolved against the catalog at fusion time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodInput {
    /// Raw mood token as supplied (key, alias, emoji or garbage)
    pub mood: String,
    /// Clamped to [0, 1]
    pub confidence: Confidence,
    /// Non-negative; 0 means the input takes no part in the fused vector
    pub weight: f64,
    pub source: MoodSource,
    pub timestamp: DateTime<Utc>,
}

/// How a FusionResult was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionSource {
    Single,
    Fusion,
    Default,
    Error,
}

/// Variant-specific part of a FusionResult
///
/// Serialized inline with a `source` tag, so `contributingMoods` appears only
/// for fusion results and `error` only for error results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum FusionOutcome {
    /// Exactly one input, passed through
    Single,
    /// Two or more inputs, weighted centroid
    Fusion {
        /// Resolved canonical keys, in input order
        #[serde(rename = "contributingMoods")]
        contributing_moods: Vec<String>,
    },
    /// No inputs supplied
    Default,
    /// Malformed call
    Error { error: String },
}

/// Single affective estimate returned by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    pub vector: AffectivePoint,
    pub label: String,
    pub confidence: Confidence,
    #[serde(flatten)]
    pub outcome: FusionOutcome,
}

impl FusionResult {
    pub fn source(&self) -> FusionSource {
        match self.outcome {
            FusionOutcome::Single => FusionSource::Single,
            FusionOutcome::Fusion { .. } => FusionSource::Fusion,
            FusionOutcome::Default => FusionSource::Default,
            FusionOutcome::Error { .. } => FusionSource::Error,
        }
    }

    /// Resolved mood keys; present only for fusion results
    pub fn contributing_moods(&self) -> Option<&[String]> {
        match &self.outcome {
            FusionOutcome::Fusion { contributing_moods } => Some(contributing_moods),
            _ => None,
        }
    }

    /// Error description; present only for error results
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            FusionOutcome::Error { error } => Some(error),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, FusionOutcome::Error { .. })
    }
}

/// Nearest catalog mood for a vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    /// Canonical mood key
    pub mood_name: &'static str,
    /// Display label
    pub label: &'static str,
    /// Euclidean distance from the classified vector to the entry's point
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = AffectivePoint::new(0.0, 0.0);
        let b = AffectivePoint::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-12);
        assert!((b.distance(&a) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_in_range() {
        assert!(AffectivePoint::new(1.0, -1.0).in_range());
        assert!(!AffectivePoint::new(1.01, 0.0).in_range());
        assert!(!AffectivePoint::new(0.0, f64::NAN).in_range());
    }

    #[test]
    fn test_mood_source_parse_case_insensitive() {
        assert_eq!("Voice".parse::<MoodSource>().unwrap(), MoodSource::Voice);
        assert_eq!(" FACE ".parse::<MoodSource>().unwrap(), MoodSource::Face);
        assert!(matches!(
            "telepathy".parse::<MoodSource>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_mood_source_default_is_manual() {
        assert_eq!(MoodSource::default(), MoodSource::Manual);
    }

    #[test]
    fn test_fusion_result_serializes_documented_fields() {
        let result = FusionResult {
            vector: AffectivePoint::new(0.5, 0.25),
            label: "Happy".to_string(),
            confidence: 0.8,
            outcome: FusionOutcome::Fusion {
                contributing_moods: vec!["happy".to_string(), "calm".to_string()],
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source"], "fusion");
        assert_eq!(json["label"], "Happy");
        assert_eq!(json["vector"]["valence"], 0.5);
        assert_eq!(json["contributingMoods"][1], "calm");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_default_result_omits_optional_fields() {
        let result = FusionResult {
            vector: AffectivePoint::ORIGIN,
            label: "Neutral".to_string(),
            confidence: 1.0,
            outcome: FusionOutcome::Default,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source"], "default");
        assert!(json.get("contributingMoods").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(result.source(), FusionSource::Default);
        assert!(result.contributing_moods().is_none());
    }

    #[test]
    fn test_error_result_exposes_message() {
        let result = FusionResult {
            vector: AffectivePoint::ORIGIN,
            label: "Neutral".to_string(),
            confidence: 0.1,
            outcome: FusionOutcome::Error {
                error: "inputs must be an array".to_string(),
            },
        };

        assert!(result.is_error());
        assert_eq!(result.error(), Some("inputs must be an array"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "inputs must be an array");
    }
}
