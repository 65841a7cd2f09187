//! # MoodSync Fusion Engine
//!
//! Turns discrete mood observations from several contributors (manual picks,
//! voice and face inference) into one point in valence/arousal space, with an
//! aggregate confidence and the nearest human-readable mood label.
//!
//! Modules, leaf first:
//! - `catalog`: canonical moods, aliases/emoji, normalization
//! - `input`: building a `MoodInput`
//! - `fusion`: weighted multi-source fusion
//! - `classifier`: nearest-mood lookup for any vector
//!
//! Everything is synchronous and free of shared mutable state; the catalog is
//! built once and only read afterwards.

pub mod catalog;
pub mod classifier;
pub mod fusion;
pub mod input;
pub mod types;

pub use catalog::{is_valid_mood, normalize, vector_of, CatalogEntry};
pub use classifier::{classify, classify_with_distance};
pub use fusion::{fuse, fuse_json, MoodFuser, CONFIDENCE_CEILING, CONFIDENCE_FLOOR};
pub use types::{
    AffectivePoint, Classification, Confidence, FusionOutcome, FusionResult, FusionSource,
    MoodInput, MoodSource,
};
