//! Command-line mood input parsing
//!
//! Format: `MOOD[:CONFIDENCE[:WEIGHT[:SOURCE]]]`, e.g. `calm`, `😢:0.7`,
//! `excited:0.8:2:voice`. Omitted confidence means a certain manual pick.

use moodsync_common::{Error, Result};
use moodsync_fusion::input::DEFAULT_WEIGHT;
use moodsync_fusion::{MoodInput, MoodSource};

/// Confidence assumed when the argument gives none
pub const DEFAULT_CLI_CONFIDENCE: f64 = 1.0;

pub fn parse_mood_arg(arg: &str) -> Result<MoodInput> {
    let mut parts = arg.splitn(4, ':');
    let mood = parts.next().unwrap_or_default();

    let confidence = match parts.next() {
        Some(raw) => parse_number(raw, "confidence", arg)?,
        None => DEFAULT_CLI_CONFIDENCE,
    };
    let weight = match parts.next() {
        Some(raw) => parse_number(raw, "weight", arg)?,
        None => DEFAULT_WEIGHT,
    };
    let source = match parts.next() {
        Some(raw) => raw.parse::<MoodSource>()?,
        None => MoodSource::default(),
    };

    Ok(MoodInput::build(mood, confidence, weight, source))
}

fn parse_number(raw: &str, field: &str, arg: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        Error::InvalidInput(format!("{} '{}' in '{}' is not a number", field, raw, arg))
    })
}
