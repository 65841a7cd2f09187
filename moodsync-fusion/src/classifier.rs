// Classifier - vector → nearest catalog mood
//
// 1-nearest-neighbor over the fixed catalog points. No training, no parameters.
// Ties go to the entry declared first.

use crate::catalog::{self, CatalogEntry};
use crate::types::{AffectivePoint, Classification};

/// Nearest catalog mood for a vector
pub fn classify(point: &AffectivePoint) -> Classification {
    let (entry, distance) = classify_with_distance(point);
    Classification {
        mood_name: entry.key,
        label: entry.label,
        distance,
    }
}

/// Nearest catalog entry and its Euclidean distance
///
/// A NaN component makes every distance NaN; the first entry wins in that case.
pub fn classify_with_distance(point: &AffectivePoint) -> (&'static CatalogEntry, f64) {
    let entries = catalog::entries();
    let mut best = &entries[0];
    let mut best_distance = point.distance(&best.point);

    for entry in &entries[1..] {
        let distance = point.distance(&entry.point);
        // Strict comparison keeps the earlier entry on ties
        if distance < best_distance {
            best = entry;
            best_distance = distance;
        }
    }

    (best, best_distance)
}
