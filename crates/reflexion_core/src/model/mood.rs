//! Mood label catalogue.
//!
//! Emotion tags are free-form strings. These are the labels offered by the
//! capture flows, kept here so producers and filters agree on spelling.

pub const JOYFUL: &str = "Joyful 😊";
pub const CALM: &str = "Calm 🌿";
pub const ENERGETIC: &str = "Energetic ⚡";
pub const STRESSED: &str = "Stressed 😖";
pub const SAD: &str = "Sad 😞";
pub const REFLECTIVE: &str = "Reflective 🤔";

/// Fallback label when a mood heuristic has no answer.
pub const NEUTRAL: &str = "Neutral 😐";

/// Picker order used by the capture flows.
pub const MOOD_OPTIONS: [&str; 6] = [JOYFUL, CALM, ENERGETIC, STRESSED, SAD, REFLECTIVE];

/// Returns whether `tag` is one of the catalogue labels (including fallback).
///
/// Comparison is exact and case-sensitive, matching tag filtering.
pub fn is_known_mood(tag: &str) -> bool {
    tag == NEUTRAL || MOOD_OPTIONS.contains(&tag)
}
