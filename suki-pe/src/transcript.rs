//! Transcript segmentation
//!
//! Splits raw transcript text into utterances and heuristically tags each
//! utterance's speaker. The keyword-based speaker classification is
//! approximate by nature: ambiguous utterances are tagged unknown, and
//! downstream consumers must not treat the tags as ground truth.

use crate::models::{Speaker, Utterance};

/// Characters treated as utterance boundaries
const BOUNDARIES: &[char] = &['.', '?', '!', '|', ';'];

/// Price-inquiry and greeting phrasing → customer
const CUSTOMER_MARKERS: &[&str] = &[
    "magkano",
    "how much",
    "pabili",
    "pahingi",
    "penge",
    "bibili",
    "meron ba",
    "may ba kayo",
    "good morning",
    "good afternoon",
    "good evening",
    "hello",
];

/// Availability and price-offer phrasing → owner
const OWNER_MARKERS: &[&str] = &[
    "meron po",
    "meron pa",
    "wala na",
    "wala po",
    "ubos na",
    "out of stock",
    "available",
    "pesos",
    "piso lang",
    "eto po",
    "heto po",
    "sukli",
];

/// Split transcript text into tagged utterances.
///
/// Utterances are split on sentence-terminal punctuation (with pipe and
/// semicolon treated as boundaries), trimmed, and dropped when empty.
pub fn segment(text: &str) -> Vec<Utterance> {
    text.split(BOUNDARIES)
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(|u| Utterance {
            text: u.to_string(),
            speaker: classify_speaker(u),
        })
        .collect()
}

fn classify_speaker(utterance: &str) -> Speaker {
    let lower = utterance.to_lowercase();
    if CUSTOMER_MARKERS.iter().any(|m| lower.contains(m)) {
        return Speaker::Customer;
    }
    if OWNER_MARKERS.iter().any(|m| lower.contains(m)) {
        return Speaker::Owner;
    }
    Speaker::Unknown
}
