//! ES-002: Timeline ordering: stable sort by `time_start`.
//!
//! Ties keep document order (task, then episode, then interaction).

use super::types::Interaction;

/// Sort interactions by start time, preserving the relative order of ties.
/// `0.0` and `-0.0` are the same instant.
pub fn order(mut interactions: Vec<Interaction>) -> Vec<Interaction> {
    interactions.sort_by(|a, b| (a.time_start + 0.0).total_cmp(&(b.time_start + 0.0)));
    interactions
}
