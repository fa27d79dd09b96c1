use std::cmp::Ordering;

use doctor_cell::models::Doctor;

/// Specialty labels the engine falls back to when no specialty or
/// condition matches the symptom signal.
pub const GENERAL_PRACTICE_LABELS: [&str; 3] =
    ["general practitioner", "general practice", "family medicine"];

/// Whether an empty location intersection drops the constraint
/// (permissive, favors recall) or keeps the empty result (strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMode {
    Permissive,
    Strict,
}

#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    pub location_mode: LocationMode,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            location_mode: LocationMode::Permissive,
        }
    }
}

/// The one canonical matching/ranking function. Every entry point that
/// recommends doctors goes through here; it holds no hidden state.
///
/// `rotate_from` is the caller's cursor from a previous call: the result
/// is rotated to start at `(rotate_from + 1) % len`, so repeated "show
/// more" calls cycle through all matches once per full cycle.
pub fn rank(
    doctors: &[Doctor],
    symptoms: &[String],
    location: &str,
    rotate_from: Option<usize>,
    options: &RankOptions,
) -> Vec<Doctor> {
    let signal = symptoms
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut candidates: Vec<&Doctor> = doctors
        .iter()
        .filter(|d| matches_signal(d, &signal))
        .collect();

    if candidates.is_empty() {
        candidates = doctors
            .iter()
            .filter(|d| is_general_practice(&d.specialty))
            .collect();
    }

    let mut survivors = apply_location(candidates, location, options.location_mode);

    // Stable sort keeps roster order on rating ties, so the same input
    // always produces the same output.
    survivors.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(Ordering::Equal)
    });

    let mut ranked: Vec<Doctor> = survivors.into_iter().cloned().collect();

    if let Some(cursor) = rotate_from {
        if ranked.len() > 1 {
            let start = (cursor + 1) % ranked.len();
            ranked.rotate_left(start);
        }
    }

    ranked
}

/// Deliberately loose bidirectional substring test: free text on both
/// sides means neither is guaranteed to contain the other whole.
fn matches_signal(doctor: &Doctor, signal: &str) -> bool {
    if signal.is_empty() {
        return false;
    }

    loose_match(signal, &doctor.specialty)
        || doctor.conditions.iter().any(|c| loose_match(signal, c))
}

fn loose_match(signal: &str, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return false;
    }
    signal.contains(&term) || term.contains(signal)
}

fn is_general_practice(specialty: &str) -> bool {
    let specialty = specialty.trim().to_lowercase();
    GENERAL_PRACTICE_LABELS
        .iter()
        .any(|label| specialty.contains(label))
}

fn apply_location<'a>(
    candidates: Vec<&'a Doctor>,
    location: &str,
    mode: LocationMode,
) -> Vec<&'a Doctor> {
    let location = location.trim().to_lowercase();
    if location.is_empty() {
        return candidates;
    }

    let narrowed: Vec<&Doctor> = candidates
        .iter()
        .copied()
        .filter(|d| {
            let doctor_location = d.location.trim().to_lowercase();
            !doctor_location.is_empty()
                && (doctor_location.contains(&location) || location.contains(&doctor_location))
        })
        .collect();

    if narrowed.is_empty() && mode == LocationMode::Permissive {
        // Recall over precision: an empty intersection drops the
        // constraint instead of zeroing the result.
        return candidates;
    }

    narrowed
}
