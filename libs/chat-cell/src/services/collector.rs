use tracing::debug;

use crate::models::{ChatPolicy, ConversationState, Phase, UtteranceKind};

/// Classify one utterance against the policy's intent vocabularies.
/// Precedence: new-complaint > more-doctors > doctor-request; anything
/// else with content is a symptom description.
pub fn classify(policy: &ChatPolicy, text: &str) -> UtteranceKind {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return UtteranceKind::Unrelated;
    }

    if contains_any(&normalized, &policy.new_complaint_vocabulary) {
        return UtteranceKind::NewComplaint;
    }
    if contains_any(&normalized, &policy.more_request_vocabulary)
        && contains_any(&normalized, &policy.doctor_request_vocabulary)
    {
        return UtteranceKind::MoreDoctorsRequest;
    }
    if contains_any(&normalized, &policy.doctor_request_vocabulary) {
        return UtteranceKind::DoctorRequest;
    }

    UtteranceKind::SymptomDescription
}

/// Advance the state machine by one utterance and report how the
/// utterance was interpreted. Pure transition: no roster or generator
/// calls happen here; the caller uses the resulting phase as a gate.
pub fn advance(state: &mut ConversationState, policy: &ChatPolicy, text: &str) -> UtteranceKind {
    let kind = classify(policy, text);

    match kind {
        UtteranceKind::SymptomDescription => {
            let normalized = text.trim().to_string();
            let is_distinct = !state
                .accumulated_symptoms
                .iter()
                .any(|s| s.eq_ignore_ascii_case(&normalized));
            if is_distinct {
                state.accumulated_symptoms.push(normalized);
            }

            if state.phase == Phase::Collecting
                && state.accumulated_symptoms.len() >= policy.sufficiency_threshold
            {
                debug!(
                    "Sufficiency threshold reached after {} symptom turns",
                    state.accumulated_symptoms.len()
                );
                state.phase = Phase::Recommending;
            }
        }
        UtteranceKind::DoctorRequest | UtteranceKind::MoreDoctorsRequest => {
            // An explicit request always short-circuits the threshold.
            state.phase = Phase::Recommending;
        }
        UtteranceKind::NewComplaint => {
            debug!("New complaint signal, resetting conversation state");
            state.accumulated_symptoms.clear();
            state.last_suggestion_index = None;
            state.phase = Phase::Collecting;
        }
        UtteranceKind::Unrelated => {}
    }

    kind
}

fn contains_any(normalized: &str, vocabulary: &[String]) -> bool {
    vocabulary
        .iter()
        .any(|term| normalized.contains(term.as_str()))
}
