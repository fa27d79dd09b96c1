use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_config::AppConfig;

/// Conversation mode. `Collecting` gathers symptom turns; `Recommending`
/// produces ranked doctor suggestions and self-loops on "show more".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collecting,
    Recommending,
}

/// Per-session state, mutated only by the symptom collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Raw user utterances in arrival order. Order matters: the most
    /// recent turn refines the matching signal.
    pub accumulated_symptoms: Vec<String>,
    pub phase: Phase,
    /// Cursor into the most recent ranked-candidate list, used to rotate
    /// suggestions on repeated "show more" requests.
    pub last_suggestion_index: Option<usize>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            accumulated_symptoms: Vec::new(),
            phase: Phase::Collecting,
            last_suggestion_index: None,
        }
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// How one user utterance is interpreted by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtteranceKind {
    SymptomDescription,
    DoctorRequest,
    MoreDoctorsRequest,
    NewComplaint,
    Unrelated,
}

/// Tunable classification policy. The sufficiency threshold and the intent
/// vocabularies are configuration, not fixed rules.
#[derive(Debug, Clone)]
pub struct ChatPolicy {
    /// Distinct symptom turns required before recommendations start.
    pub sufficiency_threshold: usize,
    pub doctor_request_vocabulary: Vec<String>,
    pub more_request_vocabulary: Vec<String>,
    pub new_complaint_vocabulary: Vec<String>,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            sufficiency_threshold: 2,
            doctor_request_vocabulary: vec![
                "doctor".to_string(),
                "doctors".to_string(),
                "specialist".to_string(),
            ],
            more_request_vocabulary: vec![
                "more".to_string(),
                "another".to_string(),
                "next".to_string(),
            ],
            new_complaint_vocabulary: vec![
                "new problem".to_string(),
                "different problem".to_string(),
                "something else".to_string(),
            ],
        }
    }
}

impl ChatPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            sufficiency_threshold: config.symptom_sufficiency_threshold,
            ..Self::default()
        }
    }
}

/// One ranked recommendation as returned to the UI boundary. The `token`
/// is the stable deep-link reference resolving back to the doctor id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorCard {
    pub id: Uuid,
    pub token: String,
    pub full_name: String,
    pub specialty: String,
    pub location: String,
    pub rating: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// One assistant turn. `doctors` is the deterministic recommendation set
/// and is the source of truth for what was offered; `message` is narrative
/// around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    pub message: String,
    pub doctors: Vec<DoctorCard>,
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Chat session not found")]
    SessionNotFound,

    #[error("Text generator unavailable: {0}")]
    GeneratorUnavailable(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
