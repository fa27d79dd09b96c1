use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use doctor_cell::services::roster::RosterService;
use shared_config::AppConfig;

use crate::models::{
    ChatError, ChatPolicy, ChatTurnResponse, ConversationState, DoctorCard, Phase,
    SendMessageRequest, UtteranceKind,
};
use crate::services::collector;
use crate::services::generator::GenerativeClient;
use crate::services::ranking::{rank, LocationMode, RankOptions};
use crate::services::reference;

/// Session-scoped chat orchestration. Holds the conversation states,
/// gates roster and generator calls on the collector's phase decision,
/// and assembles the turn response.
pub struct ChatService {
    roster: RosterService,
    generator: GenerativeClient,
    sessions: RwLock<HashMap<Uuid, ConversationState>>,
    policy: ChatPolicy,
    rank_options: RankOptions,
}

impl ChatService {
    pub fn new(config: &AppConfig) -> Self {
        let location_mode = if config.strict_location_matching {
            LocationMode::Strict
        } else {
            LocationMode::Permissive
        };

        Self {
            roster: RosterService::new(config),
            generator: GenerativeClient::new(config),
            sessions: RwLock::new(HashMap::new()),
            policy: ChatPolicy::from_config(config),
            rank_options: RankOptions { location_mode },
        }
    }

    pub async fn create_session(&self) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(session_id, ConversationState::new());
        info!("Created chat session {}", session_id);
        session_id
    }

    pub async fn get_session(&self, session_id: Uuid) -> Result<ConversationState, ChatError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(ChatError::SessionNotFound)
    }

    /// Process one user utterance. Utterances within a session arrive one
    /// at a time from the UI boundary and are applied in arrival order.
    pub async fn handle_message(
        &self,
        session_id: Uuid,
        request: SendMessageRequest,
    ) -> Result<ChatTurnResponse, ChatError> {
        let content = request.content.trim().to_string();
        if content.is_empty() {
            return Err(ChatError::ValidationError(
                "Message content must not be empty".to_string(),
            ));
        }
        let location = request.location.unwrap_or_default();

        // Advance the state machine under the lock, then release it
        // before any external call.
        let (kind, phase, symptoms, previous_cursor) = {
            let mut sessions = self.sessions.write().await;
            let state = sessions
                .get_mut(&session_id)
                .ok_or(ChatError::SessionNotFound)?;

            let kind = collector::advance(state, &self.policy, &content);
            (
                kind,
                state.phase,
                state.accumulated_symptoms.clone(),
                state.last_suggestion_index,
            )
        };

        debug!(
            "Session {} utterance classified as {:?}, phase now {:?}",
            session_id, kind, phase
        );

        if phase != Phase::Recommending {
            let message = self.collecting_reply(&symptoms).await;
            return Ok(ChatTurnResponse {
                session_id,
                phase,
                message,
                doctors: Vec::new(),
            });
        }

        // Roster failure degrades to an empty candidate pool; the user
        // gets an explicit no-match reply instead of an error.
        let roster = match self.roster.list_doctors().await {
            Ok(doctors) => doctors,
            Err(e) => {
                warn!("Roster lookup failed, degrading to no candidates: {}", e);
                Vec::new()
            }
        };

        let rotate_from = match kind {
            UtteranceKind::MoreDoctorsRequest => previous_cursor,
            _ => None,
        };

        let ranked = rank(
            &roster,
            &symptoms,
            &location,
            rotate_from,
            &self.rank_options,
        );

        if !ranked.is_empty() {
            let cursor = match kind {
                UtteranceKind::MoreDoctorsRequest => match previous_cursor {
                    Some(c) => (c + 1) % ranked.len(),
                    None => 0,
                },
                _ => 0,
            };
            let mut sessions = self.sessions.write().await;
            if let Some(state) = sessions.get_mut(&session_id) {
                state.last_suggestion_index = Some(cursor);
            }
        }

        let doctors: Vec<DoctorCard> = ranked.iter().map(to_card).collect();
        let message = self.recommending_reply(&symptoms, &ranked).await;

        Ok(ChatTurnResponse {
            session_id,
            phase,
            message,
            doctors,
        })
    }

    async fn collecting_reply(&self, symptoms: &[String]) -> String {
        let latest = symptoms.last().map(String::as_str).unwrap_or_default();
        let prompt = format!(
            "You are MediLink, a friendly health assistant. The user reported: \"{}\". \
             Reply with a short empathetic sentence and one follow-up question about \
             their symptoms. Do not recommend any specific doctor.",
            latest
        );

        match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Generator unavailable during collection: {}", e);
                "Thanks for telling me. Could you describe your symptoms a bit more?".to_string()
            }
        }
    }

    async fn recommending_reply(&self, symptoms: &[String], ranked: &[Doctor]) -> String {
        if ranked.is_empty() {
            // Explicit no-match state, never a silent empty reply.
            return "I couldn't find any doctors to suggest right now. \
                    Please try again shortly or describe the problem differently."
                .to_string();
        }

        let suggestions = ranked
            .iter()
            .map(|d| {
                format!(
                    "{}, a {} in {} {}",
                    d.full_name,
                    d.specialty.to_lowercase(),
                    d.location,
                    reference::doctor_token(&d.id)
                )
            })
            .collect::<Vec<_>>()
            .join(" or ");

        let prompt = format!(
            "You are MediLink, a friendly health assistant. The user reported these \
             symptoms: \"{}\". Write one short reassuring sentence about seeing a \
             doctor for this. Do not name any doctor yourself.",
            symptoms.join("; ")
        );

        let narrative = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Generator unavailable, returning deterministic list only: {}", e);
                "Here's what I found.".to_string()
            }
        };

        format!(
            "{} I know a few doctors who could help: {}. Want more options?",
            narrative.trim(),
            suggestions
        )
    }
}

fn to_card(doctor: &Doctor) -> DoctorCard {
    DoctorCard {
        id: doctor.id,
        token: reference::doctor_token(&doctor.id),
        full_name: doctor.full_name.clone(),
        specialty: doctor.specialty.clone(),
        location: doctor.location.clone(),
        rating: doctor.rating,
    }
}
