use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A roster entry. Owned by the external store; the core never writes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialty: String,
    /// Free-text condition keywords this doctor treats.
    pub conditions: Vec<String>,
    /// Free-text region label, matched loosely against the user's location.
    pub location: String,
    /// Running average, 0.0-5.0. Recomputed by the admin collaborator,
    /// never decremented ad hoc.
    pub rating: f32,
    /// Ordered bookable-slot labels.
    pub availability_schedule: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Doctor roster unavailable: {0}")]
    RosterUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
