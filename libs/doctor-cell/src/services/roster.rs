use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};

use crate::models::{Doctor, DoctorError};

/// Read-only view over the external doctor roster. Supplies the candidate
/// pool for matching; filtering is not its responsibility.
pub struct RosterService {
    store: StoreClient,
}

impl RosterService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Full snapshot read of the roster.
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Fetching doctor roster snapshot");

        let result: Vec<Value> = self
            .store
            .request(Method::GET, "/rest/v1/doctors?order=created_at.asc", None)
            .await
            .map_err(|e| match e {
                StoreError::Unavailable(msg) => {
                    warn!("Doctor roster unavailable: {}", msg);
                    DoctorError::RosterUnavailable(msg)
                }
                other => DoctorError::DatabaseError(other.to_string()),
            })?;

        let doctors: Vec<Doctor> = result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Doctor>, _>>()
            .map_err(|e| DoctorError::DatabaseError(format!("Failed to parse roster: {}", e)))?;

        debug!("Roster snapshot holds {} doctors", doctors.len());
        Ok(doctors)
    }

    /// Single lookup, used to resolve a deep-link token back to a record.
    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        let path = format!("/rest/v1/doctors?id=eq.{}", doctor_id);
        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| match e {
                StoreError::Unavailable(msg) => DoctorError::RosterUnavailable(msg),
                other => DoctorError::DatabaseError(other.to_string()),
            })?;

        if result.is_empty() {
            return Err(DoctorError::NotFound);
        }

        serde_json::from_value(result[0].clone())
            .map_err(|e| DoctorError::DatabaseError(format!("Failed to parse doctor: {}", e)))
    }
}
