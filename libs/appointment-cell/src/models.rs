use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};

use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub appointment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Listing row joined with patient and doctor names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentSummary {
    pub id: Uuid,
    pub patient_name: String,
    pub doctor_name: String,
    pub appointment_date: NaiveDate,
}

impl AppointmentSummary {
    pub fn display_line(&self) -> String {
        format!(
            "Appointment ID: {}, Patient: {}, Doctor: {}, Date: {}",
            self.id, self.patient_name, self.doctor_name, self.appointment_date
        )
    }
}

/// Booking input: the patient's details, the chosen doctor and the date.
/// The date stays a raw string until it has passed the date rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: Uuid,
    pub patient_name: String,
    pub patient_age: i32,
    pub patient_contact: String,
    pub appointment_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
            AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
            AppointmentError::Validation(msg) => AppError::ValidationError(msg),
            AppointmentError::Database(msg) => AppError::Database(msg),
        }
    }
}
